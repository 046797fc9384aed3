// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// a cooperative cancellation flag, checked only at dispatch-loop
/// boundaries between instructions — there is no in-instruction
/// suspension. Cloning shares the same underlying flag, so a handle can
/// be held by the caller while the VM runs on the same thread (there is
/// no async runtime in this crate's dependency stack, so cancellation
/// has to be polled rather than awaited).
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn cancelling_one_handle_is_visible_through_a_clone() {
        let token = CancellationToken::new();
        let clone = token.clone();
        assert_eq!(clone.is_cancelled(), false);
        token.cancel();
        assert_eq!(clone.is_cancelled(), true);
    }
}
