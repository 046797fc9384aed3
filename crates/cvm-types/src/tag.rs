// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use crate::VmError;

/// the one-byte kind marker that prefixes every value's serialized form.
///
/// note: `i32` here means a 32-bit two's-complement integer, equivalent to
/// `int32_t` in C, not to be confused with Rust's own `i32` primitive type
/// used to hold it.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[allow(non_camel_case_types)]
pub enum Tag {
    i32 = 0,
    bool = 1,
    f32 = 2,
    list = 3,
    string = 4,
    strct = 5,
}

impl Tag {
    pub fn name(&self) -> &'static str {
        match self {
            Tag::i32 => "i32",
            Tag::bool => "bool",
            Tag::f32 => "f32",
            Tag::list => "list",
            Tag::string => "string",
            Tag::strct => "struct",
        }
    }

    pub fn is_fixed_width(&self) -> bool {
        matches!(self, Tag::i32 | Tag::bool | Tag::f32)
    }
}

impl TryFrom<u8> for Tag {
    type Error = VmError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Tag::i32),
            1 => Ok(Tag::bool),
            2 => Ok(Tag::f32),
            3 => Ok(Tag::list),
            4 => Ok(Tag::string),
            5 => Ok(Tag::strct),
            other => Err(VmError::Decode(format!("unknown tag {}", other))),
        }
    }
}

impl From<Tag> for u8 {
    fn from(tag: Tag) -> u8 {
        tag as u8
    }
}
