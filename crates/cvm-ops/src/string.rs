// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use cvm_codec::Value;
use cvm_types::{Tag, VmError};

pub fn concat(a: &Value, b: &Value) -> Result<Value, VmError> {
    let mut s = a.as_str()?.to_string();
    s.push_str(b.as_str()?);
    Ok(Value::from_string(&s))
}

/// splits on every occurrence of `sep`; an empty `sep` yields the whole
/// string as a single-element list.
pub fn split(s: &Value, sep: &Value) -> Result<Value, VmError> {
    let s = s.as_str()?;
    let sep = sep.as_str()?;

    let mut list = Value::list_new(Tag::string);
    let parts: Vec<&str> = if sep.is_empty() {
        vec![s]
    } else {
        s.split(sep).collect()
    };
    for (i, part) in parts.iter().enumerate() {
        list = crate::list::list_insert(&list, i as i32, &Value::from_string(part))?;
    }
    Ok(list)
}

/// replaces each literal `%.` token left to right with the stringified
/// argument at the same position.
pub fn format(template: &Value, args: &[Value]) -> Result<Value, VmError> {
    let template = template.as_str()?;
    let token_count = template.matches("%.").count();
    if token_count != args.len() {
        return Err(VmError::Domain(format!(
            "template has {} `%.` tokens but {} arguments were given",
            token_count,
            args.len()
        )));
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    for arg in args {
        let rendered = crate::conversion::as_string(arg)?;
        let (before, after) = rest
            .split_once("%.")
            .expect("token_count already confirmed a match exists");
        out.push_str(before);
        out.push_str(rendered.as_str()?);
        rest = after;
    }
    out.push_str(rest);
    Ok(Value::from_string(&out))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn concat_joins_in_argument_order() {
        let result = concat(&Value::from_string("foo"), &Value::from_string("bar")).unwrap();
        assert_eq!(result.as_str().unwrap(), "foobar");
    }

    #[test]
    fn split_on_separator() {
        let list = split(&Value::from_string("a,b,c"), &Value::from_string(",")).unwrap();
        assert_eq!(list.len().unwrap(), 3);
        assert_eq!(
            crate::list::list_get(&list, 1).unwrap().as_str().unwrap(),
            "b"
        );
    }

    #[test]
    fn format_substitutes_left_to_right() {
        // scenario E
        let template = Value::from_string("%.+%.=%.\n");
        let args = vec![
            Value::from_i32(12),
            Value::from_i32(20),
            Value::from_i32(32),
        ];
        let result = format(&template, &args).unwrap();
        assert_eq!(result.as_str().unwrap(), "12+20=32\n");
    }

    #[test]
    fn format_rejects_token_count_mismatch() {
        let template = Value::from_string("%. and %.");
        let args = vec![Value::from_i32(1)];
        assert!(format(&template, &args).is_err());
    }

    #[test]
    fn format_with_no_tokens_and_no_args_is_the_literal_template() {
        let template = Value::from_string("no tokens here");
        let result = format(&template, &[]).unwrap();
        assert_eq!(result.as_str().unwrap(), "no tokens here");
    }
}
