// Copyright (c) 2023 Hemashushu <hippospark@gmail.com>, All rights reserved.
//
// This Source Code Form is subject to the terms of
// the Mozilla Public License version 2.0 and additional exceptions,
// more details in file LICENSE and CONTRIBUTING.

use cvm_codec::Value;
use cvm_types::{Tag, VmError};

pub fn list_new(elem_tag: Tag) -> Value {
    Value::list_new(elem_tag)
}

pub fn list_len(list: &Value) -> Result<Value, VmError> {
    Ok(Value::from_i32(list.len()? as i32))
}

fn non_negative(index: i32) -> Result<usize, VmError> {
    usize::try_from(index).map_err(|_| VmError::Domain(format!("negative index {}", index)))
}

/// fails if index ≥ length
pub fn list_get(list: &Value, index: i32) -> Result<Value, VmError> {
    list.list_element(non_negative(index)?)
}

/// inserts at position `index`, shifting succeeding elements right.
/// fails on element-tag mismatch or `index > len`.
pub fn list_insert(list: &Value, index: i32, elem: &Value) -> Result<Value, VmError> {
    let elem_tag = list.elem_tag()?;
    if elem.tag() != elem_tag {
        return Err(VmError::TypeMismatch(format!(
            "list holds {} elements, can't insert a {}",
            elem_tag.name(),
            elem.tag().name()
        )));
    }
    let index = non_negative(index)?;
    let len = list.len()?;
    if index > len {
        return Err(VmError::Domain(format!(
            "insert index {} out of range for list of length {}",
            index, len
        )));
    }

    let header = list.list_header_len();
    let payload = list.payload();
    let insert_at = if index == len {
        payload.len()
    } else {
        list.list_element_range(index)?.0
    };

    let mut elements = payload[header..insert_at].to_vec();
    elements.extend(elem.to_bytes());
    elements.extend_from_slice(&payload[insert_at..]);
    Ok(Value::list_from_raw(elem_tag, len + 1, elements))
}

/// fails on an empty list or an out-of-range index
pub fn list_remove(list: &Value, index: i32) -> Result<Value, VmError> {
    let index = non_negative(index)?;
    let len = list.len()?;
    if len == 0 {
        return Err(VmError::Domain(
            "trying to remove an element from an empty list".to_string(),
        ));
    }
    if index >= len {
        return Err(VmError::Domain(format!(
            "remove index {} out of range for list of length {}",
            index, len
        )));
    }

    let elem_tag = list.elem_tag()?;
    let (start, end) = list.list_element_range(index)?;
    let header = list.list_header_len();
    let payload = list.payload();

    let mut elements = payload[header..start].to_vec();
    elements.extend_from_slice(&payload[end..]);
    Ok(Value::list_from_raw(elem_tag, len - 1, elements))
}

/// equivalent to remove then insert at `index`
pub fn list_replace(list: &Value, index: i32, elem: &Value) -> Result<Value, VmError> {
    let removed = list_remove(list, index)?;
    list_insert(&removed, index, elem)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn insert_at_zero_twice_keeps_the_latest_on_top() {
        // scenario C
        let list = list_new(Tag::i32);
        let list = list_insert(&list, 0, &Value::from_i32(7)).unwrap();
        let list = list_insert(&list, 0, &Value::from_i32(5)).unwrap();
        assert_eq!(list_get(&list, 0).unwrap().as_i32().unwrap(), 5);
        assert_eq!(list_get(&list, 1).unwrap().as_i32().unwrap(), 7);
    }

    #[test]
    fn insert_preserves_order_of_untouched_elements() {
        let list = list_new(Tag::i32);
        let list = list_insert(&list, 0, &Value::from_i32(1)).unwrap();
        let list = list_insert(&list, 1, &Value::from_i32(2)).unwrap();
        let list = list_insert(&list, 1, &Value::from_i32(9)).unwrap();
        let values: Vec<i32> = (0..3)
            .map(|i| list_get(&list, i).unwrap().as_i32().unwrap())
            .collect();
        assert_eq!(values, vec![1, 9, 2]);
    }

    #[test]
    fn remove_preserves_order_of_untouched_elements() {
        let list = list_new(Tag::i32);
        let mut list = list;
        for v in [1, 2, 3, 4] {
            let len = list.len().unwrap();
            list = list_insert(&list, len as i32, &Value::from_i32(v)).unwrap();
        }
        let list = list_remove(&list, 1).unwrap();
        let values: Vec<i32> = (0..3)
            .map(|i| list_get(&list, i).unwrap().as_i32().unwrap())
            .collect();
        assert_eq!(values, vec![1, 3, 4]);
    }

    #[test]
    fn length_coherence_across_insert_remove_replace() {
        let list = list_new(Tag::i32);
        let inserted = list_insert(&list, 0, &Value::from_i32(1)).unwrap();
        assert_eq!(inserted.len().unwrap(), list.len().unwrap() + 1);
        let removed = list_remove(&inserted, 0).unwrap();
        assert_eq!(removed.len().unwrap(), inserted.len().unwrap() - 1);
        let inserted2 = list_insert(&inserted, 0, &Value::from_i32(2)).unwrap();
        let replaced = list_replace(&inserted2, 0, &Value::from_i32(3)).unwrap();
        assert_eq!(replaced.len().unwrap(), inserted2.len().unwrap());
        assert_eq!(list_get(&replaced, 0).unwrap().as_i32().unwrap(), 3);
    }

    #[test]
    fn remove_from_empty_list_fails() {
        let list = list_new(Tag::i32);
        assert!(list_remove(&list, 0).is_err());
    }

    #[test]
    fn insert_string_elements_by_position() {
        // insert three strings, remove the middle one, verify the
        // remaining two by content.
        let mut list = list_new(Tag::string);
        list = list_insert(&list, 0, &Value::from_string("alpha")).unwrap();
        list = list_insert(&list, 1, &Value::from_string("beta")).unwrap();
        list = list_insert(&list, 2, &Value::from_string("gamma")).unwrap();

        let removed = list_remove(&list, 1).unwrap();
        assert_eq!(removed.len().unwrap(), 2);
        assert_eq!(list_get(&removed, 0).unwrap().as_str().unwrap(), "alpha");
        assert_eq!(list_get(&removed, 1).unwrap().as_str().unwrap(), "gamma");
    }

    #[test]
    fn insert_rejects_element_tag_mismatch() {
        let list = list_new(Tag::i32);
        assert!(list_insert(&list, 0, &Value::from_bool(true)).is_err());
    }
}
