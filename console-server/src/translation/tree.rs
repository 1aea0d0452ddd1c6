//! Walking nested translation trees
//!
//! A translation file is a JSON object of nested objects (and occasionally
//! arrays) whose leaves are strings. Leaves are addressed by their path from
//! the root.

use serde_json::{Map, Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

pub type Path = Vec<Segment>;

/// A string leaf to translate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leaf {
    pub path: Path,
    pub text: String,
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        _ => false,
    }
}

fn walk(value: &Value, path: &mut Path, out: &mut Vec<Leaf>) {
    match value {
        Value::String(text) if !text.trim().is_empty() => out.push(Leaf {
            path: path.clone(),
            text: text.clone(),
        }),
        Value::Object(map) => {
            for (key, child) in map {
                path.push(Segment::Key(key.clone()));
                walk(child, path, out);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                path.push(Segment::Index(i));
                walk(child, path, out);
                path.pop();
            }
        }
        _ => {}
    }
}

/// Every non-blank string leaf of `tree`, in document order
pub fn collect_leaves(tree: &Value) -> Vec<Leaf> {
    let mut out = Vec::new();
    walk(tree, &mut Vec::new(), &mut out);
    out
}

/// Leaves of `source` whose counterpart in `existing` is missing or blank
pub fn collect_missing(source: &Value, existing: &Value) -> Vec<Leaf> {
    collect_leaves(source)
        .into_iter()
        .filter(|leaf| is_blank(get_at(existing, &leaf.path)))
        .collect()
}

pub fn get_at<'a>(tree: &'a Value, path: &[Segment]) -> Option<&'a Value> {
    path.iter().try_fold(tree, |node, segment| match segment {
        Segment::Key(key) => node.get(key.as_str()),
        Segment::Index(i) => node.get(*i),
    })
}

/// Set the value at `path`, creating objects for missing keys.
///
/// Returns `false` when the path runs through a scalar or past the end of an array.
pub fn set_at(tree: &mut Value, path: &[Segment], value: Value) -> bool {
    let Some((last, parents)) = path.split_last() else {
        *tree = value;
        return true;
    };
    let mut node = tree;
    for segment in parents {
        node = match (segment, node) {
            (Segment::Key(key), Value::Object(map)) => {
                map.entry(key.clone()).or_insert_with(|| Value::Object(Map::new()))
            }
            (Segment::Index(i), Value::Array(items)) => match items.get_mut(*i) {
                Some(item) => item,
                None => return false,
            },
            _ => return false,
        };
    }
    match (last, node) {
        (Segment::Key(key), Value::Object(map)) => {
            map.insert(key.clone(), value);
            true
        }
        (Segment::Index(i), Value::Array(items)) => match items.get_mut(*i) {
            Some(item) => {
                *item = value;
                true
            }
            None => false,
        },
        _ => false,
    }
}

fn is_container(value: &Value) -> bool {
    value.is_object() || value.is_array()
}

/// `existing` with every blank or missing entry of `source` filled from `source`.
///
/// Entries only present in `existing` are kept. Nested objects are merged key by key.
/// Where `existing` holds a scalar and `source` an object or array, the source wins
/// so that every leaf [`collect_missing`] reports has somewhere to go.
pub fn fill_from(existing: &Value, source: &Value) -> Value {
    match (existing, source) {
        (Value::Object(target), Value::Object(src)) => {
            let mut merged = target.clone();
            for (key, value) in src {
                let next = match target.get(key) {
                    Some(current) if current.is_object() && value.is_object() => {
                        fill_from(current, value)
                    }
                    // A plain entry that became a section takes the source's shape
                    Some(current) if !is_container(current) && is_container(value) => {
                        value.clone()
                    }
                    current if is_blank(current) => value.clone(),
                    Some(current) => current.clone(),
                    None => value.clone(),
                };
                merged.insert(key.clone(), next);
            }
            Value::Object(merged)
        }
        (current, src) if is_blank(Some(current)) => src.clone(),
        (current, _) => current.clone(),
    }
}

/// Base structure of a new translation file
pub fn skeleton() -> Value {
    json!({
        "common": {
            "actions": {},
            "labels": {},
            "messages": {},
            "navigation": {}
        },
        "business": {
            "cocktail": {},
            "user": {},
            "collection": {},
            "categories": {},
            "badges": {}
        },
        "pages": {},
        "offline": {},
        "errors": {},
        "success": {},
        "filters": {},
        "contextMenu": {},
        "input": {},
        "lists": {},
        "header": {},
        "option": {}
    })
}
