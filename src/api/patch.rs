use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// One RFC 6902 operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

/// A JSON Patch document as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPatch(pub Vec<PatchOperation>);

#[derive(Debug, Error, PartialEq)]
pub enum PatchError {
    #[error("The path '{0}' is not a valid JSON pointer.")]
    InvalidPath(String),

    #[error("The target location specified by path segment '{0}' was not found.")]
    PathNotFound(String),

    #[error("The current value at path '{0}' is not equal to the test value.")]
    TestFailed(String),

    #[error("The patched document is not valid: {0}")]
    InvalidDocument(String),
}

impl JsonPatch {
    /// Apply every operation, or none of them.
    pub fn apply(&self, doc: &mut Value) -> Result<(), PatchError> {
        let mut working = doc.clone();
        for operation in &self.0 {
            apply_operation(&mut working, operation)?;
        }
        *doc = working;
        Ok(())
    }

    /// Patch a typed document.
    ///
    /// Operations may only touch properties the type already serializes;
    /// new top-level members are rejected.
    pub fn apply_to<T>(&self, target: &T) -> Result<T, PatchError>
    where
        T: Serialize + DeserializeOwned,
    {
        let mut doc = serde_json::to_value(target).map_err(|e| PatchError::InvalidDocument(e.to_string()))?;
        let known: Vec<String> = match &doc {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => vec![],
        };

        self.apply(&mut doc)?;

        if let Value::Object(map) = &doc {
            if let Some(unknown) = map.keys().find(|k| !known.contains(k)) {
                return Err(PatchError::PathNotFound(unknown.clone()));
            }
        }

        serde_json::from_value(doc).map_err(|e| PatchError::InvalidDocument(e.to_string()))
    }
}

fn apply_operation(doc: &mut Value, operation: &PatchOperation) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } => add(doc, path, value.clone()),
        PatchOperation::Remove { path } => remove(doc, path).map(|_| ()),
        PatchOperation::Replace { path, value } => {
            let target = get_mut(doc, path)?;
            *target = value.clone();
            Ok(())
        }
        PatchOperation::Move { from, path } => {
            let value = remove(doc, from)?;
            add(doc, path, value)
        }
        PatchOperation::Copy { from, path } => {
            let value = get_mut(doc, from)?.clone();
            add(doc, path, value)
        }
        PatchOperation::Test { path, value } => {
            if *get_mut(doc, path)? == *value {
                Ok(())
            } else {
                Err(PatchError::TestFailed(path.clone()))
            }
        }
    }
}

/// Split a pointer into unescaped reference tokens.
fn tokens(path: &str) -> Result<Vec<String>, PatchError> {
    if path.is_empty() {
        return Ok(vec![]);
    }
    let Some(rest) = path.strip_prefix('/') else {
        return Err(PatchError::InvalidPath(path.to_string()));
    };
    Ok(rest.split('/').map(|t| t.replace("~1", "/").replace("~0", "~")).collect())
}

/// Object keys match exactly first, then ignoring ASCII case.
fn object_key(map: &serde_json::Map<String, Value>, token: &str) -> Option<String> {
    if map.contains_key(token) {
        return Some(token.to_string());
    }
    map.keys().find(|k| k.eq_ignore_ascii_case(token)).cloned()
}

fn array_index(token: &str, len: usize, allow_end: bool) -> Result<usize, PatchError> {
    if allow_end && token == "-" {
        return Ok(len);
    }
    let index: usize = token.parse().map_err(|_| PatchError::PathNotFound(token.to_string()))?;
    let limit = if allow_end { len } else { len.saturating_sub(1) };
    if len == 0 && !allow_end || index > limit {
        return Err(PatchError::PathNotFound(token.to_string()));
    }
    Ok(index)
}

fn step<'a>(current: &'a mut Value, token: &str) -> Result<&'a mut Value, PatchError> {
    match current {
        Value::Object(map) => {
            let key = object_key(map, token).ok_or_else(|| PatchError::PathNotFound(token.to_string()))?;
            map.get_mut(&key).ok_or_else(|| PatchError::PathNotFound(token.to_string()))
        }
        Value::Array(items) => {
            let index = array_index(token, items.len(), false)?;
            items.get_mut(index).ok_or_else(|| PatchError::PathNotFound(token.to_string()))
        }
        _ => Err(PatchError::PathNotFound(token.to_string())),
    }
}

fn get_mut<'a>(doc: &'a mut Value, path: &str) -> Result<&'a mut Value, PatchError> {
    let mut current = doc;
    for token in tokens(path)? {
        current = step(current, &token)?;
    }
    Ok(current)
}

fn parent<'a>(doc: &'a mut Value, path: &str) -> Result<(&'a mut Value, String), PatchError> {
    let mut parts = tokens(path)?;
    let last = parts.pop().ok_or_else(|| PatchError::InvalidPath(path.to_string()))?;
    let mut current = doc;
    for token in parts {
        current = step(current, &token)?;
    }
    Ok((current, last))
}

fn add(doc: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (target, last) = parent(doc, path)?;
    match target {
        Value::Object(map) => {
            let key = object_key(map, &last).unwrap_or(last);
            map.insert(key, value);
            Ok(())
        }
        Value::Array(items) => {
            let index = array_index(&last, items.len(), true)?;
            items.insert(index, value);
            Ok(())
        }
        _ => Err(PatchError::PathNotFound(last)),
    }
}

fn remove(doc: &mut Value, path: &str) -> Result<Value, PatchError> {
    let (target, last) = parent(doc, path)?;
    match target {
        Value::Object(map) => {
            let key = object_key(map, &last).ok_or_else(|| PatchError::PathNotFound(last.clone()))?;
            map.remove(&key).ok_or(PatchError::PathNotFound(last))
        }
        Value::Array(items) => {
            let index = array_index(&last, items.len(), false)?;
            Ok(items.remove(index))
        }
        _ => Err(PatchError::PathNotFound(last)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn patch(ops: Value) -> JsonPatch {
        serde_json::from_value(ops).unwrap()
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Target {
        name: Option<String>,
        age: Option<i32>,
    }

    #[test]
    fn parses_operation_names() {
        let p = patch(json!([
            { "op": "replace", "path": "/age", "value": 30 },
            { "op": "remove", "path": "/name" },
            { "op": "copy", "from": "/a", "path": "/b" }
        ]));
        assert_eq!(p.0.len(), 3);
        assert!(matches!(p.0[1], PatchOperation::Remove { .. }));
    }

    #[test]
    fn replace_and_remove_on_typed_target() {
        let target = Target { name: Some("Sam".into()), age: Some(26) };
        let p = patch(json!([
            { "op": "replace", "path": "/Age", "value": 28 },
            { "op": "remove", "path": "/name" }
        ]));
        let patched = p.apply_to(&target).unwrap();
        assert_eq!(patched, Target { name: None, age: Some(28) });
    }

    #[test]
    fn unknown_member_is_rejected() {
        let target = Target { name: Some("Sam".into()), age: Some(26) };
        let p = patch(json!([{ "op": "add", "path": "/salary", "value": 1 }]));
        assert_eq!(p.apply_to(&target), Err(PatchError::PathNotFound("salary".into())));

        let p = patch(json!([{ "op": "replace", "path": "/salary", "value": 1 }]));
        assert_eq!(p.apply_to(&target), Err(PatchError::PathNotFound("salary".into())));
    }

    #[test]
    fn failed_test_leaves_document_untouched() {
        let mut doc = json!({ "name": "Sam", "tags": ["a"] });
        let p = patch(json!([
            { "op": "add", "path": "/tags/-", "value": "b" },
            { "op": "test", "path": "/name", "value": "Kim" }
        ]));
        assert_eq!(p.apply(&mut doc), Err(PatchError::TestFailed("/name".into())));
        assert_eq!(doc, json!({ "name": "Sam", "tags": ["a"] }));
    }

    #[test]
    fn move_and_copy_within_arrays() {
        let mut doc = json!({ "a": [1, 2], "b": [] });
        let p = patch(json!([
            { "op": "move", "from": "/a/0", "path": "/b/0" },
            { "op": "copy", "from": "/a/0", "path": "/a/-" }
        ]));
        p.apply(&mut doc).unwrap();
        assert_eq!(doc, json!({ "a": [2, 2], "b": [1] }));
    }

    #[test]
    fn wrongly_typed_value_is_invalid_document() {
        let target = Target { name: Some("Sam".into()), age: Some(26) };
        let p = patch(json!([{ "op": "replace", "path": "/age", "value": "old" }]));
        assert!(matches!(p.apply_to(&target), Err(PatchError::InvalidDocument(_))));
    }
}
