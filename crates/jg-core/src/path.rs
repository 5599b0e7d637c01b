//! Path addressing inside a parsed JSON document.
//!
//! A [`JsonPath`] is the ordered list of object keys and array indices that
//! leads from the document root to a value. It is the durable identity of a
//! graph node: node ids are reassigned on every build, paths are not.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use smallvec::SmallVec;
use std::fmt;

/// One step of a path. `Index(0)` and `Key("0")` are different segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segment {
    Index(usize),
    Key(String),
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

/// Location of a value inside a JSON document. Empty = document root.
///
/// Serializes as a plain JSON array, e.g. `["user", 0, "name"]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JsonPath(SmallVec<[Segment; 4]>);

impl JsonPath {
    /// The root path.
    pub fn root() -> Self {
        Self(SmallVec::new())
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// A new path one level deeper.
    #[must_use]
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut segments = self.0.clone();
        segments.push(segment.into());
        Self(segments)
    }

    /// The enclosing path, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        if self.0.is_empty() {
            return None;
        }
        let mut segments = self.0.clone();
        segments.pop();
        Some(Self(segments))
    }

    /// Follow the path through `doc`.
    ///
    /// Key segments only index objects and index segments only index arrays;
    /// any mismatch or missing entry yields `None`.
    pub fn resolve<'a>(&self, doc: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(doc, |current, segment| match (segment, current) {
            (Segment::Key(key), Value::Object(map)) => map.get(key),
            (Segment::Index(i), Value::Array(items)) => items.get(*i),
            _ => None,
        })
    }

    /// Mutable counterpart of [`resolve`](Self::resolve).
    pub fn resolve_mut<'a>(&self, doc: &'a mut Value) -> Option<&'a mut Value> {
        let mut current = doc;
        for segment in &self.0 {
            current = match (segment, current) {
                (Segment::Key(key), Value::Object(map)) => map.get_mut(key)?,
                (Segment::Index(i), Value::Array(items)) => items.get_mut(*i)?,
                _ => return None,
            };
        }
        Some(current)
    }

    /// RFC 6901 JSON Pointer form (`""` for root, `/a/0/b` otherwise).
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.0 {
            out.push('/');
            match segment {
                Segment::Key(key) => out.push_str(&key.replace('~', "~0").replace('/', "~1")),
                Segment::Index(i) => out.push_str(&i.to_string()),
            }
        }
        out
    }
}

impl<S: Into<Segment>> FromIterator<S> for JsonPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Inspector form: `$` for root, otherwise `$["customer"][0]`.
impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                Segment::Key(key) => {
                    let escaped = key.replace('\\', "\\\\").replace('"', "\\\"");
                    write!(f, "[\"{escaped}\"]")?;
                }
                Segment::Index(i) => write!(f, "[{i}]")?,
            }
        }
        Ok(())
    }
}

/// Build a [`JsonPath`] from mixed key/index literals: `json_path!["a", 0, "b"]`.
#[macro_export]
macro_rules! json_path {
    () => { $crate::path::JsonPath::root() };
    ($($seg:expr),+ $(,)?) => {
        [$($crate::path::Segment::from($seg)),+]
            .into_iter()
            .collect::<$crate::path::JsonPath>()
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_nested() {
        let doc = json!({"a": [{"b": 7}]});
        let path = json_path!["a", 0, "b"];
        assert_eq!(path.resolve(&doc), Some(&json!(7)));
        assert_eq!(JsonPath::root().resolve(&doc), Some(&doc));
    }

    #[test]
    fn resolve_rejects_mismatched_segment_kinds() {
        let doc = json!({"a": [{"b": 7}], "m": {"0": true}});
        assert_eq!(json_path!["a", "0", "b"].resolve(&doc), None);
        assert_eq!(json_path!["m", 0].resolve(&doc), None);
        assert_eq!(json_path!["m", "0"].resolve(&doc), Some(&json!(true)));
    }

    #[test]
    fn resolve_mut_writes_through() {
        let mut doc = json!({"user": {"name": "Apple"}});
        if let Some(Value::Object(user)) = json_path!["user"].resolve_mut(&mut doc) {
            user.insert("name".into(), json!("Banana"));
        }
        assert_eq!(doc, json!({"user": {"name": "Banana"}}));
        assert!(json_path!["nope"].resolve_mut(&mut doc).is_none());
    }

    #[test]
    fn structural_equality() {
        let a = json_path!["a", 0, "b"];
        let b: JsonPath = vec![Segment::from("a"), Segment::from(0), Segment::from("b")]
            .into_iter()
            .collect();
        assert_eq!(a, b);
        assert_ne!(a, json_path!["a", "0", "b"]);
        assert_ne!(a, json_path!["a", 0]);
    }

    #[test]
    fn display_and_pointer() {
        assert_eq!(JsonPath::root().to_string(), "$");
        assert_eq!(json_path!["customer", 0].to_string(), "$[\"customer\"][0]");
        assert_eq!(json_path!["a/b", "c~d", 3].to_pointer(), "/a~1b/c~0d/3");
        assert_eq!(JsonPath::root().to_pointer(), "");
    }

    #[test]
    fn serde_shape_is_plain_array() {
        let path = json_path!["a", 0];
        let encoded = serde_json::to_string(&path).unwrap();
        assert_eq!(encoded, r#"["a",0]"#);
        let decoded: JsonPath = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, path);
    }

    #[test]
    fn parent_and_child() {
        let path = json_path!["a", 1];
        assert_eq!(path.parent(), Some(json_path!["a"]));
        assert_eq!(json_path!["a"].child(1usize), path);
        assert_eq!(JsonPath::root().parent(), None);
        assert_eq!(path.len(), 2);
        assert!(JsonPath::root().is_root());
        assert!(!path.is_root());
    }
}
