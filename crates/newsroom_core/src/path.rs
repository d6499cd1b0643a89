//! crates/newsroom_core/src/path.rs
//!
//! Generic read/write access into a `NewsIssueDraft` by path, used to drive a
//! property editor that does not know the document shape ahead of time.
//!
//! Paths are parsed once into typed segments, so a malformed path is rejected at
//! construction. Resolution never fails on missing data: reads of absent nodes
//! yield the empty string and writes to absent containers do nothing. Writes go
//! through the document's serde schema, so a write that would not survive
//! deserialization (unknown field, wrong type) is refused and the draft is left
//! untouched.

use crate::domain::{NewsIssueDraft, DEFAULT_SCALE};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use tracing::debug;

const SCALE_FIELD: &str = "scale";

//=========================================================================================
// Path Representation
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
    #[error("empty segment at position {position} in path '{path}'")]
    EmptySegment { path: String, position: usize },
    #[error("invalid character in path segment '{0}'")]
    InvalidSegment(String),
}

/// One step of a path: a named field or a zero-based array index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Field(String),
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Result<Self, PathError> {
        if raw.bytes().all(|b| b.is_ascii_digit()) {
            return raw
                .parse()
                .map(Segment::Index)
                .map_err(|_| PathError::InvalidSegment(raw.to_string()));
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(PathError::InvalidSegment(raw.to_string()));
        }
        Ok(Segment::Field(raw.to_string()))
    }

    pub fn field(name: &str) -> Self {
        Segment::Field(name.to_string())
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Field(name) => f.write_str(name),
            Segment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// A dot-separated address into the document, e.g. `frontPage.newsSnippets.0.title`.
///
/// The empty path addresses the document root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FieldPath {
    segments: Vec<Segment>,
}

impl FieldPath {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn parse(raw: &str) -> Result<Self, PathError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(Self::root());
        }
        let segments = raw
            .split('.')
            .enumerate()
            .map(|(position, part)| {
                if part.is_empty() {
                    Err(PathError::EmptySegment {
                        path: raw.to_string(),
                        position,
                    })
                } else {
                    Segment::parse(part)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    /// The container one level up; `None` for the root itself.
    pub fn parent(&self) -> Option<FieldPath> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    pub fn child(&self, segment: Segment) -> FieldPath {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Appends a further (possibly dotted) path, as in `newsSnippets.0` + `title`.
    pub fn join(&self, tail: &str) -> Result<FieldPath, PathError> {
        let tail = FieldPath::parse(tail)?;
        let mut segments = self.segments.clone();
        segments.extend(tail.segments);
        Ok(Self { segments })
    }
}

impl FromStr for FieldPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldPath::parse(s)
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

//=========================================================================================
// Tree Walking
//=========================================================================================

fn missing() -> Value {
    Value::String(String::new())
}

fn lookup<'a>(node: &'a Value, segment: &Segment) -> Option<&'a Value> {
    match (node, segment) {
        (Value::Object(map), Segment::Field(name)) => map.get(name),
        (Value::Object(map), Segment::Index(index)) => map.get(&index.to_string()),
        (Value::Array(items), Segment::Index(index)) => items.get(*index),
        _ => None,
    }
}

fn lookup_mut<'a>(node: &'a mut Value, segment: &Segment) -> Option<&'a mut Value> {
    match (node, segment) {
        (Value::Object(map), Segment::Field(name)) => map.get_mut(name),
        (Value::Object(map), Segment::Index(index)) => map.get_mut(&index.to_string()),
        (Value::Array(items), Segment::Index(index)) => items.get_mut(*index),
        _ => None,
    }
}

fn find<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
    path.segments()
        .iter()
        .try_fold(root, |node, segment| lookup(node, segment))
}

/// Reads the value at `path`, or `""` when any step is missing.
pub fn get(doc: &NewsIssueDraft, path: &FieldPath) -> Value {
    if path.is_root() {
        return missing();
    }
    let Ok(root) = serde_json::to_value(doc) else {
        return missing();
    };
    let mut node = &root;
    for segment in path.segments() {
        match lookup(node, segment) {
            Some(next) => node = next,
            None => return missing(),
        }
    }
    match node {
        Value::Null => missing(),
        other => other.clone(),
    }
}

/// Writes `value` at `path`. Returns whether the draft changed shape accordingly;
/// absent containers, unknown fields, the empty path and schema-violating writes
/// are no-ops. Numbers are stored in the field's own type, so an integer written
/// to `scale` reads back as a float of the same value.
pub fn set(doc: &mut NewsIssueDraft, path: &FieldPath, value: Value) -> bool {
    let Some((last, parents)) = path.segments().split_last() else {
        return false;
    };
    let Ok(mut root) = serde_json::to_value(&*doc) else {
        return false;
    };
    let existed = find(&root, path).is_some();

    let mut node = &mut root;
    for segment in parents {
        match lookup_mut(node, segment) {
            Some(next) => node = next,
            None => return false,
        }
    }

    match (node, last) {
        (Value::Object(map), Segment::Field(name)) => {
            map.insert(name.clone(), value.clone());
        }
        (Value::Object(map), Segment::Index(index)) => {
            map.insert(index.to_string(), value.clone());
        }
        (Value::Array(items), Segment::Index(index)) if *index < items.len() => {
            items[*index] = value.clone();
        }
        _ => return false,
    }

    let updated: NewsIssueDraft = match serde_json::from_value(root) {
        Ok(updated) => updated,
        Err(e) => {
            debug!(path = %path, error = %e, "Rejected write that breaks the document schema");
            return false;
        }
    };
    let Ok(reread) = serde_json::to_value(&updated) else {
        return false;
    };
    let stored = match find(&reread, path) {
        Some(stored) => written(&value, stored),
        // Clearing an optional field drops its key.
        None => value.is_null() && existed,
    };
    if !stored {
        debug!(path = %path, "Rejected write to a field the document does not have");
        return false;
    }
    *doc = updated;
    true
}

/// Compares the requested value with what survived the schema round trip.
fn written(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::Null, Value::String(s)) => s.is_empty(),
        (a, b) => a == b,
    }
}

//=========================================================================================
// Scale Resolution
//=========================================================================================

/// Where the `scale` of the selection lives: on the target itself when it is an
/// object, otherwise on its parent container. The root never carries a scale.
pub fn scale_anchor(doc: &NewsIssueDraft, path: &FieldPath) -> Option<FieldPath> {
    if path.is_root() {
        return None;
    }
    let anchor = match get(doc, path) {
        Value::Object(_) => path.clone(),
        _ => path.parent()?,
    };
    (!anchor.is_root()).then_some(anchor)
}

/// The display scale for the selection at `path`, defaulting to 1.
pub fn get_scale(doc: &NewsIssueDraft, path: &FieldPath) -> f64 {
    scale_anchor(doc, path)
        .and_then(|anchor| get(doc, &anchor.child(Segment::field(SCALE_FIELD))).as_f64())
        .unwrap_or(DEFAULT_SCALE)
}

pub fn update_scale(doc: &mut NewsIssueDraft, path: &FieldPath, scale: f64) -> bool {
    if !scale.is_finite() {
        return false;
    }
    let Some(anchor) = scale_anchor(doc, path) else {
        return false;
    };
    set(
        doc,
        &anchor.child(Segment::field(SCALE_FIELD)),
        Value::from(scale),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Section;
    use serde_json::json;

    fn sample() -> NewsIssueDraft {
        let mut draft = NewsIssueDraft::default();
        draft.date = "2025-01-14".to_string();
        draft.front_page.headline = "Headline".to_string();
        draft.front_page.main_story = "Story".to_string();
        draft.front_page.news_snippets = vec![Section::new("S1", "one"), Section::new("S2", "two")];
        draft.front_page.column1 = Section::new("Col", "column body");
        draft.second_page.horoscope = "Stars".to_string();
        draft
    }

    fn path(raw: &str) -> FieldPath {
        FieldPath::parse(raw).unwrap()
    }

    #[test]
    fn parses_fields_and_indices() {
        let p = path("frontPage.newsSnippets.1.title");
        assert_eq!(
            p.segments(),
            &[
                Segment::field("frontPage"),
                Segment::field("newsSnippets"),
                Segment::Index(1),
                Segment::field("title"),
            ]
        );
        assert_eq!(p.to_string(), "frontPage.newsSnippets.1.title");
        assert!(path("").is_root());
    }

    #[test]
    fn rejects_malformed_paths() {
        assert!(matches!(
            FieldPath::parse("frontPage..headline"),
            Err(PathError::EmptySegment { position: 1, .. })
        ));
        assert!(matches!(
            FieldPath::parse("frontPage.head line"),
            Err(PathError::InvalidSegment(_))
        ));
    }

    #[test]
    fn get_reads_nested_values() {
        let doc = sample();
        assert_eq!(get(&doc, &path("frontPage.headline")), json!("Headline"));
        assert_eq!(get(&doc, &path("frontPage.newsSnippets.1.content")), json!("two"));
        assert_eq!(get(&doc, &path("frontPage.column1"))["title"], json!("Col"));
    }

    #[test]
    fn get_returns_empty_string_for_missing_nodes() {
        let doc = sample();
        assert_eq!(get(&doc, &path("frontPage.nothing.deeper")), json!(""));
        assert_eq!(get(&doc, &path("frontPage.newsSnippets.9.title")), json!(""));
        assert_eq!(get(&doc, &path("frontPage.headline.deeper")), json!(""));
        assert_eq!(get(&doc, &path("frontPage.column1.scale")), json!(""));
        assert_eq!(get(&doc, &FieldPath::root()), json!(""));
    }

    #[test]
    fn set_then_get_returns_written_value() {
        let mut doc = sample();
        for (raw, value) in [
            ("frontPage.headline", json!("New headline")),
            ("frontPage.newsSnippets.0.title", json!("Renamed")),
            ("secondPage.editorial.content", json!("Opinion")),
            ("secondPage.horoscope", json!("Clouds")),
            ("location", json!("Duskvol")),
        ] {
            assert!(set(&mut doc, &path(raw), value.clone()), "write to {raw}");
            assert_eq!(get(&doc, &path(raw)), value);
        }
    }

    #[test]
    fn integer_scale_reads_back_as_float() {
        let mut doc = sample();
        let scale = path("frontPage.column1.scale");

        assert!(set(&mut doc, &scale, json!(2)));
        assert_eq!(get(&doc, &scale), json!(2.0));
        assert_eq!(get(&doc, &scale).as_f64(), Some(2.0));

        assert!(set(&mut doc, &scale, json!(null)));
        assert_eq!(get(&doc, &scale), json!(""));
    }

    #[test]
    fn set_with_joined_field_addresses_one_level_further() {
        let mut doc = sample();
        let target = path("frontPage.newsSnippets.1").join("title").unwrap();
        assert!(set(&mut doc, &target, json!("Joined")));
        assert_eq!(doc.front_page.news_snippets[1].title, "Joined");
    }

    #[test]
    fn set_is_a_no_op_on_missing_or_invalid_targets() {
        let mut doc = sample();
        let before = doc.clone();

        assert!(!set(&mut doc, &FieldPath::root(), json!("x")));
        assert!(!set(&mut doc, &path("frontPage.missing.title"), json!("x")));
        assert!(!set(&mut doc, &path("frontPage.newsSnippets.7.title"), json!("x")));
        assert!(!set(&mut doc, &path("frontPage.unknownField"), json!("x")));
        assert!(!set(&mut doc, &path("frontPage.unknownField"), json!("")));
        assert!(!set(&mut doc, &path("frontPage.unknownField"), json!(null)));
        assert!(!set(&mut doc, &path("frontPage.headline"), json!(42)));

        assert_eq!(doc, before);
    }

    #[test]
    fn scale_lives_on_object_targets() {
        let mut doc = sample();
        let column = path("frontPage.column1");
        assert_eq!(get_scale(&doc, &column), 1.0);

        assert!(update_scale(&mut doc, &column, 2.0));
        assert_eq!(get_scale(&doc, &column), 2.0);
        assert_eq!(doc.front_page.column1.scale, Some(2.0));
    }

    #[test]
    fn scale_for_scalar_leaf_lives_on_parent() {
        let mut doc = sample();
        let story = path("frontPage.mainStory");

        assert!(update_scale(&mut doc, &story, 3.0));
        assert_eq!(doc.front_page.scale, Some(3.0));
        assert_eq!(get_scale(&doc, &story), 3.0);

        let snippet_title = path("frontPage.newsSnippets.0.title");
        assert!(update_scale(&mut doc, &snippet_title, 1.5));
        assert_eq!(doc.front_page.news_snippets[0].scale, Some(1.5));
    }

    #[test]
    fn top_level_scalars_have_no_scale() {
        let mut doc = sample();
        let date = path("date");
        assert_eq!(get_scale(&doc, &date), 1.0);
        assert!(!update_scale(&mut doc, &date, 2.0));
        assert!(!update_scale(&mut doc, &path("frontPage.column1"), f64::NAN));
    }
}
