//! Raw bracket-set records as delivered by the bracket service
//!
//! Only the fields the normalizer reads are modelled; everything else in
//! the payload is ignored by serde.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::Path;

/// Stable identifier of an entrant; the bracket service uses integers but
/// string ids are accepted too.
///
/// Ids are compared by their written form, so `42` and `"42"` name the same
/// entrant. Tables and ratings files only carry that form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntrantId {
    Number(i64),
    Text(String),
}

impl fmt::Display for EntrantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntrantId::Number(n) => write!(f, "{}", n),
            EntrantId::Text(s) => f.write_str(s),
        }
    }
}

impl PartialEq for EntrantId {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for EntrantId {}

impl Hash for EntrantId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl Ord for EntrantId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for EntrantId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<i64> for EntrantId {
    fn from(value: i64) -> Self {
        EntrantId::Number(value)
    }
}

impl From<&str> for EntrantId {
    fn from(value: &str) -> Self {
        EntrantId::Text(value.to_string())
    }
}

impl EntrantId {
    /// The id as written to tables and ratings files
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            EntrantId::Number(n) => Cow::Owned(n.to_string()),
            EntrantId::Text(s) => Cow::Borrowed(s),
        }
    }

    /// Parse an id read back from a table field.
    ///
    /// Only fields in canonical integer form become numbers, so the result
    /// always writes back as the same text ("042" stays text).
    pub fn from_field(field: &str) -> Self {
        match field.parse::<i64>() {
            Ok(n) if n.to_string() == field => EntrantId::Number(n),
            _ => EntrantId::Text(field.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawEntrant {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub id: Option<EntrantId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSlot {
    #[serde(default)]
    pub entrant: Option<RawEntrant>,
}

/// One set (scheduled or completed match) from a bracket pool.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSet {
    #[serde(default)]
    pub slots: Vec<RawSlot>,
    #[serde(default)]
    pub display_score: Option<String>,
    #[serde(default)]
    pub identifier: Option<String>,
}

impl RawSet {
    /// Convenience constructor for a two-entrant set.
    pub fn between(
        identifier: &str,
        (name1, id1): (&str, EntrantId),
        (name2, id2): (&str, EntrantId),
        display_score: Option<&str>,
    ) -> Self {
        let slot = |name: &str, id: EntrantId| RawSlot {
            entrant: Some(RawEntrant {
                name: Some(name.to_string()),
                id: Some(id),
            }),
        };
        Self {
            slots: vec![slot(name1, id1), slot(name2, id2)],
            display_score: display_score.map(str::to_string),
            identifier: Some(identifier.to_string()),
        }
    }
}

#[derive(Deserialize)]
struct Nodes {
    nodes: Vec<RawSet>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhaseGroup {
    sets: Nodes,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhaseGroupData {
    phase_group: PhaseGroup,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: PhaseGroupData,
}

/// Accepted layouts of a saved pool.
#[derive(Deserialize)]
#[serde(untagged)]
enum SetsDocument {
    List(Vec<RawSet>),
    Nodes(Nodes),
    Response(GraphQlResponse),
}

impl SetsDocument {
    fn into_sets(self) -> Vec<RawSet> {
        match self {
            SetsDocument::List(sets) => sets,
            SetsDocument::Nodes(nodes) => nodes.nodes,
            SetsDocument::Response(response) => response.data.phase_group.sets.nodes,
        }
    }
}

/// Parse a pool's sets from JSON text.
///
/// Accepts a bare array of sets, an object with a `nodes` array, or a full
/// phase-group query response (`data.phaseGroup.sets.nodes`).
pub fn parse_sets(json: &str) -> Result<Vec<RawSet>> {
    let document: SetsDocument = serde_json::from_str(json)
        .context("Unrecognised set data (expected a list of sets or a phaseGroup response)")?;
    Ok(document.into_sets())
}

/// Load a pool's sets from a JSON file.
pub fn load_sets(path: &Path) -> Result<Vec<RawSet>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_sets(&contents).with_context(|| format!("Failed to parse {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SET_JSON: &str = r#"{
        "id": 77001,
        "identifier": "B",
        "displayScore": "Alice 2 - Bob 0",
        "slots": [
            {"entrant": {"id": 101, "name": "Alice"}},
            {"entrant": {"id": "x-202", "name": "Bob"}}
        ]
    }"#;

    #[test]
    fn test_parse_bare_list() {
        let sets = parse_sets(&format!("[{}]", SET_JSON)).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].identifier.as_deref(), Some("B"));
        assert_eq!(sets[0].display_score.as_deref(), Some("Alice 2 - Bob 0"));
        let entrant = sets[0].slots[1].entrant.as_ref().unwrap();
        assert_eq!(entrant.id, Some(EntrantId::Text("x-202".to_string())));
        assert_eq!(
            sets[0].slots[0].entrant.as_ref().unwrap().id,
            Some(EntrantId::Number(101))
        );
    }

    #[test]
    fn test_parse_graphql_response() {
        let json = format!(
            r#"{{"data": {{"phaseGroup": {{"sets": {{"pageInfo": {{"total": 1}}, "nodes": [{}]}}}}}}}}"#,
            SET_JSON
        );
        let sets = parse_sets(&json).unwrap();
        assert_eq!(sets.len(), 1);
        assert_eq!(sets[0].slots.len(), 2);
    }

    #[test]
    fn test_parse_nodes_object() {
        let json = format!(r#"{{"nodes": [{}, {}]}}"#, SET_JSON, SET_JSON);
        assert_eq!(parse_sets(&json).unwrap().len(), 2);
    }

    #[test]
    fn test_missing_optional_fields() {
        let sets = parse_sets(r#"[{"slots": [{"entrant": null}]}, {}]"#).unwrap();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0].slots[0].entrant, None);
        assert!(sets[1].slots.is_empty());
        assert_eq!(sets[1].display_score, None);
        assert_eq!(sets[1].identifier, None);
    }

    #[test]
    fn test_reject_unrelated_json() {
        assert!(parse_sets(r#"{"errors": [{"message": "Invalid token"}]}"#).is_err());
        assert!(parse_sets("not json").is_err());
    }

    #[test]
    fn test_entrant_id_from_field() {
        assert_eq!(EntrantId::from_field("101"), EntrantId::Number(101));
        assert_eq!(
            EntrantId::from_field("x-202"),
            EntrantId::Text("x-202".to_string())
        );
        assert!(matches!(EntrantId::from_field("042"), EntrantId::Text(_)));
        assert!(matches!(EntrantId::from_field("+42"), EntrantId::Text(_)));
        assert_eq!(EntrantId::from_field("042").key(), "042");
    }

    #[test]
    fn test_ids_compare_by_written_form() {
        assert_eq!(EntrantId::Number(42), EntrantId::from("42"));
        assert_ne!(EntrantId::Number(42), EntrantId::from("042"));
        assert_ne!(EntrantId::Number(42), EntrantId::Number(43));

        let mut seen = std::collections::HashSet::new();
        seen.insert(EntrantId::from("42"));
        assert!(seen.contains(&EntrantId::Number(42)));

        let sets = parse_sets(r#"[{"slots": [{"entrant": {"id": "42", "name": "Al"}}]}]"#).unwrap();
        let text_id = sets[0].slots[0].entrant.as_ref().unwrap().id.clone().unwrap();
        assert!(matches!(text_id, EntrantId::Text(_)));
        assert_eq!(EntrantId::from_field(&text_id.to_string()), text_id);
    }
}
