//! Raw entity record model
//!
//! Mirrors the wikibase entity JSON shape: language-keyed labels,
//! descriptions and aliases plus a map of property id to claim list.
//! Claim order within a property and property order within the record
//! are both significant downstream, so the claims map is kept as an
//! ordered list of pairs rather than a `HashMap`.

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;
use std::fmt;

/// Display language used for labels, descriptions and aliases
pub const DISPLAY_LANG: &str = "en";

/// A language-tagged value (`{"language": "en", "value": "..."}`).
/// Only the value field matters here; the language is the map key.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LangValue {
    pub value: String,
}

/// Preference tag on a claim, used to pick the authoritative value
/// when a property carries several.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Preferred,
    #[default]
    Normal,
    Deprecated,
}

/// The `datavalue` of a snak: an opaque typed payload.
///
/// The payload shape depends on the snak datatype and is decoded lazily
/// by [`crate::value::TypedValue`]; keeping it as raw JSON lets unknown
/// datatypes pass through unmodified.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataValue {
    pub value: serde_json::Value,
    #[serde(rename = "type", default)]
    pub value_type: Option<String>,
}

/// A property snak: datatype tag plus optional payload.
/// A missing `datavalue` means "no value" and renders as such.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Snak {
    pub datatype: String,
    #[serde(default)]
    pub datavalue: Option<DataValue>,
}

/// One value attached to a property on an entity, with a rank.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claim {
    #[serde(default)]
    pub rank: Rank,
    pub mainsnak: Snak,
}

/// Ordered property-id → claims mapping.
///
/// Invariant: all claims under one property id share a datatype.
pub type ClaimMap = Vec<(String, Vec<Claim>)>;

/// A raw entity record as fetched from the knowledge base.
#[derive(Debug, Clone, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    #[serde(default)]
    pub labels: HashMap<String, LangValue>,
    #[serde(default)]
    pub descriptions: HashMap<String, LangValue>,
    #[serde(default)]
    pub aliases: HashMap<String, Vec<LangValue>>,
    #[serde(default, deserialize_with = "ordered_claims")]
    pub claims: ClaimMap,
}

impl EntityRecord {
    /// English label, required for both output modes.
    pub fn display_label(&self) -> Option<&str> {
        self.labels.get(DISPLAY_LANG).map(|v| v.value.as_str())
    }

    /// English description, or empty when absent.
    pub fn display_description(&self) -> &str {
        self.descriptions
            .get(DISPLAY_LANG)
            .map(|v| v.value.as_str())
            .unwrap_or("")
    }

    /// English aliases in source order (empty when absent).
    pub fn display_aliases(&self) -> Vec<&str> {
        self.aliases
            .get(DISPLAY_LANG)
            .map(|list| list.iter().map(|v| v.value.as_str()).collect())
            .unwrap_or_default()
    }
}

/// Deserialize a JSON object into a Vec of pairs, keeping source order.
fn ordered_claims<'de, D>(deserializer: D) -> Result<ClaimMap, D::Error>
where
    D: Deserializer<'de>,
{
    struct ClaimMapVisitor;

    impl<'de> Visitor<'de> for ClaimMapVisitor {
        type Value = ClaimMap;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of property id to claim list")
        }

        fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut entries = ClaimMap::with_capacity(access.size_hint().unwrap_or(0));
            while let Some((key, value)) = access.next_entry::<String, Vec<Claim>>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(ClaimMapVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claims_preserve_source_order() {
        let json = r#"{
            "id": "Q1",
            "labels": {"en": {"value": "Universe"}},
            "claims": {
                "P31": [{"rank": "normal", "mainsnak": {"datatype": "wikibase-item"}}],
                "P18": [{"rank": "normal", "mainsnak": {"datatype": "commonsMedia"}}],
                "P2": [{"rank": "normal", "mainsnak": {"datatype": "string"}}]
            }
        }"#;
        let record: EntityRecord = serde_json::from_str(json).unwrap();
        let keys: Vec<_> = record.claims.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["P31", "P18", "P2"]);
    }

    #[test]
    fn missing_label_and_description_defaults() {
        let json = r#"{"id": "Q5", "labels": {"de": {"value": "Mensch"}}}"#;
        let record: EntityRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.display_label(), None);
        assert_eq!(record.display_description(), "");
        assert!(record.display_aliases().is_empty());
    }

    #[test]
    fn rank_defaults_to_normal() {
        let json = r#"{"mainsnak": {"datatype": "string", "datavalue": {"value": "x"}}}"#;
        let claim: Claim = serde_json::from_str(json).unwrap();
        assert_eq!(claim.rank, Rank::Normal);
    }
}
