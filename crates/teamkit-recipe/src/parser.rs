//! Frontmatter parsers
//!
//! The document model only needs one capability from a structured-data
//! parser: turn text into a top-level mapping, or fail. `ConfigParser` is
//! that seam; `YamlConfigParser` implements it with `serde_yaml`.
//!
//! Duplicate mapping keys are accepted and the last occurrence wins. A
//! recipe that defines one shared template and then receives the whole
//! shared block still parses.

use crate::error::{RecipeError, RecipeResult};
use serde::de::{
    self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor,
};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Value};
use std::fmt;

/// Parser trait for turning a frontmatter block into a mapping
///
/// Implement this trait to read recipes written in another notation.
pub trait ConfigParser: Send + Sync {
    /// Parse `text` into a top-level mapping
    ///
    /// # Errors
    /// `RecipeError::Parse` when the text is not syntactically valid or its
    /// top level is not a mapping.
    fn parse_mapping(&self, text: &str) -> RecipeResult<Mapping>;

    /// Short name used in diagnostics
    fn name(&self) -> &'static str;
}

/// YAML frontmatter parser
#[derive(Debug, Clone, Copy, Default)]
pub struct YamlConfigParser;

impl YamlConfigParser {
    /// Create new YAML parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ConfigParser for YamlConfigParser {
    fn parse_mapping(&self, text: &str) -> RecipeResult<Mapping> {
        if text.trim().is_empty() {
            return Ok(Mapping::new());
        }

        let LastWins(value) =
            serde_yaml::from_str(text).map_err(|e| RecipeError::parse(e.to_string()))?;

        match value {
            Value::Mapping(map) => Ok(map),
            Value::Null => Ok(Mapping::new()),
            other => Err(RecipeError::parse(format!(
                "expected a mapping at the top level, found {}",
                value_kind(&other)
            ))),
        }
    }

    fn name(&self) -> &'static str {
        "yaml"
    }
}

/// YAML value whose mappings keep the last of duplicate keys
///
/// `serde_yaml::Value` rejects duplicate keys while deserializing.
struct LastWins(Value);

impl<'de> Deserialize<'de> for LastWins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(LastWinsVisitor).map(LastWins)
    }
}

struct LastWinsVisitor;

impl<'de> Visitor<'de> for LastWinsVisitor {
    type Value = Value;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
        Ok(Value::Number(v.into()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
        Ok(Value::String(v.to_owned()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Value, D::Error> {
        LastWins::deserialize(deserializer).map(|v| v.0)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(LastWins(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Value, A::Error> {
        let mut mapping = Mapping::new();
        while let Some((LastWins(key), LastWins(value))) = map.next_entry()? {
            mapping.insert(key, value);
        }
        Ok(Value::Mapping(mapping))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Value, A::Error> {
        let (tag, variant) = data.variant::<String>()?;
        if tag.is_empty() {
            return Err(de::Error::custom("empty YAML tag"));
        }
        let LastWins(value) = variant.newtype_variant()?;
        Ok(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        })))
    }
}

/// Human-readable name of a YAML value's type
#[must_use]
pub fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mapping() {
        let map = YamlConfigParser
            .parse_mapping("kind: team\nname: Clinic\n")
            .unwrap();
        assert_eq!(map.get("kind").and_then(Value::as_str), Some("team"));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn empty_text_is_empty_mapping() {
        assert!(YamlConfigParser.parse_mapping("").unwrap().is_empty());
        assert!(YamlConfigParser.parse_mapping("  \n\n").unwrap().is_empty());
    }

    #[test]
    fn explicit_null_is_empty_mapping() {
        assert!(YamlConfigParser.parse_mapping("~\n").unwrap().is_empty());
    }

    #[test]
    fn syntax_error_is_parse_error() {
        let err = YamlConfigParser
            .parse_mapping("kind: team\nfiles: [unclosed\n")
            .unwrap_err();
        assert!(matches!(err, RecipeError::Parse { .. }));
    }

    #[test]
    fn sequence_top_level_is_parse_error() {
        let err = YamlConfigParser.parse_mapping("- a\n- b\n").unwrap_err();
        assert!(err.to_string().contains("found a sequence"));
    }

    #[test]
    fn scalar_top_level_is_parse_error() {
        let err = YamlConfigParser.parse_mapping("just text").unwrap_err();
        assert!(err.to_string().contains("found a string"));
    }

    #[test]
    fn duplicate_keys_last_one_wins() {
        let map = YamlConfigParser
            .parse_mapping("templates:\n  tools: |\n    shared\n  tools: |\n    mine\nkind: team\n")
            .unwrap();
        let templates = map.get("templates").and_then(Value::as_mapping).unwrap();
        assert_eq!(templates.len(), 1);
        assert_eq!(templates.get("tools").and_then(Value::as_str), Some("mine\n"));
    }

    #[test]
    fn nested_values_keep_their_types() {
        let map = YamlConfigParser
            .parse_mapping("kind: 3\nflag: true\nratio: 0.5\nnone: ~\nfiles: [{template: soul}]\ntagged: !custom x\n")
            .unwrap();
        assert_eq!(map.get("kind").and_then(Value::as_u64), Some(3));
        assert_eq!(map.get("flag").and_then(Value::as_bool), Some(true));
        assert_eq!(map.get("ratio").and_then(Value::as_f64), Some(0.5));
        assert!(map.get("none").is_some_and(Value::is_null));
        assert!(matches!(map.get("tagged"), Some(Value::Tagged(_))));
        let files = map.get("files").and_then(Value::as_sequence).unwrap();
        assert_eq!(files[0].get("template").and_then(Value::as_str), Some("soul"));
    }

    #[test]
    fn parser_name() {
        assert_eq!(YamlConfigParser.name(), "yaml");
    }
}
