//! Locating the JSON payload inside a raw model completion.
//!
//! Models wrap their JSON in code fences or chatty prose despite being told
//! not to. `GreedyBraceExtractor` strips fences and takes everything from the
//! first `{` to the last `}`. That assumes a single top-level object: two
//! sibling objects in one completion come back as one unparsable block.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::error::GenError;
use crate::util::trunc_for_log;

/// Turns raw completion text into a parsed JSON value.
pub trait Extractor: Send + Sync {
  fn extract(&self, raw: &str) -> Result<Value, GenError>;
}

static FENCE: OnceLock<Regex> = OnceLock::new();
static OUTER_OBJECT: OnceLock<Regex> = OnceLock::new();

fn fence() -> &'static Regex {
  FENCE.get_or_init(|| Regex::new(r"(?i)```(?:json)?[ \t]*\r?\n?").expect("invalid fence regex"))
}

fn outer_object() -> &'static Regex {
  OUTER_OBJECT.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("invalid object regex"))
}

#[derive(Clone, Copy, Debug, Default)]
pub struct GreedyBraceExtractor;

impl Extractor for GreedyBraceExtractor {
  fn extract(&self, raw: &str) -> Result<Value, GenError> {
    let cleaned = fence().replace_all(raw.trim(), "");
    let block = outer_object()
      .find(&cleaned)
      .ok_or_else(|| GenError::Extraction(format!("no JSON object in response: {}", trunc_for_log(raw, 120))))?;
    serde_json::from_str(block.as_str()).map_err(|e| GenError::Extraction(format!("invalid JSON: {e}")))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn plain_object() {
    let v = GreedyBraceExtractor.extract(r#"{"title": "Stars"}"#).unwrap();
    assert_eq!(v["title"], "Stars");
  }

  #[test]
  fn strips_code_fences_case_insensitively() {
    let raw = "```JSON\n{\"questions\": []}\n```";
    let v = GreedyBraceExtractor.extract(raw).unwrap();
    assert!(v["questions"].as_array().unwrap().is_empty());

    let raw = "```\n{\"a\": 1}\n```";
    assert_eq!(GreedyBraceExtractor.extract(raw).unwrap()["a"], 1);
  }

  #[test]
  fn ignores_surrounding_prose() {
    let raw = "Sure! Here is your quiz:\n{\"questions\": [{\"q\": \"{nested}\"}]}\nHave fun learning!";
    let v = GreedyBraceExtractor.extract(raw).unwrap();
    assert_eq!(v["questions"][0]["q"], "{nested}");
  }

  #[test]
  fn no_braces_is_an_extraction_error() {
    let err = GreedyBraceExtractor.extract("The Moon is very far away.").unwrap_err();
    assert!(matches!(err, GenError::Extraction(_)));
  }

  #[test]
  fn unparsable_block_is_an_extraction_error() {
    let err = GreedyBraceExtractor.extract("{ title: oops, }").unwrap_err();
    assert!(matches!(err, GenError::Extraction(_)));
  }

  #[test]
  fn sibling_objects_are_matched_greedily_and_rejected() {
    let err = GreedyBraceExtractor.extract(r#"{"a": 1} and {"b": 2}"#).unwrap_err();
    assert!(matches!(err, GenError::Extraction(_)));
  }

  #[test]
  fn empty_text_is_an_extraction_error() {
    assert!(GreedyBraceExtractor.extract("").is_err());
  }
}
