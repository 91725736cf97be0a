//! Error kinds produced by the content generation pipeline.
//!
//! Quiz and lesson generation swallow all of these and serve fallback content.
//! Section expansion hands them to the caller untouched.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenError {
  /// No structured block in the model text, or the block is not valid JSON.
  #[error("extraction failed: {0}")]
  Extraction(String),

  /// Parsed payload lacks the minimum shape (missing title, missing item list).
  #[error("malformed payload: {0}")]
  Structure(String),

  /// The model call itself failed (network, auth, rate limit, empty completion).
  #[error("generation failed: {0}")]
  Generation(String),
}
