//! Loading content configuration (prompt templates + generation settings) from TOML.
//!
//! See `ContentConfig`, `Prompts` and `GenerationSettings` for expected schema.
//! Every field is optional; missing ones keep their defaults.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize, Default)]
pub struct ContentConfig {
  #[serde(default)]
  pub prompts: Prompts,
  #[serde(default)]
  pub generation: GenerationSettings,
}

/// Prompt templates sent to the model.
///
/// Placeholders: quiz `{topic_context}`, `{difficulty}`, `{difficulty_guide}`;
/// lesson `{topic}`; expand `{content}`.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Prompts {
  pub quiz_template: String,
  pub lesson_template: String,
  pub expand_template: String,
}

impl Default for Prompts {
  fn default() -> Self {
    Self {
      quiz_template: r#"You are an expert space educator creating a fun quiz for children.

Topic: {topic_context}
Difficulty: {difficulty} ({difficulty_guide})

Create exactly 5 multiple-choice questions, each with exactly 4 answer options. Make them:
- Fun and engaging for kids
- Educational but not boring
- Age-appropriate for the difficulty above
- Strictly about the topic above
- Fact-based (no made-up information)

CRITICAL: Return ONLY valid JSON with no markdown formatting, no code blocks, no explanation.
"correctAnswer" must be copied exactly from one of the options.

Use this EXACT format:
{
  "questions": [
    {
      "question": "What is the largest planet in our solar system?",
      "options": ["Mars", "Jupiter", "Saturn", "Neptune"],
      "correctAnswer": "Jupiter",
      "explanation": "Jupiter is the largest planet and could fit over 1,300 Earths inside it!"
    }
  ]
}

Make explanations fun and memorable for kids!"#
        .into(),
      lesson_template: r#"You are an expert space teacher.

Create a 3-section interactive lesson about "{topic}" for children.

Rules:
- Make it fun and simple.
- Each section must have a heading, content, and an emoji.
- Content must be accurate.
- Do not include markdown.
- Return ONLY valid JSON.

Format:

{
  "title": "string",
  "sections": [
    {
      "heading": "string",
      "content": "string",
      "emoji": "emoji"
    }
  ]
}"#
        .into(),
      expand_template: r#"Expand this lesson section with deeper explanation but keep it child-friendly:

"{content}"

Return plain text only."#
        .into(),
    }
  }
}

/// Sampling budgets per operation, plus the HTTP layer's quiz reuse window.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
  pub quiz_max_tokens: u32,
  pub quiz_temperature: f32,
  pub lesson_max_tokens: u32,
  pub lesson_temperature: f32,
  pub expand_max_tokens: u32,
  pub expand_temperature: f32,
  pub quiz_reuse_secs: u64,
}

impl Default for GenerationSettings {
  fn default() -> Self {
    Self {
      quiz_max_tokens: 2500,
      quiz_temperature: 0.7,
      lesson_max_tokens: 2000,
      lesson_temperature: 0.7,
      expand_max_tokens: 1000,
      expand_temperature: 0.7,
      quiz_reuse_secs: 60,
    }
  }
}

pub fn parse_content_config(s: &str) -> Result<ContentConfig, toml::de::Error> {
  toml::from_str::<ContentConfig>(s)
}

/// Attempt to load `ContentConfig` from CONTENT_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_content_config_from_env() -> Option<ContentConfig> {
  let path = std::env::var("CONTENT_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match parse_content_config(&s) {
      Ok(cfg) => {
        info!(target: "spacey_science", %path, "Loaded content config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "spacey_science", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "spacey_science", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}
