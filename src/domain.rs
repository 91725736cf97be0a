//! Domain models: quiz questions, lessons, difficulty levels and content provenance.

use serde::{Deserialize, Serialize};

/// Number of questions every quiz carries.
pub const QUIZ_LENGTH: usize = 5;

/// Number of answer options every question carries.
pub const OPTIONS_PER_QUESTION: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
  pub question: String,
  pub options: Vec<String>,
  pub correct_answer: String,
  pub explanation: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonSection {
  pub heading: String,
  pub content: String,
  pub emoji: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
  pub title: String,
  pub sections: Vec<LessonSection>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  pub fn as_str(&self) -> &'static str {
    match self {
      Difficulty::Easy => "easy",
      Difficulty::Medium => "medium",
      Difficulty::Hard => "hard",
    }
  }

  /// Age band the model should aim for.
  pub fn guide(&self) -> &'static str {
    match self {
      Difficulty::Easy => "simple facts and basic concepts, suitable for ages 6-8",
      Difficulty::Medium => "interesting facts with some reasoning, suitable for ages 9-11",
      Difficulty::Hard => "complex concepts and critical thinking, suitable for ages 12+",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "easy" => Some(Difficulty::Easy),
      "medium" => Some(Difficulty::Medium),
      "hard" => Some(Difficulty::Hard),
      _ => None,
    }
  }
}

impl std::fmt::Display for Difficulty {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Where did the served content come from?
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentSource {
  Generated, // model output, fully validated
  Mixed,     // model output topped up from the fallback store
  Fallback,  // static fallback content only
}

/// Quiz plus diagnostics about how it was assembled.
#[derive(Clone, Debug)]
pub struct QuizOutcome {
  pub questions: Vec<QuizQuestion>,
  pub source: ContentSource,
  /// Model-produced questions that failed validation.
  pub dropped: usize,
}

#[derive(Clone, Debug)]
pub struct LessonOutcome {
  pub lesson: Lesson,
  pub source: ContentSource,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn difficulty_parses_case_insensitively() {
    assert_eq!(Difficulty::parse(" HARD "), Some(Difficulty::Hard));
    assert_eq!(Difficulty::parse("easy"), Some(Difficulty::Easy));
    assert_eq!(Difficulty::parse("expert"), None);
    assert_eq!(Difficulty::default(), Difficulty::Medium);
  }

  #[test]
  fn question_serializes_with_camel_case_answer() {
    let q = QuizQuestion {
      question: "Q".into(),
      options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
      correct_answer: "a".into(),
      explanation: "E".into(),
    };
    let v = serde_json::to_value(&q).unwrap();
    assert_eq!(v["correctAnswer"], "a");
    assert!(v.get("correct_answer").is_none());
  }
}
