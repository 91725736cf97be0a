//! Shape checks for parsed model payloads.
//!
//! Quizzes are salvaged question by question: a bad question is dropped and
//! the rest survive. Lessons are all-or-nothing at the top level (title and
//! section list), while individual sections are accepted as they come.

use std::collections::HashSet;

use serde_json::Value;

use crate::domain::{Lesson, LessonSection, QuizQuestion, OPTIONS_PER_QUESTION};
use crate::error::GenError;

fn text(v: &Value, key: &str) -> Option<String> {
  let s = v.get(key)?.as_str()?.trim();
  if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Returns the question list of a quiz payload.
pub fn question_candidates(payload: &Value) -> Result<&[Value], GenError> {
  payload
    .get("questions")
    .and_then(Value::as_array)
    .map(Vec::as_slice)
    .ok_or_else(|| GenError::Structure("payload has no `questions` array".into()))
}

/// Normalizes one candidate question, or `None` if it is unusable.
pub fn validate_question(candidate: &Value) -> Option<QuizQuestion> {
  let question = text(candidate, "question")?;
  let explanation = text(candidate, "explanation")?;
  let correct_answer = text(candidate, "correctAnswer")?;

  let raw_options = candidate.get("options")?.as_array()?;
  if raw_options.len() != OPTIONS_PER_QUESTION {
    return None;
  }
  let mut options = Vec::with_capacity(OPTIONS_PER_QUESTION);
  for o in raw_options {
    let o = o.as_str()?.trim();
    if o.is_empty() {
      return None;
    }
    options.push(o.to_string());
  }

  let distinct: HashSet<&String> = options.iter().collect();
  if distinct.len() != OPTIONS_PER_QUESTION || !options.contains(&correct_answer) {
    return None;
  }

  Some(QuizQuestion { question, options, correct_answer, explanation })
}

fn lenient_section(v: &Value) -> LessonSection {
  match v {
    Value::Object(_) => LessonSection {
      heading: text(v, "heading").unwrap_or_default(),
      content: text(v, "content").unwrap_or_default(),
      emoji: text(v, "emoji").unwrap_or_default(),
    },
    Value::String(s) => LessonSection { heading: String::new(), content: s.trim().to_string(), emoji: String::new() },
    other => LessonSection { heading: String::new(), content: other.to_string(), emoji: String::new() },
  }
}

/// Accepts a lesson payload with a title and a non-empty section list.
pub fn validate_lesson(payload: &Value) -> Result<Lesson, GenError> {
  let title = text(payload, "title").ok_or_else(|| GenError::Structure("lesson has no title".into()))?;
  let sections = payload
    .get("sections")
    .and_then(Value::as_array)
    .ok_or_else(|| GenError::Structure("lesson `sections` is not a list".into()))?;
  if sections.is_empty() {
    return Err(GenError::Structure("lesson has no sections".into()));
  }
  Ok(Lesson { title, sections: sections.iter().map(lenient_section).collect() })
}
