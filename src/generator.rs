//! Content generation pipeline: prompt → model → extract → validate → top-up.
//!
//! `generate_quiz` and `generate_lesson` never fail. Any error on the way
//! resolves to fallback content, and quizzes with too few usable questions
//! are topped up from the fallback set. `expand_section` has no fallback and
//! returns the model error to the caller.
//!
//! Each call makes at most one model request. Nothing is cached or shared
//! between calls.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::config::{GenerationSettings, Prompts};
use crate::domain::{
  ContentSource, Difficulty, Lesson, LessonOutcome, QuizOutcome, QuizQuestion, QUIZ_LENGTH,
};
use crate::error::GenError;
use crate::extract::{Extractor, GreedyBraceExtractor};
use crate::model::{GenerationOptions, SharedModel};
use crate::seeds::{fallback_lesson, fallback_quiz};
use crate::topics::topic_description;
use crate::util::{fill_template, trunc_for_log};
use crate::validate::{question_candidates, validate_lesson, validate_question};

#[derive(Clone)]
pub struct ContentGenerator {
  model: SharedModel,
  extractor: Arc<dyn Extractor>,
  prompts: Prompts,
  settings: GenerationSettings,
}

impl ContentGenerator {
  pub fn new(model: SharedModel, prompts: Prompts, settings: GenerationSettings) -> Self {
    Self { model, extractor: Arc::new(GreedyBraceExtractor), prompts, settings }
  }

  #[cfg(test)]
  pub fn with_extractor(mut self, extractor: Arc<dyn Extractor>) -> Self {
    self.extractor = extractor;
    self
  }

  pub fn model_name(&self) -> &str {
    self.model.name()
  }

  pub fn settings(&self) -> &GenerationSettings {
    &self.settings
  }

  fn quiz_prompt(&self, topic: &str, difficulty: Difficulty) -> String {
    fill_template(
      &self.prompts.quiz_template,
      &[
        ("topic_context", topic_description(topic)),
        ("difficulty", difficulty.as_str()),
        ("difficulty_guide", difficulty.guide()),
      ],
    )
  }

  fn lesson_prompt(&self, topic: &str) -> String {
    fill_template(&self.prompts.lesson_template, &[("topic", topic)])
  }

  fn quiz_options(&self) -> GenerationOptions {
    GenerationOptions {
      max_tokens: Some(self.settings.quiz_max_tokens),
      temperature: self.settings.quiz_temperature,
      json_response: true,
    }
  }

  fn lesson_options(&self) -> GenerationOptions {
    GenerationOptions {
      max_tokens: Some(self.settings.lesson_max_tokens),
      temperature: self.settings.lesson_temperature,
      json_response: true,
    }
  }

  fn expand_options(&self) -> GenerationOptions {
    GenerationOptions {
      max_tokens: Some(self.settings.expand_max_tokens),
      temperature: self.settings.expand_temperature,
      json_response: false,
    }
  }

  /// Always returns exactly `QUIZ_LENGTH` valid questions.
  #[instrument(level = "info", skip(self), fields(model = %self.model.name()))]
  pub async fn generate_quiz(&self, topic: &str, difficulty: Difficulty) -> QuizOutcome {
    match self.try_quiz(topic, difficulty).await {
      Ok(outcome) => outcome,
      Err(e) => {
        warn!(target: "content", %topic, %difficulty, error = %e, "Quiz generation failed; serving fallback quiz");
        QuizOutcome { questions: fallback_quiz(), source: ContentSource::Fallback, dropped: 0 }
      }
    }
  }

  async fn try_quiz(&self, topic: &str, difficulty: Difficulty) -> Result<QuizOutcome, GenError> {
    let prompt = self.quiz_prompt(topic, difficulty);
    let raw = self.model.complete(&prompt, &self.quiz_options()).await?;
    debug!(target: "content", raw = %trunc_for_log(&raw, 400), "Quiz completion received");

    let payload = self.extractor.extract(&raw)?;
    let candidates = question_candidates(&payload)?;

    let mut questions: Vec<QuizQuestion> = Vec::with_capacity(QUIZ_LENGTH);
    let mut dropped = 0usize;
    for (index, candidate) in candidates.iter().enumerate() {
      match validate_question(candidate) {
        Some(q) => questions.push(q),
        None => {
          dropped += 1;
          debug!(target: "content", index, "Dropping invalid question");
        }
      }
    }
    questions.truncate(QUIZ_LENGTH);

    let survivors = questions.len();
    let source = match survivors {
      0 => ContentSource::Fallback,
      n if n < QUIZ_LENGTH => ContentSource::Mixed,
      _ => ContentSource::Generated,
    };
    top_up(&mut questions);

    if dropped > 0 || survivors < QUIZ_LENGTH {
      warn!(target: "content", %topic, survivors, dropped, topped_up = QUIZ_LENGTH - survivors, "Quiz topped up from fallback set");
    } else {
      info!(target: "content", %topic, %difficulty, "Quiz generated");
    }
    Ok(QuizOutcome { questions, source, dropped })
  }

  /// Always returns a lesson with a title and at least one section.
  #[instrument(level = "info", skip(self), fields(model = %self.model.name()))]
  pub async fn generate_lesson(&self, topic: &str) -> LessonOutcome {
    match self.try_lesson(topic).await {
      Ok(lesson) => {
        info!(target: "content", %topic, sections = lesson.sections.len(), "Lesson generated");
        LessonOutcome { lesson, source: ContentSource::Generated }
      }
      Err(e) => {
        warn!(target: "content", %topic, error = %e, "Lesson generation failed; serving fallback lesson");
        LessonOutcome { lesson: fallback_lesson(topic), source: ContentSource::Fallback }
      }
    }
  }

  async fn try_lesson(&self, topic: &str) -> Result<Lesson, GenError> {
    let prompt = self.lesson_prompt(topic);
    let raw = self.model.complete(&prompt, &self.lesson_options()).await?;
    debug!(target: "content", raw = %trunc_for_log(&raw, 400), "Lesson completion received");
    let payload = self.extractor.extract(&raw)?;
    validate_lesson(&payload)
  }

  /// Elaborates one lesson section. Failures are returned as-is.
  #[instrument(level = "info", skip(self, content), fields(model = %self.model.name(), content_len = content.len()))]
  pub async fn expand_section(&self, content: &str) -> Result<String, GenError> {
    let prompt = fill_template(&self.prompts.expand_template, &[("content", content)]);
    let text = self.model.complete(&prompt, &self.expand_options()).await?;
    Ok(text.trim().to_string())
  }
}

/// Appends fallback questions in store order until the quiz is full,
/// skipping any whose question text is already present.
fn top_up(questions: &mut Vec<QuizQuestion>) {
  for q in fallback_quiz() {
    if questions.len() >= QUIZ_LENGTH {
      break;
    }
    if questions.iter().all(|existing| existing.question != q.question) {
      questions.push(q);
    }
  }
}
