//! HTTP endpoint handlers. These are thin wrappers that forward to the content
//! generator and the quiz store. Each handler is instrumented and logs its
//! parameters and basic result info.

use std::sync::Arc;

use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use tracing::{error, info, instrument};

use crate::domain::Difficulty;
use crate::protocol::*;
use crate::state::AppState;
use crate::topics::TOPICS;

/// How many quizzes the history endpoint returns.
const USER_HISTORY_LIMIT: usize = 20;

#[instrument(level = "info")]
pub async fn http_root() -> &'static str {
  "🚀 Spacey Science API Running"
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse {
  Json(HealthOut {
    success: true,
    message: "Spacey Science API is running! 🚀".into(),
    timestamp: chrono::Utc::now().to_rfc3339(),
  })
}

#[instrument(level = "info")]
pub async fn http_topics() -> impl IntoResponse {
  Json(TopicsOut { success: true, data: TOPICS })
}

#[instrument(level = "info", skip(state, body), fields(topic = %body.topic, has_user = body.user_id.is_some()))]
pub async fn http_create_quiz(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<QuizIn>,
) -> Result<(StatusCode, Json<QuizOut>), ApiError> {
  let topic = body.topic.trim();
  if topic.is_empty() {
    return Err(ApiError::bad_request("topic is required"));
  }
  let difficulty = match body.difficulty.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
    None => Difficulty::default(),
    Some(d) => Difficulty::parse(d)
      .ok_or_else(|| ApiError::bad_request(format!("difficulty must be easy, medium or hard (got '{d}')")))?,
  };
  let user_id = body.user_id.as_deref().map(str::trim).filter(|u| !u.is_empty());

  let (quiz, cached) = state.create_quiz(user_id, topic, difficulty).await;
  info!(target: "content", id = %quiz.id, %topic, %difficulty, cached, source = ?quiz.source, "HTTP quiz served");
  let status = if cached { StatusCode::OK } else { StatusCode::CREATED };
  Ok((status, Json(QuizOut { success: true, data: quiz, cached })))
}

#[instrument(level = "info", skip(state))]
pub async fn http_get_quiz(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<QuizRecordOut>, ApiError> {
  let quiz = state.get_quiz(&id).await.ok_or_else(|| ApiError::not_found("Quiz not found"))?;
  Ok(Json(QuizRecordOut { success: true, data: quiz }))
}

#[instrument(level = "info", skip(state))]
pub async fn http_user_quizzes(
  State(state): State<Arc<AppState>>,
  Path(user_id): Path<String>,
) -> impl IntoResponse {
  let data = state.quizzes_for_user(&user_id, USER_HISTORY_LIMIT).await;
  Json(QuizListOut { success: true, data })
}

#[instrument(level = "info", skip(state, body), fields(topic = %body.topic))]
pub async fn http_create_lesson(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<LessonIn>,
) -> Result<Json<LessonOut>, ApiError> {
  let topic = body.topic.trim();
  if topic.is_empty() {
    return Err(ApiError::bad_request("Topic is required"));
  }
  let outcome = state.generator.generate_lesson(topic).await;
  info!(target: "content", %topic, source = ?outcome.source, sections = outcome.lesson.sections.len(), "HTTP lesson served");
  Ok(Json(LessonOut { success: true, data: outcome.lesson, source: outcome.source }))
}

#[instrument(level = "info", skip(state, body))]
pub async fn http_expand_section(
  State(state): State<Arc<AppState>>,
  ApiJson(body): ApiJson<ExpandIn>,
) -> Result<Json<ExpandOut>, ApiError> {
  let content = body
    .section
    .and_then(|s| s.content)
    .map(|c| c.trim().to_string())
    .filter(|c| !c.is_empty())
    .ok_or_else(|| ApiError::bad_request("Section content is required"))?;

  match state.generator.expand_section(&content).await {
    Ok(data) => Ok(Json(ExpandOut { success: true, data })),
    Err(e) => {
      error!(target: "content", error = %e, "Section expansion failed");
      Err(ApiError::internal(e.to_string()))
    }
  }
}
