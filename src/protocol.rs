//! Public HTTP protocol structs (serde ready).
//! Field names follow the JSON the SPA already sends and expects (camelCase,
//! `{ success, data, error }` envelopes).

use axum::{
  extract::{rejection::JsonRejection, FromRequest},
  http::StatusCode,
  response::IntoResponse,
  Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::{ContentSource, Lesson};
use crate::state::StoredQuiz;
use crate::topics::Topic;

/// `Json` extractor whose rejections use the error envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizIn {
  #[serde(default)] pub user_id: Option<String>,
  #[serde(default)] pub topic: String,
  #[serde(default)] pub difficulty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LessonIn {
  #[serde(default)] pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct ExpandIn {
  #[serde(default)] pub section: Option<SectionIn>,
}

#[derive(Debug, Deserialize)]
pub struct SectionIn {
  #[serde(default)] pub content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthOut {
  pub success: bool,
  pub message: String,
  pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct TopicsOut {
  pub success: bool,
  pub data: &'static [Topic],
}

#[derive(Debug, Serialize)]
pub struct QuizOut {
  pub success: bool,
  pub data: StoredQuiz,
  pub cached: bool,
}

#[derive(Debug, Serialize)]
pub struct QuizRecordOut {
  pub success: bool,
  pub data: StoredQuiz,
}

#[derive(Debug, Serialize)]
pub struct QuizListOut {
  pub success: bool,
  pub data: Vec<StoredQuiz>,
}

#[derive(Debug, Serialize)]
pub struct LessonOut {
  pub success: bool,
  pub data: Lesson,
  pub source: ContentSource,
}

#[derive(Debug, Serialize)]
pub struct ExpandOut {
  pub success: bool,
  pub data: String,
}

/// Error reply: `{ "success": false, "error": "..." }` with an HTTP status.
#[derive(Debug)]
pub struct ApiError {
  pub status: StatusCode,
  pub message: String,
}

impl ApiError {
  pub fn bad_request(message: impl Into<String>) -> Self {
    Self { status: StatusCode::BAD_REQUEST, message: message.into() }
  }

  pub fn not_found(message: impl Into<String>) -> Self {
    Self { status: StatusCode::NOT_FOUND, message: message.into() }
  }

  pub fn internal(message: impl Into<String>) -> Self {
    Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into() }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(rejection: JsonRejection) -> Self {
    Self::bad_request(rejection.body_text())
  }
}

#[derive(Serialize)]
struct ErrorOut<'a> {
  success: bool,
  error: &'a str,
}

impl IntoResponse for ApiError {
  fn into_response(self) -> axum::response::Response {
    let body = Json(ErrorOut { success: false, error: &self.message });
    (self.status, body).into_response()
  }
}
