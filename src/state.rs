//! Application state: the content generator and the in-memory quiz store.
//!
//! This module owns:
//!   - the `ContentGenerator` (model client, prompts, generation settings)
//!   - quizzes by id, in insertion order, with a per-user index
//!
//! The store lives only as long as the process. It exists so a client can
//! re-fetch a quiz by id and so a user hammering "generate" for the same
//! topic gets the quiz they just received instead of a new model call.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::config::{load_content_config_from_env, ContentConfig};
use crate::domain::{ContentSource, Difficulty, QuizQuestion};
use crate::generator::ContentGenerator;
use crate::model::model_from_env;

/// Oldest quizzes are evicted past this many.
const MAX_STORED_QUIZZES: usize = 1000;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuiz {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub topic: String,
    pub difficulty: Difficulty,
    pub questions: Vec<QuizQuestion>,
    pub source: ContentSource,
    pub dropped: usize,
    pub generated_at: DateTime<Utc>,
}

#[derive(Default)]
struct QuizStore {
    by_id: HashMap<String, StoredQuiz>,
    order: VecDeque<String>,
    by_user: HashMap<String, Vec<String>>,
}

impl QuizStore {
    fn insert(&mut self, quiz: StoredQuiz) {
        let id = quiz.id.clone();
        if let Some(user) = &quiz.user_id {
            self.by_user.entry(user.clone()).or_default().push(id.clone());
        }
        self.order.push_back(id.clone());
        self.by_id.insert(id, quiz);

        while self.order.len() > MAX_STORED_QUIZZES {
            let Some(old) = self.order.pop_front() else { break };
            if let Some(evicted) = self.by_id.remove(&old) {
                if let Some(user) = evicted.user_id {
                    if let Some(ids) = self.by_user.get_mut(&user) {
                        ids.retain(|i| i != &old);
                        if ids.is_empty() {
                            self.by_user.remove(&user);
                        }
                    }
                }
            }
        }
    }

    /// Newest first.
    fn for_user(&self, user_id: &str) -> impl Iterator<Item = &StoredQuiz> {
        self.by_user
            .get(user_id)
            .into_iter()
            .flat_map(|ids| ids.iter().rev())
            .filter_map(|id| self.by_id.get(id))
    }
}

#[derive(Clone)]
pub struct AppState {
    pub generator: ContentGenerator,
    quizzes: Arc<RwLock<QuizStore>>,
    quiz_reuse: Duration,
}

impl AppState {
    /// Build state from env: load config, pick the model provider.
    #[instrument(level = "info", skip_all)]
    pub fn from_env() -> Self {
        let cfg = load_content_config_from_env().unwrap_or_default();
        let ContentConfig { prompts, generation } = cfg;
        let generator = ContentGenerator::new(model_from_env(), prompts, generation);
        info!(target: "spacey_science", model = %generator.model_name(), reuse_secs = generator.settings().quiz_reuse_secs, "Content generator ready");
        Self::new(generator)
    }

    pub fn new(generator: ContentGenerator) -> Self {
        let quiz_reuse = Duration::from_secs(generator.settings().quiz_reuse_secs);
        Self {
            generator,
            quizzes: Arc::new(RwLock::new(QuizStore::default())),
            quiz_reuse,
        }
    }

    /// Serve the caller's recent quiz for this topic if there is one,
    /// otherwise generate and store a new one. Returns `(quiz, cached)`.
    #[instrument(level = "info", skip(self))]
    pub async fn create_quiz(
        &self,
        user_id: Option<&str>,
        topic: &str,
        difficulty: Difficulty,
    ) -> (StoredQuiz, bool) {
        if let Some(user) = user_id {
            if let Some(recent) = self.recent_quiz(user, topic).await {
                info!(target: "content", id = %recent.id, %topic, "Reusing recent quiz");
                return (recent, true);
            }
        }

        let outcome = self.generator.generate_quiz(topic, difficulty).await;
        let quiz = StoredQuiz {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.map(str::to_string),
            topic: topic.to_string(),
            difficulty,
            questions: outcome.questions,
            source: outcome.source,
            dropped: outcome.dropped,
            generated_at: Utc::now(),
        };
        self.quizzes.write().await.insert(quiz.clone());
        (quiz, false)
    }

    /// Most recent quiz for (user, topic) still inside the reuse window.
    pub async fn recent_quiz(&self, user_id: &str, topic: &str) -> Option<StoredQuiz> {
        if self.quiz_reuse.is_zero() {
            return None;
        }
        let now = Utc::now();
        let store = self.quizzes.read().await;
        let found = store
            .for_user(user_id)
            .find(|q| q.topic == topic)
            .filter(|q| (now - q.generated_at).to_std().map_or(true, |age| age < self.quiz_reuse))
            .cloned();
        found
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn get_quiz(&self, id: &str) -> Option<StoredQuiz> {
        self.quizzes.read().await.by_id.get(id).cloned()
    }

    /// Up to `limit` quizzes for the user, newest first.
    pub async fn quizzes_for_user(&self, user_id: &str, limit: usize) -> Vec<StoredQuiz> {
        self.quizzes.read().await.for_user(user_id).take(limit).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GenerationSettings, Prompts};
    use crate::model::{GenerationOptions, TextModel};
    use crate::error::GenError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingModel {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl TextModel for CountingModel {
        async fn complete(&self, _prompt: &str, _opts: &GenerationOptions) -> Result<String, GenError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(GenError::Generation("offline".into()))
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn state(model: Arc<CountingModel>, reuse_secs: u64) -> AppState {
        let settings = GenerationSettings { quiz_reuse_secs: reuse_secs, ..Default::default() };
        AppState::new(ContentGenerator::new(model, Prompts::default(), settings))
    }

    #[tokio::test]
    async fn same_user_and_topic_reuses_recent_quiz() {
        let model = Arc::new(CountingModel::default());
        let state = state(model.clone(), 60);

        let (first, cached) = state.create_quiz(Some("u1"), "mars", Difficulty::Easy).await;
        assert!(!cached);
        let (second, cached) = state.create_quiz(Some("u1"), "mars", Difficulty::Hard).await;
        assert!(cached);
        assert_eq!(first.id, second.id);
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn other_topic_or_user_generates_again() {
        let model = Arc::new(CountingModel::default());
        let state = state(model.clone(), 60);

        state.create_quiz(Some("u1"), "mars", Difficulty::Easy).await;
        let (_, cached) = state.create_quiz(Some("u1"), "moon", Difficulty::Easy).await;
        assert!(!cached);
        let (_, cached) = state.create_quiz(Some("u2"), "mars", Difficulty::Easy).await;
        assert!(!cached);
        assert_eq!(model.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn anonymous_requests_always_generate() {
        let model = Arc::new(CountingModel::default());
        let state = state(model.clone(), 60);
        state.create_quiz(None, "mars", Difficulty::Easy).await;
        let (quiz, cached) = state.create_quiz(None, "mars", Difficulty::Easy).await;
        assert!(!cached);
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
        assert!(state.get_quiz(&quiz.id).await.is_some());
    }

    #[tokio::test]
    async fn zero_window_disables_reuse() {
        let model = Arc::new(CountingModel::default());
        let state = state(model.clone(), 0);
        state.create_quiz(Some("u1"), "mars", Difficulty::Easy).await;
        let (_, cached) = state.create_quiz(Some("u1"), "mars", Difficulty::Easy).await;
        assert!(!cached);
        assert_eq!(model.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn user_history_is_newest_first_and_limited() {
        let state = state(Arc::new(CountingModel::default()), 60);
        for topic in ["a", "b", "c"] {
            state.create_quiz(Some("u1"), topic, Difficulty::Medium).await;
        }
        let history = state.quizzes_for_user("u1", 2).await;
        let topics: Vec<_> = history.iter().map(|q| q.topic.as_str()).collect();
        assert_eq!(topics, ["c", "b"]);
        assert!(state.quizzes_for_user("nobody", 20).await.is_empty());
    }

    #[test]
    fn store_evicts_oldest_past_capacity() {
        let mut store = QuizStore::default();
        for i in 0..=MAX_STORED_QUIZZES {
            store.insert(StoredQuiz {
                id: i.to_string(),
                user_id: Some("u".into()),
                topic: "t".into(),
                difficulty: Difficulty::Medium,
                questions: vec![],
                source: ContentSource::Fallback,
                dropped: 0,
                generated_at: Utc::now(),
            });
        }
        assert_eq!(store.by_id.len(), MAX_STORED_QUIZZES);
        assert!(!store.by_id.contains_key("0"));
        assert_eq!(store.by_user["u"].len(), MAX_STORED_QUIZZES);
    }
}
