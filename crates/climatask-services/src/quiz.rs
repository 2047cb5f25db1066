//! Daily quiz session.
//!
//! A [`QuizSession`] is a plain value. Every transition consumes it and
//! returns either the next session or a [`Rejected`] carrying the session to
//! keep using alongside the reason.
//!
//! ```text
//! start ─┬─> CategorySelection ─start_quiz─> QuestionActive ─submit_answer─> ResultShown
//!        └─> DailyLocked                                                        │
//!               │ enter_practice_mode                   enter_practice_mode /   │
//!               v                                        next_challenge         v
//!        CategorySelection (practice)            Idle (practice) <───────────────
//! ```

use chrono::NaiveDate;
use climatask_core::AppError;
use climatask_trivia::{QuizQuestion, TriviaClient, TriviaError};
use rand::Rng;
use std::future::Future;
use thiserror::Error;

use crate::streak::{Attempt, StreakState, StreakStore};

/// Where questions come from.
pub trait QuestionSource {
    /// One question for the category, or `None` when it has run out.
    fn fetch_question(
        &self,
        category_id: u32,
    ) -> impl Future<Output = Result<Option<QuizQuestion>, TriviaError>> + Send;
}

impl QuestionSource for TriviaClient {
    fn fetch_question(
        &self,
        category_id: u32,
    ) -> impl Future<Output = Result<Option<QuizQuestion>, TriviaError>> + Send {
        TriviaClient::fetch_question(self, category_id)
    }
}

/// What an answer did to the streak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreakUpdate {
    /// Daily attempt recorded and saved.
    Recorded { streak: u32 },
    /// Daily attempt recorded for this session but the store refused it.
    NotSaved { streak: u32, reason: String },
    /// Practice answers never touch the streak.
    Practice,
    /// Today's attempt was already recorded.
    Unchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerResult {
    pub selected: String,
    pub is_correct: bool,
    pub correct_answer: String,
    pub streak_update: StreakUpdate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuizPhase {
    /// Today's attempt is used; only practice is on offer.
    DailyLocked,
    CategorySelection,
    QuestionActive(QuizQuestion),
    ResultShown(AnswerResult),
    /// Practice mode between questions.
    Idle,
}

impl QuizPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DailyLocked => "daily locked",
            Self::CategorySelection => "category selection",
            Self::QuestionActive(_) => "question active",
            Self::ResultShown(_) => "result shown",
            Self::Idle => "idle",
        }
    }
}

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("Today's quiz has already been played")]
    DailyAttemptUsed,

    #[error("Cannot {action} while in {phase}")]
    InvalidTransition {
        action: &'static str,
        phase: &'static str,
    },

    #[error("Session is fixed to category {current}, not {requested}")]
    CategoryLocked { current: u32, requested: u32 },

    #[error("{0:?} is not one of the options")]
    UnknownAnswer(String),

    #[error("No questions available in category {0}")]
    NoQuestion(u32),

    #[error(transparent)]
    Provider(#[from] TriviaError),
}

impl QuizError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::DailyAttemptUsed => "You've already played today! Try practice mode.",
            Self::InvalidTransition { .. } => "That action isn't available right now.",
            Self::CategoryLocked { .. } => "Start a new session to switch categories.",
            Self::UnknownAnswer(_) => "Pick one of the listed answers.",
            Self::NoQuestion(_) => "Couldn't find more questions in this category. Try another one!",
            Self::Provider(e) => e.user_message(),
        }
    }

    /// Whether repeating the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::NoQuestion(_) => true,
            Self::Provider(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl From<QuizError> for AppError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::NoQuestion(category) => {
                AppError::NoContentAvailable(format!("trivia category {}", category))
            }
            QuizError::Provider(e) => e.into(),
            other => AppError::Refused {
                reason: other.to_string(),
                hint: other.user_message(),
            },
        }
    }
}

/// A refused transition: the session to keep plus the reason.
#[derive(Debug, Error)]
#[error("{error}")]
pub struct Rejected {
    pub session: QuizSession,
    #[source]
    pub error: QuizError,
}

pub type Transition = Result<QuizSession, Rejected>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSession {
    today: NaiveDate,
    phase: QuizPhase,
    streak: StreakState,
    daily_attempt_used: bool,
    practice_mode: bool,
    practice_offered: bool,
    category: Option<u32>,
}

impl QuizSession {
    /// Open a session for `today` against the stored streak.
    pub fn start<S: StreakStore + ?Sized>(store: &S, today: NaiveDate) -> Self {
        let streak = store.load();
        let daily_attempt_used = streak.played_on(today);
        let phase = if daily_attempt_used {
            QuizPhase::DailyLocked
        } else {
            QuizPhase::CategorySelection
        };

        tracing::debug!(
            "Quiz session for {} starts in {} (streak {})",
            today,
            phase.name(),
            streak.streak
        );

        Self {
            today,
            phase,
            streak,
            daily_attempt_used,
            practice_mode: false,
            practice_offered: daily_attempt_used,
            category: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn phase(&self) -> &QuizPhase {
        &self.phase
    }

    pub fn streak(&self) -> &StreakState {
        &self.streak
    }

    pub fn daily_attempt_used(&self) -> bool {
        self.daily_attempt_used
    }

    pub fn practice_mode(&self) -> bool {
        self.practice_mode
    }

    pub fn practice_offered(&self) -> bool {
        self.practice_offered
    }

    pub fn category(&self) -> Option<u32> {
        self.category
    }

    pub fn current_question(&self) -> Option<&QuizQuestion> {
        match &self.phase {
            QuizPhase::QuestionActive(q) => Some(q),
            _ => None,
        }
    }

    pub fn last_result(&self) -> Option<&AnswerResult> {
        match &self.phase {
            QuizPhase::ResultShown(result) => Some(result),
            _ => None,
        }
    }

    pub fn can_enter_practice(&self) -> bool {
        !self.practice_mode
            && match self.phase {
                QuizPhase::DailyLocked => true,
                QuizPhase::ResultShown(_) => self.practice_offered,
                _ => false,
            }
    }

    pub fn can_request_next(&self) -> bool {
        self.practice_mode
            && self.category.is_some()
            && matches!(self.phase, QuizPhase::ResultShown(_) | QuizPhase::Idle)
    }

    fn reject(self, error: QuizError) -> Rejected {
        Rejected {
            session: self,
            error,
        }
    }

    fn invalid(self, action: &'static str) -> Rejected {
        let phase = self.phase.name();
        self.reject(QuizError::InvalidTransition { action, phase })
    }

    /// Switch to practice after today's attempt, clearing any question or result.
    pub fn enter_practice_mode(mut self) -> Transition {
        if !self.can_enter_practice() {
            return Err(self.invalid("enter practice mode"));
        }

        self.practice_mode = true;
        self.phase = if self.category.is_some() {
            QuizPhase::Idle
        } else {
            QuizPhase::CategorySelection
        };
        tracing::info!("Entered practice mode");
        Ok(self)
    }

    /// Fetch the first question for `category_id`.
    ///
    /// On any failure the session stays in category selection.
    pub async fn start_quiz<Q, R>(mut self, category_id: u32, source: &Q, rng: &mut R) -> Transition
    where
        Q: QuestionSource + ?Sized,
        R: Rng + ?Sized,
    {
        if self.daily_attempt_used && !self.practice_mode {
            return Err(self.reject(QuizError::DailyAttemptUsed));
        }
        if self.phase != QuizPhase::CategorySelection {
            return Err(self.invalid("start a quiz"));
        }
        if let Some(current) = self.category.filter(|c| *c != category_id) {
            return Err(self.reject(QuizError::CategoryLocked {
                current,
                requested: category_id,
            }));
        }

        match source.fetch_question(category_id).await {
            Ok(Some(mut question)) => {
                question.shuffle_options(rng);
                self.category = Some(category_id);
                self.phase = QuizPhase::QuestionActive(question);
                Ok(self)
            }
            Ok(None) => Err(self.reject(QuizError::NoQuestion(category_id))),
            Err(e) => {
                tracing::warn!("Question fetch for category {} failed: {}", category_id, e);
                Err(self.reject(e.into()))
            }
        }
    }

    /// Answer the active question.
    ///
    /// Outside practice this records today's attempt once. A failed streak
    /// save still shows the result and still uses up the attempt.
    pub fn submit_answer<S: StreakStore + ?Sized>(mut self, answer: &str, store: &S) -> Transition {
        let (known, is_correct, correct_answer) = match &self.phase {
            QuizPhase::QuestionActive(q) => (
                q.has_option(answer),
                q.is_correct(answer),
                q.correct_answer().to_string(),
            ),
            _ => return Err(self.invalid("submit an answer")),
        };
        if !known {
            return Err(self.reject(QuizError::UnknownAnswer(answer.to_string())));
        }

        let streak_update = self.record_daily_attempt(store);
        self.phase = QuizPhase::ResultShown(AnswerResult {
            selected: answer.to_string(),
            is_correct,
            correct_answer,
            streak_update,
        });
        Ok(self)
    }

    fn record_daily_attempt<S: StreakStore + ?Sized>(&mut self, store: &S) -> StreakUpdate {
        if self.practice_mode {
            return StreakUpdate::Practice;
        }
        if self.streak.played_on(self.today) {
            return StreakUpdate::Unchanged;
        }

        self.daily_attempt_used = true;
        self.practice_offered = true;

        match store.record_attempt(self.today) {
            Ok(Attempt::Recorded(state)) => {
                self.streak = state;
                StreakUpdate::Recorded {
                    streak: state.streak,
                }
            }
            Ok(Attempt::AlreadyPlayed(state)) => {
                // another session recorded today after this one started
                self.streak = state;
                StreakUpdate::Unchanged
            }
            Err(e) => {
                tracing::warn!("Streak not saved: {}", e);
                self.streak = self.streak.advanced(self.today);
                StreakUpdate::NotSaved {
                    streak: self.streak.streak,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Practice only: clear the last result and fetch another question in
    /// the session's category.
    ///
    /// An exhausted category or a provider error leaves the session in
    /// practice, idle, ready to try again.
    pub async fn next_challenge<Q, R>(mut self, source: &Q, rng: &mut R) -> Transition
    where
        Q: QuestionSource + ?Sized,
        R: Rng + ?Sized,
    {
        if !self.can_request_next() {
            return Err(self.invalid("request the next challenge"));
        }
        let Some(category) = self.category else {
            return Err(self.invalid("request the next challenge"));
        };

        self.phase = QuizPhase::Idle;
        match source.fetch_question(category).await {
            Ok(Some(mut question)) => {
                question.shuffle_options(rng);
                self.phase = QuizPhase::QuestionActive(question);
                Ok(self)
            }
            Ok(None) => {
                tracing::info!("Category {} has no more questions", category);
                Err(self.reject(QuizError::NoQuestion(category)))
            }
            Err(e) => {
                tracing::warn!("Practice fetch for category {} failed: {}", category, e);
                Err(self.reject(e.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::streak::MemoryStreakStore;
    use chrono::Duration;
    use climatask_core::NetworkError;
    use parking_lot::Mutex;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::VecDeque;

    type Reply = Result<Option<QuizQuestion>, TriviaError>;

    /// Replies in order; `Ok(None)` once the script runs out.
    #[derive(Default)]
    struct ScriptedSource {
        replies: Mutex<VecDeque<Reply>>,
        calls: Mutex<Vec<u32>>,
    }

    impl ScriptedSource {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                calls: Mutex::default(),
            }
        }

        fn calls(&self) -> Vec<u32> {
            self.calls.lock().clone()
        }
    }

    impl QuestionSource for ScriptedSource {
        fn fetch_question(&self, category_id: u32) -> impl Future<Output = Reply> + Send {
            self.calls.lock().push(category_id);
            let reply = self.replies.lock().pop_front().unwrap_or(Ok(None));
            async move { reply }
        }
    }

    fn question(n: u32) -> QuizQuestion {
        QuizQuestion::new(
            format!("Question {}", n),
            "Right",
            vec!["Wrong A".into(), "Wrong B".into(), "Wrong C".into()],
        )
        .unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn yesterday_streak(streak: u32) -> StreakState {
        StreakState {
            streak,
            last_play_date: Some(today() - Duration::days(1)),
        }
    }

    #[test]
    fn test_start_unlocked_when_not_played_today() {
        let store = MemoryStreakStore::new(yesterday_streak(4));
        let session = QuizSession::start(&store, today());
        assert_eq!(session.phase(), &QuizPhase::CategorySelection);
        assert!(!session.daily_attempt_used());
        assert!(!session.can_enter_practice());
    }

    #[test]
    fn test_start_locked_when_played_today() {
        let store = MemoryStreakStore::new(StreakState {
            streak: 3,
            last_play_date: Some(today()),
        });
        let session = QuizSession::start(&store, today());
        assert_eq!(session.phase(), &QuizPhase::DailyLocked);
        assert!(session.can_enter_practice());
    }

    #[tokio::test]
    async fn test_daily_attempt_extends_streak() {
        let store = MemoryStreakStore::new(yesterday_streak(4));
        let source = ScriptedSource::new(vec![Ok(Some(question(1)))]);

        let session = QuizSession::start(&store, today())
            .start_quiz(9, &source, &mut rng())
            .await
            .unwrap();

        let options = session.current_question().unwrap().options().to_vec();
        assert_eq!(options.len(), 4);
        assert_eq!(options.iter().filter(|o| *o == "Right").count(), 1);

        let session = session.submit_answer("Wrong B", &store).unwrap();
        let result = session.last_result().unwrap();
        assert!(!result.is_correct);
        assert_eq!(result.correct_answer, "Right");
        assert_eq!(result.streak_update, StreakUpdate::Recorded { streak: 5 });

        assert_eq!(store.load(), StreakState {
            streak: 5,
            last_play_date: Some(today()),
        });
        assert!(session.daily_attempt_used());
        assert!(session.can_enter_practice());
        assert_eq!(source.calls(), vec![9]);
    }

    #[tokio::test]
    async fn test_broken_streak_restarts_at_one() {
        let store = MemoryStreakStore::new(StreakState {
            streak: 4,
            last_play_date: Some(today() - Duration::days(3)),
        });
        let source = ScriptedSource::new(vec![Ok(Some(question(1)))]);

        let session = QuizSession::start(&store, today())
            .start_quiz(9, &source, &mut rng())
            .await
            .unwrap()
            .submit_answer("Right", &store)
            .unwrap();

        let result = session.last_result().unwrap();
        assert!(result.is_correct);
        assert_eq!(result.streak_update, StreakUpdate::Recorded { streak: 1 });
    }

    #[tokio::test]
    async fn test_second_session_same_day_is_gated() {
        let store = MemoryStreakStore::new(StreakState::default());
        let source = ScriptedSource::new(vec![Ok(Some(question(1))), Ok(Some(question(2)))]);

        QuizSession::start(&store, today())
            .start_quiz(9, &source, &mut rng())
            .await
            .unwrap()
            .submit_answer("Right", &store)
            .unwrap();
        assert_eq!(store.save_count(), 1);

        // fresh session on the same day
        let session = QuizSession::start(&store, today());
        assert_eq!(session.phase(), &QuizPhase::DailyLocked);

        let rejected = session.start_quiz(9, &source, &mut rng()).await.unwrap_err();
        assert!(matches!(rejected.error, QuizError::DailyAttemptUsed));
        assert_eq!(rejected.session.phase(), &QuizPhase::DailyLocked);
        assert_eq!(source.calls(), vec![9]);

        // practice answers never save
        let session = rejected
            .session
            .enter_practice_mode()
            .unwrap()
            .start_quiz(9, &source, &mut rng())
            .await
            .unwrap()
            .submit_answer("Right", &store)
            .unwrap();
        assert_eq!(
            session.last_result().unwrap().streak_update,
            StreakUpdate::Practice
        );
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.load().streak, 1);
    }

    #[tokio::test]
    async fn test_fetch_failure_stays_in_category_selection() {
        let store = MemoryStreakStore::new(StreakState::default());
        let source = ScriptedSource::new(vec![
            Err(TriviaError::Unavailable(NetworkError::Timeout)),
            Ok(None),
            Ok(Some(question(1))),
        ]);

        let rejected = QuizSession::start(&store, today())
            .start_quiz(9, &source, &mut rng())
            .await
            .unwrap_err();
        assert!(rejected.error.is_retryable());
        assert_eq!(rejected.session.phase(), &QuizPhase::CategorySelection);
        assert_eq!(rejected.session.category(), None);

        let rejected = rejected
            .session
            .start_quiz(9, &source, &mut rng())
            .await
            .unwrap_err();
        assert!(matches!(rejected.error, QuizError::NoQuestion(9)));

        // a different category is still allowed before the first success
        let session = rejected
            .session
            .start_quiz(22, &source, &mut rng())
            .await
            .unwrap();
        assert_eq!(session.category(), Some(22));
    }

    #[tokio::test]
    async fn test_practice_loop_uses_same_category() {
        let store = MemoryStreakStore::new(StreakState::default());
        let source = ScriptedSource::new(vec![Ok(Some(question(1))), Ok(Some(question(2)))]);

        let session = QuizSession::start(&store, today())
            .start_quiz(17, &source, &mut rng())
            .await
            .unwrap()
            .submit_answer("Right", &store)
            .unwrap();

        // not practicing yet
        assert!(!session.can_request_next());

        let session = session.enter_practice_mode().unwrap();
        assert_eq!(session.phase(), &QuizPhase::Idle);

        let session = session.next_challenge(&source, &mut rng()).await.unwrap();
        assert_eq!(session.current_question().unwrap().prompt(), "Question 2");

        let session = session.submit_answer("Wrong A", &store).unwrap();
        assert_eq!(session.last_result().unwrap().streak_update, StreakUpdate::Practice);

        // script exhausted: reported, session idles in practice
        let rejected = session.next_challenge(&source, &mut rng()).await.unwrap_err();
        assert!(matches!(rejected.error, QuizError::NoQuestion(17)));
        assert_eq!(rejected.session.phase(), &QuizPhase::Idle);
        assert!(rejected.session.practice_mode());
        assert!(rejected.session.can_request_next());

        assert_eq!(source.calls(), vec![17, 17, 17]);
        assert_eq!(store.save_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_answer_keeps_question() {
        let store = MemoryStreakStore::new(StreakState::default());
        let source = ScriptedSource::new(vec![Ok(Some(question(1)))]);

        let session = QuizSession::start(&store, today())
            .start_quiz(9, &source, &mut rng())
            .await
            .unwrap();

        let rejected = session.submit_answer("right", &store).unwrap_err();
        assert!(matches!(rejected.error, QuizError::UnknownAnswer(_)));
        assert!(rejected.session.current_question().is_some());
        assert_eq!(store.save_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_save_still_uses_attempt() {
        let store = MemoryStreakStore::failing(yesterday_streak(2));
        let source = ScriptedSource::new(vec![Ok(Some(question(1)))]);

        let session = QuizSession::start(&store, today())
            .start_quiz(9, &source, &mut rng())
            .await
            .unwrap()
            .submit_answer("Right", &store)
            .unwrap();

        assert!(matches!(
            session.last_result().unwrap().streak_update,
            StreakUpdate::NotSaved { streak: 3, .. }
        ));
        assert!(session.daily_attempt_used());
        assert!(session.can_enter_practice());
    }

    #[tokio::test]
    async fn test_attempt_recorded_elsewhere_is_not_overwritten() {
        let store = MemoryStreakStore::new(yesterday_streak(4));
        let source = ScriptedSource::new(vec![Ok(Some(question(1)))]);

        let session = QuizSession::start(&store, today())
            .start_quiz(9, &source, &mut rng())
            .await
            .unwrap();

        // another instance plays today while this question is open
        let elsewhere = StreakState {
            streak: 9,
            last_play_date: Some(today()),
        };
        store.save(&elsewhere).unwrap();

        let session = session.submit_answer("Right", &store).unwrap();
        assert_eq!(
            session.last_result().unwrap().streak_update,
            StreakUpdate::Unchanged
        );
        assert_eq!(store.load(), elsewhere);
        assert_eq!(session.streak(), &elsewhere);
        assert!(session.daily_attempt_used());
        assert_eq!(store.save_count(), 1);
    }

    #[test]
    fn test_quiz_errors_map_into_app_error() {
        let exhausted = AppError::from(QuizError::NoQuestion(9));
        assert!(matches!(exhausted, AppError::NoContentAvailable(ref what) if what.contains('9')));
        assert!(exhausted.is_retryable());

        let offline = AppError::from(QuizError::Provider(TriviaError::Unavailable(
            NetworkError::Timeout,
        )));
        assert!(matches!(
            offline,
            AppError::ProviderUnavailable(NetworkError::Timeout)
        ));

        let used = AppError::from(QuizError::DailyAttemptUsed);
        assert!(matches!(used, AppError::Refused { .. }));
        assert_eq!(used.user_message(), QuizError::DailyAttemptUsed.user_message());
        assert!(!used.is_retryable());
    }

    #[test]
    fn test_practice_not_offered_before_answering() {
        let store = MemoryStreakStore::new(StreakState::default());
        let rejected = QuizSession::start(&store, today())
            .enter_practice_mode()
            .unwrap_err();
        assert!(matches!(rejected.error, QuizError::InvalidTransition { .. }));
        assert!(!rejected.session.practice_mode());
    }
}
