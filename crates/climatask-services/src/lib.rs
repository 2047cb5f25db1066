//! Core services for Climatask
//!
//! Picnic date recommendation, plan drafting and storage, and the daily quiz
//! session with its streak.

pub mod picnic;
pub mod plan;
pub mod plan_store;
pub mod quiz;
pub mod streak;

mod storage;

pub use picnic::{
    day_details, find_best_dates, index_for_date, is_suitable, recommend_items,
    selectable_dates, DayVerdict, PicnicCandidate, Recommendation, SkippedDay,
    DEFAULT_NUM_DAYS,
};
pub use plan::{parse_participants, PicnicPlan, PlanDraft};
pub use plan_store::{JsonPlanStore, MemoryPlanStore, PlanStore};
pub use quiz::{
    AnswerResult, QuestionSource, QuizError, QuizPhase, QuizSession, Rejected, StreakUpdate,
    Transition,
};
pub use streak::{
    calculate_streak, Attempt, JsonStreakStore, MemoryStreakStore, StreakState, StreakStore,
};
