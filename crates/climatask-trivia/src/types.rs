use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::TriviaError;

/// Answer options shown per question.
pub const OPTION_COUNT: usize = 4;

/// Trivia category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: u32,
    pub name: String,
}

/// A multiple-choice question with decoded text.
///
/// `options` always holds [`OPTION_COUNT`] distinct strings, one of which is
/// the correct answer. Deserializing checks the same rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionParts")]
pub struct QuizQuestion {
    prompt: String,
    correct_answer: String,
    options: Vec<String>,
}

impl QuizQuestion {
    /// Build a question from its correct answer and distractors.
    ///
    /// Options start as the distractors followed by the correct answer; call
    /// [`QuizQuestion::shuffle_options`] before display.
    pub fn new(
        prompt: impl Into<String>,
        correct_answer: impl Into<String>,
        distractors: Vec<String>,
    ) -> Result<Self, TriviaError> {
        let correct_answer = correct_answer.into();

        let mut options: Vec<String> = Vec::with_capacity(OPTION_COUNT);
        for distractor in distractors {
            if distractor != correct_answer && !options.contains(&distractor) {
                options.push(distractor);
            }
        }

        if options.len() != OPTION_COUNT - 1 {
            return Err(TriviaError::Malformed(format!(
                "expected {} distinct wrong answers, got {}",
                OPTION_COUNT - 1,
                options.len()
            )));
        }
        options.push(correct_answer.clone());

        Ok(Self {
            prompt: prompt.into(),
            correct_answer,
            options,
        })
    }

    /// Uniformly permute the options with the given random source.
    pub fn shuffle_options<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.options.shuffle(rng);
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn has_option(&self, answer: &str) -> bool {
        self.options.iter().any(|o| o == answer)
    }

    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

/// Unchecked serialized form of [`QuizQuestion`].
#[derive(Deserialize)]
struct QuestionParts {
    prompt: String,
    correct_answer: String,
    options: Vec<String>,
}

impl TryFrom<QuestionParts> for QuizQuestion {
    type Error = TriviaError;

    /// Keeps the stored option order.
    fn try_from(parts: QuestionParts) -> Result<Self, Self::Error> {
        let QuestionParts {
            prompt,
            correct_answer,
            options,
        } = parts;

        if options.len() != OPTION_COUNT {
            return Err(TriviaError::Malformed(format!(
                "expected {} options, got {}",
                OPTION_COUNT,
                options.len()
            )));
        }
        let distinct = options
            .iter()
            .enumerate()
            .all(|(i, option)| !options[..i].contains(option));
        if !distinct {
            return Err(TriviaError::Malformed("duplicate options".into()));
        }
        if !options.contains(&correct_answer) {
            return Err(TriviaError::Malformed(
                "correct answer is not among the options".into(),
            ));
        }

        Ok(Self {
            prompt,
            correct_answer,
            options,
        })
    }
}

/// `response_code` values documented by Open Trivia DB
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    Success,
    NoResults,
    InvalidParameter,
    TokenNotFound,
    TokenEmpty,
    RateLimit,
    Unknown(u8),
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::NoResults,
            2 => Self::InvalidParameter,
            3 => Self::TokenNotFound,
            4 => Self::TokenEmpty,
            5 => Self::RateLimit,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CategoryListResponse {
    pub trivia_categories: Vec<Category>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QuestionResponse {
    pub response_code: u8,
    #[serde(default)]
    pub results: Vec<RawQuestion>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawQuestion {
    pub question: String,
    pub correct_answer: String,
    pub incorrect_answers: Vec<String>,
}

fn decode(field: &str, raw: &str) -> Result<String, TriviaError> {
    urlencoding::decode(raw)
        .map(|text| text.into_owned())
        .map_err(|e| TriviaError::Malformed(format!("{} is not valid UTF-8: {}", field, e)))
}

impl RawQuestion {
    /// Decode the percent-encoded fields into a question.
    pub fn into_question(self) -> Result<QuizQuestion, TriviaError> {
        let prompt = decode("question", &self.question)?;
        let correct = decode("correct_answer", &self.correct_answer)?;
        let distractors = self
            .incorrect_answers
            .iter()
            .map(|a| decode("incorrect_answers", a))
            .collect::<Result<Vec<_>, _>>()?;

        QuizQuestion::new(prompt, correct, distractors)
    }
}
