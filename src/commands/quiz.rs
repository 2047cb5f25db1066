use chrono::Local;
use climatask_core::{AppError, Config};
use climatask_services::{
    AnswerResult, JsonStreakStore, QuizPhase, QuizSession, Rejected, StreakStore, StreakUpdate,
    Transition,
};
use climatask_trivia::{Category, QuizQuestion, TriviaClient};
use std::io::{self, BufRead, Write};

/// Line-based questions over stdin.
struct Prompt {
    lines: io::Lines<io::StdinLock<'static>>,
}

impl Prompt {
    fn new() -> Self {
        Self {
            lines: io::stdin().lock().lines(),
        }
    }

    /// Trimmed answer, `None` at end of input.
    fn ask(&mut self, question: &str) -> io::Result<Option<String>> {
        print!("{} ", question);
        io::stdout().flush()?;
        Ok(self.lines.next().transpose()?.map(|line| line.trim().to_string()))
    }

    fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(question)?;
        Ok(matches!(answer.as_deref(), Some("y" | "Y" | "yes")))
    }
}

/// Keep whichever session a transition hands back, reporting refusals.
fn settle(transition: Transition) -> QuizSession {
    match transition {
        Ok(session) => session,
        Err(Rejected { session, error }) => {
            let err = AppError::from(error);
            tracing::debug!("Quiz transition refused: {}", err);
            println!("⚠️  {}", err.user_message());
            session
        }
    }
}

fn choose_category(categories: &[Category], prompt: &mut Prompt) -> io::Result<Option<u32>> {
    for category in categories {
        println!("{:>4}  {}", category.id, category.name);
    }
    loop {
        let Some(answer) = prompt.ask("Category id (q to quit):")? else {
            return Ok(None);
        };
        if answer == "q" {
            return Ok(None);
        }
        match answer.parse::<u32>() {
            Ok(id) if categories.iter().any(|c| c.id == id) => return Ok(Some(id)),
            _ => println!("Unknown category {:?}", answer),
        }
    }
}

fn ask_answer(question: &QuizQuestion, prompt: &mut Prompt) -> io::Result<Option<String>> {
    println!();
    println!("{}", question.prompt());
    for (n, option) in question.options().iter().enumerate() {
        println!("  {}) {}", n + 1, option);
    }
    loop {
        let Some(answer) = prompt.ask("Your answer (q to quit):")? else {
            return Ok(None);
        };
        if answer == "q" {
            return Ok(None);
        }
        let chosen = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| question.options().get(i));
        match chosen {
            Some(option) => return Ok(Some(option.clone())),
            None => println!("Pick a number from 1 to {}", question.options().len()),
        }
    }
}

fn show_result(result: &AnswerResult) {
    if result.is_correct {
        println!("✅ Correct! Well done!");
    } else {
        println!("❌ Incorrect! Correct answer: {}", result.correct_answer);
    }
    match &result.streak_update {
        StreakUpdate::Recorded { streak } => println!("🔥 Streak: {} days", streak),
        StreakUpdate::NotSaved { streak, reason } => {
            println!("🔥 Streak: {} days (not saved: {})", streak, reason)
        }
        StreakUpdate::Practice | StreakUpdate::Unchanged => {}
    }
}

pub async fn run(config: &Config, category: Option<u32>) -> Result<(), AppError> {
    let client = TriviaClient::new(&config.trivia)?;
    let store = JsonStreakStore::new(config.storage.streak_path());
    let mut rng = rand::thread_rng();
    let mut prompt = Prompt::new();
    let mut preset = category;
    let mut categories: Option<Vec<Category>> = None;

    let mut session = QuizSession::start(&store, Local::now().date_naive());
    println!("🔥 Current streak: {} days", session.streak().streak);

    loop {
        let phase = session.phase().clone();
        session = match phase {
            QuizPhase::DailyLocked => {
                println!("You've already played today!");
                if !prompt.confirm("🌱 Enter practice mode? [y/N]")? {
                    return Ok(());
                }
                settle(session.enter_practice_mode())
            }
            QuizPhase::CategorySelection => {
                let id = match preset.take() {
                    Some(id) => id,
                    None => {
                        if categories.is_none() {
                            categories = Some(client.list_categories().await?);
                        }
                        let list = categories.as_deref().unwrap_or_default();
                        match choose_category(list, &mut prompt)? {
                            Some(id) => id,
                            None => return Ok(()),
                        }
                    }
                };
                settle(session.start_quiz(id, &client, &mut rng).await)
            }
            QuizPhase::QuestionActive(question) => match ask_answer(&question, &mut prompt)? {
                Some(answer) => settle(session.submit_answer(&answer, &store)),
                None => return Ok(()),
            },
            QuizPhase::ResultShown(result) => {
                show_result(&result);
                if session.can_enter_practice() {
                    if !prompt.confirm("🌱 Enter practice mode? [y/N]")? {
                        return Ok(());
                    }
                    settle(session.enter_practice_mode())
                } else if session.can_request_next() {
                    if !prompt.confirm("Next challenge? [y/N]")? {
                        return Ok(());
                    }
                    settle(session.next_challenge(&client, &mut rng).await)
                } else {
                    return Ok(());
                }
            }
            QuizPhase::Idle => {
                if !prompt.confirm("Try another question? [y/N]")? {
                    return Ok(());
                }
                settle(session.next_challenge(&client, &mut rng).await)
            }
        };
    }
}

pub async fn list_categories(config: &Config) -> Result<(), AppError> {
    let client = TriviaClient::new(&config.trivia)?;
    for category in client.list_categories().await? {
        println!("{:>4}  {}", category.id, category.name);
    }
    Ok(())
}

pub fn show_streak(config: &Config) -> Result<(), AppError> {
    let state = JsonStreakStore::new(config.storage.streak_path()).load();
    match state.last_play_date {
        Some(date) => println!("🔥 Current streak: {} days (last played {})", state.streak, date),
        None => println!("🔥 Current streak: {} days (never played)", state.streak),
    }
    Ok(())
}
