use chrono::{Local, NaiveDate};
use climatask_core::{AppError, Config};
use climatask_services::{
    day_details, find_best_dates, index_for_date, selectable_dates, DayVerdict, JsonPlanStore,
    PlanDraft, PlanStore,
};
use climatask_weather::{codes, LocationQuery, WeatherProvider};

#[derive(Debug)]
pub struct PicnicRequest {
    pub city: String,
    pub num_days: usize,
    pub date: Option<NaiveDate>,
    pub save: Option<String>,
    pub extra_items: Vec<String>,
    pub skipped_items: Vec<String>,
    pub participants: Vec<String>,
}

pub async fn run(config: &Config, request: PicnicRequest) -> Result<(), AppError> {
    let provider = WeatherProvider::new(&config.weather)?;
    let forecast = provider
        .fetch_forecast(&LocationQuery::place(&request.city))
        .await?;
    let daily = forecast.daily_or_empty();
    let today = Local::now().date_naive();

    let ranking = find_best_dates(&daily, request.num_days);
    println!("📅 Recommended picnic dates");
    if ranking.is_empty() {
        println!("No suitable picnic dates found. Try expanding your search!");
    }
    for candidate in &ranking.candidates {
        println!(
            "  {}  {} {:<16} {:>5.1}°C / {:>5.1}°C  ☔ {:>3}%  score {:.1}",
            candidate.date.format("%a %b %d"),
            codes::icon(candidate.weather_code),
            codes::description(candidate.weather_code),
            candidate.temp_max,
            candidate.temp_min,
            candidate.precip_prob,
            candidate.score
        );
    }
    if !ranking.skipped.is_empty() {
        println!("  ({} forecast days could not be read)", ranking.skipped.len());
    }
    println!();

    let index = match request.date {
        Some(date) => {
            let window = selectable_dates(today);
            if !window.contains(&date) {
                println!(
                    "Pick a date between {} and {}.",
                    today,
                    window.last().copied().unwrap_or(today)
                );
                return Ok(());
            }
            index_for_date(today, date)
        }
        None => Some(ranking.candidates.first().map_or(0, |c| c.source_index)),
    };

    let Some((index, day)) = index.and_then(|i| day_details(&daily, i).map(|day| (i, day))) else {
        println!("No forecast details for that date.");
        return Ok(());
    };

    println!("🌤 {}", day.date.format("%A, %B %d"));
    println!(
        "  Weather: {} {}",
        codes::description(day.weather_code),
        codes::icon(day.weather_code)
    );
    println!("  Temperature: {:.1}°C (High) / {:.1}°C (Low)", day.temp_max, day.temp_min);
    println!("  Rain Chance: {}%", day.precip_prob);
    println!("  {}", DayVerdict::for_day(index, &day, &ranking).message());
    println!();

    let mut draft = PlanDraft::for_day(day);
    for item in &request.extra_items {
        draft.add_custom_item(item);
    }
    for item in &request.skipped_items {
        draft.set_checked(item, false);
    }
    draft.set_participants(&request.participants.join("\n"));

    let selected = draft.selected_items();
    println!("🎒 What to bring");
    for item in draft.packing_list() {
        let mark = if selected.contains(&item) { "x" } else { " " };
        println!("  [{}] {}", mark, item);
    }

    if let Some(name) = request.save {
        draft.set_name(&name);
        let plan = draft.finish(Local::now().naive_local());
        JsonPlanStore::new(config.storage.plans_path()).append(&plan)?;
        println!();
        println!("💾 Saved \"{}\" for {}", plan.name, plan.date);
    }
    Ok(())
}

pub fn list_plans(config: &Config) -> Result<(), AppError> {
    let plans = JsonPlanStore::new(config.storage.plans_path()).load_all();
    if plans.is_empty() {
        println!("No saved plans yet");
        return Ok(());
    }

    for plan in plans {
        println!("{} - {}", plan.name, plan.date);
        println!("  Weather: {} ({})", plan.weather_summary, plan.temperature);
        println!("  Participants: {}", plan.participants.join(", "));
        println!("  Items: {}", plan.items.join(", "));
        match plan.created_at {
            Some(created) => println!("  Created: {}", created.format("%Y-%m-%d %H:%M")),
            None => println!("  Created: Unknown"),
        }
    }
    Ok(())
}
