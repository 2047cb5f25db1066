use climatask_core::{AppError, Config};
use climatask_weather::view::UPCOMING_DAYS;
use climatask_weather::{current_conditions, upcoming_days, LocationQuery, WeatherProvider};

pub async fn run(config: &Config, city: &str) -> Result<(), AppError> {
    let provider = WeatherProvider::new(&config.weather)?;
    let forecast = provider.fetch_forecast(&LocationQuery::place(city)).await?;

    let place = forecast
        .location
        .as_ref()
        .and_then(|l| l.display_name.as_deref())
        .unwrap_or(city);
    println!("Weather for {}", place);
    println!();

    match current_conditions(&forecast) {
        Some(now) => {
            println!("Now  {} {}", now.icon, now.description);
            println!("     {:.1}°C, wind {:.1} km/h", now.temperature, now.wind_speed);
            if let Some(humidity) = now.humidity {
                println!("     humidity {:.0}%", humidity);
            }
        }
        None => println!("No current conditions reported"),
    }
    println!();

    for card in upcoming_days(&forecast, UPCOMING_DAYS) {
        println!(
            "{}  {} {:<24} {:>5.1}°C / {:>5.1}°C",
            card.date.format("%a %b %d"),
            card.icon,
            card.description,
            card.temp_max,
            card.temp_min
        );
    }
    Ok(())
}
