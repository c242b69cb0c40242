mod config_cmd;
mod food;
mod goals;
mod summary;
mod water;
mod workout;

use chrono::{Local, NaiveDate};
use clap::ValueEnum;

pub use config_cmd::ConfigCommand;
pub use food::FoodCommand;
pub use goals::GoalsCommand;
pub use summary::{DayCommand, WeekCommand};
pub use water::WaterCommand;
pub use workout::WorkoutCommand;

#[derive(Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Parses a `YYYY-MM-DD` argument, defaulting to today's local date.
pub fn resolve_date(date: &Option<String>) -> Result<NaiveDate, String> {
    match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|_| format!("Invalid date format '{}'. Use YYYY-MM-DD.", d)),
        None => Ok(Local::now().date_naive()),
    }
}

/// Line summarizing a day's running calorie total after a new entry.
pub fn day_total(kcal: i64, label: &str, date: NaiveDate) -> String {
    format!("  {} kcal {} on {}", kcal, label, date)
}

/// Renders a 0..=1 ratio as a whole percentage.
pub fn percent(ratio: f64) -> String {
    format!("{:.0}%", ratio * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_date_parses_iso() {
        let date = resolve_date(&Some("2024-03-04".to_string())).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 3, 4).unwrap());
    }

    #[test]
    fn test_resolve_date_rejects_other_formats() {
        let err = resolve_date(&Some("04/03/2024".to_string())).unwrap_err();
        assert!(err.contains("Use YYYY-MM-DD"));
    }

    #[test]
    fn test_day_total_names_the_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        assert_eq!(day_total(420, "total", date), "  420 kcal total on 2024-03-04");
        assert!(!day_total(250, "burned", date).contains("today"));
    }

    #[test]
    fn test_resolve_date_defaults_to_today() {
        assert_eq!(resolve_date(&None).unwrap(), Local::now().date_naive());
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(0.25), "25%");
        assert_eq!(percent(1.0), "100%");
    }
}
