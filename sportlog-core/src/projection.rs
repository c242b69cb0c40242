//! Derived views over a [`Snapshot`].
//!
//! Nothing here is stored. Every function is pure, so the day cards, the
//! weekly calendar and the trend charts all see identical numbers.

use chrono::{Datelike, Days, Duration, NaiveDate, Weekday};
use serde::Serialize;
use std::fmt;

use crate::models::{FoodEntry, Snapshot, WorkoutEntry};

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

pub fn water(snapshot: &Snapshot, date: NaiveDate) -> u32 {
    snapshot.water.get(&date).copied().unwrap_or(0)
}

/// Water as a fraction of the daily goal, capped at 1.
pub fn water_progress(snapshot: &Snapshot, date: NaiveDate) -> f64 {
    ratio(water(snapshot, date), snapshot.goals.water_ml_per_day)
}

/// Millilitres still missing to reach the daily goal.
pub fn water_remaining(snapshot: &Snapshot, date: NaiveDate) -> u32 {
    snapshot
        .goals
        .water_ml_per_day
        .saturating_sub(water(snapshot, date))
}

pub fn foods_for_date(snapshot: &Snapshot, date: NaiveDate) -> Vec<&FoodEntry> {
    snapshot
        .nutrition
        .iter()
        .filter(|food| food.date == date)
        .collect()
}

pub fn workouts_for_date(snapshot: &Snapshot, date: NaiveDate) -> Vec<&WorkoutEntry> {
    snapshot
        .exercise
        .iter()
        .filter(|workout| workout.date == date)
        .collect()
}

pub fn total_kcal(snapshot: &Snapshot, date: NaiveDate) -> i64 {
    foods_for_date(snapshot, date)
        .iter()
        .map(|food| i64::from(food.kcal))
        .sum()
}

pub fn total_burned(snapshot: &Snapshot, date: NaiveDate) -> i64 {
    workouts_for_date(snapshot, date)
        .iter()
        .map(|workout| i64::from(workout.kcal_burned))
        .sum()
}

/// Intake minus expenditure. Negative on a deficit day.
pub fn net_kcal(snapshot: &Snapshot, date: NaiveDate) -> i64 {
    total_kcal(snapshot, date) - total_burned(snapshot, date)
}

/// Intake as a fraction of the daily calorie goal, capped at 1.
pub fn kcal_progress(snapshot: &Snapshot, date: NaiveDate) -> f64 {
    let intake = u32::try_from(total_kcal(snapshot, date)).unwrap_or(u32::MAX);
    ratio(intake, snapshot.goals.kcal_per_day)
}

fn ratio(value: u32, goal: u32) -> f64 {
    if goal == 0 {
        return 0.0;
    }
    (f64::from(value) / f64::from(goal)).min(1.0)
}

/// Summed macronutrients in grams. Entries without a value count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MacroTotals {
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

pub fn macro_totals(snapshot: &Snapshot, date: NaiveDate) -> MacroTotals {
    foods_for_date(snapshot, date)
        .iter()
        .fold(MacroTotals::default(), |acc, food| MacroTotals {
            protein: acc.protein + food.protein.unwrap_or(0.0),
            carbs: acc.carbs + food.carbs.unwrap_or(0.0),
            fat: acc.fat + food.fat.unwrap_or(0.0),
        })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CalorieBalance {
    Surplus,
    Deficit,
}

impl CalorieBalance {
    /// Zero counts as a surplus.
    pub fn from_net(net_kcal: i64) -> Self {
        if net_kcal >= 0 {
            CalorieBalance::Surplus
        } else {
            CalorieBalance::Deficit
        }
    }
}

impl fmt::Display for CalorieBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalorieBalance::Surplus => write!(f, "Calorie Surplus"),
            CalorieBalance::Deficit => write!(f, "Calorie Deficit"),
        }
    }
}

/// One day of the trend series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub water: u32,
    pub intake: i64,
    pub burned: i64,
    pub net_kcal: i64,
}

impl DaySummary {
    pub fn balance(&self) -> CalorieBalance {
        CalorieBalance::from_net(self.net_kcal)
    }
}

pub fn day_summary(snapshot: &Snapshot, date: NaiveDate) -> DaySummary {
    let intake = total_kcal(snapshot, date);
    let burned = total_burned(snapshot, date);
    DaySummary {
        date,
        water: water(snapshot, date),
        intake,
        burned,
        net_kcal: intake - burned,
    }
}

/// The Monday-to-Sunday week containing `date`.
///
/// Sunday closes the week that began six days earlier; it never starts a
/// new one. Returns `None` when part of the week falls outside the
/// representable calendar.
pub fn week_dates(date: NaiveDate) -> Option<[NaiveDate; 7]> {
    let back = match date.weekday() {
        Weekday::Sun => 6,
        weekday => weekday.num_days_from_monday(),
    };
    let monday = date.checked_sub_days(Days::new(u64::from(back)))?;
    monday.checked_add_days(Days::new(6))?;

    Some(std::array::from_fn(|offset| monday + Days::new(offset as u64)))
}

/// Moves `date` by whole weeks; negative goes back. `None` on overflow.
pub fn shift_week(date: NaiveDate, weeks: i64) -> Option<NaiveDate> {
    7i64.checked_mul(weeks)
        .and_then(Duration::try_days)
        .and_then(|delta| date.checked_add_signed(delta))
}

/// Short day name with Monday as the first column.
pub fn weekday_label(date: NaiveDate) -> &'static str {
    WEEKDAY_LABELS[date.weekday().num_days_from_monday() as usize]
}

/// Day summaries for each date of the week containing `date`.
pub fn weekly_series(snapshot: &Snapshot, date: NaiveDate) -> Option<Vec<DaySummary>> {
    let week = week_dates(date)?;
    Some(week.iter().map(|day| day_summary(snapshot, *day)).collect())
}

/// Rounded per-day means over a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyAverages {
    pub water: i64,
    pub intake: i64,
    pub burned: i64,
    pub net_kcal: i64,
}

impl WeeklyAverages {
    pub fn balance(&self) -> CalorieBalance {
        CalorieBalance::from_net(self.net_kcal)
    }
}

pub fn weekly_averages(series: &[DaySummary]) -> WeeklyAverages {
    if series.is_empty() {
        return WeeklyAverages::default();
    }

    let mean = |sum: i64| (sum as f64 / series.len() as f64).round() as i64;
    WeeklyAverages {
        water: mean(series.iter().map(|day| i64::from(day.water)).sum()),
        intake: mean(series.iter().map(|day| day.intake).sum()),
        burned: mean(series.iter().map(|day| day.burned).sum()),
        net_kcal: mean(series.iter().map(|day| day.net_kcal).sum()),
    }
}
