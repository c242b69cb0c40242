use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use sportlog_core::projection::{self, CalorieBalance, DaySummary, MacroTotals, WeeklyAverages};
use sportlog_core::{KeyValueStore, LedgerStore, Snapshot};

use super::{percent, resolve_date, OutputFormat};

/// Today's cards: water, intake, burned and net calories
#[derive(Args)]
pub struct DayCommand {
    /// Date (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    pub date: Option<String>,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Weekly calendar and trend averages
#[derive(Args)]
pub struct WeekCommand {
    /// Any date inside the week (YYYY-MM-DD), defaults to today
    #[arg(long, short)]
    pub date: Option<String>,

    /// Move by whole weeks from --date (e.g. -1 for last week)
    #[arg(long, allow_negative_numbers = true, default_value_t = 0)]
    pub offset: i64,

    /// Output format
    #[arg(long, short, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DayReport {
    #[serde(flatten)]
    summary: DaySummary,
    balance: CalorieBalance,
    water_progress: f64,
    kcal_progress: f64,
    macros: MacroTotals,
}

impl DayReport {
    fn build(snapshot: &Snapshot, date: NaiveDate) -> Self {
        let summary = projection::day_summary(snapshot, date);
        Self {
            summary,
            balance: summary.balance(),
            water_progress: projection::water_progress(snapshot, date),
            kcal_progress: projection::kcal_progress(snapshot, date),
            macros: projection::macro_totals(snapshot, date),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WeekReport {
    days: Vec<DaySummary>,
    averages: WeeklyAverages,
}

impl WeekReport {
    fn build(snapshot: &Snapshot, date: NaiveDate) -> Option<Self> {
        let days = projection::weekly_series(snapshot, date)?;
        let averages = projection::weekly_averages(&days);
        Some(Self { days, averages })
    }
}

impl DayCommand {
    pub fn run<K: KeyValueStore>(
        &self,
        ledger: &LedgerStore<K>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let date = resolve_date(&self.date)?;
        let snapshot = ledger.snapshot();
        let report = DayReport::build(snapshot, date);

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                let goals = ledger.goals();
                let summary = &report.summary;

                println!("{} ({})", date, projection::weekday_label(date));
                println!("{}", "=".repeat(30));
                println!(
                    "Water:      {} / {} ml ({})",
                    summary.water,
                    goals.water_ml_per_day,
                    percent(report.water_progress)
                );
                println!(
                    "Intake:     {} / {} kcal ({})",
                    summary.intake,
                    goals.kcal_per_day,
                    percent(report.kcal_progress)
                );
                println!("Burned:     {} kcal", summary.burned);
                println!("Net:        {} kcal ({})", summary.net_kcal, report.balance);

                let macros = report.macros;
                if macros != MacroTotals::default() {
                    println!(
                        "Macros:     Protein: {:.0}g | Carbs: {:.0}g | Fat: {:.0}g",
                        macros.protein, macros.carbs, macros.fat
                    );
                }

                let foods = ledger.foods_for_date(date);
                if !foods.is_empty() {
                    println!("\nFood:");
                    for food in foods {
                        println!("  - {}", food);
                    }
                }

                let workouts = ledger.workouts_for_date(date);
                if !workouts.is_empty() {
                    println!("\nWorkouts:");
                    for workout in workouts {
                        println!("  - {}", workout);
                    }
                }
            }
        }
        Ok(())
    }
}

impl WeekCommand {
    pub fn run<K: KeyValueStore>(
        &self,
        ledger: &LedgerStore<K>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let start = resolve_date(&self.date)?;
        let date = projection::shift_week(start, self.offset).ok_or_else(|| {
            format!("Offset of {} weeks from {} is out of range", self.offset, start)
        })?;
        let report = WeekReport::build(ledger.snapshot(), date)
            .ok_or_else(|| format!("The week containing {} is out of range", date))?;

        match self.format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            OutputFormat::Text => {
                let first = report.days.first().map(|d| d.date).unwrap_or(date);
                let last = report.days.last().map(|d| d.date).unwrap_or(date);
                println!("Week of {} to {}", first, last);
                println!("{}", "-".repeat(60));
                println!(
                    "  {:3} {:10} {:>8} {:>8} {:>8} {:>8}",
                    "", "Date", "Water", "Intake", "Burned", "Net"
                );
                for day in &report.days {
                    let marker = if day.date == date { "*" } else { " " };
                    println!(
                        "{} {:3} {:10} {:>8} {:>8} {:>8} {:>8}",
                        marker,
                        projection::weekday_label(day.date),
                        day.date,
                        day.water,
                        day.intake,
                        day.burned,
                        day.net_kcal
                    );
                }
                println!("{}", "-".repeat(60));

                let avg = report.averages;
                println!(
                    "  {:3} {:10} {:>8} {:>8} {:>8} {:>8}",
                    "Avg", "", avg.water, avg.intake, avg.burned, avg.net_kcal
                );
                println!("\n{}", avg.balance());
            }
        }
        Ok(())
    }
}
