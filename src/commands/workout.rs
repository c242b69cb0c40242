use clap::{Args, Subcommand, ValueEnum};
use sportlog_core::{KeyValueStore, LedgerStore, NewWorkout, Outcome};

use super::{day_total, resolve_date, OutputFormat};

/// Common workouts with typical duration and burn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WorkoutTemplate {
    Running,
    Cycling,
    WeightTraining,
    Swimming,
    Hiit,
    Yoga,
}

impl WorkoutTemplate {
    /// (name, minutes, kcal burned)
    pub fn defaults(&self) -> (&'static str, u32, u32) {
        match self {
            WorkoutTemplate::Running => ("Running (6 mph)", 30, 300),
            WorkoutTemplate::Cycling => ("Cycling (moderate)", 45, 400),
            WorkoutTemplate::WeightTraining => ("Weight Training", 60, 250),
            WorkoutTemplate::Swimming => ("Swimming", 30, 350),
            WorkoutTemplate::Hiit => ("HIIT Workout", 20, 200),
            WorkoutTemplate::Yoga => ("Yoga", 45, 150),
        }
    }
}

#[derive(Args)]
pub struct WorkoutCommand {
    #[command(subcommand)]
    pub command: WorkoutSubcommand,
}

#[derive(Subcommand)]
pub enum WorkoutSubcommand {
    /// Log a workout
    Add {
        /// Workout name (optional when --template is given)
        name: Option<String>,

        /// Start from a template; explicit values override it
        #[arg(long, short, value_enum)]
        template: Option<WorkoutTemplate>,

        /// Duration in minutes
        #[arg(long)]
        minutes: Option<u32>,

        /// Energy burned in kcal
        #[arg(long)]
        kcal: Option<u32>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// List workouts logged on a day
    List {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a workout entry by ID
    Delete {
        /// Entry ID
        id: String,
    },

    /// Show available workout templates
    Templates,
}

impl WorkoutCommand {
    pub fn run<K: KeyValueStore>(
        &self,
        ledger: &mut LedgerStore<K>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            WorkoutSubcommand::Add {
                name,
                template,
                minutes,
                kcal,
                date,
            } => {
                let date = resolve_date(date)?;
                let workout = build_workout(date, name, *template, *minutes, *kcal)?;
                let id = ledger.add_workout(workout)?;

                println!("Logged workout on {}:", date);
                println!("{}", day_total(ledger.total_burned(date), "burned", date));
                println!();
                println!("Entry ID: {}", id);
            }
            WorkoutSubcommand::List { date, format } => {
                let date = resolve_date(date)?;
                let workouts = ledger.workouts_for_date(date);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&workouts)?);
                    }
                    OutputFormat::Text => {
                        if workouts.is_empty() {
                            println!("No workouts logged on {}", date);
                            return Ok(());
                        }
                        println!("{}", date);
                        println!("{}", "-".repeat(60));
                        for workout in &workouts {
                            println!("  {}", workout);
                            println!("    id: {}", workout.id);
                        }
                        println!("\nTotal: {} kcal burned", ledger.total_burned(date));
                    }
                }
            }
            WorkoutSubcommand::Delete { id } => match ledger.delete_workout(id)? {
                Outcome::Unchanged => {
                    return Err(format!("Workout entry not found: {}", id).into())
                }
                _ => println!("Deleted workout entry {}", id),
            },
            WorkoutSubcommand::Templates => {
                for template in WorkoutTemplate::value_variants() {
                    let (name, minutes, kcal) = template.defaults();
                    let flag = template
                        .to_possible_value()
                        .map(|v| v.get_name().to_string())
                        .unwrap_or_default();
                    println!("  {:16} {} - {} min, {} kcal", flag, name, minutes, kcal);
                }
            }
        }
        Ok(())
    }
}

fn build_workout(
    date: chrono::NaiveDate,
    name: &Option<String>,
    template: Option<WorkoutTemplate>,
    minutes: Option<u32>,
    kcal: Option<u32>,
) -> Result<NewWorkout, String> {
    let defaults = template.map(|t| t.defaults());

    let name = name
        .clone()
        .or_else(|| defaults.map(|(n, _, _)| n.to_string()))
        .ok_or("a workout name or --template is required")?;
    let minutes = minutes
        .or_else(|| defaults.map(|(_, m, _)| m))
        .ok_or("--minutes is required without --template")?;
    let kcal = kcal
        .or_else(|| defaults.map(|(_, _, k)| k))
        .ok_or("--kcal is required without --template")?;

    Ok(NewWorkout::new(date, name, minutes, kcal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sportlog_core::MemoryStore;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
    }

    #[test]
    fn test_template_fills_missing_values() {
        let workout =
            build_workout(day(), &None, Some(WorkoutTemplate::Swimming), None, Some(420))
                .unwrap();

        assert_eq!(workout.name, "Swimming");
        assert_eq!(workout.duration_minutes, 30);
        assert_eq!(workout.kcal_burned, 420);
    }

    #[test]
    fn test_requires_values_without_template() {
        let err = build_workout(day(), &Some("Run".to_string()), None, None, Some(250))
            .unwrap_err();
        assert!(err.contains("--minutes"));
    }

    #[test]
    fn test_add_and_list() {
        let mut ledger = LedgerStore::open(MemoryStore::new()).unwrap();
        WorkoutCommand {
            command: WorkoutSubcommand::Add {
                name: Some("Run".to_string()),
                template: None,
                minutes: Some(30),
                kcal: Some(250),
                date: Some("2024-03-04".to_string()),
            },
        }
        .run(&mut ledger)
        .unwrap();

        assert_eq!(ledger.total_burned(day()), 250);
    }
}
