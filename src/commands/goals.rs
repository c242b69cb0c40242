use clap::{Args, Subcommand};
use sportlog_core::{GoalsUpdate, KeyValueStore, LedgerStore, Outcome};

use super::OutputFormat;

#[derive(Args)]
pub struct GoalsCommand {
    #[command(subcommand)]
    pub command: GoalsSubcommand,
}

#[derive(Subcommand)]
pub enum GoalsSubcommand {
    /// Show daily goals
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Change daily goals; omitted values stay as they are
    Set {
        /// Water goal in millilitres per day
        #[arg(long, allow_negative_numbers = true)]
        water: Option<i64>,

        /// Calorie goal in kcal per day
        #[arg(long, allow_negative_numbers = true)]
        kcal: Option<i64>,
    },
}

impl GoalsCommand {
    pub fn run<K: KeyValueStore>(
        &self,
        ledger: &mut LedgerStore<K>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            GoalsSubcommand::Show { format } => match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(ledger.goals())?);
                }
                OutputFormat::Text => {
                    println!("Daily Goals");
                    println!("===========\n");
                    println!("{}", ledger.goals());
                }
            },
            GoalsSubcommand::Set { water, kcal } => {
                let update = GoalsUpdate {
                    water_ml_per_day: *water,
                    kcal_per_day: *kcal,
                };
                if update.is_empty() {
                    return Err("Nothing to update. Pass --water and/or --kcal.".into());
                }

                match ledger.update_goals(update)? {
                    Outcome::Unchanged => println!("Goals unchanged:"),
                    _ => println!("Updated goals:"),
                }
                println!("{}", ledger.goals());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sportlog_core::MemoryStore;

    #[test]
    fn test_set_merges_goals() {
        let mut ledger = LedgerStore::open(MemoryStore::new()).unwrap();
        GoalsCommand {
            command: GoalsSubcommand::Set {
                water: Some(2500),
                kcal: None,
            },
        }
        .run(&mut ledger)
        .unwrap();

        assert_eq!(ledger.goals().water_ml_per_day, 2500);
        assert_eq!(ledger.goals().kcal_per_day, 2200);
    }

    #[test]
    fn test_set_rejects_non_positive_and_empty() {
        let mut ledger = LedgerStore::open(MemoryStore::new()).unwrap();

        let negative = GoalsCommand {
            command: GoalsSubcommand::Set {
                water: None,
                kcal: Some(-100),
            },
        }
        .run(&mut ledger);
        assert!(negative.is_err());

        let empty = GoalsCommand {
            command: GoalsSubcommand::Set {
                water: None,
                kcal: None,
            },
        }
        .run(&mut ledger);
        assert!(empty.is_err());
        assert_eq!(ledger.goals().kcal_per_day, 2200);
    }
}
