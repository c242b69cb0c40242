use clap::{Args, Subcommand};
use sportlog_core::{KeyValueStore, LedgerStore, NewFood, Outcome};

use super::{day_total, resolve_date, OutputFormat};

#[derive(Args)]
pub struct FoodCommand {
    #[command(subcommand)]
    pub command: FoodSubcommand,
}

#[derive(Subcommand)]
pub enum FoodSubcommand {
    /// Log a food item
    Add {
        /// Food name
        name: String,

        /// Energy in kcal
        #[arg(long)]
        kcal: u32,

        /// Protein in grams
        #[arg(long)]
        protein: Option<f64>,

        /// Carbohydrates in grams
        #[arg(long)]
        carbs: Option<f64>,

        /// Fat in grams
        #[arg(long)]
        fat: Option<f64>,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// List food logged on a day
    List {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,

        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a food entry by ID
    Delete {
        /// Entry ID
        id: String,
    },
}

impl FoodCommand {
    pub fn run<K: KeyValueStore>(
        &self,
        ledger: &mut LedgerStore<K>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            FoodSubcommand::Add {
                name,
                kcal,
                protein,
                carbs,
                fat,
                date,
            } => {
                let date = resolve_date(date)?;
                let mut food = NewFood::new(date, name, *kcal);
                if let Some(grams) = protein {
                    food = food.with_protein(*grams);
                }
                if let Some(grams) = carbs {
                    food = food.with_carbs(*grams);
                }
                if let Some(grams) = fat {
                    food = food.with_fat(*grams);
                }

                let id = ledger.add_food(food)?;
                println!("Logged food on {}:", date);
                println!("{}", day_total(ledger.total_kcal(date), "total", date));
                println!();
                println!("Entry ID: {}", id);
            }
            FoodSubcommand::List { date, format } => {
                let date = resolve_date(date)?;
                let foods = ledger.foods_for_date(date);

                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&foods)?);
                    }
                    OutputFormat::Text => {
                        if foods.is_empty() {
                            println!("No food logged on {}", date);
                            return Ok(());
                        }
                        println!("{}", date);
                        println!("{}", "-".repeat(60));
                        for food in &foods {
                            println!("  {}", food);
                            println!("    id: {}", food.id);
                        }
                        println!("\nTotal: {} kcal", ledger.total_kcal(date));
                    }
                }
            }
            FoodSubcommand::Delete { id } => match ledger.delete_food(id)? {
                Outcome::Unchanged => return Err(format!("Food entry not found: {}", id).into()),
                _ => println!("Deleted food entry {}", id),
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sportlog_core::MemoryStore;

    #[test]
    fn test_add_with_macros_and_delete() {
        let mut ledger = LedgerStore::open(MemoryStore::new()).unwrap();

        FoodCommand {
            command: FoodSubcommand::Add {
                name: "Eggs".to_string(),
                kcal: 300,
                protein: Some(20.0),
                carbs: None,
                fat: Some(22.0),
                date: Some("2024-03-04".to_string()),
            },
        }
        .run(&mut ledger)
        .unwrap();

        let day = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let foods = ledger.foods_for_date(day);
        assert_eq!(foods.len(), 1);
        assert_eq!(foods[0].protein, Some(20.0));
        assert!(foods[0].carbs.is_none());
        let id = foods[0].id.clone();

        FoodCommand {
            command: FoodSubcommand::Delete { id },
        }
        .run(&mut ledger)
        .unwrap();
        assert!(ledger.foods_for_date(day).is_empty());
    }

    #[test]
    fn test_delete_unknown_id_fails() {
        let mut ledger = LedgerStore::open(MemoryStore::new()).unwrap();
        let result = FoodCommand {
            command: FoodSubcommand::Delete {
                id: "missing".to_string(),
            },
        }
        .run(&mut ledger);

        assert!(result.unwrap_err().to_string().contains("not found"));
    }
}
