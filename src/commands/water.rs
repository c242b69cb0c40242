use clap::{Args, Subcommand};
use sportlog_core::{projection, KeyValueStore, LedgerStore, Outcome};

use super::{percent, resolve_date};

#[derive(Args)]
pub struct WaterCommand {
    #[command(subcommand)]
    pub command: WaterSubcommand,
}

#[derive(Subcommand)]
pub enum WaterSubcommand {
    /// Add water to a day's total
    Add {
        /// Amount in millilitres (e.g. 250, 500, 1000)
        ml: u32,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Overwrite a day's total
    Set {
        /// Total in millilitres
        #[arg(allow_negative_numbers = true)]
        ml: i64,

        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },

    /// Show a day's water intake against the goal
    Show {
        /// Date (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<String>,
    },
}

impl WaterCommand {
    pub fn run<K: KeyValueStore>(
        &self,
        ledger: &mut LedgerStore<K>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            WaterSubcommand::Add { ml, date } => {
                let date = resolve_date(date)?;
                ledger.add_water(date, *ml)?;
                println!("Added {} ml on {}", ml, date);
                print_water(ledger, date);
            }
            WaterSubcommand::Set { ml, date } => {
                let date = resolve_date(date)?;
                match ledger.set_water(date, *ml)? {
                    Outcome::Unchanged => println!("Water for {} already {} ml", date, ml),
                    _ => println!("Set water for {} to {} ml", date, ml),
                }
                print_water(ledger, date);
            }
            WaterSubcommand::Show { date } => {
                let date = resolve_date(date)?;
                print_water(ledger, date);
            }
        }
        Ok(())
    }
}

fn print_water<K: KeyValueStore>(ledger: &LedgerStore<K>, date: chrono::NaiveDate) {
    let snapshot = ledger.snapshot();
    println!(
        "  Water: {} / {} ml ({})",
        ledger.get_water(date),
        ledger.goals().water_ml_per_day,
        percent(ledger.progress_water(date))
    );

    let remaining = projection::water_remaining(snapshot, date);
    if remaining == 0 {
        println!("  Daily goal reached");
    } else {
        println!("  Remaining: {} ml", remaining);
    }
}
