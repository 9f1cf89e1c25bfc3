use chrono::Utc;
use clap::Subcommand;
use gymclock_core::storage::Database;
use gymclock_core::{Event, ProgressStore};

#[derive(Subcommand)]
pub enum TargetAction {
    /// Show the current daily target
    Show,
    /// Set the daily target (clamped to at least 1)
    Set {
        /// Sets per day
        sets: u32,
    },
    /// Raise the target by one set
    Up,
    /// Lower the target by one set
    Down,
}

pub fn run(action: TargetAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut store = ProgressStore::load(Box::new(db));

    let changed_to = match action {
        TargetAction::Show => {
            println!("{}", store.target());
            return Ok(());
        }
        TargetAction::Set { sets } => store.set_target(sets),
        TargetAction::Up => store.set_target(store.target() + 1),
        TargetAction::Down => store.set_target(store.target().saturating_sub(1)),
    };

    let event = Event::TargetChanged {
        target_sets: changed_to,
        at: Utc::now(),
    };
    println!("{}", serde_json::to_string_pretty(&event)?);
    Ok(())
}
