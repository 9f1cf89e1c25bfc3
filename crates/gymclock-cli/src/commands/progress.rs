use clap::Subcommand;
use gymclock_core::clock::{iso_date, Clock, SystemClock};
use gymclock_core::storage::Database;
use gymclock_core::ProgressStore;

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Today's progress against the daily target
    Today,
    /// Record one completed workout for today
    Record,
}

pub fn run(action: ProgressAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let mut store = ProgressStore::load(Box::new(db));
    let today = iso_date(SystemClock.today());

    let day = match action {
        ProgressAction::Today => store.day(&today),
        ProgressAction::Record => store.record_completion(&today, None),
    };
    println!("{}", serde_json::to_string_pretty(&day)?);
    Ok(())
}
