use clap::Subcommand;
use gymclock_core::calendar::{month_view, week_summary, MonthView};
use gymclock_core::clock::SystemClock;
use gymclock_core::storage::Database;
use gymclock_core::ProgressStore;

#[derive(Subcommand)]
pub enum CalendarAction {
    /// Show this month's completion calendar
    Show {
        /// Print the raw month view as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the last seven days
    Week,
}

pub fn run(action: CalendarAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let store = ProgressStore::load(Box::new(db));

    match action {
        CalendarAction::Show { json } => {
            let view = month_view(&store, &SystemClock);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_month(&view);
            }
        }
        CalendarAction::Week => {
            let week = week_summary(&store, &SystemClock);
            for cell in week {
                let marker = if cell.completed { "x" } else { " " };
                let today = if cell.is_today { "  <- today" } else { "" };
                println!("[{marker}] {}  {} sets{today}", cell.date, cell.sets);
            }
        }
    }
    Ok(())
}

fn print_month(view: &MonthView) {
    println!("{} {}", view.month_name, view.year);
    for (i, cell) in view.days.iter().enumerate() {
        let label = if cell.completed {
            "  x".to_string()
        } else {
            format!("{:>3}", cell.day)
        };
        if cell.is_today {
            print!("[{label}]");
        } else {
            print!(" {label} ");
        }
        if (i + 1) % 7 == 0 {
            println!();
        }
    }
    println!();
    let done = view.days.iter().filter(|c| c.completed).count();
    println!("{done}/{} days completed", view.days.len());
}
