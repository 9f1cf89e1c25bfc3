use std::io::Write;

use clap::Subcommand;
use gymclock_core::clock::{iso_date, Clock, SystemClock};
use gymclock_core::storage::{Config, Database};
use gymclock_core::timer::{Cue, Phase, SilentCue, TerminalBell, Ticker, TimerEngine};
use gymclock_core::{Event, ProgressStore};
use tokio::sync::mpsc;

const ENGINE_KEY: &str = "timer_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown
    Start,
    /// Pause the countdown, preserving phase, seconds and set
    Pause,
    /// Toggle between running and paused
    Toggle,
    /// Force the current phase to its boundary
    Skip,
    /// Reset to the initial state
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Run the timer interactively until the workout completes
    Run {
        /// Suppress the audible cue
        #[arg(long)]
        quiet: bool,
    },
}

fn load_engine(db: &Database, config: &Config) -> TimerEngine {
    if let Ok(Some(json)) = db.kv_get(ENGINE_KEY) {
        if let Ok(engine) = serde_json::from_str::<TimerEngine>(&json) {
            return engine;
        }
    }
    TimerEngine::new(config.timer_config())
}

fn save_engine(db: &Database, engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string(engine)?;
    db.kv_set(ENGINE_KEY, &json)?;
    Ok(())
}

/// Wire a completion into the progress store: one more set for today.
fn record_completion(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    if let Event::WorkoutCompleted { total_calories, .. } = event {
        let db = Database::open()?;
        let mut store = ProgressStore::load(Box::new(db));
        let today = iso_date(SystemClock.today());
        let day = store.record_completion(&today, *total_calories);
        eprintln!(
            "today: {}/{} sets{}",
            day.completed_sets,
            day.target_sets,
            if day.fully_completed { " -- target reached" } else { "" }
        );
    }
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();
    let mut engine = load_engine(&db, &config);

    match action {
        TimerAction::Start => {
            match engine.start() {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("{}", serde_json::to_string_pretty(&engine.snapshot())?),
            }
        }
        TimerAction::Pause => {
            match engine.pause() {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("{}", serde_json::to_string_pretty(&engine.snapshot())?),
            }
        }
        TimerAction::Toggle => {
            match engine.toggle() {
                Some(event) => println!("{}", serde_json::to_string_pretty(&event)?),
                None => println!("{}", serde_json::to_string_pretty(&engine.snapshot())?),
            }
        }
        TimerAction::Skip => {
            if let Some(event) = engine.skip() {
                if config.cue.enabled {
                    TerminalBell.beep();
                }
                record_completion(&event)?;
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
            }
        }
        TimerAction::Reset => {
            if let Some(event) = engine.reset() {
                println!("{}", serde_json::to_string_pretty(&event)?);
            }
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
        }
        TimerAction::Run { quiet } => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_interactive(&mut engine, &config, quiet))?;
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}

/// Drive the engine with a live 1-second ticker until the workout
/// completes or the receiving side is torn down.
async fn run_interactive(
    engine: &mut TimerEngine,
    config: &Config,
    quiet: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if engine.is_finished() {
        println!("workout already complete -- `gymclock timer reset` to go again");
        return Ok(());
    }

    let cue: Box<dyn Cue> = if quiet || !config.cue.enabled {
        Box::new(SilentCue)
    } else {
        Box::new(TerminalBell)
    };
    let mut store = ProgressStore::load(Box::new(Database::open()?));

    engine.start();
    if let Some(exercise) = &config.exercise {
        println!("{}", exercise.name);
    }

    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut ticker = Ticker::new();
    ticker.start(tx);

    print_countdown(engine)?;
    while rx.recv().await.is_some() {
        let event = engine.tick();
        if let Some(event) = event {
            cue.beep();
            match &event {
                Event::PhaseCompleted { phase: Phase::Work, set, .. } => {
                    println!("\nset {set}: work done, rest");
                }
                Event::PhaseCompleted { phase: Phase::Rest, set, .. } => {
                    println!("\nset {} of {}", set + 1, engine.config().total_sets);
                }
                Event::WorkoutCompleted { total_sets, total_calories, .. } => {
                    println!("\nworkout complete: {total_sets} sets");
                    if let Some(kcal) = total_calories {
                        println!("estimated burn: {kcal} kcal");
                    }
                    let today = iso_date(SystemClock.today());
                    let day = store.record_completion(&today, *total_calories);
                    println!(
                        "today: {}/{} sets{}",
                        day.completed_sets,
                        day.target_sets,
                        if day.fully_completed { " -- target reached" } else { "" }
                    );
                    break;
                }
                _ => {}
            }
        }
        print_countdown(engine)?;
    }

    ticker.cancel();
    Ok(())
}

fn print_countdown(engine: &TimerEngine) -> Result<(), Box<dyn std::error::Error>> {
    let phase = match engine.phase() {
        Phase::Work => "WORK",
        Phase::Rest => "REST",
    };
    let secs = engine.seconds_remaining();
    let set = engine.current_set().min(engine.config().total_sets);
    let mut line = format!(
        "{phase}  set {set}/{}  {:02}:{:02}  {:>3}%",
        engine.config().total_sets,
        secs / 60,
        secs % 60,
        engine.phase_progress_pct(),
    );
    if engine.config().calories_per_work_phase.is_some() {
        line.push_str(&format!("  {} kcal", engine.calories_accrued()));
    }
    let mut out = std::io::stdout();
    write!(out, "\r{line}    ")?;
    out.flush()?;
    Ok(())
}
