use std::sync::{Arc, Mutex};

use clap::{Subcommand, ValueEnum};
use focusloop_core::timer::ALARM_SOUNDS;
use focusloop_core::{
    format_clock, CompletionAlerts, Database, Scheduler, Snapshot, TimerEngine, TimerMode,
};

use crate::alerts::{ConsoleNotification, TerminalBell};

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run the countdown in the foreground (Ctrl-C pauses and exits)
    Start,
    /// End the current period now and advance to the next one
    Skip,
    /// Restore the full duration, optionally switching mode
    Reset {
        /// Switch to this mode instead of resetting the current one
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,
    },
    /// Print current timer state as JSON
    Status,
    /// List the available alarm sounds
    Sounds,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ModeArg {
    Focus,
    Short,
    Long,
}

impl From<ModeArg> for TimerMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Focus => TimerMode::Focus,
            ModeArg::Short => TimerMode::ShortBreak,
            ModeArg::Long => TimerMode::LongBreak,
        }
    }
}

fn load_engine(db: &Database, alerts: CompletionAlerts) -> TimerEngine {
    TimerEngine::rehydrate(Snapshot::load_from(db), alerts)
}

/// Persistence failures are warnings, never fatal to the countdown.
fn persist(db: &Database, engine: &TimerEngine) {
    if let Err(e) = engine.to_snapshot().save_to(db) {
        eprintln!("warning: failed to persist timer state: {e}");
    }
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TimerAction::Start => start_countdown(),
        TimerAction::Skip => {
            let db = Database::open()?;
            let mut engine = load_engine(&db, CompletionAlerts::disabled());
            let event = engine.skip();
            persist(&db, &engine);
            println!("{}", serde_json::to_string_pretty(&event)?);
            Ok(())
        }
        TimerAction::Reset { mode } => {
            let db = Database::open()?;
            let mut engine = load_engine(&db, CompletionAlerts::disabled());
            let event = engine.reset(mode.map(Into::into));
            persist(&db, &engine);
            println!("{}", serde_json::to_string_pretty(&event)?);
            Ok(())
        }
        TimerAction::Status => {
            let db = Database::open()?;
            let engine = load_engine(&db, CompletionAlerts::disabled());
            println!("{}", serde_json::to_string_pretty(&engine.snapshot_event())?);
            Ok(())
        }
        TimerAction::Sounds => {
            for id in ALARM_SOUNDS {
                println!("{id}");
            }
            Ok(())
        }
    }
}

/// Foreground countdown: start the engine, drive it at 1 Hz until it pauses
/// on its own (session end without auto-start) or the user hits Ctrl-C.
fn start_countdown() -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let alerts = CompletionAlerts::new(Box::new(TerminalBell), Box::new(ConsoleNotification));
    let engine = Arc::new(Mutex::new(load_engine(&db, alerts)));
    let db = Arc::new(Mutex::new(db));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(countdown(db, engine))
}

async fn countdown(
    db: Arc<Mutex<Database>>,
    engine: Arc<Mutex<TimerEngine>>,
) -> Result<(), Box<dyn std::error::Error>> {
    {
        let mut engine = engine.lock().unwrap();
        engine.start();
        if !engine.is_running() {
            println!("{}", serde_json::to_string_pretty(&engine.snapshot_event())?);
            return Ok(());
        }
        print_countdown_line(&engine);
    }

    let mut scheduler = Scheduler::new();
    {
        let engine = engine.clone();
        let db = db.clone();
        scheduler.start(move || {
            let mut engine = engine.lock().unwrap();
            if let Some(event) = engine.tick() {
                persist(&db.lock().unwrap(), &engine);
                println!();
                match serde_json::to_string_pretty(&event) {
                    Ok(json) => println!("{json}"),
                    Err(e) => eprintln!("warning: failed to render event: {e}"),
                }
            }
            print_countdown_line(&engine);
            engine.is_running()
        });
    }

    // Either the engine pauses itself (session end without auto-start) or
    // the user interrupts. Both paths tear the tick source down before the
    // engine is touched again.
    tokio::select! {
        _ = scheduler.joined() => {}
        _ = tokio::signal::ctrl_c() => {}
    }
    scheduler.stop();
    println!();

    let mut engine = engine.lock().unwrap();
    engine.pause();
    persist(&db.lock().unwrap(), &engine);
    println!("{}", serde_json::to_string_pretty(&engine.snapshot_event())?);
    Ok(())
}

fn print_countdown_line(engine: &TimerEngine) {
    print!(
        "\r{} {}  ",
        engine.mode().label(),
        format_clock(engine.remaining_seconds())
    );
    let _ = std::io::Write::flush(&mut std::io::stdout());
}
