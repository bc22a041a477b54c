//! Arkanoid entry point
//!
//! Runs the game in the terminal: the terminal stands in for the display and
//! the keyboard for the touch bar.

use std::rc::Rc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio::task::LocalSet;

use arkanoid::persistence::ConfiguredStore;
use arkanoid::platform::TerminalConnector;
use arkanoid::platform::terminal::{self, HostInput};
use arkanoid::{EventLog, Session, Settings};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    log::info!("Arkanoid starting...");

    let settings = Settings::load();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    terminal::enter()?;
    let result = LocalSet::new().block_on(&runtime, run(settings));

    // Always try to restore terminal state
    let _ = terminal::exit();
    result
}

async fn run(settings: Settings) -> Result<()> {
    let log = Rc::new(EventLog::new(settings.log_capacity));
    let store = ConfiguredStore::from_settings(&settings);
    let session = Session::new(TerminalConnector, store, settings, log);

    let (tx, mut rx) = mpsc::unbounded_channel();
    let input = terminal::spawn_input_thread(tx);

    terminal::draw_status(&session.status())?;
    session.connect().await;
    terminal::draw_status(&session.status())?;

    while let Some(input) = rx.recv().await {
        match input {
            HostInput::Quit => break,
            HostInput::Event(arkanoid::platform::HostEvent::Start) => {
                if !session.is_connected() {
                    session.connect().await;
                }
                session.action().await;
            }
            HostInput::Event(event) => session.handle_event(event).await,
        }
        terminal::draw_status(&session.status())?;
    }

    drop(rx);
    if input.join().is_err() {
        log::warn!("input thread panicked");
    }
    log::info!("Arkanoid exiting");
    Ok(())
}
