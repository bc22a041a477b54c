//! Host-facing entry points
//!
//! A host shell drives the game through two actions: `connect` (find the
//! display and show the splash page) and `action` (start a new game). Both
//! report progress through a one-line status string.

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::App;
use crate::error::{ArkanoidError, Result};
use crate::event_log::EventLog;
use crate::persistence::ScoreStore;
use crate::platform::{Connector, HostEvent};
use crate::settings::Settings;

pub const STATUS_INITIAL: &str = "Arkanoid ready";
pub const STATUS_CONNECTING: &str = "Arkanoid: connecting to Even bridge...";
pub const STATUS_CONNECTED: &str = "Arkanoid: connected. Tap to start!";
pub const STATUS_NOT_FOUND: &str = "Arkanoid: bridge not found.";
pub const STATUS_NOT_CONNECTED: &str = "Arkanoid: not connected";
pub const STATUS_NEW_GAME: &str = "Arkanoid: new game!";

type SessionApp<C, S> = App<<C as Connector>::Display, Rc<S>>;

pub struct Session<C: Connector, S> {
    connector: C,
    store: Rc<S>,
    settings: Settings,
    log: Rc<EventLog>,
    app: RefCell<Option<Rc<SessionApp<C, S>>>>,
    status: RefCell<String>,
}

impl<C, S> Session<C, S>
where
    C: Connector,
    C::Display: 'static,
    S: ScoreStore + 'static,
{
    pub fn new(connector: C, store: S, settings: Settings, log: Rc<EventLog>) -> Self {
        Self {
            connector,
            store: Rc::new(store),
            settings,
            log,
            app: RefCell::new(None),
            status: RefCell::new(STATUS_INITIAL.to_string()),
        }
    }

    pub fn status(&self) -> String {
        self.status.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.app.borrow().is_some()
    }

    pub fn app(&self) -> Option<Rc<SessionApp<C, S>>> {
        self.app.borrow().clone()
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    fn set_status(&self, status: &str) {
        log::debug!("status: {}", status);
        *self.status.borrow_mut() = status.to_string();
    }

    /// Wait for the display and bring up the splash page.
    /// On failure the status says so and `connect` may be called again.
    pub async fn connect(&self) -> bool {
        if self.is_connected() {
            log::debug!("already connected");
            return true;
        }

        self.set_status(STATUS_CONNECTING);
        self.log.append("Arkanoid: connect requested");

        match self.open().await {
            Ok(app) => {
                *self.app.borrow_mut() = Some(app);
                self.set_status(STATUS_CONNECTED);
                self.log.append("Arkanoid: connected to bridge");
                true
            }
            Err(e) => {
                log::error!("connect failed: {}", e);
                self.set_status(STATUS_NOT_FOUND);
                self.log.append("Arkanoid: connection failed");
                false
            }
        }
    }

    async fn open(&self) -> Result<Rc<SessionApp<C, S>>> {
        let display = tokio::time::timeout(self.settings.bridge_timeout(), self.connector.connect())
            .await
            .map_err(|_| ArkanoidError::BridgeTimeout {
                waited_ms: self.settings.bridge_timeout_ms,
            })??;

        let app = App::new(
            display,
            Rc::clone(&self.store),
            self.settings.clone(),
            Rc::clone(&self.log),
        );
        app.init().await?;
        Ok(app)
    }

    /// Start a new game
    pub async fn action(&self) {
        let Some(app) = self.app() else {
            self.set_status(STATUS_NOT_CONNECTED);
            return;
        };
        app.start_game().await;
        self.set_status(STATUS_NEW_GAME);
    }

    /// Forward an input event; ignored until connected
    pub async fn handle_event(&self, event: HostEvent) {
        if let Some(app) = self.app() {
            app.handle_event(event).await;
        }
    }
}
