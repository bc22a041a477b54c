//! Frame pushes to the display
//!
//! `Renderer` tracks which page the display shows and turns each push into the
//! one display call that brings it up to date. Only one push runs at a time;
//! a push that arrives while another is in flight is dropped.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tokio::sync::Notify;

use super::assets::Assets;
use super::grid::render_grid;
use super::page::{self, PageMode};
use crate::error::Result;
use crate::event_log::EventLog;
use crate::platform::{Display, PageLayout};
use crate::settings::Settings;
use crate::sim::GameState;

/// What a push did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    /// No page has been set up yet
    NotReady,
    /// Another push was in flight
    Skipped,
    /// A new page was built
    Page(PageMode),
    /// The splash / game-over info line was refreshed
    Info,
    /// The game grid was refreshed
    Grid,
}

pub struct Renderer<D> {
    display: D,
    log: Rc<EventLog>,
    assets: RefCell<Assets>,
    mode: Cell<PageMode>,
    startup_rendered: Cell<bool>,
    page_set_up: Cell<bool>,
    in_flight: Cell<bool>,
    idle: Notify,
}

/// Clears the in-flight flag however the push ends
struct InFlight<'a> {
    flag: &'a Cell<bool>,
    idle: &'a Notify,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
        self.idle.notify_waiters();
    }
}

impl<D: Display> Renderer<D> {
    pub fn new(display: D, log: Rc<EventLog>) -> Self {
        Self {
            display,
            log,
            assets: RefCell::new(Assets::default()),
            mode: Cell::new(PageMode::Splash),
            startup_rendered: Cell::new(false),
            page_set_up: Cell::new(false),
            in_flight: Cell::new(false),
            idle: Notify::new(),
        }
    }

    pub fn mode(&self) -> PageMode {
        self.mode.get()
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.get()
    }

    /// Load images and show the splash page
    pub async fn init(&self, state: &GameState, settings: &Settings) -> Result<()> {
        let mut assets = self.assets.take();
        assets.load_missing(settings, &self.log).await;
        self.assets.replace(assets);

        self.show_splash(state).await?;
        self.log.append("Arkanoid: display initialized");
        Ok(())
    }

    /// Wait until no push is in flight
    pub async fn settle(&self) {
        while self.in_flight.get() {
            self.idle.notified().await;
        }
    }

    fn begin(&self) -> Option<InFlight<'_>> {
        if self.in_flight.replace(true) {
            return None;
        }
        Some(InFlight {
            flag: &self.in_flight,
            idle: &self.idle,
        })
    }

    /// Wait for the push slot and take it
    async fn acquire(&self) -> InFlight<'_> {
        loop {
            self.settle().await;
            if let Some(guard) = self.begin() {
                return guard;
            }
        }
    }

    /// Build the splash page, waiting for any push in flight first
    pub async fn show_splash(&self, state: &GameState) -> Result<()> {
        let _guard = self.acquire().await;
        self.show_page(&page::splash_page(state), PageMode::Splash)
            .await?;
        let logo = self.assets.borrow().logo.clone();
        self.push_image(logo.as_deref()).await
    }

    /// Bring the display up to date with `state`; dropped if a push is in flight
    pub async fn push_frame(&self, state: &GameState) -> Result<PushOutcome> {
        if !self.page_set_up.get() {
            return Ok(PushOutcome::NotReady);
        }
        let Some(_guard) = self.begin() else {
            log::trace!("push skipped, previous still in flight");
            return Ok(PushOutcome::Skipped);
        };
        self.sync(state).await
    }

    /// Like `push_frame`, but waits its turn instead of being dropped.
    /// `state` is called once the slot is taken.
    pub async fn push_frame_queued(
        &self,
        state: impl FnOnce() -> GameState,
    ) -> Result<PushOutcome> {
        if !self.page_set_up.get() {
            return Ok(PushOutcome::NotReady);
        }
        let _guard = self.acquire().await;
        self.sync(&state()).await
    }

    async fn sync(&self, state: &GameState) -> Result<PushOutcome> {
        let mode = self.mode.get();
        if mode != PageMode::Game && state.is_running() {
            self.show_page(&page::game_page(render_grid(state)), PageMode::Game)
                .await?;
            return Ok(PushOutcome::Page(PageMode::Game));
        }

        if mode == PageMode::Game && state.is_over() {
            self.show_page(&page::game_over_page(state), PageMode::GameOver)
                .await?;
            let gameover = self.assets.borrow().gameover.clone();
            self.push_image(gameover.as_deref()).await?;
            return Ok(PushOutcome::Page(PageMode::GameOver));
        }

        match mode {
            PageMode::Splash | PageMode::GameOver => {
                let text = if mode == PageMode::Splash {
                    page::splash_text(state)
                } else {
                    page::game_over_text(state)
                };
                self.display.update_text(&page::info_update(text)).await?;
                Ok(PushOutcome::Info)
            }
            PageMode::Game => {
                self.display
                    .update_text(&page::screen_update(render_grid(state)))
                    .await?;
                Ok(PushOutcome::Grid)
            }
        }
    }

    /// The first page of a session is created, later ones rebuilt
    async fn show_page(&self, layout: &PageLayout, mode: PageMode) -> Result<()> {
        if self.startup_rendered.get() {
            self.display.rebuild_page(layout).await?;
        } else {
            self.display.create_page(layout).await?;
            self.startup_rendered.set(true);
        }
        self.page_set_up.set(true);
        self.mode.set(mode);
        log::debug!("page -> {:?}", mode);
        Ok(())
    }

    async fn push_image(&self, bytes: Option<&[u8]>) -> Result<()> {
        match bytes {
            Some(bytes) => self.display.update_image(&page::image_update(bytes)).await,
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{DisplayCall, MemoryDisplay};
    use crate::renderer::page::{INFO_ID, SCREEN_ID};
    use crate::sim::GamePhase;
    use std::time::Duration;

    fn renderer() -> (Renderer<MemoryDisplay>, MemoryDisplay) {
        let display = MemoryDisplay::new();
        let renderer = Renderer::new(display.clone(), Rc::new(EventLog::default()));
        (renderer, display)
    }

    #[tokio::test]
    async fn test_push_before_setup_is_ignored() {
        let (renderer, display) = renderer();
        let outcome = renderer.push_frame(&GameState::new()).await.unwrap();
        assert_eq!(outcome, PushOutcome::NotReady);
        assert!(display.calls().is_empty());
    }

    #[tokio::test]
    async fn test_page_flow() {
        let (renderer, display) = renderer();
        let mut state = GameState::new();

        renderer.show_splash(&state).await.unwrap();
        assert!(matches!(display.calls()[0], DisplayCall::Create(_)));
        assert_eq!(renderer.mode(), PageMode::Splash);

        // Splash refresh updates the info line only
        state.high_score = 9;
        let outcome = renderer.push_frame(&state).await.unwrap();
        assert_eq!(outcome, PushOutcome::Info);
        assert_eq!(
            display.last_text(INFO_ID).as_deref(),
            Some("Best: 9 · Tap to start · Swipe to move")
        );

        // Running game: the game page replaces the splash
        state.reset_game();
        let outcome = renderer.push_frame(&state).await.unwrap();
        assert_eq!(outcome, PushOutcome::Page(PageMode::Game));
        assert!(matches!(display.calls().last(), Some(DisplayCall::Rebuild(_))));

        let outcome = renderer.push_frame(&state).await.unwrap();
        assert_eq!(outcome, PushOutcome::Grid);
        assert_eq!(display.last_text(SCREEN_ID), Some(render_grid(&state)));

        // Game over page
        state.phase = GamePhase::GameOverLost;
        state.score = 4;
        let outcome = renderer.push_frame(&state).await.unwrap();
        assert_eq!(outcome, PushOutcome::Page(PageMode::GameOver));
        let page = display.last_page().unwrap();
        assert_eq!(
            page.text(INFO_ID).unwrap().content,
            "Score: 4 · Best: 9 · Tap to play again"
        );

        let outcome = renderer.push_frame(&state).await.unwrap();
        assert_eq!(outcome, PushOutcome::Info);
    }

    #[tokio::test]
    async fn test_images_follow_pages() {
        let (renderer, display) = renderer();
        renderer.assets.replace(Assets {
            logo: Some(vec![1, 2, 3]),
            gameover: Some(vec![4]),
        });

        let mut state = GameState::new();
        renderer.show_splash(&state).await.unwrap();
        assert!(matches!(
            display.calls().last(),
            Some(DisplayCall::Image(img)) if img.data == vec![1, 2, 3]
        ));

        state.reset_game();
        renderer.push_frame(&state).await.unwrap();
        state.phase = GamePhase::GameOverWon;
        renderer.push_frame(&state).await.unwrap();
        assert!(matches!(
            display.calls().last(),
            Some(DisplayCall::Image(img)) if img.data == vec![4]
        ));
    }

    #[tokio::test]
    async fn test_failed_push_keeps_page() {
        let (renderer, display) = renderer();
        let mut state = GameState::new();
        renderer.show_splash(&state).await.unwrap();

        display.set_failing(true);
        state.reset_game();
        assert!(renderer.push_frame(&state).await.is_err());
        assert_eq!(renderer.mode(), PageMode::Splash);
        assert!(!renderer.is_busy());

        display.set_failing(false);
        let outcome = renderer.push_frame(&state).await.unwrap();
        assert_eq!(outcome, PushOutcome::Page(PageMode::Game));
    }

    #[tokio::test]
    async fn test_single_push_in_flight() {
        let (renderer, display) = renderer();
        let state = GameState::new();
        renderer.show_splash(&state).await.unwrap();
        display.set_latency(Duration::from_millis(20));

        let (first, second) = tokio::join!(renderer.push_frame(&state), async {
            tokio::task::yield_now().await;
            renderer.push_frame(&state).await
        });
        assert_eq!(first.unwrap(), PushOutcome::Info);
        assert_eq!(second.unwrap(), PushOutcome::Skipped);

        renderer.settle().await;
        assert!(!renderer.is_busy());
    }

    #[tokio::test]
    async fn test_queued_push_waits_its_turn() {
        let (renderer, display) = renderer();
        let mut state = GameState::new();
        renderer.show_splash(&state).await.unwrap();
        display.set_latency(Duration::from_millis(20));

        let first = state.clone();
        assert!(state.reset_game());
        let (a, b) = tokio::join!(renderer.push_frame(&first), async {
            tokio::task::yield_now().await;
            renderer.push_frame_queued(|| state.clone()).await
        });
        assert_eq!(a.unwrap(), PushOutcome::Info);
        assert_eq!(b.unwrap(), PushOutcome::Page(PageMode::Game));
        assert_eq!(renderer.mode(), PageMode::Game);
    }
}
