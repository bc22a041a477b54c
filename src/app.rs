//! Game controller
//!
//! Owns the one `GameState` and runs the fixed-tick loop on the current
//! `LocalSet`. Frame pushes and score calls are spawned next to the loop so
//! a slow display or score store never holds up a tick.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use tokio::time::Instant;

use crate::error::Result;
use crate::event_log::EventLog;
use crate::highscores::{merge_fetched, merge_submitted};
use crate::persistence::ScoreStore;
use crate::platform::{Display, HostEvent};
use crate::renderer::{PushOutcome, Renderer};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, PhaseEvent, tick};

pub struct App<D, S> {
    state: RefCell<GameState>,
    renderer: Renderer<D>,
    store: S,
    log: Rc<EventLog>,
    settings: Settings,
    /// Bumped on every new game so a stale loop stops ticking
    generation: Cell<u64>,
}

impl<D, S> App<D, S>
where
    D: Display + 'static,
    S: ScoreStore + 'static,
{
    pub fn new(display: D, store: S, settings: Settings, log: Rc<EventLog>) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(GameState::new()),
            renderer: Renderer::new(display, Rc::clone(&log)),
            store,
            log,
            settings,
            generation: Cell::new(0),
        })
    }

    pub fn state(&self) -> Ref<'_, GameState> {
        self.state.borrow()
    }

    pub fn renderer(&self) -> &Renderer<D> {
        &self.renderer
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    fn snapshot(&self) -> GameState {
        self.state.borrow().clone()
    }

    /// Show the splash page and fetch the best score in the background
    pub async fn init(self: &Rc<Self>) -> Result<()> {
        let snapshot = self.snapshot();
        self.renderer.init(&snapshot, &self.settings).await?;
        self.spawn_fetch();
        self.log.append("Arkanoid: ready. Tap to start.");
        Ok(())
    }

    /// New game, or back to the splash page from game over.
    /// Does nothing while a game is running.
    pub async fn start_game(self: &Rc<Self>) {
        let phase = self.state.borrow().phase;
        if phase.is_running() {
            return;
        }

        if phase.is_over() {
            self.state.borrow_mut().transition(PhaseEvent::Dismiss);
            let snapshot = self.snapshot();
            if let Err(e) = self.renderer.show_splash(&snapshot).await {
                self.log.append(format!("Arkanoid: splash failed: {}", e));
            }
            self.log.append("Arkanoid: back to splash");
            return;
        }

        if !self.state.borrow_mut().reset_game() {
            return;
        }
        let generation = self.generation.get() + 1;
        self.generation.set(generation);
        self.log.append("Arkanoid: new game started");

        // The game page must be up before the first tick
        self.push_queued(|| self.snapshot()).await;

        let app = Rc::clone(self);
        tokio::task::spawn_local(app.game_loop(generation));
    }

    /// Apply one host event
    pub async fn handle_event(self: &Rc<Self>, event: HostEvent) {
        match event {
            HostEvent::MoveLeft => self.state.borrow_mut().move_paddle_left(),
            HostEvent::MoveRight => self.state.borrow_mut().move_paddle_right(),
            HostEvent::Tap => {
                let (attached, running) = {
                    let state = self.state.borrow();
                    (state.ball_attached(), state.is_running())
                };
                if attached {
                    self.state.borrow_mut().launch();
                    log::debug!("ball launched");
                } else if !running {
                    self.start_game().await;
                }
            }
            HostEvent::Start => self.start_game().await,
        }
    }

    async fn game_loop(self: Rc<Self>, generation: u64) {
        self.log.append("Arkanoid: game loop started");
        let interval = self.settings.tick_interval();

        while self.is_current(generation) && self.state.borrow().is_running() {
            let start = Instant::now();

            let event = tick(&mut self.state.borrow_mut());
            if let Some(event) = event {
                self.on_game_event(event);
                if let GameEvent::GameOver { .. } = event {
                    // Taken before any await so a quick dismiss cannot skip it
                    let final_state = self.snapshot();
                    self.finish_game(final_state).await;
                    return;
                }
            }
            self.spawn_push();

            tokio::time::sleep(interval.saturating_sub(start.elapsed())).await;
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.get() == generation
    }

    fn on_game_event(&self, event: GameEvent) {
        match event {
            GameEvent::LifeLost { lives_left } => {
                self.log
                    .append(format!("Arkanoid: ball lost, {} lives left", lives_left));
            }
            GameEvent::GameOver { won } => log::debug!("game over this tick, won={}", won),
            other => log::trace!("{:?}", other),
        }
    }

    /// Show the game-over page, then submit the score in the background
    async fn finish_game(self: &Rc<Self>, final_state: GameState) {
        let (score, won) = (final_state.score, final_state.won());
        self.push_queued(move || final_state).await;

        self.log.append(format!(
            "Arkanoid: game over, score={}, won={}",
            score, won
        ));
        self.spawn_submit(score);
    }

    /// Push the current state, logging failures
    async fn push_now(&self) -> Option<PushOutcome> {
        let snapshot = self.snapshot();
        let pushed = self.renderer.push_frame(&snapshot).await;
        self.check_push(pushed)
    }

    /// Wait for any push in flight, then push
    async fn push_queued(&self, state: impl FnOnce() -> GameState) -> Option<PushOutcome> {
        let pushed = self.renderer.push_frame_queued(state).await;
        self.check_push(pushed)
    }

    fn check_push(&self, pushed: Result<PushOutcome>) -> Option<PushOutcome> {
        match pushed {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                self.log.append(format!("Arkanoid: frame push failed: {}", e));
                None
            }
        }
    }

    /// Push in the background; dropped if a push is already out
    fn spawn_push(self: &Rc<Self>) {
        if self.renderer.is_busy() {
            return;
        }
        let app = Rc::clone(self);
        tokio::task::spawn_local(async move {
            app.push_now().await;
        });
    }

    fn spawn_fetch(self: &Rc<Self>) {
        let app = Rc::clone(self);
        tokio::task::spawn_local(async move {
            match app.store.fetch_best().await {
                Ok(record) => {
                    let (best, running) = {
                        let mut state = app.state.borrow_mut();
                        state.high_score = merge_fetched(state.high_score, record);
                        (state.high_score, state.is_running())
                    };
                    app.log
                        .append(format!("Score: fetched, highScore={}", best));
                    if !running {
                        app.push_queued(|| app.snapshot()).await;
                    }
                }
                Err(e) => app.log.append(format!("Score: fetch failed: {}", e)),
            }
        });
    }

    fn spawn_submit(self: &Rc<Self>, score: u32) {
        let app = Rc::clone(self);
        tokio::task::spawn_local(async move {
            match app.store.submit(score).await {
                Ok(record) => {
                    let best = {
                        let mut state = app.state.borrow_mut();
                        state.high_score = merge_submitted(score, record);
                        state.high_score
                    };
                    app.log.append(format!(
                        "Score: submitted {}, highScore={}",
                        score, best
                    ));
                    app.push_queued(|| app.snapshot()).await;
                }
                Err(e) => app.log.append(format!("Score: submit failed: {}", e)),
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryScoreStore;
    use crate::platform::{DisplayCall, MemoryDisplay};
    use crate::renderer::PageMode;
    use crate::renderer::page::{INFO_ID, SCREEN_ID};
    use crate::sim::{Ball, GamePhase};
    use glam::Vec2;
    use std::time::Duration;
    use tokio::task::LocalSet;

    type TestApp = App<MemoryDisplay, MemoryScoreStore>;

    fn test_settings() -> Settings {
        Settings {
            tick_ms: 1,
            logo_path: "no/such/logo.png".into(),
            gameover_path: "no/such/gameover.png".into(),
            ..Settings::default()
        }
    }

    fn new_app(best: Option<u32>) -> (Rc<TestApp>, MemoryDisplay) {
        let display = MemoryDisplay::new();
        let app = App::new(
            display.clone(),
            MemoryScoreStore::new(best),
            test_settings(),
            Rc::new(EventLog::default()),
        );
        (app, display)
    }

    /// Let spawned tasks run until `cond` holds
    async fn until(cond: impl Fn() -> bool) {
        for _ in 0..2000 {
            if cond() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(1)).await;
        }
        panic!("condition not reached");
    }

    /// Park the ball just past the paddle, falling, far from it
    fn drop_ball(app: &TestApp, lives: u8) {
        let mut state = app.state.borrow_mut();
        state.phase = GamePhase::Playing;
        state.lives = lives;
        state.ball = Ball {
            pos: Vec2::new(0.5, 9.6),
            dir: Vec2::new(0.0, 1.0),
            speed: 0.8,
        };
    }

    #[tokio::test]
    async fn test_init_shows_splash_and_fetches_best() {
        LocalSet::new()
            .run_until(async {
                let (app, display) = new_app(Some(40));
                app.init().await.unwrap();

                assert!(matches!(display.calls()[0], DisplayCall::Create(_)));
                assert!(app.log().contains("Arkanoid: failed to load logo.png"));

                until(|| app.state().high_score == 40).await;
                until(|| display.last_text(INFO_ID).is_some()).await;
                assert_eq!(
                    display.last_text(INFO_ID).as_deref(),
                    Some("Best: 40 · Tap to start · Swipe to move")
                );
                assert!(app.log().contains("Score: fetched, highScore=40"));
            })
            .await;
    }

    #[tokio::test]
    async fn test_fetch_failure_is_logged() {
        LocalSet::new()
            .run_until(async {
                let display = MemoryDisplay::new();
                let store = MemoryScoreStore::new(Some(5));
                store.set_failing(true);
                let app = App::new(
                    display,
                    store,
                    test_settings(),
                    Rc::new(EventLog::default()),
                );
                app.init().await.unwrap();

                until(|| app.log().contains("Score: fetch failed")).await;
                assert_eq!(app.state().high_score, 0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_start_builds_game_page_before_loop() {
        LocalSet::new()
            .run_until(async {
                let (app, display) = new_app(None);
                app.init().await.unwrap();

                app.start_game().await;
                // Page is up as soon as start_game returns
                assert_eq!(app.renderer().mode(), PageMode::Game);
                assert!(app.state().ball_attached());
                assert!(matches!(display.last_page(), Some(p) if p.text(SCREEN_ID).is_some()));

                // Starting again while running changes nothing
                app.state.borrow_mut().paddle_x = 3;
                app.start_game().await;
                assert_eq!(app.state().paddle_x, 3);

                until(|| display.last_text(SCREEN_ID).is_some()).await;
                assert!(app.log().contains("Arkanoid: game loop started"));
            })
            .await;
    }

    #[tokio::test]
    async fn test_tap_launches_and_moves_ball() {
        LocalSet::new()
            .run_until(async {
                let (app, _display) = new_app(None);
                app.init().await.unwrap();

                app.handle_event(HostEvent::Tap).await;
                assert!(app.state().ball_attached());

                app.handle_event(HostEvent::MoveLeft).await;
                assert_eq!(app.state().paddle_x, 9);
                assert_eq!(app.state().ball.pos.x, 11.0);

                app.handle_event(HostEvent::Tap).await;
                assert_eq!(app.state().phase, GamePhase::Playing);
                until(|| app.state().ball.pos.y < 8.0).await;
            })
            .await;
    }

    #[tokio::test]
    async fn test_game_over_submits_score() {
        LocalSet::new()
            .run_until(async {
                let (app, display) = new_app(Some(3));
                app.init().await.unwrap();
                until(|| app.state().high_score == 3).await;

                app.start_game().await;
                app.state.borrow_mut().score = 12;
                drop_ball(&app, 1);

                until(|| app.state().high_score == 12).await;
                assert_eq!(app.state().phase, GamePhase::GameOverLost);
                assert_eq!(app.renderer().mode(), PageMode::GameOver);
                assert!(app.log().contains("Arkanoid: game over, score=12, won=false"));

                app.renderer().settle().await;
                until(|| {
                    display.last_text(INFO_ID).as_deref()
                        == Some("Score: 12 · Best: 12 · Tap to play again")
                })
                .await;
            })
            .await;
    }

    #[tokio::test]
    async fn test_tap_right_after_last_tick_still_finishes_game() {
        LocalSet::new()
            .run_until(async {
                let display = MemoryDisplay::new();
                let settings = Settings {
                    tick_ms: 40,
                    ..test_settings()
                };
                let app = App::new(
                    display.clone(),
                    MemoryScoreStore::new(None),
                    settings,
                    Rc::new(EventLog::default()),
                );
                app.init().await.unwrap();
                app.start_game().await;
                app.state.borrow_mut().score = 6;
                drop_ball(&app, 1);

                // Dismiss while the loop would still be sleeping off the last tick
                until(|| app.state().is_over()).await;
                app.handle_event(HostEvent::Tap).await;
                assert_eq!(app.state().phase, GamePhase::Splash);

                until(|| app.store.submissions() == vec![6]).await;
                assert!(app.log().contains("Arkanoid: game over, score=6, won=false"));
                assert!(display.calls().iter().any(|c| matches!(
                    c,
                    DisplayCall::Rebuild(p)
                        if p.text(INFO_ID).is_some_and(|t| t.content.starts_with("Score: 6"))
                )));
                assert_eq!(app.renderer().mode(), PageMode::Splash);
            })
            .await;
    }

    #[tokio::test]
    async fn test_submit_failure_keeps_local_best() {
        LocalSet::new()
            .run_until(async {
                let display = MemoryDisplay::new();
                let store = MemoryScoreStore::new(None);
                store.set_failing(true);
                let app = App::new(
                    display,
                    store,
                    test_settings(),
                    Rc::new(EventLog::default()),
                );
                app.init().await.unwrap();

                app.start_game().await;
                app.state.borrow_mut().score = 7;
                drop_ball(&app, 1);

                until(|| app.log().contains("Score: submit failed")).await;
                assert_eq!(app.state().high_score, 0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_tap_after_game_over_returns_to_splash() {
        LocalSet::new()
            .run_until(async {
                let (app, display) = new_app(None);
                app.init().await.unwrap();
                app.start_game().await;
                drop_ball(&app, 1);
                until(|| app.log().contains("Arkanoid: game over")).await;

                app.handle_event(HostEvent::Tap).await;
                assert_eq!(app.state().phase, GamePhase::Splash);
                assert_eq!(app.renderer().mode(), PageMode::Splash);
                assert_eq!(display.last_page().unwrap().text(INFO_ID).unwrap().x, 130);

                // Next tap starts a fresh game
                app.handle_event(HostEvent::Tap).await;
                assert!(app.state().ball_attached());
                assert_eq!(app.state().lives, crate::consts::LIVES);
                assert_eq!(app.renderer().mode(), PageMode::Game);
            })
            .await;
    }

    #[tokio::test]
    async fn test_display_failure_does_not_stop_loop() {
        LocalSet::new()
            .run_until(async {
                let (app, display) = new_app(None);
                app.init().await.unwrap();
                app.start_game().await;

                display.set_failing(true);
                app.handle_event(HostEvent::Tap).await;
                until(|| app.log().contains("Arkanoid: frame push failed")).await;
                let y = app.state().ball.pos.y;
                until(|| app.state().ball.pos.y != y).await;
            })
            .await;
    }
}
