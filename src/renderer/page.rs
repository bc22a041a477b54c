//! Page layouts and their info text

use crate::consts::{DISPLAY_HEIGHT, DISPLAY_WIDTH};
use crate::platform::{ImageContainer, ImageUpdate, PageLayout, TextContainer, TextUpdate};
use crate::sim::GameState;

/// Which page the display currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMode {
    Splash,
    Game,
    GameOver,
}

/// Full-page event capture container, present on every page
pub const EVT_ID: u32 = 1;
/// Image container on splash / game-over pages
pub const IMG_ID: u32 = 2;
/// Glyph grid container on the game page
pub const SCREEN_ID: u32 = 2;
/// Info line under the image
pub const INFO_ID: u32 = 3;

pub const LOGO_W: u32 = 200;
pub const LOGO_H: u32 = 100;
pub const LOGO_X: u32 = (DISPLAY_WIDTH - LOGO_W) / 2;
pub const LOGO_Y: u32 = 70;
/// Top of the info line
pub const INFO_Y: u32 = LOGO_Y + LOGO_H + 15;

pub const SPLASH_TEXT_X: u32 = 130;
pub const GAME_OVER_TEXT_X: u32 = 120;

/// Bytes a text update may replace
pub const CONTENT_LENGTH: u32 = 2000;

const SEPARATOR: &str = " · ";

fn event_capture() -> TextContainer {
    TextContainer {
        id: EVT_ID,
        name: "evt",
        content: " ".to_string(),
        x: 0,
        y: 0,
        width: DISPLAY_WIDTH,
        height: DISPLAY_HEIGHT,
        is_event_capture: true,
        padding_length: 0,
    }
}

/// Splash and game-over pages: image plus one line of text under it
pub fn image_page(text: String, text_x: u32) -> PageLayout {
    let info = TextContainer {
        id: INFO_ID,
        name: "info",
        content: text,
        x: text_x,
        y: INFO_Y,
        width: DISPLAY_WIDTH - text_x,
        height: DISPLAY_HEIGHT - INFO_Y,
        is_event_capture: false,
        padding_length: 0,
    };
    let image = ImageContainer {
        id: IMG_ID,
        name: "img",
        x: LOGO_X,
        y: LOGO_Y,
        width: LOGO_W,
        height: LOGO_H,
    };
    PageLayout::new(vec![event_capture(), info], vec![image])
}

pub fn splash_page(state: &GameState) -> PageLayout {
    image_page(splash_text(state), SPLASH_TEXT_X)
}

pub fn game_over_page(state: &GameState) -> PageLayout {
    image_page(game_over_text(state), GAME_OVER_TEXT_X)
}

/// Game page: the glyph grid over the whole display
pub fn game_page(grid: String) -> PageLayout {
    let screen = TextContainer {
        id: SCREEN_ID,
        name: "screen",
        content: grid,
        x: 0,
        y: 0,
        width: DISPLAY_WIDTH,
        height: DISPLAY_HEIGHT,
        is_event_capture: false,
        padding_length: 0,
    };
    PageLayout::new(vec![event_capture(), screen], vec![])
}

pub fn info_update(text: String) -> TextUpdate {
    TextUpdate {
        id: INFO_ID,
        name: "info",
        content_offset: 0,
        content_length: CONTENT_LENGTH,
        content: text,
    }
}

pub fn screen_update(grid: String) -> TextUpdate {
    TextUpdate {
        id: SCREEN_ID,
        name: "screen",
        content_offset: 0,
        content_length: CONTENT_LENGTH,
        content: grid,
    }
}

pub fn image_update(bytes: &[u8]) -> ImageUpdate {
    ImageUpdate {
        id: IMG_ID,
        name: "img",
        data: bytes.to_vec(),
    }
}

/// `Best: N · Tap to start · Swipe to move`, best omitted while 0
pub fn splash_text(state: &GameState) -> String {
    let mut parts = Vec::with_capacity(3);
    if state.high_score > 0 {
        parts.push(format!("Best: {}", state.high_score));
    }
    parts.push("Tap to start".to_string());
    parts.push("Swipe to move".to_string());
    parts.join(SEPARATOR)
}

/// `You win!` or `Score: N`, then the best, then the prompt
pub fn game_over_text(state: &GameState) -> String {
    let mut parts = Vec::with_capacity(3);
    parts.push(if state.won() {
        "You win!".to_string()
    } else {
        format!("Score: {}", state.score)
    });
    if state.high_score > 0 {
        parts.push(format!("Best: {}", state.high_score));
    }
    parts.push("Tap to play again".to_string());
    parts.join(SEPARATOR)
}
