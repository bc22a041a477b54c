//! Platform abstraction layer
//!
//! The game talks to its display through [`Display`] and gets one from a
//! [`Connector`]. Page layouts are plain data in display pixel coordinates.
//!
//! Hosts:
//! - `terminal`: crossterm host used by the binary
//! - `memory`: records every call, for tests

pub mod memory;
pub mod terminal;

pub use memory::{DisplayCall, MemoryConnector, MemoryDisplay};
pub use terminal::{TerminalConnector, TerminalDisplay};

use serde::Serialize;

use crate::error::Result;

/// A text container on a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContainer {
    #[serde(rename = "containerID")]
    pub id: u32,
    #[serde(rename = "containerName")]
    pub name: &'static str,
    pub content: String,
    #[serde(rename = "xPosition")]
    pub x: u32,
    #[serde(rename = "yPosition")]
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Receives taps and swipes for the whole page
    #[serde(serialize_with = "as_flag")]
    pub is_event_capture: bool,
    pub padding_length: u32,
}

/// An image container on a page; its bytes arrive separately
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageContainer {
    #[serde(rename = "containerID")]
    pub id: u32,
    #[serde(rename = "containerName")]
    pub name: &'static str,
    #[serde(rename = "xPosition")]
    pub x: u32,
    #[serde(rename = "yPosition")]
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Full page description passed to `create_page` / `rebuild_page`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    pub container_total_num: u32,
    pub text_object: Vec<TextContainer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub image_object: Vec<ImageContainer>,
}

impl PageLayout {
    pub fn new(text_object: Vec<TextContainer>, image_object: Vec<ImageContainer>) -> Self {
        Self {
            container_total_num: (text_object.len() + image_object.len()) as u32,
            text_object,
            image_object,
        }
    }

    pub fn text(&self, id: u32) -> Option<&TextContainer> {
        self.text_object.iter().find(|c| c.id == id)
    }

    pub fn image(&self, id: u32) -> Option<&ImageContainer> {
        self.image_object.iter().find(|c| c.id == id)
    }
}

/// Replace the content of an existing text container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextUpdate {
    #[serde(rename = "containerID")]
    pub id: u32,
    #[serde(rename = "containerName")]
    pub name: &'static str,
    pub content_offset: u32,
    pub content_length: u32,
    pub content: String,
}

/// Raw image bytes for an image container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpdate {
    pub id: u32,
    pub name: &'static str,
    pub data: Vec<u8>,
}

fn as_flag<S: serde::Serializer>(flag: &bool, s: S) -> std::result::Result<S::Ok, S::Error> {
    s.serialize_u8(u8::from(*flag))
}

/// Output surface of the glasses (or a stand-in)
#[allow(async_fn_in_trait)]
pub trait Display {
    /// First page of a session
    async fn create_page(&self, layout: &PageLayout) -> Result<()>;
    /// Every later page
    async fn rebuild_page(&self, layout: &PageLayout) -> Result<()>;
    async fn update_text(&self, update: &TextUpdate) -> Result<()>;
    async fn update_image(&self, update: &ImageUpdate) -> Result<()>;
}

/// Produces a connected display. `Session` bounds the wait.
#[allow(async_fn_in_trait)]
pub trait Connector {
    type Display: Display;

    async fn connect(&self) -> Result<Self::Display>;
}

/// Input coming from the host, already mapped to game intent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    MoveLeft,
    MoveRight,
    /// Launch while attached, otherwise start / dismiss
    Tap,
    /// The host's explicit "new game" action
    Start,
}
