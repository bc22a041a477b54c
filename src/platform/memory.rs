//! In-memory display that records calls
//!
//! Clones share the same call log, so a test can keep a handle while the game
//! owns another.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::{Connector, Display, ImageUpdate, PageLayout, TextUpdate};
use crate::error::{ArkanoidError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayCall {
    Create(PageLayout),
    Rebuild(PageLayout),
    Text(TextUpdate),
    Image(ImageUpdate),
}

#[derive(Debug, Default)]
struct Inner {
    calls: RefCell<Vec<DisplayCall>>,
    failing: Cell<bool>,
    latency: Cell<Duration>,
}

#[derive(Debug, Clone, Default)]
pub struct MemoryDisplay {
    inner: Rc<Inner>,
}

impl MemoryDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<DisplayCall> {
        self.inner.calls.borrow().clone()
    }

    /// Every call fails while set
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.set(failing);
    }

    /// Each call sleeps this long before recording
    pub fn set_latency(&self, latency: Duration) {
        self.inner.latency.set(latency);
    }

    /// Most recent page passed to create or rebuild
    pub fn last_page(&self) -> Option<PageLayout> {
        self.inner.calls.borrow().iter().rev().find_map(|c| match c {
            DisplayCall::Create(p) | DisplayCall::Rebuild(p) => Some(p.clone()),
            _ => None,
        })
    }

    /// Most recent content written to text container `id`
    pub fn last_text(&self, id: u32) -> Option<String> {
        self.inner.calls.borrow().iter().rev().find_map(|c| match c {
            DisplayCall::Text(u) if u.id == id => Some(u.content.clone()),
            _ => None,
        })
    }

    async fn record(&self, op: &'static str, call: DisplayCall) -> Result<()> {
        let latency = self.inner.latency.get();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        if self.inner.failing.get() {
            return Err(ArkanoidError::display(op, "display offline"));
        }
        self.inner.calls.borrow_mut().push(call);
        Ok(())
    }
}

impl Display for MemoryDisplay {
    async fn create_page(&self, layout: &PageLayout) -> Result<()> {
        self.record("create_page", DisplayCall::Create(layout.clone()))
            .await
    }

    async fn rebuild_page(&self, layout: &PageLayout) -> Result<()> {
        self.record("rebuild_page", DisplayCall::Rebuild(layout.clone()))
            .await
    }

    async fn update_text(&self, update: &TextUpdate) -> Result<()> {
        self.record("update_text", DisplayCall::Text(update.clone()))
            .await
    }

    async fn update_image(&self, update: &ImageUpdate) -> Result<()> {
        self.record("update_image", DisplayCall::Image(update.clone()))
            .await
    }
}

/// Hands out a shared [`MemoryDisplay`], or never answers
#[derive(Debug, Clone, Default)]
pub struct MemoryConnector {
    display: MemoryDisplay,
    unreachable: Rc<Cell<bool>>,
}

impl MemoryConnector {
    pub fn new(display: MemoryDisplay) -> Self {
        Self {
            display,
            unreachable: Rc::default(),
        }
    }

    /// While set, `connect` never resolves
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.set(unreachable);
    }
}

impl Connector for MemoryConnector {
    type Display = MemoryDisplay;

    async fn connect(&self) -> Result<MemoryDisplay> {
        if self.unreachable.get() {
            std::future::pending::<()>().await;
        }
        Ok(self.display.clone())
    }
}
