//! Terminal host
//!
//! Stands in for the glasses: text containers are drawn at their pixel
//! position scaled down to terminal cells, image containers as a labelled
//! placeholder. Input comes from a blocking crossterm reader thread.

use std::cell::RefCell;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    QueueableCommand, cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Attribute, Print, ResetColor, SetAttribute},
    terminal,
};
use tokio::sync::mpsc;

use super::{Connector, Display, HostEvent, ImageUpdate, PageLayout, TextContainer, TextUpdate};
use crate::consts::DISPLAY_HEIGHT;
use crate::error::{ArkanoidError, Result};

/// Display pixels per terminal column / row
const PX_PER_COL: u32 = 8;
const PX_PER_ROW: u32 = 16;

/// Row below the display area used for the session status
pub const STATUS_ROW: u16 = (DISPLAY_HEIGHT / PX_PER_ROW) as u16 + 1;

/// Switch the terminal into raw mode on the alternate screen
pub fn enter() -> io::Result<()> {
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.queue(terminal::EnterAlternateScreen)?;
    stdout.queue(cursor::Hide)?;
    stdout.queue(terminal::DisableLineWrap)?;
    stdout.flush()
}

/// Undo [`enter`]
pub fn exit() -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.queue(ResetColor)?;
    stdout.queue(SetAttribute(Attribute::Reset))?;
    stdout.queue(terminal::EnableLineWrap)?;
    stdout.queue(cursor::Show)?;
    stdout.queue(terminal::LeaveAlternateScreen)?;
    stdout.flush()?;
    terminal::disable_raw_mode()
}

/// Write the session status line under the display area
pub fn draw_status(status: &str) -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.queue(cursor::MoveTo(0, STATUS_ROW))?;
    stdout.queue(terminal::Clear(terminal::ClearType::CurrentLine))?;
    stdout.queue(SetAttribute(Attribute::Dim))?;
    stdout.queue(Print(status))?;
    stdout.queue(SetAttribute(Attribute::Reset))?;
    stdout.flush()
}

/// Cell rectangle of a container: (col, row, cols, rows)
fn cells(x: u32, y: u32, width: u32, height: u32) -> (u16, u16, usize, usize) {
    (
        (x / PX_PER_COL) as u16,
        (y / PX_PER_ROW) as u16,
        (width / PX_PER_COL).max(1) as usize,
        (height / PX_PER_ROW).max(1) as usize,
    )
}

#[derive(Debug, Default)]
pub struct TerminalDisplay {
    page: RefCell<Option<PageLayout>>,
}

impl TerminalDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    fn draw_page(&self, layout: &PageLayout) -> io::Result<()> {
        let mut stdout = io::stdout();
        stdout.queue(terminal::Clear(terminal::ClearType::All))?;
        for text in layout.text_object.iter().filter(|t| !t.is_event_capture) {
            queue_text(&mut stdout, text, &text.content)?;
        }
        for image in &layout.image_object {
            let (col, row, cols, rows) = cells(image.x, image.y, image.width, image.height);
            queue_label(&mut stdout, col, row, cols, rows, &format!("[{}]", image.name))?;
        }
        stdout.flush()?;
        *self.page.borrow_mut() = Some(layout.clone());
        Ok(())
    }
}

fn queue_text(out: &mut impl Write, container: &TextContainer, content: &str) -> io::Result<()> {
    let (col, row, cols, rows) = cells(container.x, container.y, container.width, container.height);
    let blank = " ".repeat(cols);
    let mut lines = content.lines();
    for r in 0..rows {
        out.queue(cursor::MoveTo(col, row + r as u16))?;
        out.queue(Print(&blank))?;
        out.queue(cursor::MoveTo(col, row + r as u16))?;
        if let Some(line) = lines.next() {
            let clipped: String = line.chars().take(cols).collect();
            out.queue(Print(clipped))?;
        }
    }
    Ok(())
}

fn queue_label(
    out: &mut impl Write,
    col: u16,
    row: u16,
    cols: usize,
    rows: usize,
    label: &str,
) -> io::Result<()> {
    let label: String = label.chars().take(cols).collect();
    let pad = (cols - label.chars().count()) / 2;
    out.queue(cursor::MoveTo(col + pad as u16, row + (rows / 2) as u16))?;
    out.queue(Print(label))?;
    Ok(())
}

impl Display for TerminalDisplay {
    async fn create_page(&self, layout: &PageLayout) -> Result<()> {
        self.draw_page(layout)
            .map_err(|e| ArkanoidError::display("create_page", e))
    }

    async fn rebuild_page(&self, layout: &PageLayout) -> Result<()> {
        self.draw_page(layout)
            .map_err(|e| ArkanoidError::display("rebuild_page", e))
    }

    async fn update_text(&self, update: &TextUpdate) -> Result<()> {
        let page = self.page.borrow();
        let container = page
            .as_ref()
            .and_then(|p| p.text(update.id))
            .ok_or_else(|| ArkanoidError::display("update_text", "no such container"))?;

        let mut stdout = io::stdout();
        queue_text(&mut stdout, container, &update.content)
            .and_then(|_| stdout.flush())
            .map_err(|e| ArkanoidError::display("update_text", e))
    }

    async fn update_image(&self, update: &ImageUpdate) -> Result<()> {
        let page = self.page.borrow();
        let image = page
            .as_ref()
            .and_then(|p| p.image(update.id))
            .ok_or_else(|| ArkanoidError::display("update_image", "no such container"))?;

        let (col, row, cols, rows) = cells(image.x, image.y, image.width, image.height);
        let label = format!("[{}: {} bytes]", update.name, update.data.len());
        let mut stdout = io::stdout();
        queue_label(&mut stdout, col, row, cols, rows, &label)
            .and_then(|_| stdout.flush())
            .map_err(|e| ArkanoidError::display("update_image", e))
    }
}

/// The terminal is always there
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConnector;

impl Connector for TerminalConnector {
    type Display = TerminalDisplay;

    async fn connect(&self) -> Result<TerminalDisplay> {
        Ok(TerminalDisplay::new())
    }
}

/// What the input thread reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostInput {
    Event(HostEvent),
    Quit,
}

/// Map a key press to a game event
pub fn map_key(key: KeyEvent) -> Option<HostEvent> {
    match key.code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Char('h')
        | KeyCode::Char('H') => Some(HostEvent::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Char('l')
        | KeyCode::Char('L') => Some(HostEvent::MoveRight),
        KeyCode::Char(' ') | KeyCode::Enter => Some(HostEvent::Tap),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(HostEvent::Start),
        _ => None,
    }
}

pub fn should_quit(key: KeyEvent) -> bool {
    matches!(
        key.code,
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc
    ) || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Read keys on a dedicated thread until quit or the receiver goes away
pub fn spawn_input_thread(tx: mpsc::UnboundedSender<HostInput>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        loop {
            match event::poll(Duration::from_millis(100)) {
                Ok(false) => {
                    if tx.is_closed() {
                        return;
                    }
                    continue;
                }
                Ok(true) => {}
                Err(e) => {
                    log::warn!("input poll failed: {}", e);
                    let _ = tx.send(HostInput::Quit);
                    return;
                }
            }

            let key = match event::read() {
                Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => key,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("input read failed: {}", e);
                    let _ = tx.send(HostInput::Quit);
                    return;
                }
            };

            let input = if should_quit(key) {
                HostInput::Quit
            } else if let Some(event) = map_key(key) {
                HostInput::Event(event)
            } else {
                continue;
            };

            if tx.send(input).is_err() || input == HostInput::Quit {
                return;
            }
        }
    })
}
