//! # TitleBar Component
//!
//! Top status bar: portfolio owner, model, status text and a "↓ New"
//! marker when the chat panel has unseen content below its viewport.
//!
//! Purely presentational. Every field is a prop copied from `App` or the
//! chat panel state before each draw.
//!
//! Shapes:
//!
//! - `"Minh Vu · Portfolio (model: m) | Thinking... | ↓ New"`
//! - `"Minh Vu · Portfolio (model: m) | Thinking..."`
//! - `"Minh Vu · Portfolio (model: m)"` (empty status)

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::content::PORTFOLIO_OWNER;
use crate::tui::component::{Component, Palette};

pub struct TitleBar {
    pub model_name: String,
    pub status_message: String,
    pub has_unseen_content: bool,
    pub palette: Palette,
}

impl TitleBar {
    pub fn new(
        model_name: String,
        status_message: String,
        has_unseen_content: bool,
        palette: Palette,
    ) -> Self {
        Self {
            model_name,
            status_message,
            has_unseen_content,
            palette,
        }
    }

    fn text(&self) -> String {
        let base = format!("{PORTFOLIO_OWNER} · Portfolio (model: {})", self.model_name);
        if self.has_unseen_content {
            format!("{} | {} | ↓ New", base, self.status_message)
        } else if self.status_message.is_empty() {
            base
        } else {
            format!("{} | {}", base, self.status_message)
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let style = Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD);
        frame.render_widget(Line::from(Span::styled(self.text(), style)), area);
    }
}
