use ratatui::Frame;
use ratatui::layout::Rect;

use crate::core::state::Theme;

/// A reusable UI component.
///
/// Components receive data via props (struct fields), may hold internal
/// state through `&mut` fields, and render to a `Frame` within a given `Rect`.
///
/// `render` takes `&mut self` so components can update caches or scroll
/// state during the render pass, like ratatui's `StatefulWidget`.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that handles terminal events.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}

/// Colors shared by every section, picked by the active [`Theme`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub text: ratatui::style::Color,
    pub muted: ratatui::style::Color,
    pub accent: ratatui::style::Color,
    pub highlight: ratatui::style::Color,
    pub user: ratatui::style::Color,
    pub assistant: ratatui::style::Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        use ratatui::style::Color;
        match theme {
            Theme::Dark => Self {
                text: Color::White,
                muted: Color::DarkGray,
                accent: Color::Indexed(105), // indigo
                highlight: Color::Cyan,
                user: Color::Green,
                assistant: Color::Blue,
            },
            Theme::Light => Self {
                text: Color::Black,
                muted: Color::Gray,
                accent: Color::Indexed(172), // amber
                highlight: Color::Indexed(166),
                user: Color::Indexed(28),
                assistant: Color::Indexed(25),
            },
        }
    }
}
