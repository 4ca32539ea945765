use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::chat::{ChatMessage, Role};
use crate::core::content::OWNER_FIRST_NAME;
use crate::core::state::Theme;
use crate::tui::component::{Component, Palette};
use crate::tui::markdown::{self, MarkdownStyle};

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Shown in an assistant bubble that is still waiting for its first fragment.
const TYPING_INDICATOR: &str = "● ● ●";

/// One chat bubble.
///
/// Built fresh each frame. Assistant text is rendered as markdown once in
/// [`Message::new`], so [`height`](Self::height) and the widget render agree
/// on the same `Text`.
#[derive(Clone)]
pub struct Message<'a> {
    pub message: &'a ChatMessage,
    pub palette: Palette,
    body: Text<'static>,
}

impl<'a> Message<'a> {
    pub fn new(message: &'a ChatMessage, palette: Palette, theme: Theme) -> Self {
        let body = Self::body(message, palette, theme);
        Self {
            message,
            palette,
            body,
        }
    }

    fn body(message: &ChatMessage, palette: Palette, theme: Theme) -> Text<'static> {
        let text = message.text.trim();
        match message.role {
            Role::Assistant if text.is_empty() && message.streaming => Text::from(Line::from(
                Span::styled(
                    TYPING_INDICATOR,
                    Style::default()
                        .fg(palette.muted)
                        .add_modifier(Modifier::SLOW_BLINK),
                ),
            )),
            Role::Assistant => {
                markdown::render(text, MarkdownStyle::new(palette, palette.text, theme))
            }
            Role::User => Text::styled(text.to_owned(), Style::default().fg(palette.text)),
        }
    }

    /// Rows this bubble needs at `width`, borders included.
    ///
    /// Predicted with `textwrap` instead of rendering, since the scroll view
    /// needs every height before anything is drawn.
    pub fn height(&self, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }
        if self.body.lines.is_empty() {
            return VERTICAL_OVERHEAD;
        }
        markdown::wrapped_height(&self.body, content_width).max(1) + VERTICAL_OVERHEAD
    }

    fn border_style(&self) -> Style {
        let color = match self.message.role {
            Role::User => self.palette.user,
            Role::Assistant => self.palette.assistant,
        };
        let style = Style::default().fg(color);
        if self.message.streaming {
            style.add_modifier(Modifier::BOLD)
        } else {
            style.add_modifier(Modifier::DIM)
        }
    }
}

impl Widget for Message<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let title = match self.message.role {
            Role::User => "you".to_string(),
            Role::Assistant => format!("{}'s assistant", OWNER_FIRST_NAME.to_lowercase()),
        };
        let border_style = self.border_style();

        let block = Block::bordered()
            .title(title)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.body)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

impl Component for Message<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(self.clone(), area);
    }
}
