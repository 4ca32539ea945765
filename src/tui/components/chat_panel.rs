//! # ChatPanel Component
//!
//! The toggleable assistant panel: scrolling transcript, suggestion chips
//! and the input box.
//!
//! `ChatPanel` is transient (built each frame) around `&mut ChatPanelState`,
//! which persists in the TUI loop. The transcript itself lives in
//! `App::chat`; this module only decides how it is scrolled and drawn.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Position, Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::chat::ChatWidget;
use crate::core::state::Theme;
use crate::tui::component::{Component, EventHandler, Palette};
use crate::tui::components::input_box::{InputBox, InputEvent};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum ChatPanelEvent {
    Submit(String),
    PickSuggestion(usize),
    Close,
}

pub struct ChatPanelState {
    pub scroll_state: ScrollViewState,
    /// Auto-scroll to the newest message on every draw
    pub stick_to_bottom: bool,
    pub input: InputBox,
    content_height: u16,
    viewport_height: u16,
}

impl ChatPanelState {
    pub fn new(palette: Palette) -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            input: InputBox::new(palette),
            content_height: 0,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// True when the visitor scrolled up and newer lines sit below the view.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }

    fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position { x: current.x, y: max_y });
        }
    }

    /// Re-engage auto-scroll once a downward scroll reaches the end.
    fn repin_if_at_bottom(&mut self) {
        if self.scroll_state.offset().y >= self.max_offset() {
            self.stick_to_bottom = true;
            self.clamp_scroll();
        }
    }
}

impl EventHandler for ChatPanelState {
    type Event = ChatPanelEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => Some(ChatPanelEvent::Close),
            TuiEvent::Suggestion(index) => Some(ChatPanelEvent::PickSuggestion(*index)),
            TuiEvent::ScrollUp | TuiEvent::CursorUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown | TuiEvent::CursorDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            other => match self.input.handle_event(other)? {
                InputEvent::Submit(text) => Some(ChatPanelEvent::Submit(text)),
                InputEvent::ContentChanged => None,
            },
        }
    }
}

pub struct ChatPanel<'a> {
    pub state: &'a mut ChatPanelState,
    pub chat: &'a ChatWidget,
    pub palette: Palette,
    pub theme: Theme,
}

impl ChatPanel<'_> {
    fn render_transcript(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(1); // scrollbar column
        let chat = self.chat;
        let bubbles: Vec<Message> = chat
            .messages()
            .iter()
            .map(|m| Message::new(m, self.palette, self.theme))
            .collect();
        let heights: Vec<u16> = bubbles.iter().map(|b| b.height(width)).collect();

        self.state.content_height = heights.iter().sum();
        self.state.viewport_height = area.height;

        let mut scroll_view = ScrollView::new(Size::new(width, self.state.content_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y = 0;
        for (bubble, height) in bubbles.into_iter().zip(heights) {
            scroll_view.render_widget(bubble, Rect::new(0, y, width, height));
            y += height;
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        } else {
            self.state.clamp_scroll();
        }
        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }

    fn suggestion_lines(&self) -> Vec<Line<'static>> {
        self.chat
            .suggestions()
            .iter()
            .enumerate()
            .map(|(i, chip)| {
                Line::from(vec![
                    Span::styled(
                        format!("[F{}] ", i + 1),
                        Style::default()
                            .fg(self.palette.accent)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(*chip, Style::default().fg(self.palette.muted)),
                ])
            })
            .collect()
    }
}

impl Component for ChatPanel<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.palette.accent))
            .title(" AI Assistant ")
            .title_bottom(Line::from(" Esc close · F1-F4 suggestions ").right_aligned());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let suggestions = self.suggestion_lines();
        self.state.input.locked = self.chat.is_busy();
        self.state.input.palette = self.palette;
        let input_height = self.state.input.calculate_height(inner.width);

        let [transcript_area, chips_area, input_area] = Layout::vertical([
            Constraint::Min(3),
            Constraint::Length(suggestions.len() as u16),
            Constraint::Length(input_height),
        ])
        .areas(inner);

        self.render_transcript(frame, transcript_area);
        if !suggestions.is_empty() {
            frame.render_widget(Paragraph::new(suggestions), chips_area);
        }
        self.state.input.render(frame, input_area);
    }
}
