//! # InputBox Component
//!
//! The chat panel's text field: buffer editing, bracketed paste, Enter to
//! submit, internal scrolling once the text outgrows `MAX_VISIBLE_LINES`.
//!
//! The buffer and cursor are internal state. `locked` is a prop mirroring
//! `ChatWidget::is_busy`: while set, Enter keeps the buffer instead of
//! emitting a submit that the widget would drop anyway.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler, Palette};
use crate::tui::event::TuiEvent;

/// Border (2) + padding (2) consumed horizontally
const HORIZONTAL_OVERHEAD: u16 = 4;
/// Top + bottom borders
const VERTICAL_OVERHEAD: u16 = 2;
/// Offset from the area's left edge to the first text column
const CONTENT_OFFSET_X: u16 = 2;
const MAX_VISIBLE_LINES: u16 = 4;

const PLACEHOLDER: &str = "Ask about my experience...";

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Enter pressed on a non-blank buffer
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    pub buffer: String,
    /// Prop: a send is in flight
    pub locked: bool,
    pub palette: Palette,
    /// Cursor as a byte offset into `buffer`
    cursor: usize,
    scroll_offset: u16,
}

impl InputBox {
    pub fn new(palette: Palette) -> Self {
        Self {
            buffer: String::new(),
            locked: false,
            palette,
            cursor: 0,
            scroll_offset: 0,
        }
    }

    /// Height for the current buffer, clamped to the visible line limit.
    pub fn calculate_height(&self, area_width: u16) -> u16 {
        let lines = wrapped_lines(&self.buffer, inner_width(area_width)).len() as u16;
        lines.clamp(1, MAX_VISIBLE_LINES) + VERTICAL_OVERHEAD
    }

    /// (row, column) of the cursor within the wrapped text.
    fn cursor_cell(&self, width: u16) -> (u16, u16) {
        let before = &self.buffer[..self.cursor];
        let (head, current) = match before.rfind('\n') {
            Some(i) => (&before[..i], &before[i + 1..]),
            None => ("", before),
        };
        let rows_above = if before.contains('\n') {
            wrapped_lines(head, width).len() as u16
        } else {
            0
        };

        let segments = wrapped_lines(current, width);
        let last = segments.last().map(String::as_str).unwrap_or("");
        // textwrap drops trailing spaces, the cursor still sits after them
        let trailing = current.len() - current.trim_end_matches(' ').len();
        let col = (last.width() + trailing).min(width.saturating_sub(1) as usize) as u16;

        (rows_above + segments.len().saturating_sub(1) as u16, col)
    }

    fn keep_cursor_visible(&mut self, width: u16) {
        let total = wrapped_lines(&self.buffer, width).len() as u16;
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }
        let (row, _) = self.cursor_cell(width);
        if row < self.scroll_offset {
            self.scroll_offset = row;
        } else if row >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = row + 1 - MAX_VISIBLE_LINES;
        }
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
        Some(InputEvent::ContentChanged)
    }

    fn move_to(&mut self, pos: usize) -> Option<InputEvent> {
        (pos != self.cursor).then(|| {
            self.cursor = pos;
            InputEvent::ContentChanged
        })
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = inner_width(area.width);
        self.keep_cursor_visible(width);

        let title = if self.locked { "Thinking..." } else { "Message" };
        let border_style = if self.locked {
            Style::default().fg(self.palette.muted)
        } else {
            Style::default().fg(self.palette.accent)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .padding(Padding::horizontal(1))
            .title(title);

        let lines: Vec<Line> = if self.buffer.is_empty() {
            vec![Line::from(Span::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(self.palette.muted)
                    .add_modifier(Modifier::ITALIC),
            ))]
        } else {
            wrapped_lines(&self.buffer, width)
                .into_iter()
                .skip(self.scroll_offset as usize)
                .take(MAX_VISIBLE_LINES as usize)
                .map(Line::from)
                .collect()
        };
        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().fg(self.palette.text))
                .block(block),
            area,
        );

        let total = wrapped_lines(&self.buffer, width).len() as u16;
        if total > MAX_VISIBLE_LINES {
            let mut state = ScrollbarState::default()
                .content_length(total.saturating_sub(MAX_VISIBLE_LINES) as usize)
                .position(self.scroll_offset as usize);
            let track = Rect {
                x: area.x + area.width.saturating_sub(1),
                y: area.y + 1,
                width: 1,
                height: area.height.saturating_sub(2),
            };
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                track,
                &mut state,
            );
        }

        if width > 0 {
            let (row, col) = self.cursor_cell(width);
            frame.set_cursor_position((
                area.x + CONTENT_OFFSET_X + col,
                area.y + 1 + row.saturating_sub(self.scroll_offset),
            ));
        }
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => self.insert(c.encode_utf8(&mut [0; 4])),
            TuiEvent::Paste(text) => self.insert(text),
            TuiEvent::Backspace => {
                let prev = prev_char_boundary(&self.buffer, self.cursor);
                (prev < self.cursor).then(|| {
                    self.buffer.drain(prev..self.cursor);
                    self.cursor = prev;
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::Delete => {
                let next = next_char_boundary(&self.buffer, self.cursor);
                (next > self.cursor).then(|| {
                    self.buffer.drain(self.cursor..next);
                    InputEvent::ContentChanged
                })
            }
            TuiEvent::CursorLeft => self.move_to(prev_char_boundary(&self.buffer, self.cursor)),
            TuiEvent::CursorRight => self.move_to(next_char_boundary(&self.buffer, self.cursor)),
            TuiEvent::CursorHome => {
                let start = self.buffer[..self.cursor]
                    .rfind('\n')
                    .map_or(0, |i| i + 1);
                self.move_to(start)
            }
            TuiEvent::CursorEnd => {
                let end = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                self.move_to(end)
            }
            TuiEvent::Submit => {
                if self.locked || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll_offset = 0;
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}

fn inner_width(area_width: u16) -> u16 {
    area_width.saturating_sub(HORIZONTAL_OVERHEAD)
}

/// Wraps each logical line separately so blank lines survive.
fn wrapped_lines(text: &str, width: u16) -> Vec<String> {
    if width == 0 {
        return vec![String::new()];
    }
    let options = textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);

    let mut out = Vec::new();
    for line in text.split('\n') {
        let wrapped = textwrap::wrap(line, &options);
        if wrapped.is_empty() {
            out.push(String::new());
        } else {
            out.extend(wrapped.into_iter().map(|l| l.into_owned()));
        }
    }
    out
}

fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map_or(0, |(i, _)| i)
}

fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .chars()
        .next()
        .map_or(pos, |c| pos + c.len_utf8())
}
