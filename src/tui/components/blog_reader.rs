//! # BlogReader Component
//!
//! The Insights section: post list on the left, the selected post on the
//! right (header, AI TL;DR box, markdown body) inside a scroll view.
//!
//! Scroll position lives in `BlogReaderState`, which resets to the top
//! whenever a different post is drawn.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect, Size};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Padding, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::content::BlogPost;
use crate::core::state::{SummaryState, Theme};
use crate::tui::component::{Component, EventHandler, Palette};
use crate::tui::event::TuiEvent;
use crate::tui::markdown::{self, MarkdownStyle};

#[derive(Default)]
pub struct BlogReaderState {
    pub scroll_state: ScrollViewState,
    shown_post: Option<usize>,
}

impl EventHandler for BlogReaderState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => {}
        }
        None
    }
}

pub struct BlogReader<'a> {
    pub state: &'a mut BlogReaderState,
    pub posts: &'static [BlogPost],
    pub selected: usize,
    pub summary: &'a SummaryState,
    pub palette: Palette,
    pub theme: Theme,
}

impl BlogReader<'_> {
    fn post(&self) -> &'static BlogPost {
        &self.posts[self.selected.min(self.posts.len().saturating_sub(1))]
    }

    fn header(&self) -> Text<'static> {
        let post = self.post();
        let muted = Style::default().fg(self.palette.muted);
        let published = post
            .published()
            .map(|d| d.format("%B %-d, %Y").to_string())
            .unwrap_or_else(|| post.date.to_string());

        Text::from(vec![
            Line::from(Span::styled(
                post.title,
                Style::default()
                    .fg(self.palette.text)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format!("{published} · {}", post.read_time), muted)),
            Line::from(Span::styled(
                post.tags
                    .iter()
                    .map(|t| format!("#{t}"))
                    .collect::<Vec<_>>()
                    .join(" "),
                Style::default().fg(self.palette.accent),
            )),
            Line::default(),
        ])
    }

    fn summary_box(&self, style: MarkdownStyle) -> Text<'static> {
        let key = Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(self.palette.muted);
        let mut text = match self.summary {
            SummaryState::None => Text::from(Line::from(vec![
                Span::styled("[s] ", key),
                Span::styled("Generate AI TL;DR", muted),
            ])),
            SummaryState::Generating => Text::from(Line::from(Span::styled(
                "Generating TL;DR...",
                muted.add_modifier(Modifier::ITALIC),
            ))),
            SummaryState::Ready(summary) => {
                let mut text = Text::from(Line::from(Span::styled("AI TL;DR", key)));
                text.extend(markdown::render(summary, style));
                text
            }
        };
        text.push_line(Line::default());
        text
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .posts
            .iter()
            .map(|post| {
                ListItem::new(vec![
                    Line::from(post.title),
                    Line::from(Span::styled(
                        post.date,
                        Style::default().fg(self.palette.muted),
                    )),
                ])
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title(" Posts ")
                    .title_bottom(" ↑/↓ select · s TL;DR "),
            )
            .style(Style::default().fg(self.palette.text))
            .highlight_style(
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");
        let mut list_state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut list_state);
    }
}

impl Component for BlogReader<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [list_area, body_area] =
            Layout::horizontal([Constraint::Percentage(32), Constraint::Fill(1)]).areas(area);
        self.render_list(frame, list_area);

        if self.state.shown_post != Some(self.selected) {
            self.state.shown_post = Some(self.selected);
            self.state.scroll_state.scroll_to_top();
        }

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .padding(Padding::horizontal(1));
        let inner = block.inner(body_area);
        frame.render_widget(block, body_area);

        let style = MarkdownStyle::new(self.palette, self.palette.text, self.theme);
        let mut text = self.header();
        text.extend(self.summary_box(style));
        text.extend(markdown::render(self.post().content, style));

        let width = inner.width.saturating_sub(1); // scrollbar column
        let height = markdown::wrapped_height(&text, width);
        let mut scroll_view = ScrollView::new(Size::new(width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(
            Paragraph::new(text).wrap(Wrap { trim: true }),
            Rect::new(0, 0, width, height),
        );
        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}
