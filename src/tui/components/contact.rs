use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use crate::core::content::{self, PROFILE};
use crate::tui::component::{Component, Palette};

pub struct Contact {
    pub palette: Palette,
}

impl Component for Contact {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .padding(Padding::new(2, 2, 1, 0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let text = Style::default().fg(self.palette.text);
        let muted = Style::default().fg(self.palette.muted);
        let accent = Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(PROFILE.availability, text)),
            Line::default(),
            Line::from(vec![
                Span::styled(format!("{:<10}", "Email"), muted),
                Span::styled(PROFILE.email, accent),
            ]),
        ];
        lines.extend(PROFILE.links.iter().map(|(label, url)| {
            Line::from(vec![
                Span::styled(format!("{label:<10}"), muted),
                Span::styled(*url, text.add_modifier(Modifier::UNDERLINED)),
            ])
        }));

        let [body, footer] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(inner);
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), body);
        frame.render_widget(
            Line::from(Span::styled(content::footer(), muted)).centered(),
            footer,
        );
    }
}
