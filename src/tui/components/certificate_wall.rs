use ratatui::Frame;
use ratatui::layout::{Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Clear, List, ListItem, ListState, Padding, Paragraph, Wrap};

use crate::core::content::Certificate;
use crate::tui::component::{Component, Palette};

/// Certificate list with an optional detail popup for the selection.
pub struct CertificateWall {
    pub certificates: &'static [Certificate],
    pub selected: usize,
    pub detail_open: bool,
    pub palette: Palette,
}

impl CertificateWall {
    fn render_detail(&self, frame: &mut Frame, area: Rect) {
        let Some(cert) = self.certificates.get(self.selected) else {
            return;
        };
        let [popup] = Layout::horizontal([Constraint::Percentage(70)])
            .flex(Flex::Center)
            .areas(area);
        let [popup] = Layout::vertical([Constraint::Length(9)])
            .flex(Flex::Center)
            .areas(popup);

        let muted = Style::default().fg(self.palette.muted);
        let link = match cert.credential_url {
            Some(url) => Span::styled(url, Style::default().add_modifier(Modifier::UNDERLINED)),
            None => Span::styled("No public credential link", muted),
        };
        let lines = vec![
            Line::from(Span::styled(
                cert.name,
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
            Line::from(vec![Span::styled("Issuer   ", muted), Span::raw(cert.issuer)]),
            Line::from(vec![Span::styled("Year     ", muted), Span::raw(cert.year)]),
            Line::from(vec![Span::styled("Verify   ", muted), link]),
        ];

        frame.render_widget(Clear, popup);
        frame.render_widget(
            Paragraph::new(lines)
                .style(Style::default().fg(self.palette.text))
                .wrap(Wrap { trim: true })
                .block(
                    Block::bordered()
                        .border_type(BorderType::Double)
                        .border_style(Style::default().fg(self.palette.accent))
                        .title(" Credential ")
                        .title_bottom(" Esc close ")
                        .padding(Padding::uniform(1)),
                ),
            popup,
        );
    }
}

impl Component for CertificateWall {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .certificates
            .iter()
            .map(|cert| {
                ListItem::new(vec![
                    Line::from(Span::styled(cert.name, Style::default().add_modifier(Modifier::BOLD))),
                    Line::from(Span::styled(
                        format!("{} · {}", cert.issuer, cert.year),
                        Style::default().fg(self.palette.muted),
                    )),
                    Line::default(),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::bordered()
                    .border_type(BorderType::Rounded)
                    .title_bottom(" ↑/↓ select · Enter details ")
                    .padding(Padding::horizontal(1)),
            )
            .style(Style::default().fg(self.palette.text))
            .highlight_style(Style::default().fg(self.palette.accent))
            .highlight_symbol("▸ ");
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, area, &mut state);

        if self.detail_open {
            self.render_detail(frame, area);
        }
    }
}
