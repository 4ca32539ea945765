//! # Showcase Component
//!
//! The Projects section: one project card at a time, driven by the
//! `Carousel`. Below the card sit the auto-advance gauge, position dots and
//! the key hints.
//!
//! Stateless. The TUI loop remembers the rect this was drawn into so mouse
//! hover can pause the carousel.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Gauge, Padding, Paragraph, Wrap};

use crate::core::carousel::CarouselPhase;
use crate::core::content::Project;
use crate::tui::component::{Component, Palette};

pub struct Showcase {
    pub project: &'static Project,
    pub index: usize,
    pub len: usize,
    /// 0..=100
    pub progress: f64,
    pub phase: CarouselPhase,
    pub palette: Palette,
}

impl Showcase {
    fn card(&self) -> Paragraph<'static> {
        let p = self.project;
        let accent = Style::default()
            .fg(self.palette.accent)
            .add_modifier(Modifier::BOLD);
        let muted = Style::default().fg(self.palette.muted);
        let text = Style::default().fg(self.palette.text);

        let mut lines = vec![
            Line::from(Span::styled(p.category.to_string().to_uppercase(), muted)),
            Line::from(Span::styled(p.title, accent)),
            Line::default(),
            Line::from(Span::styled(p.description, text)),
            Line::default(),
            Line::from(Span::styled(p.long_description, text)),
            Line::default(),
            Line::from(vec![Span::styled("Stack: ", muted), Span::styled(p.tech_list(), text)]),
        ];
        for (label, url) in [("Demo", p.demo_url), ("Code", p.repo_url)] {
            if let Some(url) = url {
                lines.push(Line::from(vec![
                    Span::styled(format!("{label}: "), muted),
                    Span::styled(url, text.add_modifier(Modifier::UNDERLINED)),
                ]));
            }
        }

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(self.palette.accent))
            .title(format!(" {} / {} ", self.index + 1, self.len))
            .padding(Padding::horizontal(1));
        Paragraph::new(lines).wrap(Wrap { trim: true }).block(block)
    }

    fn dots(&self) -> Line<'static> {
        let spans: Vec<Span> = (0..self.len)
            .map(|i| {
                if i == self.index {
                    Span::styled("● ", Style::default().fg(self.palette.accent))
                } else {
                    Span::styled("○ ", Style::default().fg(self.palette.muted))
                }
            })
            .collect();
        Line::from(spans).centered()
    }

    fn gauge_label(&self) -> &'static str {
        match self.phase {
            CarouselPhase::Running => "auto-advancing",
            CarouselPhase::Paused => "paused",
            CarouselPhase::Transitioning => "…",
        }
    }
}

impl Component for Showcase {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [card_area, gauge_area, dots_area, hints_area] = Layout::vertical([
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(self.card(), card_area);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(self.palette.accent))
            .ratio((self.progress / 100.0).clamp(0.0, 1.0))
            .label(self.gauge_label());
        frame.render_widget(gauge, gauge_area);

        frame.render_widget(self.dots(), dots_area);
        frame.render_widget(
            Line::from(Span::styled(
                format!(
                    "←/→ browse · 1-{} jump · a ask AI about this project",
                    self.len.min(9)
                ),
                Style::default().fg(self.palette.muted),
            ))
            .centered(),
            hints_area,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::PROJECTS;
    use crate::core::state::Theme;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn showcase(index: usize, phase: CarouselPhase) -> Showcase {
        Showcase {
            project: &PROJECTS[index],
            index,
            len: PROJECTS.len(),
            progress: 40.0,
            phase,
            palette: Palette::for_theme(Theme::Dark),
        }
    }

    fn rendered(showcase: &mut Showcase) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 24)).unwrap();
        terminal.draw(|f| showcase.render(f, f.area())).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_renders_current_project() {
        let text = rendered(&mut showcase(1, CarouselPhase::Running));
        assert!(text.contains(PROJECTS[1].title));
        assert!(text.contains(&format!("2 / {}", PROJECTS.len())));
        assert!(text.contains("auto-advancing"));
    }

    #[test]
    fn test_paused_label() {
        let text = rendered(&mut showcase(0, CarouselPhase::Paused));
        assert!(text.contains("paused"));
    }

    #[test]
    fn test_dots_mark_current_index() {
        let dots = showcase(2, CarouselPhase::Running).dots();
        let symbols: Vec<&str> = dots.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(symbols[2], "● ");
        assert_eq!(symbols.iter().filter(|s| **s == "● ").count(), 1);
    }
}
