use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};

use crate::core::content::{PROFILE, SKILLS};
use crate::tui::component::{Component, Palette};
use crate::tui::components::skills_chart::SkillsChart;

/// Profile intro, skills chart and the candidate-fit hook.
pub struct About {
    pub palette: Palette,
}

impl About {
    fn intro(&self) -> Paragraph<'static> {
        let text = Style::default().fg(self.palette.text);
        let muted = Style::default().fg(self.palette.muted);
        let lines = vec![
            Line::from(Span::styled(
                PROFILE.role,
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(PROFILE.specialty, muted)),
            Line::default(),
            Line::from(Span::styled(PROFILE.tagline, text)),
            Line::default(),
            Line::from(Span::styled(
                format!("\"{}\"", PROFILE.philosophy),
                text.add_modifier(Modifier::ITALIC),
            )),
            Line::from(Span::styled(
                format!("Also: {}", PROFILE.secondary_skills),
                muted,
            )),
        ];
        Paragraph::new(lines).wrap(Wrap { trim: true })
    }

    fn fit_hook(&self) -> Line<'static> {
        Line::from(vec![
            Span::styled(
                " f ",
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::REVERSED | Modifier::BOLD),
            ),
            Span::styled(
                " Check Candidate Fit: paste a job description and get a match score",
                Style::default().fg(self.palette.text),
            ),
        ])
    }
}

impl Component for About {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .padding(Padding::new(2, 2, 1, 0));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let mut chart = SkillsChart {
            skills: SKILLS,
            palette: self.palette,
        };
        let [intro_area, skills_title, skills_area, _, hook_area] = Layout::vertical([
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(chart.height()),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        frame.render_widget(self.intro(), intro_area);
        frame.render_widget(
            Span::styled(
                "Skill Proficiency",
                Style::default()
                    .fg(self.palette.muted)
                    .add_modifier(Modifier::BOLD),
            ),
            skills_title,
        );
        chart.render(frame, skills_area);
        frame.render_widget(self.fit_hook(), hook_area);
    }
}
