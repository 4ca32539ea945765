use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::LineGauge;

use crate::core::content::SkillMetric;
use crate::tui::component::{Component, Palette};

/// Width reserved for the skill name column.
const LABEL_WIDTH: u16 = 24;

/// One line gauge per skill, filled to `level / full_mark`.
pub struct SkillsChart {
    pub skills: &'static [SkillMetric],
    pub palette: Palette,
}

impl SkillsChart {
    pub fn height(&self) -> u16 {
        self.skills.len() as u16
    }
}

impl Component for SkillsChart {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical(self.skills.iter().map(|_| Constraint::Length(1))).split(area);
        for (skill, row) in self.skills.iter().zip(rows.iter()) {
            let [label_area, gauge_area] =
                Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Fill(1)])
                    .areas(*row);
            frame.render_widget(
                ratatui::text::Span::styled(skill.subject, Style::default().fg(self.palette.text)),
                label_area,
            );
            let gauge = LineGauge::default()
                .filled_style(
                    Style::default()
                        .fg(self.palette.accent)
                        .add_modifier(Modifier::BOLD),
                )
                .unfilled_style(Style::default().fg(self.palette.muted))
                .label(format!("{:>3}", skill.level))
                .ratio(skill.ratio());
            frame.render_widget(gauge, gauge_area);
        }
    }
}
