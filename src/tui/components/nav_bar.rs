use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;

use crate::core::state::{Section, Theme};
use crate::tui::component::{Component, Palette};

/// Section tabs plus the theme and chat toggles on the right.
pub struct NavBar {
    pub section: Section,
    pub theme: Theme,
    pub chat_open: bool,
    pub palette: Palette,
}

impl NavBar {
    fn toggles(&self) -> Line<'static> {
        let key = Style::default().fg(self.palette.accent);
        let label = Style::default().fg(self.palette.muted);
        let theme = match self.theme {
            Theme::Dark => "dark",
            Theme::Light => "light",
        };
        let chat = if self.chat_open { "hide chat" } else { "chat" };
        Line::from(vec![
            Span::styled("^T ", key),
            Span::styled(format!("{theme}  "), label),
            Span::styled("^O ", key),
            Span::styled(chat, label),
        ])
        .right_aligned()
    }
}

impl Component for NavBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let toggles = self.toggles();
        let [tabs_area, toggles_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(toggles.width() as u16)])
                .areas(area);

        let selected = Section::ALL
            .iter()
            .position(|s| *s == self.section)
            .unwrap_or(0);
        let tabs = Tabs::new(Section::ALL.iter().map(|s| s.title()))
            .select(selected)
            .style(Style::default().fg(self.palette.muted))
            .highlight_style(
                Style::default()
                    .fg(self.palette.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            )
            .divider("·");

        frame.render_widget(tabs, tabs_area);
        frame.render_widget(toggles, toggles_area);
    }
}
