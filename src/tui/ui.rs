use std::time::Instant;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::content::{BLOGS, CERTIFICATES};
use crate::core::state::{App, Section};
use crate::tui::TuiState;
use crate::tui::component::{Component, Palette};
use crate::tui::components::{
    About, BlogReader, CertificateWall, ChatPanel, Contact, NavBar, Showcase, TitleBar,
};

/// Share of the main area the chat panel takes when open.
const CHAT_PANEL_PERCENT: u16 = 42;

/// Screen regions for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Areas {
    pub title: Rect,
    pub nav: Rect,
    pub heading: Rect,
    pub section: Rect,
    pub chat: Option<Rect>,
    pub hints: Rect,
}

pub fn layout(area: Rect, chat_open: bool) -> Areas {
    use Constraint::{Length, Min, Percentage};

    let [title, nav, main, hints] = Layout::vertical([Length(1), Length(1), Min(0), Length(1)])
        .areas(area);

    let (page, chat) = if chat_open {
        let [page, chat] =
            Layout::horizontal([Percentage(100 - CHAT_PANEL_PERCENT), Percentage(CHAT_PANEL_PERCENT)])
                .areas(main);
        (page, Some(chat))
    } else {
        (main, None)
    };
    let [heading, section] = Layout::vertical([Length(1), Min(0)]).areas(page);

    Areas {
        title,
        nav,
        heading,
        section,
        chat,
        hints,
    }
}

/// Key hints for the bottom row.
pub fn key_hints(app: &App) -> &'static str {
    if app.chat_open {
        return "Enter send · Ctrl+J newline · PgUp/PgDn scroll · Esc close chat · Ctrl+C quit";
    }
    match app.section {
        Section::About => "f candidate fit · Tab sections · c chat · Ctrl+T theme · q quit",
        Section::Certifications if app.certificates.detail_open => "Esc close · q quit",
        Section::Certifications => "↑/↓ select · Enter details · Tab sections · c chat · q quit",
        Section::Insights => "↑/↓ posts · s TL;DR · PgUp/PgDn scroll · Tab sections · q quit",
        Section::Projects => "←/→ browse · 1-9 jump · a ask AI · hover pauses · q quit",
        Section::Contact => "Tab sections · c chat · Ctrl+T theme · q quit",
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, now: Instant) {
    let palette = Palette::for_theme(app.theme);
    let areas = layout(frame.area(), app.chat_open);

    TitleBar::new(
        app.model_name.clone(),
        app.status_message.clone(),
        app.chat_open && tui.chat_panel.has_unseen_content(),
        palette,
    )
    .render(frame, areas.title);

    NavBar {
        section: app.section,
        theme: app.theme,
        chat_open: app.chat_open,
        palette,
    }
    .render(frame, areas.nav);

    frame.render_widget(
        Line::from(Span::styled(
            format!(" {}", app.section.heading()),
            Style::default()
                .fg(palette.text)
                .add_modifier(Modifier::BOLD),
        )),
        areas.heading,
    );

    draw_section(frame, app, tui, palette, areas.section, now);

    if let Some(chat_area) = areas.chat {
        ChatPanel {
            state: &mut tui.chat_panel,
            chat: &app.chat,
            palette,
            theme: app.theme,
        }
        .render(frame, chat_area);
    }

    frame.render_widget(
        Line::from(Span::styled(key_hints(app), Style::default().fg(palette.muted))).centered(),
        areas.hints,
    );
}

fn draw_section(
    frame: &mut Frame,
    app: &App,
    tui: &mut TuiState,
    palette: Palette,
    area: Rect,
    now: Instant,
) {
    tui.showcase_area = None;
    match app.section {
        Section::About => About { palette }.render(frame, area),
        Section::Certifications => CertificateWall {
            certificates: CERTIFICATES,
            selected: app.certificates.selected,
            detail_open: app.certificates.detail_open,
            palette,
        }
        .render(frame, area),
        Section::Insights => BlogReader {
            state: &mut tui.blog,
            posts: BLOGS,
            selected: app.blog.selected,
            summary: &app.blog.summary,
            palette,
            theme: app.theme,
        }
        .render(frame, area),
        Section::Projects => {
            tui.showcase_area = Some(area);
            Showcase {
                project: app.current_project(),
                index: app.carousel.index(),
                len: app.carousel.len(),
                progress: app.carousel.progress(),
                phase: app.carousel.phase(now),
                palette,
            }
            .render(frame, area);
        }
        Section::Contact => Contact { palette }.render(frame, area),
    }
}
