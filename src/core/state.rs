//! # Application State
//!
//! Core business state for folio. This module contains domain logic only,
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── service: Arc<ChatService>     // Gemini chat + one-shot calls
//! ├── model_name: String            // current model
//! ├── section: Section              // which page is showing
//! ├── theme: Theme                  // dark / light palette
//! ├── chat: ChatWidget              // transcript + send state machine
//! ├── chat_open: bool               // chat panel visible
//! ├── chat_follow: bool             // chat view sticks to newest message
//! ├── carousel: Carousel            // project showcase rotation
//! ├── blog: BlogState               // selected post + TL;DR
//! ├── certificates: CertificateState
//! └── status_message: String        // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Instant;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::carousel::Carousel;
use crate::core::chat::ChatWidget;
use crate::core::config::ResolvedConfig;
use crate::core::content::{self, BLOGS, CERTIFICATES, PROJECTS};
use crate::inference::ChatService;

const PROJECT_COUNT: NonZeroUsize = match NonZeroUsize::new(PROJECTS.len()) {
    Some(n) => n,
    None => panic!("portfolio needs at least one project"),
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    #[default]
    About,
    Certifications,
    Insights,
    Projects,
    Contact,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::About,
        Section::Certifications,
        Section::Insights,
        Section::Projects,
        Section::Contact,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::About => "About",
            Section::Certifications => "Certifications",
            Section::Insights => "Insights",
            Section::Projects => "Projects",
            Section::Contact => "Contact",
        }
    }

    /// Page heading shown above the section body.
    pub fn heading(self) -> &'static str {
        match self {
            Section::About => content::PROFILE.headline,
            Section::Certifications => "Technical Credentials",
            Section::Insights => "Research & Thoughts",
            Section::Projects => "Featured Deployments",
            Section::Contact => "Let's solve the next problem",
        }
    }

    fn position(self) -> usize {
        Self::ALL.iter().position(|s| *s == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

/// AI TL;DR for the selected blog post.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SummaryState {
    #[default]
    None,
    Generating,
    Ready(String),
}

#[derive(Debug, Default)]
pub struct BlogState {
    pub selected: usize,
    pub summary: SummaryState,
}

#[derive(Debug, Default)]
pub struct CertificateState {
    pub selected: usize,
    pub detail_open: bool,
}

pub struct App {
    pub service: Arc<ChatService>,
    pub model_name: String,
    pub section: Section,
    pub theme: Theme,
    pub chat: ChatWidget,
    pub chat_open: bool,
    /// Set on every transcript change and toggle; the chat view scrolls to
    /// the newest message and clears it.
    pub chat_follow: bool,
    pub carousel: Carousel,
    pub blog: BlogState,
    pub certificates: CertificateState,
    pub status_message: String,
}

impl App {
    pub fn new(service: Arc<ChatService>, model_name: String, now: Instant) -> Self {
        Self {
            service,
            model_name,
            section: Section::default(),
            theme: Theme::default(),
            chat: ChatWidget::new(content::chat_greeting()),
            chat_open: false,
            chat_follow: true,
            carousel: Carousel::new(PROJECT_COUNT, now),
            blog: BlogState::default(),
            certificates: CertificateState::default(),
            status_message: String::from("Welcome!"),
        }
    }

    pub fn from_config(service: Arc<ChatService>, config: &ResolvedConfig, now: Instant) -> Self {
        let mut app = Self::new(service, config.model_name.clone(), now);
        app.section = config.start_section;
        app
    }

    pub fn current_project(&self) -> &'static content::Project {
        &PROJECTS[self.carousel.index()]
    }

    pub fn selected_post(&self) -> &'static content::BlogPost {
        &BLOGS[self.blog.selected.min(BLOGS.len() - 1)]
    }

    pub fn selected_certificate(&self) -> &'static content::Certificate {
        &CERTIFICATES[self.certificates.selected.min(CERTIFICATES.len() - 1)]
    }
}
