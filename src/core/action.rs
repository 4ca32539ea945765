//! # Actions
//!
//! Everything that can happen in folio becomes an `Action`.
//! Visitor presses Enter in the chat? That's `Action::Submit(text)`.
//! Gemini streams a fragment? That's `Action::StreamFragment { .. }`.
//!
//! The `update()` function takes the current state and an action,
//! mutates the state and returns an [`Effect`]: the I/O the host must
//! perform. No network calls here.
//!
//! ```text
//! State + Action  →  update()  →  State' + Effect
//! ```

use std::time::Instant;

use log::{debug, info};
use uuid::Uuid;

use crate::core::chat::{ChatTrigger, SendRequest};
use crate::core::content::{BLOGS, CERTIFICATES};
use crate::core::state::{App, Section, SummaryState};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,
    /// Periodic loop tick carrying the current monotonic time.
    Tick(Instant),

    // Navigation
    NextSection,
    PreviousSection,
    ToggleTheme,

    // Chat panel
    ToggleChat,
    CloseChat,
    Chat(ChatTrigger),
    Submit(String),
    PickSuggestion(usize),
    StreamFragment { id: Uuid, text: String },
    StreamFinished(Uuid),
    /// The send could not start (see `ChatService::send_stream`).
    StreamFailed(Uuid),

    // Projects
    CarouselNext(Instant),
    CarouselPrevious(Instant),
    CarouselJump(usize, Instant),
    PointerEnter(Instant),
    PointerLeave(Instant),

    // Insights
    NextPost,
    PreviousPost,
    RequestSummary,
    SummaryReady { post: usize, text: String },

    // Certifications
    NextCertificate,
    PreviousCertificate,
    OpenCertificate,
    CloseCertificate,
}

/// I/O requested by `update()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    SpawnStream(SendRequest),
    CancelStream(Uuid),
    SpawnSummary { post: usize, prompt: String },
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::Quit => {
            info!("Quit requested");
            return Effect::Quit;
        }
        Action::Tick(now) => {
            app.carousel.tick(now);
        }

        Action::NextSection => {
            let section = app.section.next();
            set_section(app, section);
        }
        Action::PreviousSection => {
            let section = app.section.previous();
            set_section(app, section);
        }
        Action::ToggleTheme => {
            app.theme = app.theme.toggle();
            app.status_message = format!("Theme: {:?}", app.theme);
        }

        Action::ToggleChat => {
            app.chat_open = !app.chat_open;
            app.chat_follow = true;
        }
        Action::CloseChat => {
            app.chat_open = false;
            app.chat_follow = true;
        }
        Action::Chat(trigger) => return handle_trigger(app, trigger),
        Action::Submit(text) => return submit(app, &text),
        Action::PickSuggestion(index) => {
            let Some(suggestion) = app.chat.suggestions().get(index) else {
                return Effect::None;
            };
            return submit(app, suggestion);
        }
        Action::StreamFragment { id, text } => {
            if app.chat.apply_fragment(id, &text) {
                app.chat_follow = true;
            }
        }
        Action::StreamFinished(id) => {
            if app.chat.finish_stream(id) {
                app.chat_follow = true;
                app.status_message = String::from("Ready");
            }
        }
        Action::StreamFailed(id) => {
            if app.chat.fail(id) {
                app.chat_follow = true;
                app.status_message = String::from("Chat unavailable");
            }
        }

        Action::CarouselNext(now) => {
            app.carousel.next(now);
        }
        Action::CarouselPrevious(now) => {
            app.carousel.previous(now);
        }
        Action::CarouselJump(index, now) => {
            app.carousel.jump_to(index, now);
        }
        Action::PointerEnter(now) => app.carousel.pointer_enter(now),
        Action::PointerLeave(now) => app.carousel.pointer_leave(now),

        Action::NextPost => {
            let index = (app.blog.selected + 1) % BLOGS.len();
            select_post(app, index);
        }
        Action::PreviousPost => {
            let index = (app.blog.selected + BLOGS.len() - 1) % BLOGS.len();
            select_post(app, index);
        }
        Action::RequestSummary => {
            if app.blog.summary == SummaryState::Generating {
                return Effect::None;
            }
            app.blog.summary = SummaryState::Generating;
            let post = app.blog.selected;
            return Effect::SpawnSummary {
                post,
                prompt: app.selected_post().summary_prompt(),
            };
        }
        Action::SummaryReady { post, text } => {
            if post == app.blog.selected && app.blog.summary == SummaryState::Generating {
                app.blog.summary = SummaryState::Ready(text);
            } else {
                debug!("Discarding summary for post {} (selected {})", post, app.blog.selected);
            }
        }

        Action::NextCertificate => {
            app.certificates.selected = (app.certificates.selected + 1) % CERTIFICATES.len();
        }
        Action::PreviousCertificate => {
            app.certificates.selected =
                (app.certificates.selected + CERTIFICATES.len() - 1) % CERTIFICATES.len();
        }
        Action::OpenCertificate => app.certificates.detail_open = true,
        Action::CloseCertificate => app.certificates.detail_open = false,
    }
    Effect::None
}

fn set_section(app: &mut App, section: Section) {
    app.section = section;
    app.status_message = section.title().to_string();
}

fn select_post(app: &mut App, index: usize) {
    if index != app.blog.selected {
        app.blog.selected = index;
        app.blog.summary = SummaryState::None;
    }
}

fn submit(app: &mut App, text: &str) -> Effect {
    match app.chat.submit(text) {
        Some(request) => {
            app.chat_follow = true;
            app.status_message = String::from("Thinking...");
            Effect::SpawnStream(request)
        }
        None => Effect::None,
    }
}

fn handle_trigger(app: &mut App, trigger: ChatTrigger) -> Effect {
    app.chat_open = true;
    app.chat_follow = true;
    match trigger {
        ChatTrigger::SendMessage(text) => submit(app, &text),
        ChatTrigger::OpenWithGreeting(text) => {
            let cancelled = app.chat.reset_with_opening(text);
            app.service.reset_session();
            match cancelled {
                Some(id) => Effect::CancelStream(id),
                None => Effect::None,
            }
        }
    }
}
