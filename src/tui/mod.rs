//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, draws the portfolio and
//! translates terminal input into `core::Action` values. It also executes
//! the `Effect`s that `update()` returns.
//!
//! ## Loop
//!
//! Each iteration draws, waits up to `REFRESH_RATE` for input, drains every
//! pending input event, then drains actions sent back by background tasks.
//! Every iteration also feeds `Action::Tick(now)` so the carousel advances
//! at the refresh rate whether or not anything else happened.
//!
//! Background tasks (chat streams, TL;DR requests) never touch `App`; they
//! send actions over a `std::sync::mpsc` channel, so all mutation stays on
//! this thread inside `update()`.

mod component;
mod components;
mod event;
pub mod markdown;
mod ui;

use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Instant;

use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use futures::StreamExt;
use log::{debug, info, warn};
use ratatui::layout::{Position, Rect};
use uuid::Uuid;

use crate::core::action::{Action, Effect, update};
use crate::core::carousel::REFRESH_RATE;
use crate::core::chat::{ChatTrigger, SendRequest};
use crate::core::config::ResolvedConfig;
use crate::core::content::RECRUITER_GREETING;
use crate::core::state::{App, Section, Theme};
use crate::inference::{CancelToken, ChatService, ChatSettings, GeminiProvider, GenerativeProvider};
use crate::tui::component::{EventHandler, Palette};
use crate::tui::components::{BlogReaderState, ChatPanelEvent, ChatPanelState};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub chat_panel: ChatPanelState,
    pub blog: BlogReaderState,
    /// Where the showcase was last drawn; `None` off the Projects section.
    pub showcase_area: Option<Rect>,
    /// Whether the mouse currently hovers the showcase.
    pub pointer_over_showcase: bool,
}

impl TuiState {
    pub fn new(theme: Theme) -> Self {
        Self {
            chat_panel: ChatPanelState::new(Palette::for_theme(theme)),
            blog: BlogReaderState::default(),
            showcase_area: None,
            pointer_over_showcase: false,
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

/// The chat send currently streaming, if any.
struct ActiveStream {
    reply_id: Uuid,
    cancel: CancelToken,
}

/// Executes effects returned by `update()`.
struct EffectRunner {
    service: Arc<ChatService>,
    tx: mpsc::Sender<Action>,
    active: Option<ActiveStream>,
}

impl EffectRunner {
    /// Returns true when the loop should exit.
    fn run(&mut self, effect: Effect) -> bool {
        match effect {
            Effect::None => {}
            Effect::Quit => return true,
            Effect::SpawnStream(request) => {
                let cancel = CancelToken::new();
                self.active = Some(ActiveStream {
                    reply_id: request.reply_id,
                    cancel: cancel.clone(),
                });
                spawn_stream(Arc::clone(&self.service), request, cancel, self.tx.clone());
            }
            Effect::CancelStream(id) => match self.active.take() {
                Some(active) if active.reply_id == id => {
                    info!("Cancelling stream for reply {}", id);
                    active.cancel.cancel();
                }
                other => self.active = other,
            },
            Effect::SpawnSummary { post, prompt } => {
                spawn_summary(Arc::clone(&self.service), post, prompt, self.tx.clone());
            }
        }
        false
    }

    /// Forgets the active stream once its terminal action arrives.
    fn observe(&mut self, action: &Action) {
        if let Action::StreamFinished(id) | Action::StreamFailed(id) = action
            && self.active.as_ref().is_some_and(|a| a.reply_id == *id)
        {
            self.active = None;
        }
    }

    fn shutdown(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
        self.service.dispose();
    }
}

pub fn build_provider(config: &ResolvedConfig) -> Arc<dyn GenerativeProvider> {
    info!("Using Gemini at {}", config.base_url);
    let provider = GeminiProvider::new(config.api_key.clone(), Some(config.base_url.clone()));
    if !provider.has_api_key() {
        warn!("No Gemini API key configured; chat replies will show the fallback text");
    }
    Arc::new(provider)
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let provider = build_provider(&config);
    let service = Arc::new(ChatService::new(
        provider,
        ChatSettings::portfolio(config.model_name.clone(), config.temperature),
    ));
    let mut app = App::from_config(Arc::clone(&service), &config, Instant::now());
    let mut tui = TuiState::new(app.theme);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let mut effects = EffectRunner {
        service,
        tx,
        active: None,
    };

    let mut should_quit = false;
    while !should_quit {
        if app.chat_follow {
            tui.chat_panel.stick_to_bottom = true;
            app.chat_follow = false;
        }
        terminal.draw(|f| ui::draw_ui(f, &app, &mut tui, Instant::now()))?;

        let first_event = poll_event_timeout(REFRESH_RATE);
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = route_event(&app, &mut tui, &event, Instant::now()) else {
                continue;
            };
            should_quit |= dispatch(&mut app, &mut tui, &mut effects, action);
        }

        // Handle background task actions (stream fragments, summaries)
        while let Ok(action) = rx.try_recv() {
            debug!("Event loop received: {:?}", action);
            effects.observe(&action);
            should_quit |= dispatch(&mut app, &mut tui, &mut effects, action);
        }

        should_quit |= dispatch(&mut app, &mut tui, &mut effects, Action::Tick(Instant::now()));
    }

    effects.shutdown();
    ratatui::restore();
    info!("folio exited");
    Ok(())
}

/// Applies one action and runs its effect. Returns true on quit.
fn dispatch(app: &mut App, tui: &mut TuiState, effects: &mut EffectRunner, action: Action) -> bool {
    let effect = update(app, action);
    let quit = effects.run(effect);

    // Leaving the Projects section ends any hover pause
    if tui.pointer_over_showcase && app.section != Section::Projects {
        tui.pointer_over_showcase = false;
        update(app, Action::PointerLeave(Instant::now()));
    }
    quit
}

/// Translates one terminal event into at most one action.
///
/// Component-local events (scrolling, typing) are handled here directly and
/// yield `None`.
fn route_event(app: &App, tui: &mut TuiState, event: &TuiEvent, now: Instant) -> Option<Action> {
    match event {
        TuiEvent::ForceQuit => return Some(Action::Quit),
        TuiEvent::Resize => return None,
        TuiEvent::ToggleChat => return Some(Action::ToggleChat),
        TuiEvent::ToggleTheme => return Some(Action::ToggleTheme),
        TuiEvent::NextSection => return Some(Action::NextSection),
        TuiEvent::PreviousSection => return Some(Action::PreviousSection),
        TuiEvent::MouseMove(col, row) => return hover(tui, Position::new(*col, *row), now),
        _ => {}
    }

    if app.chat_open {
        return match tui.chat_panel.handle_event(event)? {
            ChatPanelEvent::Submit(text) => Some(Action::Submit(text)),
            ChatPanelEvent::PickSuggestion(index) => Some(Action::PickSuggestion(index)),
            ChatPanelEvent::Close => Some(Action::CloseChat),
        };
    }

    match (app.section, event) {
        (_, TuiEvent::InputChar('q')) => Some(Action::Quit),
        (_, TuiEvent::InputChar('c')) => Some(Action::ToggleChat),

        (Section::About, TuiEvent::InputChar('f')) => Some(Action::Chat(
            ChatTrigger::OpenWithGreeting(RECRUITER_GREETING.to_string()),
        )),

        (Section::Certifications, TuiEvent::CursorUp) => Some(Action::PreviousCertificate),
        (Section::Certifications, TuiEvent::CursorDown) => Some(Action::NextCertificate),
        (Section::Certifications, TuiEvent::Submit) => Some(Action::OpenCertificate),
        (Section::Certifications, TuiEvent::Escape) => Some(Action::CloseCertificate),

        (Section::Insights, TuiEvent::CursorUp) => Some(Action::PreviousPost),
        (Section::Insights, TuiEvent::CursorDown) => Some(Action::NextPost),
        (Section::Insights, TuiEvent::InputChar('s')) => Some(Action::RequestSummary),
        (Section::Insights, _) => {
            tui.blog.handle_event(event);
            None
        }

        (Section::Projects, TuiEvent::CursorLeft) => Some(Action::CarouselPrevious(now)),
        (Section::Projects, TuiEvent::CursorRight) => Some(Action::CarouselNext(now)),
        (Section::Projects, TuiEvent::InputChar('a')) => Some(Action::Chat(
            ChatTrigger::SendMessage(app.current_project().ask_prompt()),
        )),
        (Section::Projects, TuiEvent::InputChar(c @ '1'..='9')) => {
            let index = c.to_digit(10)? as usize - 1;
            (index < app.carousel.len()).then_some(Action::CarouselJump(index, now))
        }

        _ => None,
    }
}

/// Hover over the showcase counts as pointer enter/leave for the carousel.
fn hover(tui: &mut TuiState, position: Position, now: Instant) -> Option<Action> {
    let inside = tui
        .showcase_area
        .is_some_and(|area| area.contains(position));
    if inside == tui.pointer_over_showcase {
        return None;
    }
    tui.pointer_over_showcase = inside;
    Some(if inside {
        Action::PointerEnter(now)
    } else {
        Action::PointerLeave(now)
    })
}

fn spawn_stream(
    service: Arc<ChatService>,
    request: SendRequest,
    cancel: CancelToken,
    tx: mpsc::Sender<Action>,
) {
    let id = request.reply_id;
    info!("Spawning chat stream for reply {}", id);

    tokio::spawn(async move {
        let mut fragments = match service.send_stream(&request.text, cancel) {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Chat send for reply {} could not start: {}", id, e);
                if tx.send(Action::StreamFailed(id)).is_err() {
                    warn!("Failed to send StreamFailed: receiver dropped");
                }
                return;
            }
        };

        let mut forwarded = 0usize;
        while let Some(text) = fragments.next().await {
            forwarded += 1;
            if tx.send(Action::StreamFragment { id, text }).is_err() {
                warn!("Failed to forward fragment: receiver dropped");
                return;
            }
        }

        info!("Stream for reply {} ended after {} fragments", id, forwarded);
        if tx.send(Action::StreamFinished(id)).is_err() {
            warn!("Failed to send StreamFinished: receiver dropped");
        }
    });
}

fn spawn_summary(service: Arc<ChatService>, post: usize, prompt: String, tx: mpsc::Sender<Action>) {
    info!("Spawning TL;DR request for post {}", post);
    tokio::spawn(async move {
        let text = service.send_one_shot(&prompt).await;
        if tx.send(Action::SummaryReady { post, text }).is_err() {
            warn!("Failed to send SummaryReady: receiver dropped");
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::PROJECTS;
    use crate::core::state::SummaryState;
    use crate::test_support::{FakeProvider, StreamScript, test_app, test_service};
    use std::time::Duration;

    fn tui() -> TuiState {
        TuiState::new(Theme::Dark)
    }

    #[test]
    fn test_global_keys() {
        let app = test_app();
        let mut tui = tui();
        let now = Instant::now();
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::ForceQuit, now),
            Some(Action::Quit)
        );
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::NextSection, now),
            Some(Action::NextSection)
        );
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('c'), now),
            Some(Action::ToggleChat)
        );
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::Resize, now), None);
    }

    #[test]
    fn test_section_keys() {
        let mut app = test_app();
        let mut tui = tui();
        let now = Instant::now();

        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('f'), now),
            Some(Action::Chat(ChatTrigger::OpenWithGreeting(
                RECRUITER_GREETING.to_string()
            )))
        );

        app.section = Section::Projects;
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('a'), now),
            Some(Action::Chat(ChatTrigger::SendMessage(
                app.current_project().ask_prompt()
            )))
        );
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('2'), now),
            Some(Action::CarouselJump(1, now))
        );
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('9'), now),
            None,
            "only {} projects",
            PROJECTS.len()
        );
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::CursorRight, now),
            Some(Action::CarouselNext(now))
        );

        app.section = Section::Insights;
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::InputChar('s'), now),
            Some(Action::RequestSummary)
        );
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::ScrollDown, now), None);

        app.section = Section::Certifications;
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Submit, now),
            Some(Action::OpenCertificate)
        );
    }

    #[test]
    fn test_chat_open_routes_typing_to_panel() {
        let mut app = test_app();
        app.chat_open = true;
        let mut tui = tui();
        let now = Instant::now();

        // 'q' is text while the chat is open
        for c in "qa".chars() {
            assert_eq!(route_event(&app, &mut tui, &TuiEvent::InputChar(c), now), None);
        }
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Submit, now),
            Some(Action::Submit("qa".into()))
        );
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Suggestion(0), now),
            Some(Action::PickSuggestion(0))
        );
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::Escape, now),
            Some(Action::CloseChat)
        );
    }

    #[test]
    fn test_hover_enters_and_leaves_once() {
        let app = test_app();
        let mut tui = tui();
        tui.showcase_area = Some(Rect::new(0, 3, 50, 20));
        let now = Instant::now();

        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::MouseMove(10, 10), now),
            Some(Action::PointerEnter(now))
        );
        assert_eq!(route_event(&app, &mut tui, &TuiEvent::MouseMove(11, 10), now), None);
        assert_eq!(
            route_event(&app, &mut tui, &TuiEvent::MouseMove(70, 10), now),
            Some(Action::PointerLeave(now))
        );
    }

    #[test]
    fn test_leaving_projects_resumes_carousel() {
        let (tx, _rx) = mpsc::channel();
        let mut app = test_app();
        app.section = Section::Projects;
        let mut effects = EffectRunner {
            service: Arc::clone(&app.service),
            tx,
            active: None,
        };
        let mut tui = tui();
        tui.pointer_over_showcase = true;
        update(&mut app, Action::PointerEnter(Instant::now()));
        assert!(app.carousel.is_paused());

        dispatch(&mut app, &mut tui, &mut effects, Action::NextSection);
        assert!(!tui.pointer_over_showcase);
        assert!(!app.carousel.is_paused());
    }

    async fn drain_until<F>(rx: &mpsc::Receiver<Action>, mut done: F) -> Vec<Action>
    where
        F: FnMut(&Action) -> bool,
    {
        let mut seen = Vec::new();
        for _ in 0..200 {
            while let Ok(action) = rx.try_recv() {
                let finished = done(&action);
                seen.push(action);
                if finished {
                    return seen;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("timed out waiting for actions, saw {seen:?}");
    }

    #[tokio::test]
    async fn test_stream_effect_forwards_fragments_then_finishes() {
        let provider = Arc::new(FakeProvider::with_streams(vec![StreamScript::Reply(vec![
            "Hel", "lo",
        ])]));
        let service = test_service(provider);
        let (tx, rx) = mpsc::channel();
        let mut effects = EffectRunner {
            service: Arc::clone(&service),
            tx,
            active: None,
        };

        let mut app = App::new(service, "test-model".into(), Instant::now());
        let effect = update(&mut app, Action::Submit("Hi".into()));
        assert!(!effects.run(effect));
        assert!(effects.active.is_some());

        let actions = drain_until(&rx, |a| matches!(a, Action::StreamFinished(_))).await;
        for action in actions {
            effects.observe(&action);
            update(&mut app, action);
        }
        assert!(effects.active.is_none());
        assert_eq!(app.chat.messages().last().unwrap().text, "Hello");
        assert!(!app.chat.is_busy());
    }

    #[tokio::test]
    async fn test_stream_effect_after_dispose_reports_failure() {
        let service = test_service(Arc::new(FakeProvider::default()));
        service.dispose();
        let (tx, rx) = mpsc::channel();
        let mut effects = EffectRunner {
            service: Arc::clone(&service),
            tx,
            active: None,
        };

        let mut app = App::new(service, "test-model".into(), Instant::now());
        effects.run(update(&mut app, Action::Submit("Hi".into())));

        let actions = drain_until(&rx, |a| matches!(a, Action::StreamFailed(_))).await;
        for action in actions {
            update(&mut app, action);
        }
        assert!(app.chat.last_error_displayed());
    }

    #[tokio::test]
    async fn test_candidate_fit_cancels_active_stream() {
        let provider = Arc::new(FakeProvider::with_streams(vec![StreamScript::Hang(vec![
            "partial",
        ])]));
        let service = test_service(provider);
        let (tx, _rx) = mpsc::channel();
        let mut effects = EffectRunner {
            service: Arc::clone(&service),
            tx,
            active: None,
        };

        let mut app = App::new(service, "test-model".into(), Instant::now());
        effects.run(update(&mut app, Action::Submit("Hi".into())));
        let cancel = effects.active.as_ref().unwrap().cancel.clone();

        effects.run(update(
            &mut app,
            Action::Chat(ChatTrigger::OpenWithGreeting(RECRUITER_GREETING.into())),
        ));
        assert!(effects.active.is_none());
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn test_summary_effect_delivers_text() {
        let provider = Arc::new(FakeProvider::with_one_shot(Ok("- a\n- b\n- c".into())));
        let service = test_service(provider);
        let (tx, rx) = mpsc::channel();
        let mut effects = EffectRunner {
            service: Arc::clone(&service),
            tx,
            active: None,
        };

        let mut app = App::new(service, "test-model".into(), Instant::now());
        app.section = Section::Insights;
        effects.run(update(&mut app, Action::RequestSummary));

        let actions = drain_until(&rx, |a| matches!(a, Action::SummaryReady { .. })).await;
        for action in actions {
            update(&mut app, action);
        }
        assert_eq!(app.blog.summary, SummaryState::Ready("- a\n- b\n- c".into()));
    }

    #[test]
    fn test_shutdown_disposes_service() {
        let (tx, _rx) = mpsc::channel();
        let service = test_service(Arc::new(FakeProvider::default()));
        let mut effects = EffectRunner {
            service: Arc::clone(&service),
            tx,
            active: None,
        };
        effects.shutdown();
        assert!(service.is_disposed());
    }
}
