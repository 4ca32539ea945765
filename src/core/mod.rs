//! # Core Application Logic
//!
//! This module contains folio's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Chat / Carousel      │
//!                    │    state machines       │
//!                    └───────────┬─────────────┘
//!                                │ Effect
//!                                ▼
//!                         ┌────────────┐
//!                         │    TUI     │
//!                         │  Adapter   │
//!                         │ (ratatui)  │
//!                         └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum and the `update()` reducer
//! - [`chat`]: Chat transcript and send state machine
//! - [`carousel`]: Auto-advancing project showcase index
//! - [`content`]: Static portfolio data
//! - [`config`]: Layered configuration

pub mod action;
pub mod carousel;
pub mod chat;
pub mod config;
pub mod content;
pub mod state;
