//! # TUI Components
//!
//! Every section and panel of the portfolio, one file each.
//!
//! ## Stateless (props-based)
//!
//! Built fresh each frame from `App` fields:
//! - `TitleBar`, `NavBar`: the two header rows
//! - `About`, `SkillsChart`, `Contact`: static profile views
//! - `CertificateWall`: certificate list and detail popup
//! - `Showcase`: the Projects carousel card
//! - `Message`: one chat bubble
//!
//! ## Stateful (event-driven)
//!
//! Persistent state lives in `TuiState`; a transient wrapper borrows it
//! for the render pass:
//! - `ChatPanel` / `ChatPanelState`: transcript scroll, chips, input
//! - `BlogReader` / `BlogReaderState`: post list and scrolled body
//! - `InputBox`: the chat text field
//!
//! ```text
//! components/
//! ├── title_bar.rs        nav_bar.rs
//! ├── about.rs            skills_chart.rs
//! ├── certificate_wall.rs blog_reader.rs
//! ├── showcase.rs         contact.rs
//! └── chat_panel.rs ─┬─ message.rs
//!                    └─ input_box.rs
//! ```

pub mod about;
pub mod blog_reader;
pub mod certificate_wall;
pub mod chat_panel;
pub mod contact;
pub mod input_box;
pub mod message;
pub mod nav_bar;
pub mod showcase;
pub mod skills_chart;
mod title_bar;

pub use about::About;
pub use blog_reader::{BlogReader, BlogReaderState};
pub use certificate_wall::CertificateWall;
pub use chat_panel::{ChatPanel, ChatPanelEvent, ChatPanelState};
pub use contact::Contact;
pub use nav_bar::NavBar;
pub use showcase::Showcase;
pub use title_bar::TitleBar;
