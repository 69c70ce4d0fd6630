//! # quill 📜
//!
//! A terminal arXiv preprint tracker.
//!
//! ## Overview
//!
//! quill follows a set of arXiv topics, keeps every announced paper in a
//! local SQLite store, and lets you filter, search, bookmark, and group
//! articles into projects from your terminal. PDFs download on demand.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          App                                │
//! │   TUI event loop, key dispatch, background fetch worker     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        AppCore                              │
//! │  Owns filter/cursor state, routes filters to store queries, │
//! │  notifies article-changed / project-changed listeners       │
//! └─────────────────────────────────────────────────────────────┘
//!          │                                      │
//!          ▼                                      ▼
//! ┌─────────────────┐                    ┌─────────────────┐
//! │     Fetcher     │                    │    Database     │
//! │                 │                    │                 │
//! │ • RSS feed      │                    │ • Articles      │
//! │ • LaTeX cleanup │                    │ • Projects      │
//! │ • PDF download  │                    │ • Associations  │
//! └─────────────────┘                    └─────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`app`] — TUI application state and event loop
//! - [`config`] — Configuration management
//! - [`core`](crate::core) — Orchestration core (filters, bookmarks, projects)
//! - [`db`] — `SQLite` store for articles and projects
//! - [`fetch`] — Feed retrieval, parsing, LaTeX normalization
//! - [`models`] — Data models (Article, Filter)
//!
//! ## Example
//!
//! ```no_run
//! use quill::app;
//!
//! fn main() -> anyhow::Result<()> {
//!     app::run()
//! }
//! ```

#![doc(html_root_url = "https://docs.rs/quill/0.2.0")]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::use_self)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::return_self_not_must_use)]

pub mod app;
pub mod config;
pub mod core;
pub mod db;
pub mod fetch;
pub mod models;
pub mod paths;

// Re-export main types for convenience
pub use crate::app::AppState;
pub use crate::config::Config;
pub use crate::core::AppCore;
pub use crate::db::Database;
pub use crate::fetch::{ArticleSource, Fetcher};
pub use crate::models::{Article, Filter};

/// ASCII logo for the application
pub const LOGO: &str = r"
              _ _ _
   __ _ _   _(_) | |
  / _` | | | | | | |
 | (_| | |_| | | | |
  \__, |\__,_|_|_|_|
     |_|
";

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Repository URL
pub const REPO_URL: &str = "https://github.com/quill-tui/quill";
