//! Hush CLI Library
//!
//! Terminal front end for Hush playback sessions: configuration loading, a
//! simulated media backend, a JSON-lines history and favorites store, and
//! helpers that turn arguments into tracks.
//!
//! This library exposes the components for testing purposes.

pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod render;
pub mod store;

pub use backend::SimulatedBackend;
pub use config::AppConfig;
pub use error::{CliError, Result};
pub use store::{FavoriteRecord, HistoryRecord, JsonLinesStore};
