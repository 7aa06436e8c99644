//! Hush Cache
//!
//! Local audio cache and streaming resolver for Hush playback sessions.
//!
//! # Features
//!
//! - Serve previously downloaded audio from a cache directory
//! - Stream uncached audio from remote storage
//! - Download streamed audio into the cache in the background, with progress
//!
//! # Example
//!
//! ```rust,no_run
//! use hush_cache::{CacheConfig, CachingResolver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = CacheConfig::new("/var/cache/hush", "https://storage.example.com/audio");
//! let resolver = CachingResolver::new(&config)?;
//! assert!(resolver.cache_path("Rain.wav").is_ok());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod config;
mod download;
mod error;
mod resolver;

pub use config::CacheConfig;
pub use error::{CacheError, Result};
pub use resolver::CachingResolver;
