//! # Joia Common Library
//!
//! Shared code for the Joia karaoke services:
//! - Common error type
//! - Configuration loading and root folder resolution
//! - YouTube URL helpers

pub mod config;
pub mod error;
pub mod youtube;

pub use error::{Error, Result};
