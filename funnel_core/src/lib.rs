#![forbid(unsafe_code)]

//! Core state machine for the protocol selection funnel.
//!
//! This crate provides:
//! - Domain types (medications, catalog, quiz, funnel state, intents)
//! - Embedded catalog and diagnostic quiz, with load-time validation
//! - Transition engine
//! - Sessions with state-change observers, and a multi-session registry

pub mod types;
pub mod error;
pub mod catalog;
pub mod content;
pub mod config;
pub mod logging;
pub mod state;
pub mod intent;
pub mod engine;
pub mod session;
pub mod registry;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{build_default_content, get_default_content};
pub use config::Config;
pub use engine::transition;
pub use session::{FunnelSession, StateChange, StateObserver};
pub use registry::SessionRegistry;
