//! Core types and error handling for repatch.
//!
//! This module centralizes the crate's error taxonomy and the
//! user-friendly error presentation used by the CLI. Every fatal
//! condition in the resolve pipeline maps onto a [`RepatchError`]
//! variant; the CLI converts the final `anyhow::Error` into an
//! [`ErrorContext`] with a suggestion before exiting.

pub mod error;

pub use error::{ErrorContext, RepatchError, user_friendly_error};
