//! Core types shared across bowerflat.
//!
//! Currently this is the error taxonomy and its user-facing presentation;
//! see [`error`] for the full exit-code mapping.

pub mod error;

pub use error::{BowerflatError, ErrorContext, user_friendly_error};
