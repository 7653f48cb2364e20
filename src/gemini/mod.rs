//! Gemini API client module.
//!
//! This module provides:
//! * [`GeminiClient`] — async trait over the consumed API operations
//!   (generation, file upload, file-state refresh).
//! * [`HttpGeminiClient`] — reqwest-based implementation against the hosted
//!   v1beta REST API.
//! * [`GenerateRequest`] / [`Part`] — request description and wire parts.
//! * [`RemoteFile`] / [`FileState`] — uploaded-media handle with its
//!   asynchronous processing state.
//! * [`GeminiError`] — error variants for client operations.

pub mod client;
pub mod types;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::{GeminiClient, GeminiError, HttpGeminiClient};
pub use types::{FileState, GenerateRequest, Part, RemoteFile};
