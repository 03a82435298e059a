//! Describe images with a remote multimodal model
//!
//! Sends an image and a question to Gemini's `generateContent` endpoint,
//! retrying rate limits, server overload and network failures with
//! exponential backoff, and returns the model's text answer.

pub mod ai;
pub mod app;
pub mod config;
pub mod error;
pub mod http;
pub mod prompts;

pub use ai::{GeminiVisionClient, VisionService};
pub use error::{Error, Result};
