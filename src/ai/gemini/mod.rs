pub mod client;
pub mod payload;
pub mod response;
pub mod types;

pub use client::GeminiVisionClient;
pub use payload::build_request;
pub use response::extract_answer;
