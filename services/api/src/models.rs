//! API models for request and response payloads

use serde::Serialize;

pub mod movie;

pub use movie::{Movie, MovieInput, NewMovie};

/// Plain confirmation or error body
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
