//! Movies API service
//!
//! CRUD over a movie collection, with write routes gated behind a GitHub
//! login session. [`routes::create_router`] builds the HTTP surface from an
//! [`state::AppState`] whose stores are injected by the caller.

pub mod config;
pub mod docs;
pub mod error;
pub mod middleware;
pub mod models;
pub mod oauth;
pub mod repositories;
pub mod routes;
pub mod session;
pub mod state;
pub mod validation;

pub use routes::create_router;
pub use state::AppState;
