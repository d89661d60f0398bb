//! Repositories for movie persistence

pub mod memory;
pub mod movie;

pub use memory::InMemoryMovieStore;
pub use movie::{MovieRepository, MovieStore};
