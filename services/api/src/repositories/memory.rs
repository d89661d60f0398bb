//! In-process movie store for local runs without PostgreSQL

use async_trait::async_trait;
use common::error::DatabaseResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::movie::MovieStore;
use crate::models::{Movie, NewMovie};

/// Movie store that keeps records in memory, shared between clones
#[derive(Debug, Clone, Default)]
pub struct InMemoryMovieStore {
    movies: Arc<RwLock<Vec<Movie>>>,
}

impl InMemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored movies
    pub async fn len(&self) -> usize {
        self.movies.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.movies.read().await.is_empty()
    }
}

#[async_trait]
impl MovieStore for InMemoryMovieStore {
    async fn create(&self, movie: &NewMovie) -> DatabaseResult<Movie> {
        let movie = movie.clone().into_movie(Uuid::new_v4());
        self.movies.write().await.push(movie.clone());
        Ok(movie)
    }

    async fn find_all(&self) -> DatabaseResult<Vec<Movie>> {
        Ok(self.movies.read().await.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Movie>> {
        let movies = self.movies.read().await;
        Ok(movies.iter().find(|movie| movie.id == id).cloned())
    }

    async fn update_by_id(&self, id: Uuid, movie: &NewMovie) -> DatabaseResult<Option<Movie>> {
        let mut movies = self.movies.write().await;
        let Some(slot) = movies.iter_mut().find(|existing| existing.id == id) else {
            return Ok(None);
        };

        *slot = movie.clone().into_movie(id);
        Ok(Some(slot.clone()))
    }

    async fn delete_by_id(&self, id: Uuid) -> DatabaseResult<Option<Movie>> {
        let mut movies = self.movies.write().await;
        let Some(index) = movies.iter().position(|movie| movie.id == id) else {
            return Ok(None);
        };

        Ok(Some(movies.remove(index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn new_movie(title: &str) -> NewMovie {
        NewMovie {
            title: title.to_string(),
            director: "Villeneuve".to_string(),
            release_date: NaiveDate::from_ymd_opt(2021, 10, 22).unwrap(),
            genre: "Sci-Fi".to_string(),
            rating: 8.5,
            duration: 155.0,
        }
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let store = InMemoryMovieStore::new();
        for title in ["Dune", "Arrival", "Sicario"] {
            store.create(&new_movie(title)).await.unwrap();
        }

        let titles: Vec<String> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|movie| movie.title)
            .collect();
        assert_eq!(titles, ["Dune", "Arrival", "Sicario"]);
    }

    #[tokio::test]
    async fn test_update_replaces_fields_but_keeps_id() {
        let store = InMemoryMovieStore::new();
        let created = store.create(&new_movie("Dune")).await.unwrap();

        let updated = store
            .update_by_id(created.id, &new_movie("Dune: Part Two"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.title, "Dune: Part Two");
        assert_eq!(store.find_by_id(created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_missing_ids() {
        let store = InMemoryMovieStore::new();
        let id = Uuid::new_v4();

        assert!(store.find_by_id(id).await.unwrap().is_none());
        assert!(store.update_by_id(id, &new_movie("Dune")).await.unwrap().is_none());
        assert!(store.delete_by_id(id).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_delete_returns_removed_record() {
        let store = InMemoryMovieStore::new();
        let created = store.create(&new_movie("Dune")).await.unwrap();

        assert_eq!(store.delete_by_id(created.id).await.unwrap(), Some(created));
        assert_eq!(store.len().await, 0);
    }
}
