//! Movie repository for database operations

use async_trait::async_trait;
use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;
use uuid::Uuid;

use crate::models::{Movie, NewMovie};

/// Persistence operations on the movie collection
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Insert a new movie and return it with its assigned id
    async fn create(&self, movie: &NewMovie) -> DatabaseResult<Movie>;

    /// List every movie in insertion order
    async fn find_all(&self) -> DatabaseResult<Vec<Movie>>;

    /// Find a movie by ID
    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Movie>>;

    /// Replace every field of a movie, returning the updated record
    async fn update_by_id(&self, id: Uuid, movie: &NewMovie) -> DatabaseResult<Option<Movie>>;

    /// Remove a movie, returning the record that was removed
    async fn delete_by_id(&self, id: Uuid) -> DatabaseResult<Option<Movie>>;
}

/// PostgreSQL-backed movie repository
#[derive(Clone)]
pub struct MovieRepository {
    pool: PgPool,
}

impl MovieRepository {
    /// Create a new movie repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> DatabaseResult<()> {
        info!("Running movie schema migrations");

        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| DatabaseError::Migration(e.to_string()))?;

        Ok(())
    }
}

fn movie_from_row(row: &PgRow) -> DatabaseResult<Movie> {
    Ok(Movie {
        id: row.try_get("id").map_err(DatabaseError::Query)?,
        title: row.try_get("title").map_err(DatabaseError::Query)?,
        director: row.try_get("director").map_err(DatabaseError::Query)?,
        release_date: row.try_get("release_date").map_err(DatabaseError::Query)?,
        genre: row.try_get("genre").map_err(DatabaseError::Query)?,
        rating: row.try_get("rating").map_err(DatabaseError::Query)?,
        duration: row.try_get("duration").map_err(DatabaseError::Query)?,
    })
}

#[async_trait]
impl MovieStore for MovieRepository {
    async fn create(&self, movie: &NewMovie) -> DatabaseResult<Movie> {
        info!("Creating movie: {}", movie.title);

        let row = sqlx::query(
            r#"
            INSERT INTO movies (id, title, director, release_date, genre, rating, duration)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, title, director, release_date, genre, rating, duration
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(movie.release_date)
        .bind(&movie.genre)
        .bind(movie.rating)
        .bind(movie.duration)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        movie_from_row(&row)
    }

    async fn find_all(&self) -> DatabaseResult<Vec<Movie>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, director, release_date, genre, rating, duration
            FROM movies
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        rows.iter().map(movie_from_row).collect()
    }

    async fn find_by_id(&self, id: Uuid) -> DatabaseResult<Option<Movie>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, director, release_date, genre, rating, duration
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref().map(movie_from_row).transpose()
    }

    async fn update_by_id(&self, id: Uuid, movie: &NewMovie) -> DatabaseResult<Option<Movie>> {
        info!("Updating movie: {}", id);

        let row = sqlx::query(
            r#"
            UPDATE movies
            SET title = $2, director = $3, release_date = $4, genre = $5,
                rating = $6, duration = $7, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, director, release_date, genre, rating, duration
            "#,
        )
        .bind(id)
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(movie.release_date)
        .bind(&movie.genre)
        .bind(movie.rating)
        .bind(movie.duration)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref().map(movie_from_row).transpose()
    }

    async fn delete_by_id(&self, id: Uuid) -> DatabaseResult<Option<Movie>> {
        info!("Deleting movie: {}", id);

        let row = sqlx::query(
            r#"
            DELETE FROM movies
            WHERE id = $1
            RETURNING id, title, director, release_date, genre, rating, duration
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref().map(movie_from_row).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use common::database::{DatabaseConfig, init_pool};

    #[tokio::test]
    #[ignore = "requires a running PostgreSQL server"]
    async fn test_repository_lifecycle() -> anyhow::Result<()> {
        let pool = init_pool(&DatabaseConfig::from_env()?).await?;
        let repository = MovieRepository::new(pool);
        repository.migrate().await?;

        let new_movie = NewMovie {
            title: "Arrival".to_string(),
            director: "Villeneuve".to_string(),
            release_date: NaiveDate::from_ymd_opt(2016, 11, 11).unwrap(),
            genre: "Sci-Fi".to_string(),
            rating: 7.9,
            duration: 116.0,
        };

        let created = repository.create(&new_movie).await?;
        assert_eq!(created, new_movie.clone().into_movie(created.id));
        assert_eq!(repository.find_by_id(created.id).await?, Some(created.clone()));

        let mut changed = new_movie;
        changed.rating = 8.0;
        let updated = repository.update_by_id(created.id, &changed).await?.unwrap();
        assert_eq!(updated.rating, 8.0);

        assert!(repository.delete_by_id(created.id).await?.is_some());
        assert!(repository.find_by_id(created.id).await?.is_none());
        assert!(repository.delete_by_id(created.id).await?.is_none());
        Ok(())
    }
}
