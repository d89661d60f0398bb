//! Input validation for movie payloads
//!
//! Checks run in a fixed order and stop at the first failure, so a payload
//! with several problems always reports the same one.

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;
use thiserror::Error;

use crate::models::{MovieInput, NewMovie};

/// Reasons a movie payload is rejected; the message is shown to the client
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,

    #[error("Rating must be a number between 0 and 10.")]
    InvalidRating,

    #[error("Release date must be in YYYY-MM-DD format.")]
    InvalidDateFormat,

    #[error("Release date must be a valid date.")]
    InvalidDate,

    #[error("Duration must be a number.")]
    InvalidDuration,
}

fn release_date_regex() -> &'static Regex {
    static RELEASE_DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    RELEASE_DATE_REGEX.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Failed to compile release date regex")
    })
}

fn required_text(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.trim().is_empty())
}

/// Validate a rating value
pub fn validate_rating(rating: &Value) -> Result<f64, ValidationError> {
    rating
        .as_f64()
        .filter(|rating| (0.0..=10.0).contains(rating))
        .ok_or(ValidationError::InvalidRating)
}

/// Validate a release date, format first and calendar validity second
pub fn validate_release_date(release_date: &str) -> Result<NaiveDate, ValidationError> {
    if !release_date_regex().is_match(release_date) {
        return Err(ValidationError::InvalidDateFormat);
    }

    NaiveDate::parse_from_str(release_date, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate)
}

/// Validate a movie payload
pub fn validate_movie(input: &MovieInput) -> Result<NewMovie, ValidationError> {
    let (Some(title), Some(director), Some(release_date), Some(genre), Some(rating), Some(duration)) = (
        required_text(&input.title),
        required_text(&input.director),
        required_text(&input.release_date),
        required_text(&input.genre),
        input.rating.as_ref(),
        input.duration.as_ref(),
    ) else {
        return Err(ValidationError::MissingFields);
    };

    let rating = validate_rating(rating)?;
    let release_date = validate_release_date(release_date)?;
    let duration = duration.as_f64().ok_or(ValidationError::InvalidDuration)?;

    Ok(NewMovie {
        title: title.to_string(),
        director: director.to_string(),
        release_date,
        genre: genre.to_string(),
        rating,
        duration,
    })
}
