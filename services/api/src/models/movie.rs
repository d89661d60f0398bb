//! Movie models for the API service

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use uuid::Uuid;

/// Persisted movie record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub id: Uuid,
    pub title: String,
    pub director: String,
    pub release_date: NaiveDate,
    pub genre: String,
    #[serde(serialize_with = "serialize_number")]
    pub rating: f64,
    #[serde(serialize_with = "serialize_number")]
    pub duration: f64,
}

/// Largest magnitude below which every whole `f64` is an exact integer
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Write whole numbers without a fractional part, as clients send them
fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Inbound movie payload, as sent by the client
///
/// Every field is optional here so that absence is reported by validation
/// rather than by the JSON extractor. `rating` and `duration` stay raw JSON
/// so that a non-numeric value gets its own validation message.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieInput {
    pub title: Option<String>,
    pub director: Option<String>,
    pub release_date: Option<String>,
    pub genre: Option<String>,
    pub rating: Option<serde_json::Value>,
    pub duration: Option<serde_json::Value>,
}

/// Validated movie fields, ready to be written to a store
#[derive(Debug, Clone, PartialEq)]
pub struct NewMovie {
    pub title: String,
    pub director: String,
    pub release_date: NaiveDate,
    pub genre: String,
    pub rating: f64,
    pub duration: f64,
}

impl NewMovie {
    /// Attach an identifier, producing the stored representation
    pub fn into_movie(self, id: Uuid) -> Movie {
        Movie {
            id,
            title: self.title,
            director: self.director,
            release_date: self.release_date,
            genre: self.genre,
            rating: self.rating,
            duration: self.duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_movie_serializes_with_camel_case_and_iso_date() {
        let movie = Movie {
            id: Uuid::nil(),
            title: "Dune".to_string(),
            director: "Villeneuve".to_string(),
            release_date: NaiveDate::from_ymd_opt(2021, 10, 22).unwrap(),
            genre: "Sci-Fi".to_string(),
            rating: 8.5,
            duration: 155.0,
        };

        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["releaseDate"], json!("2021-10-22"));
        assert_eq!(value["id"], json!("00000000-0000-0000-0000-000000000000"));
        assert_eq!(value["rating"], json!(8.5));
        assert_eq!(value["duration"], json!(155));
        assert!(value.get("release_date").is_none());
    }

    #[test]
    fn test_whole_numbers_round_trip_through_json() {
        let raw = r#"{"id":"00000000-0000-0000-0000-000000000000","title":"Dune","director":"Villeneuve","releaseDate":"2021-10-22","genre":"Sci-Fi","rating":0,"duration":155.5}"#;
        let movie: Movie = serde_json::from_str(raw).unwrap();
        assert_eq!(movie.rating, 0.0);

        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(value["rating"], json!(0));
        assert_eq!(value["duration"], json!(155.5));
    }

    #[test]
    fn test_input_treats_null_as_absent() {
        let input: MovieInput =
            serde_json::from_value(json!({"title": "Dune", "rating": null, "duration": 0}))
                .unwrap();

        assert_eq!(input.title.as_deref(), Some("Dune"));
        assert!(input.rating.is_none());
        assert_eq!(input.duration, Some(json!(0)));
        assert!(input.director.is_none());
    }
}
