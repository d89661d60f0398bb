//! OpenAPI description served at `/api-docs`

use anyhow::{Context, Result};
use serde_json::Value;
use std::path::Path;
use tracing::info;

/// OpenAPI description bundled with the service
pub const BUNDLED_API_DOCS: &str = include_str!("../swagger.yaml");

/// Parse an OpenAPI YAML document into JSON
pub fn parse_api_docs(yaml: &str) -> Result<Value> {
    serde_yaml::from_str(yaml).context("Failed to parse API description")
}

/// Load the API description, from `path` when given, otherwise the bundled one
pub fn load_api_docs(path: Option<&Path>) -> Result<Value> {
    match path {
        Some(path) => {
            info!("Loading API description from {}", path.display());
            let yaml = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            parse_api_docs(&yaml)
        }
        None => parse_api_docs(BUNDLED_API_DOCS),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_docs_describe_movie_routes() {
        let docs = load_api_docs(None).unwrap();
        assert_eq!(docs["openapi"], "3.0.3");
        assert!(docs["paths"]["/movies"]["post"].is_object());
        assert!(docs["paths"]["/movies/{id}"]["delete"].is_object());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        assert!(load_api_docs(Some(Path::new("/nonexistent/swagger.yaml"))).is_err());
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(parse_api_docs("paths: [unclosed").is_err());
    }
}
