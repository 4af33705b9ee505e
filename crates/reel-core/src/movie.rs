//! Movie catalog records as returned by the discover and search endpoints.

use serde::{Deserialize, Serialize};

use crate::config::TmdbConfig;

/// Fallback shown when the catalog flags a failure without saying why.
pub const FALLBACK_ERROR: &str = "Failed to fetch movies";

/// One catalog entry. Only the fields the UI renders are kept; everything
/// else in the payload is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

impl Movie {
    pub fn poster_url(&self, tmdb: &TmdbConfig) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .map(|p| tmdb.poster_url(p))
    }

    /// Rating with one decimal, or `N/A`.
    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(v) if v > 0.0 => format!("{:.1}", v),
            _ => "N/A".to_string(),
        }
    }

    /// Four-digit release year, or `N/A`.
    pub fn year_label(&self) -> String {
        self.release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| y.len() == 4)
            .map(str::to_string)
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn language_label(&self) -> String {
        self.original_language
            .as_deref()
            .filter(|l| !l.is_empty())
            .unwrap_or("??")
            .to_string()
    }

    /// Public page for this movie on the catalog website.
    pub fn page_url(&self) -> String {
        page_url(self.id)
    }
}

/// Public catalog page for the movie with this id.
pub fn page_url(movie_id: u64) -> String {
    format!("https://www.themoviedb.org/movie/{}", movie_id)
}

/// Response envelope shared by both endpoints.
///
/// `Response`/`Error` are the legacy logical-failure flags; a body with
/// `Response: "False"` is an HTTP success that carries no usable results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MovieResponse {
    #[serde(rename = "Response", default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(rename = "Error", default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub results: Vec<Movie>,
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub total_results: Option<u64>,
}

impl MovieResponse {
    pub fn is_logical_failure(&self) -> bool {
        self.response.as_deref() == Some("False")
    }

    /// Message to show for a logical failure.
    pub fn error_message(&self) -> String {
        self.error
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(FALLBACK_ERROR)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_search_payload() {
        let body = r#"{
            "page": 1,
            "results": [
                {"id": 268, "title": "Batman", "poster_path": "/b.jpg",
                 "release_date": "1989-06-23", "vote_average": 7.2,
                 "original_language": "en", "adult": false, "genre_ids": [14, 28]},
                {"id": 414906, "title": "The Batman", "poster_path": null}
            ],
            "total_pages": 1,
            "total_results": 2
        }"#;
        let resp: MovieResponse = serde_json::from_str(body).unwrap();
        assert!(!resp.is_logical_failure());
        assert_eq!(resp.results.len(), 2);
        assert_eq!(resp.results[0].year_label(), "1989");
        assert_eq!(resp.results[0].rating_label(), "7.2");
        assert_eq!(resp.results[1].poster_path, None);
        assert_eq!(resp.results[1].year_label(), "N/A");
        assert_eq!(resp.results[1].rating_label(), "N/A");
    }

    #[test]
    fn test_logical_failure_flag() {
        let resp: MovieResponse =
            serde_json::from_str(r#"{"Response": "False", "Error": "Too many results."}"#).unwrap();
        assert!(resp.is_logical_failure());
        assert_eq!(resp.error_message(), "Too many results.");
        assert!(resp.results.is_empty());

        let resp: MovieResponse = serde_json::from_str(r#"{"Response": "False"}"#).unwrap();
        assert_eq!(resp.error_message(), FALLBACK_ERROR);

        let resp: MovieResponse = serde_json::from_str(r#"{"Response": "True"}"#).unwrap();
        assert!(!resp.is_logical_failure());
    }

    #[test]
    fn test_poster_url_skips_missing_path() {
        let tmdb = TmdbConfig::default();
        let mut m = Movie {
            id: 1,
            title: "x".into(),
            poster_path: Some("/p.jpg".into()),
            release_date: None,
            vote_average: None,
            original_language: None,
            overview: None,
        };
        assert_eq!(
            m.poster_url(&tmdb).as_deref(),
            Some("https://image.tmdb.org/t/p/w500/p.jpg")
        );
        m.poster_path = Some(String::new());
        assert!(m.poster_url(&tmdb).is_none());
    }
}
