use serde::{Deserialize, Serialize};

/// TMDB movie identifier, unique within the catalog
pub type MovieId = u64;

/// A movie record as returned by the catalog, before ranking
///
/// TV discovery results name their fields differently (`name`,
/// `first_air_date`); the aliases let both shapes share this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CandidateMovie {
    pub id: MovieId,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default, alias = "first_air_date")]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

impl CandidateMovie {
    /// Minimal constructor, mostly for tests and fakes
    pub fn new(id: MovieId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            overview: None,
            release_date: None,
            vote_average: 0.0,
            vote_count: 0,
            poster_path: None,
            popularity: 0.0,
        }
    }

    pub fn with_overview(mut self, overview: impl Into<String>) -> Self {
        self.overview = Some(overview.into());
        self
    }

    pub fn with_release_date(mut self, release_date: impl Into<String>) -> Self {
        self.release_date = Some(release_date.into());
        self
    }

    pub fn with_vote_average(mut self, vote_average: f64) -> Self {
        self.vote_average = vote_average;
        self
    }
}

/// One page of a discovery query
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiscoverPage {
    #[serde(default)]
    pub results: Vec<CandidateMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

/// A catalog keyword, used to expand free text into discovery filters
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Keyword {
    pub id: u64,
    #[serde(default)]
    pub name: String,
}

/// Catalog media type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Tv,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Tv => "tv",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "movie" => Some(ContentType::Movie),
            "tv" => Some(ContentType::Tv),
            _ => None,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_deserialization() {
        let json = r#"{
            "id": 808,
            "title": "Shrek",
            "overview": "It ain't easy bein' green",
            "release_date": "2001-05-18",
            "vote_average": 7.7,
            "vote_count": 17000,
            "poster_path": "/iB64vpL3dIObOtMZgX3RqdVdQDc.jpg",
            "popularity": 120.5,
            "genre_ids": [16, 35]
        }"#;

        let movie: CandidateMovie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 808);
        assert_eq!(movie.title, "Shrek");
        assert_eq!(movie.release_date.as_deref(), Some("2001-05-18"));
        assert_eq!(movie.vote_count, 17000);
    }

    #[test]
    fn test_tv_result_uses_aliases() {
        let json = r#"{ "id": 1399, "name": "Game of Thrones", "first_air_date": "2011-04-17" }"#;

        let show: CandidateMovie = serde_json::from_str(json).unwrap();
        assert_eq!(show.title, "Game of Thrones");
        assert_eq!(show.release_date.as_deref(), Some("2011-04-17"));
        assert_eq!(show.vote_average, 0.0);
        assert_eq!(show.overview, None);
    }

    #[test]
    fn test_discover_page_defaults() {
        let page: DiscoverPage = serde_json::from_str(r#"{ "page": 1 }"#).unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.total_pages, 0);
    }

    #[test]
    fn test_content_type_parse() {
        assert_eq!(ContentType::parse("movie"), Some(ContentType::Movie));
        assert_eq!(ContentType::parse("tv"), Some(ContentType::Tv));
        assert_eq!(ContentType::parse("anime"), None);
    }
}
