use serde::{Deserialize, Serialize};

use super::genre::Genre;

/// Longest keyword kept; extra characters are dropped.
pub const MAX_KEYWORD_CHARS: usize = 200;

/// A genre plus an optional keyword. Blank keywords are stored as absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    genre: Genre,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    keyword: Option<String>,
}

impl GenerationRequest {
    pub fn new(genre: Genre, keyword: Option<String>) -> Self {
        Self {
            genre,
            keyword: keyword
                .filter(|keyword| !keyword.trim().is_empty())
                .map(|keyword| keyword.chars().take(MAX_KEYWORD_CHARS).collect()),
        }
    }

    pub fn genre(&self) -> Genre {
        self.genre
    }

    pub fn keyword(&self) -> Option<&str> {
        self.keyword
            .as_deref()
            .filter(|keyword| !keyword.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keywords_are_dropped() {
        let request = GenerationRequest::new(Genre::Horror, Some("  ".to_string()));
        assert_eq!(request.keyword(), None);
        let request = GenerationRequest::new(Genre::Horror, Some(String::new()));
        assert_eq!(request.keyword(), None);
    }

    #[test]
    fn keyword_is_kept_verbatim() {
        let request = GenerationRequest::new(Genre::Horror, Some(" old mill ".to_string()));
        assert_eq!(request.keyword(), Some(" old mill "));
    }

    #[test]
    fn overlong_keyword_is_cut() {
        let request = GenerationRequest::new(Genre::Horror, Some("k".repeat(3500)));
        assert_eq!(request.keyword(), Some("k".repeat(MAX_KEYWORD_CHARS).as_str()));
    }

    #[test]
    fn blank_keyword_from_json_reads_as_absent() {
        let request: GenerationRequest =
            serde_json::from_str(r#"{"genre":"Fantasy","keyword":" "}"#).unwrap();
        assert_eq!(request.genre(), Genre::Fantasy);
        assert_eq!(request.keyword(), None);
    }
}
