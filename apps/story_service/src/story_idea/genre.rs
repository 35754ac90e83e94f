use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::core::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Genre {
    ScienceFiction,
    Fantasy,
    Mystery,
    Thriller,
    Horror,
    Romance,
    HistoricalFiction,
    Comedy,
    Adventure,
    Dystopian,
    Cyberpunk,
    Steampunk,
}

impl Genre {
    /// Display order of the selector; the first entry is the default.
    pub const ALL: [Genre; 12] = [
        Genre::ScienceFiction,
        Genre::Fantasy,
        Genre::Mystery,
        Genre::Thriller,
        Genre::Horror,
        Genre::Romance,
        Genre::HistoricalFiction,
        Genre::Comedy,
        Genre::Adventure,
        Genre::Dystopian,
        Genre::Cyberpunk,
        Genre::Steampunk,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Genre::ScienceFiction => "Science Fiction",
            Genre::Fantasy => "Fantasy",
            Genre::Mystery => "Mystery",
            Genre::Thriller => "Thriller",
            Genre::Horror => "Horror",
            Genre::Romance => "Romance",
            Genre::HistoricalFiction => "Historical Fiction",
            Genre::Comedy => "Comedy",
            Genre::Adventure => "Adventure",
            Genre::Dystopian => "Dystopian",
            Genre::Cyberpunk => "Cyberpunk",
            Genre::Steampunk => "Steampunk",
        }
    }
}

impl Default for Genre {
    fn default() -> Self {
        Genre::ALL[0]
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Genre {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Genre::ALL
            .into_iter()
            .find(|genre| genre.name() == wanted)
            .ok_or_else(|| AppError::InvalidGenre(wanted.to_string()))
    }
}

impl TryFrom<String> for Genre {
    type Error = AppError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        genre.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twelve_genres_parse_from_their_names() {
        assert_eq!(Genre::ALL.len(), 12);
        for genre in Genre::ALL {
            assert_eq!(genre.name().parse::<Genre>().unwrap(), genre);
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(" Mystery ".parse::<Genre>().unwrap(), Genre::Mystery);
    }

    #[test]
    fn unknown_and_empty_names_are_rejected() {
        assert!(matches!("Western".parse::<Genre>(), Err(AppError::InvalidGenre(_))));
        assert!("".parse::<Genre>().is_err());
        assert!("mystery".parse::<Genre>().is_err());
    }

    #[test]
    fn serializes_as_display_name() {
        let json = serde_json::to_string(&Genre::HistoricalFiction).unwrap();
        assert_eq!(json, "\"Historical Fiction\"");
        let back: Genre = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Genre::HistoricalFiction);
    }
}
