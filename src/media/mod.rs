use serde::Serialize;

/// Structured result of parsing one media file name stem.
///
/// Every field is a plain string with the empty string meaning "absent".
/// `season` and `episode` are either both empty or both two zero-padded
/// digits, and `episode_title` is only ever set alongside them. A record is
/// fully populated by one parse pass and never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MediaRecord {
    /// Dominant token delimiter chosen for the file name; empty when the
    /// name had no internal structure.
    pub separator: String,
    pub title: String,
    pub year: String,
    pub season: String,
    pub episode: String,
    pub episode_title: String,
}

impl MediaRecord {
    /// Final display name, e.g. `Title (2019) - s01e02 - Pilot`.
    pub fn display_name(&self) -> String {
        if self.title.is_empty() {
            return String::new();
        }

        if self.season.is_empty() {
            if self.year.is_empty() {
                return self.title.clone();
            }
            return format!("{} ({})", self.title, self.year);
        }

        if self.episode_title.is_empty() {
            if self.year.is_empty() {
                return format!("{} - s{}e{}", self.title, self.season, self.episode);
            }
            return format!(
                "{} ({}) - s{}e{}",
                self.title, self.year, self.season, self.episode
            );
        }

        if self.year.is_empty() {
            return format!(
                "{} - s{}e{} - {}",
                self.title, self.season, self.episode, self.episode_title
            );
        }

        format!(
            "{} ({}) - s{}e{} - {}",
            self.title, self.year, self.season, self.episode, self.episode_title
        )
    }

    /// Name of the movie or series folder, e.g. `Title (2019)`.
    pub fn collection_dir(&self) -> String {
        if self.title.is_empty() {
            return String::new();
        }

        if self.year.is_empty() {
            return self.title.clone();
        }

        format!("{} ({})", self.title, self.year)
    }

    /// Name of the season folder, e.g. `Season 01`; empty for movies and
    /// for records with no title.
    pub fn season_dir(&self) -> String {
        if self.title.is_empty() || self.season.is_empty() {
            return String::new();
        }

        format!("Season {}", self.season)
    }
}
