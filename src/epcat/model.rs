use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CharacterStatus {
    Alive,
    Dead,
    // The remote API reports "unknown" in lower case
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for CharacterStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            CharacterStatus::Alive => "Alive",
            CharacterStatus::Dead => "Dead",
            CharacterStatus::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    pub status: CharacterStatus,
    pub species: String,
    pub image: String,
}

/// The server-owned part of an episode, exactly as the remote source reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerEpisode {
    pub id: String,
    pub name: String,
    pub air_date: String,
    #[serde(rename = "episode")]
    pub code: String,
    #[serde(default)]
    pub characters: Vec<Character>,
}

/// A catalog record: server fields plus the user-owned flags.
///
/// Server fields may be overwritten verbatim on refetch. `favorite` and
/// `watched` belong to the user and only change through a flag update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Episode {
    pub id: String,
    pub name: String,
    pub air_date: String,
    pub code: String,
    #[serde(default)]
    pub characters: Vec<Character>,
    #[serde(default)]
    pub favorite: bool,
    #[serde(default)]
    pub watched: bool,
}

impl Episode {
    pub fn from_server(server: ServerEpisode, favorite: bool, watched: bool) -> Self {
        Self {
            id: server.id,
            name: server.name,
            air_date: server.air_date,
            code: server.code,
            characters: server.characters,
            favorite,
            watched,
        }
    }

    pub fn flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Favorite => self.favorite,
            Flag::Watched => self.watched,
        }
    }

    /// Air date for display, e.g. "02, December 2013".
    pub fn formatted_air_date(&self) -> String {
        format_air_date(&self.air_date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Flag {
    Favorite,
    Watched,
}

impl std::fmt::Display for Flag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Flag::Favorite => f.write_str("favorite"),
            Flag::Watched => f.write_str("watched"),
        }
    }
}

/// Aggregate pagination data reported alongside every fetched page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PageInfo {
    pub total_pages: u32,
    pub total_records: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

const REMOTE_DATE_FORMAT: &str = "%B %d, %Y";
const DISPLAY_DATE_FORMAT: &str = "%d, %B %Y";

/// Reformat a remote air date ("December 2, 2013") for display.
/// Strings that do not parse are returned unchanged.
pub fn format_air_date(raw: &str) -> String {
    match NaiveDate::parse_from_str(raw.trim(), REMOTE_DATE_FORMAT) {
        Ok(date) => date.format(DISPLAY_DATE_FORMAT).to_string(),
        Err(_) => raw.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercase_unknown_status_decodes() {
        let c: Character = serde_json::from_str(
            r#"{"id":"7","name":"Abradolf Lincler","status":"unknown","species":"Human","image":"x"}"#,
        )
        .unwrap();
        assert_eq!(c.status, CharacterStatus::Unknown);

        let c: Character = serde_json::from_str(
            r#"{"id":"1","name":"Rick","status":"Alive","species":"Human","image":"x"}"#,
        )
        .unwrap();
        assert_eq!(c.status, CharacterStatus::Alive);
    }

    #[test]
    fn server_episode_reads_wire_code_field() {
        let ep: ServerEpisode = serde_json::from_str(
            r#"{"id":"1","name":"Pilot","air_date":"December 2, 2013","episode":"S01E01","characters":[]}"#,
        )
        .unwrap();
        assert_eq!(ep.code, "S01E01");
    }

    #[test]
    fn episode_flags_default_to_false_when_missing() {
        let ep: Episode = serde_json::from_str(
            r#"{"id":"1","name":"Pilot","air_date":"December 2, 2013","code":"S01E01"}"#,
        )
        .unwrap();
        assert!(!ep.favorite);
        assert!(!ep.watched);
        assert!(ep.characters.is_empty());
    }

    #[test]
    fn formats_remote_air_dates() {
        assert_eq!(format_air_date("December 2, 2013"), "02, December 2013");
        assert_eq!(format_air_date("April 7, 2014"), "07, April 2014");
    }

    #[test]
    fn keeps_unparseable_air_dates() {
        assert_eq!(format_air_date("sometime in 2013"), "sometime in 2013");
        assert_eq!(format_air_date(""), "");
    }
}
