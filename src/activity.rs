//! Activity data model
//!
//! The booklet is built from four closed activity kinds. Every generated
//! record is tagged with the kind the user asked for; the tag never comes
//! from the model's own output.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Languages offered by the form, in menu order.
pub const LANGUAGES: &[&str] = &[
    "Português",
    "Inglês",
    "Espanhol",
    "Francês",
    "Alemão",
    "Italiano",
    "Holandês",
    "Mandarim",
    "Japonês",
    "Coreano",
];

/// Age bands offered by the form, in menu order.
pub const AGE_BANDS: &[&str] = &[
    "3-4 anos",
    "5-6 anos",
    "7-8 anos",
    "9-10 anos",
    "11-12 anos",
    "Ensino Médio",
];

/// Number of variations requested per submission.
pub const VARIATIONS: u8 = 3;

/// The four kinds of activity a booklet can contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    ConnectTheDots,
    Crossword,
    WordSearch,
    Quiz,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [
        ActivityType::ConnectTheDots,
        ActivityType::Crossword,
        ActivityType::WordSearch,
        ActivityType::Quiz,
    ];

    /// Stable key used in saved booklets
    pub fn key(&self) -> &'static str {
        match self {
            ActivityType::ConnectTheDots => "CONNECT_THE_DOTS",
            ActivityType::Crossword => "CROSSWORD",
            ActivityType::WordSearch => "WORD_SEARCH",
            ActivityType::Quiz => "QUIZ",
        }
    }

    /// Label shown in menus and embedded in prompts
    pub fn label(&self) -> &'static str {
        match self {
            ActivityType::ConnectTheDots => "Ligue os Pontos",
            ActivityType::Crossword => "Cruzadinha",
            ActivityType::WordSearch => "Caça-palavras",
            ActivityType::Quiz => "Provinha",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ActivityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        ActivityType::ALL
            .into_iter()
            .find(|t| {
                t.key().eq_ignore_ascii_case(wanted)
                    || t.label() == wanted
                    || t.key().replace('_', "-").eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| Error::ConfigError(format!("unknown activity type: {}", wanted)))
    }
}

/// Everything the user fills in on the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInputs {
    pub theme: String,
    pub language: String,
    pub age_band: String,
    pub activity_type: ActivityType,
    pub recipient_name: String,
}

impl Default for UserInputs {
    fn default() -> Self {
        Self {
            theme: String::new(),
            language: LANGUAGES[0].to_string(),
            age_band: AGE_BANDS[1].to_string(),
            activity_type: ActivityType::ConnectTheDots,
            recipient_name: String::new(),
        }
    }
}

impl UserInputs {
    /// Check the closed lists and required free-text fields.
    pub fn validate(&self) -> Result<()> {
        if self.theme.trim().is_empty() {
            return Err(Error::ConfigError("theme is required".into()));
        }
        if self.recipient_name.trim().is_empty() {
            return Err(Error::ConfigError("recipient name is required".into()));
        }
        if !LANGUAGES.contains(&self.language.as_str()) {
            return Err(Error::ConfigError(format!(
                "unsupported language: {}",
                self.language
            )));
        }
        if !AGE_BANDS.contains(&self.age_band.as_str()) {
            return Err(Error::ConfigError(format!(
                "unsupported age band: {}",
                self.age_band
            )));
        }
        Ok(())
    }
}

/// A point on the 0..=100 drawing plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectTheDotsData {
    pub title: String,
    pub points: Vec<Point>,
}

/// Direction a crossword answer runs from its starting cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Direction {
    Across,
    Down,
}

impl From<String> for Direction {
    fn from(s: String) -> Self {
        if s.trim().eq_ignore_ascii_case("across") {
            Direction::Across
        } else {
            Direction::Down
        }
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> Self {
        match d {
            Direction::Across => "across".to_string(),
            Direction::Down => "down".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosswordClue {
    pub num: i64,
    pub clue: String,
    pub answer: String,
    pub row: i64,
    pub col: i64,
    pub direction: Direction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrosswordData {
    pub title: String,
    pub grid_size: i64,
    pub clues: Vec<CrosswordClue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WordSearchData {
    pub title: String,
    pub grid_size: i64,
    pub grid: Vec<Vec<String>>,
    pub words: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizData {
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}

/// One generated activity, tagged by kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeneratedActivity {
    ConnectTheDots(ConnectTheDotsData),
    Crossword(CrosswordData),
    WordSearch(WordSearchData),
    Quiz(QuizData),
}

impl GeneratedActivity {
    /// Parse a model body as the payload of `activity_type`.
    ///
    /// Any `type` field the model emits is ignored; the variant is chosen
    /// from the requested kind.
    pub fn from_model_json(activity_type: ActivityType, body: &str) -> Result<Self> {
        let invalid = |e: serde_json::Error| Error::InvalidResponse(e.to_string());
        let activity = match activity_type {
            ActivityType::ConnectTheDots => {
                GeneratedActivity::ConnectTheDots(serde_json::from_str(body).map_err(invalid)?)
            }
            ActivityType::Crossword => {
                GeneratedActivity::Crossword(serde_json::from_str(body).map_err(invalid)?)
            }
            ActivityType::WordSearch => {
                GeneratedActivity::WordSearch(serde_json::from_str(body).map_err(invalid)?)
            }
            ActivityType::Quiz => GeneratedActivity::Quiz(serde_json::from_str(body).map_err(invalid)?),
        };
        Ok(activity)
    }

    pub fn activity_type(&self) -> ActivityType {
        match self {
            GeneratedActivity::ConnectTheDots(_) => ActivityType::ConnectTheDots,
            GeneratedActivity::Crossword(_) => ActivityType::Crossword,
            GeneratedActivity::WordSearch(_) => ActivityType::WordSearch,
            GeneratedActivity::Quiz(_) => ActivityType::Quiz,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            GeneratedActivity::ConnectTheDots(d) => &d.title,
            GeneratedActivity::Crossword(d) => &d.title,
            GeneratedActivity::WordSearch(d) => &d.title,
            GeneratedActivity::Quiz(d) => &d.title,
        }
    }
}

/// The synthesized first page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverPage {
    pub recipient_name: String,
    pub theme: String,
}

/// One printable page, in booklet order
#[derive(Debug, Clone, PartialEq)]
pub enum PrintablePage {
    Cover(CoverPage),
    Activity(GeneratedActivity),
}

/// A generated session saved to disk for offline re-rendering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booklet {
    pub inputs: UserInputs,
    pub activities: Vec<GeneratedActivity>,
}

impl Booklet {
    /// Read and validate a saved booklet.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let booklet: Booklet = serde_json::from_str(&text)?;
        booklet.validate()?;
        Ok(booklet)
    }

    /// One activity per variation, all of the requested kind.
    pub fn validate(&self) -> Result<()> {
        self.inputs.validate()?;
        if self.activities.len() != VARIATIONS as usize {
            return Err(Error::ConfigError(format!(
                "booklet must hold {} activities, found {}",
                VARIATIONS,
                self.activities.len()
            )));
        }
        let wanted = self.inputs.activity_type;
        if let Some(other) = self.activities.iter().find(|a| a.activity_type() != wanted) {
            return Err(Error::ConfigError(format!(
                "booklet for {} contains a {} activity",
                wanted.key(),
                other.activity_type().key()
            )));
        }
        Ok(())
    }

    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// The printable sequence: cover, then the activities in order.
    pub fn pages(&self) -> Vec<PrintablePage> {
        crate::assemble::assemble_pages(&self.inputs, self.activities.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn activity_type_parses_keys_labels_and_cli_names() {
        assert_eq!("QUIZ".parse::<ActivityType>().unwrap(), ActivityType::Quiz);
        assert_eq!(
            "Caça-palavras".parse::<ActivityType>().unwrap(),
            ActivityType::WordSearch
        );
        assert_eq!(
            "connect-the-dots".parse::<ActivityType>().unwrap(),
            ActivityType::ConnectTheDots
        );
    }

    #[test]
    fn unknown_activity_type_is_config_error() {
        let err = "Sudoku".parse::<ActivityType>().unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn model_type_field_is_ignored() {
        let body = r#"{"type":"CROSSWORD","title":"Bichos","questions":[]}"#;
        let a = GeneratedActivity::from_model_json(ActivityType::Quiz, body).unwrap();
        assert_eq!(a.activity_type(), ActivityType::Quiz);
        assert_eq!(a.title(), "Bichos");
    }

    #[test]
    fn non_json_body_is_invalid_response() {
        let err = GeneratedActivity::from_model_json(ActivityType::Quiz, "Sure! Here is").unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn direction_is_lenient() {
        let clue: CrosswordClue = serde_json::from_str(
            r#"{"num":1,"clue":"c","answer":"CAT","row":0,"col":0,"direction":"Across"}"#,
        )
        .unwrap();
        assert_eq!(clue.direction, Direction::Across);
        let clue: CrosswordClue = serde_json::from_str(
            r#"{"num":1,"clue":"c","answer":"CAT","row":0,"col":0,"direction":"vertical"}"#,
        )
        .unwrap();
        assert_eq!(clue.direction, Direction::Down);
    }

    #[test]
    fn saved_activity_carries_its_tag() {
        let a = GeneratedActivity::Quiz(QuizData { title: "T".into(), questions: vec![] });
        let v = serde_json::to_value(&a).unwrap();
        assert_eq!(v["type"], "QUIZ");
        let back: GeneratedActivity = serde_json::from_value(v).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn validate_rejects_values_outside_closed_lists() {
        let mut inputs = UserInputs {
            theme: "Dinosaurs".into(),
            recipient_name: "Turma A".into(),
            ..Default::default()
        };
        assert!(inputs.validate().is_ok());
        inputs.language = "Klingon".into();
        assert!(inputs.validate().is_err());
    }

    fn quiz_booklet(n: usize) -> Booklet {
        Booklet {
            inputs: UserInputs {
                theme: "Dinosaurs".into(),
                recipient_name: "Turma A".into(),
                activity_type: ActivityType::Quiz,
                ..Default::default()
            },
            activities: (0..n)
                .map(|i| GeneratedActivity::Quiz(QuizData { title: format!("q{}", i), questions: vec![] }))
                .collect(),
        }
    }

    #[test]
    fn booklet_needs_one_activity_per_variation() {
        assert!(quiz_booklet(3).validate().is_ok());
        assert!(matches!(quiz_booklet(2).validate(), Err(Error::ConfigError(_))));
        assert!(matches!(quiz_booklet(4).validate(), Err(Error::ConfigError(_))));
    }

    #[test]
    fn booklet_rejects_mixed_kinds() {
        let mut b = quiz_booklet(3);
        b.activities[2] = GeneratedActivity::ConnectTheDots(ConnectTheDotsData { title: "x".into(), points: vec![] });
        let err = b.validate().unwrap_err();
        assert!(err.to_string().contains("CONNECT_THE_DOTS"));
    }

    #[test]
    fn booklet_pages_start_with_cover() {
        let pages = quiz_booklet(3).pages();
        assert_eq!(pages.len(), 4);
        assert!(matches!(pages[0], PrintablePage::Cover(_)));
    }

    #[test]
    fn defaults_match_form_defaults() {
        let d = UserInputs::default();
        assert_eq!(d.language, "Português");
        assert_eq!(d.age_band, "5-6 anos");
        assert_eq!(d.activity_type, ActivityType::ConnectTheDots);
    }
}
