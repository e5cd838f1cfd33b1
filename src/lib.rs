//! Booklet Studio
//!
//! Generates printable children's activity booklets with a generative
//! model and exports them as a single PDF.
//!
//! A submission asks the model for three variations of one activity kind
//! (connect-the-dots, crossword, word search or quiz) on a theme, prepends
//! a personalized cover, lays every page out as an SVG surface and, with the
//! `export` feature, rasterizes the pages into a portrait PDF.
//!
//! # Features
//!
//! - **Structured generation**: every request carries a response schema, and
//!   the answers are parsed into typed payloads
//! - **Offline re-rendering**: a generated session can be saved as JSON and
//!   rendered again without the model
//! - **Pluggable seams**: the model (`ContentGenerator`), rasterizer and PDF
//!   assembler are traits, so tests run against fakes
//!
//! # Example
//!
//! ```no_run
//! use booklet_studio::{ActivityType, GeminiClient, GeneratorConfig, UserInputs};
//!
//! # async fn run() -> booklet_studio::Result<()> {
//! let client = GeminiClient::new(&GeneratorConfig::from_env())?;
//! let inputs = UserInputs {
//!     theme: "Dinosaurs".to_string(),
//!     recipient_name: "Turma A".to_string(),
//!     activity_type: ActivityType::Quiz,
//!     ..Default::default()
//! };
//! let booklet = booklet_studio::generate_booklet(&client, inputs).await?;
//! let surfaces = booklet_studio::rendering::render_booklet(&booklet.pages());
//! assert_eq!(surfaces.len(), 4);
//! # Ok(())
//! # }
//! ```

use std::path::PathBuf;

pub mod error;
pub use error::{Error, Result};

pub mod activity;
pub mod assemble;
pub mod controller;
pub mod export;
pub mod form;
pub mod gemini;
pub mod generation;
pub mod prompt;

// Page layout and SVG surfaces; rasterization lives behind `export`
pub mod rendering;

pub use activity::{ActivityType, Booklet, GeneratedActivity, PrintablePage, UserInputs};
pub use controller::{Controller, Phase};
pub use gemini::GeminiClient;
pub use generation::{generate_activities, ContentGenerator};

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Gemini REST root; the model path is joined onto it.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";

/// Configuration for the model client
///
/// The credential is always passed in explicitly. `GeneratorConfig::from_env`
/// exists for binaries; the client itself never reads the environment.
///
/// # Examples
///
/// ```
/// let cfg = booklet_studio::GeneratorConfig::default();
/// assert!(cfg.api_key.is_none());
/// assert_eq!(cfg.model, "gemini-2.5-flash");
/// ```
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: Option<String>,
    /// Model name, e.g. `gemini-2.5-flash`
    pub model: String,
    /// REST root ending in `/`; tests point this at a local mock
    pub base_url: String,
    /// Per-request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 60000,
        }
    }
}

impl GeneratorConfig {
    /// Defaults plus the key from `API_KEY`, falling back to `GEMINI_API_KEY`.
    pub fn from_env() -> Self {
        let api_key = ["API_KEY", "GEMINI_API_KEY"]
            .iter()
            .filter_map(|name| std::env::var(name).ok())
            .find(|v| !v.trim().is_empty());
        Self { api_key, ..Default::default() }
    }
}

/// Configuration for PDF export
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Capture scale relative to the page surface (2.0 = double resolution)
    pub scale: f32,
    /// Output page width in PDF points (A4 portrait)
    pub page_width_pt: f64,
    /// Output page height in PDF points
    pub page_height_pt: f64,
    /// Default output file name
    pub file_name: String,
    /// Font files loaded in addition to the system fonts
    pub extra_fonts: Vec<PathBuf>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            scale: 2.0,
            page_width_pt: 595.28,
            page_height_pt: 841.89,
            file_name: "activity-booklet.pdf".to_string(),
            extra_fonts: Vec::new(),
        }
    }
}

/// Validate `inputs`, generate all variations and keep them with the inputs
/// that produced them.
pub async fn generate_booklet<G>(generator: &G, inputs: UserInputs) -> Result<Booklet>
where
    G: ContentGenerator + Sync,
{
    inputs.validate()?;
    let activities = generate_activities(generator, &inputs).await?;
    Ok(Booklet { inputs, activities })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_generator_config() {
        let config = GeneratorConfig::default();
        assert!(config.api_key.is_none());
        assert!(config.base_url.ends_with('/'));
        assert_eq!(config.timeout_ms, 60000);
    }

    #[test]
    fn test_default_export_config() {
        let config = ExportConfig::default();
        assert_eq!(config.scale, 2.0);
        assert_eq!(config.file_name, "activity-booklet.pdf");
        assert!(config.page_height_pt > config.page_width_pt);
    }
}
