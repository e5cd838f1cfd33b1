//! Prompt and response-schema construction for each activity kind.
//!
//! Schemas use the model API's OpenAPI subset (`OBJECT`, `ARRAY`, `STRING`,
//! `INTEGER`, `NUMBER`) so the model is constrained to return exactly the
//! payload shape `GeneratedActivity::from_model_json` expects.

use serde_json::{json, Value};

use crate::activity::{ActivityType, UserInputs, VARIATIONS};
use crate::{Error, Result};

/// A fully built request for one variation
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub variation: u8,
    pub prompt: String,
    pub schema: Value,
}

/// Build the instruction text for `variation` (1-based, at most `VARIATIONS`).
pub fn build_prompt(inputs: &UserInputs, variation: u8) -> Result<String> {
    if variation == 0 || variation > VARIATIONS {
        return Err(Error::ConfigError(format!(
            "variation must be between 1 and {}, got {}",
            VARIATIONS, variation
        )));
    }

    let base = format!(
        "Generate a children's educational activity. Language: {}. Age band: {}. Theme: \"{}\". Activity: {}.",
        inputs.language,
        inputs.age_band,
        inputs.theme,
        inputs.activity_type.label()
    );
    let details = match inputs.activity_type {
        ActivityType::ConnectTheDots => {
            "The drawing must be a simple, recognizable object related to the theme. \
             Use between 15 and 30 points, in drawing order, with coordinates inside a 100x100 grid."
        }
        ActivityType::Crossword => {
            "Build a simple crossword with 5 to 8 words. Give each answer a 0-based starting row \
             and column and a direction of 'across' or 'down'. Keep the clues age-appropriate."
        }
        ActivityType::WordSearch => {
            "Build a word-search grid. Hide 6 to 8 words horizontally, vertically or diagonally. \
             All words and letters must be uppercase."
        }
        ActivityType::Quiz => {
            "Write a short quiz with 5 simple multiple-choice questions about the theme. \
             Give 4 options per question; the correct answer must be one of the options."
        }
    };
    let variation_note = format!(
        "This is variation {} of {}; make it clearly different from the others.",
        variation, VARIATIONS
    );

    Ok(format!("{} {} {}", base, details, variation_note))
}

/// Response schema for `activity_type`.
pub fn response_schema(activity_type: ActivityType) -> Value {
    match activity_type {
        ActivityType::ConnectTheDots => json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING", "description": "A child-friendly title for the drawing." },
                "points": {
                    "type": "ARRAY",
                    "description": "Points {x, y} between 0 and 100, in drawing order.",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "x": { "type": "NUMBER" },
                            "y": { "type": "NUMBER" }
                        },
                        "required": ["x", "y"]
                    }
                }
            },
            "required": ["title", "points"]
        }),
        ActivityType::Crossword => json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING", "description": "A title for the crossword." },
                "gridSize": { "type": "INTEGER", "description": "Side of the square grid (10 for 10x10)." },
                "clues": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "num": { "type": "INTEGER", "description": "Clue number shown on the grid." },
                            "clue": { "type": "STRING" },
                            "answer": { "type": "STRING" },
                            "row": { "type": "INTEGER", "description": "Starting row (0-based)." },
                            "col": { "type": "INTEGER", "description": "Starting column (0-based)." },
                            "direction": { "type": "STRING", "description": "'across' or 'down'." }
                        },
                        "required": ["num", "clue", "answer", "row", "col", "direction"]
                    }
                }
            },
            "required": ["title", "gridSize", "clues"]
        }),
        ActivityType::WordSearch => json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING", "description": "A title for the word search." },
                "gridSize": { "type": "INTEGER", "description": "Side of the square grid (10 for 10x10)." },
                "grid": {
                    "type": "ARRAY",
                    "description": "Rows of single uppercase letters.",
                    "items": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "words": {
                    "type": "ARRAY",
                    "description": "The hidden words.",
                    "items": { "type": "STRING" }
                }
            },
            "required": ["title", "gridSize", "grid", "words"]
        }),
        ActivityType::Quiz => json!({
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING", "description": "A title for the quiz." },
                "questions": {
                    "type": "ARRAY",
                    "description": "5 multiple-choice questions.",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "question": { "type": "STRING" },
                            "options": {
                                "type": "ARRAY",
                                "description": "4 answer options.",
                                "items": { "type": "STRING" }
                            },
                            "answer": { "type": "STRING", "description": "The correct option, verbatim." }
                        },
                        "required": ["question", "options", "answer"]
                    }
                }
            },
            "required": ["title", "questions"]
        }),
    }
}

/// Build all variation requests for one submission, in variation order.
pub fn build_requests(inputs: &UserInputs) -> Result<Vec<GenerationRequest>> {
    let schema = response_schema(inputs.activity_type);
    (1..=VARIATIONS)
        .map(|variation| {
            Ok(GenerationRequest {
                variation,
                prompt: build_prompt(inputs, variation)?,
                schema: schema.clone(),
            })
        })
        .collect()
}
