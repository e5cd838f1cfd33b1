//! Fan-out of the variation requests and parsing of the results.

use std::future::Future;

use futures::future::try_join_all;
use log::{debug, info, warn};
use rand::seq::SliceRandom;
use serde_json::Value;

use crate::activity::{GeneratedActivity, UserInputs};
use crate::prompt::build_requests;
use crate::Result;

/// The generative-model boundary: produce structured text for a prompt,
/// constrained to `schema`.
pub trait ContentGenerator {
    fn generate(&self, prompt: &str, schema: &Value) -> impl Future<Output = Result<String>> + Send;
}

/// Request every variation concurrently and parse the answers.
///
/// All requests are polled together on the current task; the first failure
/// aborts the batch. A body that does not parse as the requested payload
/// fails the whole batch with `Error::InvalidResponse`, even if the other
/// variations were fine. Results are returned in variation order.
pub async fn generate_activities<G>(generator: &G, inputs: &UserInputs) -> Result<Vec<GeneratedActivity>>
where
    G: ContentGenerator + Sync,
{
    let requests = build_requests(inputs)?;
    info!(
        "requesting {} variations of {} on theme {:?}",
        requests.len(),
        inputs.activity_type.key(),
        inputs.theme
    );

    let calls = requests
        .iter()
        .map(|req| generator.generate(&req.prompt, &req.schema));
    let bodies = try_join_all(calls).await?;

    bodies
        .iter()
        .zip(&requests)
        .map(|(body, req)| {
            debug!("variation {} returned {} bytes", req.variation, body.len());
            GeneratedActivity::from_model_json(inputs.activity_type, body).map_err(|e| {
                warn!("variation {} is not valid structured data: {}", req.variation, body);
                e
            })
        })
        .collect()
}

const FUN_FACTS: &[&str] = &[
    "Criando uma cruzadinha única...",
    "Ligando os pontos para revelar uma surpresa...",
    "Escondendo palavras para uma caça super divertida...",
    "Acordando os robôs criativos...",
    "Misturando cores que só existem na imaginação...",
    "Ensinando o computador a desenhar um unicórnio...",
    "Procurando as palavras mais bobas para esconder...",
];

/// A random progress line to show while generation runs.
pub fn fun_fact() -> &'static str {
    FUN_FACTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(FUN_FACTS[0])
}
