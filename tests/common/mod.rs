//! Shared Gemini mock for the integration tests

#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};

use booklet_studio::{ActivityType, GeneratorConfig, UserInputs};
use serde_json::{json, Value};
use tiny_http::{Header, Response, Server};

#[derive(Debug, Clone)]
pub struct Seen {
    pub url: String,
    pub api_key: Option<String>,
    pub body: Value,
}

/// Serve every request with `status` and `reply(request_index)` as the
/// candidate text. Returns the base URL and the recorded requests.
pub fn start_mock<F>(status: u16, reply: F) -> (String, Arc<Mutex<Vec<Seen>>>)
where
    F: Fn(usize) -> String + Send + 'static,
{
    let server = Server::http("127.0.0.1:0").unwrap();
    let base = format!("http://{}/v1beta/", server.server_addr());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = seen.clone();

    std::thread::spawn(move || {
        for (i, mut request) in server.incoming_requests().enumerate() {
            let mut raw = String::new();
            let _ = request.as_reader().read_to_string(&mut raw);
            let api_key = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("x-goog-api-key"))
                .map(|h| h.value.to_string());
            log.lock().unwrap().push(Seen {
                url: request.url().to_string(),
                api_key,
                body: serde_json::from_str(&raw).unwrap_or(Value::Null),
            });

            let envelope = json!({
                "candidates": [{ "content": { "role": "model", "parts": [{ "text": reply(i) }] } }]
            });
            let resp = Response::from_string(envelope.to_string())
                .with_status_code(status)
                .with_header("Content-Type: application/json".parse::<Header>().unwrap());
            let _ = request.respond(resp);
        }
    });

    (base, seen)
}

pub fn config(base_url: String) -> GeneratorConfig {
    GeneratorConfig {
        api_key: Some("test-key".to_string()),
        base_url,
        timeout_ms: 5000,
        ..Default::default()
    }
}

pub fn dinosaur_quiz() -> UserInputs {
    UserInputs {
        theme: "Dinosaurs".to_string(),
        recipient_name: "Turma A".to_string(),
        activity_type: ActivityType::Quiz,
        ..Default::default()
    }
}

pub fn quiz_json(i: usize) -> String {
    json!({
        "type": "CROSSWORD",
        "title": format!("Dino Quiz {}", i + 1),
        "questions": [
            { "question": "Which dinosaur had three horns?", "options": ["T-Rex", "Triceratops"], "answer": "Triceratops" }
        ]
    })
    .to_string()
}
