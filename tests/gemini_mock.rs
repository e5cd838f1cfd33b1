//! Generation against a local mock of the Gemini REST endpoint

mod common;

use std::time::Duration;

use booklet_studio::rendering::render_booklet;
use booklet_studio::{generate_booklet, ActivityType, Error, GeminiClient, GeneratorConfig, PrintablePage, UserInputs};
use common::{config, dinosaur_quiz, quiz_json, start_mock};
use tiny_http::Server;

#[tokio::test]
async fn dinosaur_quiz_becomes_four_pages() {
    let (base, seen) = start_mock(200, quiz_json);
    let client = GeminiClient::new(&config(base)).unwrap();

    let booklet = generate_booklet(&client, dinosaur_quiz()).await.unwrap();
    assert_eq!(booklet.activities.len(), 3);
    assert!(booklet.activities.iter().all(|a| a.activity_type() == ActivityType::Quiz));

    let pages = booklet.pages();
    assert_eq!(pages.len(), 4);
    match &pages[0] {
        PrintablePage::Cover(c) => {
            assert_eq!(c.recipient_name, "Turma A");
            assert_eq!(c.theme, "Dinosaurs");
        }
        other => panic!("first page is not the cover: {:?}", other),
    }

    let surfaces = render_booklet(&pages);
    assert_eq!(surfaces.len(), 4);
    assert!(surfaces[0].svg.contains("Turma A"));
    assert!(surfaces[0].svg.contains("Dinosaurs"));
    assert!(surfaces[1].svg.contains("Which dinosaur had three horns?"));

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 3);
    for req in seen.iter() {
        assert_eq!(req.url, "/v1beta/models/gemini-2.5-flash:generateContent");
        assert_eq!(req.api_key.as_deref(), Some("test-key"));
        assert_eq!(req.body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(req.body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        let prompt = req.body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(prompt.contains("Dinosaurs"));
    }
    let mut variations: Vec<String> = seen
        .iter()
        .map(|r| {
            let prompt = r.body["contents"][0]["parts"][0]["text"].as_str().unwrap_or_default();
            ["variation 1 of 3", "variation 2 of 3", "variation 3 of 3"]
                .into_iter()
                .find(|v| prompt.contains(v))
                .unwrap_or("none")
                .to_string()
        })
        .collect();
    variations.sort();
    assert_eq!(variations, vec!["variation 1 of 3", "variation 2 of 3", "variation 3 of 3"]);
}

#[tokio::test]
async fn one_malformed_variation_fails_the_batch() {
    let (base, _seen) = start_mock(200, |i| if i == 1 { "Sure! Here is your quiz".to_string() } else { quiz_json(i) });
    let client = GeminiClient::new(&config(base)).unwrap();

    let err = generate_booklet(&client, dinosaur_quiz()).await.unwrap_err();
    assert!(matches!(err, Error::InvalidResponse(_)), "got {:?}", err);
    assert!(err.user_message().contains("inválidos"));
}

#[tokio::test]
async fn upstream_error_is_a_generation_error() {
    let (base, _seen) = start_mock(503, quiz_json);
    let client = GeminiClient::new(&config(base)).unwrap();

    let err = generate_booklet(&client, dinosaur_quiz()).await.unwrap_err();
    assert!(matches!(err, Error::GenerationError(_)), "got {:?}", err);
    assert!(!err.user_message().contains("inválidos"));
}

#[test]
fn missing_credential_sends_nothing() {
    let server = Server::http("127.0.0.1:0").unwrap();
    let cfg = GeneratorConfig {
        api_key: None,
        base_url: format!("http://{}/v1beta/", server.server_addr()),
        ..Default::default()
    };

    assert!(matches!(GeminiClient::new(&cfg), Err(Error::MissingCredential)));
    let pending = server.recv_timeout(Duration::from_millis(200)).unwrap();
    assert!(pending.is_none());
}

#[tokio::test]
async fn incomplete_inputs_never_reach_the_model() {
    let (base, seen) = start_mock(200, quiz_json);
    let client = GeminiClient::new(&config(base)).unwrap();
    let inputs = UserInputs { theme: String::new(), ..dinosaur_quiz() };

    assert!(matches!(generate_booklet(&client, inputs).await, Err(Error::ConfigError(_))));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(seen.lock().unwrap().is_empty());
}
