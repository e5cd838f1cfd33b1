use std::sync::atomic::{AtomicUsize, Ordering};

use booklet_studio::export::export_pdf;
use booklet_studio::rendering::render_booklet;
use booklet_studio::{ActivityType, ContentGenerator, ExportConfig, UserInputs};
use serde_json::{json, Value};

/// Stands in for the model: answers every prompt with a small word search.
struct Scripted {
    calls: AtomicUsize,
}

impl ContentGenerator for Scripted {
    async fn generate(&self, _prompt: &str, _schema: &Value) -> booklet_studio::Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(json!({
            "title": format!("Fundo do Mar {}", n),
            "gridSize": 5,
            "grid": [
                ["P", "E", "I", "X", "E"],
                ["O", "N", "D", "A", "S"],
                ["L", "U", "L", "A", "O"],
                ["V", "A", "R", "E", "I"],
                ["O", "S", "T", "R", "A"]
            ],
            "words": ["PEIXE", "ONDAS", "LULA", "POLVO"]
        })
        .to_string())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let inputs = UserInputs {
        theme: "Fundo do Mar".to_string(),
        recipient_name: "Turma B".to_string(),
        activity_type: ActivityType::WordSearch,
        ..Default::default()
    };
    let generator = Scripted { calls: AtomicUsize::new(0) };
    let booklet = booklet_studio::generate_booklet(&generator, inputs).await?;

    let surfaces = render_booklet(&booklet.pages());
    let pdf = export_pdf(&surfaces, &ExportConfig::default())?;

    let out = std::env::temp_dir().join("offline-booklet.pdf");
    std::fs::write(&out, pdf)?;
    println!("{} pages -> {}", surfaces.len(), out.display());
    Ok(())
}
