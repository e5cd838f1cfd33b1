//! Error types for booklet generation, rendering and export

use thiserror::Error;

/// Result type alias for booklet operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a booklet
#[derive(Error, Debug)]
pub enum Error {
    /// No credential was supplied for the generative model
    #[error("Missing API credential: set API_KEY (or GEMINI_API_KEY) or pass --api-key")]
    MissingCredential,

    /// Invalid configuration or user input
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The model call failed (network, HTTP status, upstream error)
    #[error("Generation failed: {0}")]
    GenerationError(String),

    /// The model answered but the body is not the expected structured data
    #[error("Invalid AI response: {0}")]
    InvalidResponse(String),

    /// Operation not allowed in the controller's current phase
    #[error("Invalid state: {0}")]
    StateError(String),

    /// Failed to render a page
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Failed to assemble or write the output document
    #[error("Export failed: {0}")]
    ExportError(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Text shown in the error banner.
    ///
    /// Upstream failures are collapsed into one generic message; malformed
    /// model output gets its own distinct message.
    pub fn user_message(&self) -> String {
        match self {
            Error::MissingCredential => {
                "A chave de API não está configurada (defina API_KEY).".to_string()
            }
            Error::GenerationError(_) => {
                "Não foi possível gerar as atividades. Por favor, tente novamente.".to_string()
            }
            Error::InvalidResponse(_) => {
                "Recebemos dados inválidos da IA. Por favor, tente novamente.".to_string()
            }
            Error::ConfigError(_) => {
                "Preencha o tema e o nome e escolha opções da lista.".to_string()
            }
            Error::StateError(_) => "Aguarde a etapa atual terminar antes de continuar.".to_string(),
            Error::RenderError(_) => "Não foi possível montar as páginas do livrinho.".to_string(),
            Error::ExportError(_) | Error::Io(_) => "Não foi possível salvar o PDF.".to_string(),
            Error::Json(_) => "O arquivo do livrinho está corrompido.".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_response_has_distinct_banner() {
        let generic = Error::GenerationError("503".into()).user_message();
        let invalid = Error::InvalidResponse("eof".into()).user_message();
        assert_ne!(generic, invalid);
        assert!(invalid.contains("inválidos"));
    }

    #[test]
    fn form_errors_have_portuguese_banners() {
        let config = Error::ConfigError("theme is required".into()).user_message();
        let state = Error::StateError("cannot submit while Generating".into()).user_message();
        assert!(config.starts_with("Preencha"));
        assert!(state.starts_with("Aguarde"));
        assert!(!config.contains("theme is required"));
        assert!(!state.contains("Generating"));
    }

    #[test]
    fn upstream_detail_is_not_leaked_to_banner() {
        let msg = Error::GenerationError("connection refused at 10.0.0.1".into()).user_message();
        assert!(!msg.contains("10.0.0.1"));
    }
}
