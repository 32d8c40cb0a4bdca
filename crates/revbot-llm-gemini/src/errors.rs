use revbot_llm_interface::LlmError;

#[derive(Debug, thiserror::Error)]
pub enum GeminiError {
    #[error(transparent)]
    HttpError { source: reqwest::Error },
}

impl From<reqwest::Error> for GeminiError {
    fn from(e: reqwest::Error) -> Self {
        GeminiError::HttpError { source: e }
    }
}

impl From<GeminiError> for LlmError {
    fn from(e: GeminiError) -> Self {
        LlmError::ImplementationError { source: e.into() }
    }
}
