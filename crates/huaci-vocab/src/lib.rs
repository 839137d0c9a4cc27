mod client;

pub use client::EudicClient;

/// The default study list
pub const DEFAULT_LIST_ID: &str = "0";

#[derive(Debug, thiserror::Error)]
pub enum VocabError {
    #[error("Eudic API key is not configured")]
    MissingApiKey,

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Eudic rejected the request: HTTP {status} {body}")]
    Rejected { status: u16, body: String },
}

/// Add one English word to the default study list
pub async fn add_word(client: &EudicClient, word: &str) -> Result<(), VocabError> {
    client.add_words(DEFAULT_LIST_ID, "en", &[word]).await
}
