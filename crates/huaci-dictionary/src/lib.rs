mod iciba;
mod shanbay;

pub use iciba::IcibaDictionary;
pub use shanbay::ShanbayDictionary;

/// Remote word lookup
#[async_trait::async_trait]
pub trait Dictionary: Send + Sync {
    /// Look up a single word
    async fn lookup(&self, word: &str) -> Result<DictionaryEntry, DictionaryError>;

    /// Dictionary metadata
    fn metadata(&self) -> DictionaryMetadata;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryEntry {
    pub headword: String,
    pub definitions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct DictionaryMetadata {
    pub name: String,
    pub language: String,
}

#[derive(Debug, thiserror::Error)]
pub enum DictionaryError {
    /// The provider answered but has nothing for the word, optionally
    /// saying why
    #[error("No definition found")]
    NotFound { message: Option<String> },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("Unexpected response: {0}")]
    ParseError(String),
}
