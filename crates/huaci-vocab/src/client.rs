use reqwest::StatusCode;
use serde::Serialize;

use crate::VocabError;

/// Eudic open-API study list client
#[derive(Clone)]
pub struct EudicClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct AddWordsRequest<'a> {
    id: &'a str,
    language: &'a str,
    words: Vec<&'a str>,
}

impl EudicClient {
    /// Fails fast when `api_key` is empty
    pub fn new(
        client: reqwest::Client,
        base_url: String,
        api_key: String,
    ) -> Result<Self, VocabError> {
        if api_key.trim().is_empty() {
            return Err(VocabError::MissingApiKey);
        }

        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }

    /// Add words to a study list. Eudic answers `201 Created` on success;
    /// every other status is a failure.
    pub async fn add_words(
        &self,
        list_id: &str,
        language: &str,
        words: &[&str],
    ) -> Result<(), VocabError> {
        let request = AddWordsRequest {
            id: list_id,
            language,
            words: words.to_vec(),
        };

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("eudic add words returned {}", status);

        if status == StatusCode::CREATED {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(VocabError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
