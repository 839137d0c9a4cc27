use async_trait::async_trait;
use serde::Deserialize;

use crate::{Dictionary, DictionaryEntry, DictionaryError, DictionaryMetadata};

/// Shanbay senses endpoint. Requires a logged-in browser session for most
/// words, so it answers with `{"msg": ...}` more often than not.
#[derive(Clone)]
pub struct ShanbayDictionary {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SensesResponse {
    Failure { msg: String },
    Senses { content: String, definitions: Definitions },
}

#[derive(Debug, Deserialize)]
struct Definitions {
    #[serde(default)]
    cn: Vec<Sense>,
}

#[derive(Debug, Deserialize)]
struct Sense {
    #[serde(default)]
    pos: String,
    def: String,
}

impl ShanbayDictionary {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

#[async_trait]
impl Dictionary for ShanbayDictionary {
    async fn lookup(&self, word: &str) -> Result<DictionaryEntry, DictionaryError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("vocabulary_content", word)])
            .send()
            .await?;

        let body: SensesResponse = response
            .json()
            .await
            .map_err(|e| DictionaryError::ParseError(format!("Failed to parse response: {}", e)))?;

        match body {
            SensesResponse::Failure { msg } => Err(DictionaryError::NotFound { message: Some(msg) }),
            SensesResponse::Senses {
                content,
                definitions,
            } => {
                let definitions: Vec<String> = definitions
                    .cn
                    .into_iter()
                    .map(|s| format!("{} {}", s.pos, s.def).trim().to_string())
                    .collect();
                if definitions.is_empty() {
                    return Err(DictionaryError::NotFound { message: None });
                }
                Ok(DictionaryEntry {
                    headword: content,
                    definitions,
                })
            }
        }
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: "shanbay".to_string(),
            language: "en-zh".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    async fn lookup_with_body(body: &str) -> Result<DictionaryEntry, DictionaryError> {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/abc/words/senses")
            .match_query(Matcher::UrlEncoded("vocabulary_content".into(), "apple".into()))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;

        ShanbayDictionary::new(
            reqwest::Client::new(),
            format!("{}/abc/words/senses", server.url()),
        )
        .lookup("apple")
        .await
    }

    #[tokio::test]
    async fn senses_become_pos_prefixed_definitions() {
        let entry = lookup_with_body(
            r#"{"content":"apple","definitions":{"cn":[{"pos":"n.","def":"苹果"},{"pos":"","def":"苹果树"}]}}"#,
        )
        .await
        .unwrap();
        assert_eq!(entry.headword, "apple");
        assert_eq!(entry.definitions, vec!["n. 苹果", "苹果树"]);
    }

    #[tokio::test]
    async fn msg_body_is_not_found_with_message() {
        let err = lookup_with_body(r#"{"msg":"请先登录"}"#).await.unwrap_err();
        assert!(matches!(err, DictionaryError::NotFound { message: Some(msg) } if msg == "请先登录"));
    }
}
