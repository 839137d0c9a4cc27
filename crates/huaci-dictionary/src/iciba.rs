use async_trait::async_trait;
use serde::Deserialize;

use crate::{Dictionary, DictionaryEntry, DictionaryError, DictionaryMetadata};

/// iciba mobile suggestion endpoint; no credentials needed
#[derive(Clone)]
pub struct IcibaDictionary {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct SuggestResponse {
    #[serde(default)]
    message: Vec<Suggestion>,
}

#[derive(Debug, Deserialize)]
struct Suggestion {
    key: String,
    #[serde(default)]
    paraphrase: String,
}

impl IcibaDictionary {
    pub fn new(client: reqwest::Client, endpoint: String) -> Self {
        Self { client, endpoint }
    }
}

/// Split a `;`-delimited paraphrase into trimmed, non-empty definitions
pub(crate) fn split_paraphrase(paraphrase: &str) -> Vec<String> {
    paraphrase
        .split(';')
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl Dictionary for IcibaDictionary {
    async fn lookup(&self, word: &str) -> Result<DictionaryEntry, DictionaryError> {
        let params = [
            ("c", "word"),
            ("m", "getsuggest"),
            ("nums", "1"),
            ("client", "6"),
            ("is_need_mean", "1"),
            ("word", word),
        ];

        let response = self.client.get(&self.endpoint).query(&params).send().await?;
        if !response.status().is_success() {
            return Err(DictionaryError::Status(response.status().as_u16()));
        }

        let body: SuggestResponse = response
            .json()
            .await
            .map_err(|e| DictionaryError::ParseError(format!("Failed to parse response: {}", e)))?;

        let first = body
            .message
            .into_iter()
            .next()
            .ok_or(DictionaryError::NotFound { message: None })?;

        let definitions = split_paraphrase(&first.paraphrase);
        if definitions.is_empty() {
            return Err(DictionaryError::NotFound { message: None });
        }
        tracing::debug!("iciba: '{}' -> {} definitions", first.key, definitions.len());

        Ok(DictionaryEntry {
            headword: first.key,
            definitions,
        })
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: "iciba".to_string(),
            language: "en-zh".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    #[test]
    fn paraphrase_split() {
        assert_eq!(
            split_paraphrase("int. 喂; 哈罗;你好;"),
            vec!["int. 喂", "哈罗", "你好"]
        );
        assert!(split_paraphrase(" ; ").is_empty());
    }

    #[tokio::test]
    async fn first_suggestion_wins() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/interface/index.php")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("c".into(), "word".into()),
                Matcher::UrlEncoded("m".into(), "getsuggest".into()),
                Matcher::UrlEncoded("word".into(), "hello".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"status":1,"message":[{"key":"hello","paraphrase":"int. 喂;哈罗","value":0},{"key":"hell","paraphrase":"n. 地狱"}]}"#,
            )
            .create_async()
            .await;

        let dict = IcibaDictionary::new(
            reqwest::Client::new(),
            format!("{}/interface/index.php", server.url()),
        );
        let entry = dict.lookup("hello").await.unwrap();

        mock.assert_async().await;
        assert_eq!(entry.headword, "hello");
        assert_eq!(entry.definitions, vec!["int. 喂", "哈罗"]);
    }

    #[tokio::test]
    async fn empty_message_is_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/interface/index.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"status":1,"message":[]}"#)
            .create_async()
            .await;

        let dict = IcibaDictionary::new(
            reqwest::Client::new(),
            format!("{}/interface/index.php", server.url()),
        );
        assert!(matches!(
            dict.lookup("qwxz").await,
            Err(DictionaryError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn garbage_body_is_a_parse_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/interface/index.php")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let dict = IcibaDictionary::new(
            reqwest::Client::new(),
            format!("{}/interface/index.php", server.url()),
        );
        assert!(matches!(
            dict.lookup("hello").await,
            Err(DictionaryError::ParseError(_))
        ));
    }
}
