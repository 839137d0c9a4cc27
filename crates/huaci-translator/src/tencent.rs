use async_trait::async_trait;
use huaci_config::TencentCredentials;
use huaci_config::providers::ProvidersConfig;
use huaci_sign::{Tc3Action, Tc3Signer};
use serde::Serialize;
use serde_json::Value;

use crate::{ProviderMetadata, TranslateError, Translation, Translator, execute};

const ACTION: &str = "TextTranslate";
const VERSION: &str = "2018-03-21";

/// Request body; the field order is part of the signed bytes
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TextTranslatePayload<'a> {
    source_text: &'a str,
    source: &'a str,
    target: &'a str,
    project_id: u32,
}

#[derive(Clone)]
pub struct TencentTranslator {
    client: reqwest::Client,
    signer: Tc3Signer,
    endpoint: String,
    region: String,
    source: String,
    target: String,
}

impl TencentTranslator {
    /// Fails fast when the secret id or key is empty
    pub fn new(
        client: reqwest::Client,
        credentials: &TencentCredentials,
        providers: &ProvidersConfig,
    ) -> Result<Self, TranslateError> {
        let signer = Tc3Signer::tmt(&credentials.secret_id, &credentials.secret_key)?;

        Ok(Self {
            client,
            signer,
            endpoint: providers.tencent_url.clone(),
            region: credentials.region.clone(),
            source: providers.tencent_source.clone(),
            target: providers.tencent_target.clone(),
        })
    }

    /// Compact JSON body for `text`
    pub fn payload(&self, text: &str) -> Result<String, TranslateError> {
        let payload = TextTranslatePayload {
            source_text: text,
            source: &self.source,
            target: &self.target,
            project_id: 0,
        };
        serde_json::to_string(&payload).map_err(|e| TranslateError::ParseError(e.to_string()))
    }

    /// Translate at a fixed Unix timestamp (seconds)
    pub async fn translate_at(
        &self,
        text: &str,
        timestamp: i64,
    ) -> Result<Translation, TranslateError> {
        let payload = self.payload(text)?;
        let action = Tc3Action {
            action: ACTION,
            version: VERSION,
            region: &self.region,
        };
        let request = self
            .signer
            .signed_request(&self.endpoint, &payload, timestamp, &action)?;
        tracing::debug!("tencent request: timestamp={timestamp}, region={}", self.region);

        let response = execute(&self.client, request).await?;
        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!("HTTP {}", response.status())));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::ParseError(format!("Failed to parse response: {}", e)))?;
        let body = &json["Response"];

        if let Some(error) = body.get("Error") {
            let code = error["Code"].as_str().unwrap_or_default();
            let message = error["Message"].as_str().unwrap_or_default();
            return Err(if code.starts_with("AuthFailure") {
                TranslateError::AuthenticationError
            } else if code.starts_with("RequestLimitExceeded") {
                TranslateError::RateLimitExceeded
            } else {
                TranslateError::ApiError(format!("{code}: {message}"))
            });
        }

        let translated_text = body["TargetText"]
            .as_str()
            .ok_or_else(|| TranslateError::ParseError("No TargetText in response".to_string()))?;

        Ok(Translation {
            text: translated_text.to_string(),
            from: body["Source"].as_str().unwrap_or(&self.source).to_string(),
            to: self.target.clone(),
            provider: "tencent".to_string(),
        })
    }
}

#[async_trait]
impl Translator for TencentTranslator {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        self.translate_at(text, chrono::Utc::now().timestamp()).await
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Tencent".to_string(),
            requires_api_key: true,
            free_tier_available: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn credentials() -> TencentCredentials {
        TencentCredentials {
            secret_id: "AKIDexample".to_string(),
            secret_key: "secretexample".to_string(),
            region: "ap-shanghai".to_string(),
        }
    }

    fn translator(url: String) -> TencentTranslator {
        let providers = ProvidersConfig {
            tencent_url: url,
            ..ProvidersConfig::default()
        };
        TencentTranslator::new(reqwest::Client::new(), &credentials(), &providers).unwrap()
    }

    #[test]
    fn payload_field_order_and_escaping() {
        let t = translator("http://localhost".to_string());
        assert_eq!(
            t.payload("hello").unwrap(),
            r#"{"SourceText":"hello","Source":"auto","Target":"zh","ProjectId":0}"#
        );
        assert_eq!(
            t.payload(r#"say "hi""#).unwrap(),
            r#"{"SourceText":"say \"hi\"","Source":"auto","Target":"zh","ProjectId":0}"#
        );
    }

    #[tokio::test]
    async fn posts_signed_payload() {
        let mut server = Server::new_async().await;
        let timestamp = 1700000000;
        let payload = r#"{"SourceText":"hello world","Source":"auto","Target":"zh","ProjectId":0}"#;
        let signature = Tc3Signer::tmt("AKIDexample", "secretexample")
            .unwrap()
            .sign(payload, timestamp)
            .unwrap();

        let mock = server
            .mock("POST", "/")
            .match_header("authorization", signature.authorization.as_str())
            .match_header("content-type", "application/json; charset=utf-8")
            .match_header("x-tc-action", "TextTranslate")
            .match_header("x-tc-version", "2018-03-21")
            .match_header("x-tc-region", "ap-shanghai")
            .match_header("x-tc-timestamp", "1700000000")
            .match_body(Matcher::Exact(payload.to_string()))
            .with_status(200)
            .with_body(r#"{"Response":{"TargetText":"你好世界","Source":"en","Target":"zh","RequestId":"r1"}}"#)
            .create_async()
            .await;

        let translation = translator(server.url())
            .translate_at("hello world", timestamp)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(translation.text, "你好世界");
        assert_eq!(translation.from, "en");
    }

    #[tokio::test]
    async fn response_error_is_mapped() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_body(r#"{"Response":{"Error":{"Code":"AuthFailure.SignatureFailure","Message":"bad"},"RequestId":"r2"}}"#)
            .create_async()
            .await;

        let err = translator(server.url()).translate("hello").await.unwrap_err();
        assert!(matches!(err, TranslateError::AuthenticationError));
    }

    #[tokio::test]
    async fn server_error_status_is_an_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/")
            .with_status(502)
            .create_async()
            .await;

        let err = translator(server.url()).translate("hello").await.unwrap_err();
        assert!(matches!(err, TranslateError::ApiError(_)));
    }

    #[test]
    fn empty_secret_is_a_configuration_error() {
        let credentials = TencentCredentials {
            secret_key: String::new(),
            ..credentials()
        };
        let result = TencentTranslator::new(
            reqwest::Client::new(),
            &credentials,
            &ProvidersConfig::default(),
        );
        assert!(matches!(result, Err(TranslateError::Configuration(_))));
    }
}
