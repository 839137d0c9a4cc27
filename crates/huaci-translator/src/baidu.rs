use async_trait::async_trait;
use huaci_config::BaiduCredentials;
use huaci_config::providers::ProvidersConfig;
use huaci_sign::{BaiduSigner, SaltSource};
use serde_json::Value;

use crate::{ProviderMetadata, TranslateError, Translation, Translator, execute};

/// Salts are shared by every Baidu client in the process
static SALTS: SaltSource = SaltSource::new();

#[derive(Clone)]
pub struct BaiduTranslator {
    client: reqwest::Client,
    signer: BaiduSigner,
    endpoint: String,
    from: String,
    to: String,
}

impl BaiduTranslator {
    /// Fails fast when the app id or key is empty
    pub fn new(
        client: reqwest::Client,
        credentials: &BaiduCredentials,
        providers: &ProvidersConfig,
    ) -> Result<Self, TranslateError> {
        let signer = BaiduSigner::new(&credentials.app_id, &credentials.app_key)?;

        Ok(Self {
            client,
            signer,
            endpoint: providers.baidu_url.clone(),
            from: providers.baidu_from.clone(),
            to: providers.baidu_to.clone(),
        })
    }

    /// Translate with an explicit salt
    pub async fn translate_with_salt(
        &self,
        text: &str,
        salt: i64,
    ) -> Result<Translation, TranslateError> {
        let request = self
            .signer
            .sign_query(&self.endpoint, text, &self.from, &self.to, salt);
        tracing::debug!("baidu request: salt={salt}, {} chars", text.chars().count());

        let response = execute(&self.client, request).await?;
        if !response.status().is_success() {
            return Err(TranslateError::ApiError(format!("HTTP {}", response.status())));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| TranslateError::ParseError(format!("Failed to parse response: {}", e)))?;

        if let Some(code) = json.get("error_code") {
            let code = match code {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let message = json["error_msg"].as_str().unwrap_or_default();
            return Err(match code.as_str() {
                "52003" | "54001" => TranslateError::AuthenticationError,
                "54003" => TranslateError::RateLimitExceeded,
                _ => TranslateError::ApiError(format!("{code} {message}")),
            });
        }

        let translated_text = json["trans_result"]
            .get(0)
            .and_then(|t| t["dst"].as_str())
            .ok_or_else(|| TranslateError::ParseError("No translation in response".to_string()))?;

        Ok(Translation {
            text: translated_text.to_string(),
            from: self.from.clone(),
            to: self.to.clone(),
            provider: "baidu".to_string(),
        })
    }
}

#[async_trait]
impl Translator for BaiduTranslator {
    async fn translate(&self, text: &str) -> Result<Translation, TranslateError> {
        self.translate_with_salt(text, SALTS.next()).await
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Baidu".to_string(),
            requires_api_key: true,
            free_tier_available: true,
        }
    }
}
