use std::sync::Arc;
use std::time::Duration;

use huaci_config::providers::ProvidersConfig;
use huaci_config::{
    BaiduCredentials, DictionaryProvider, HostConfig, SettingsStore, TencentCredentials,
};
use huaci_dictionary::{Dictionary, DictionaryError, IcibaDictionary, ShanbayDictionary};
use huaci_translator::{
    BaiduTranslator, TencentTranslator, TranslateError, Translation, Translator,
};
use huaci_types::{
    AddWordResult, DictionaryResult, LookupRequest, LookupResult, NO_DEFINITION, REQUEST_ERROR,
    TRANSLATION_FAILED, TranslationResult,
};
use huaci_vocab::EudicClient;

/// Routes lookup requests to providers and normalizes every outcome into a
/// `LookupResult`. Nothing in here returns an error to the caller.
pub struct LookupService {
    client: reqwest::Client,
    providers: ProvidersConfig,
    settings: Arc<SettingsStore>,
}

impl LookupService {
    pub fn new(config: &HostConfig, settings: Arc<SettingsStore>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.http_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            providers: config.providers.clone(),
            settings,
        })
    }

    /// Handle one request against the latest settings snapshot
    pub async fn handle(&self, request: LookupRequest) -> LookupResult {
        let settings = self.settings.snapshot();
        tracing::debug!("lookup via {}", request.provider_name());

        match request {
            LookupRequest::Dictionary(word) => LookupResult::Dictionary(
                self.query_dictionary(&word, settings.dictionary_provider)
                    .await,
            ),
            LookupRequest::TranslateBaidu(query) => LookupResult::Translation(
                self.translate_baidu(&query, &settings.baidu_credentials())
                    .await,
            ),
            LookupRequest::TranslateTencent(query) => LookupResult::Translation(
                self.translate_tencent(&query, &settings.tencent_credentials())
                    .await,
            ),
            LookupRequest::AddWord(word) => {
                LookupResult::AddWord(self.add_word(&word, &settings.eudic_key).await)
            }
        }
    }

    pub async fn query_dictionary(&self, word: &str, provider: DictionaryProvider) -> DictionaryResult {
        let word = word.trim();
        if word.is_empty() {
            return DictionaryResult::not_found(word, NO_DEFINITION);
        }

        let result = match provider {
            DictionaryProvider::Iciba => {
                IcibaDictionary::new(self.client.clone(), self.providers.iciba_url.clone())
                    .lookup(word)
                    .await
            }
            DictionaryProvider::Shanbay => {
                ShanbayDictionary::new(self.client.clone(), self.providers.shanbay_url.clone())
                    .lookup(word)
                    .await
            }
        };

        match result {
            Ok(entry) => DictionaryResult::found(entry.headword, entry.definitions),
            Err(DictionaryError::NotFound { message }) => {
                tracing::debug!("no definition for '{word}'");
                DictionaryResult::not_found(word, message.unwrap_or_else(|| NO_DEFINITION.to_string()))
            }
            Err(DictionaryError::ParseError(e)) => {
                tracing::warn!("dictionary response for '{word}' unreadable: {e}");
                DictionaryResult::not_found(word, NO_DEFINITION)
            }
            Err(e @ (DictionaryError::NetworkError(_) | DictionaryError::Status(_))) => {
                tracing::error!("dictionary request for '{word}' failed: {e}");
                DictionaryResult::not_found(word, REQUEST_ERROR)
            }
        }
    }

    pub async fn translate_baidu(&self, query: &str, credentials: &BaiduCredentials) -> TranslationResult {
        let translator = match BaiduTranslator::new(self.client.clone(), credentials, &self.providers) {
            Ok(translator) => translator,
            Err(e) => {
                tracing::warn!("baidu translation unavailable: {e}");
                return TranslationResult::failed("Baidu translation is not configured");
            }
        };

        normalize_translation("baidu", translate(&translator, query).await)
    }

    pub async fn translate_tencent(
        &self,
        query: &str,
        credentials: &TencentCredentials,
    ) -> TranslationResult {
        let translator = match TencentTranslator::new(self.client.clone(), credentials, &self.providers) {
            Ok(translator) => translator,
            Err(e) => {
                tracing::warn!("tencent translation unavailable: {e}");
                return TranslationResult::failed("Tencent translation is not configured");
            }
        };

        normalize_translation("tencent", translate(&translator, query).await)
    }

    pub async fn add_word(&self, word: &str, api_key: &str) -> AddWordResult {
        let client = match EudicClient::new(
            self.client.clone(),
            self.providers.eudic_url.clone(),
            api_key.to_string(),
        ) {
            Ok(client) => client,
            Err(e) => {
                tracing::warn!("cannot add '{word}': {e}");
                return AddWordResult { success: false };
            }
        };

        match huaci_vocab::add_word(&client, word.trim()).await {
            Ok(()) => {
                tracing::info!("added '{word}' to study list");
                AddWordResult { success: true }
            }
            Err(e) => {
                tracing::error!("add word '{word}' failed: {e}");
                AddWordResult { success: false }
            }
        }
    }
}

async fn translate(translator: &dyn Translator, query: &str) -> Result<Translation, TranslateError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(TranslateError::ApiError("empty query".to_string()));
    }
    translator.translate(query).await
}

fn normalize_translation(
    provider: &str,
    result: Result<Translation, TranslateError>,
) -> TranslationResult {
    match result {
        Ok(translation) => TranslationResult::ok(translation.text),
        Err(e) => {
            tracing::error!("{provider} translation failed: {e}");
            TranslationResult::failed(TRANSLATION_FAILED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use huaci_config::Settings;
    use mockito::{Matcher, Server};

    fn service(server_url: &str, settings: Settings) -> LookupService {
        let config = HostConfig {
            providers: ProvidersConfig {
                iciba_url: format!("{server_url}/iciba"),
                shanbay_url: format!("{server_url}/shanbay"),
                baidu_url: format!("{server_url}/baidu"),
                tencent_url: format!("{server_url}/tencent"),
                eudic_url: format!("{server_url}/eudic"),
                ..ProvidersConfig::default()
            },
            ..HostConfig::default()
        };
        let store = Arc::new(SettingsStore::new(settings).unwrap());
        LookupService::new(&config, store).unwrap()
    }

    #[tokio::test]
    async fn dictionary_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/iciba")
            .match_query(Matcher::UrlEncoded("word".into(), "apple".into()))
            .with_status(200)
            .with_body(r#"{"message":[{"key":"apple","paraphrase":"n. 苹果;苹果树"}]}"#)
            .create_async()
            .await;

        let result = service(&server.url(), Settings::default())
            .handle(LookupRequest::Dictionary("apple".into()))
            .await;

        assert_eq!(
            result,
            LookupResult::Dictionary(DictionaryResult::found(
                "apple",
                vec!["n. 苹果".to_string(), "苹果树".to_string()]
            ))
        );
    }

    #[tokio::test]
    async fn dictionary_without_suggestions_is_not_found() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/iciba")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message":[]}"#)
            .create_async()
            .await;

        let result = service(&server.url(), Settings::default())
            .query_dictionary("zzxq", DictionaryProvider::Iciba)
            .await;

        assert!(!result.found);
        assert_eq!(result.message.as_deref(), Some(NO_DEFINITION));
        assert!(result.definitions.is_empty());
    }

    #[tokio::test]
    async fn dictionary_network_failure_is_request_error() {
        let result = service("http://127.0.0.1:1", Settings::default())
            .query_dictionary("apple", DictionaryProvider::Iciba)
            .await;

        assert!(!result.found);
        assert_eq!(result.message.as_deref(), Some(REQUEST_ERROR));
    }

    #[tokio::test]
    async fn baidu_without_credentials_never_hits_network() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/baidu")
            .match_query(Matcher::Any)
            .expect(0)
            .create_async()
            .await;

        let result = service(&server.url(), Settings::default())
            .handle(LookupRequest::TranslateBaidu("good morning".into()))
            .await;

        mock.assert_async().await;
        match result {
            LookupResult::Translation(t) => {
                assert!(!t.ok);
                assert!(!t.text.is_empty());
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[tokio::test]
    async fn baidu_uses_snapshot_credentials() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/baidu")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("appid".into(), "myapp".into()),
                Matcher::UrlEncoded("q".into(), "good morning".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"trans_result":[{"src":"good morning","dst":"早上好"}]}"#)
            .create_async()
            .await;

        let settings = Settings {
            baidu_id: "myapp".into(),
            baidu_key: "mykey".into(),
            ..Settings::default()
        };
        let result = service(&server.url(), settings)
            .handle(LookupRequest::TranslateBaidu("  good morning ".into()))
            .await;

        mock.assert_async().await;
        assert_eq!(result, LookupResult::Translation(TranslationResult::ok("早上好")));
    }

    #[tokio::test]
    async fn tencent_failure_is_normalized() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/tencent")
            .with_status(200)
            .with_body(r#"{"Response":{"Error":{"Code":"FailedOperation","Message":"x"}}}"#)
            .create_async()
            .await;

        let settings = Settings {
            tencent_secret_id: "id".into(),
            tencent_secret_key: "key".into(),
            ..Settings::default()
        };
        let result = service(&server.url(), settings)
            .handle(LookupRequest::TranslateTencent("hello".into()))
            .await;

        assert_eq!(
            result,
            LookupResult::Translation(TranslationResult::failed(TRANSLATION_FAILED))
        );
    }

    #[tokio::test]
    async fn add_word_success_only_on_created() {
        let mut server = Server::new_async().await;
        let _created = server
            .mock("POST", "/eudic")
            .match_body(Matcher::PartialJson(serde_json_words("apple")))
            .with_status(201)
            .create_async()
            .await;
        let _other = server
            .mock("POST", "/eudic")
            .match_body(Matcher::PartialJson(serde_json_words("pear")))
            .with_status(500)
            .create_async()
            .await;

        let settings = Settings {
            eudic_key: "NIS key".into(),
            ..Settings::default()
        };
        let service = service(&server.url(), settings);

        assert_eq!(
            service.handle(LookupRequest::AddWord("apple".into())).await,
            LookupResult::AddWord(AddWordResult { success: true })
        );
        assert_eq!(
            service.handle(LookupRequest::AddWord("pear".into())).await,
            LookupResult::AddWord(AddWordResult { success: false })
        );
    }

    #[tokio::test]
    async fn add_word_without_key_fails() {
        let result = service("http://127.0.0.1:1", Settings::default())
            .add_word("apple", "")
            .await;
        assert!(!result.success);
    }

    fn serde_json_words(word: &str) -> serde_json::Value {
        serde_json::json!({ "words": [word] })
    }
}
