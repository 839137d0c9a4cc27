use crate::SignError;
use crate::digest::md5_hex;
use crate::request::{Method, SignedRequest};

pub const BAIDU_ENDPOINT: &str = "http://api.fanyi.baidu.com/api/trans/vip/translate";

/// `md5(app_id + query + salt + app_key)`
pub fn sign(app_id: &str, query: &str, salt: i64, app_key: &str) -> String {
    md5_hex(&format!("{app_id}{query}{salt}{app_key}"))
}

/// Builds signed GET requests for the Baidu general translation API
#[derive(Debug, Clone)]
pub struct BaiduSigner {
    app_id: String,
    app_key: String,
}

impl BaiduSigner {
    pub fn new(app_id: impl Into<String>, app_key: impl Into<String>) -> Result<Self, SignError> {
        let app_id = app_id.into();
        let app_key = app_key.into();

        if app_id.trim().is_empty() {
            return Err(SignError::MissingCredential("baiduId"));
        }
        if app_key.trim().is_empty() {
            return Err(SignError::MissingCredential("baiduKey"));
        }

        Ok(Self { app_id, app_key })
    }

    pub fn sign_query(
        &self,
        endpoint: &str,
        query: &str,
        from: &str,
        to: &str,
        salt: i64,
    ) -> SignedRequest {
        let sign = sign(&self.app_id, query, salt, &self.app_key);

        SignedRequest {
            method: Method::Get,
            url: endpoint.to_string(),
            query: vec![
                ("q".to_string(), query.to_string()),
                ("appid".to_string(), self.app_id.clone()),
                ("salt".to_string(), salt.to_string()),
                ("from".to_string(), from.to_string()),
                ("to".to_string(), to.to_string()),
                ("sign".to_string(), sign),
            ],
            headers: vec![],
            body: vec![],
        }
    }
}
