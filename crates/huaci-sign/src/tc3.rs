//! Tencent Cloud `TC3-HMAC-SHA256` request signing.
//!
//! The signing key chain feeds each stage the *hex string* of the previous
//! HMAC, not its raw bytes. Signatures produced with raw-byte chaining are
//! rejected by the translation endpoint.

use chrono::DateTime;

use crate::SignError;
use crate::digest::{hmac_sha256_hex, sha256_hex};
use crate::request::{Method, SignedRequest};

pub const ALGORITHM: &str = "TC3-HMAC-SHA256";
pub const SIGNED_HEADERS: &str = "content-type;host";
pub const CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const TMT_HOST: &str = "tmt.tencentcloudapi.com";
pub const TMT_SERVICE: &str = "tmt";

/// Everything derived from one signing pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tc3Signature {
    pub timestamp: i64,
    pub date: String,
    pub credential_scope: String,
    pub canonical_request: String,
    pub string_to_sign: String,
    pub signature: String,
    pub authorization: String,
}

/// API call metadata sent alongside the signature
#[derive(Debug, Clone)]
pub struct Tc3Action<'a> {
    pub action: &'a str,
    pub version: &'a str,
    pub region: &'a str,
}

#[derive(Debug, Clone)]
pub struct Tc3Signer {
    secret_id: String,
    secret_key: String,
    service: String,
    host: String,
}

impl Tc3Signer {
    pub fn new(
        secret_id: impl Into<String>,
        secret_key: impl Into<String>,
        service: impl Into<String>,
        host: impl Into<String>,
    ) -> Result<Self, SignError> {
        let secret_id = secret_id.into();
        let secret_key = secret_key.into();

        if secret_id.trim().is_empty() {
            return Err(SignError::MissingCredential("tencentSecretId"));
        }
        if secret_key.trim().is_empty() {
            return Err(SignError::MissingCredential("tencentSecretKey"));
        }

        Ok(Self {
            secret_id,
            secret_key,
            service: service.into(),
            host: host.into(),
        })
    }

    /// Signer for the machine translation (`tmt`) service
    pub fn tmt(secret_id: impl Into<String>, secret_key: impl Into<String>) -> Result<Self, SignError> {
        Self::new(secret_id, secret_key, TMT_SERVICE, TMT_HOST)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Sign a POST of `payload` to `/` at `timestamp` (Unix seconds)
    pub fn sign(&self, payload: &str, timestamp: i64) -> Result<Tc3Signature, SignError> {
        let date = utc_date(timestamp)?;

        // 1. canonical request
        let canonical_headers = format!("content-type:{CONTENT_TYPE}\nhost:{}\n", self.host);
        let canonical_request = format!(
            "POST\n/\n\n{canonical_headers}\n{SIGNED_HEADERS}\n{}",
            sha256_hex(payload)
        );

        // 2. string to sign
        let credential_scope = format!("{date}/{}/tc3_request", self.service);
        let string_to_sign = format!(
            "{ALGORITHM}\n{timestamp}\n{credential_scope}\n{}",
            sha256_hex(&canonical_request)
        );

        // 3. signing key, hex-chained
        let secret_date = hmac_sha256_hex(date.as_bytes(), format!("TC3{}", self.secret_key).as_bytes());
        let secret_service = hmac_sha256_hex(self.service.as_bytes(), secret_date.as_bytes());
        let secret_signing = hmac_sha256_hex(b"tc3_request", secret_service.as_bytes());

        // 4. signature
        let signature = hmac_sha256_hex(string_to_sign.as_bytes(), secret_signing.as_bytes());

        // 5. authorization
        let authorization = format!(
            "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            self.secret_id
        );

        Ok(Tc3Signature {
            timestamp,
            date,
            credential_scope,
            canonical_request,
            string_to_sign,
            signature,
            authorization,
        })
    }

    /// Sign and assemble the full request; the timestamp is used once for
    /// both the signature and the `X-TC-Timestamp` header.
    pub fn signed_request(
        &self,
        endpoint: &str,
        payload: &str,
        timestamp: i64,
        action: &Tc3Action<'_>,
    ) -> Result<SignedRequest, SignError> {
        let signature = self.sign(payload, timestamp)?;

        Ok(SignedRequest {
            method: Method::Post,
            url: endpoint.to_string(),
            query: vec![],
            headers: vec![
                ("Authorization".to_string(), signature.authorization),
                ("Content-Type".to_string(), CONTENT_TYPE.to_string()),
                ("Host".to_string(), self.host.clone()),
                ("X-TC-Action".to_string(), action.action.to_string()),
                ("X-TC-Timestamp".to_string(), signature.timestamp.to_string()),
                ("X-TC-Version".to_string(), action.version.to_string()),
                ("X-TC-Region".to_string(), action.region.to_string()),
            ],
            body: payload.as_bytes().to_vec(),
        })
    }
}

/// `YYYY-MM-DD` of a Unix timestamp, in UTC
pub fn utc_date(timestamp: i64) -> Result<String, SignError> {
    let datetime = DateTime::from_timestamp(timestamp, 0).ok_or(SignError::InvalidTimestamp(timestamp))?;
    Ok(datetime.format("%Y-%m-%d").to_string())
}
