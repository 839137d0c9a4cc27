pub mod baidu;
pub mod digest;
pub mod request;
pub mod salt;
pub mod tc3;

pub use baidu::BaiduSigner;
pub use digest::{hmac_sha256, hmac_sha256_hex, legacy_utf8, md5_hex, sha256_hex};
pub use request::{Method, SignedRequest};
pub use salt::SaltSource;
pub use tc3::{Tc3Action, Tc3Signature, Tc3Signer};

#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),
}
