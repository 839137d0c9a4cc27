use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Encode text the way the browser-side MD5 helper did before hashing.
///
/// `"\r\n"` collapses to `"\n"`, then every UTF-16 code unit is written as
/// one, two or three bytes. BMP text comes out as plain UTF-8; characters
/// outside the BMP are written as two 3-byte surrogate sequences.
pub fn legacy_utf8(input: &str) -> Vec<u8> {
    let normalized = input.replace("\r\n", "\n");
    let mut out = Vec::with_capacity(normalized.len());

    for unit in normalized.encode_utf16() {
        let c = u32::from(unit);
        if c < 0x80 {
            out.push(c as u8);
        } else if c < 0x800 {
            out.push(((c >> 6) | 0xC0) as u8);
            out.push(((c & 0x3F) | 0x80) as u8);
        } else {
            out.push(((c >> 12) | 0xE0) as u8);
            out.push((((c >> 6) & 0x3F) | 0x80) as u8);
            out.push(((c & 0x3F) | 0x80) as u8);
        }
    }

    out
}

/// MD5 of `input` as 32 lowercase hex chars
pub fn md5_hex(input: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(legacy_utf8(input));
    hex::encode(hasher.finalize())
}

/// SHA-256 of `message` as 64 lowercase hex chars
pub fn sha256_hex(message: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(message.as_bytes());
    hex::encode(hasher.finalize())
}

pub fn hmac_sha256(message: &[u8], key: &[u8]) -> [u8; 32] {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(message);

    let mut out = [0u8; 32];
    out.copy_from_slice(&mac.finalize().into_bytes());
    out
}

pub fn hmac_sha256_hex(message: &[u8], key: &[u8]) -> String {
    hex::encode(hmac_sha256(message, key))
}
