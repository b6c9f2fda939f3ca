//! AWS Signature Version 4 request signing
//!
//! Implements the subset of SigV4 needed to PUT objects: canonical request
//! construction over the `host`, `x-amz-content-sha256`, and `x-amz-date`
//! headers, the date/region/service signing-key derivation chain, and the
//! final `Authorization` header value.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "AWS4-HMAC-SHA256";
const SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// Lowercase hex encoding
pub(crate) fn hex_encode(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        },
    )
}

/// SHA-256 digest as lowercase hex
pub(crate) fn sha256_hex(data: &[u8]) -> String {
    hex_encode(&Sha256::digest(data))
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

/// Derive the signing key for a given date, region, and service
pub(crate) fn signing_key(secret_key: &str, date_stamp: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac_sha256(format!("AWS4{secret_key}").as_bytes(), date_stamp.as_bytes());
    let k_region = hmac_sha256(&k_date, region.as_bytes());
    let k_service = hmac_sha256(&k_region, service.as_bytes());
    hmac_sha256(&k_service, b"aws4_request")
}

/// Percent-encode an object key for the canonical URI
///
/// Every path segment is encoded; `/` separators are preserved. Unreserved
/// characters (RFC 3986) pass through unchanged.
pub(crate) fn uri_encode_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for byte in path.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' | b'/' => {
                out.push(byte as char);
            }
            _ => {
                use std::fmt::Write;
                let _ = write!(out, "%{byte:02X}");
            }
        }
    }
    out
}

/// Signs individual requests against a fixed credential scope
pub(crate) struct RequestSigner<'a> {
    pub access_key: &'a str,
    pub secret_key: &'a str,
    pub region: &'a str,
    pub service: &'a str,
}

/// Headers to attach to a signed request
pub(crate) struct SignedRequest {
    pub authorization: String,
    pub amz_date: String,
    pub payload_hash: String,
}

impl RequestSigner<'_> {
    /// Sign a request with no query string over the standard header set
    pub fn sign(
        &self,
        method: &str,
        host: &str,
        canonical_uri: &str,
        payload: &[u8],
        now: DateTime<Utc>,
    ) -> SignedRequest {
        let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
        let date_stamp = now.format("%Y%m%d").to_string();
        let payload_hash = sha256_hex(payload);

        let canonical_headers = format!(
            "host:{host}\nx-amz-content-sha256:{payload_hash}\nx-amz-date:{amz_date}\n"
        );
        let canonical_request = format!(
            "{method}\n{canonical_uri}\n\n{canonical_headers}\n{SIGNED_HEADERS}\n{payload_hash}"
        );

        let credential_scope = format!(
            "{date_stamp}/{}/{}/aws4_request",
            self.region, self.service
        );
        let string_to_sign = format!(
            "{ALGORITHM}\n{amz_date}\n{credential_scope}\n{}",
            sha256_hex(canonical_request.as_bytes())
        );

        let key = signing_key(self.secret_key, &date_stamp, self.region, self.service);
        let signature = hex_encode(&hmac_sha256(&key, string_to_sign.as_bytes()));

        let authorization = format!(
            "{ALGORITHM} Credential={}/{credential_scope}, SignedHeaders={SIGNED_HEADERS}, Signature={signature}",
            self.access_key
        );

        SignedRequest {
            authorization,
            amz_date,
            payload_hash,
        }
    }
}
