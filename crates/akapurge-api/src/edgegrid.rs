// EdgeGrid (EG1-HMAC-SHA256) request signing.
//
// Every Akamai OPEN API call carries an `Authorization` header derived from
// the client credential, a timestamp, a nonce, and a digest of the request.
// The signing key is itself an HMAC of the timestamp, so a signature is only
// valid around the moment it was produced.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

use crate::auth::ClientCredential;
use crate::error::Error;

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "EG1-HMAC-SHA256";

/// Request bodies beyond this many bytes are truncated before hashing.
pub const MAX_BODY: usize = 131_072;

/// Timestamp format required by EdgeGrid (always UTC).
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H:%M:%S+0000";

/// Sign a request with a fresh timestamp and nonce.
///
/// Returns the full `Authorization` header value.
pub fn authorization_header(
    credential: &ClientCredential,
    method: &str,
    url: &Url,
    body: &[u8],
) -> Result<String, Error> {
    let timestamp = chrono::Utc::now().format(TIMESTAMP_FORMAT).to_string();
    let nonce = uuid::Uuid::new_v4().to_string();
    sign(credential, method, url, body, &timestamp, &nonce)
}

/// Deterministic signing entry point: the caller supplies timestamp and nonce.
pub fn sign(
    credential: &ClientCredential,
    method: &str,
    url: &Url,
    body: &[u8],
    timestamp: &str,
    nonce: &str,
) -> Result<String, Error> {
    let auth_prefix = format!(
        "{ALGORITHM} client_token={};access_token={};timestamp={timestamp};nonce={nonce};",
        credential.client_token(),
        credential.access_token(),
    );

    let signing_key = STANDARD.encode(hmac_sha256(
        credential.client_secret().as_bytes(),
        timestamp.as_bytes(),
    )?);

    let method = method.to_ascii_uppercase();
    let data_to_sign = [
        method.as_str(),
        url.scheme(),
        &authority(url)?,
        &path_and_query(url),
        // No headers are included in the canonical header set.
        "",
        &content_hash(&method, body),
        &auth_prefix,
    ]
    .join("\t");

    let signature = STANDARD.encode(hmac_sha256(
        signing_key.as_bytes(),
        data_to_sign.as_bytes(),
    )?);

    Ok(format!("{auth_prefix}signature={signature}"))
}

fn hmac_sha256(key: &[u8], message: &[u8]) -> Result<Vec<u8>, Error> {
    let mut mac =
        HmacSha256::new_from_slice(key).map_err(|e| Error::Signing(format!("HMAC key: {e}")))?;
    mac.update(message);
    Ok(mac.finalize().into_bytes().to_vec())
}

/// `host[:port]`, with the port only when it is not the scheme default.
fn authority(url: &Url) -> Result<String, Error> {
    let host = url
        .host_str()
        .ok_or_else(|| Error::Signing(format!("URL has no host: {url}")))?;
    Ok(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_owned(),
    })
}

fn path_and_query(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{query}", url.path()),
        None => url.path().to_owned(),
    }
}

/// Only POST bodies are hashed; everything else signs an empty digest.
fn content_hash(method: &str, body: &[u8]) -> String {
    if method != "POST" || body.is_empty() {
        return String::new();
    }
    let hashed = &body[..body.len().min(MAX_BODY)];
    STANDARD.encode(Sha256::digest(hashed))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const TIMESTAMP: &str = "20261015T08:30:00+0000";
    const NONCE: &str = "6a3b1c2d-0000-4000-8000-123456789abc";

    fn credential() -> ClientCredential {
        ClientCredential::new(
            "akab-host.purge.akamaiapis.net",
            "akab-client-token",
            "secret-of-client",
            "akab-access-token",
        )
        .unwrap()
    }

    #[test]
    fn signs_post_with_body_hash() {
        let url = Url::parse("https://akab-host.purge.akamaiapis.net/ccu/v3/invalidate/tag/production")
            .unwrap();
        let header = sign(
            &credential(),
            "POST",
            &url,
            br#"{"objects":["promo","home"]}"#,
            TIMESTAMP,
            NONCE,
        )
        .unwrap();

        assert_eq!(
            header,
            "EG1-HMAC-SHA256 client_token=akab-client-token;access_token=akab-access-token;\
             timestamp=20261015T08:30:00+0000;nonce=6a3b1c2d-0000-4000-8000-123456789abc;\
             signature=lrIYk1RxWLyvk8dfUmz69nRBQ37HwpDugtKKAa8RbK8="
        );
    }

    #[test]
    fn get_requests_skip_body_hash_and_keep_query() {
        let url = Url::parse("https://akab-host.purge.akamaiapis.net/ccu/v3/status?id=1").unwrap();
        let header = sign(&credential(), "get", &url, b"ignored", TIMESTAMP, NONCE).unwrap();
        assert!(header.ends_with("signature=YuWpzErQaLtJtIbvq0+bflyP0yyg5RD7obLNWKomgJs="));
    }

    #[test]
    fn content_hash_of_post_body() {
        assert_eq!(
            content_hash("POST", br#"{"objects":["promo","home"]}"#),
            "Jz/ti37IB3u/Z/rjY1+9ZmL3kFn4WN4/pmvOmbClFdQ="
        );
        assert_eq!(content_hash("POST", b""), "");
        assert_eq!(content_hash("PUT", b"data"), "");
    }

    #[test]
    fn content_hash_truncates_large_bodies() {
        let big = vec![b'x'; MAX_BODY + 10];
        assert_eq!(
            content_hash("POST", &big),
            content_hash("POST", &big[..MAX_BODY])
        );
    }

    #[test]
    fn authority_includes_non_default_port() {
        let url = Url::parse("http://127.0.0.1:8080/eccu-api/v1/requests").unwrap();
        assert_eq!(authority(&url).unwrap(), "127.0.0.1:8080");

        let url = Url::parse("https://example.com:443/x").unwrap();
        assert_eq!(authority(&url).unwrap(), "example.com");
    }

    #[test]
    fn fresh_header_has_expected_shape() {
        let url = Url::parse("https://akab-host.purge.akamaiapis.net/x").unwrap();
        let header = authorization_header(&credential(), "POST", &url, b"{}").unwrap();
        assert!(header.starts_with("EG1-HMAC-SHA256 client_token=akab-client-token;"));
        assert!(header.contains(";signature="));
        assert!(!header.contains("secret-of-client"));
    }
}
