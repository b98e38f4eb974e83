// Purge API HTTP client
//
// Wraps `reqwest::Client` with EdgeGrid signing. The client sends exactly
// one request per call and reports the raw status and body; deciding what
// counts as success belongs to the caller.

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use tracing::{debug, trace};
use url::Url;

use crate::auth::ClientCredential;
use crate::edgegrid;
use crate::error::Error;
use crate::transport::TransportConfig;

/// Status and body of a completed purge request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurgeResponse {
    pub status: u16,
    pub body: String,
}

impl PurgeResponse {
    /// Both purge APIs answer an accepted request with `201 Created`.
    pub fn is_created(&self) -> bool {
        self.status == 201
    }

    /// Best-effort parse of the acknowledgement body.
    pub fn ack(&self) -> Option<PurgeAck> {
        serde_json::from_str(&self.body).ok()
    }
}

/// Acknowledgement fields returned by Fast Purge and ECCU.
///
/// Every field is optional: the two APIs return different subsets.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeAck {
    pub detail: Option<String>,
    pub purge_id: Option<String>,
    pub support_id: Option<String>,
    pub estimated_seconds: Option<u64>,
    pub request_id: Option<serde_json::Value>,
}

/// HTTP client for the purge endpoints.
pub struct PurgeClient {
    http: reqwest::Client,
}

impl PurgeClient {
    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
        })
    }

    /// Create a purge client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Send one signed `POST` with a JSON body.
    pub async fn post_json(
        &self,
        url: &Url,
        credential: &ClientCredential,
        body: &str,
    ) -> Result<PurgeResponse, Error> {
        let authorization = edgegrid::authorization_header(credential, "POST", url, body.as_bytes())?;

        debug!("POST {}", url);

        let resp = self
            .http
            .post(url.clone())
            .header(AUTHORIZATION, authorization)
            .header(CONTENT_TYPE, "application/json")
            .body(body.to_owned())
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp.text().await?;
        trace!(status, body = %body, "purge response");

        Ok(PurgeResponse { status, body })
    }
}
