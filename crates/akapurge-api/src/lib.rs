// akapurge-api: Signed HTTP client for the Akamai Fast Purge (CCU v3) and ECCU APIs

pub mod auth;
pub mod client;
pub mod edgegrid;
pub mod error;
pub mod transport;

pub use auth::ClientCredential;
pub use client::{PurgeAck, PurgeClient, PurgeResponse};
pub use error::Error;
pub use transport::TransportConfig;
