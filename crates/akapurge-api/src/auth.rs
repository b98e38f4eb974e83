use secrecy::{ExposeSecret, SecretString};

use crate::error::Error;

/// EdgeGrid client credential for one Akamai API client.
///
/// All four fields are required and non-blank; [`ClientCredential::new`]
/// refuses to build a partial credential. The token and secret fields are
/// kept behind [`SecretString`] so `Debug` output never leaks them.
#[derive(Debug, Clone)]
pub struct ClientCredential {
    host: String,
    client_token: SecretString,
    client_secret: SecretString,
    access_token: SecretString,
}

impl ClientCredential {
    pub fn new(
        host: impl Into<String>,
        client_token: impl Into<String>,
        client_secret: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, Error> {
        let host = non_blank(host.into(), "host")?;
        let client_token = non_blank(client_token.into(), "client_token")?;
        let client_secret = non_blank(client_secret.into(), "client_secret")?;
        let access_token = non_blank(access_token.into(), "access_token")?;

        Ok(Self {
            host,
            client_token: SecretString::from(client_token),
            client_secret: SecretString::from(client_secret),
            access_token: SecretString::from(access_token),
        })
    }

    /// API hostname, e.g. `akab-xxxx.purge.akamaiapis.net`.
    pub fn host(&self) -> &str {
        &self.host
    }

    pub(crate) fn client_token(&self) -> &str {
        self.client_token.expose_secret()
    }

    pub(crate) fn client_secret(&self) -> &str {
        self.client_secret.expose_secret()
    }

    pub(crate) fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

fn non_blank(value: String, field: &'static str) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::IncompleteCredential { field });
    }
    Ok(trimmed.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_complete_fields() {
        let cred = ClientCredential::new(" api.example.net ", "ct", "cs", "at").unwrap();
        assert_eq!(cred.host(), "api.example.net");
        assert_eq!(cred.client_token(), "ct");
        assert_eq!(cred.client_secret(), "cs");
        assert_eq!(cred.access_token(), "at");
    }

    #[test]
    fn blank_field_is_rejected() {
        let err = ClientCredential::new("api.example.net", "ct", "   ", "at").unwrap_err();
        assert!(matches!(
            err,
            Error::IncompleteCredential {
                field: "client_secret"
            }
        ));
    }

    #[test]
    fn debug_does_not_leak_secrets() {
        let cred = ClientCredential::new("api.example.net", "ct-123", "cs-456", "at-789").unwrap();
        let rendered = format!("{cred:?}");
        assert!(!rendered.contains("cs-456"));
        assert!(!rendered.contains("at-789"));
    }
}
