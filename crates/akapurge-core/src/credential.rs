// ── Credential resolution ──
//
// Both API families use the same four-field EdgeGrid credential, read from
// disjoint key sets of the settings map: `fastpurge_*` for CCU v3 and
// `eccu_*` for directory purges.

use akapurge_api::ClientCredential;
use strum::Display;

use crate::error::PurgeError;
use crate::settings::Settings;

/// Which API family a credential is read for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum KeyNamespace {
    #[strum(serialize = "fastpurge")]
    FastPurge,
    #[strum(serialize = "eccu")]
    Eccu,
}

impl KeyNamespace {
    /// Full settings key for one credential field, e.g. `eccu_access_token`.
    pub fn key(self, field: &str) -> String {
        format!("{self}_{field}")
    }
}

const HOST: &str = "host";
const CLIENT_TOKEN: &str = "client_token";
const CLIENT_SECRET: &str = "client_secret";
const ACCESS_TOKEN: &str = "access_token";

/// Build the credential for `namespace`, failing on any missing or blank field.
///
/// Every missing key is reported at once; no partial credential is ever built.
pub fn resolve(settings: &Settings, namespace: KeyNamespace) -> Result<ClientCredential, PurgeError> {
    let lookup = |field: &str| settings.get(&namespace.key(field));

    let (Some(host), Some(client_token), Some(client_secret), Some(access_token)) = (
        lookup(HOST),
        lookup(CLIENT_TOKEN),
        lookup(CLIENT_SECRET),
        lookup(ACCESS_TOKEN),
    ) else {
        let missing = [HOST, CLIENT_SECRET, CLIENT_TOKEN, ACCESS_TOKEN]
            .into_iter()
            .filter(|&field| lookup(field).is_none())
            .map(|field| namespace.key(field))
            .collect();
        return Err(PurgeError::IncompleteConfig { namespace, missing });
    };

    ClientCredential::new(host, client_token, client_secret, access_token).map_err(|err| {
        PurgeError::IncompleteConfig {
            namespace,
            missing: vec![err.to_string()],
        }
    })
}
