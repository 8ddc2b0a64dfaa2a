use std::str::FromStr;

use conf_tree_core::ConfigStore;
use thiserror::Error;

/// Product identity used when the system has no configured hostname.
pub const PRODUCT_NAME: &str = "pfSense";

/// The closed set of HA tuning parameters with fixed defaults, plus the
/// local identity name.
///
/// This is a closed enumeration, not a general lookup table: asking for
/// anything outside this set is a programmer error and fails loudly at the
/// string-parsing boundary with [`DefaultsError::UnknownKey`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultKey {
    HeartbeatDelay,
    ListenPort,
    MaxAckDelay,
    MaxRejectedLeaseUpdates,
    MaxResponseDelay,
    MaxUnackedClients,
    Name,
}

#[derive(Debug, Error)]
pub enum DefaultsError {
    #[error("unknown default key: {0}")]
    UnknownKey(String),
}

impl FromStr for DefaultKey {
    type Err = DefaultsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "heartbeatdelay" => Ok(DefaultKey::HeartbeatDelay),
            "listenport" => Ok(DefaultKey::ListenPort),
            "maxackdelay" => Ok(DefaultKey::MaxAckDelay),
            "maxrejectedleaseupdates" => Ok(DefaultKey::MaxRejectedLeaseUpdates),
            "maxresponsedelay" => Ok(DefaultKey::MaxResponseDelay),
            "maxunackedclients" => Ok(DefaultKey::MaxUnackedClients),
            "name" => Ok(DefaultKey::Name),
            other => Err(DefaultsError::UnknownKey(other.to_string())),
        }
    }
}

impl DefaultKey {
    /// The persisted key name for this default.
    pub fn as_str(self) -> &'static str {
        match self {
            DefaultKey::HeartbeatDelay => "heartbeatdelay",
            DefaultKey::ListenPort => "listenport",
            DefaultKey::MaxAckDelay => "maxackdelay",
            DefaultKey::MaxRejectedLeaseUpdates => "maxrejectedleaseupdates",
            DefaultKey::MaxResponseDelay => "maxresponsedelay",
            DefaultKey::MaxUnackedClients => "maxunackedclients",
            DefaultKey::Name => "name",
        }
    }

    /// All keys, in persisted-name order.
    pub fn all() -> [DefaultKey; 7] {
        [
            DefaultKey::HeartbeatDelay,
            DefaultKey::ListenPort,
            DefaultKey::MaxAckDelay,
            DefaultKey::MaxRejectedLeaseUpdates,
            DefaultKey::MaxResponseDelay,
            DefaultKey::MaxUnackedClients,
            DefaultKey::Name,
        ]
    }
}

/// Resolve the default value for a key.
///
/// All tuning values are fixed constants. `Name` resolves dynamically to the
/// system's configured hostname, falling back to [`PRODUCT_NAME`] when the
/// hostname is unset or blank.
pub fn default_value<S: ConfigStore>(store: &S, key: DefaultKey) -> String {
    match key {
        DefaultKey::HeartbeatDelay => "10000".to_string(),
        DefaultKey::ListenPort => "8765".to_string(),
        DefaultKey::MaxAckDelay => "10000".to_string(),
        DefaultKey::MaxRejectedLeaseUpdates => "10".to_string(),
        DefaultKey::MaxResponseDelay => "60000".to_string(),
        DefaultKey::MaxUnackedClients => "10".to_string(),
        DefaultKey::Name => match store.get("system/hostname") {
            Some(hostname) if !hostname.is_empty() => hostname.to_string(),
            _ => PRODUCT_NAME.to_string(),
        },
    }
}

/// The heartbeat delay default in milliseconds, as a number.
///
/// The status classifier needs this when the persisted settings leave the
/// heartbeat delay unset.
pub fn heartbeat_delay_ms() -> u64 {
    10_000
}

#[cfg(test)]
mod tests {
    use conf_tree_core::{parse, DocumentStore};

    use super::{default_value, DefaultKey, DefaultsError, PRODUCT_NAME};

    fn store(xml: &[u8]) -> DocumentStore {
        DocumentStore::new(parse(xml).expect("parse"))
    }

    #[test]
    fn every_key_round_trips_through_its_name() {
        for key in DefaultKey::all() {
            assert_eq!(key.as_str().parse::<DefaultKey>().unwrap(), key);
        }
    }

    #[test]
    fn unknown_key_fails_loudly() {
        let err = "listenaddr".parse::<DefaultKey>().unwrap_err();
        assert!(matches!(err, DefaultsError::UnknownKey(k) if k == "listenaddr"));
    }

    #[test]
    fn tuning_defaults_are_fixed_constants() {
        let store = store(b"<conf/>");
        assert_eq!(default_value(&store, DefaultKey::HeartbeatDelay), "10000");
        assert_eq!(default_value(&store, DefaultKey::ListenPort), "8765");
        assert_eq!(default_value(&store, DefaultKey::MaxAckDelay), "10000");
        assert_eq!(
            default_value(&store, DefaultKey::MaxRejectedLeaseUpdates),
            "10"
        );
        assert_eq!(default_value(&store, DefaultKey::MaxResponseDelay), "60000");
        assert_eq!(default_value(&store, DefaultKey::MaxUnackedClients), "10");
    }

    #[test]
    fn name_prefers_configured_hostname() {
        let store = store(b"<conf><system><hostname>edge-fw</hostname></system></conf>");
        assert_eq!(default_value(&store, DefaultKey::Name), "edge-fw");
    }

    #[test]
    fn name_falls_back_to_product_identity() {
        let store = store(b"<conf><system><hostname> </hostname></system></conf>");
        assert_eq!(default_value(&store, DefaultKey::Name), PRODUCT_NAME);
        let store = self::store(b"<conf/>");
        assert_eq!(default_value(&store, DefaultKey::Name), PRODUCT_NAME);
    }
}
