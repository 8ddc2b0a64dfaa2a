use std::net::IpAddr;

use serde::Serialize;

use crate::settings::DhcpSettings;

/// One user-facing validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    pub code: String,
    pub message: String,
}

fn issue(code: &str, message: &str) -> ValidationIssue {
    ValidationIssue {
        code: code.to_string(),
        message: message.to_string(),
    }
}

/// Validate a proposed settings snapshot.
///
/// Every rule is evaluated; nothing short-circuits, so the caller gets all
/// violations at once in a stable order. An empty list means valid. The
/// function is side-effect free.
pub fn validate(settings: &DhcpSettings) -> Vec<ValidationIssue> {
    let ha = &settings.ha;
    let mut issues = Vec::new();

    if let Some(name) = non_empty(&ha.local_name) {
        if !is_hostname_like(name) {
            issues.push(issue(
                "ha_local_name",
                "The local name must be a valid hostname.",
            ));
        }
    }

    match non_empty(&ha.remote_name) {
        None if ha.enabled => issues.push(issue(
            "ha_remote_name_required",
            "A remote name is required when High Availability is enabled.",
        )),
        Some(name) if !is_hostname_like(name) => issues.push(issue(
            "ha_remote_name",
            "The remote name must be a valid hostname.",
        )),
        _ => {}
    }

    for (value, code, required_msg, invalid_msg) in [
        (
            &ha.local_ip,
            "ha_local_ip",
            "A local address is required when High Availability is enabled.",
            "The local address must be a valid IPv4 or IPv6 address.",
        ),
        (
            &ha.remote_ip,
            "ha_remote_ip",
            "A remote address is required when High Availability is enabled.",
            "The remote address must be a valid IPv4 or IPv6 address.",
        ),
    ] {
        match non_empty(value) {
            None if ha.enabled => issues.push(issue(code, required_msg)),
            Some(addr) if !is_ip_address(addr) => issues.push(issue(code, invalid_msg)),
            _ => {}
        }
    }

    for (value, code, msg) in [
        (
            &ha.local_port,
            "ha_local_port",
            "The local port must be a valid port number.",
        ),
        (
            &ha.remote_port,
            "ha_remote_port",
            "The remote port must be a valid port number.",
        ),
    ] {
        if let Some(port) = non_empty(value) {
            if !is_port(port) {
                issues.push(issue(code, msg));
            }
        }
    }

    let tuning = &ha.tuning;
    for (value, code, msg) in [
        (
            &tuning.heartbeat_delay,
            "ha_heartbeat_delay",
            "The heartbeat delay must be numeric.",
        ),
        (
            &tuning.max_response_delay,
            "ha_max_response_delay",
            "The maximum response delay must be numeric.",
        ),
        (
            &tuning.max_ack_delay,
            "ha_max_ack_delay",
            "The maximum ACK delay must be numeric.",
        ),
        (
            &tuning.max_unacked_clients,
            "ha_max_unacked_clients",
            "The maximum unacked clients value must be numeric.",
        ),
        (
            &tuning.max_rejected_lease_updates,
            "ha_max_rejected_lease_updates",
            "The maximum rejected lease updates value must be numeric.",
        ),
    ] {
        if let Some(raw) = non_empty(value) {
            if !raw.bytes().all(|b| b.is_ascii_digit()) {
                issues.push(issue(code, msg));
            }
        }
    }

    issues
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Hostname syntax check: dot-separated labels of letters, digits, and
/// hyphens, with no empty labels and no leading or trailing hyphen.
pub fn is_hostname_like(value: &str) -> bool {
    if value.is_empty() || value.len() > 253 {
        return false;
    }
    value.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && label.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-')
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}

/// Syntactically valid IPv4 or IPv6 literal.
pub fn is_ip_address(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

/// All-digit string naming a valid port (1-65535).
pub fn is_port(value: &str) -> bool {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    matches!(value.parse::<u32>(), Ok(port) if (1..=65_535).contains(&port))
}

#[cfg(test)]
mod tests {
    use crate::settings::{DhcpSettings, RawSettingsInput};

    use super::{is_hostname_like, is_ip_address, is_port, validate};

    #[test]
    fn ha_disabled_with_empty_fields_is_valid() {
        let settings = DhcpSettings::from_input(&RawSettingsInput::default());
        assert!(validate(&settings).is_empty());
    }

    #[test]
    fn ha_enabled_with_missing_peers_yields_three_errors_in_order() {
        let settings = DhcpSettings::from_input(&RawSettingsInput {
            ha_enabled: true,
            remote_name: Some(String::new()),
            local_ip: Some(String::new()),
            remote_ip: Some(String::new()),
            ..RawSettingsInput::default()
        });
        let issues = validate(&settings);
        let codes: Vec<&str> = issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(
            codes,
            ["ha_remote_name_required", "ha_local_ip", "ha_remote_ip"]
        );
    }

    #[test]
    fn invalid_names_and_addresses_are_all_collected() {
        let settings = DhcpSettings::from_input(&RawSettingsInput {
            ha_enabled: true,
            local_name: Some("bad_host!".to_string()),
            remote_name: Some("-edge".to_string()),
            local_ip: Some("10.0.0.999".to_string()),
            remote_ip: Some("fe80::1".to_string()),
            local_port: Some("70000".to_string()),
            remote_port: Some("8765".to_string()),
            ..RawSettingsInput::default()
        });
        let codes: Vec<String> = validate(&settings).into_iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            ["ha_local_name", "ha_remote_name", "ha_local_ip", "ha_local_port"]
        );
    }

    #[test]
    fn optional_fields_are_ignored_when_ha_disabled() {
        let settings = DhcpSettings::from_input(&RawSettingsInput {
            remote_name: Some("fw-b.example".to_string()),
            local_port: Some("8765".to_string()),
            ..RawSettingsInput::default()
        });
        assert!(validate(&settings).is_empty());
    }

    #[test]
    fn non_numeric_tuning_values_are_rejected() {
        let settings = DhcpSettings::from_input(&RawSettingsInput {
            heartbeat_delay: Some("fast".to_string()),
            max_unacked_clients: Some("10".to_string()),
            ..RawSettingsInput::default()
        });
        let codes: Vec<String> = validate(&settings).into_iter().map(|i| i.code).collect();
        assert_eq!(codes, ["ha_heartbeat_delay"]);
    }

    #[test]
    fn hostname_syntax() {
        assert!(is_hostname_like("fw-a"));
        assert!(is_hostname_like("fw-a.example.org"));
        assert!(!is_hostname_like("fw_a"));
        assert!(!is_hostname_like(".example"));
        assert!(!is_hostname_like("-edge"));
        assert!(!is_hostname_like("edge-"));
    }

    #[test]
    fn ip_syntax() {
        assert!(is_ip_address("10.0.0.1"));
        assert!(is_ip_address("2001:db8::1"));
        assert!(!is_ip_address("10.0.0.999"));
        assert!(!is_ip_address("example.org"));
    }

    #[test]
    fn port_syntax() {
        assert!(is_port("1"));
        assert!(is_port("65535"));
        assert!(!is_port("0"));
        assert!(!is_port("65536"));
        assert!(!is_port("8765x"));
        assert!(!is_port(""));
    }
}
