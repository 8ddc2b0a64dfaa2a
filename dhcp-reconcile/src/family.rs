use std::fmt::{self, Display, Formatter};

use conf_tree_core::ConfigStore;

/// The IPv4 or IPv6 DHCP service family.
///
/// The two families are structurally parallel and independently configured:
/// each has its own settings namespace, its own per-interface configuration
/// area, and its own dirty-subsystem flag. All reconciliation and apply
/// logic is written once and parameterized by this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Path of the family's settings sub-document.
    pub fn settings_path(self) -> &'static str {
        match self {
            Family::V4 => "kea/dhcp4",
            Family::V6 => "kea/dhcp6",
        }
    }

    /// Path of the family's per-interface configuration area.
    pub fn interface_area(self) -> &'static str {
        match self {
            Family::V4 => "dhcpd",
            Family::V6 => "dhcpdv6",
        }
    }

    /// Dirty-subsystem name for the family's daemon.
    pub fn subsystem(self) -> &'static str {
        match self {
            Family::V4 => "dhcpd",
            Family::V6 => "dhcpdv6",
        }
    }

    /// Whether the DNS-registration integration is gated on the active
    /// backend. Only the IPv4 family carries this gate.
    pub fn dns_registration_needs_isc_backend(self) -> bool {
        matches!(self, Family::V4)
    }
}

impl Display for Family {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Family::V4 => write!(f, "dhcp4"),
            Family::V6 => write!(f, "dhcp6"),
        }
    }
}

/// The DHCP server implementation selected for the appliance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Isc,
    Kea,
}

/// Read the active backend from the document's `dhcpbackend` marker.
///
/// An absent or unrecognized marker means ISC, the pre-Kea default.
pub fn active_backend<S: ConfigStore>(store: &S) -> Backend {
    match store.get("dhcpbackend") {
        Some("kea") => Backend::Kea,
        _ => Backend::Isc,
    }
}
