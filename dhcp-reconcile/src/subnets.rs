use std::collections::BTreeSet;
use std::net::{Ipv4Addr, Ipv6Addr};

use conf_tree_core::ConfigStore;
use serde::Serialize;

use crate::family::Family;

/// An interface eligible for DHCP service in one family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvailableInterface {
    pub id: String,
    pub label: String,
}

/// Interfaces eligible and enabled for one family's service.
///
/// Ephemeral: recomputed on every settings render and reconciliation pass.
/// `available` preserves the document's interface enumeration order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ServiceInterfaces {
    pub available: Vec<AvailableInterface>,
    pub enabled: BTreeSet<String>,
}

/// Scan configured interfaces for those eligible for the family's service.
///
/// IPv4 eligibility requires a statically assigned IPv4 address with a
/// subnet size strictly smaller than 31. IPv6 eligibility requires either a
/// delegated-prefix tracking mode or a valid non-link-local static IPv6
/// address. Eligible interfaces with the family's per-interface enable flag
/// set are also reported as enabled.
pub fn service_interfaces<S: ConfigStore>(store: &S, family: Family) -> ServiceInterfaces {
    let mut result = ServiceInterfaces::default();
    let Some(interfaces) = store.node("interfaces") else {
        return result;
    };

    for iface in &interfaces.children {
        let eligible = match family {
            Family::V4 => eligible_v4(iface.get_path_text("ipaddr"), iface.get_path_text("subnet")),
            Family::V6 => eligible_v6(iface.get_path_text("ipaddrv6")),
        };
        if !eligible {
            continue;
        }

        let id = iface.tag.clone();
        let descr = match iface.get_path_text("descr") {
            Some(descr) if !descr.is_empty() => descr.to_string(),
            _ => id.to_uppercase(),
        };
        result.available.push(AvailableInterface {
            label: format!("{descr} ({id})"),
            id: id.clone(),
        });
        if store.path_enabled(&format!("{}/{}/enable", family.interface_area(), id)) {
            result.enabled.insert(id);
        }
    }

    result
}

fn eligible_v4(ipaddr: Option<&str>, subnet: Option<&str>) -> bool {
    let Some(ipaddr) = ipaddr else {
        return false;
    };
    if ipaddr.parse::<Ipv4Addr>().is_err() {
        return false;
    }
    let Some(subnet) = subnet.filter(|s| !s.is_empty()) else {
        return false;
    };
    matches!(subnet.parse::<u8>(), Ok(bits) if bits < 31)
}

fn eligible_v6(ipaddrv6: Option<&str>) -> bool {
    let Some(ipaddrv6) = ipaddrv6 else {
        return false;
    };
    if ipaddrv6 == "track6" {
        return true;
    }
    match ipaddrv6.parse::<Ipv6Addr>() {
        Ok(addr) => !is_link_local(addr),
        Err(_) => false,
    }
}

fn is_link_local(addr: Ipv6Addr) -> bool {
    (addr.segments()[0] & 0xffc0) == 0xfe80
}
