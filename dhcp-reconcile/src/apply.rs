use conf_tree_core::ConfigStore;

use crate::family::{active_backend, Backend, Family};

/// Downstream configure-operation status: 0 is success, anything else failed.
pub type StatusCode = i32;

/// The downstream subsystems the orchestrator can drive.
///
/// Each configure operation blocks until the subsystem has consumed the
/// persisted configuration and returns a status code. The DNS add-on
/// configure operations reconfigure the DHCP daemon internally, which is why
/// the orchestrator never calls the daemon separately on those branches.
pub trait Subsystems {
    /// Reconfigure the family's DHCP daemon directly.
    fn configure_dhcp_daemon(&mut self, family: Family) -> StatusCode;

    /// Reconfigure the DNS-registration add-on (resolver); also
    /// reconfigures the DHCP daemon as a side effect.
    fn configure_dns_registration(&mut self) -> StatusCode;

    /// Reconfigure the name-resolution add-on (forwarder); also
    /// reconfigures the DHCP daemon as a side effect.
    fn configure_name_resolution(&mut self) -> StatusCode;

    /// Recompile and reload the firewall rules.
    fn recompile_firewall_rules(&mut self) -> StatusCode;

    /// Whether the zone-transfer add-on's support file is present.
    fn zone_transfer_available(&self) -> bool;

    /// Trigger a zone-transfer resync. Fire and forget: no status contract.
    fn resync_zone_transfer(&mut self);
}

/// Apply pending configuration changes for one family.
///
/// Exactly one of the three daemon branches runs, in priority order:
/// DNS-registration add-on, name-resolution add-on, plain DHCP daemon. On
/// success each branch clears the dirty flags it covered. The zone-transfer
/// resync is best-effort and excluded from the aggregate; the firewall
/// recompilation always runs last and is included. Returns 0 on success, 1
/// when any aggregated operation failed. A failure leaves the dirty flags
/// set so the next apply pass retries naturally.
pub fn apply_changes<S: ConfigStore, X: Subsystems>(
    store: &mut S,
    subsystems: &mut X,
    family: Family,
) -> StatusCode {
    let mut failed = false;

    if dns_registration_active(store, family) {
        let code = subsystems.configure_dns_registration();
        if code == 0 {
            store.clear_dirty("hosts");
            store.clear_dirty(family.subsystem());
        } else {
            failed = true;
        }
    } else if name_resolution_active(store) {
        let code = subsystems.configure_name_resolution();
        if code == 0 {
            store.clear_dirty("dnsmasq");
            store.clear_dirty("hosts");
            store.clear_dirty(family.subsystem());
        } else {
            failed = true;
        }
    } else {
        let code = subsystems.configure_dhcp_daemon(family);
        if code == 0 {
            store.clear_dirty(family.subsystem());
        } else {
            failed = true;
        }
    }

    if zone_transfer_wanted(store) && subsystems.zone_transfer_available() {
        subsystems.resync_zone_transfer();
    }

    if subsystems.recompile_firewall_rules() != 0 {
        failed = true;
    }

    if failed {
        1
    } else {
        0
    }
}

/// DNS-registration branch gate: resolver enabled, auto-registration of
/// DHCP static entries on, and (IPv4 only) the active backend is the one
/// that supports the integration.
fn dns_registration_active<S: ConfigStore>(store: &S, family: Family) -> bool {
    if !store.path_enabled("unbound/enable") || !store.path_enabled("unbound/regdhcpstatic") {
        return false;
    }
    !family.dns_registration_needs_isc_backend() || active_backend(store) == Backend::Isc
}

fn name_resolution_active<S: ConfigStore>(store: &S) -> bool {
    store.path_enabled("dnsmasq/enable") && store.path_enabled("dnsmasq/regdhcpstatic")
}

/// Zone-transfer resync gate: add-on package installed and enabled, with at
/// least one zone registering DHCP static entries.
fn zone_transfer_wanted<S: ConfigStore>(store: &S) -> bool {
    if !store.path_enabled("installedpackages/bind/config/0/enable_bind") {
        return false;
    }
    let Some(zones) = store.node("installedpackages/bindzone") else {
        return false;
    };
    zones
        .get_children("config")
        .iter()
        .any(|zone| zone.get_child("regdhcpstatic").is_some())
}

/// Recording executor used by the CLI: prints nothing, performs nothing,
/// just remembers which operations an apply pass would invoke.
#[derive(Debug, Default)]
pub struct PlanExecutor {
    pub actions: Vec<String>,
}

impl Subsystems for PlanExecutor {
    fn configure_dhcp_daemon(&mut self, family: Family) -> StatusCode {
        self.actions.push(format!("configure {family} daemon"));
        0
    }

    fn configure_dns_registration(&mut self) -> StatusCode {
        self.actions
            .push("configure DNS resolver (registers DHCP static entries, reloads daemon)".to_string());
        0
    }

    fn configure_name_resolution(&mut self) -> StatusCode {
        self.actions
            .push("configure DNS forwarder (registers DHCP static entries, reloads daemon)".to_string());
        0
    }

    fn recompile_firewall_rules(&mut self) -> StatusCode {
        self.actions.push("recompile firewall rules".to_string());
        0
    }

    fn zone_transfer_available(&self) -> bool {
        true
    }

    fn resync_zone_transfer(&mut self) {
        self.actions.push("resync zone-transfer add-on".to_string());
    }
}
