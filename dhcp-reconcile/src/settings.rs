use std::collections::BTreeSet;

use conf_tree_core::ConfNode;
use serde::Deserialize;

/// One service family's settings, as real types.
///
/// The persisted document encodes boolean flags as bare elements (presence
/// means true). That encoding is confined to [`DhcpSettings::decode`] and
/// [`DhcpSettings::encode`]; everything else in the crate works with this
/// struct, so change detection is plain structural equality and can never
/// trip over encoding differences.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DhcpSettings {
    pub hide_disabled: bool,
    pub ha: HaSettings,
}

/// High-availability peer settings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HaSettings {
    pub enabled: bool,
    pub role: HaRole,
    pub local_name: Option<String>,
    pub remote_name: Option<String>,
    pub local_ip: Option<String>,
    pub remote_ip: Option<String>,
    pub local_port: Option<String>,
    pub remote_port: Option<String>,
    pub tls: TlsMode,
    pub tuning: HaTuning,
}

/// Which side of the HA pair this node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HaRole {
    #[default]
    Primary,
    Secondary,
}

impl HaRole {
    pub fn as_str(self) -> &'static str {
        match self {
            HaRole::Primary => "primary",
            HaRole::Secondary => "secondary",
        }
    }

    /// Unknown or missing role text falls back to the primary default.
    fn from_raw(raw: Option<&str>) -> Self {
        match raw {
            Some("secondary") => HaRole::Secondary,
            _ => HaRole::Primary,
        }
    }
}

/// TLS configuration for the HA peer link.
///
/// Modeled as one sum type so the cascading semantics are structural: no
/// TLS means no certificate references can exist, and mutual TLS cannot
/// exist without TLS.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TlsMode {
    #[default]
    Disabled,
    Tls {
        server_cert: Option<String>,
    },
    Mutual {
        server_cert: Option<String>,
        client_cert: Option<String>,
    },
}

/// Optional HA tuning values, kept as the raw strings the form supplies.
///
/// No defaulting happens here; the daemon configuration generator applies
/// the policy-table defaults for absent values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HaTuning {
    pub heartbeat_delay: Option<String>,
    pub max_response_delay: Option<String>,
    pub max_ack_delay: Option<String>,
    pub max_unacked_clients: Option<String>,
    pub max_rejected_lease_updates: Option<String>,
}

/// Raw user input for one settings submission.
///
/// Field presence is meaningful: an absent optional field deletes the
/// persisted value (full-replace semantics per field, not a merge), and
/// checkbox flags are plain booleans.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettingsInput {
    pub hide_disabled: bool,
    pub ha_enabled: bool,
    pub role: Option<String>,
    pub local_name: Option<String>,
    pub remote_name: Option<String>,
    pub local_ip: Option<String>,
    pub remote_ip: Option<String>,
    pub local_port: Option<String>,
    pub remote_port: Option<String>,
    pub tls: bool,
    pub mutual_tls: bool,
    pub server_cert: Option<String>,
    pub client_cert: Option<String>,
    pub heartbeat_delay: Option<String>,
    pub max_response_delay: Option<String>,
    pub max_ack_delay: Option<String>,
    pub max_unacked_clients: Option<String>,
    pub max_rejected_lease_updates: Option<String>,
    /// Interfaces selected for service in this family.
    pub interfaces: BTreeSet<String>,
}

impl DhcpSettings {
    /// Decode the persisted settings sub-document.
    ///
    /// A missing sub-document decodes to the defaults. Presence-as-true
    /// flags become real booleans here regardless of what truthy text an
    /// older writer may have stored inside them.
    pub fn decode(node: Option<&ConfNode>) -> Self {
        let Some(node) = node else {
            return Self::default();
        };
        Self {
            hide_disabled: node.get_child("hidedisabled").is_some(),
            ha: node.get_child("ha").map(HaSettings::decode).unwrap_or_default(),
        }
    }

    /// Build the proposed settings from raw input.
    ///
    /// Every field follows full-replace semantics: present in the input
    /// means kept, absent means dropped. The TLS flags collapse into
    /// [`TlsMode`], so an absent TLS flag drops the certificate references
    /// even when the input still carries values for them.
    pub fn from_input(input: &RawSettingsInput) -> Self {
        let tls = if !input.tls {
            TlsMode::Disabled
        } else if input.mutual_tls {
            TlsMode::Mutual {
                server_cert: input.server_cert.clone(),
                client_cert: input.client_cert.clone(),
            }
        } else {
            TlsMode::Tls {
                server_cert: input.server_cert.clone(),
            }
        };

        Self {
            hide_disabled: input.hide_disabled,
            ha: HaSettings {
                enabled: input.ha_enabled,
                role: HaRole::from_raw(input.role.as_deref()),
                local_name: input.local_name.clone(),
                remote_name: input.remote_name.clone(),
                local_ip: input.local_ip.clone(),
                remote_ip: input.remote_ip.clone(),
                local_port: input.local_port.clone(),
                remote_port: input.remote_port.clone(),
                tls,
                tuning: HaTuning {
                    heartbeat_delay: input.heartbeat_delay.clone(),
                    max_response_delay: input.max_response_delay.clone(),
                    max_ack_delay: input.max_ack_delay.clone(),
                    max_unacked_clients: input.max_unacked_clients.clone(),
                    max_rejected_lease_updates: input.max_rejected_lease_updates.clone(),
                },
            },
        }
    }

    /// Encode to the persisted sub-document form.
    pub fn encode(&self) -> ConfNode {
        let mut node = ConfNode::new("settings");
        if self.hide_disabled {
            node.children.push(ConfNode::new("hidedisabled"));
        }
        node.children.push(self.ha.encode());
        node
    }
}

impl HaSettings {
    fn decode(node: &ConfNode) -> Self {
        let tls = if node.get_child("tls").is_some() {
            if node.get_child("mutualtls").is_some() {
                TlsMode::Mutual {
                    server_cert: opt_text(node, "scertref"),
                    client_cert: opt_text(node, "ccertref"),
                }
            } else {
                TlsMode::Tls {
                    server_cert: opt_text(node, "scertref"),
                }
            }
        } else {
            TlsMode::Disabled
        };

        Self {
            enabled: node.get_child("enable").is_some(),
            role: HaRole::from_raw(node.get_path_text("role")),
            local_name: opt_text(node, "localname"),
            remote_name: opt_text(node, "remotename"),
            local_ip: opt_text(node, "localip"),
            remote_ip: opt_text(node, "remoteip"),
            local_port: opt_text(node, "localport"),
            remote_port: opt_text(node, "remoteport"),
            tls,
            tuning: HaTuning {
                heartbeat_delay: opt_text(node, "heartbeatdelay"),
                max_response_delay: opt_text(node, "maxresponsedelay"),
                max_ack_delay: opt_text(node, "maxackdelay"),
                max_unacked_clients: opt_text(node, "maxunackedclients"),
                max_rejected_lease_updates: opt_text(node, "maxrejectedleaseupdates"),
            },
        }
    }

    fn encode(&self) -> ConfNode {
        let mut ha = ConfNode::new("ha");
        if self.enabled {
            ha.children.push(ConfNode::new("enable"));
        }
        ha.push_text_child("role", self.role.as_str());
        push_opt(&mut ha, "localname", &self.local_name);
        push_opt(&mut ha, "remotename", &self.remote_name);
        push_opt(&mut ha, "localip", &self.local_ip);
        push_opt(&mut ha, "remoteip", &self.remote_ip);
        push_opt(&mut ha, "localport", &self.local_port);
        push_opt(&mut ha, "remoteport", &self.remote_port);
        match &self.tls {
            TlsMode::Disabled => {}
            TlsMode::Tls { server_cert } => {
                ha.children.push(ConfNode::new("tls"));
                push_opt(&mut ha, "scertref", server_cert);
            }
            TlsMode::Mutual {
                server_cert,
                client_cert,
            } => {
                ha.children.push(ConfNode::new("tls"));
                push_opt(&mut ha, "scertref", server_cert);
                ha.children.push(ConfNode::new("mutualtls"));
                push_opt(&mut ha, "ccertref", client_cert);
            }
        }
        push_opt(&mut ha, "heartbeatdelay", &self.tuning.heartbeat_delay);
        push_opt(&mut ha, "maxresponsedelay", &self.tuning.max_response_delay);
        push_opt(&mut ha, "maxackdelay", &self.tuning.max_ack_delay);
        push_opt(&mut ha, "maxunackedclients", &self.tuning.max_unacked_clients);
        push_opt(
            &mut ha,
            "maxrejectedleaseupdates",
            &self.tuning.max_rejected_lease_updates,
        );
        ha
    }
}

fn opt_text(node: &ConfNode, tag: &str) -> Option<String> {
    node.get_child(tag)
        .map(|child| child.text.as_deref().unwrap_or("").trim().to_string())
}

fn push_opt(node: &mut ConfNode, tag: &str, value: &Option<String>) {
    if let Some(value) = value {
        node.push_text_child(tag, value);
    }
}
