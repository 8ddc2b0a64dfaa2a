use serde::Deserialize;

/// Liveness signals for one HA peer, read fresh from a live status query.
///
/// Never cached: a status render queries the running subsystem each time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct PeerHealth {
    /// Seconds since the last heartbeat, when known.
    pub age: Option<u64>,
    /// Whether the peer has been in touch at all.
    pub in_touch: bool,
    /// Whether the peer reports its communication as interrupted.
    pub communication_interrupted: bool,
}

/// Which peer a health record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaScope {
    Local,
    Remote,
}

/// Tri-state HA health, ordered by escalation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HaHealth {
    Online,
    Interrupted,
    Offline,
}

impl HaHealth {
    pub fn label(self) -> &'static str {
        match self {
            HaHealth::Online => "online",
            HaHealth::Interrupted => "interrupted",
            HaHealth::Offline => "offline",
        }
    }
}

/// Classify a peer's HA health from its liveness signals.
///
/// The local peer is always online; no liveness check is performed on self.
/// For the remote peer the heartbeat threshold is the configured delay in
/// milliseconds converted to seconds plus a two-second grace period. Checks
/// only ever escalate: an out-of-touch or interrupted peer is offline no
/// matter how fresh its last heartbeat.
pub fn classify(scope: HaScope, peer: &PeerHealth, heartbeat_delay_ms: u64) -> HaHealth {
    if scope == HaScope::Local {
        return HaHealth::Online;
    }

    let threshold_secs = heartbeat_delay_ms / 1_000 + 2;
    let mut health = HaHealth::Online;
    if peer.age.is_some_and(|age| age >= threshold_secs) {
        health = HaHealth::Interrupted;
    }
    if !peer.in_touch || peer.communication_interrupted {
        health = HaHealth::Offline;
    }
    health
}

#[cfg(test)]
mod tests {
    use super::{classify, HaHealth, HaScope, PeerHealth};

    fn peer(age: u64, in_touch: bool, interrupted: bool) -> PeerHealth {
        PeerHealth {
            age: Some(age),
            in_touch,
            communication_interrupted: interrupted,
        }
    }

    #[test]
    fn local_scope_is_always_online() {
        let dead = peer(99_999, false, true);
        assert_eq!(classify(HaScope::Local, &dead, 10_000), HaHealth::Online);
    }

    #[test]
    fn fresh_remote_peer_is_online() {
        // 10s delay becomes a 12s threshold; 5 < 12.
        let p = peer(5, true, false);
        assert_eq!(classify(HaScope::Remote, &p, 10_000), HaHealth::Online);
    }

    #[test]
    fn stale_heartbeat_is_interrupted() {
        let p = peer(20, true, false);
        assert_eq!(classify(HaScope::Remote, &p, 10_000), HaHealth::Interrupted);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let p = peer(12, true, false);
        assert_eq!(classify(HaScope::Remote, &p, 10_000), HaHealth::Interrupted);
        let p = peer(11, true, false);
        assert_eq!(classify(HaScope::Remote, &p, 10_000), HaHealth::Online);
    }

    #[test]
    fn out_of_touch_overrides_fresh_age() {
        let p = peer(1, false, false);
        assert_eq!(classify(HaScope::Remote, &p, 10_000), HaHealth::Offline);
    }

    #[test]
    fn communication_interrupted_overrides_stale_age() {
        let p = peer(20, true, true);
        assert_eq!(classify(HaScope::Remote, &p, 10_000), HaHealth::Offline);
    }

    #[test]
    fn unknown_age_stays_online_when_in_touch() {
        let p = PeerHealth {
            age: None,
            in_touch: true,
            communication_interrupted: false,
        };
        assert_eq!(classify(HaScope::Remote, &p, 10_000), HaHealth::Online);
    }

    #[test]
    fn severities_escalate_in_order() {
        assert!(HaHealth::Online < HaHealth::Interrupted);
        assert!(HaHealth::Interrupted < HaHealth::Offline);
    }
}
