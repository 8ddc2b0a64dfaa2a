//! DHCP service settings reconciliation and HA coordination.
//!
//! This library is the control-plane decision layer for a DHCP service
//! embedded in a network appliance: it merges proposed settings into the
//! persisted configuration document, validates them against network and HA
//! constraints, computes per-interface enable/disable deltas, and decides
//! which downstream subsystems must be reconfigured and in what order.
//!
//! The IPv4 and IPv6 service families are two instantiations of the same
//! generic components, parameterized by [`family::Family`].
//!
//! # Functional areas
//!
//! - [`defaults`] — fixed HA tuning defaults and the local identity name
//! - [`age`] — human-readable elapsed-time rendering for heartbeat ages
//! - [`status`] — tri-state HA peer health classification
//! - [`settings`] — typed settings model with the persisted encoding
//!   isolated at the store boundary
//! - [`validate`] — ordered, user-facing settings validation
//! - [`reconcile`] — merge, diff, persist, and dirty-mark decisions
//! - [`apply`] — downstream configure-operation orchestration
//! - [`subnets`] — interface eligibility for IPv4 subnets and IPv6 prefixes
//! - [`certs`] — certificate eligibility for mutual-TLS peer links
//!
//! The persisted configuration document, the running daemons, the firewall
//! rule compiler, and the certificate store are all external collaborators,
//! reached only through the contracts in `conf-tree-core` and the
//! [`apply::Subsystems`] and [`certs::CertificateDirectory`] traits.

pub mod age;
pub mod apply;
pub mod certs;
pub mod defaults;
pub mod family;
pub mod reconcile;
pub mod settings;
pub mod status;
pub mod subnets;
pub mod validate;
