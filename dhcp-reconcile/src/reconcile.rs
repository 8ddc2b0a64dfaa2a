use std::collections::BTreeSet;

use conf_tree_core::{ConfNode, ConfigStore, StoreError};

use crate::family::Family;
use crate::settings::{DhcpSettings, RawSettingsInput};
use crate::validate::{validate, ValidationIssue};

/// Result of one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcileOutcome {
    /// Validation failures; non-empty means nothing was persisted.
    pub issues: Vec<ValidationIssue>,
    /// The proposed settings, persisted only when `issues` is empty and a
    /// change was detected.
    pub settings: DhcpSettings,
    /// Whether anything differed from the persisted baseline.
    pub changed: bool,
    /// Whether the interface selection changed, forcing a daemon resync.
    pub need_sync: bool,
}

/// Merge raw input into the persisted settings for one family.
///
/// The baseline is decoded before mutation so change detection compares
/// real values rather than persisted encodings. Validation failures abort
/// with no side effects. A detected change persists the whole document
/// transactionally; the family's subsystem is marked dirty only when the
/// interface selection or the HA sub-tree actually changed, so cosmetic
/// edits never trigger a daemon resync. Calling this twice with identical
/// input is a no-op the second time.
pub fn reconcile<S: ConfigStore>(
    store: &mut S,
    family: Family,
    current_enabled: &BTreeSet<String>,
    input: &RawSettingsInput,
) -> Result<ReconcileOutcome, StoreError> {
    let baseline = DhcpSettings::decode(store.node(family.settings_path()));
    let proposed = DhcpSettings::from_input(input);

    let issues = validate(&proposed);
    if !issues.is_empty() {
        return Ok(ReconcileOutcome {
            issues,
            settings: proposed,
            changed: false,
            need_sync: false,
        });
    }

    let mut changed = proposed != baseline;
    let mut need_sync = false;

    for id in input.interfaces.difference(current_enabled) {
        store.set_node(&enable_flag(family, id), ConfNode::new("enable"));
        changed = true;
        need_sync = true;
    }
    for id in current_enabled.difference(&input.interfaces) {
        store.delete(&enable_flag(family, id));
        changed = true;
        need_sync = true;
    }

    if changed {
        store.set_node(family.settings_path(), proposed.encode());
        store.write(&format!("{family} settings reconciled"))?;
        if need_sync || proposed.ha != baseline.ha {
            store.mark_dirty(family.subsystem());
        }
    }

    Ok(ReconcileOutcome {
        issues: Vec::new(),
        settings: proposed,
        changed,
        need_sync,
    })
}

fn enable_flag(family: Family, id: &str) -> String {
    format!("{}/{}/enable", family.interface_area(), id)
}
