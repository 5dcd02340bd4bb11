//! Groups a flat session collection into display partitions.

use super::model::{CustomSessionGroup, DEFAULT_GROUP_ID, Session, SessionGroup};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What to do with a session whose `group` names a group that does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrphanGroupPolicy {
    /// Show the session in the default partition.
    #[default]
    FallbackToDefault,
    /// Leave the session out of every partition.
    Drop,
}

/// The three display buckets derived from a session collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionPartitions {
    pub pinned: Vec<Session>,
    pub custom_groups: Vec<CustomSessionGroup>,
    pub default: Vec<Session>,
}

/// Partitions `sessions` into pinned, custom-group and default buckets.
///
/// Order within every bucket follows the input order. A group record with
/// the reserved default id never becomes a custom group; its sessions stay in
/// the default bucket.
pub fn partition_sessions(
    sessions: &[Session],
    groups: &[SessionGroup],
    orphan_policy: OrphanGroupPolicy,
) -> SessionPartitions {
    let custom = || groups.iter().filter(|g| g.id != DEFAULT_GROUP_ID);
    let known: HashSet<&str> = custom().map(|g| g.id.as_str()).collect();

    let custom_groups = custom()
        .map(|group| CustomSessionGroup {
            id: group.id.clone(),
            name: group.name.clone(),
            children: sessions
                .iter()
                .filter(|s| s.in_group(&group.id) && !s.pinned)
                .cloned()
                .collect(),
        })
        .collect();

    let default = sessions
        .iter()
        .filter(|s| !s.pinned)
        .filter(|s| {
            if s.is_ungrouped() {
                return true;
            }
            let orphaned = s.group.as_deref().is_some_and(|g| !known.contains(g));
            orphaned && orphan_policy == OrphanGroupPolicy::FallbackToDefault
        })
        .cloned()
        .collect();

    let pinned = sessions.iter().filter(|s| s.pinned).cloned().collect();

    SessionPartitions {
        pinned,
        custom_groups,
        default,
    }
}
