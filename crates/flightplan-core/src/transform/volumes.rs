//! Volume resolution.
//!
//! Shared volumes are declared per role but backed by one filesystem per
//! tag; the first declaration fixes the size and any later disagreement is
//! fatal. Private volumes belong to a single component and are exported as
//! a side effect of attaching them.

use std::collections::BTreeMap;

use crate::errors::{FlightplanError, FlightplanResult};
use crate::model::definition::{Component, TargetDefinition, VolumeEntry, VolumeMount};
use crate::model::manifest::{Role, VolumeSpec};

/// Filesystem type for every exported volume.
const VOLUME_FILESYSTEM: &str = "ext4";

/// Scan all roles and reconcile shared-volume declarations by tag.
pub fn collect_shared_volumes(roles: &[Role]) -> FlightplanResult<BTreeMap<String, u64>> {
    let mut shared = BTreeMap::new();
    for role in roles {
        for vol in &role.run.shared_volumes {
            if let Some(&previous) = shared.get(&vol.tag) {
                if previous != vol.size {
                    return Err(FlightplanError::volume_size_conflict(
                        &vol.tag, vol.size, previous,
                    ));
                }
            } else {
                shared.insert(vol.tag.clone(), vol.size);
            }
        }
    }
    Ok(shared)
}

/// Append one shared volume entry per reconciled tag.
pub fn emit_shared_volumes(definition: &mut TargetDefinition, shared: &BTreeMap<String, u64>) {
    for (tag, &size) in shared {
        definition.add_volume(volume_entry(tag, size, true));
    }
}

/// Attach volumes to a component. Private volumes also export their
/// filesystem here; shared ones were exported up front.
pub fn attach_volumes(
    definition: &mut TargetDefinition,
    component: &mut Component,
    volumes: &[VolumeSpec],
    shared: bool,
) {
    for vol in volumes {
        if !shared {
            definition.add_volume(volume_entry(&vol.tag, vol.size, false));
        }
        component.add_volume_mount(VolumeMount {
            volume_name: vol.tag.clone(),
            mountpoint: vol.path.clone(),
        });
    }
}

fn volume_entry(name: &str, size_gb: u64, shared: bool) -> VolumeEntry {
    VolumeEntry {
        name: name.to_string(),
        size_gb,
        filesystem: VOLUME_FILESYSTEM.to_string(),
        shared,
    }
}
