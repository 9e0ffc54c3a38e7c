//! Pairwise interaction pass
//!
//! Contacts are found on snapshots of every entity taken at the start of the
//! pass, so a rollback from one contact never hides another. Each entity then
//! applies its contacts in the order of the other side's ID, which makes the
//! result independent of where entities sit in the collection.

use glam::Vec3;

use super::entity::{Entity, EntityView, mutual_range};

/// Resolve all contacts for one frame.
///
/// `previous` holds each entity's pre-integration position and `survives`
/// accumulates removal decisions (already seeded by self-checks).
pub fn resolve(entities: &mut [Entity], previous: &[Vec3], survives: &mut [bool]) {
    let n = entities.len();
    debug_assert_eq!(previous.len(), n);
    debug_assert_eq!(survives.len(), n);

    let views: Vec<EntityView> = entities.iter().map(Entity::view).collect();
    let mut contacts: Vec<Vec<usize>> = vec![Vec::new(); n];
    for i in 0..n {
        for j in (i + 1)..n {
            if mutual_range(&views[i], &views[j]) {
                contacts[i].push(j);
                contacts[j].push(i);
            }
        }
    }

    for (i, (entity, mut others)) in entities.iter_mut().zip(contacts).enumerate() {
        others.sort_by_key(|&j| views[j].id);
        // Every contact runs: a doomed entity still registers the rest.
        for j in others {
            survives[i] &= entity.react(&views[j], previous[i]);
        }
    }
}
