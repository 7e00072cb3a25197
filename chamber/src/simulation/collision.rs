//! Collision merge resolution
//!
//! Runs on the control thread after integration. Results are visited in
//! ascending focus id; a focus that has not been consumed yet absorbs every
//! colliding peer that has not been consumed yet, folding `combine` from the
//! focus through the peers in ascending id. A particle is merged at most
//! once per step, so there are no cascading chains within one step.

use std::collections::{BTreeMap, BTreeSet};

use crate::simulation::forces::ParticleUpdate;
use crate::simulation::states::{Particle, ParticleId, ParticleIds};

/// Membership changes for one step, applied all at once
#[derive(Debug, Default)]
pub struct MergePlan {
    pub removed: BTreeSet<ParticleId>,
    pub replacements: Vec<Particle>,
}

impl MergePlan {
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Remove every consumed particle, then insert the merge products
    pub fn apply(self, particles: &mut BTreeMap<ParticleId, Particle>) {
        for id in &self.removed {
            particles.remove(id);
        }
        for p in self.replacements {
            particles.insert(p.id(), p);
        }
    }
}

/// Work out which particles merge this step and what replaces them
pub fn plan_merges(
    updates: &[ParticleUpdate],
    particles: &BTreeMap<ParticleId, Particle>,
    ids: &ParticleIds,
) -> MergePlan {
    let mut plan = MergePlan::default();

    let mut ordered: Vec<&ParticleUpdate> = updates.iter().filter(|u| !u.collisions.is_empty()).collect();
    ordered.sort_by_key(|u| u.focus);

    for update in ordered {
        if plan.removed.contains(&update.focus) {
            continue;
        }
        let Some(focus) = particles.get(&update.focus) else {
            continue;
        };

        // peers consumed by an earlier merge this step stay out
        let peers: Vec<&Particle> = update
            .collisions
            .iter()
            .filter(|id| !plan.removed.contains(*id))
            .filter_map(|id| particles.get(id))
            .collect();
        if peers.is_empty() {
            continue;
        }

        let merged = peers
            .iter()
            .fold(focus.clone(), |acc, peer| acc.combine(peer, ids));

        log::debug!(
            "merged {} with {} peer(s) into {}",
            focus.id(),
            peers.len(),
            merged.id()
        );

        plan.removed.insert(focus.id());
        plan.removed.extend(peers.iter().map(|p| p.id()));
        plan.replacements.push(merged);
    }

    plan
}
