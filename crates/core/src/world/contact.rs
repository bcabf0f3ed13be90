//! Trigger-volume overlap tracking
//!
//! Turns "where is this actor now" into the enter/stay/exit events a fire
//! understands, by diffing the set of fires an actor overlaps against the
//! set it overlapped on the previous report. Every overlapping actor keeps
//! producing stay events, so when the actor a fire is hurting leaves, the
//! next one still inside takes its place.

use crate::core_types::{ActorId, FireId};
use crate::fire::ContactKind;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

/// A contact event delivered to one fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContactEvent {
    pub fire: FireId,
    pub actor: ActorId,
    pub kind: ContactKind,
}

/// Which fires each actor currently overlaps
#[derive(Debug, Default)]
pub(crate) struct ContactTracker {
    overlaps: FxHashMap<ActorId, FxHashSet<FireId>>,
}

impl ContactTracker {
    /// Replace an actor's overlap set, returning the resulting events
    ///
    /// Exits come first, then enters/stays, each group in ascending fire id
    /// order.
    pub(crate) fn update(
        &mut self,
        actor: ActorId,
        inside: impl IntoIterator<Item = FireId>,
    ) -> Vec<ContactEvent> {
        let mut inside: Vec<FireId> = inside.into_iter().collect();
        inside.sort_unstable();
        inside.dedup();

        let previous = self.overlaps.remove(&actor).unwrap_or_default();

        let mut exits: Vec<FireId> = previous
            .iter()
            .copied()
            .filter(|fire| inside.binary_search(fire).is_err())
            .collect();
        exits.sort_unstable();

        let mut events: Vec<ContactEvent> = exits
            .into_iter()
            .map(|fire| ContactEvent {
                fire,
                actor,
                kind: ContactKind::Exit,
            })
            .collect();

        events.extend(inside.iter().map(|&fire| ContactEvent {
            fire,
            actor,
            kind: if previous.contains(&fire) {
                ContactKind::Stay
            } else {
                ContactKind::Enter
            },
        }));

        if !inside.is_empty() {
            self.overlaps.insert(actor, inside.into_iter().collect());
        }

        events
    }

    /// Keep the tracker in step with an explicitly reported event
    pub(crate) fn record(&mut self, event: ContactEvent) {
        match event.kind {
            ContactKind::Enter | ContactKind::Stay => {
                self.overlaps.entry(event.actor).or_default().insert(event.fire);
            }
            ContactKind::Exit => {
                if let Some(fires) = self.overlaps.get_mut(&event.actor) {
                    fires.remove(&event.fire);
                    if fires.is_empty() {
                        self.overlaps.remove(&event.actor);
                    }
                }
            }
        }
    }

    /// Drop an actor entirely, returning exit events for everything it overlapped
    pub(crate) fn remove_actor(&mut self, actor: ActorId) -> Vec<ContactEvent> {
        self.update(actor, std::iter::empty())
    }

    /// Forget a fire that no longer exists
    pub(crate) fn forget_fire(&mut self, fire: FireId) {
        self.overlaps.retain(|_, fires| {
            fires.remove(&fire);
            !fires.is_empty()
        });
    }

    /// Whether an actor currently overlaps a fire
    pub(crate) fn is_overlapping(&self, actor: ActorId, fire: FireId) -> bool {
        self.overlaps
            .get(&actor)
            .is_some_and(|fires| fires.contains(&fire))
    }
}
