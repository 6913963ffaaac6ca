//=========================================================================
// Collision Registry
//=========================================================================
//
// Interest-based collision lists on top of the room.
//
// Each body declares the kinds it wants to collide with; the registry
// resolves those interests into concrete ids of live objects:
//
//   run() start    → resolve_all_collision_lists()   (every object once)
//   add (running)  → dynamic_init_collision_list()   (both directions)
//   delete         → Room::delete_object() sweeps remove_object()
//
// A candidate list only ever holds live ids other than its owner's.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::entity::{EntityId, Tag};
use crate::core::room::Room;

//=== Resolution ==========================================================

impl Room {
    /// Appends every live object of each kind `id` is interested in.
    ///
    /// Costs one scan of the room per declared kind.
    pub fn init_collision_list(&mut self, id: EntityId) {
        let Some(slot) = self.slots.get(&id) else {
            return;
        };

        let mut found = Vec::new();
        for &kind in slot.body.collision_interests() {
            found.extend(
                self.order
                    .iter()
                    .copied()
                    .filter(|&other| other != id && self.slots[&other].body.kind() == kind),
            );
        }

        if let Some(slot) = self.slots.get_mut(&id) {
            for other in found {
                slot.body.add_candidate(other);
            }
        }
    }

    /// Resolves `id`'s own list and adds `id` to the list of every other
    /// object interested in its kind.
    pub fn dynamic_init_collision_list(&mut self, id: EntityId) {
        self.init_collision_list(id);

        let Some(kind) = self.body(id).map(|body| body.kind()) else {
            return;
        };

        let mut joined = 0;
        for (&other, slot) in self.slots.iter_mut() {
            if other != id && slot.body.is_interested_in(kind) {
                slot.body.add_candidate(id);
                joined += 1;
            }
        }

        trace!(target: "room", "{} {} joined {} collision lists", kind, id, joined);
    }

    /// One resolution pass over every object present.
    pub(crate) fn resolve_all_collision_lists(&mut self) {
        for id in self.order.clone() {
            self.init_collision_list(id);
        }
    }

    /// Declares interest in `kind` for a live object.
    ///
    /// While the level runs, matching objects already present are added
    /// right away; before that they are picked up when the level starts.
    pub fn register_collision_object(&mut self, id: EntityId, kind: Tag) {
        let running = self.is_running();
        let Some(body) = self.body_mut(id) else {
            return;
        };
        body.register_collision_object(kind);

        if running {
            self.init_collision_list(id);
        }
    }

    //--- Detection --------------------------------------------------------

    /// Calls `handle_collision` on `id` for every candidate it overlaps.
    ///
    /// Rectangles are re-read per candidate, so a handler that moves or
    /// deletes an object is seen by the remaining checks.
    pub fn check_collisions(&mut self, id: EntityId) {
        let Some(candidates) = self
            .body(id)
            .map(|body| body.collision_candidates().to_vec())
        else {
            return;
        };

        for other in candidates {
            let Some(me) = self.body(id) else {
                return;
            };
            let Some(them) = self.body(other) else {
                continue;
            };

            if me.rect().intersects(&them.rect()) {
                let kind = them.kind();
                trace!(target: "room", "{} hit {} {}", id, kind, other);
                self.dispatch(id, |entity, room| entity.handle_collision(id, room, other, kind));
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
