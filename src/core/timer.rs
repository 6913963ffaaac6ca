//=========================================================================
// Timer Queue
//=========================================================================
//
// One-shot countdown callbacks measured in frames.
//
// Each entry is an explicit (owner, ticks, action) triple, so deleting an
// object cancels its pending callbacks by id lookup.
//
// Per frame: advance() → every counter -1 → entries at <= 0 leave the
// queue and are handed back for the caller to run.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::trace;

//=== Internal Dependencies ===============================================

use crate::core::entity::EntityId;

//=== TimerId =============================================================

/// Handle to a scheduled callback, usable for early cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

//=== Entries =============================================================

struct TimerEntry<A> {
    id: TimerId,
    owner: EntityId,
    remaining: i64,
    action: A,
}

/// A callback whose countdown reached zero this frame.
pub struct DueTimer<A> {
    pub id: TimerId,
    pub owner: EntityId,
    pub action: A,
}

//=== TimerQueue ==========================================================

/// Frame-counted one-shot callbacks.
///
/// Generic over the action so the queue does not need to know what a
/// callback is given when it runs.
pub struct TimerQueue<A> {
    entries: Vec<TimerEntry<A>>,
    next_id: u64,
}

impl<A> TimerQueue<A> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Schedules `action` to run after `ticks` calls to [`advance`](Self::advance).
    ///
    /// `ticks <= 1` runs on the very next advance.
    pub fn schedule(&mut self, owner: EntityId, ticks: i64, action: A) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;

        trace!(target: "timers", "Timer {:?} for {} in {} ticks", id, owner, ticks);

        self.entries.push(TimerEntry {
            id,
            owner,
            remaining: ticks,
            action,
        });
        id
    }

    /// Counts every entry down by one and removes those that reached zero.
    ///
    /// Due entries are returned in the order they were scheduled.
    pub fn advance(&mut self) -> Vec<DueTimer<A>> {
        let mut due = Vec::new();

        for index in (0..self.entries.len()).rev() {
            self.entries[index].remaining -= 1;
            if self.entries[index].remaining <= 0 {
                let entry = self.entries.remove(index);
                due.push(DueTimer {
                    id: entry.id,
                    owner: entry.owner,
                    action: entry.action,
                });
            }
        }

        due.reverse();
        due
    }

    /// Removes a single pending entry. Returns `true` if it was pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        before != self.entries.len()
    }

    /// Removes every entry owned by `owner`, returning how many were dropped.
    pub fn cancel_owner(&mut self, owner: EntityId) -> usize {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.owner != owner);
        before - self.entries.len()
    }

    /// Ticks left before `id` fires, if still pending.
    pub fn remaining(&self, id: TimerId) -> Option<i64> {
        self.entries
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.remaining)
    }

    pub fn pending_for(&self, owner: EntityId) -> usize {
        self.entries.iter().filter(|entry| entry.owner == owner).count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<A> Default for TimerQueue<A> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
