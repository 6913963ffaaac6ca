//=========================================================================
// Room
//=========================================================================
//
// Object store of a level: render order, input subsets, timers, session.
//
// Architecture:
// ```text
//   slots:    EntityId → { Body, Box<dyn Entity> }
//   order:    [EntityId]   non-decreasing depth (render + update order)
//   keyboard: [EntityId]   ⊆ order, insertion order
//   mouse:    [EntityId]   ⊆ order, insertion order
//   timers:   TimerQueue<(owner, FnOnce(&mut Room))>
//   sounds:   [SoundRequest] drained by the level each frame
// ```
//
// Callbacks run with the behavior taken out of its slot, so a hook gets
// `&mut Room` and may add, move or delete anything (itself included).
// The behavior is put back only if its slot still exists afterwards.
//
// Per-frame passes iterate over a snapshot of `order`: objects deleted
// mid-pass are skipped, objects added mid-pass join on the next frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, trace, warn};

//=== Internal Dependencies ===============================================

use crate::core::audio::{SoundId, SoundRequest};
use crate::core::entity::{Body, Entity, EntityId, Tag};
use crate::core::level::LevelState;
use crate::core::render::Canvas;
use crate::core::session::Session;
use crate::core::timer::{TimerId, TimerQueue};

//=== Types ===============================================================

/// Deferred callback run by the timer queue.
pub type TimerAction = Box<dyn FnOnce(&mut Room)>;

pub(crate) struct Slot {
    pub(crate) body: Body,
    behavior: Option<Box<dyn Entity>>,
}

//=== Room ================================================================

/// Live objects of one level plus everything callbacks may touch.
pub struct Room {
    pub(crate) slots: HashMap<EntityId, Slot>,
    pub(crate) order: Vec<EntityId>,
    keyboard: Vec<EntityId>,
    mouse: Vec<EntityId>,
    timers: TimerQueue<TimerAction>,
    sounds: Vec<SoundRequest>,
    state: LevelState,
    next_id: u64,
    session: Session,
}

impl Room {
    pub fn new(session: Session) -> Self {
        Self {
            slots: HashMap::new(),
            order: Vec::new(),
            keyboard: Vec::new(),
            mouse: Vec::new(),
            timers: TimerQueue::new(),
            sounds: Vec::new(),
            state: LevelState::Idle,
            next_id: 1,
            session,
        }
    }

    //--- Object Lifecycle -------------------------------------------------

    /// Adds an object and returns its id.
    ///
    /// The object is placed before the first object whose depth is greater
    /// than or equal to its own. If the level is running, its collision
    /// list is resolved immediately and it joins the lists of every object
    /// interested in its kind.
    pub fn add_room_object<E: Entity + 'static>(&mut self, body: Body, entity: E) -> EntityId {
        self.add_boxed(body, Box::new(entity))
    }

    /// [`add_room_object`](Self::add_room_object) for an already boxed behavior.
    pub fn add_boxed(&mut self, body: Body, entity: Box<dyn Entity>) -> EntityId {
        let id = EntityId::new(self.next_id);
        self.next_id += 1;

        let depth = body.depth();
        let position = self
            .order
            .iter()
            .position(|other| self.slots[other].body.depth() >= depth)
            .unwrap_or(self.order.len());
        self.order.insert(position, id);

        if body.handles_keyboard() {
            self.keyboard.push(id);
        }
        if body.handles_mouse() {
            self.mouse.push(id);
        }

        debug!(
            target: "room",
            "Added {} {} at depth {} (slot {}/{})",
            body.kind(), id, depth, position, self.order.len()
        );

        self.slots.insert(
            id,
            Slot {
                body,
                behavior: Some(entity),
            },
        );

        if self.state == LevelState::Running {
            self.dynamic_init_collision_list(id);
        }

        id
    }

    /// Removes an object from the room.
    ///
    /// Also drops it from every other object's collision list and from the
    /// input subsets, and cancels its pending timers. Purging walks every
    /// live object, so a delete costs O(N).
    ///
    /// Returns `false` if `id` was not live.
    pub fn delete_object(&mut self, id: EntityId) -> bool {
        let Some(slot) = self.slots.remove(&id) else {
            warn!(target: "room", "Delete of unknown object {}", id);
            return false;
        };

        self.order.retain(|&other| other != id);
        self.keyboard.retain(|&other| other != id);
        self.mouse.retain(|&other| other != id);

        for other in self.slots.values_mut() {
            other.body.remove_object(id);
        }

        let cancelled = self.timers.cancel_owner(id);

        debug!(
            target: "room",
            "Deleted {} {} ({} timers cancelled, {} left)",
            slot.body.kind(), id, cancelled, self.order.len()
        );

        true
    }

    /// Number of live objects of `kind`.
    pub fn count_object(&self, kind: Tag) -> usize {
        self.slots
            .values()
            .filter(|slot| slot.body.kind() == kind)
            .count()
    }

    //--- Queries ----------------------------------------------------------

    pub fn contains(&self, id: EntityId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn body(&self, id: EntityId) -> Option<&Body> {
        self.slots.get(&id).map(|slot| &slot.body)
    }

    pub fn body_mut(&mut self, id: EntityId) -> Option<&mut Body> {
        self.slots.get_mut(&id).map(|slot| &mut slot.body)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Every live object, back to front.
    pub fn render_order(&self) -> &[EntityId] {
        &self.order
    }

    pub fn keyboard_objects(&self) -> &[EntityId] {
        &self.keyboard
    }

    pub fn mouse_objects(&self) -> &[EntityId] {
        &self.mouse
    }

    /// Bodies in render order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityId, &Body)> + '_ {
        self.order.iter().map(|&id| (id, &self.slots[&id].body))
    }

    /// Ids of every live object of `kind`, in render order.
    pub fn ids_of(&self, kind: Tag) -> Vec<EntityId> {
        self.entities()
            .filter(|(_, body)| body.kind() == kind)
            .map(|(id, _)| id)
            .collect()
    }

    //--- Timers -----------------------------------------------------------

    /// Runs `action` after `ticks` frames unless `owner` is deleted first.
    pub fn set_timer<F>(&mut self, owner: EntityId, ticks: i64, action: F) -> TimerId
    where
        F: FnOnce(&mut Room) + 'static,
    {
        if !self.contains(owner) {
            warn!(target: "timers", "Timer scheduled for unknown owner {}", owner);
        }
        self.timers.schedule(owner, ticks, Box::new(action))
    }

    pub fn cancel_timer(&mut self, id: TimerId) -> bool {
        self.timers.cancel(id)
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    pub fn pending_timers_for(&self, owner: EntityId) -> usize {
        self.timers.pending_for(owner)
    }

    //--- Sound ------------------------------------------------------------

    /// Queues `sound` to start once the current update pass is over.
    pub fn play_sound(&mut self, sound: SoundId) {
        self.sounds.push(SoundRequest::Play(sound));
    }

    /// Queues a stop of every playing sound.
    pub fn stop_sounds(&mut self) {
        self.sounds.push(SoundRequest::StopAll);
    }

    pub fn pending_sounds(&self) -> usize {
        self.sounds.len()
    }

    /// Requests queued so far, in the order they were made.
    pub(crate) fn take_sound_requests(&mut self) -> Vec<SoundRequest> {
        std::mem::take(&mut self.sounds)
    }

    //--- Level State ------------------------------------------------------

    /// Ends the level normally after the current frame.
    ///
    /// Only a running level can be stopped.
    pub fn stop(&mut self) {
        if self.state == LevelState::Running {
            debug!(target: "level", "Stop requested");
            self.state = LevelState::Stopped;
        }
    }

    /// Ends the level after the current frame and flags the session as
    /// exiting.
    ///
    /// Only a level that has started can quit; a quit before `run()` is
    /// ignored. A quit in the same frame as a stop overrides the stop.
    pub fn quit(&mut self) {
        match self.state {
            LevelState::Running | LevelState::Stopped => {
                debug!(target: "level", "Quit requested");
                self.state = LevelState::Quitting;
                self.session.request_exit();
            }
            LevelState::Idle | LevelState::Quitting => {}
        }
    }

    pub fn is_running(&self) -> bool {
        self.state == LevelState::Running
    }

    pub fn state(&self) -> LevelState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub(crate) fn set_state(&mut self, state: LevelState) {
        self.state = state;
    }

    pub(crate) fn into_session(self) -> Session {
        self.session
    }

    //--- Frame Passes -----------------------------------------------------

    /// Calls `hook` with the behavior of `id` taken out of its slot.
    ///
    /// Returns `false` without calling if `id` is not live.
    pub(crate) fn dispatch<F>(&mut self, id: EntityId, hook: F) -> bool
    where
        F: FnOnce(&mut dyn Entity, &mut Room),
    {
        let Some(mut behavior) = self.slots.get_mut(&id).and_then(|slot| slot.behavior.take())
        else {
            return false;
        };

        hook(behavior.as_mut(), self);

        if let Some(slot) = self.slots.get_mut(&id) {
            slot.behavior = Some(behavior);
        }
        true
    }

    pub(crate) fn snapshot_positions(&mut self) {
        for slot in self.slots.values_mut() {
            slot.body.snapshot_position();
        }
    }

    /// Advances every timer and runs the due ones in schedule order.
    pub(crate) fn tick_timers(&mut self) {
        for due in self.timers.advance() {
            if !self.contains(due.owner) {
                trace!(target: "timers", "Timer {:?} dropped, owner {} gone", due.id, due.owner);
                continue;
            }
            trace!(target: "timers", "Timer {:?} fired for {}", due.id, due.owner);
            (due.action)(self);
        }
    }

    pub(crate) fn prestep_all(&mut self) {
        for id in self.order.clone() {
            self.dispatch(id, |entity, room| entity.prestep(id, room));
        }
    }

    /// `update` then `step` on every object in render order.
    pub(crate) fn update_all(&mut self) {
        for id in self.order.clone() {
            self.dispatch(id, |entity, room| entity.update(id, room));
            self.dispatch(id, |entity, room| entity.step(id, room));
        }
    }

    pub(crate) fn check_all_collisions(&mut self) {
        for id in self.order.clone() {
            self.check_collisions(id);
        }
    }

    /// Blits every visual, back to front.
    pub(crate) fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        for (_, body) in self.entities() {
            if let Some(sprite) = body.sprite {
                canvas.blit(sprite, body.x, body.y);
            }
        }
    }
}

impl Default for Room {
    fn default() -> Self {
        Self::new(Session::new())
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::SpriteId;
    use crate::testing::{CanvasCall, RecordingCanvas};

    use std::cell::RefCell;
    use std::rc::Rc;

    const BLOCK: Tag = Tag::new("Block");
    const HERO: Tag = Tag::new("Hero");

    //--- Test Helpers -----------------------------------------------------

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records each hook it receives as `"<name>:<hook>"`.
    struct Recorder {
        name: &'static str,
        log: Log,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self { name, log: Rc::clone(log) }
        }

        fn note(&self, hook: &str) {
            self.log.borrow_mut().push(format!("{}:{}", self.name, hook));
        }
    }

    impl Entity for Recorder {
        fn prestep(&mut self, _me: EntityId, _room: &mut Room) {
            self.note("prestep");
        }

        fn update(&mut self, _me: EntityId, _room: &mut Room) {
            self.note("update");
        }

        fn step(&mut self, _me: EntityId, _room: &mut Room) {
            self.note("step");
        }
    }

    /// Deletes itself from `step`.
    struct SelfDestruct;

    impl Entity for SelfDestruct {
        fn step(&mut self, me: EntityId, room: &mut Room) {
            room.delete_object(me);
        }
    }

    /// Spawns one block per step.
    struct Spawner;

    impl Entity for Spawner {
        fn step(&mut self, _me: EntityId, room: &mut Room) {
            room.add_room_object(Body::new(BLOCK, 0, 0), ());
        }
    }

    fn block_at_depth(depth: i32) -> Body {
        Body::new(BLOCK, 0, 0).with_depth(depth)
    }

    fn depths(room: &Room) -> Vec<i32> {
        room.entities().map(|(_, body)| body.depth()).collect()
    }

    fn running_room() -> Room {
        let mut room = Room::default();
        room.set_state(LevelState::Running);
        room
    }

    //--- Ordering ---------------------------------------------------------

    #[test]
    fn render_order_stays_sorted_by_depth() {
        let mut room = Room::default();
        for depth in [5, -1, 3, 3, 0, 10, -7] {
            room.add_room_object(block_at_depth(depth), ());
            let d = depths(&room);
            assert!(d.windows(2).all(|w| w[0] <= w[1]), "unsorted: {:?}", d);
        }
        assert_eq!(depths(&room), vec![-7, -1, 0, 3, 3, 5, 10]);
    }

    #[test]
    fn equal_depth_goes_before_existing() {
        let mut room = Room::default();
        let first = room.add_room_object(block_at_depth(1), ());
        let second = room.add_room_object(block_at_depth(1), ());

        assert_eq!(room.render_order(), &[second, first]);
    }

    #[test]
    fn input_subsets_follow_capabilities() {
        let mut room = Room::default();
        let keys = room.add_room_object(Body::new(HERO, 0, 0).with_keyboard(), ());
        let both = room.add_room_object(Body::new(HERO, 0, 0).with_keyboard().with_mouse(), ());
        let plain = room.add_room_object(Body::new(BLOCK, 0, 0), ());

        assert_eq!(room.keyboard_objects(), &[keys, both]);
        assert_eq!(room.mouse_objects(), &[both]);
        assert!(room.contains(plain));
        assert_eq!(room.len(), 3);
    }

    //--- Deletion ---------------------------------------------------------

    #[test]
    fn delete_purges_every_reference() {
        let mut room = Room::default();
        let hero = room.add_room_object(
            Body::new(HERO, 0, 0).with_keyboard().with_mouse().colliding_with(BLOCK),
            (),
        );
        let watcher = room.add_room_object(Body::new(BLOCK, 0, 0).colliding_with(HERO), ());
        room.resolve_all_collision_lists();
        room.set_timer(hero, 5, |_| {});
        room.set_timer(watcher, 5, |_| {});

        assert!(room.delete_object(hero));

        assert!(!room.contains(hero));
        assert!(!room.render_order().contains(&hero));
        assert!(room.keyboard_objects().is_empty());
        assert!(room.mouse_objects().is_empty());
        assert!(room.body(watcher).unwrap().collision_candidates().is_empty());
        assert_eq!(room.pending_timers_for(hero), 0);
        assert_eq!(room.pending_timers(), 1);
    }

    #[test]
    fn deleting_unknown_id_is_harmless() {
        let mut room = Room::default();
        let id = room.add_room_object(Body::new(BLOCK, 0, 0), ());

        assert!(room.delete_object(id));
        assert!(!room.delete_object(id));
        assert!(room.is_empty());
    }

    #[test]
    fn count_object_by_kind() {
        let mut room = Room::default();
        room.add_room_object(Body::new(BLOCK, 0, 0), ());
        room.add_room_object(Body::new(BLOCK, 0, 0), ());
        room.add_room_object(Body::new(HERO, 0, 0), ());

        assert_eq!(room.count_object(BLOCK), 2);
        assert_eq!(room.count_object(HERO), 1);
        assert_eq!(room.ids_of(HERO).len(), 1);
        assert_eq!(room.count_object(Tag::new("Nothing")), 0);
    }

    //--- Frame Passes -----------------------------------------------------

    #[test]
    fn update_runs_before_step_in_render_order() {
        let log = Log::default();
        let mut room = running_room();
        room.add_room_object(block_at_depth(2), Recorder::new("back", &log));
        room.add_room_object(block_at_depth(-2), Recorder::new("front", &log));

        room.update_all();

        assert_eq!(
            *log.borrow(),
            vec!["front:update", "front:step", "back:update", "back:step"]
        );
    }

    #[test]
    fn self_delete_during_step_is_safe() {
        let log = Log::default();
        let mut room = running_room();
        let doomed = room.add_room_object(block_at_depth(0), SelfDestruct);
        room.add_room_object(block_at_depth(1), Recorder::new("after", &log));

        room.update_all();
        room.prestep_all();

        assert!(!room.contains(doomed));
        assert_eq!(*log.borrow(), vec!["after:update", "after:step", "after:prestep"]);
    }

    #[test]
    fn objects_added_mid_pass_wait_for_next_frame() {
        let mut room = running_room();
        room.add_room_object(block_at_depth(0), Spawner);

        room.update_all();
        assert_eq!(room.len(), 2);

        room.update_all();
        assert_eq!(room.len(), 3);
    }

    #[test]
    fn dispatch_reports_dead_objects() {
        let mut room = Room::default();
        let id = room.add_room_object(Body::new(BLOCK, 0, 0), ());
        assert!(room.dispatch(id, |_, _| {}));

        room.delete_object(id);
        assert!(!room.dispatch(id, |_, _| panic!("dispatched to a deleted object")));
    }

    #[test]
    fn snapshot_records_previous_position() {
        let mut room = Room::default();
        let id = room.add_room_object(Body::new(HERO, 4, 4), ());

        room.snapshot_positions();
        room.body_mut(id).unwrap().x = 10;

        assert_eq!(room.body(id).unwrap().previous_position(), (4, 4));
        assert_eq!(room.body(id).unwrap().displacement(), (6, 0));
    }

    //--- Timers -----------------------------------------------------------

    #[test]
    fn timer_fires_on_third_tick_only() {
        let mut room = Room::default();
        let owner = room.add_room_object(Body::new(HERO, 0, 0), ());
        let fired = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&fired);
        room.set_timer(owner, 3, move |_| *counter.borrow_mut() += 1);

        room.tick_timers();
        room.tick_timers();
        assert_eq!(*fired.borrow(), 0);

        room.tick_timers();
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(room.pending_timers(), 0);

        room.tick_timers();
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn timer_skipped_when_owner_deleted_in_same_batch() {
        let mut room = Room::default();
        let killer = room.add_room_object(Body::new(HERO, 0, 0), ());
        let victim = room.add_room_object(Body::new(BLOCK, 0, 0), ());
        let fired = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&fired);

        room.set_timer(killer, 1, move |room| {
            room.delete_object(victim);
        });
        room.set_timer(victim, 1, move |_| *flag.borrow_mut() = true);

        room.tick_timers();

        assert!(!room.contains(victim));
        assert!(!*fired.borrow());
    }

    #[test]
    fn timer_can_reschedule_itself() {
        let mut room = Room::default();
        let owner = room.add_room_object(Body::new(HERO, 0, 0), ());

        room.set_timer(owner, 1, move |room| {
            room.body_mut(owner).unwrap().x += 1;
            room.set_timer(owner, 1, move |room| room.body_mut(owner).unwrap().x += 1);
        });

        room.tick_timers();
        assert_eq!(room.body(owner).unwrap().x, 1);
        assert_eq!(room.pending_timers(), 1);

        room.tick_timers();
        assert_eq!(room.body(owner).unwrap().x, 2);
    }

    //--- State ------------------------------------------------------------

    #[test]
    fn stop_only_applies_while_running() {
        let mut room = Room::default();
        room.stop();
        assert_eq!(room.state(), LevelState::Idle);

        room.set_state(LevelState::Running);
        room.stop();
        assert_eq!(room.state(), LevelState::Stopped);
        assert!(!room.session().is_exiting());
    }

    #[test]
    fn quit_flags_the_session() {
        let mut room = running_room();
        room.quit();

        assert_eq!(room.state(), LevelState::Quitting);
        assert!(room.session().is_exiting());
    }

    #[test]
    fn quit_before_start_is_ignored() {
        let mut room = Room::default();
        room.quit();

        assert_eq!(room.state(), LevelState::Idle);
        assert!(!room.session().is_exiting());
    }

    #[test]
    fn quit_overrides_stop_in_the_same_frame() {
        let mut room = running_room();
        room.stop();
        room.quit();

        assert_eq!(room.state(), LevelState::Quitting);
        assert!(room.session().is_exiting());
    }

    //--- Sound ------------------------------------------------------------

    #[test]
    fn sound_requests_keep_call_order() {
        let mut room = Room::default();
        room.play_sound(SoundId::new(2));
        room.stop_sounds();
        room.play_sound(SoundId::new(0));
        assert_eq!(room.pending_sounds(), 3);

        assert_eq!(
            room.take_sound_requests(),
            vec![
                SoundRequest::Play(SoundId::new(2)),
                SoundRequest::StopAll,
                SoundRequest::Play(SoundId::new(0)),
            ]
        );
        assert_eq!(room.pending_sounds(), 0);
    }

    //--- Drawing ----------------------------------------------------------

    #[test]
    fn draw_blits_visuals_back_to_front() {
        let mut room = Room::default();
        room.add_room_object(Body::new(BLOCK, 1, 2).with_depth(5).with_sprite(sprite(0)), ());
        room.add_room_object(Body::new(BLOCK, 3, 4).with_depth(-5).with_sprite(sprite(1)), ());
        room.add_room_object(Body::new(BLOCK, 0, 0), ());

        let mut canvas = RecordingCanvas::new();
        room.draw(&mut canvas);

        assert_eq!(
            canvas.calls(),
            &[
                CanvasCall::Blit(SpriteId::new(1), 3, 4),
                CanvasCall::Blit(SpriteId::new(0), 1, 2),
            ]
        );
    }

    fn sprite(raw: u32) -> crate::core::render::Sprite {
        crate::core::render::Sprite { id: SpriteId::new(raw), width: 8, height: 8 }
    }
}
