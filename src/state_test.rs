#![allow(clippy::float_cmp)]

use super::test_helpers::{memento_at, memento_created};
use super::*;

fn wall_state() -> WallState {
    WallState::new(CardOptions::default())
}

// =============================================================================
// Memento
// =============================================================================

#[test]
fn pose_fills_record_gaps() {
    let mut m = memento_at(Uuid::new_v4(), 12.0, 24.0, 0);
    m.z = None;
    m.width = None;
    m.rotation_deg = None;
    let pose = m.pose();
    assert_eq!(pose, Pose { x: 12.0, y: 24.0, z: 0, width: 260.0, rotation_deg: 0.0 });
}

#[test]
fn apply_pose_sets_all_layout_fields() {
    let mut m = memento_at(Uuid::new_v4(), 0.0, 0.0, 0);
    m.apply_pose(Pose { x: 36.0, y: 48.0, z: 7, width: 324.0, rotation_deg: -2.5 });
    assert_eq!((m.x, m.y, m.z, m.width, m.rotation_deg), (36.0, 48.0, Some(7), Some(324.0), Some(-2.5)));
}

#[test]
fn memento_json_uses_table_field_names() {
    let m = memento_at(Uuid::new_v4(), 1.0, 2.0, 3);
    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(json["kind"], "photo");
    assert_eq!(json["z"], 3);
    assert!(json["created_at"].is_string());
    assert!(json["updated_at"].is_null());

    let back: Memento = serde_json::from_value(json).unwrap();
    assert_eq!(back.id, m.id);
}

#[test]
fn wall_background_is_kebab_case() {
    assert_eq!(serde_json::to_value(WallBackground::SereneSky).unwrap(), "serene-sky");
    assert_eq!(serde_json::to_value(WallBackground::DarkTribute).unwrap(), "dark-tribute");
}

#[test]
fn layout_from_pose_drops_nothing() {
    let layout = Layout::from(Pose { x: 1.0, y: 2.0, z: 3, width: 400.0, rotation_deg: 0.5 });
    assert_eq!(layout, Layout { x: 1.0, y: 2.0, z: 3, rotation_deg: 0.5, width: 400.0 });
}

// =============================================================================
// WallState
// =============================================================================

#[test]
fn load_builds_one_controller_per_memento() {
    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let a = memento_at(wall, 0.0, 0.0, 1);
    let b = memento_at(wall, 10.0, 10.0, 2);
    state.load(vec![a.clone(), b.clone()]);

    assert_eq!(state.mementos.len(), 2);
    assert_eq!(state.cards.len(), 2);
    assert_eq!(state.cards[&b.id].pose(), b.pose());
    assert_eq!(state.lifecycle[&a.id], Lifecycle::Confirmed);
}

#[test]
fn top_z_is_max_plus_one() {
    let wall = Uuid::new_v4();
    let mut state = wall_state();
    assert_eq!(state.top_z(), 1);

    let mut unset = memento_at(wall, 0.0, 0.0, 0);
    unset.z = None;
    state.load(vec![memento_at(wall, 0.0, 0.0, 4), unset, memento_at(wall, 0.0, 0.0, 9)]);
    assert_eq!(state.top_z(), 10);
}

#[test]
fn top_z_ignores_drag_sentinel() {
    use cards::hit::HitZone;
    use cards::input::PointerEvent;

    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let m = memento_at(wall, 0.0, 0.0, 5);
    state.load(vec![m.clone()]);

    let actions = state.cards.get_mut(&m.id).unwrap().on_pointer_down(HitZone::Body, PointerEvent::new(1, 0.0, 0.0));
    assert!(!actions.is_empty());
    let raised = state.cards[&m.id].pose();
    state.show_pose(&m.id, raised);
    assert_eq!(state.get(&m.id).unwrap().z, Some(cards::consts::TOP_Z));
    assert_eq!(state.top_z(), 6);
}

#[test]
fn commit_pose_updates_record_and_queues_layout() {
    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let m = memento_at(wall, 0.0, 0.0, 1);
    state.load(vec![m.clone()]);

    let pose = Pose { x: 24.0, y: 36.0, z: 1, width: 300.0, rotation_deg: 1.0 };
    assert!(state.commit_pose(&m.id, pose));
    assert_eq!(state.get(&m.id).map(Memento::pose), Some(pose));
    assert_eq!(state.dirty[&m.id], Layout::from(pose));
}

#[test]
fn show_pose_does_not_queue() {
    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let m = memento_at(wall, 0.0, 0.0, 1);
    state.load(vec![m.clone()]);
    assert!(state.show_pose(&m.id, Pose { x: 12.0, ..m.pose() }));
    assert!(state.dirty.is_empty());
}

#[test]
fn commit_unknown_id_is_rejected() {
    let mut state = wall_state();
    assert!(!state.commit_pose(&Uuid::new_v4(), Pose::default()));
    assert!(state.dirty.is_empty());
}

#[test]
fn drain_dirty_skips_pending() {
    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let confirmed = memento_at(wall, 0.0, 0.0, 1);
    let pending = memento_at(wall, 0.0, 0.0, 2);
    state.push(confirmed.clone(), Lifecycle::Confirmed);
    state.push_front(pending.clone(), Lifecycle::Pending);
    state.commit_pose(&confirmed.id, confirmed.pose());
    state.commit_pose(&pending.id, pending.pose());

    let drained = state.drain_dirty();
    assert_eq!(drained.len(), 1);
    assert_eq!(drained[0].0, confirmed.id);
    assert!(state.dirty.contains_key(&pending.id));
}

#[test]
fn requeue_does_not_overwrite_newer_commit() {
    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let m = memento_at(wall, 0.0, 0.0, 1);
    state.load(vec![m.clone()]);

    let old = Layout::from(m.pose());
    let newer = Pose { x: 96.0, ..m.pose() };
    state.commit_pose(&m.id, newer);
    state.requeue(m.id, old);
    assert_eq!(state.dirty[&m.id].x, 96.0);
}

#[test]
fn requeue_after_forget_is_dropped() {
    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let m = memento_at(wall, 0.0, 0.0, 1);
    state.load(vec![m.clone()]);
    state.forget(&m.id);
    state.requeue(m.id, Layout::from(m.pose()));
    assert!(state.dirty.is_empty());
}

#[test]
fn restore_resorts_by_created_at() {
    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let first = memento_created(wall, 10, 0);
    let second = memento_created(wall, 20, 1);
    let third = memento_created(wall, 30, 2);
    state.load(vec![first.clone(), second.clone(), third.clone()]);

    let removed = state.remove_visible(&second.id).unwrap();
    assert_eq!(state.mementos.len(), 2);
    assert!(state.cards.contains_key(&second.id));

    state.restore(removed);
    let order: Vec<Uuid> = state.mementos.iter().map(|m| m.id).collect();
    assert_eq!(order, vec![first.id, second.id, third.id]);
}

#[test]
fn push_front_shows_first() {
    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let a = memento_at(wall, 0.0, 0.0, 0);
    let b = memento_at(wall, 0.0, 0.0, 1);
    state.push(a.clone(), Lifecycle::Confirmed);
    state.push_front(b.clone(), Lifecycle::Pending);
    assert_eq!(state.mementos[0].id, b.id);
    assert_eq!(state.lifecycle[&b.id], Lifecycle::Pending);
}

#[test]
fn replace_keeps_slot_and_moves_pending_layout() {
    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let older = memento_at(wall, 0.0, 0.0, 1);
    let optimistic = memento_at(wall, 140.0, 140.0, 2);
    state.push(older.clone(), Lifecycle::Confirmed);
    state.push_front(optimistic.clone(), Lifecycle::Pending);

    let moved = Pose { x: 300.0, ..optimistic.pose() };
    state.commit_pose(&optimistic.id, moved);

    let stored = memento_at(wall, 140.0, 140.0, 2);
    state.replace(&optimistic.id, stored.clone());

    assert_eq!(state.mementos[0].id, stored.id);
    assert_eq!(state.mementos[0].x, 300.0);
    assert_eq!(state.cards[&stored.id].pose().x, 300.0);
    assert_eq!(state.dirty[&stored.id].x, 300.0);
    assert!(!state.cards.contains_key(&optimistic.id));
    assert!(!state.lifecycle.contains_key(&optimistic.id));
    assert_eq!(state.lifecycle[&stored.id], Lifecycle::Confirmed);
}

#[test]
fn layout_pose_round_trips_fields() {
    let pose = Pose { x: 5.0, y: 6.0, z: 7, width: 200.0, rotation_deg: 1.5 };
    assert_eq!(Layout::from(pose).pose(), pose);
}

#[test]
fn wall_json_round_trips() {
    let wall = Wall {
        id: Uuid::new_v4(),
        title: "Grandma Rose".into(),
        background: WallBackground::WarmCanvas,
        created_at: OffsetDateTime::UNIX_EPOCH,
    };
    let json = serde_json::to_value(&wall).unwrap();
    assert_eq!(json["background"], "warm-canvas");
    assert_eq!(json["created_at"], "1970-01-01T00:00:00Z");
    let back: Wall = serde_json::from_value(json).unwrap();
    assert_eq!(back, wall);
}

#[test]
fn rolled_back_records_are_bounded() {
    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let mut ids = Vec::new();
    for _ in 0..=MAX_ROLLED_BACK {
        let m = memento_at(wall, 140.0, 140.0, 1);
        ids.push(m.id);
        state.push_front(m.clone(), Lifecycle::Pending);
        state.mark_rolled_back(m.id);
    }

    assert!(state.mementos.is_empty());
    assert!(state.cards.is_empty());
    assert_eq!(state.lifecycle.len(), MAX_ROLLED_BACK);
    assert!(!state.lifecycle.contains_key(&ids[0]));
    assert_eq!(state.lifecycle[&ids[MAX_ROLLED_BACK]], Lifecycle::RolledBack);
}

#[test]
fn top_z_ignores_resize_sentinel() {
    use cards::hit::{Direction, HitZone};
    use cards::input::PointerEvent;

    let wall = Uuid::new_v4();
    let mut state = wall_state();
    let m = memento_at(wall, 0.0, 0.0, 3);
    state.load(vec![m.clone()]);

    state
        .cards
        .get_mut(&m.id)
        .unwrap()
        .on_pointer_down(HitZone::ResizeHandle(Direction::Se), PointerEvent::new(1, 0.0, 0.0));
    let raised = state.cards[&m.id].pose();
    state.show_pose(&m.id, raised);
    assert_eq!(state.top_z(), 4);
}
