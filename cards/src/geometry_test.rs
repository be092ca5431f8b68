#![allow(clippy::float_cmp)]

use super::*;

fn drag_anchor(x0: f64, y0: f64, mx0: f64, my0: f64) -> DragAnchor {
    DragAnchor { x0, y0, mx0, my0 }
}

fn resize_anchor(corner: Corner, x0: f64, w0: f64) -> ResizeAnchor {
    ResizeAnchor { corner, mx0: 300.0, my0: 300.0, x0, y0: 0.0, w0 }
}

// =============================================================
// snap
// =============================================================

#[test]
fn snap_rounds_to_nearest_grid_unit() {
    assert_eq!(snap(0.0), 0.0);
    assert_eq!(snap(5.9), 0.0);
    assert_eq!(snap(6.0), 12.0);
    assert_eq!(snap(160.0), 156.0);
    assert_eq!(snap(-7.0), -12.0);
}

#[test]
fn snap_ties_round_up_for_negatives() {
    assert_eq!(snap(-6.0), 0.0);
    assert_eq!(snap(-18.0), -12.0);
    assert_eq!(snap(-30.0), -24.0);
    assert_eq!(snap(18.0), 24.0);
}

#[test]
fn snap_is_idempotent() {
    for v in [-100.0, -13.0, 0.0, 7.5, 100.0, 161.0, 999.9] {
        assert_eq!(snap(snap(v)), snap(v));
    }
}

// =============================================================
// drag_to
// =============================================================

#[test]
fn drag_matches_worked_example() {
    let a = drag_anchor(100.0, 100.0, 500.0, 500.0);
    let next = drag_to(&a, Point::new(560.0, 512.0));
    assert_eq!(next, Point::new(156.0, 108.0));
}

#[test]
fn drag_without_movement_keeps_grid_position() {
    let a = drag_anchor(120.0, 48.0, 10.0, 10.0);
    assert_eq!(drag_to(&a, Point::new(10.0, 10.0)), Point::new(120.0, 48.0));
}

#[test]
fn drag_result_is_always_on_grid_and_reapplying_is_noop() {
    for (dx, dy) in [(0.0, 0.0), (1.0, -1.0), (17.3, 4.4), (-250.0, 99.0), (5.99, 6.01)] {
        let a = drag_anchor(96.0, 36.0, 0.0, 0.0);
        let p = drag_to(&a, Point::new(dx, dy));
        assert_eq!(p.x % GRID, 0.0);
        assert_eq!(p.y % GRID, 0.0);

        let again = drag_anchor(p.x, p.y, 0.0, 0.0);
        assert_eq!(drag_to(&again, Point::new(0.0, 0.0)), p);
    }
}

#[test]
fn drag_does_not_clamp_negative_positions() {
    let a = drag_anchor(0.0, 0.0, 100.0, 100.0);
    let next = drag_to(&a, Point::new(40.0, 0.0));
    assert_eq!(next, Point::new(-60.0, -96.0));
}

#[test]
fn drag_into_negative_tie_rounds_up() {
    let a = drag_anchor(0.0, 0.0, 100.0, 100.0);
    let next = drag_to(&a, Point::new(94.0, 82.0));
    assert_eq!(next, Point::new(0.0, -12.0));
}

// =============================================================
// resize_to
// =============================================================

#[test]
fn resize_sw_matches_worked_example() {
    let a = ResizeAnchor { corner: Corner::Sw, mx0: 200.0, my0: 100.0, x0: 200.0, y0: 0.0, w0: 260.0 };
    let (x, w) = resize_to(&a, Point::new(140.0, 100.0));
    assert_eq!(w, 324.0);
    assert_eq!(x, 132.0);
}

#[test]
fn resize_east_corners_never_move_x() {
    for corner in [Corner::Ne, Corner::Se] {
        for dx in [-500.0, -40.0, 0.0, 35.0, 900.0] {
            let a = resize_anchor(corner, 84.0, 260.0);
            let (x, _) = resize_to(&a, Point::new(300.0 + dx, 300.0 + dx / 3.0));
            assert_eq!(x, 84.0);
        }
    }
}

#[test]
fn resize_width_always_within_bounds() {
    for corner in [Corner::Nw, Corner::Ne, Corner::Sw, Corner::Se] {
        for w0 in [MIN_W, 260.0, 400.0, MAX_W] {
            for dx in [-2000.0, -300.0, -1.0, 0.0, 1.0, 300.0, 2000.0] {
                for dy in [-800.0, 0.0, 800.0] {
                    let a = resize_anchor(corner, 120.0, w0);
                    let (_, w) = resize_to(&a, Point::new(300.0 + dx, 300.0 + dy));
                    assert!((MIN_W..=MAX_W).contains(&w), "{corner:?} w0={w0} dx={dx} dy={dy} -> {w}");
                }
            }
        }
    }
}

#[test]
fn resize_west_corners_pin_east_edge() {
    for corner in [Corner::Nw, Corner::Sw] {
        for shrink in [0.0, 12.0, 30.0, 50.0, 100.0] {
            let a = resize_anchor(corner, 240.0, 300.0);
            // Moving right shrinks a west-corner resize.
            let (x, w) = resize_to(&a, Point::new(300.0 + shrink, 300.0));
            let east0 = 240.0 + 300.0;
            assert!((x + w - east0).abs() <= GRID, "{corner:?} shrink={shrink}: x={x} w={w}");
        }
    }
}

#[test]
fn resize_west_corner_clamped_keeps_east_edge() {
    let a = resize_anchor(Corner::Sw, 480.0, 200.0);
    // Far right would drive width below MIN_W.
    let (x, w) = resize_to(&a, Point::new(1000.0, 300.0));
    assert_eq!(w, MIN_W);
    assert!((x + w - (480.0 + 200.0)).abs() <= GRID);
}

#[test]
fn resize_vertical_assist_direction_depends_on_corner() {
    // Moving down 80px contributes +12 for south corners, -12 for north corners.
    let se = resize_to(&resize_anchor(Corner::Se, 0.0, 264.0), Point::new(300.0, 380.0));
    let ne = resize_to(&resize_anchor(Corner::Ne, 0.0, 264.0), Point::new(300.0, 380.0));
    assert_eq!(se.1, 276.0);
    assert_eq!(ne.1, 252.0);
}

#[test]
fn resize_horizontal_dominates_vertical() {
    let a = resize_anchor(Corner::Se, 0.0, 264.0);
    let (_, w) = resize_to(&a, Point::new(360.0, 240.0));
    assert!(w > 264.0);
}

// =============================================================
// Pose helpers
// =============================================================

#[test]
fn pose_default_uses_default_width() {
    let p = Pose::default();
    assert_eq!(p.width, 260.0);
    assert_eq!(p.z, 0);
}

#[test]
fn pose_size_label_uses_sixteen_by_nine() {
    let p = Pose { width: 320.0, ..Pose::default() };
    assert_eq!(p.aspect_height(), 180.0);
    assert_eq!(p.size_label(), "320×180");

    let p = Pose { width: 260.0, ..Pose::default() };
    assert_eq!(p.size_label(), "260×146");
}

#[test]
fn clamp_top_only_raises_y() {
    let p = Pose { y: 10.0, ..Pose::default() };
    assert_eq!(clamp_top(p, 33.0).y, 33.0);
    let p = Pose { y: 96.0, ..Pose::default() };
    assert_eq!(clamp_top(p, 33.0), p);
}

#[test]
fn corner_sides() {
    assert!(Corner::Nw.is_west() && Corner::Nw.is_north());
    assert!(Corner::Sw.is_west() && !Corner::Sw.is_north());
    assert!(!Corner::Ne.is_west() && Corner::Ne.is_north());
    assert!(!Corner::Se.is_west() && !Corner::Se.is_north());
}
