use crate::gui::knob::{
    BOTTOM_AREA, CAP_INSET, CAPTION_GAP, DIAL_MARGIN, REFERENCE_HEIGHT, START_ANGLE, SWEEP_ANGLE,
    TOP_AREA,
};
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Display text of one tick position. Ordering within the label list defines
/// the angular position.
#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct LabelText(String);

impl LabelText {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

/// Step between adjacent tick positions, 0 when there is nothing to step
/// between.
pub fn angle_step(count: usize) -> f64 {
    if count > 1 {
        SWEEP_ANGLE / (count - 1) as f64
    } else {
        0.0
    }
}

/// Canonical angle of position `index` out of `count`.
pub fn canonical_angle(index: usize, count: usize) -> f64 {
    START_ANGLE + index as f64 * angle_step(count)
}

/// Angle of the cursor as seen from the dial center, normalized to `[0, 360)`
/// and clamped into the sweep.
pub fn pointer_angle(center: Point, cursor: Point) -> f64 {
    let (dx, dy) = (cursor.x - center.x, cursor.y - center.y);
    let deg = (dy.atan2(dx).to_degrees() + 90.0).rem_euclid(360.0);
    deg.clamp(START_ANGLE, START_ANGLE + SWEEP_ANGLE)
}

/// Nearest valid position for a continuous angle.
pub fn snap_index(angle: f64, count: usize) -> usize {
    let step = angle_step(count);
    if step == 0.0 {
        return 0;
    }
    let index = ((angle - START_ANGLE) / step).round().max(0.0) as usize;
    index.min(count - 1)
}

/// Everything the paint routine and the pointer handlers need to know about
/// the current bounds.
#[derive(Debug, Clone, Copy)]
pub struct DialGeometry {
    pub center: Point,
    pub caption_center: Point,
    pub dial_radius: f64,
    pub cap_radius: f64,
    pub scale: f64,
}

impl DialGeometry {
    pub fn from_bounds(width: f64, height: f64) -> Self {
        let scale = height / REFERENCE_HEIGHT;
        let top = TOP_AREA * scale;
        let bottom = BOTTOM_AREA * scale;
        let dial_height = (height - top - bottom).max(0.0);
        let dial_radius = (width.min(dial_height) / 2.0 - DIAL_MARGIN * scale).max(0.0);
        let center = Point::new(width / 2.0, top + dial_height / 2.0);
        let caption_center = Point::new(
            width / 2.0,
            top + dial_height + (CAPTION_GAP + BOTTOM_AREA / 2.0) * scale,
        );

        Self {
            center,
            caption_center,
            dial_radius,
            cap_radius: (dial_radius - CAP_INSET * scale).max(0.0),
            scale,
        }
    }

    /// Point at `radius` from the center, at a dial angle (0 = up, clockwise).
    pub fn point_at(&self, radius: f64, angle: f64) -> Point {
        let radian = (angle - 90.0).to_radians();
        Point::new(
            self.center.x + radian.cos() * radius,
            self.center.y + radian.sin() * radius,
        )
    }
}

/// What a pointer event asks of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct DragAction {
    pub should_redraw: bool,
    /// A selection was committed (pointer release always commits).
    pub committed: bool,
    /// The committed selection differs from the previous one.
    pub changed: bool,
}

pub struct State {
    labels: Vec<LabelText>,
    index: usize,
    angle: f64,
    dragging: bool,
}

impl State {
    pub fn new(labels: Vec<LabelText>, initial: usize) -> Self {
        let mut state = Self {
            labels,
            index: 0,
            angle: START_ANGLE,
            dragging: false,
        };
        state.set_value(initial);
        state
    }

    pub fn labels(&self) -> &[LabelText] {
        &self.labels
    }

    pub fn value(&self) -> usize {
        self.index
    }

    /// Continuous pointer angle; tracks the cursor during a drag, canonical
    /// for the selected index otherwise.
    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn selected_value(&self) -> &str {
        self.labels.get(self.index).map(|l| l.as_str()).unwrap_or("")
    }

    /// Replaces the label list wholesale; the selection is re-clamped and the
    /// angle moved to its new canonical position. Returns the effective index.
    pub fn set_labels(&mut self, labels: Vec<LabelText>) -> usize {
        self.labels = labels;
        self.set_value(self.index)
    }

    /// Clamps `requested` into the valid range and moves the angle to the
    /// canonical position. Returns the effective index; the host treats every
    /// call as a value-changed notification.
    pub fn set_value(&mut self, requested: usize) -> usize {
        self.index = requested.min(self.labels.len().saturating_sub(1));
        self.angle = canonical_angle(self.index, self.labels.len());
        self.index
    }

    pub fn begin_drag(&mut self, geometry: &DialGeometry, cursor: Point) -> DragAction {
        self.dragging = true;
        self.track(geometry, cursor, false)
    }

    pub fn update_drag(&mut self, geometry: &DialGeometry, cursor: Point) -> DragAction {
        if !self.dragging {
            return DragAction::default();
        }
        self.track(geometry, cursor, false)
    }

    /// A release always commits the nearest position, even for a click
    /// without movement.
    pub fn end_drag(&mut self, geometry: &DialGeometry, cursor: Point) -> DragAction {
        self.dragging = false;
        self.track(geometry, cursor, true)
    }

    fn track(&mut self, geometry: &DialGeometry, cursor: Point, snap: bool) -> DragAction {
        // nothing to select between
        if self.labels.len() < 2 {
            return DragAction::default();
        }

        let deg = pointer_angle(geometry.center, cursor);

        if snap {
            let index = snap_index(deg, self.labels.len());
            let changed = index != self.index;
            self.set_value(index);
            DragAction {
                should_redraw: true,
                committed: true,
                changed,
            }
        } else {
            self.angle = deg;
            DragAction {
                should_redraw: true,
                ..Default::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(texts: &[&str]) -> Vec<LabelText> {
        texts.iter().map(|t| LabelText::new(*t)).collect()
    }

    fn geometry() -> DialGeometry {
        DialGeometry::from_bounds(180.0, 220.0)
    }

    #[test]
    fn set_value_clamps_into_range() {
        let mut state = State::new(labels(&["a", "b", "c"]), 0);
        assert_eq!(state.set_value(1), 1);
        assert_eq!(state.set_value(99), 2);
        assert_eq!(state.set_value(0), 0);
    }

    #[test]
    fn set_value_on_empty_list() {
        let mut state = State::new(Vec::new(), 5);
        assert_eq!(state.value(), 0);
        assert_eq!(state.selected_value(), "");
        assert_eq!(state.set_value(3), 0);
        assert_eq!(state.angle(), START_ANGLE);
    }

    #[test]
    fn single_label_is_always_selected() {
        let state = State::new(labels(&["only"]), 7);
        assert_eq!(state.value(), 0);
        assert_eq!(state.selected_value(), "only");
        assert_eq!(state.angle(), START_ANGLE);
    }

    #[test]
    fn canonical_angles_stay_within_sweep_and_are_monotone() {
        for n in 2..10 {
            let mut previous = f64::NEG_INFINITY;
            for i in 0..n {
                let a = canonical_angle(i, n);
                assert!(a >= START_ANGLE && a <= START_ANGLE + SWEEP_ANGLE);
                assert!(a > previous);
                previous = a;
            }
        }
    }

    #[test]
    fn snap_is_inverse_of_canonical_angle() {
        for n in 2..10 {
            for i in 0..n {
                assert_eq!(snap_index(canonical_angle(i, n), n), i);
            }
        }
    }

    #[test]
    fn five_labels_snap_scenario() {
        // 5 labels over 270 degrees: index 2 sits at 135, raw 130 snaps to 2.
        assert_eq!(canonical_angle(2, 5), 135.0);
        assert_eq!(snap_index(130.0, 5), 2);
    }

    #[test]
    fn pointer_angle_normalizes_and_clamps() {
        let c = Point::new(0.0, 0.0);
        // straight right of center is 90 degrees on the dial
        assert_eq!(pointer_angle(c, Point::new(10.0, 0.0)), 90.0);
        // straight down is 180
        assert_eq!(pointer_angle(c, Point::new(0.0, 10.0)), 180.0);
        // straight left is 270, the end of the sweep
        assert_eq!(pointer_angle(c, Point::new(-10.0, 0.0)), 270.0);
        // upper-left quadrant falls outside the sweep and clamps to its end
        let a = pointer_angle(c, Point::new(-10.0, -10.0));
        assert_eq!(a, 270.0);
        // straight up is angle 0, the start
        assert_eq!(pointer_angle(c, Point::new(0.0, -10.0)), 0.0);
    }

    #[test]
    fn release_commits_nearest_index() {
        let mut state = State::new(labels(&["a", "b", "c", "d", "e"]), 0);
        let g = geometry();

        let press = g.point_at(g.dial_radius, 130.0);
        let action = state.begin_drag(&g, press);
        assert!(action.should_redraw);
        assert!(!action.committed);
        assert!(state.is_dragging());
        // the indicator follows the pointer, the selection does not
        assert_eq!(state.value(), 0);
        assert!((state.angle() - 130.0).abs() < 1e-9);

        let action = state.end_drag(&g, press);
        assert!(action.committed);
        assert!(action.changed);
        assert!(!state.is_dragging());
        assert_eq!(state.value(), 2);
        assert_eq!(state.angle(), 135.0);
    }

    #[test]
    fn click_without_movement_still_commits() {
        let mut state = State::new(labels(&["a", "b", "c"]), 2);
        let g = geometry();

        let press = g.point_at(g.dial_radius, canonical_angle(2, 3));
        state.begin_drag(&g, press);
        let action = state.end_drag(&g, press);
        assert!(action.committed);
        assert!(!action.changed);
        assert_eq!(state.value(), 2);
    }

    #[test]
    fn dragging_with_fewer_than_two_labels_is_a_noop() {
        for texts in [&[][..], &["solo"][..]] {
            let mut state = State::new(labels(texts), 0);
            let g = geometry();

            let action = state.begin_drag(&g, Point::new(500.0, 500.0));
            assert!(!action.should_redraw);
            let action = state.end_drag(&g, Point::new(500.0, 500.0));
            assert!(!action.committed);
            assert_eq!(state.value(), 0);
            assert_eq!(state.angle(), START_ANGLE);
        }
    }

    #[test]
    fn update_without_begin_is_ignored() {
        let mut state = State::new(labels(&["a", "b"]), 0);
        let g = geometry();
        let action = state.update_drag(&g, Point::new(500.0, 500.0));
        assert!(!action.should_redraw);
        assert_eq!(state.angle(), START_ANGLE);
    }

    #[test]
    fn set_labels_reclamps_selection() {
        let mut state = State::new(labels(&["a", "b", "c", "d"]), 3);
        assert_eq!(state.set_labels(labels(&["x", "y"])), 1);
        assert_eq!(state.selected_value(), "y");
        assert_eq!(state.angle(), canonical_angle(1, 2));

        assert_eq!(state.set_labels(Vec::new()), 0);
        assert_eq!(state.selected_value(), "");
    }

    #[test]
    fn geometry_at_reference_bounds() {
        let g = geometry();
        assert_eq!(g.scale, 1.0);
        assert_eq!(g.center, Point::new(90.0, 105.0));
        assert_eq!(g.dial_radius, 75.0);
        assert_eq!(g.cap_radius, 55.0);
    }

    #[test]
    fn geometry_never_goes_negative() {
        let g = DialGeometry::from_bounds(8.0, 8.0);
        assert!(g.dial_radius >= 0.0);
        assert!(g.cap_radius >= 0.0);
    }

    #[test]
    fn point_at_cardinal_angles() {
        let g = geometry();
        let up = g.point_at(10.0, 0.0);
        assert!((up.x - g.center.x).abs() < 1e-9);
        assert!((up.y - (g.center.y - 10.0)).abs() < 1e-9);

        let right = g.point_at(10.0, 90.0);
        assert!((right.x - (g.center.x + 10.0)).abs() < 1e-9);
        assert!((right.y - g.center.y).abs() < 1e-9);
    }
}
