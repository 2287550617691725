pub mod model;
pub mod view;

pub use model::{DialGeometry, DragAction, LabelText, Point, State};
pub use view::draw;

/// Angles are degrees, 0 pointing up, increasing clockwise.
pub const START_ANGLE: f64 = 0.0;
pub const SWEEP_ANGLE: f64 = 270.0;

/// Logical units below are relative to this height; everything scales with
/// the actual bounds.
pub const REFERENCE_HEIGHT: f64 = 220.0;
pub const TOP_AREA: f64 = 20.0; // reserved strip above the dial
pub const BOTTOM_AREA: f64 = 30.0; // caption strip below the dial
pub const DIAL_MARGIN: f64 = 10.0;
pub const CAP_INSET: f64 = 20.0; // cap radius = dial radius - inset
pub const TICK_LENGTH: f64 = 12.0;
pub const LABEL_OFFSET: f64 = 12.0; // label distance past the tick end
pub const ARC_WIDTH: f64 = 6.0;
pub const DOT_RADIUS: f64 = 6.0;
pub const DOT_INSET: f64 = 8.0; // dot orbit = cap radius - inset
pub const CAPTION_GAP: f64 = 7.0;
