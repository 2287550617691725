pub mod app;
pub mod knob;
pub mod theme;
