mod dot;
mod field;
mod input;
mod opacity;
mod physics;

pub use dot::Dot;
pub use field::{edge_factor, generate_dots, keep_probability, DotField};
pub use input::{ColorMode, InputTracker, PointerState};
pub use opacity::{modulate, proximity_boost, pulse_opacity};
pub use physics::{integrate, repulsion_target, step_spring, SpringState};
