use std::f64::consts::TAU;

use glam::Vec2;

use crate::config::{FieldConfig, MIN_PULSE_OPACITY};
use crate::simulation::dot::Dot;

/// Pulsing baseline opacity at `elapsed` seconds since the loop started.
///
/// Oscillates between `max(base * 0.5, 0.3)` and `min(base * 1.5, 1)`.
pub fn pulse_opacity(base_opacity: f32, phase_offset: f32, elapsed: f64, pulse_speed: f32) -> f32 {
    let min_opacity = (base_opacity * 0.5).max(MIN_PULSE_OPACITY);
    let max_opacity = (base_opacity * 1.5).min(1.0);

    // Reduce to one period in f64 so long sessions keep a smooth phase
    let cycle = (elapsed * pulse_speed as f64).fract();
    let angle = (TAU * cycle) as f32 + phase_offset;
    let pulse = (angle.sin() + 1.0) / 2.0;

    min_opacity + (max_opacity - min_opacity) * pulse
}

/// Extra opacity for a dot within the proximity radius of the pointer
pub fn proximity_boost(base: Vec2, pointer: Option<Vec2>, config: &FieldConfig) -> f32 {
    let Some(pointer) = pointer else {
        return 0.0;
    };

    let radius = config.proximity_radius();
    let distance = base.distance(pointer);
    if distance < radius {
        (1.0 - distance / radius) * config.proximity_boost
    } else {
        0.0
    }
}

/// Opacity of `dot` for this frame: pulse plus proximity boost, capped at 1
pub fn modulate(dot: &Dot, pointer: Option<Vec2>, elapsed: f64, config: &FieldConfig) -> f32 {
    let pulse = pulse_opacity(dot.base_opacity, dot.phase_offset, elapsed, config.pulse_speed);
    (pulse + proximity_boost(dot.base, pointer, config)).min(1.0)
}
