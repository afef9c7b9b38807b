use glam::Vec2;

/// One simulated particle anchored to a grid cell.
///
/// `base` and `phase_offset` are fixed at generation. `offset` and `velocity`
/// are spring state advanced every frame; `opacity` is rederived every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Dot {
    /// Anchor in logical pixels (grid point plus jitter)
    pub base: Vec2,

    /// Current displacement from `base`
    pub offset: Vec2,

    /// Spring velocity in logical pixels per second
    pub velocity: Vec2,

    /// Band opacity scaled by edge factor, in [0, 1]
    pub base_opacity: f32,

    /// Opacity computed for the most recent frame
    pub opacity: f32,

    /// Pulse phase in [0, 2π)
    pub phase_offset: f32,
}

impl Dot {
    /// Create a resting dot at `base`
    pub fn new(base: Vec2, base_opacity: f32, phase_offset: f32) -> Self {
        Self {
            base,
            offset: Vec2::ZERO,
            velocity: Vec2::ZERO,
            base_opacity,
            opacity: base_opacity,
            phase_offset,
        }
    }

    /// Where the dot is drawn this frame
    pub fn position(&self) -> Vec2 {
        self.base + self.offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_dot_at_rest() {
        let dot = Dot::new(Vec2::new(12.0, 24.0), 0.5, 1.0);
        assert_eq!(dot.offset, Vec2::ZERO);
        assert_eq!(dot.velocity, Vec2::ZERO);
        assert_eq!(dot.opacity, 0.5);
        assert_eq!(dot.position(), Vec2::new(12.0, 24.0));
    }

    #[test]
    fn test_position_includes_offset() {
        let mut dot = Dot::new(Vec2::new(10.0, 10.0), 0.3, 0.0);
        dot.offset = Vec2::new(-2.5, 4.0);
        assert_eq!(dot.position(), Vec2::new(7.5, 14.0));
    }
}
