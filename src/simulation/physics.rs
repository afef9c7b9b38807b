use glam::Vec2;

use crate::config::FieldConfig;
use crate::simulation::dot::Dot;

/// Offset and velocity of one dot's spring
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SpringState {
    pub offset: Vec2,
    pub velocity: Vec2,
}

impl SpringState {
    pub fn of(dot: &Dot) -> Self {
        Self {
            offset: dot.offset,
            velocity: dot.velocity,
        }
    }
}

/// Offset the pointer pushes a dot toward.
///
/// Zero when there is no pointer or it is at least `repulsion_radius` away.
/// Inside the radius the magnitude is `(1 - dist / radius)^2 * strength`,
/// directed from the pointer to the dot.
pub fn repulsion_target(base: Vec2, pointer: Option<Vec2>, config: &FieldConfig) -> Vec2 {
    let Some(pointer) = pointer else {
        return Vec2::ZERO;
    };

    let delta = base - pointer;
    let distance = delta.length();
    if distance >= config.repulsion_radius {
        return Vec2::ZERO;
    }

    let pull = 1.0 - distance / config.repulsion_radius;
    let force = pull * pull * config.repulsion_strength;
    let angle = delta.y.atan2(delta.x);
    Vec2::new(angle.cos(), angle.sin()) * force
}

/// Advance a damped spring one step of `dt` seconds toward `target`.
///
/// Velocity is updated first and the new velocity moves the offset
/// (semi-implicit Euler), independently per axis.
pub fn step_spring(state: SpringState, target: Vec2, dt: f32, config: &FieldConfig) -> SpringState {
    let force = config.stiffness * (target - state.offset) - config.damping * state.velocity;
    let velocity = state.velocity + force / config.mass * dt;
    SpringState {
        offset: state.offset + velocity * dt,
        velocity,
    }
}

/// Spring state of `dot` after one frame with the given pointer.
///
/// The frame is split into equal substeps no longer than `max_substep`;
/// a single step of the stiff spring diverges beyond roughly 0.02s.
pub fn integrate(dot: &Dot, pointer: Option<Vec2>, dt: f32, config: &FieldConfig) -> SpringState {
    let target = repulsion_target(dot.base, pointer, config);
    let substeps = (dt / config.max_substep).ceil().max(1.0) as u32;
    let h = dt / substeps as f32;

    let mut state = SpringState::of(dot);
    for _ in 0..substeps {
        state = step_spring(state, target, h, config);
    }
    state
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_no_pointer_no_target() {
        let config = FieldConfig::default();
        assert_eq!(repulsion_target(Vec2::new(5.0, 5.0), None, &config), Vec2::ZERO);
    }

    #[test]
    fn test_repulsion_cutoff() {
        let config = FieldConfig::default();
        let pointer = Some(Vec2::ZERO);
        assert_eq!(repulsion_target(Vec2::new(100.0, 0.0), pointer, &config), Vec2::ZERO);
        assert_eq!(repulsion_target(Vec2::new(60.0, 80.0), pointer, &config), Vec2::ZERO);
        assert_eq!(repulsion_target(Vec2::new(250.0, -3.0), pointer, &config), Vec2::ZERO);

        let just_inside = repulsion_target(Vec2::new(99.0, 0.0), pointer, &config);
        assert!(just_inside.x > 0.0 && just_inside.x < 0.01);
    }

    #[test]
    fn test_repulsion_strength_near_pointer() {
        let config = FieldConfig::default();
        let target = repulsion_target(Vec2::new(0.001, 0.0), Some(Vec2::ZERO), &config);
        assert!((target.length() - config.repulsion_strength).abs() < 0.01);

        let coincident = repulsion_target(Vec2::new(3.0, 3.0), Some(Vec2::new(3.0, 3.0)), &config);
        assert!((coincident.length() - config.repulsion_strength).abs() < EPSILON);
    }

    #[test]
    fn test_repulsion_points_away_from_pointer() {
        let config = FieldConfig::default();
        let pointer = Vec2::new(50.0, 50.0);
        let base = Vec2::new(20.0, 90.0);
        let target = repulsion_target(base, Some(pointer), &config);

        // distance 50 -> pull 0.5 -> force 8
        assert!((target.length() - 8.0).abs() < EPSILON);
        let direction = (base - pointer).normalize();
        assert!((target.normalize() - direction).length() < EPSILON);
    }

    #[test]
    fn test_step_spring_formula() {
        let config = FieldConfig::default();
        let state = SpringState {
            offset: Vec2::new(1.0, 0.0),
            velocity: Vec2::new(0.0, 2.0),
        };
        let dt = 0.01;
        let next = step_spring(state, Vec2::new(4.0, 0.0), dt, &config);

        // ax = (240 * 3 - 0) / 0.5 = 1440, ay = (240 * 0 - 45 * 2) / 0.5 = -180
        let expected_velocity = Vec2::new(14.4, 2.0 - 1.8);
        assert!((next.velocity - expected_velocity).length() < EPSILON);
        let expected_offset = state.offset + expected_velocity * dt;
        assert!((next.offset - expected_offset).length() < EPSILON);
    }

    #[test]
    fn test_spring_settles_on_static_target() {
        let config = FieldConfig::default();
        let target = Vec2::new(-6.0, 12.0);
        let mut state = SpringState::default();
        for _ in 0..600 {
            state = step_spring(state, target, 1.0 / 60.0, &config);
        }
        assert!((state.offset - target).length() < EPSILON);
        assert!(state.velocity.length() < EPSILON);
    }

    #[test]
    fn test_spring_returns_home_after_pointer_leaves() {
        let config = FieldConfig::default();
        let mut dot = Dot::new(Vec2::new(200.0, 200.0), 0.5, 0.0);
        let pointer = Some(Vec2::new(190.0, 195.0));

        for _ in 0..30 {
            let next = integrate(&dot, pointer, 1.0 / 60.0, &config);
            dot.offset = next.offset;
            dot.velocity = next.velocity;
        }
        assert!(dot.offset.length() > 1.0, "dot should have been pushed");
        assert!(dot.offset.x > 0.0 && dot.offset.y > 0.0);

        let far_away = Some(Vec2::new(5000.0, 5000.0));
        for step in 0..600 {
            let pointer = if step % 2 == 0 { far_away } else { None };
            let next = integrate(&dot, pointer, 1.0 / 60.0, &config);
            dot.offset = next.offset;
            dot.velocity = next.velocity;
        }
        assert!(dot.offset.length() < EPSILON);
        assert!(dot.velocity.length() < EPSILON);
    }

    fn settle_at(dt: f32, frames: usize) -> SpringState {
        let config = FieldConfig::default();
        let mut dot = Dot::new(Vec2::new(300.0, 300.0), 0.5, 0.0);
        dot.offset = Vec2::new(10.0, 0.0);
        for _ in 0..frames {
            let next = integrate(&dot, None, dt, &config);
            dot.offset = next.offset;
            dot.velocity = next.velocity;
        }
        SpringState::of(&dot)
    }

    #[test]
    fn test_spring_converges_at_clamped_frame_delta() {
        let state = settle_at(0.05, 120);
        assert!(state.offset.length() < 1e-3, "diverged at dt=0.05: {:?}", state.offset);
        assert!(state.velocity.length() < 1e-3);
    }

    #[test]
    fn test_spring_converges_at_30hz() {
        let state = settle_at(1.0 / 30.0, 120);
        assert!(state.offset.length() < 1e-3, "diverged at 30Hz: {:?}", state.offset);
        assert!(state.velocity.length() < 1e-3);
    }

    #[test]
    fn test_short_frame_is_single_step() {
        let config = FieldConfig::default();
        let mut dot = Dot::new(Vec2::new(5.0, 5.0), 0.5, 0.0);
        dot.offset = Vec2::new(2.0, -1.0);
        let pointer = Some(Vec2::new(0.0, 0.0));
        let dt = 0.01;

        let expected = step_spring(
            SpringState::of(&dot),
            repulsion_target(dot.base, pointer, &config),
            dt,
            &config,
        );
        assert_eq!(integrate(&dot, pointer, dt, &config), expected);
    }

    #[test]
    fn test_zero_dt_is_identity() {
        let config = FieldConfig::default();
        let state = SpringState {
            offset: Vec2::new(3.0, -1.0),
            velocity: Vec2::new(-7.0, 2.0),
        };
        assert_eq!(step_spring(state, Vec2::ZERO, 0.0, &config), state);
    }
}
