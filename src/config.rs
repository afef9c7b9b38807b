/// Grid spacing between dot anchors, in logical pixels
pub const DOT_SPACING: f32 = 12.0;

/// Dot diameter in logical pixels (drawn radius is half of this)
pub const DOT_SIZE: f32 = 3.0;

// ============================================
// Field Layout
// ============================================

/// Distance from center (as a fraction of the corner distance) where dots reach full density
pub const EDGE_FALLOFF: f32 = 0.7;

/// Keep probability at the exact center of the viewport
pub const CENTER_KEEP_PROBABILITY: f32 = 0.4;

/// Added keep probability at full edge factor
pub const EDGE_KEEP_BONUS: f32 = 0.6;

/// Jitter half-width per axis, as a fraction of the spacing
pub const JITTER_FRACTION: f32 = 0.125;

/// Base opacity bands keyed by (row + col) mod 3
pub const OPACITY_BANDS: [f32; 3] = [0.3, 0.5, 0.7];

// ============================================
// Pointer Repulsion + Spring
// ============================================

/// Pointer distance (logical px) inside which dots are pushed away
pub const REPULSION_RADIUS: f32 = 100.0;

/// Target offset magnitude for a dot directly under the pointer
pub const REPULSION_STRENGTH: f32 = 32.0;

/// Spring constants, tuned for a snappy, barely underdamped return
pub const SPRING_STIFFNESS: f32 = 240.0;
pub const SPRING_DAMPING: f32 = 45.0;
pub const SPRING_MASS: f32 = 0.5;

/// Upper bound on the simulated step, in seconds (tab resume, frame hitches)
pub const MAX_FRAME_DELTA: f32 = 0.05;

/// Longest single integration step, in seconds; longer frames are substepped
pub const MAX_SPRING_SUBSTEP: f32 = 1.0 / 60.0;

// ============================================
// Opacity
// ============================================

/// Pulse frequency in Hz
pub const OPACITY_PULSE_SPEED: f32 = 0.8;

/// Floor of the pulse band
pub const MIN_PULSE_OPACITY: f32 = 0.3;

/// Proximity boost reaches this multiple of the repulsion radius
pub const PROXIMITY_MULTIPLIER: f32 = 1.35;

/// Opacity added for a dot directly under the pointer
pub const PROXIMITY_OPACITY_BOOST: f32 = 1.1;

// ============================================
// Colors (sRGB, 0-255)
// ============================================

pub const DARK_DOT_RGB: [u8; 3] = [161, 161, 170];
pub const LIGHT_DOT_RGB: [u8; 3] = [113, 113, 122];
pub const DARK_BACKDROP_RGB: [u8; 3] = [9, 9, 11];
pub const LIGHT_BACKDROP_RGB: [u8; 3] = [255, 255, 255];

/// Environment variable consulted when the platform reports no theme
pub const THEME_ENV_VAR: &str = "DOT_FIELD_THEME";

/// Initial window size in logical pixels
pub const WINDOW_WIDTH: u32 = 1280;
pub const WINDOW_HEIGHT: u32 = 800;

/// Tunables for the dot field, defaulting to the constants above.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FieldConfig {
    pub spacing: f32,
    pub dot_radius: f32,
    pub repulsion_radius: f32,
    pub repulsion_strength: f32,
    pub stiffness: f32,
    pub damping: f32,
    pub mass: f32,
    pub max_frame_delta: f32,
    pub max_substep: f32,
    pub pulse_speed: f32,
    pub proximity_multiplier: f32,
    pub proximity_boost: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            spacing: DOT_SPACING,
            dot_radius: DOT_SIZE / 2.0,
            repulsion_radius: REPULSION_RADIUS,
            repulsion_strength: REPULSION_STRENGTH,
            stiffness: SPRING_STIFFNESS,
            damping: SPRING_DAMPING,
            mass: SPRING_MASS,
            max_frame_delta: MAX_FRAME_DELTA,
            max_substep: MAX_SPRING_SUBSTEP,
            pulse_speed: OPACITY_PULSE_SPEED,
            proximity_multiplier: PROXIMITY_MULTIPLIER,
            proximity_boost: PROXIMITY_OPACITY_BOOST,
        }
    }
}

impl FieldConfig {
    /// Radius of the opacity boost around the pointer
    pub fn proximity_radius(&self) -> f32 {
        self.repulsion_radius * self.proximity_multiplier
    }
}
