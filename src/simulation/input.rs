use glam::Vec2;
use winit::window::Theme;

use crate::config::{DARK_BACKDROP_RGB, DARK_DOT_RGB, LIGHT_BACKDROP_RGB, LIGHT_DOT_RGB};

/// Last known pointer position in logical viewport coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PointerState {
    position: Option<Vec2>,
}

impl PointerState {
    /// Record a pointer move. Non-finite coordinates count as no pointer.
    pub fn moved(&mut self, x: f32, y: f32) {
        self.position = if x.is_finite() && y.is_finite() {
            Some(Vec2::new(x, y))
        } else {
            None
        };
    }

    /// Pointer left the viewport
    pub fn left(&mut self) {
        self.position = None;
    }

    pub fn position(&self) -> Option<Vec2> {
        self.position
    }
}

/// Light or dark color scheme
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorMode {
    #[default]
    Light,
    Dark,
}

impl ColorMode {
    pub fn from_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => ColorMode::Dark,
            Theme::Light => ColorMode::Light,
        }
    }

    /// Parse a `dark` / `light` override, case-insensitively
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "dark" => Some(ColorMode::Dark),
            "light" => Some(ColorMode::Light),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ColorMode::Dark => ColorMode::Light,
            ColorMode::Light => ColorMode::Dark,
        }
    }

    /// Dot color as normalized sRGB
    pub fn dot_rgb(self) -> [f32; 3] {
        normalize(match self {
            ColorMode::Dark => DARK_DOT_RGB,
            ColorMode::Light => LIGHT_DOT_RGB,
        })
    }

    /// Surface clear color as normalized sRGB
    pub fn backdrop(self) -> [f32; 3] {
        normalize(match self {
            ColorMode::Dark => DARK_BACKDROP_RGB,
            ColorMode::Light => LIGHT_BACKDROP_RGB,
        })
    }
}

fn normalize(rgb: [u8; 3]) -> [f32; 3] {
    rgb.map(|c| c as f32 / 255.0)
}

/// Host input mirrored for the frame loop: pointer plus color scheme
#[derive(Clone, Copy, Debug, Default)]
pub struct InputTracker {
    pub pointer: PointerState,
    pub color_mode: ColorMode,
}

impl InputTracker {
    pub fn new(color_mode: ColorMode) -> Self {
        Self {
            pointer: PointerState::default(),
            color_mode,
        }
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.pointer.moved(x, y);
    }

    pub fn pointer_left(&mut self) {
        self.pointer.left();
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pointer_starts_absent() {
        assert_eq!(PointerState::default().position(), None);
    }

    #[test]
    fn test_pointer_move_and_leave() {
        let mut tracker = InputTracker::new(ColorMode::Light);
        tracker.pointer_moved(40.0, 25.5);
        assert_eq!(tracker.pointer.position(), Some(Vec2::new(40.0, 25.5)));
        tracker.pointer_left();
        assert_eq!(tracker.pointer.position(), None);
    }

    #[test]
    fn test_non_finite_pointer_is_absent() {
        let mut pointer = PointerState::default();
        pointer.moved(10.0, 10.0);
        pointer.moved(f32::INFINITY, 3.0);
        assert_eq!(pointer.position(), None);
        pointer.moved(1.0, f32::NAN);
        assert_eq!(pointer.position(), None);
    }

    #[test]
    fn test_color_mode_parsing() {
        assert_eq!(ColorMode::parse("Dark"), Some(ColorMode::Dark));
        assert_eq!(ColorMode::parse(" light "), Some(ColorMode::Light));
        assert_eq!(ColorMode::parse("sepia"), None);
    }

    #[test]
    fn test_palette_differs_by_mode() {
        assert_ne!(ColorMode::Dark.dot_rgb(), ColorMode::Light.dot_rgb());
        assert_eq!(ColorMode::Dark.toggled(), ColorMode::Light);
        assert_eq!(ColorMode::from_theme(Theme::Dark), ColorMode::Dark);
        let [r, g, b] = ColorMode::Light.dot_rgb();
        assert!((r - 113.0 / 255.0).abs() < 1e-6);
        assert!((g - 113.0 / 255.0).abs() < 1e-6);
        assert!((b - 122.0 / 255.0).abs() < 1e-6);
    }
}
