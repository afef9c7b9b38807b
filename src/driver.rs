use std::time::Instant;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use winit::dpi::PhysicalSize;

use crate::config::FieldConfig;
use crate::simulation::{integrate, modulate, ColorMode, Dot, DotField, InputTracker};

/// Logical viewport size plus device pixel ratio
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scale_factor: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, scale_factor: f32) -> Self {
        let scale_factor = if scale_factor.is_finite() && scale_factor > 0.0 {
            scale_factor
        } else {
            1.0
        };
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            scale_factor,
        }
    }

    /// Build from a window's physical size and scale factor
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let logical = size.to_logical::<f64>(scale_factor);
        Self::new(logical.width as f32, logical.height as f32, scale_factor as f32)
    }

    /// Backing surface size in device pixels
    pub fn physical_size(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(
            (self.width * self.scale_factor).round() as u32,
            (self.height * self.scale_factor).round() as u32,
        )
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Elapsed seconds between two frames, capped at `max_delta`
pub fn clamp_delta(last: Instant, now: Instant, max_delta: f32) -> f32 {
    now.saturating_duration_since(last).as_secs_f32().min(max_delta)
}

/// A 2D raster surface the field is drawn onto.
///
/// Coordinates passed to `fill_circle` are logical pixels; the surface
/// applies `scale_factor` so circles rasterize at native density.
pub trait Canvas {
    /// Resize the backing store to the viewport's device-pixel size
    fn resize(&mut self, viewport: &Viewport);

    /// Start a frame: set the logical-to-device scale and clear everything
    fn clear(&mut self, scale_factor: f32, backdrop: [f32; 3]);

    /// Queue a filled circle with straight (non-premultiplied) alpha
    fn fill_circle(&mut self, center: Vec2, radius: f32, rgb: [f32; 3], alpha: f32);

    /// Finish the frame
    fn present(&mut self);
}

/// Handle for one outstanding frame request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// "Call me before the next repaint", cancelable
pub trait FrameScheduler {
    fn request_frame(&mut self) -> FrameToken;
    fn cancel_frame(&mut self, token: FrameToken);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Idle,
    Running,
}

/// Draw every dot at its displaced position with its current opacity
pub fn draw_field(canvas: &mut dyn Canvas, dots: &[Dot], viewport: &Viewport, mode: ColorMode, radius: f32) {
    canvas.clear(viewport.scale_factor, mode.backdrop());
    let rgb = mode.dot_rgb();
    for dot in dots {
        canvas.fill_circle(dot.position(), radius, rgb, dot.opacity);
    }
    canvas.present();
}

/// Owns the dot field and input mirror and drives them once per frame.
///
/// While `Running` exactly one frame request is outstanding; each frame
/// schedules the next. `teardown` cancels it and makes every later call a
/// no-op.
pub struct FrameLoop<S: FrameScheduler> {
    config: FieldConfig,
    scheduler: S,
    state: LoopState,
    pending: Option<FrameToken>,
    disposed: bool,
    field: DotField,
    input: InputTracker,
    viewport: Viewport,
    rng: StdRng,
    start_time: Instant,
    last_time: Instant,
}

impl<S: FrameScheduler> FrameLoop<S> {
    pub fn new(scheduler: S, config: FieldConfig) -> Self {
        Self::with_rng(scheduler, config, StdRng::from_entropy())
    }

    /// Reproducible field layouts
    pub fn with_seed(scheduler: S, config: FieldConfig, seed: u64) -> Self {
        Self::with_rng(scheduler, config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(scheduler: S, config: FieldConfig, rng: StdRng) -> Self {
        let now = Instant::now();
        Self {
            config,
            scheduler,
            state: LoopState::Idle,
            pending: None,
            disposed: false,
            field: DotField::empty(),
            input: InputTracker::default(),
            viewport: Viewport::new(0.0, 0.0, 1.0),
            rng,
            start_time: now,
            last_time: now,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn has_pending_frame(&self) -> bool {
        self.pending.is_some()
    }

    pub fn field(&self) -> &DotField {
        &self.field
    }

    pub fn color_mode(&self) -> ColorMode {
        self.input.color_mode
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Idle -> Running. Without a canvas initialization is skipped and the
    /// loop stays idle.
    pub fn mount(
        &mut self,
        viewport: Viewport,
        color_mode: ColorMode,
        now: Instant,
        canvas: Option<&mut dyn Canvas>,
    ) -> bool {
        if self.disposed || self.state == LoopState::Running {
            return false;
        }
        let Some(canvas) = canvas else {
            log::warn!("No drawing surface, dot field stays idle");
            return false;
        };

        self.input.set_color_mode(color_mode);
        self.start_time = now;
        self.last_time = now;
        self.regenerate(viewport, canvas);

        self.state = LoopState::Running;
        self.pending = Some(self.scheduler.request_frame());
        log::info!("Frame loop running ({:?} mode)", color_mode);
        true
    }

    /// Discard the field and lay out a fresh one for the new viewport
    pub fn resize(&mut self, viewport: Viewport, canvas: Option<&mut dyn Canvas>) {
        if self.disposed {
            return;
        }
        if let Some(canvas) = canvas {
            self.regenerate(viewport, canvas);
        }
    }

    fn regenerate(&mut self, viewport: Viewport, canvas: &mut dyn Canvas) {
        self.viewport = viewport;
        self.field = DotField::with_rng(viewport.width, viewport.height, self.config.spacing, &mut self.rng);
        canvas.resize(&viewport);
        if self.field.is_empty() {
            log::debug!("Viewport {:.0}x{:.0} holds no dots", viewport.width, viewport.height);
            return;
        }
        log::info!(
            "Generated {} dots for {:.0}x{:.0} @{}x",
            self.field.len(),
            viewport.width,
            viewport.height,
            viewport.scale_factor
        );
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        if !self.disposed {
            self.input.pointer_moved(x, y);
        }
    }

    pub fn pointer_left(&mut self) {
        if !self.disposed {
            self.input.pointer_left();
        }
    }

    pub fn set_color_mode(&mut self, mode: ColorMode) {
        if !self.disposed && self.input.color_mode != mode {
            log::info!("Color mode: {:?}", mode);
            self.input.set_color_mode(mode);
        }
    }

    /// Run one scheduled frame. Returns whether anything was drawn.
    ///
    /// Without a canvas the frame is skipped but the next one is still
    /// scheduled.
    pub fn on_frame(&mut self, now: Instant, canvas: Option<&mut dyn Canvas>) -> bool {
        if self.disposed || self.state != LoopState::Running {
            return false;
        }
        self.pending = None;

        let dt = clamp_delta(self.last_time, now, self.config.max_frame_delta);
        self.last_time = now;
        let elapsed = now.saturating_duration_since(self.start_time).as_secs_f64();

        let drawn = match canvas {
            Some(canvas) => {
                self.advance(dt, elapsed);
                draw_field(
                    canvas,
                    &self.field.dots,
                    &self.viewport,
                    self.input.color_mode,
                    self.config.dot_radius,
                );
                true
            }
            None => false,
        };

        log::trace!("frame dt={:.4}s dots={}", dt, self.field.len());
        self.pending = Some(self.scheduler.request_frame());
        drawn
    }

    /// Spring step then opacity for every dot
    fn advance(&mut self, dt: f32, elapsed: f64) {
        let pointer = self.input.pointer.position();
        for dot in &mut self.field.dots {
            let spring = integrate(dot, pointer, dt, &self.config);
            dot.offset = spring.offset;
            dot.velocity = spring.velocity;
            dot.opacity = modulate(dot, pointer, elapsed, &self.config);
        }
    }

    /// Running -> Idle for good: cancel the outstanding frame and ignore
    /// all further events.
    pub fn teardown(&mut self) {
        if self.disposed {
            return;
        }
        if let Some(token) = self.pending.take() {
            self.scheduler.cancel_frame(token);
        }
        self.state = LoopState::Idle;
        self.disposed = true;
        log::info!("Frame loop torn down");
    }
}
