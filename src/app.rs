use std::sync::Arc;
use std::time::Instant;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::{FieldConfig, THEME_ENV_VAR, WINDOW_HEIGHT, WINDOW_WIDTH};
use crate::driver::{Canvas, FrameLoop, FrameScheduler, FrameToken, Viewport};
use crate::gpu::GpuCanvas;
use crate::simulation::ColorMode;

/// Schedules frames through winit redraw requests.
///
/// A redraw request cannot be withdrawn; cancelling drops the token so the
/// frame loop ignores the stray `RedrawRequested` once torn down.
pub struct RedrawScheduler {
    window: Arc<Window>,
    next_token: u64,
}

impl RedrawScheduler {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window,
            next_token: 0,
        }
    }
}

impl FrameScheduler for RedrawScheduler {
    fn request_frame(&mut self) -> FrameToken {
        self.next_token = self.next_token.wrapping_add(1);
        self.window.request_redraw();
        FrameToken(self.next_token)
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        log::debug!("Cancelled frame {:?}", token);
    }
}

/// Initial color mode: the window's theme, then the environment override, then light
fn initial_color_mode(window: &Window) -> ColorMode {
    if let Some(theme) = window.theme() {
        return ColorMode::from_theme(theme);
    }
    std::env::var(THEME_ENV_VAR)
        .ok()
        .and_then(|value| ColorMode::parse(&value))
        .unwrap_or_default()
}

/// Application state
pub struct App {
    window: Option<Arc<Window>>,
    canvas: Option<GpuCanvas>,
    frame_loop: Option<FrameLoop<RedrawScheduler>>,
    config: FieldConfig,
    fps_counter: FpsCounter,
}

impl App {
    pub fn new(config: FieldConfig) -> Self {
        Self {
            window: None,
            canvas: None,
            frame_loop: None,
            config,
            fps_counter: FpsCounter::new(),
        }
    }

    fn canvas(&mut self) -> Option<&mut dyn Canvas> {
        self.canvas.as_mut().map(|c| c as &mut dyn Canvas)
    }

    fn render(&mut self) {
        let Some(frame_loop) = self.frame_loop.as_mut() else {
            return;
        };
        let canvas = self.canvas.as_mut().map(|c| c as &mut dyn Canvas);
        if !frame_loop.on_frame(Instant::now(), canvas) {
            return;
        }

        // Update and display FPS
        if let Some(fps) = self.fps_counter.tick() {
            if let Some(window) = &self.window {
                window.set_title(&format!(
                    "Dot Field - {:.0} FPS - {} dots - {:?}",
                    fps,
                    frame_loop.field().len(),
                    frame_loop.color_mode()
                ));
            }
        }
    }

    fn handle_key(&mut self, key_code: KeyCode) {
        if key_code == KeyCode::KeyT {
            if let Some(frame_loop) = self.frame_loop.as_mut() {
                let mode = frame_loop.color_mode().toggled();
                frame_loop.set_color_mode(mode);
            }
        }
    }

    /// Re-read the window's size and scale factor and regenerate the field
    fn refresh_viewport(&mut self) {
        let Some(window) = &self.window else {
            return;
        };
        let viewport = Viewport::from_physical(window.inner_size(), window.scale_factor());
        let canvas = self.canvas.as_mut().map(|c| c as &mut dyn Canvas);
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.resize(viewport, canvas);
        }
    }

    /// Stop the frame loop and release the surface
    fn shutdown(&mut self) {
        if let Some(frame_loop) = self.frame_loop.as_mut() {
            frame_loop.teardown();
        }
        self.frame_loop = None;
        self.canvas = None;
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Initializing dot field...");

        let window_attrs = Window::default_attributes()
            .with_title("Dot Field")
            .with_inner_size(winit::dpi::LogicalSize::new(WINDOW_WIDTH, WINDOW_HEIGHT));

        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
                return;
            }
        };

        // A missing GPU only disables drawing; the window stays usable
        self.canvas = match pollster::block_on(GpuCanvas::new(window.clone())) {
            Ok(canvas) => Some(canvas),
            Err(e) => {
                log::warn!("Rendering disabled: {}", e);
                None
            }
        };

        let viewport = Viewport::from_physical(window.inner_size(), window.scale_factor());
        let color_mode = initial_color_mode(&window);
        let mut frame_loop = FrameLoop::new(RedrawScheduler::new(window.clone()), self.config);
        frame_loop.mount(viewport, color_mode, Instant::now(), self.canvas());

        log::info!("Controls:");
        log::info!("  T: Toggle light/dark mode");
        log::info!("  Escape: Quit");

        self.window = Some(window);
        self.frame_loop = Some(frame_loop);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting...");
                self.shutdown();
                event_loop.exit();
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state.is_pressed() {
                    if let PhysicalKey::Code(key_code) = event.physical_key {
                        if key_code == KeyCode::Escape {
                            log::info!("Escape pressed, exiting...");
                            self.shutdown();
                            event_loop.exit();
                        } else {
                            self.handle_key(key_code);
                        }
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(window) = &self.window else {
                    return;
                };
                let logical = position.to_logical::<f32>(window.scale_factor());
                if let Some(frame_loop) = self.frame_loop.as_mut() {
                    frame_loop.pointer_moved(logical.x, logical.y);
                }
            }
            WindowEvent::CursorLeft { .. } => {
                if let Some(frame_loop) = self.frame_loop.as_mut() {
                    frame_loop.pointer_left();
                }
            }
            WindowEvent::Resized(new_size) => {
                log::info!("Window resized to {}x{}", new_size.width, new_size.height);
                self.refresh_viewport();
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                // Physical size may stay the same while the logical layout changes
                log::info!("Scale factor changed to {}", scale_factor);
                self.refresh_viewport();
            }
            WindowEvent::ThemeChanged(theme) => {
                if let Some(frame_loop) = self.frame_loop.as_mut() {
                    frame_loop.set_color_mode(ColorMode::from_theme(theme));
                }
            }
            WindowEvent::RedrawRequested => {
                self.render();
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.shutdown();
    }
}

/// Simple FPS counter
struct FpsCounter {
    last_update: Instant,
    frame_count: u32,
}

impl FpsCounter {
    fn new() -> Self {
        Self {
            last_update: Instant::now(),
            frame_count: 0,
        }
    }

    /// Tick the counter, returns Some(fps) every second
    fn tick(&mut self) -> Option<f64> {
        self.frame_count += 1;
        let elapsed = self.last_update.elapsed();

        if elapsed.as_secs_f64() >= 1.0 {
            let fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.frame_count = 0;
            self.last_update = Instant::now();
            Some(fps)
        } else {
            None
        }
    }
}
