use std::sync::Arc;

use glam::Vec2;
use winit::window::Window;

use crate::driver::{Canvas, Viewport};
use crate::error::GpuError;
use crate::gpu::buffers::{DotBuffers, DotInstance};
use crate::gpu::context::GpuContext;
use crate::gpu::render::DotPipeline;

/// Initial instance capacity, enough for a 1080p field
const INITIAL_CAPACITY: usize = 16 * 1024;

/// wgpu-backed `Canvas`: circles are collected during the frame and drawn
/// in one instanced pass on `present`.
pub struct GpuCanvas {
    gpu: GpuContext,
    buffers: DotBuffers,
    pipeline: DotPipeline,
    bind_group: wgpu::BindGroup,
    instances: Vec<DotInstance>,
    logical_size: [f32; 2],
    scale_factor: f32,
    clear_color: wgpu::Color,
}

impl GpuCanvas {
    pub async fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        log::info!("Creating GPU context...");
        let gpu = GpuContext::new(window.clone()).await?;

        let buffers = DotBuffers::new(&gpu.device, INITIAL_CAPACITY);
        let pipeline = DotPipeline::new(&gpu.device, gpu.format());
        let bind_group = pipeline.create_bind_group(&gpu.device, &buffers.view_buffer);

        let scale_factor = window.scale_factor() as f32;
        let logical = window.inner_size().to_logical::<f32>(window.scale_factor());

        Ok(Self {
            gpu,
            buffers,
            pipeline,
            bind_group,
            instances: Vec::with_capacity(INITIAL_CAPACITY),
            logical_size: [logical.width, logical.height],
            scale_factor,
            clear_color: wgpu::Color::TRANSPARENT,
        })
    }
}

impl Canvas for GpuCanvas {
    fn resize(&mut self, viewport: &Viewport) {
        self.logical_size = [viewport.width, viewport.height];
        self.scale_factor = viewport.scale_factor;
        let size = viewport.physical_size();
        log::info!("Surface resized to {}x{}", size.width, size.height);
        self.gpu.resize(size);
    }

    fn clear(&mut self, scale_factor: f32, backdrop: [f32; 3]) {
        self.instances.clear();
        self.scale_factor = scale_factor;
        self.clear_color = wgpu::Color {
            r: backdrop[0] as f64,
            g: backdrop[1] as f64,
            b: backdrop[2] as f64,
            a: 1.0,
        };
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, rgb: [f32; 3], alpha: f32) {
        self.instances.push(DotInstance::new(center.to_array(), radius, rgb, alpha));
    }

    fn present(&mut self) {
        let [width, height] = self.logical_size;
        if width <= 0.0 || height <= 0.0 {
            return;
        }

        let gpu = &self.gpu;
        self.buffers.update_view(&gpu.queue, self.logical_size, self.scale_factor);
        self.buffers.upload(&gpu.device, &gpu.queue, &self.instances);

        let output = match gpu.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::warn!("Surface lost, reconfiguring");
                gpu.reconfigure();
                return;
            }
            Err(e) => {
                log::error!("Surface error: {:?}", e);
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("frame-encoder"),
            });

        self.pipeline.draw(
            &mut encoder,
            &view,
            &self.bind_group,
            &self.buffers.instance_buffer,
            self.buffers.instance_count(),
            self.clear_color,
        );

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}
