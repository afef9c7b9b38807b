use wgpu::{Buffer, BufferUsages, Device, Queue};

/// One dot as drawn by the instanced circle pipeline (32 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DotInstance {
    /// Center in logical pixels
    pub center: [f32; 2],
    pub radius: f32,
    /// Straight alpha
    pub alpha: f32,
    /// sRGB color, 0-1
    pub color: [f32; 3],
    pub _padding: f32,
}

impl DotInstance {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 4] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32, 2 => Float32, 3 => Float32x3];

    pub fn new(center: [f32; 2], radius: f32, color: [f32; 3], alpha: f32) -> Self {
        Self {
            center,
            radius,
            alpha: alpha.clamp(0.0, 1.0),
            color,
            _padding: 0.0,
        }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<DotInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Viewport parameters for the circle shader (16 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewParams {
    /// Viewport size in logical pixels
    pub logical_size: [f32; 2],
    /// Device pixels per logical pixel
    pub scale_factor: f32,
    pub _padding: f32,
}

/// Instance and uniform buffers for the dot field
pub struct DotBuffers {
    /// Per-dot instance data, grown on demand
    pub instance_buffer: Buffer,
    /// Uniform buffer for view parameters
    pub view_buffer: Buffer,
    /// Instances the buffer can hold
    capacity: usize,
    /// Instances written this frame
    instance_count: u32,
}

impl DotBuffers {
    pub fn new(device: &Device, initial_capacity: usize) -> Self {
        let capacity = initial_capacity.max(1);

        let view_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view-params-buffer"),
            size: std::mem::size_of::<ViewParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            instance_buffer: create_instance_buffer(device, capacity),
            view_buffer,
            capacity,
            instance_count: 0,
        }
    }

    /// Write this frame's dots, reallocating when the field outgrew the buffer
    pub fn upload(&mut self, device: &Device, queue: &Queue, instances: &[DotInstance]) {
        if instances.len() > self.capacity {
            self.capacity = instances.len().next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.capacity);
            log::debug!("Instance buffer grown to {} dots", self.capacity);
        }

        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
        self.instance_count = instances.len() as u32;
    }

    pub fn update_view(&self, queue: &Queue, logical_size: [f32; 2], scale_factor: f32) {
        let params = ViewParams {
            logical_size,
            scale_factor,
            _padding: 0.0,
        };
        queue.write_buffer(&self.view_buffer, 0, bytemuck::bytes_of(&params));
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }
}

fn create_instance_buffer(device: &Device, capacity: usize) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("dot-instance-buffer"),
        size: (capacity * std::mem::size_of::<DotInstance>()) as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_instance_size() {
        assert_eq!(std::mem::size_of::<DotInstance>(), 32);
        assert_eq!(DotInstance::layout().array_stride, 32);
    }

    #[test]
    fn test_view_params_size() {
        assert_eq!(std::mem::size_of::<ViewParams>(), 16);
    }

    #[test]
    fn test_instance_alpha_clamped() {
        let over = DotInstance::new([0.0, 0.0], 1.5, [1.0, 1.0, 1.0], 1.2);
        assert_eq!(over.alpha, 1.0);
        let under = DotInstance::new([0.0, 0.0], 1.5, [1.0, 1.0, 1.0], -0.1);
        assert_eq!(under.alpha, 0.0);
    }
}
