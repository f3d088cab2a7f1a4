//! Typed GPU buffer wrappers
//!
//! [`InstanceBuffer`] holds per-instance vertex data with a fixed capacity;
//! [`UniformBuffer`] mirrors a single `Pod` struct and only writes when the
//! value changed.

use std::marker::PhantomData;

use bytemuck::Pod;
use wgpu::util::DeviceExt;

/// Fixed-capacity instance buffer.
///
/// Updates beyond the capacity are truncated with a warning.
pub struct InstanceBuffer<T: Pod> {
    buffer: wgpu::Buffer,
    count: u32,
    max_instances: u32,
    _marker: PhantomData<T>,
}

impl<T: Pod> InstanceBuffer<T> {
    /// Allocate room for `max_instances` instances.
    pub fn new(device: &wgpu::Device, label: &str, max_instances: u32) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Instance Buffer", label)),
            size: (max_instances as usize * std::mem::size_of::<T>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            count: 0,
            max_instances,
            _marker: PhantomData,
        }
    }

    /// Replace the instance data.
    pub fn update(&mut self, queue: &wgpu::Queue, instances: &[T]) {
        if instances.len() > self.max_instances as usize {
            tracing::warn!(
                "Instance count {} exceeds maximum {}, truncating",
                instances.len(),
                self.max_instances
            );
        }

        let count = instances.len().min(self.max_instances as usize);
        self.count = count as u32;
        if count > 0 {
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&instances[..count]));
        }
    }

    /// Number of instances to draw
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Whether there is nothing to draw
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Buffer slice for `set_vertex_buffer`
    pub fn slice(&self) -> wgpu::BufferSlice<'_> {
        self.buffer.slice(..)
    }
}

/// Uniform buffer holding one value of `T`.
pub struct UniformBuffer<T: Pod + PartialEq> {
    buffer: wgpu::Buffer,
    value: T,
}

impl<T: Pod + PartialEq> UniformBuffer<T> {
    /// Create the buffer initialized with `value`.
    pub fn new(device: &wgpu::Device, label: &str, value: T) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Uniform Buffer", label)),
            contents: bytemuck::bytes_of(&value),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        Self { buffer, value }
    }

    /// Write `value` if it differs from what the GPU already holds.
    /// Returns whether a write was issued.
    pub fn set(&mut self, queue: &wgpu::Queue, value: T) -> bool {
        if self.value == value {
            return false;
        }
        self.value = value;
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&self.value));
        true
    }

    /// Last value written
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The underlying buffer, for bind group creation
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }
}

/// Layout entry for a uniform buffer visible to both shader stages
pub fn uniform_layout_entry(binding: u32) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

/// Bind group layout with a single uniform buffer at binding 0
pub fn uniform_bind_group_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(&format!("{} Bind Group Layout", label)),
        entries: &[uniform_layout_entry(0)],
    })
}
