//! GPU compute backend.
//!
//! Runs the same sampler/intersector/scatterer/integrator sequence as the
//! CPU path in a WGSL kernel, one invocation per pixel in 16x16 workgroups.
//! The sphere list and the precomputed per-pixel world positions are
//! uploaded once per scene change; every dispatch blends its pass into the
//! device-side output buffer against the pass counter mirrored from the
//! host accumulator. Successive dispatches are serialized by the device
//! queue, so two passes never race on the output buffer.

use bytemuck::{Pod, Zeroable};
use glam::Vec3A;
use log::info;
use wgpu::util::DeviceExt;

use crate::camera::CameraGeometry;
use crate::config::RenderConfig;
use crate::error::GpuError;
use crate::scene::Scene;
use crate::sphere::GPU_SPHERE_FLOATS;

const TRACE_WGSL: &str = include_str!("shaders/trace.wgsl");
const WORKGROUP_SIZE: u32 = 16;

/// Uniform block handed to the kernel; layout matches `Params` in
/// trace.wgsl (vec3 + scalar pairs pack into 16-byte rows).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct GpuParams {
    camera_position: [f32; 3],
    num_iterations: u32,
    ambient_light: [f32; 3],
    num_spheres: u32,
    resolution_x: u32,
    resolution_y: u32,
    sample_rate: u32,
    seed: u32,
    width_per_pixel: f32,
    height_per_pixel: f32,
    max_bounces: u32,
    _pad: u32,
}

/// Device-side scene state, rebuilt on every scene change.
struct GpuScene {
    params: GpuParams,
    params_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    output_buffer: wgpu::Buffer,
    readback_buffer: wgpu::Buffer,
    pixel_count: usize,
    width: u32,
    height: u32,
}

/// wgpu-based renderer driving the path tracing compute kernel.
pub struct GpuRenderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    scene: Option<GpuScene>,
}

impl GpuRenderer {
    /// Initialize the GPU device and compile the trace kernel.
    pub fn new() -> Result<Self, GpuError> {
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok_or(GpuError::NoAdapter)?;

        info!("GPU backend using adapter: {}", adapter.get_info().name);

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("emberpath device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))?;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("trace kernel"),
            source: wgpu::ShaderSource::Wgsl(TRACE_WGSL.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("trace bind group layout"),
            entries: &[
                // Uniform render parameters.
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Per-pixel world positions.
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Sphere records.
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Blended output image.
                wgpu::BindGroupLayoutEntry {
                    binding: 3,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: false },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("trace pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("trace pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: "main",
            compilation_options: Default::default(),
            cache: None,
        });

        Ok(Self {
            device,
            queue,
            pipeline,
            bind_group_layout,
            scene: None,
        })
    }

    /// Upload the scene geometry and per-pixel world positions, replacing
    /// any previously uploaded scene. The device-side output buffer starts
    /// zeroed, matching a freshly reset accumulator.
    pub fn upload_scene(&mut self, scene: &Scene, geometry: &CameraGeometry, config: &RenderConfig) {
        let camera = &scene.camera;
        let pixel_count = (camera.width * camera.height) as usize;

        let mut positions = Vec::with_capacity(pixel_count * 3);
        for p in geometry.pixel_positions(camera) {
            positions.extend_from_slice(&[p.x, p.y, p.z]);
        }

        let mut sphere_data = Vec::with_capacity(scene.spheres.len() * GPU_SPHERE_FLOATS);
        for sphere in &scene.spheres {
            sphere_data.extend_from_slice(&sphere.to_gpu());
        }
        if sphere_data.is_empty() {
            // Zero-size buffers cannot be bound; the kernel reads none of
            // this because num_spheres stays 0.
            sphere_data.resize(GPU_SPHERE_FLOATS, 0.0);
        }

        let params = GpuParams {
            camera_position: camera.position.into(),
            num_iterations: 0,
            ambient_light: config.ambient().into(),
            num_spheres: scene.spheres.len() as u32,
            resolution_x: camera.width,
            resolution_y: camera.height,
            sample_rate: config.sample_rate,
            seed: (config.seed ^ (config.seed >> 32)) as u32,
            width_per_pixel: geometry.width_per_pixel,
            height_per_pixel: geometry.height_per_pixel,
            max_bounces: config.max_bounces,
            _pad: 0,
        };

        let params_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("trace params"),
                contents: bytemuck::bytes_of(&params),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });

        let positions_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("pixel positions"),
                contents: bytemuck::cast_slice(&positions),
                usage: wgpu::BufferUsages::STORAGE,
            });

        let spheres_buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("spheres"),
                contents: bytemuck::cast_slice(&sphere_data),
                usage: wgpu::BufferUsages::STORAGE,
            });

        let output_size = (pixel_count * 4 * std::mem::size_of::<f32>()) as u64;
        let output_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trace output"),
            size: output_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let readback_buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trace readback"),
            size: output_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("trace bind group"),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: params_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: positions_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: spheres_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 3,
                    resource: output_buffer.as_entire_binding(),
                },
            ],
        });

        info!(
            "Uploaded scene to GPU: {} spheres, {}x{} pixels",
            scene.spheres.len(),
            camera.width,
            camera.height
        );

        self.scene = Some(GpuScene {
            params,
            params_buffer,
            bind_group,
            output_buffer,
            readback_buffer,
            pixel_count,
            width: camera.width,
            height: camera.height,
        });
    }

    /// Dispatch one refinement pass and read back the blended image.
    ///
    /// `pass` is the host accumulator's pass count; the kernel uses it to
    /// weight the blend exactly like the CPU accumulator.
    pub fn render_pass(&mut self, pass: u32) -> Result<Vec<Vec3A>, GpuError> {
        let scene = self.scene.as_mut().ok_or(GpuError::NoScene)?;

        scene.params.num_iterations = pass;
        self.queue
            .write_buffer(&scene.params_buffer, 0, bytemuck::bytes_of(&scene.params));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("trace encoder"),
            });
        {
            let mut cpass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("trace pass"),
                timestamp_writes: None,
            });
            cpass.set_pipeline(&self.pipeline);
            cpass.set_bind_group(0, &scene.bind_group, &[]);
            cpass.dispatch_workgroups(
                scene.width.div_ceil(WORKGROUP_SIZE),
                scene.height.div_ceil(WORKGROUP_SIZE),
                1,
            );
        }
        encoder.copy_buffer_to_buffer(
            &scene.output_buffer,
            0,
            &scene.readback_buffer,
            0,
            scene.readback_buffer.size(),
        );
        self.queue.submit(Some(encoder.finish()));

        let slice = scene.readback_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|e| GpuError::Readback(e.to_string()))?
            .map_err(|e| GpuError::Readback(e.to_string()))?;

        let mut values = Vec::with_capacity(scene.pixel_count);
        {
            let data = slice.get_mapped_range();
            let floats: &[f32] = bytemuck::cast_slice(&data);
            for pixel in floats.chunks_exact(4) {
                values.push(Vec3A::new(pixel[0], pixel[1], pixel[2]));
            }
        }
        scene.readback_buffer.unmap();

        Ok(values)
    }
}
