use std::borrow::Cow;

use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::device::{uniforms, DeviceError, RenderDevice, UniformValue, VertexAttribute};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const UNIFORM_BINDING: u32 = 0;

// We need this for Rust to store our data correctly for the shaders. The
// field order matches the `Uniforms` struct in both WGSL stages, including
// the vec3 that packs together with the following f32.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck_derive::Pod, bytemuck_derive::Zeroable)]
struct Uniforms {
    center_offset: [f32; 3],
    time: f32,
    resolution: [f32; 2],
    mouse: [f32; 2],
    aspect: f32,
    matrix_size: f32,
    bias: f32,
    parallax_offset: f32,
}

static_assertions::assert_eq_size!(Uniforms, [f32; 12]);

impl Default for Uniforms {
    fn default() -> Self {
        Self {
            center_offset: [0.0; 3],
            time: 0.0,
            resolution: [1.0, 1.0],
            mouse: [0.0, 0.0],
            aspect: 1.0,
            matrix_size: 4.0,
            bias: 0.5,
            // No scroll drift unless a value is pushed.
            parallax_offset: 1.0,
        }
    }
}

impl Uniforms {
    /// Writes a named value. Returns false if the name or type is unknown.
    fn set(&mut self, name: &str, value: UniformValue) -> bool {
        use UniformValue::*;
        match (name, value) {
            (uniforms::TIME, Float(v)) => self.time = v,
            (uniforms::ASPECT, Float(v)) => self.aspect = v,
            (uniforms::MATRIX_SIZE, Float(v)) => self.matrix_size = v,
            (uniforms::BIAS, Float(v)) => self.bias = v,
            (uniforms::PARALLAX_OFFSET, Float(v)) => self.parallax_offset = v,
            (uniforms::RESOLUTION, Vec2(v)) => self.resolution = v,
            (uniforms::MOUSE, Vec2(v)) => self.mouse = v,
            (uniforms::CENTER_OFFSET, Vec3(v)) => self.center_offset = v,
            _ => return false,
        }
        true
    }
}

fn shader_location(name: &str) -> Option<u32> {
    match name {
        "position" => Some(0),
        "normal" => Some(1),
        "color" => Some(2),
        _ => None,
    }
}

fn vertex_format(components: u32) -> Option<wgpu::VertexFormat> {
    match components {
        1 => Some(wgpu::VertexFormat::Float32),
        2 => Some(wgpu::VertexFormat::Float32x2),
        3 => Some(wgpu::VertexFormat::Float32x3),
        4 => Some(wgpu::VertexFormat::Float32x4),
        _ => None,
    }
}

/// The low resolution color and depth targets the scene is drawn into.
struct SceneTarget {
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
    blit_bind_group: wgpu::BindGroup,
}

struct Program {
    vertex: wgpu::ShaderModule,
    fragment: wgpu::ShaderModule,
}

/// A [`RenderDevice`] backed by wgpu.
///
/// The scene is rendered at the viewport size into an off-screen texture,
/// which is then stretched over the whole surface with nearest filtering.
pub struct WgpuDevice {
    surface: wgpu::Surface,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    uniforms: Uniforms,
    uniforms_dirty: bool,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group_layout: wgpu::BindGroupLayout,
    uniform_bind_group: wgpu::BindGroup,
    program: Option<Program>,
    attributes: Vec<wgpu::VertexAttribute>,
    stride: wgpu::BufferAddress,
    scene_pipeline: Option<wgpu::RenderPipeline>,
    vertex_buffer: Option<wgpu::Buffer>,
    clear_color: wgpu::Color,
    target: Option<SceneTarget>,
    blit_pipeline: wgpu::RenderPipeline,
    blit_bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
}

impl WgpuDevice {
    // Creating some of the wgpu types requires async code
    pub async fn new(window: &Window) -> Result<Self, DeviceError> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // Backends::all => Vulkan + Metal + DX12 + Browser WebGPU
        let instance = wgpu::Instance::new(wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            dx12_shader_compiler: Default::default(),
        });

        // # Safety
        //
        // The surface needs to live as long as the window that created it.
        // The app drops the device before the window.
        let surface = unsafe { instance.create_surface(window) }
            .map_err(|e| DeviceError::Unsupported(e.to_string()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| DeviceError::Unsupported("no compatible graphics adapter".to_string()))?;

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    features: wgpu::Features::empty(),
                    // WebGL doesn't support all of wgpu's features, so if
                    // we're building for the web we'll have to disable some.
                    limits: if cfg!(target_arch = "wasm32") {
                        wgpu::Limits::downlevel_webgl2_defaults()
                    } else {
                        wgpu::Limits::default()
                    },
                    label: None,
                },
                None, // Trace path
            )
            .await
            .map_err(|e| DeviceError::Unsupported(e.to_string()))?;
        device.on_uncaptured_error(Box::new(|e: wgpu::Error| {
            log::error!("graphics device error: {}", e)
        }));

        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .ok_or_else(|| DeviceError::Unsupported("surface has no formats".to_string()))?;
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
        };
        surface.configure(&device, &config);

        let uniforms = Uniforms::default();
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        // Ex:
        //     @group(0) @binding(0)
        //     var<uniform> u: Uniforms;
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: UNIFORM_BINDING,
                    visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("uniform_bind_group_layout"),
            });
        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: UNIFORM_BINDING,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("uniform_bind_group"),
        });

        let blit_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            multisampled: false,
                            view_dimension: wgpu::TextureViewDimension::D2,
                            sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                        count: None,
                    },
                ],
                label: Some("blit_bind_group_layout"),
            });
        // Nearest filtering is what makes the upscaled pixels visible.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Blit Sampler"),
            mag_filter: wgpu::FilterMode::Nearest,
            min_filter: wgpu::FilterMode::Nearest,
            mipmap_filter: wgpu::FilterMode::Nearest,
            ..Default::default()
        });
        let blit_pipeline = Self::create_blit_pipeline(&device, &blit_bind_group_layout, config.format);

        log::info!("graphics adapter: {:?}", adapter.get_info());
        Ok(Self {
            surface,
            device,
            queue,
            config,
            uniforms,
            uniforms_dirty: false,
            uniform_buffer,
            uniform_bind_group_layout,
            uniform_bind_group,
            program: None,
            attributes: Vec::new(),
            stride: 0,
            scene_pipeline: None,
            vertex_buffer: None,
            clear_color: wgpu::Color::BLACK,
            target: None,
            blit_pipeline,
            blit_bind_group_layout,
            sampler,
        })
    }

    fn create_blit_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        format: wgpu::TextureFormat,
    ) -> wgpu::RenderPipeline {
        let shader = device.create_shader_module(wgpu::include_wgsl!("blit.wgsl"));
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Blit Pipeline Layout"),
            bind_group_layouts: &[layout],
            push_constant_ranges: &[],
        });
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Blit Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: "vs_blit",
                buffers: &[],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: "fs_blit",
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        })
    }

    fn create_scene_pipeline(&self) -> Result<wgpu::RenderPipeline, DeviceError> {
        let program = self
            .program
            .as_ref()
            .ok_or_else(|| DeviceError::Frame("no program compiled".to_string()))?;
        let layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[/* bind_group = 0 */ &self.uniform_bind_group_layout],
                push_constant_ranges: &[],
            });
        Ok(self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Scene Pipeline"),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: &program.vertex,
                    entry_point: "vs_main",
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: self.stride,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &self.attributes,
                    }],
                },
                fragment: Some(wgpu::FragmentState {
                    module: &program.fragment,
                    entry_point: "fs_main",
                    targets: &[Some(wgpu::ColorTargetState {
                        format: self.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: Some(wgpu::Face::Back),
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: true,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
            }))
    }

    fn create_texture(
        &self,
        label: &str,
        width: u32,
        height: u32,
        format: wgpu::TextureFormat,
        usage: wgpu::TextureUsages,
    ) -> wgpu::TextureView {
        self.device
            .create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage,
                view_formats: &[],
            })
            .create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Resizes the presented surface to match the window.
    pub fn resize_surface(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width > 0 && new_size.height > 0 {
            self.config.width = new_size.width;
            self.config.height = new_size.height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Reconfigures the surface with its current size, ex: after it was lost.
    pub fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
    }

    fn compile_stage(&self, label: &str, source: &str) -> Result<wgpu::ShaderModule, DeviceError> {
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = self
            .device
            .create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(label),
                source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
            });
        // Native and WebGL backends resolve error scopes immediately, so this
        // never parks the thread.
        match pollster::block_on(self.device.pop_error_scope()) {
            Some(e) => Err(DeviceError::Compile(format!("{}: {}", label, e))),
            None => Ok(module),
        }
    }
}

impl RenderDevice for WgpuDevice {
    fn compile_program(
        &mut self,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<(), DeviceError> {
        let vertex = self.compile_stage("vertex shader", vertex_source)?;
        let fragment = self.compile_stage("fragment shader", fragment_source)?;
        self.program = Some(Program { vertex, fragment });
        self.scene_pipeline = None;
        Ok(())
    }

    fn upload_buffer(&mut self, data: &[f32]) {
        self.vertex_buffer = Some(
            self.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Vertex Buffer"),
                    contents: bytemuck::cast_slice(data),
                    usage: wgpu::BufferUsages::VERTEX,
                }),
        );
    }

    fn bind_vertex_attribute(&mut self, attribute: &VertexAttribute) -> Result<(), DeviceError> {
        let shader_location = shader_location(attribute.name)
            .ok_or_else(|| DeviceError::UnknownAttribute(attribute.name.to_string()))?;
        let format = vertex_format(attribute.components).ok_or_else(|| {
            DeviceError::UnknownAttribute(format!(
                "{} with {} components",
                attribute.name, attribute.components
            ))
        })?;
        self.attributes.retain(|a| a.shader_location != shader_location);
        self.attributes.push(wgpu::VertexAttribute {
            offset: attribute.offset as wgpu::BufferAddress,
            shader_location,
            format,
        });
        self.stride = attribute.stride as wgpu::BufferAddress;
        self.scene_pipeline = None;
        Ok(())
    }

    fn set_uniform(&mut self, name: &str, value: UniformValue) {
        if self.uniforms.set(name, value) {
            self.uniforms_dirty = true;
        } else {
            log::debug!("ignoring uniform {} = {:?}", name, value);
        }
    }

    fn clear(&mut self, color: [f32; 4]) {
        self.clear_color = wgpu::Color {
            r: color[0] as f64,
            g: color[1] as f64,
            b: color[2] as f64,
            a: color[3] as f64,
        };
    }

    fn draw(&mut self, vertex_count: u32) -> Result<(), DeviceError> {
        if self.scene_pipeline.is_none() {
            self.scene_pipeline = Some(self.create_scene_pipeline()?);
        }
        let (Some(pipeline), Some(vertex_buffer), Some(target)) =
            (&self.scene_pipeline, &self.vertex_buffer, &self.target)
        else {
            log::trace!("skipping frame, nothing to draw into");
            return Ok(());
        };

        if self.uniforms_dirty {
            self.queue
                .write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[self.uniforms]));
            self.uniforms_dirty = false;
        }

        let output = self.surface.get_current_texture().map_err(|e| match e {
            wgpu::SurfaceError::Lost => DeviceError::SurfaceLost,
            wgpu::SurfaceError::OutOfMemory => DeviceError::OutOfMemory,
            e => DeviceError::Frame(e.to_string()),
        })?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: true,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: true,
                    }),
                    stencil_ops: None,
                }),
            });
            render_pass.set_pipeline(pipeline);
            render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
            render_pass.set_vertex_buffer(0, vertex_buffer.slice(..));
            render_pass.draw(0..vertex_count, 0..1);
        }

        {
            let mut blit_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Blit Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: true,
                    },
                })],
                depth_stencil_attachment: None,
            });
            blit_pass.set_pipeline(&self.blit_pipeline);
            blit_pass.set_bind_group(0, &target.blit_bind_group, &[]);
            blit_pass.draw(0..3, 0..1);
        }

        // submit will accept anything that implements IntoIter
        self.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }

    fn resize_viewport(&mut self, width: u32, height: u32) {
        let color_view = self.create_texture(
            "Scene Color",
            width,
            height,
            self.config.format,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let depth_view = self.create_texture(
            "Scene Depth",
            width,
            height,
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let blit_bind_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.blit_bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&color_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
            label: Some("blit_bind_group"),
        });
        log::debug!("scene target resized to {}x{}", width, height);
        self.target = Some(SceneTarget {
            color_view,
            depth_view,
            blit_bind_group,
        });
    }
}
