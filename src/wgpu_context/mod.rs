use std::sync::Arc;

use wgpu::*;
use winit::window::Window;

use crate::error::StartupError;

pub use buffers::*;

pub struct WGPUContext {
    #[allow(dead_code)]
    instance: Instance,
    surface: Surface<'static>,
    #[allow(dead_code)]
    adapter: Adapter,
    device: Device,
    queue: Queue,
    config: SurfaceConfiguration,
}

impl WGPUContext {
    /// Creates the surface, device and queue for `window` and configures
    /// the surface for `size`
    ///
    /// Backends can be restricted with the `WGPU_BACKEND` environment variable
    pub fn new(window: Arc<Window>, size: [u32; 2], vsync: bool) -> Result<Self, StartupError> {
        let instance = Instance::new(&InstanceDescriptor {
            backends: Backends::from_env().unwrap_or(Backends::PRIMARY | Backends::GL),
            flags: InstanceFlags::from_build_config(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = pollster::block_on(instance.request_adapter(&RequestAdapterOptions {
            compatible_surface: Some(&surface),
            ..Default::default()
        }))
        .ok_or(StartupError::NoAdapter)?;
        log::info!("Using adapter: {:?}", adapter.get_info());

        let capabilities = surface.get_capabilities(&adapter);
        // The clear colour and shader outputs are written as is, so prefer
        // a linear format over an sRGB one
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|format| !format.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or(StartupError::NoSurfaceFormat)?;

        let config = SurfaceConfiguration {
            usage: TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size[0].max(1),
            height: size[1].max(1),
            present_mode: if vsync { PresentMode::AutoVsync } else { PresentMode::AutoNoVsync },
            desired_maximum_frame_latency: 2,
            alpha_mode: CompositeAlphaMode::Auto,
            view_formats: vec![],
        };

        let (device, queue) = pollster::block_on(adapter.request_device(
            &DeviceDescriptor {
                label: Some("Device"),
                required_features: Features::empty(),
                required_limits: Limits::downlevel_webgl2_defaults().using_resolution(adapter.limits()),
                memory_hints: MemoryHints::Performance,
            },
            None,
        ))?;

        device.on_uncaptured_error(Box::new(|error| {
            log::error!("Uncaptured device error: {error}");
        }));

        surface.configure(&device, &config);
        log::debug!("Surface configured: {:?}", config);

        Ok(Self {
            instance,
            surface,
            adapter,
            device,
            queue,
            config,
        })
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    pub fn config(&self) -> &SurfaceConfiguration {
        &self.config
    }

    /// Reconfigures the surface for a new framebuffer size. Zero sized
    /// (minimized) windows keep the previous configuration
    pub fn resize(&mut self, new_size: [u32; 2]) {
        if new_size[0] == 0 || new_size[1] == 0 {
            return;
        }
        self.config.width = new_size[0];
        self.config.height = new_size[1];
        self.surface.configure(&self.device, &self.config);
    }

    /// Reconfigures the surface with the current configuration, used
    /// after the surface was lost or became outdated
    pub fn reconfigure(&self) {
        self.surface.configure(&self.device, &self.config);
    }

    pub fn get_encoder(&self) -> CommandEncoder {
        self.device
            .create_command_encoder(&CommandEncoderDescriptor { label: None })
    }
}

pub trait BufferData {
    // If a type requires filling multiple buffers, this should a tuple of compatible buffers
    type Buffers;
    fn create_buffers(&self, context: &WGPUContext) -> Self::Buffers;
    fn fill_buffers(&self, buffers: &mut Self::Buffers, context: &WGPUContext);
}

pub struct BufferAndData<T: BufferData> {
    pub data: T,
    pub buffers: T::Buffers,
}

impl<T: BufferData> BufferAndData<T> {
    pub fn new(data: T, context: &WGPUContext) -> Self {
        let mut buffers = T::create_buffers(&data, context);
        T::fill_buffers(&data, &mut buffers, context);
        Self { data, buffers }
    }

    pub fn update_buffer(&mut self, context: &WGPUContext) {
        self.data.fill_buffers(&mut self.buffers, context);
    }
}

/// Index data for indexed draws
impl BufferData for Vec<u32> {
    type Buffers = WGPUBuffer;
    fn create_buffers(&self, context: &WGPUContext) -> Self::Buffers {
        WGPUBuffer::new_index(std::mem::size_of_val(self.as_slice()) as u64, context)
    }
    fn fill_buffers(&self, buffers: &mut Self::Buffers, context: &WGPUContext) {
        buffers.write_data(bytemuck::cast_slice(self.as_slice()), context);
    }
}

mod buffers {
    use super::WGPUContext;

    use wgpu::*;

    pub const UNIFORM_BUFFER_ALIGNMENT: u64 = 16;

    /// Rounds `size` up to the next multiple of [UNIFORM_BUFFER_ALIGNMENT]
    pub fn uniform_buffer_size(size: u64) -> u64 {
        size.div_ceil(UNIFORM_BUFFER_ALIGNMENT).max(1) * UNIFORM_BUFFER_ALIGNMENT
    }

    /// Owned GPU buffer, destroyed on drop
    pub struct WGPUBuffer {
        buffer: Buffer,
    }

    impl WGPUBuffer {
        pub fn new_uniform(size: u64, context: &WGPUContext) -> Self {
            Self {
                buffer: Self::new(
                    uniform_buffer_size(size),
                    BufferUsages::COPY_DST | BufferUsages::UNIFORM,
                    context,
                ),
            }
        }

        pub fn new_vertex(size: u64, context: &WGPUContext) -> Self {
            Self {
                buffer: Self::new(size, BufferUsages::COPY_DST | BufferUsages::VERTEX, context),
            }
        }

        pub fn new_index(size: u64, context: &WGPUContext) -> Self {
            Self {
                buffer: Self::new(size, BufferUsages::COPY_DST | BufferUsages::INDEX, context),
            }
        }

        pub fn size(&self) -> u64 {
            self.buffer.size()
        }

        fn new(size: u64, usage: BufferUsages, context: &WGPUContext) -> Buffer {
            context.device().create_buffer(&BufferDescriptor {
                label: None,
                size,
                usage,
                mapped_at_creation: false,
            })
        }

        /// Replaces the buffer with a larger one if `new_size` does not fit.
        /// The contents are not preserved
        pub fn resize(&mut self, new_size: u64, context: &WGPUContext) {
            if self.size() < new_size {
                self.buffer.destroy();
                self.buffer = Self::new(new_size, self.buffer.usage(), context);
            }
        }

        pub fn destroy(&self) {
            self.buffer.destroy();
        }

        pub fn write_data(&mut self, data: &[u8], context: &WGPUContext) {
            self.resize(data.len() as u64, context);
            context.queue().write_buffer(&self.buffer, 0, data);
        }
    }

    impl std::ops::Deref for WGPUBuffer {
        type Target = Buffer;
        fn deref(&self) -> &Self::Target {
            &self.buffer
        }
    }

    impl Drop for WGPUBuffer {
        fn drop(&mut self) {
            self.destroy();
        }
    }

    #[cfg(test)]
    mod buffer_tests {
        use super::uniform_buffer_size;

        #[test]
        fn uniform_size_is_aligned() {
            assert_eq!(uniform_buffer_size(1), 16);
            assert_eq!(uniform_buffer_size(16), 16);
            assert_eq!(uniform_buffer_size(17), 32);
            assert_eq!(uniform_buffer_size(64), 64);
            // A 4x4 f32 matrix
            assert_eq!(uniform_buffer_size(std::mem::size_of::<[[f32; 4]; 4]>() as u64), 64);
        }

        #[test]
        fn empty_uniform_still_has_a_slot() {
            assert_eq!(uniform_buffer_size(0), 16);
        }
    }
}
