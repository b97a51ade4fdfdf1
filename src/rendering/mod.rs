mod quad {
	use derive::{UniformBufferData, VertexBufferData};
	use bytemuck::{Pod, Zeroable};

	use crate::math::Matrix4;

	#[repr(C)]
	#[derive(Zeroable, Pod, Clone, Copy, Debug, PartialEq, VertexBufferData)]
	pub struct Vertex {
		pub position: [f32;2],
	}

	/// Model matrix consumed by the vertex shader as `model`
	#[repr(C)]
	#[derive(Zeroable, Pod, Clone, Copy, Debug, PartialEq, UniformBufferData)]
	pub struct Transform {
		pub model: Matrix4,
	}

	/// Corners of a half-unit square centred on the origin, in clip space
	pub const QUAD_VERTICES: [Vertex;4] = [
		Vertex { position: [-0.25, -0.25] },
		Vertex { position: [-0.25,  0.25] },
		Vertex { position: [ 0.25,  0.25] },
		Vertex { position: [ 0.25, -0.25] },
	];

	/// Two triangles covering [QUAD_VERTICES]
	pub const QUAD_INDICES: [u32;6] = [
		0, 1, 2,
		2, 3, 0,
	];

	#[cfg(test)]
	mod quad_tests {
		use super::*;

		#[test]
		fn vertex_layout_is_tightly_packed() {
			let layout = Vertex::vertex_buffer_layout();
			assert_eq!(layout.array_stride, 8);
			assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
			assert_eq!(layout.attributes.len(), 1);
			assert_eq!(layout.attributes[0].shader_location, 0);
			assert_eq!(layout.attributes[0].offset, 0);
			assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x2);
		}

		#[test]
		fn transform_is_a_mat4() {
			assert_eq!(std::mem::size_of::<Transform>(), 64);
			let transform = Transform { model: Matrix4::IDENTITY };
			assert_eq!(bytemuck::cast_slice::<u8, f32>(bytemuck::bytes_of(&transform))[15], 1.);
		}

		#[test]
		fn indices_reference_every_vertex() {
			assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
			(0..QUAD_VERTICES.len() as u32).for_each(|v| assert!(QUAD_INDICES.contains(&v)));
		}

		#[test]
		fn triangles_cover_the_square() {
			let area: f32 = QUAD_INDICES.chunks(3).map(|triangle| {
				let [a, b, c] = [0, 1, 2].map(|i| QUAD_VERTICES[triangle[i] as usize].position);
				((b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1])).abs() / 2.
			}).sum();
			assert!((area - 0.25).abs() < 1e-6);
		}
	}
}

pub use quad::*;

mod quad_renderer {
	use wgpu::*;

	use super::quad::*;
	use crate::config::RenderConfig;
	use crate::math::Matrix4;
	use crate::shader_manager::{ProgramLayout, ShaderProgram};
	use crate::wgpu_context::{BufferAndData, WGPUContext};

	/// Outcome of a single frame
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub enum FrameStatus {
		Presented,
		/// The surface could not provide a texture this frame. Rendering may resume next frame
		Skipped,
		/// The device ran out of memory
		Fatal,
	}

	/// Draws the quad with the linked shader program
	pub struct QuadRenderer {
		vertices: BufferAndData<Vec<Vertex>>,
		indices: BufferAndData<Vec<u32>>,
		transform: BufferAndData<Transform>,
		transform_bind_group: BindGroup,
		/// [None] if the shaders failed to compile or link. Frames are then
		/// cleared and presented without drawing
		program: Option<ShaderProgram>,
		clear_color: Color,
	}

	impl QuadRenderer {
		pub fn new(context: &WGPUContext, config: &RenderConfig) -> Self {
			let vertices = BufferAndData::new(QUAD_VERTICES.to_vec(), context);
			let indices = BufferAndData::new(QUAD_INDICES.to_vec(), context);
			let transform = BufferAndData::new(Transform { model: Matrix4::IDENTITY }, context);

			let transform_bind_group_layout = context.device().create_bind_group_layout(&BindGroupLayoutDescriptor{
				label: Some("model bind group layout"),
				entries: &[
					BindGroupLayoutEntry {
						binding: 0,
						visibility: ShaderStages::VERTEX,
						ty: BindingType::Buffer{
							ty: BufferBindingType::Uniform,
							has_dynamic_offset: false,
							min_binding_size: None,
						},
						count: None,
					},
				],
			});

			let transform_bind_group = context.device().create_bind_group(&BindGroupDescriptor{
				label: Some("model bind group"),
				layout: &transform_bind_group_layout,
				entries: &[
					BindGroupEntry{
						binding: 0,
						resource: transform.buffers.as_entire_binding(),
					},
				],
			});

			let pipeline_layout = context.device().create_pipeline_layout(&PipelineLayoutDescriptor{
				label: Some("Quad pipeline layout"),
				bind_group_layouts: &[&transform_bind_group_layout],
				push_constant_ranges: &[],
			});

			let program = ShaderProgram::from_files(
				context.device(),
				&config.vertex_shader_path(),
				&config.fragment_shader_path(),
				&ProgramLayout {
					pipeline_layout: &pipeline_layout,
					vertex_buffers: &[Vertex::vertex_buffer_layout()],
					target_format: context.config().format,
				},
			).ok();
			if program.is_none() {
				log::warn!("Continuing without a shader program; frames will only be cleared");
			}

			let [r, g, b, a] = config.clear_color;
			Self {
				vertices,
				indices,
				transform,
				transform_bind_group,
				program,
				clear_color: Color { r, g, b, a },
			}
		}

		pub fn set_model(&mut self, model: Matrix4, context: &WGPUContext) {
			self.transform.data.model = model;
			self.transform.update_buffer(context);
		}

		pub fn render(&self, context: &WGPUContext) -> FrameStatus {
			let surface_texture = match context.surface().get_current_texture() {
				Ok(texture) => texture,
				Err(SurfaceError::Lost | SurfaceError::Outdated) => {
					log::debug!("Surface lost or outdated; reconfiguring");
					context.reconfigure();
					return FrameStatus::Skipped;
				}
				Err(SurfaceError::OutOfMemory) => {
					log::error!("Out of memory while acquiring a surface texture");
					return FrameStatus::Fatal;
				}
				Err(err) => {
					log::warn!("Skipping frame: {err}");
					return FrameStatus::Skipped;
				}
			};

			let texture_view = surface_texture.texture.create_view(&TextureViewDescriptor::default());

			let mut encoder = context.get_encoder();
			let mut render_pass = encoder.begin_render_pass(&RenderPassDescriptor{
				label: Some("Quad render pass"),
				color_attachments: &[
					Some(RenderPassColorAttachment{
						view: &texture_view,
						resolve_target: None,
						ops: Operations {
							load: LoadOp::Clear(self.clear_color),
							store: StoreOp::Store,
						}
					})
				],
				..Default::default()
			});

			if let Some(program) = &self.program {
				render_pass.set_pipeline(program.pipeline());
				render_pass.set_bind_group(0, &self.transform_bind_group, &[]);
				render_pass.set_vertex_buffer(0, self.vertices.buffers.slice(..));
				render_pass.set_index_buffer(self.indices.buffers.slice(..), IndexFormat::Uint32);
				render_pass.draw_indexed(0..self.indices.data.len() as u32, 0, 0..1);
			}

			std::mem::drop(render_pass);
			context.queue().submit([encoder.finish()]);
			surface_texture.present();
			FrameStatus::Presented
		}
	}
}

pub use quad_renderer::*;
