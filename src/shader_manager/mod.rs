use std::borrow::Cow;
use std::fs::read_to_string;
use std::path::Path;

use thiserror::Error;
use wgpu::*;

/// Maximum number of bytes of a compiler or linker log that is kept
pub const INFO_LOG_CAPACITY: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
	Vertex,
	Fragment,
}

impl std::fmt::Display for ShaderStage {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ShaderStage::Vertex => write!(f, "vertex"),
			ShaderStage::Fragment => write!(f, "fragment"),
		}
	}
}

#[derive(Debug, Error, PartialEq)]
pub enum ShaderError {
	#[error("Shader compilation failed ({stage} stage):\n{log}")]
	Compile {
		stage: ShaderStage,
		log: String,
	},
	#[error("Shader linking failed:\n{log}")]
	Link {
		log: String,
	},
}

/// Reads a shader source file
///
/// A missing or unreadable file is logged and yields an empty source, which
/// then fails at link time since it has no entry point
pub fn load_shader_source(path: &Path) -> String {
	match read_to_string(path) {
		Ok(source) => {
			log::debug!("Loaded shader source {:?} ({} bytes)", path, source.len());
			source
		}
		Err(err) => {
			log::error!("Failed to open shader file: {}. Load aborting... ({err})", path.display());
			String::new()
		}
	}
}

/// Cuts a compiler or linker message to at most [INFO_LOG_CAPACITY] bytes
/// without splitting a UTF-8 character
pub fn truncate_info_log(mut log: String) -> String {
	if log.len() > INFO_LOG_CAPACITY {
		let mut end = INFO_LOG_CAPACITY;
		while !log.is_char_boundary(end) {
			end -= 1;
		}
		log.truncate(end);
	}
	log
}

/// Compiles WGSL `source` into a [ShaderModule]
///
/// Compilation errors are captured with a validation error scope instead of
/// reaching the device's uncaptured error handler
pub fn compile_shader(device: &Device, source: &str, stage: ShaderStage) -> Result<ShaderModule, ShaderError> {
	let label = format!("{stage} shader");
	device.push_error_scope(ErrorFilter::Validation);
	let module = device.create_shader_module(ShaderModuleDescriptor {
		label: Some(label.as_str()),
		source: ShaderSource::Wgsl(Cow::Borrowed(source)),
	});
	match pollster::block_on(device.pop_error_scope()) {
		None => Ok(module),
		Some(error) => Err(ShaderError::Compile {
			stage,
			log: truncate_info_log(error.to_string()),
		}),
	}
}

/// Fixed-function state the shaders are linked against
pub struct ProgramLayout<'a> {
	pub pipeline_layout: &'a PipelineLayout,
	pub vertex_buffers: &'a [VertexBufferLayout<'a>],
	pub target_format: TextureFormat,
}

/// Links a vertex and a fragment module into a [RenderPipeline]
///
/// The modules are consumed, they are not needed once the pipeline exists
pub fn link_program(
	device: &Device,
	vertex: ShaderModule,
	fragment: ShaderModule,
	layout: &ProgramLayout,
) -> Result<RenderPipeline, ShaderError> {
	device.push_error_scope(ErrorFilter::Validation);
	let pipeline = device.create_render_pipeline(&RenderPipelineDescriptor {
		label: Some("Shader program"),
		layout: Some(layout.pipeline_layout),
		vertex: VertexState {
			module: &vertex,
			entry_point: None,
			compilation_options: Default::default(),
			buffers: layout.vertex_buffers,
		},
		fragment: Some(FragmentState {
			module: &fragment,
			entry_point: None,
			compilation_options: Default::default(),
			targets: &[Some(ColorTargetState {
				format: layout.target_format,
				blend: None,
				write_mask: ColorWrites::ALL,
			})],
		}),
		primitive: PrimitiveState {
			topology: PrimitiveTopology::TriangleList,
			strip_index_format: None,
			front_face: FrontFace::Ccw,
			cull_mode: None,
			..Default::default()
		},
		depth_stencil: None,
		multisample: Default::default(),
		multiview: None,
		cache: None,
	});
	match pollster::block_on(device.pop_error_scope()) {
		None => Ok(pipeline),
		Some(error) => Err(ShaderError::Link {
			log: truncate_info_log(error.to_string()),
		}),
	}
}

/// A linked vertex + fragment shader pair
pub struct ShaderProgram {
	pipeline: RenderPipeline,
}

impl ShaderProgram {
	/// Loads, compiles and links the two shader files
	///
	/// Every failure is logged before it is returned
	pub fn from_files(
		device: &Device,
		vertex_path: &Path,
		fragment_path: &Path,
		layout: &ProgramLayout,
	) -> Result<Self, ShaderError> {
		let vertex_source = load_shader_source(vertex_path);
		let fragment_source = load_shader_source(fragment_path);

		let vertex = compile_shader(device, &vertex_source, ShaderStage::Vertex).inspect_err(log_shader_error);
		let fragment = compile_shader(device, &fragment_source, ShaderStage::Fragment).inspect_err(log_shader_error);

		let pipeline = link_program(device, vertex?, fragment?, layout).inspect_err(log_shader_error)?;
		log::info!("Shader program linked from {:?} and {:?}", vertex_path, fragment_path);
		Ok(Self { pipeline })
	}

	pub fn pipeline(&self) -> &RenderPipeline {
		&self.pipeline
	}
}

fn log_shader_error(error: &ShaderError) {
	log::error!("{error}");
}

#[cfg(test)]
mod shader_manager_tests {
	use super::*;

	#[test]
	fn missing_file_gives_empty_source() {
		let path = std::env::temp_dir().join("quad_2d_shader_that_does_not_exist.wgsl");
		assert_eq!(load_shader_source(&path), "");
	}

	#[test]
	fn existing_file_is_read_verbatim() {
		let path = std::env::temp_dir().join(format!("quad_2d_shader_{}.wgsl", std::process::id()));
		let source = "@fragment\nfn fs_main() -> @location(0) vec4<f32> {\n\treturn vec4<f32>(1.0);\n}\n";
		std::fs::write(&path, source).unwrap();

		assert_eq!(load_shader_source(&path), source);
		std::fs::remove_file(path).unwrap();
	}

	#[test]
	fn bundled_shaders_are_readable() {
		let render = crate::config::RenderConfig::default();
		assert!(load_shader_source(&render.vertex_shader_path()).contains("@vertex"));
		assert!(load_shader_source(&render.fragment_shader_path()).contains("@fragment"));
	}

	#[test]
	fn short_logs_are_untouched() {
		assert_eq!(truncate_info_log("error: expected ';'".to_string()), "error: expected ';'");
		let exact = "x".repeat(INFO_LOG_CAPACITY);
		assert_eq!(truncate_info_log(exact.clone()), exact);
	}

	#[test]
	fn long_logs_are_cut_to_capacity() {
		let log = "e".repeat(INFO_LOG_CAPACITY * 3);
		assert_eq!(truncate_info_log(log).len(), INFO_LOG_CAPACITY);
	}

	#[test]
	fn truncation_respects_char_boundaries() {
		// 'é' is two bytes, so byte 512 lands inside a character
		let log = format!("a{}", "é".repeat(INFO_LOG_CAPACITY));
		let truncated = truncate_info_log(log);
		assert_eq!(truncated.len(), INFO_LOG_CAPACITY - 1);
		assert!(truncated.ends_with('é'));
	}

	#[test]
	fn error_messages_name_the_stage() {
		let error = ShaderError::Compile { stage: ShaderStage::Fragment, log: "bad token".to_string() };
		assert_eq!(error.to_string(), "Shader compilation failed (fragment stage):\nbad token");

		let error = ShaderError::Link { log: "missing entry point".to_string() };
		assert_eq!(error.to_string(), "Shader linking failed:\nmissing entry point");
	}
}
