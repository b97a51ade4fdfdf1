use std::sync::Arc;

use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use crate::config::AppConfig;
use crate::controller::{MoveInput, QuadController};
use crate::error::StartupError;
use crate::input::KeyMap;
use crate::rendering::{FrameStatus, QuadRenderer};
use crate::timer::Timer;
use crate::wgpu_context::WGPUContext;

pub struct App {
	config: AppConfig,
	inner: Option<AppInner>,
	startup_error: Option<StartupError>,
}

impl App {
	pub fn new(config: AppConfig) -> Self {
		Self {
			config,
			inner: None,
			startup_error: None,
		}
	}

	/// The error that stopped the event loop before the first frame, if any
	pub fn take_startup_error(&mut self) -> Option<StartupError> {
		self.startup_error.take()
	}
}

struct AppInner {
	window: Arc<Window>,
	render_context: WGPUContext,
	renderer: QuadRenderer,
	controller: QuadController,
	timer: Timer,
	key_map: KeyMap,
}

impl AppInner {
	pub fn init(window: Window, config: &AppConfig) -> Result<Self, StartupError> {
		let window = Arc::new(window);

		// Create WGPU context
		let size = window.inner_size();
		let render_context = WGPUContext::new(
			Arc::clone(&window),
			[size.width, size.height],
			config.window.vsync,
		)?;

		// Compile shaders and upload the quad
		let renderer = QuadRenderer::new(&render_context, &config.render);

		Ok(Self {
			window,
			render_context,
			renderer,
			controller: QuadController::new(config.controls.clone()),
			// Created last so the first frame's delta does not include startup
			timer: Timer::new(),
			key_map: KeyMap::new(),
		})
	}

	pub fn handle_key(&mut self, key: KeyCode, state: winit::event::ElementState, is_synthetic: bool) {
		if !self.key_map.handle_event(key, state, is_synthetic) {
			return;
		}
		match key {
			KeyCode::Escape => {self.controller.toggle_pause();}
			KeyCode::KeyS => {self.controller.toggle_scale();}
			_ => (),
		}
	}

	pub fn update_scene(&mut self) {
		let delta = self.timer.tick();
		self.controller.update(MoveInput::from_keys(&self.key_map), delta);

		// Rotation follows wall-clock time, also while paused
		let model = self.controller.model_matrix(self.timer.elapsed_start());
		self.renderer.set_model(model, &self.render_context);
	}
}

impl winit::application::ApplicationHandler for App {
	fn resumed(&mut self, event_loop: &ActiveEventLoop) {
		if self.inner.is_some() {
			return;
		}

		let attributes = Window::default_attributes()
			.with_title(self.config.window.title.clone())
			.with_inner_size(PhysicalSize::new(self.config.window.width, self.config.window.height));

		let inner = event_loop
			.create_window(attributes)
			.map_err(StartupError::from)
			.and_then(|window| AppInner::init(window, &self.config));

		match inner {
			Ok(inner) => {
				inner.window.request_redraw();
				self.inner = Some(inner);
			}
			Err(err) => {
				self.startup_error = Some(err);
				event_loop.exit();
			}
		}
	}

	fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
		let Some(inner) = self.inner.as_mut() else {
			return;
		};
		match event {
			WindowEvent::CloseRequested => {
				log::info!("The close button was pressed; stopping");
				event_loop.exit();
			},
			WindowEvent::KeyboardInput{event, is_synthetic, ..} => {
				if let PhysicalKey::Code(key) = event.physical_key {
					inner.handle_key(key, event.state, is_synthetic);
				}
			}
			WindowEvent::Focused(false) => {
				inner.key_map.clear();
			}
			WindowEvent::Resized(new_size) => {
				inner.render_context.resize([new_size.width, new_size.height]);
				inner.window.request_redraw();
			},
			WindowEvent::RedrawRequested => {
				inner.update_scene();
				match inner.renderer.render(&inner.render_context) {
					FrameStatus::Presented | FrameStatus::Skipped => inner.window.request_redraw(),
					FrameStatus::Fatal => event_loop.exit(),
				}
			}
			_ => (),
		}
	}
}
