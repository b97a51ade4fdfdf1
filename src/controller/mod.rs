use winit::keyboard::KeyCode;

use crate::config::ControlsConfig;
use crate::input::KeyMap;
use crate::math::Matrix4;

/// Movement keys held during a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveInput {
	pub left: bool,
	pub right: bool,
	pub up: bool,
	pub down: bool,
	pub boost: bool,
}

impl MoveInput {
	/// Arrow keys move, Left Shift boosts
	pub fn from_keys(key_map: &KeyMap) -> Self {
		Self {
			left: key_map.is_pressed(KeyCode::ArrowLeft),
			right: key_map.is_pressed(KeyCode::ArrowRight),
			up: key_map.is_pressed(KeyCode::ArrowUp),
			down: key_map.is_pressed(KeyCode::ArrowDown),
			boost: key_map.is_pressed(KeyCode::ShiftLeft),
		}
	}
}

/// Position and toggles of the on-screen quad
pub struct QuadController {
	controls: ControlsConfig,
	offset: [f32;2],
	paused: bool,
	scaled: bool,
}

impl QuadController {
	pub fn new(controls: ControlsConfig) -> Self {
		Self {
			controls,
			offset: [0., 0.],
			paused: false,
			scaled: false,
		}
	}

	pub fn offset(&self) -> [f32;2] {
		self.offset
	}

	pub fn toggle_pause(&mut self) -> bool {
		self.paused = !self.paused;
		if self.paused {
			log::info!("Game Paused");
		} else {
			log::info!("Game Unpaused");
		}
		self.paused
	}

	pub fn toggle_scale(&mut self) -> bool {
		self.scaled = !self.scaled;
		log::debug!("Scale {}", if self.scaled { "enabled" } else { "disabled" });
		self.scaled
	}

	/// Moves the quad by `delta` seconds worth of input. Does nothing while paused
	pub fn update(&mut self, input: MoveInput, delta: f32) {
		if self.paused {
			return;
		}
		let speed = if input.boost { self.controls.boost_speed } else { self.controls.speed };
		let step = speed * delta;

		if input.left  {self.offset[0] -= step;}
		if input.right {self.offset[0] += step;}
		if input.up    {self.offset[1] += step;}
		if input.down  {self.offset[1] -= step;}
	}

	/// Model matrix for the current state, rotated by `angle` radians around z
	pub fn model_matrix(&self, angle: f32) -> Matrix4 {
		let model = Matrix4::identity()
			.translate([self.offset[0], self.offset[1], 0.])
			.rotate(angle, [0., 0., 1.]);
		if self.scaled {
			model.scale([self.controls.scale, self.controls.scale, 1.])
		} else {
			model
		}
	}
}

#[cfg(test)]
mod controller_tests {
	use super::*;
	use winit::event::ElementState;

	const EPSILON: f32 = 1e-5;

	fn assert_close(a: [f32;2], b: [f32;2]) {
		assert!((a[0] - b[0]).abs() < EPSILON && (a[1] - b[1]).abs() < EPSILON, "{a:?} != {b:?}");
	}

	fn controller() -> QuadController {
		QuadController::new(ControlsConfig::default())
	}

	#[test]
	fn arrows_move_at_base_speed() {
		let mut quad = controller();
		quad.update(MoveInput { right: true, ..Default::default() }, 0.5);
		assert_close(quad.offset(), [0.5, 0.]);

		quad.update(MoveInput { up: true, ..Default::default() }, 0.25);
		assert_close(quad.offset(), [0.5, 0.25]);

		quad.update(MoveInput { left: true, down: true, ..Default::default() }, 0.5);
		assert_close(quad.offset(), [0., -0.25]);
	}

	#[test]
	fn shift_doubles_speed() {
		let mut quad = controller();
		quad.update(MoveInput { left: true, boost: true, ..Default::default() }, 0.5);
		assert_close(quad.offset(), [-1., 0.]);
	}

	#[test]
	fn opposite_keys_cancel() {
		let mut quad = controller();
		quad.update(MoveInput { left: true, right: true, up: true, down: true, boost: false }, 1.);
		assert_close(quad.offset(), [0., 0.]);
	}

	#[test]
	fn paused_quad_does_not_move() {
		let mut quad = controller();
		assert!(quad.toggle_pause());
		quad.update(MoveInput { right: true, ..Default::default() }, 1.);
		assert_close(quad.offset(), [0., 0.]);

		assert!(!quad.toggle_pause());
		quad.update(MoveInput { right: true, ..Default::default() }, 1.);
		assert_close(quad.offset(), [1., 0.]);
	}

	#[test]
	fn movement_uses_configured_speeds() {
		let mut quad = QuadController::new(ControlsConfig { speed: 0.1, boost_speed: 4., scale: 1.5 });
		quad.update(MoveInput { up: true, ..Default::default() }, 1.);
		quad.update(MoveInput { up: true, boost: true, ..Default::default() }, 0.5);
		assert_close(quad.offset(), [0., 2.1]);
	}

	#[test]
	fn model_matrix_translates_and_rotates() {
		let mut quad = controller();
		quad.update(MoveInput { right: true, ..Default::default() }, 0.5);

		let corner = quad.model_matrix(0.).transform_point([0.25, 0.25, 0.]);
		assert_close([corner[0], corner[1]], [0.75, 0.25]);

		let corner = quad.model_matrix(std::f32::consts::PI).transform_point([0.25, 0.25, 0.]);
		assert_close([corner[0], corner[1]], [0.25, -0.25]);
	}

	#[test]
	fn scale_toggle_enlarges_quad() {
		let mut quad = controller();
		assert!(quad.toggle_scale());
		let corner = quad.model_matrix(0.).transform_point([0.25, -0.25, 0.]);
		assert_close([corner[0], corner[1]], [0.375, -0.375]);

		assert!(!quad.toggle_scale());
		let corner = quad.model_matrix(0.).transform_point([0.25, -0.25, 0.]);
		assert_close([corner[0], corner[1]], [0.25, -0.25]);
	}

	#[test]
	fn move_input_reads_key_map() {
		let mut key_map = KeyMap::new();
		key_map.handle_key(KeyCode::ArrowDown, ElementState::Pressed);
		key_map.handle_key(KeyCode::ShiftLeft, ElementState::Pressed);
		key_map.handle_key(KeyCode::KeyS, ElementState::Pressed);

		assert_eq!(MoveInput::from_keys(&key_map), MoveInput { down: true, boost: true, ..Default::default() });

		// Only the left shift key boosts
		key_map.handle_key(KeyCode::ShiftLeft, ElementState::Released);
		key_map.handle_key(KeyCode::ShiftRight, ElementState::Pressed);
		assert!(!MoveInput::from_keys(&key_map).boost);
	}
}
