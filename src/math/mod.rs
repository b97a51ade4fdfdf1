mod matrix {
	use bytemuck::{Pod, Zeroable};
	use std::ops::Mul;

	/// 4x4 column-major matrix
	///
	/// Layout matches a WGSL `mat4x4<f32>` so it can be uploaded as is.
	/// Builder methods post-multiply: `m.translate(v)` is `m * T(v)`, so
	/// the transform added last is the first one applied to a vertex
	#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
	#[repr(C)]
	pub struct Matrix4 {
		columns: [[f32;4];4],
	}

	impl Matrix4 {
		pub const IDENTITY: Self = Self {
			columns: [
				[1., 0., 0., 0.],
				[0., 1., 0., 0.],
				[0., 0., 1., 0.],
				[0., 0., 0., 1.],
			]
		};

		pub fn identity() -> Self {
			Self::IDENTITY
		}

		pub fn from_columns(columns: [[f32;4];4]) -> Self {
			Self { columns }
		}

		pub fn columns(&self) -> &[[f32;4];4] {
			&self.columns
		}

		pub fn translation(offset: [f32;3]) -> Self {
			let mut output = Self::IDENTITY;
			output.columns[3] = [offset[0], offset[1], offset[2], 1.];
			output
		}

		/// Rotation of `angle` radians counter-clockwise around `axis`
		///
		/// `axis` does not need to be normalized. A zero length axis gives the identity
		pub fn rotation(angle: f32, axis: [f32;3]) -> Self {
			let length = (axis[0] * axis[0] + axis[1] * axis[1] + axis[2] * axis[2]).sqrt();
			if length == 0. {
				return Self::IDENTITY;
			}
			let a = [axis[0] / length, axis[1] / length, axis[2] / length];
			let (s, c) = angle.sin_cos();
			let t = [(1. - c) * a[0], (1. - c) * a[1], (1. - c) * a[2]];

			Self {
				columns: [
					[c + t[0] * a[0],        t[0] * a[1] + s * a[2], t[0] * a[2] - s * a[1], 0.],
					[t[1] * a[0] - s * a[2], c + t[1] * a[1],        t[1] * a[2] + s * a[0], 0.],
					[t[2] * a[0] + s * a[1], t[2] * a[1] - s * a[0], c + t[2] * a[2],        0.],
					[0., 0., 0., 1.],
				]
			}
		}

		pub fn scaling(factors: [f32;3]) -> Self {
			let mut output = Self::IDENTITY;
			output.columns[0][0] = factors[0];
			output.columns[1][1] = factors[1];
			output.columns[2][2] = factors[2];
			output
		}

		pub fn translate(self, offset: [f32;3]) -> Self {
			self * Self::translation(offset)
		}

		pub fn rotate(self, angle: f32, axis: [f32;3]) -> Self {
			self * Self::rotation(angle, axis)
		}

		pub fn scale(self, factors: [f32;3]) -> Self {
			self * Self::scaling(factors)
		}

		/// Applies the matrix to a point with `w = 1` and drops `w`
		pub fn transform_point(&self, point: [f32;3]) -> [f32;3] {
			let [x, y, z, _] = *self * [point[0], point[1], point[2], 1.];
			[x, y, z]
		}
	}

	impl Default for Matrix4 {
		fn default() -> Self {
			Self::IDENTITY
		}
	}

	impl Mul<Matrix4> for Matrix4 {
		type Output = Self;
		fn mul(self, other: Self) -> Self {
			let mut columns = [[0.;4];4];
			for (col, output) in columns.iter_mut().enumerate() {
				for (row, value) in output.iter_mut().enumerate() {
					*value = (0..4).map(|k| self.columns[k][row] * other.columns[col][k]).sum();
				}
			}
			Self { columns }
		}
	}

	impl Mul<[f32;4]> for Matrix4 {
		type Output = [f32;4];
		fn mul(self, vector: [f32;4]) -> [f32;4] {
			let mut output = [0.;4];
			for (row, value) in output.iter_mut().enumerate() {
				*value = (0..4).map(|k| self.columns[k][row] * vector[k]).sum();
			}
			output
		}
	}

}

pub use matrix::*;
