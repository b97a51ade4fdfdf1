pub use winit;

pub mod application;
pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod math;
pub mod rendering;
pub mod shader_manager;
pub mod timer;
pub mod wgpu_context;
