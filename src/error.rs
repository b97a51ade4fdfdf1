use thiserror::Error;

/// Exit code reported when startup fails
pub const STARTUP_FAILURE_EXIT_CODE: i32 = -1;

/// Failures that stop the application before the first frame
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Failed to initialize the windowing system: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("No graphics adapter is compatible with the window surface")]
    NoAdapter,
    #[error("Failed to create graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("Surface does not support any texture format on this adapter")]
    NoSurfaceFormat,
}
