//#![windows_subsystem = "windows"]
use quad_2d::application::App;
use quad_2d::config::AppConfig;
use quad_2d::error::{StartupError, STARTUP_FAILURE_EXIT_CODE};

fn main() {
	let (config, config_error) = match AppConfig::load() {
		Ok(config) => (config, None),
		Err(err) => (AppConfig::default(), Some(err)),
	};

	init_logger(config.logging.level_filter());
	if let Some(err) = config_error {
		log::warn!("{err}. Using defaults.");
	}

	let event_loop = match winit::event_loop::EventLoop::new() {
		Ok(event_loop) => event_loop,
		Err(err) => exit_with(StartupError::from(err)),
	};

	let mut app = App::new(config);
	if let Err(err) = event_loop.run_app(&mut app) {
		exit_with(StartupError::from(err));
	}
	if let Some(err) = app.take_startup_error() {
		exit_with(err);
	}
}

fn init_logger(level: log::LevelFilter) {
	let result = simple_logger::SimpleLogger::new()
		.with_level(log::LevelFilter::Warn)
		.with_module_level("quad_2d", level)
		.init();
	if let Err(err) = result {
		eprintln!("Could not initialize logger: {err}");
	}
}

fn exit_with(err: StartupError) -> ! {
	log::error!("{err}");
	std::process::exit(STARTUP_FAILURE_EXIT_CODE);
}
