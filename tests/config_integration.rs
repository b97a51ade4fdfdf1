//! Configuration loading from the bundled config directory and the environment

use quad_2d::config::{AppConfig, CONFIG_DIRECTORY};
use serial_test::serial;

#[test]
#[serial]
fn bundled_default_config_loads() {
    let config = AppConfig::load().unwrap();
    assert_eq!(config.window.title, "GL Triangle Window");
    assert_eq!(config.render.vertex_shader, "vertex.wgsl");
    assert!(config.render.vertex_shader_path().exists());
    assert!(config.render.fragment_shader_path().exists());
}

#[test]
#[serial]
fn env_overrides_files() {
    std::env::set_var("QUAD_WINDOW__TITLE", "Title From Env");
    std::env::set_var("QUAD_CONTROLS__SPEED", "0.5");
    let config = AppConfig::load_from(CONFIG_DIRECTORY);
    std::env::remove_var("QUAD_WINDOW__TITLE");
    std::env::remove_var("QUAD_CONTROLS__SPEED");

    let config = config.unwrap();
    assert_eq!(config.window.title, "Title From Env");
    assert_eq!(config.controls.speed, 0.5);
    // untouched values still come from the file
    assert_eq!(config.controls.boost_speed, 2.0);
}

#[test]
#[serial]
fn missing_directory_gives_defaults() {
    let dir = std::env::temp_dir().join("quad_2d_no_such_config_dir");
    let config = AppConfig::load_from(dir).unwrap();
    assert_eq!(config, AppConfig::default());
}
