use clap::Parser;
use flexloop::Args;
use flexloop_tui::config::ScreenMode;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

fn clear_env() {
    for name in ["FLEXLOOP_FPS", "FLEXLOOP_MODE", "FLEXLOOP_MOUSE", "FLEXLOOP_CONFIG"] {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_flags_win_over_env_and_file() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flexloop.config.toml");
    fs::write(&path, "fps = 24\n[terminal]\nmouse = true\n").unwrap();
    env::set_var("FLEXLOOP_FPS", "48");

    let args = Args::try_parse_from([
        "flexloop",
        "--config",
        path.to_str().unwrap(),
        "--fps",
        "12",
        "--no-mouse",
    ])
    .unwrap();
    let config = args.load_config().unwrap();

    assert_eq!(config.fps, 12);
    assert!(!config.terminal.mouse);
    clear_env();
}

#[test]
#[serial]
fn test_env_applies_without_flags() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flexloop.config.toml");
    fs::write(&path, "fps = 24\n").unwrap();
    env::set_var("FLEXLOOP_MODE", "inline");

    let args = Args::try_parse_from(["flexloop", "--config", path.to_str().unwrap()]).unwrap();
    let config = args.load_config().unwrap();

    assert_eq!(config.fps, 24);
    assert_eq!(config.terminal.mode, ScreenMode::Inline);
    clear_env();
}

#[test]
#[serial]
fn test_missing_config_is_created() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("flexloop.config.toml");

    let args = Args::try_parse_from(["flexloop", "--config", path.to_str().unwrap()]).unwrap();
    let config = args.load_config().unwrap();

    assert!(path.exists());
    assert_eq!(config.fps, 60);
}

#[test]
#[serial]
fn test_invalid_flag_value_fails_validation() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("flexloop.config.toml");
    fs::write(&path, "").unwrap();

    let args = Args::try_parse_from([
        "flexloop",
        "--config",
        path.to_str().unwrap(),
        "--fps",
        "0",
    ])
    .unwrap();
    let err = args.load_config().unwrap_err();
    assert!(err.to_string().contains("fps"));
}
