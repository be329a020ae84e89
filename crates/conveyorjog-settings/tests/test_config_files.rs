use conveyorjog_core::{Axis, Direction};
use conveyorjog_settings::Config;
use std::io::Write;

fn write_config(suffix: &str, content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_toml_with_partial_sections() {
    let file = write_config(
        ".toml",
        r#"
[connection]
port = "COM7"
usb_only = true

[keys]
x_negative = "a"
x_positive = "d"
"#,
    );

    let config = Config::load_from_file(file.path()).unwrap();
    assert_eq!(config.connection.preferred_port(), Some("COM7"));
    assert!(config.connection.usb_only);
    assert_eq!(config.connection.write_timeout_ms, 20);
    assert_eq!(config.keys.resolve("D"), Some((Axis::X, Direction::Positive)));
    assert_eq!(config.keys.resolve("Up"), Some((Axis::Y, Direction::Positive)));
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_load_json() {
    let file = write_config(
        ".json",
        r#"{ "connection": { "write_timeout_ms": 50 }, "logging": { "level": "debug" } }"#,
    );

    let config = Config::load_from_file(file.path()).unwrap();
    assert_eq!(config.connection.write_timeout_ms, 50);
    assert_eq!(config.logging.level, "debug");
}

#[test]
fn test_invalid_files_are_rejected() {
    let file = write_config(".toml", "[connection]\nwrite_timeout_ms = 0\n");
    assert!(Config::load_from_file(file.path()).is_err());

    let file = write_config(".toml", "this is not toml = = =");
    let err = Config::load_from_file(file.path()).unwrap_err();
    assert!(err.to_string().starts_with("Config error: Invalid TOML config"));

    let file = write_config(".yaml", "connection: {}");
    assert!(Config::load_from_file(file.path()).is_err());

    let missing = std::path::Path::new("/nonexistent/conveyorjog.toml");
    assert!(Config::load_from_file(missing).is_err());
}
