/// Name of the environment variable containing the path to the configuration file.
/// If not set, defaults to
///  (1) on Linux and macOS: `$XDG_CONFIG_HOME/hydelegate/config.toml` or `$HOME/.config/hydelegate/config.toml`
///  (2) on Windows: `%APPDATA%\hydelegate\config.toml`
pub const ENV_CONFIG_PATH: &str = "HYDELEGATE_CONFIG_PATH";

/// Directory name used under the platform configuration directory.
pub const CONFIG_DIR_NAME: &str = "hydelegate";

/// File name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";
