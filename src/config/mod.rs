//! Configuration resolution: built-in defaults, repository overrides, and secrets.

pub mod secrets;
pub mod settings;

pub use secrets::{INSTALL_ROOT_ENV, Secrets, install_root, secrets_file_path};
pub use settings::{CONFIG_FILE_NAME, Config, load_config, parse_config};
