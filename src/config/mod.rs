//! Configuration: TOML file, environment and CLI precedence, key bindings.

pub mod keybindings;
pub mod loader;

pub use keybindings::{KeyBindingError, KeyBindings, key_label};
pub use loader::{ConfigError, ConfigFile, ResolvedConfig, resolve};
