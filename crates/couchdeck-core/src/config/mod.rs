mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{Config, KeybindingConfig, LayoutConfig, NavigationConfig, OverlayConfig};
pub use validation::warn_unknown_fields;
