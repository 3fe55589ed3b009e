pub mod host;
pub mod path;
pub mod text_input;

pub use host::disable_system_screensaver;
pub use path::{
    expand_path, format_path_for_display, get_config_dir, get_config_path, get_home_dir,
    get_log_dir,
};
pub use text_input::TextInput;
