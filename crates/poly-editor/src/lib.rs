pub mod config;
pub mod controller;
pub mod input;
pub mod mode;
pub mod script;
pub mod shortcuts;

pub use config::EditorConfig;
pub use controller::Editor;
pub use input::InputEvent;
pub use mode::Mode;
pub use script::parse_script;
pub use shortcuts::{ShortcutAction, ShortcutMap};
