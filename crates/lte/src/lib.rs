// lte library exports

pub mod app;
pub mod config;
pub mod file_manager;
pub mod logging;
pub mod status_manager;
pub mod terminal;
pub mod text_width;
pub mod ui;

pub use app::{App, Mode, Prompt, PromptKind, Viewport};
pub use config::Config;
pub use file_manager::FileManager;
pub use status_manager::{MessageType, StatusManager};
