pub mod audio;
pub mod config;
pub mod inference;
pub mod prompt;
pub mod synthesis;
pub mod voice;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
