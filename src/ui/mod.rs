pub mod menu;
pub mod progress;
pub mod prompt;
