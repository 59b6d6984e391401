pub mod builder;
pub mod keymap;
pub mod navigator;
mod state;
mod types;
pub mod view;

pub use keymap::{map_key, Input};
pub use types::App;
