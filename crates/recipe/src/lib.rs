pub mod item;
mod media;
pub mod repository;
mod root;
mod types;

pub use media::{MediaStore, RECIPE_UPLOAD_DIR};
pub use root::*;
pub use types::*;
