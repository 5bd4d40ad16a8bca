mod email;
pub mod password;
pub(crate) mod repository;
mod root;

pub use email::normalize_email;
pub use root::*;
