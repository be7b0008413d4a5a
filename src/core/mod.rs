pub mod error;
pub mod keys;

pub use error::{MapError, Result};
pub use keys::Keyed;
