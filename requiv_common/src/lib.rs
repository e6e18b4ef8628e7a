pub mod config;
pub mod error;
#[cfg(feature = "json")]
pub mod json;
pub mod types;
pub mod value;

pub use config::*;
pub use error::*;
pub use types::*;
pub use value::*;
