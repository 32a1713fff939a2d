pub mod config;
pub mod error_kind;
pub mod estimate;

pub use config::*;
pub use error_kind::*;
pub use estimate::*;
