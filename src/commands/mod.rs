pub mod estimate;

pub use estimate::*;
