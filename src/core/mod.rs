pub mod config;
pub mod estimator;
pub mod openai;
pub mod prompts;
pub mod schema;
pub mod text;
pub mod validator;

pub use config::*;
pub use estimator::*;
pub use openai::*;
pub use prompts::*;
pub use schema::*;
pub use validator::*;
