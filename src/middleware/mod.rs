pub mod error;
pub mod pipeline;

pub use error::*;
pub use pipeline::*;
