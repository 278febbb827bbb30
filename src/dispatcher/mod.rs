// Event dispatcher: announces before/after notifications around ORM operations

pub mod types;
pub mod traits;
pub mod error;
pub mod dispatcher;

// Re-export core types
pub use types::*;
pub use traits::*;
pub use error::*;
pub use dispatcher::*;
