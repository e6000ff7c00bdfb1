pub mod constructor;
pub mod error;
pub mod module_builder;
pub mod options;

pub use constructor::*;
pub use error::*;
pub use module_builder::*;
pub use options::*;
