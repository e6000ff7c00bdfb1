pub mod artifact;
pub mod deployment;
pub mod future;
pub mod module;
pub mod value;
pub mod walk;

pub use artifact::*;
pub use deployment::*;
pub use future::*;
pub use module::*;
pub use value::*;
pub use walk::{collect_futures, fold_argument, fold_arguments, ArgumentFold, Literal, ReferenceCollector};
