pub mod scope;
pub mod types;

pub use scope::*;
