pub mod cache;
pub mod id;
pub mod transform;

pub use cache::*;
pub use id::*;
pub use transform::*;
