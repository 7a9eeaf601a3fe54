pub mod builder;
pub mod flatten;

pub use builder::*;
pub use flatten::*;
