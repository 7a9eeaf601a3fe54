pub mod fixtures;
pub mod mocks;
mod property_tests;

pub use fixtures::*;
pub use mocks::*;
