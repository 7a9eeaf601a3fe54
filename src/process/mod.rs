pub mod info;
pub mod monitor;
pub mod poller;

pub use info::*;
pub use monitor::*;
pub use poller::*;
