//! Wiring: the page that owns the resource actors, the keep-alive task and
//! the global subscriber.

pub mod home_page;
pub mod keep_alive;
pub mod tracing;

pub use home_page::*;
pub use keep_alive::*;
