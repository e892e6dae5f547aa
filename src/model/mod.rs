//! Portfolio data as served by the backend, plus the transforms the home page
//! applies to the raw payloads.

pub mod account;
pub mod contact;
pub mod content;
pub mod skill;

pub use account::*;
pub use contact::*;
pub use content::*;
pub use skill::*;
