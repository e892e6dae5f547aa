//! Generic fetch-resource framework.
//!
//! This module provides the pieces every page needs to load remote data: one
//! actor per resource, a client to drive it, and an aggregator to fold many
//! resources into one loading/error signal.
//!
//! # Main Components
//!
//! - [`FetchActor`] - Owns one resource's state and its in-flight request
//! - [`ResourceClient`] - Renders, reads and tears down a resource
//! - [`Aggregator`] - Folds several resources into one [`AggregateState`]
//! - [`FetchError`] / [`FrameworkError`] - Request failures and channel failures
//!
//! # Testing
//!
//! See [`mock`] for a scripted in-memory network.

pub mod aggregate;
pub mod client;
pub mod core;
pub mod error;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use aggregate::{
    AggregateState, AggregateStatus, Aggregator, AllOrFirstError, AsyncResource, FoldStrategy,
};
pub use client::{ResourceClient, ResourceWatch};
pub use self::core::*;
pub use error::{FetchError, FrameworkError};
pub use message::ResourceCommand;
