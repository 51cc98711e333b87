//! Core trait abstractions for the scout library.
//!
//! These traits define the interfaces that applications implement
//! to provide search and storage capabilities.

pub mod backend;
pub mod store;
