//! Domain data types for the scout library.

pub mod catalog;
pub mod config;
pub mod email;
pub mod event;
pub mod region;
