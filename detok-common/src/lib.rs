//! An internal crate containing the entropy coding primitives reused across
//! the different crates in the detok project.
//!
//! This crate is not meant for external consumption.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod ans;
