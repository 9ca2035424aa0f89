//! Infrastructure implementations for Reflecto.
//!
//! Concrete implementations of the ports defined in `reflecto-core`, plus
//! configuration loading and the durable session blob store. This is the
//! only crate that talks to the network or the filesystem.

pub mod config;
pub mod llm;
pub mod storage;
