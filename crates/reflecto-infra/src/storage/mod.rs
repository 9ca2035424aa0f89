//! Durable session storage.

pub mod blob;

pub use blob::SessionBlobStore;
