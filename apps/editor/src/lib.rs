//! Client-side editing core for resumes: an optimistic document store with
//! coalesced saves and a cancellable auto-save, plus the HTTP adapter that
//! talks to the resume API.

pub mod config;
pub mod http;
pub mod persistence;
pub mod state;
pub mod store;

#[cfg(test)]
mod testing;

pub use config::StoreConfig;
pub use http::HttpPersistence;
pub use persistence::{PersistenceApi, PersistenceError};
pub use state::{SaveStatus, StoreError, StoreSnapshot};
pub use store::DocumentStore;
