//! Contact management over a relational database.
//!
//! [`db::ContactStore`] borrows a connection opened by the caller and exposes
//! create, read, update and delete operations over clients and their phones.

pub mod config;
pub mod db;
pub mod error;
pub mod models;

pub use db::ContactStore;
pub use error::StoreError;
