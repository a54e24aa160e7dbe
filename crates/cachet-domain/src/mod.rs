//! # Domain Layer
//!
//! Core types and contracts for cachet. This crate has no knowledge of any
//! concrete backend; it defines what a store is, what it holds, and how it
//! fails.
//!
//! ## Module Categories
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`error`] | Error taxonomy shared by every layer |
//! | [`value_objects`] | `Value`, `Item`, `Entry`, `Ttl` |
//! | [`ports`] | `Store`, `LockPrimitive`, `ListStore`, `Encoder` |
//! | [`constants`] | Persisted key layouts |

pub mod constants;
pub mod error;
pub mod ports;
pub mod value_objects;

pub use error::{Error, Result};
pub use ports::{Encoder, ListStore, LockPrimitive, Store};
pub use value_objects::{Entry, Item, Ttl, Value};
