//! Asset loading
//!
//! Geometry is read from disk on every scene build; there is no cache.

mod obj_loader;

pub use obj_loader::{ObjError, ObjLoader};
