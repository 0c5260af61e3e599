//! The ECMA-335 entity model.
//!
//! Entities are read-only views produced by a metadata reader; the comparer never
//! mutates them. Rows reference each other through `Arc`s, so entities of one module
//! stay alive as long as anything compares against them.

pub mod identity;
pub mod members;
pub mod signatures;
pub mod tables;
pub mod token;
pub mod typesystem;
