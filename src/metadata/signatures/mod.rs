//! Signatures of .NET metadata in their decoded, tree shaped form.
//!
//! Signatures encode type information, method parameters, generic instantiations and
//! calling conventions. Decoding from blob bytes happens before entities reach this crate;
//! the types here are the structures the comparer walks.
//!
//! # Signature Types
//!
//! - [`TypeSignature`] - a recursive type tree (primitives, arrays, pointers, generics, modifiers)
//! - [`SignatureMethod`] - method and property signatures
//! - [`SignatureField`] - field signatures
//! - [`SignatureLocalVariables`] - local variable signatures
//! - [`SignatureMethodSpec`] - generic method instantiations
//! - [`CallingConventionSignature`] - any of the above, tagged by calling convention
//!
//! # Examples
//!
//! ```rust
//! use cilcompare::metadata::signatures::{SignatureMethod, TypeSignature};
//!
//! // static int32 Foo(string[], uint8*)
//! let sig = SignatureMethod::new_static(
//!     TypeSignature::I4,
//!     vec![
//!         TypeSignature::sz_array(TypeSignature::String),
//!         TypeSignature::ptr(TypeSignature::U1),
//!     ],
//! );
//! assert_eq!(sig.params.len(), 2);
//! ```
//!
//! # References
//!
//! - ECMA-335 6th Edition, Partition II, Section 23.2 - Blobs and Signatures

mod types;

pub use types::*;
