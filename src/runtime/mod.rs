//! A live-runtime reflection view of types and members.
//!
//! Loaded code is described by reflection differently than by metadata: generic
//! arguments of instantiated types are already substituted into member signatures,
//! custom modifiers are reported as separate lists, function pointers surface as
//! `System.IntPtr` and names may carry escape characters. This module models that
//! view so the [`crate::comparer`] engine can compare metadata entities against it
//! and produce matching hash codes.
//!
//! How a reflection bridge populates these structures is up to the caller.
//!
//! # Key Types
//!
//! - [`RuntimeType`] - types, including constructed and generic parameter types
//! - [`RuntimeMethod`] - methods and constructors, with their token-resolved definitions
//! - [`RuntimeField`], [`RuntimeProperty`], [`RuntimeEvent`] - the remaining member kinds
//! - [`RuntimeModule`], [`RuntimeAssembly`] - ownership of runtime types
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use cilcompare::metadata::tables::AssemblyVersion;
//! use cilcompare::runtime::{RuntimeAssembly, RuntimeModule, RuntimeType};
//!
//! let corlib = Arc::new(RuntimeAssembly::new("mscorlib", AssemblyVersion::new(4, 0, 0, 0)));
//! let module = Arc::new(RuntimeModule::new("mscorlib.dll", corlib));
//! let list = Arc::new(RuntimeType::generic_definition(
//!     "System.Collections.Generic", "List`1", module.clone(), 1));
//! let int = Arc::new(RuntimeType::definition("System", "Int32", module));
//!
//! let closed = RuntimeType::instantiate(&list, vec![int]);
//! assert!(closed.is_generic_instance());
//! ```

mod members;
mod types;

pub use members::*;
pub use types::*;
