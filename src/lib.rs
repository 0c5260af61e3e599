// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(clippy::too_many_arguments)]

//! # cilcompare
//!
//! Structural identity for .NET (ECMA-335) metadata. `cilcompare` decides whether two
//! references to "a type" or "a member" denote the same logical entity, and produces a
//! hash code consistent with that decision, so entities coming from different modules
//! and different physical representations can be used interchangeably as map keys.
//!
//! A type may appear as a definition (`TypeDef`), a reference (`TypeRef`), an instantiated
//! specification (`TypeSpec`), an encoded signature tree (`TypeSig`) or a cross-module
//! export forward (`ExportedType`). Methods come as definitions, member references and
//! method specifications; fields as definitions and member references. All of them can
//! additionally be compared against a live-runtime reflection view (see [`runtime`]).
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use cilcompare::prelude::*;
//!
//! let corlib = Arc::new(AssemblyRef::new(1, "mscorlib"));
//! let list_a = Arc::new(TypeRef::new(1, "System.Collections.Generic", "List`1",
//!     ResolutionScope::AssemblyRef(corlib.clone())));
//! let list_b = Arc::new(TypeRef::new(7, "System.Collections.Generic", "List`1",
//!     ResolutionScope::AssemblyRef(corlib)));
//!
//! let a = TypeSig::generic_inst(TypeSig::class(list_a.into()), vec![TypeSig::I4]);
//! let b = TypeSig::generic_inst(TypeSig::class(list_b.into()), vec![TypeSig::I4]);
//!
//! let comparer = SigComparer::new(SigComparerOptions::empty());
//! assert!(comparer.equals(&a, &b));
//! assert_eq!(comparer.hash(&a), comparer.hash(&b));
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - the read-only entity model the engine consumes (tables, signatures, type system)
//! - [`runtime`] - the live-runtime reflection view of the same concepts
//! - [`comparer`] - the comparison engine, its options, collaborators and facades
//! - [`Error`] and [`Result`] - error handling for entity construction and checked comparisons
//!
//! ## Configuration
//!
//! All behavior is configured through [`comparer::SigComparerOptions`] and the builder
//! methods of [`comparer::SigComparer`]. A comparer is an immutable `Copy` value; each call
//! to `equals` or `hash` creates its own recursion guard and generic substitution context,
//! so one comparer can be shared across threads.
//!
//! ## Logging
//!
//! The crate logs through the [`log`](https://docs.rs/log) facade and never installs a
//! logger. Recursion-limit aborts are reported at `debug` level, resolver and
//! type-equivalence fallbacks at `trace` level.
//!
//! ## Standards Compliance
//!
//! Element type tags, calling convention bytes and token layouts follow the
//! **ECMA-335 specification** (6th edition).
//!
//! - [ECMA-335 Standard](https://ecma-international.org/wp-content/uploads/ECMA-335_6th_edition_june_2012.pdf)
#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use cilcompare::prelude::*;
///
/// let comparer = SigComparer::new(SigComparerOptions::CASE_INSENSITIVE_ALL);
/// assert!(comparer.equals(&TypeSig::I4, &TypeSig::I4));
/// ```
pub mod prelude;

/// The entity model of ECMA-335 metadata consumed by the comparison engine.
///
/// # Key Components
///
/// - [`metadata::tables`] - assemblies, modules, files, type rows and member rows
/// - [`metadata::signatures`] - type signature trees and calling-convention signatures
/// - [`metadata::typesystem`] - element type tags and the coded-index unions linking rows
/// - [`metadata::members`] - tagged unions over the method and field representations
/// - [`metadata::token`] - metadata tokens
/// - [`metadata::identity`] - strong-name identities and public key tokens
pub mod metadata;

/// The live-runtime reflection view.
///
/// Models what a reflection bridge reports about types and members that are already
/// loaded by an execution engine: names, declaring types, modules, assemblies, generic
/// arguments and parameter lists, with generic parameters already substituted.
pub mod runtime;

/// The structural identity engine.
///
/// [`comparer::SigComparer`] is the entry point; [`comparer::SigComparerOptions`]
/// configures it; [`comparer::Resolver`], [`comparer::TypeEquivalence`] and
/// [`comparer::ForeignProjector`] are the optional collaborators; the facades in
/// [`comparer::facades`] bind fixed option sets for use as map key comparers.
pub mod comparer;

/// `cilcompare` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cilcompare` Error type
///
/// Returned by entity construction helpers that validate their input and by the checked
/// comparer entry points ([`comparer::SigComparer::try_equals`], [`comparer::SigComparer::try_hash`]).
///
/// # Examples
///
/// ```rust
/// use cilcompare::{Error, metadata::tables::AssemblyVersion};
///
/// match "1.2.x".parse::<AssemblyVersion>() {
///     Ok(version) => println!("Parsed {}", version),
///     Err(Error::Malformed { message, .. }) => println!("Malformed: {}", message),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;
