//! # cilcompare Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the cilcompare library. Import this module to get quick access to the comparer,
//! its options and the entity types needed to build inputs for it.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cilcompare operations
pub use crate::Error;

/// The result type used throughout cilcompare
pub use crate::Result;

// ================================================================================================
// Comparer
// ================================================================================================

/// The comparison engine, its options and collaborators
pub use crate::comparer::{
    Comparable, ForeignProjector, Resolver, RuntimeComparable, RuntimeHashable, SigComparer,
    SigComparerOptions, TypeEquivalence, TypeLike, MAX_RECURSION_DEPTH,
};

/// Preconfigured comparers
pub use crate::comparer::facades::{
    EventEqualityComparer, FieldEqualityComparer, Keyed, MethodEqualityComparer,
    PropertyEqualityComparer, SignatureEqualityComparer, TypeEqualityComparer,
};

// ================================================================================================
// Metadata
// ================================================================================================

/// Metadata token type for referencing table entries
pub use crate::metadata::token::Token;

/// Table rows
pub use crate::metadata::tables::{
    Assembly, AssemblyRef, AssemblyVersion, Event, ExportedType, Field, MemberRef, Method,
    MethodSpec, Module, ModuleRef, Property, TypeDef, TypeRef, TypeSpec,
};

/// Type system unions
pub use crate::metadata::typesystem::{
    Implementation, MemberRefParent, ResolutionScope, TypeDefOrRef, TypeEntity,
};

/// Member unions
pub use crate::metadata::members::{FieldEntity, MemberEntity, MethodDefOrRef, MethodEntity};

/// Signatures
pub use crate::metadata::signatures::{
    CallingConventionSignature, SignatureField, SignatureLocalVariables, SignatureMethod,
    SignatureMethodSpec, TypeSignature,
};

/// Short name of [`TypeSignature`]
pub use crate::metadata::signatures::TypeSignature as TypeSig;

// ================================================================================================
// Runtime view
// ================================================================================================

/// Live-runtime reflection view
pub use crate::runtime::{
    RuntimeAssembly, RuntimeEvent, RuntimeField, RuntimeMethod, RuntimeModule, RuntimeParameter,
    RuntimeProperty, RuntimeType,
};
