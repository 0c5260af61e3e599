//! The collaborators a comparer may consult.
//!
//! None of them is required. A comparer without a [`Resolver`] treats every reference
//! as unresolvable, one without a [`TypeEquivalence`] never considers distinct
//! definitions equivalent, and one without a [`ForeignProjector`] compares foreign-ABI
//! references as they are.

use crate::metadata::tables::{
    ExportedType, ExportedTypeRc, MemberRef, MemberRefRc, Method, ModuleRc, TypeDef, TypeDefRc,
    TypeRef, TypeRefRc,
};

/// Resolves references to the definitions they denote.
///
/// `context` is the module the reference is looked up from: the module owning the
/// reference, or the comparer's home module if the reference has none.
pub trait Resolver: Send + Sync {
    /// Resolves a type reference, `None` if the definition cannot be found
    fn resolve_type_ref(&self, reference: &TypeRef, context: Option<&ModuleRc>) -> Option<TypeDefRc>;

    /// Resolves an exported type, `None` if the definition cannot be found
    fn resolve_exported_type(
        &self,
        exported: &ExportedType,
        context: Option<&ModuleRc>,
    ) -> Option<TypeDefRc>;
}

/// Decides whether two distinct definitions are the same type for interop purposes,
/// e.g. two embedded copies of one COM interface.
pub trait TypeEquivalence: Send + Sync {
    /// True if `a` and `b` are equivalent
    fn equivalent(&self, a: &TypeDef, b: &TypeDef) -> bool;
}

/// Maps foreign-ABI entities (Windows Runtime metadata) to the native types and members
/// they are projected to.
///
/// Every hook returns `None` if the entity is not projected, which is what the default
/// implementations do.
pub trait ForeignProjector: Send + Sync {
    /// The native reference a type definition is projected to
    fn project_type_def(&self, _def: &TypeDef, _context: Option<&ModuleRc>) -> Option<TypeRefRc> {
        None
    }

    /// The native reference a type reference is projected to
    fn project_type_ref(
        &self,
        _reference: &TypeRef,
        _context: Option<&ModuleRc>,
    ) -> Option<TypeRefRc> {
        None
    }

    /// The native export an exported type is projected to
    fn project_exported_type(
        &self,
        _exported: &ExportedType,
        _context: Option<&ModuleRc>,
    ) -> Option<ExportedTypeRc> {
        None
    }

    /// The native member reference a method definition is projected to
    fn project_method(&self, _method: &Method, _context: Option<&ModuleRc>) -> Option<MemberRefRc> {
        None
    }

    /// The native member reference a member reference is projected to
    fn project_member_ref(
        &self,
        _member: &MemberRef,
        _context: Option<&ModuleRc>,
    ) -> Option<MemberRefRc> {
        None
    }
}
