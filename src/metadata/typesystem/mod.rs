//! The type-family of the entity model.
//!
//! A type can be represented in five different shapes, collected by [`TypeEntity`]:
//!
//! - [`TypeDef`] - the authoritative definition owned by a module
//! - [`TypeRef`] - a reference into another module or assembly
//! - [`TypeSpec`] - a row wrapping a full signature, e.g. an instantiated generic type
//! - [`TypeSignature`] - a signature tree as found in member signatures
//! - [`ExportedType`] - a forward to a type that lives in another file or assembly
//!
//! The coded-index unions [`TypeDefOrRef`], [`ResolutionScope`], [`Implementation`] and
//! [`MemberRefParent`] link rows to each other the way the metadata tables do.

mod base;

pub use base::*;

use crate::metadata::{
    signatures::TypeSignature,
    tables::{
        AssemblyRefRc, ExportedType, ExportedTypeRc, FileRc, MethodRc, ModuleRc, ModuleRefRc,
        TypeDef, TypeDefRc, TypeRef, TypeRefRc, TypeSpec, TypeSpecRc,
    },
    token::Token,
};

/// A `TypeDefOrRef` coded index
#[derive(Clone, Debug)]
pub enum TypeDefOrRef {
    /// A type definition
    TypeDef(TypeDefRc),
    /// A type reference
    TypeRef(TypeRefRc),
    /// A type specification
    TypeSpec(TypeSpecRc),
}

impl TypeDefOrRef {
    /// The token of the row this index points to
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            TypeDefOrRef::TypeDef(def) => def.token,
            TypeDefOrRef::TypeRef(reference) => reference.token,
            TypeDefOrRef::TypeSpec(spec) => spec.token,
        }
    }

    /// The type name, empty for specifications
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            TypeDefOrRef::TypeDef(def) => &def.name,
            TypeDefOrRef::TypeRef(reference) => &reference.name,
            TypeDefOrRef::TypeSpec(_) => "",
        }
    }

    /// Converts into the general type entity
    #[must_use]
    pub fn to_entity(&self) -> TypeEntity {
        match self {
            TypeDefOrRef::TypeDef(def) => TypeEntity::TypeDef(def.clone()),
            TypeDefOrRef::TypeRef(reference) => TypeEntity::TypeRef(reference.clone()),
            TypeDefOrRef::TypeSpec(spec) => TypeEntity::TypeSpec(spec.clone()),
        }
    }
}

impl From<TypeDefRc> for TypeDefOrRef {
    fn from(def: TypeDefRc) -> Self {
        TypeDefOrRef::TypeDef(def)
    }
}

impl From<TypeRefRc> for TypeDefOrRef {
    fn from(reference: TypeRefRc) -> Self {
        TypeDefOrRef::TypeRef(reference)
    }
}

impl From<TypeSpecRc> for TypeDefOrRef {
    fn from(spec: TypeSpecRc) -> Self {
        TypeDefOrRef::TypeSpec(spec)
    }
}

/// The owner a `TypeRef` is resolved through
#[derive(Clone, Debug, Default)]
pub enum ResolutionScope {
    /// The type lives in the referencing module itself
    Module(ModuleRc),
    /// The type lives in another module of the same assembly
    ModuleRef(ModuleRefRc),
    /// The type lives in another assembly
    AssemblyRef(AssemblyRefRc),
    /// The type is nested in the referenced type
    TypeRef(TypeRefRc),
    /// No scope, the type must be looked up through the `ExportedType` table
    #[default]
    None,
}

/// Where an `ExportedType` forwards to
#[derive(Clone, Debug, Default)]
pub enum Implementation {
    /// Another file of the same assembly
    File(FileRc),
    /// Another assembly
    AssemblyRef(AssemblyRefRc),
    /// The exported type is nested in this exported type
    ExportedType(ExportedTypeRc),
    /// No implementation recorded
    #[default]
    None,
}

/// The owner of a `MemberRef`
#[derive(Clone, Debug, Default)]
pub enum MemberRefParent {
    /// A member of a type defined in this module
    TypeDef(TypeDefRc),
    /// A member of a referenced type
    TypeRef(TypeRefRc),
    /// A member of an instantiated type
    TypeSpec(TypeSpecRc),
    /// A global member of another module
    ModuleRef(ModuleRefRc),
    /// A vararg call site of a method defined in this module
    MethodDef(MethodRc),
    /// No parent recorded
    #[default]
    None,
}

impl MemberRefParent {
    /// The parent as a type, if it is one
    #[must_use]
    pub fn as_type(&self) -> Option<TypeDefOrRef> {
        match self {
            MemberRefParent::TypeDef(def) => Some(TypeDefOrRef::TypeDef(def.clone())),
            MemberRefParent::TypeRef(reference) => Some(TypeDefOrRef::TypeRef(reference.clone())),
            MemberRefParent::TypeSpec(spec) => Some(TypeDefOrRef::TypeSpec(spec.clone())),
            _ => None,
        }
    }

    /// The generic instantiation signature of a `TypeSpec` parent
    #[must_use]
    pub fn generic_instance(&self) -> Option<&TypeSignature> {
        match self {
            MemberRefParent::TypeSpec(spec) => match &spec.signature {
                sig @ TypeSignature::GenericInst(_) => Some(sig),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<TypeDefOrRef> for MemberRefParent {
    fn from(value: TypeDefOrRef) -> Self {
        match value {
            TypeDefOrRef::TypeDef(def) => MemberRefParent::TypeDef(def),
            TypeDefOrRef::TypeRef(reference) => MemberRefParent::TypeRef(reference),
            TypeDefOrRef::TypeSpec(spec) => MemberRefParent::TypeSpec(spec),
        }
    }
}

/// Any of the five representations of a type
#[derive(Clone, Debug)]
pub enum TypeEntity {
    /// A type definition
    TypeDef(TypeDefRc),
    /// A type reference
    TypeRef(TypeRefRc),
    /// A type specification row
    TypeSpec(TypeSpecRc),
    /// A signature tree
    TypeSignature(TypeSignature),
    /// An export forward
    ExportedType(ExportedTypeRc),
}

impl From<TypeDefOrRef> for TypeEntity {
    fn from(value: TypeDefOrRef) -> Self {
        match value {
            TypeDefOrRef::TypeDef(def) => TypeEntity::TypeDef(def),
            TypeDefOrRef::TypeRef(reference) => TypeEntity::TypeRef(reference),
            TypeDefOrRef::TypeSpec(spec) => TypeEntity::TypeSpec(spec),
        }
    }
}

impl From<TypeDefRc> for TypeEntity {
    fn from(def: TypeDefRc) -> Self {
        TypeEntity::TypeDef(def)
    }
}

impl From<TypeRefRc> for TypeEntity {
    fn from(reference: TypeRefRc) -> Self {
        TypeEntity::TypeRef(reference)
    }
}

impl From<TypeSpecRc> for TypeEntity {
    fn from(spec: TypeSpecRc) -> Self {
        TypeEntity::TypeSpec(spec)
    }
}

impl From<TypeSignature> for TypeEntity {
    fn from(sig: TypeSignature) -> Self {
        TypeEntity::TypeSignature(sig)
    }
}

impl From<ExportedTypeRc> for TypeEntity {
    fn from(exported: ExportedTypeRc) -> Self {
        TypeEntity::ExportedType(exported)
    }
}

/// A borrowed view of one type representation, used by the comparer to dispatch
/// without cloning the owning `Arc`s.
#[derive(Clone, Copy, Debug)]
pub enum TypeView<'a> {
    /// A type definition
    TypeDef(&'a TypeDef),
    /// A type reference
    TypeRef(&'a TypeRef),
    /// A type specification row
    TypeSpec(&'a TypeSpec),
    /// A signature tree
    TypeSignature(&'a TypeSignature),
    /// An export forward
    ExportedType(&'a ExportedType),
}

impl<'a> From<&'a TypeEntity> for TypeView<'a> {
    fn from(entity: &'a TypeEntity) -> Self {
        match entity {
            TypeEntity::TypeDef(def) => TypeView::TypeDef(def),
            TypeEntity::TypeRef(reference) => TypeView::TypeRef(reference),
            TypeEntity::TypeSpec(spec) => TypeView::TypeSpec(spec),
            TypeEntity::TypeSignature(sig) => TypeView::TypeSignature(sig),
            TypeEntity::ExportedType(exported) => TypeView::ExportedType(exported),
        }
    }
}

impl<'a> From<&'a TypeDefOrRef> for TypeView<'a> {
    fn from(value: &'a TypeDefOrRef) -> Self {
        match value {
            TypeDefOrRef::TypeDef(def) => TypeView::TypeDef(def),
            TypeDefOrRef::TypeRef(reference) => TypeView::TypeRef(reference),
            TypeDefOrRef::TypeSpec(spec) => TypeView::TypeSpec(spec),
        }
    }
}
