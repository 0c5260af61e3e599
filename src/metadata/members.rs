//! Tagged unions over the representations of each member category.
//!
//! Methods are definitions, member references or instantiations; fields are definitions
//! or member references; properties and events only exist as definitions.

use crate::metadata::{
    tables::{EventRc, FieldRc, MemberRefRc, MethodRc, MethodSpecRc, PropertyRc},
    typesystem::TypeEntity,
};

/// The `MethodDefOrRef` coded index
#[derive(Clone, Debug)]
pub enum MethodDefOrRef {
    /// A method definition
    MethodDef(MethodRc),
    /// A method reference
    MemberRef(MemberRefRc),
}

impl From<MethodRc> for MethodDefOrRef {
    fn from(method: MethodRc) -> Self {
        MethodDefOrRef::MethodDef(method)
    }
}

impl From<MemberRefRc> for MethodDefOrRef {
    fn from(member: MemberRefRc) -> Self {
        MethodDefOrRef::MemberRef(member)
    }
}

/// Any representation of a method
#[derive(Clone, Debug)]
pub enum MethodEntity {
    /// A method definition
    MethodDef(MethodRc),
    /// A method reference
    MemberRef(MemberRefRc),
    /// A generic method instantiation
    MethodSpec(MethodSpecRc),
}

impl From<MethodDefOrRef> for MethodEntity {
    fn from(value: MethodDefOrRef) -> Self {
        match value {
            MethodDefOrRef::MethodDef(method) => MethodEntity::MethodDef(method),
            MethodDefOrRef::MemberRef(member) => MethodEntity::MemberRef(member),
        }
    }
}

impl From<MethodRc> for MethodEntity {
    fn from(method: MethodRc) -> Self {
        MethodEntity::MethodDef(method)
    }
}

impl From<MemberRefRc> for MethodEntity {
    fn from(member: MemberRefRc) -> Self {
        MethodEntity::MemberRef(member)
    }
}

impl From<MethodSpecRc> for MethodEntity {
    fn from(spec: MethodSpecRc) -> Self {
        MethodEntity::MethodSpec(spec)
    }
}

/// Any representation of a field
#[derive(Clone, Debug)]
pub enum FieldEntity {
    /// A field definition
    Field(FieldRc),
    /// A field reference
    MemberRef(MemberRefRc),
}

impl From<FieldRc> for FieldEntity {
    fn from(field: FieldRc) -> Self {
        FieldEntity::Field(field)
    }
}

impl From<MemberRefRc> for FieldEntity {
    fn from(member: MemberRefRc) -> Self {
        FieldEntity::MemberRef(member)
    }
}

/// Any type or member
#[derive(Clone, Debug)]
pub enum MemberEntity {
    /// A type
    Type(TypeEntity),
    /// A method
    Method(MethodEntity),
    /// A field
    Field(FieldEntity),
    /// A property
    Property(PropertyRc),
    /// An event
    Event(EventRc),
}

impl From<TypeEntity> for MemberEntity {
    fn from(value: TypeEntity) -> Self {
        MemberEntity::Type(value)
    }
}

impl From<MethodEntity> for MemberEntity {
    fn from(value: MethodEntity) -> Self {
        MemberEntity::Method(value)
    }
}

impl From<FieldEntity> for MemberEntity {
    fn from(value: FieldEntity) -> Self {
        MemberEntity::Field(value)
    }
}

impl From<PropertyRc> for MemberEntity {
    fn from(value: PropertyRc) -> Self {
        MemberEntity::Property(value)
    }
}

impl From<EventRc> for MemberEntity {
    fn from(value: EventRc) -> Self {
        MemberEntity::Event(value)
    }
}
