//! Equality and hashing of methods, fields, properties and events.
//!
//! Members compare by name and signature, and by declaring type when the options ask for
//! it. A definition equals a member reference naming it, unless the definition is
//! compiler controlled and the options don't allow that.

use std::ptr;

use crate::{
    comparer::{
        hash::GLOBAL_TYPE,
        scope::{definition_assembly, module_assembly, ModuleScope},
        session::Session,
        types::in_same_module,
    },
    metadata::{
        members::{FieldEntity, MemberEntity, MethodDefOrRef, MethodEntity},
        signatures::TypeSignature,
        tables::{
            Event, Field, MemberRef, MemberRefRc, Method, MethodSpec, ModuleRc, ModuleRef,
            Property, TypeDef, TypeDefRc,
        },
        typesystem::{MemberRefParent, TypeView},
    },
};

/// The owner of a member as seen by the declaring type comparison
#[derive(Clone, Copy)]
enum Parent<'e> {
    Type(TypeView<'e>),
    ModuleRef(&'e ModuleRef),
    Method(&'e Method),
    None,
}

impl<'e> Parent<'e> {
    fn of(class: &'e MemberRefParent) -> Self {
        match class {
            MemberRefParent::TypeDef(def) => Parent::Type(TypeView::TypeDef(def)),
            MemberRefParent::TypeRef(reference) => Parent::Type(TypeView::TypeRef(reference)),
            MemberRefParent::TypeSpec(spec) => Parent::Type(TypeView::TypeSpec(spec)),
            MemberRefParent::ModuleRef(module_ref) => Parent::ModuleRef(module_ref),
            MemberRefParent::MethodDef(method) => Parent::Method(method),
            MemberRefParent::None => Parent::None,
        }
    }

    fn declaring(declaring_type: Option<&'e TypeDefRc>) -> Self {
        declaring_type.map_or(Parent::None, |def| Parent::Type(TypeView::TypeDef(def)))
    }
}

/// The type arguments of a parent that is an instantiated generic type
pub(crate) fn generic_instance_args(class: &MemberRefParent) -> Option<&[TypeSignature]> {
    match class {
        MemberRefParent::TypeSpec(spec) => match spec.signature.remove_modifiers() {
            TypeSignature::GenericInst(instance) => Some(&instance.generic_args),
            _ => None,
        },
        _ => None,
    }
}

fn owner_module(declaring_type: Option<&TypeDefRc>) -> Option<&ModuleRc> {
    declaring_type?.module.as_ref()
}

impl Session<'_> {
    pub(crate) fn project_method(&self, method: &Method) -> Option<MemberRefRc> {
        if self.cmp.options.dont_project_win_md_refs() {
            return None;
        }
        self.cmp
            .projector?
            .project_method(method, self.context_module(method.module()))
    }

    pub(crate) fn project_member_ref(&self, member: &MemberRef) -> Option<MemberRefRc> {
        if self.cmp.options.dont_project_win_md_refs() {
            return None;
        }
        self.cmp
            .projector?
            .project_member_ref(member, self.context_module(member.module.as_ref()))
    }

    fn declaring_types_eq(&mut self, a: Option<&TypeDefRc>, b: Option<&TypeDefRc>) -> bool {
        self.type_def_opt_eq(a.map(|def| &**def), b.map(|def| &**def))
    }

    fn declaring_type_hash(&mut self, a: Option<&TypeDefRc>) -> i32 {
        self.type_def_hash(a.map(|def| &**def))
    }

    fn parent_eq(&mut self, a: Parent<'_>, b: Parent<'_>) -> bool {
        self.guarded(|s| match (a, b) {
            (Parent::None, Parent::None) => true,
            (Parent::Type(a), Parent::Type(b)) => s.type_view_eq(a, b),
            (Parent::ModuleRef(a), Parent::ModuleRef(b)) => {
                ptr::eq(a, b)
                    || (s.module_scope_eq(
                        Some(ModuleScope::ModuleRef(a)),
                        Some(ModuleScope::ModuleRef(b)),
                    ) && s.assembly_eq(
                        a.module.as_deref().and_then(module_assembly),
                        b.module.as_deref().and_then(module_assembly),
                    ))
            }
            (Parent::Method(a), Parent::Method(b)) => s.method_def_eq(a, b),
            (Parent::Type(TypeView::TypeDef(def)), Parent::ModuleRef(module_ref))
            | (Parent::ModuleRef(module_ref), Parent::Type(TypeView::TypeDef(def))) => {
                s.global_type_eq(def, module_ref)
            }
            _ => false,
        })
    }

    /// `a` is the `<Module>` type of the module `b` refers to
    fn global_type_eq(&mut self, a: &TypeDef, b: &ModuleRef) -> bool {
        a.is_global_module_type()
            && self.module_scope_eq(
                a.module.as_deref().map(ModuleScope::Module),
                Some(ModuleScope::ModuleRef(b)),
            )
            && self.assembly_eq(
                definition_assembly(a),
                b.module.as_deref().and_then(module_assembly),
            )
    }

    /// Module references and a missing parent hash like the global type, a method parent
    /// like its declaring type
    fn parent_hash(&mut self, a: Parent<'_>) -> i32 {
        self.guarded(|s| match a {
            Parent::Type(ty) => s.type_view_hash(ty),
            Parent::ModuleRef(_) | Parent::None => GLOBAL_TYPE,
            Parent::Method(method) => s.declaring_type_hash(method.declaring_type.as_ref()),
        })
    }

    pub(crate) fn method_entity_eq(&mut self, a: &MethodEntity, b: &MethodEntity) -> bool {
        match (a, b) {
            (MethodEntity::MethodDef(a), MethodEntity::MethodDef(b)) => self.method_def_eq(a, b),
            (MethodEntity::MemberRef(a), MethodEntity::MemberRef(b)) => self.member_ref_eq(a, b),
            (MethodEntity::MethodSpec(a), MethodEntity::MethodSpec(b)) => {
                self.method_spec_eq(a, b)
            }
            (MethodEntity::MethodDef(a), MethodEntity::MemberRef(b))
            | (MethodEntity::MemberRef(b), MethodEntity::MethodDef(a)) => {
                self.method_def_member_ref_eq(a, b)
            }
            _ => false,
        }
    }

    pub(crate) fn method_entity_hash(&mut self, a: &MethodEntity) -> i32 {
        match a {
            MethodEntity::MethodDef(method) => self.method_def_hash(method),
            MethodEntity::MemberRef(member) => self.member_ref_hash(member),
            MethodEntity::MethodSpec(spec) => self.method_spec_hash(spec),
        }
    }

    pub(crate) fn method_def_or_ref_eq(&mut self, a: &MethodDefOrRef, b: &MethodDefOrRef) -> bool {
        match (a, b) {
            (MethodDefOrRef::MethodDef(a), MethodDefOrRef::MethodDef(b)) => self.method_def_eq(a, b),
            (MethodDefOrRef::MemberRef(a), MethodDefOrRef::MemberRef(b)) => {
                self.member_ref_eq(a, b)
            }
            (MethodDefOrRef::MethodDef(a), MethodDefOrRef::MemberRef(b))
            | (MethodDefOrRef::MemberRef(b), MethodDefOrRef::MethodDef(a)) => {
                self.method_def_member_ref_eq(a, b)
            }
        }
    }

    pub(crate) fn method_def_or_ref_hash(&mut self, a: &MethodDefOrRef) -> i32 {
        match a {
            MethodDefOrRef::MethodDef(method) => self.method_def_hash(method),
            MethodDefOrRef::MemberRef(member) => self.member_ref_hash(member),
        }
    }

    pub(crate) fn method_def_eq(&mut self, a: &Method, b: &Method) -> bool {
        if ptr::eq(a, b) {
            return true;
        }
        if self.cmp.options.reference_compare_for_member_defs() && in_same_module(a.module(), b.module())
        {
            return false;
        }

        self.guarded(|s| {
            match (s.project_method(a), s.project_method(b)) {
                (None, None) => {}
                (Some(a), Some(b)) => return s.member_ref_eq(&a, &b),
                (Some(a), None) => return s.method_def_member_ref_eq(b, &a),
                (None, Some(b)) => return s.method_def_member_ref_eq(a, &b),
            }

            s.method_field_names_eq(&a.name, &b.name)
                && s.method_sig_eq(&a.signature, &b.signature)
                && (!s.cmp.options.compare_method_field_declaring_type()
                    || s.declaring_types_eq(a.declaring_type.as_ref(), b.declaring_type.as_ref()))
        })
    }

    pub(crate) fn method_def_hash(&mut self, a: &Method) -> i32 {
        if let Some(projected) = self.project_method(a) {
            return self.member_ref_hash(&projected);
        }

        self.guarded(|s| {
            let mut hash = s
                .method_field_name_hash(&a.name)
                .wrapping_add(s.method_sig_hash(&a.signature));
            if s.cmp.options.compare_method_field_declaring_type() {
                hash = hash.wrapping_add(s.declaring_type_hash(a.declaring_type.as_ref()));
            }
            hash
        })
    }

    /// A method definition against a member reference
    pub(crate) fn method_def_member_ref_eq(&mut self, a: &Method, b: &MemberRef) -> bool {
        self.guarded(|s| {
            let projected_b = s.project_member_ref(b);
            let b = projected_b.as_deref().unwrap_or(b);
            if let Some(projected_a) = s.project_method(a) {
                return s.member_ref_eq(&projected_a, b);
            }

            (s.cmp.options.private_scope_method_is_comparable() || !a.is_private_scope())
                && s.method_field_names_eq(&a.name, &b.name)
                && b
                    .signature
                    .as_method()
                    .is_some_and(|sig| s.method_sig_eq(&a.signature, sig))
                && (!s.cmp.options.compare_method_field_declaring_type()
                    || s.parent_eq(
                        Parent::declaring(a.declaring_type.as_ref()),
                        Parent::of(&b.class),
                    ))
        })
    }

    pub(crate) fn member_ref_eq(&mut self, a: &MemberRef, b: &MemberRef) -> bool {
        if ptr::eq(a, b) {
            return true;
        }

        self.guarded(|s| {
            let projected_a = s.project_member_ref(a);
            let projected_b = s.project_member_ref(b);
            let a = projected_a.as_deref().unwrap_or(a);
            let b = projected_b.as_deref().unwrap_or(b);

            s.method_field_names_eq(&a.name, &b.name)
                && s.cc_sig_eq(&a.signature, &b.signature)
                && (!s.cmp.options.compare_method_field_declaring_type()
                    || s.parent_eq(Parent::of(&a.class), Parent::of(&b.class)))
        })
    }

    /// Hashes a member reference. With declaring types compared, the signature of a
    /// member of an instantiated generic type is hashed with the instantiation arguments
    /// substituted.
    pub(crate) fn member_ref_hash(&mut self, a: &MemberRef) -> i32 {
        self.guarded(|s| {
            let projected = s.project_member_ref(a);
            let a = projected.as_deref().unwrap_or(a);
            let declaring = s.cmp.options.compare_method_field_declaring_type();

            let mut hash = s.method_field_name_hash(&a.name);
            let instance_args = generic_instance_args(&a.class)
                .filter(|_| declaring && s.cmp.substitute_generics);
            let signature_hash = match instance_args {
                Some(arguments) => s.with_type_args(arguments, |s| s.cc_sig_hash(&a.signature)),
                None => s.cc_sig_hash(&a.signature),
            };
            hash = hash.wrapping_add(signature_hash);
            if declaring {
                hash = hash.wrapping_add(s.parent_hash(Parent::of(&a.class)));
            }
            hash
        })
    }

    pub(crate) fn method_spec_eq(&mut self, a: &MethodSpec, b: &MethodSpec) -> bool {
        ptr::eq(a, b)
            || self.guarded(|s| {
                s.method_def_or_ref_eq(&a.method, &b.method)
                    && s.method_spec_sig_eq(&a.instantiation, &b.instantiation)
            })
    }

    /// Hashes the instantiated method with its method generic parameters substituted
    pub(crate) fn method_spec_hash(&mut self, a: &MethodSpec) -> i32 {
        self.guarded(|s| {
            s.with_method_args(&a.instantiation.generic_args, |s| {
                s.method_def_or_ref_hash(&a.method)
            })
        })
    }

    pub(crate) fn field_entity_eq(&mut self, a: &FieldEntity, b: &FieldEntity) -> bool {
        match (a, b) {
            (FieldEntity::Field(a), FieldEntity::Field(b)) => self.field_def_eq(a, b),
            (FieldEntity::MemberRef(a), FieldEntity::MemberRef(b)) => self.member_ref_eq(a, b),
            (FieldEntity::Field(a), FieldEntity::MemberRef(b))
            | (FieldEntity::MemberRef(b), FieldEntity::Field(a)) => {
                self.field_def_member_ref_eq(a, b)
            }
        }
    }

    pub(crate) fn field_entity_hash(&mut self, a: &FieldEntity) -> i32 {
        match a {
            FieldEntity::Field(field) => self.field_def_hash(field),
            FieldEntity::MemberRef(member) => self.member_ref_hash(member),
        }
    }

    pub(crate) fn field_def_eq(&mut self, a: &Field, b: &Field) -> bool {
        if ptr::eq(a, b) {
            return true;
        }
        if self.cmp.options.reference_compare_for_member_defs() && in_same_module(a.module(), b.module())
        {
            return false;
        }

        self.guarded(|s| {
            s.method_field_names_eq(&a.name, &b.name)
                && s.field_sig_eq(&a.signature, &b.signature)
                && (!s.cmp.options.compare_method_field_declaring_type()
                    || s.declaring_types_eq(a.declaring_type.as_ref(), b.declaring_type.as_ref()))
        })
    }

    pub(crate) fn field_def_hash(&mut self, a: &Field) -> i32 {
        self.guarded(|s| {
            let mut hash = s
                .method_field_name_hash(&a.name)
                .wrapping_add(s.field_sig_hash(&a.signature));
            if s.cmp.options.compare_method_field_declaring_type() {
                hash = hash.wrapping_add(s.declaring_type_hash(a.declaring_type.as_ref()));
            }
            hash
        })
    }

    /// A field definition against a member reference
    pub(crate) fn field_def_member_ref_eq(&mut self, a: &Field, b: &MemberRef) -> bool {
        self.guarded(|s| {
            (s.cmp.options.private_scope_field_is_comparable() || !a.is_private_scope())
                && s.method_field_names_eq(&a.name, &b.name)
                && b
                    .signature
                    .as_field()
                    .is_some_and(|sig| s.field_sig_eq(&a.signature, sig))
                && (!s.cmp.options.compare_method_field_declaring_type()
                    || s.parent_eq(
                        Parent::declaring(a.declaring_type.as_ref()),
                        Parent::of(&b.class),
                    ))
        })
    }

    pub(crate) fn property_eq(&mut self, a: &Property, b: &Property) -> bool {
        if ptr::eq(a, b) {
            return true;
        }
        if self.cmp.options.reference_compare_for_member_defs()
            && in_same_module(
                owner_module(a.declaring_type.as_ref()),
                owner_module(b.declaring_type.as_ref()),
            )
        {
            return false;
        }

        self.guarded(|s| {
            let signatures_equal = match (&a.signature, &b.signature) {
                (None, None) => true,
                (Some(a), Some(b)) => s.method_sig_eq(a, b),
                _ => false,
            };
            s.property_names_eq(&a.name, &b.name)
                && signatures_equal
                && (!s.cmp.options.compare_property_declaring_type()
                    || s.declaring_types_eq(a.declaring_type.as_ref(), b.declaring_type.as_ref()))
        })
    }

    /// Hashes the name and the property type. Indexer parameters are left out, reflection
    /// reports them separately.
    pub(crate) fn property_hash(&mut self, a: &Property) -> i32 {
        self.guarded(|s| {
            let property_type = a
                .signature
                .as_ref()
                .map_or(0, |sig| s.sig_hash(&sig.return_type));
            let mut hash = s.property_name_hash(&a.name).wrapping_add(property_type);
            if s.cmp.options.compare_property_declaring_type() {
                hash = hash.wrapping_add(s.declaring_type_hash(a.declaring_type.as_ref()));
            }
            hash
        })
    }

    pub(crate) fn event_eq(&mut self, a: &Event, b: &Event) -> bool {
        if ptr::eq(a, b) {
            return true;
        }
        if self.cmp.options.reference_compare_for_member_defs()
            && in_same_module(
                owner_module(a.declaring_type.as_ref()),
                owner_module(b.declaring_type.as_ref()),
            )
        {
            return false;
        }

        self.guarded(|s| {
            let types_equal = match (&a.event_type, &b.event_type) {
                (None, None) => true,
                (Some(a), Some(b)) => s.type_def_or_ref_eq(a, b),
                _ => false,
            };
            s.event_names_eq(&a.name, &b.name)
                && types_equal
                && (!s.cmp.options.compare_event_declaring_type()
                    || s.declaring_types_eq(a.declaring_type.as_ref(), b.declaring_type.as_ref()))
        })
    }

    pub(crate) fn event_hash(&mut self, a: &Event) -> i32 {
        self.guarded(|s| {
            let event_type = a
                .event_type
                .as_ref()
                .map_or(0, |ty| s.type_def_or_ref_hash(ty));
            let mut hash = s.event_name_hash(&a.name).wrapping_add(event_type);
            if s.cmp.options.compare_event_declaring_type() {
                hash = hash.wrapping_add(s.declaring_type_hash(a.declaring_type.as_ref()));
            }
            hash
        })
    }

    /// Compares members of any category. A field reference and a method reference are
    /// compared as the member references they are.
    pub(crate) fn member_entity_eq(&mut self, a: &MemberEntity, b: &MemberEntity) -> bool {
        match (a, b) {
            (MemberEntity::Type(a), MemberEntity::Type(b)) => self.type_view_eq(a.into(), b.into()),
            (MemberEntity::Field(a), MemberEntity::Field(b)) => self.field_entity_eq(a, b),
            (MemberEntity::Method(a), MemberEntity::Method(b)) => self.method_entity_eq(a, b),
            (
                MemberEntity::Field(FieldEntity::MemberRef(a)),
                MemberEntity::Method(MethodEntity::MemberRef(b)),
            )
            | (
                MemberEntity::Method(MethodEntity::MemberRef(a)),
                MemberEntity::Field(FieldEntity::MemberRef(b)),
            ) => self.member_ref_eq(a, b),
            (MemberEntity::Property(a), MemberEntity::Property(b)) => self.property_eq(a, b),
            (MemberEntity::Event(a), MemberEntity::Event(b)) => self.event_eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn member_entity_hash(&mut self, a: &MemberEntity) -> i32 {
        match a {
            MemberEntity::Type(ty) => self.type_view_hash(ty.into()),
            MemberEntity::Field(field) => self.field_entity_hash(field),
            MemberEntity::Method(method) => self.method_entity_hash(method),
            MemberEntity::Property(property) => self.property_hash(property),
            MemberEntity::Event(event) => self.event_hash(event),
        }
    }
}
