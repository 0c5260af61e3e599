//! Equality and hashing across the five type representations.
//!
//! Definitions, references and exported types are *named* types: two of them are equal
//! when their names, their enclosing types and their scopes agree. Specifications and
//! signatures are structural and are compared as signature trees. A named type equals a
//! signature only if the signature is a `Class` or `ValueType` node of that type, or a
//! primitive leaf standing for the same core library type, possibly behind custom
//! modifiers or a pinned node.
//!
//! Unless `DONT_PROJECT_WIN_MD_REFS` is set, every named type is first replaced by the
//! native type the [`crate::comparer::ForeignProjector`] maps it to.

use std::{ptr, sync::Arc};

use crate::{
    comparer::{
        hash::{is_global_type_name, GLOBAL_TYPE, NESTED_TYPE},
        scope::{definition_assembly, named, Forward, ModuleScope},
        session::Session,
    },
    metadata::{
        signatures::TypeSignature,
        tables::{
            AssemblyName, ExportedType, ExportedTypeRc, ModuleRc, TypeDef, TypeRef, TypeRefRc,
            TypeSpec,
        },
        typesystem::{Implementation, ResolutionScope, TypeDefOrRef, TypeView},
    },
};

/// Namespace of the types primitive signature leaves stand for
const SYSTEM_NAMESPACE: &str = "System";

/// True if both entities are owned by the same module
pub(crate) fn in_same_module(a: Option<&ModuleRc>, b: Option<&ModuleRc>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if Arc::ptr_eq(a, b))
}

/// A type known by name rather than by structure
#[derive(Clone, Copy)]
enum NamedType<'e> {
    TypeDef(&'e TypeDef),
    TypeRef(&'e TypeRef),
    ExportedType(&'e ExportedType),
}

impl<'e> NamedType<'e> {
    fn view(self) -> TypeView<'e> {
        match self {
            NamedType::TypeDef(def) => TypeView::TypeDef(def),
            NamedType::TypeRef(reference) => TypeView::TypeRef(reference),
            NamedType::ExportedType(exported) => TypeView::ExportedType(exported),
        }
    }

    fn name(self) -> &'e str {
        match self {
            NamedType::TypeDef(def) => &def.name,
            NamedType::TypeRef(reference) => &reference.name,
            NamedType::ExportedType(exported) => &exported.name,
        }
    }

    fn namespace(self) -> &'e str {
        match self {
            NamedType::TypeDef(def) => &def.namespace,
            NamedType::TypeRef(reference) => &reference.namespace,
            NamedType::ExportedType(exported) => &exported.namespace,
        }
    }

    fn is_nested(self) -> bool {
        match self {
            NamedType::TypeDef(def) => def.is_nested(),
            NamedType::TypeRef(reference) => reference.is_nested(),
            NamedType::ExportedType(exported) => exported.is_nested(),
        }
    }

    fn definition_assembly(self) -> Option<&'e dyn AssemblyName> {
        match self {
            NamedType::TypeDef(def) => definition_assembly(def),
            NamedType::TypeRef(reference) => reference.definition_assembly(),
            NamedType::ExportedType(exported) => exported.definition_assembly(),
        }
    }
}

impl Session<'_> {
    /// True if `a` hashes as the `<Module>` type. A definition is the global type by its
    /// row, a reference or an exported type by its name, and only when references may
    /// denote the global type.
    fn is_global_type(&self, a: NamedType<'_>) -> bool {
        match a {
            NamedType::TypeDef(def) => def.is_global_module_type(),
            NamedType::TypeRef(_) | NamedType::ExportedType(_) => {
                self.cmp.options.type_ref_can_reference_global_type()
                    && !a.is_nested()
                    && is_global_type_name(
                        self.cmp.options.case_insensitive_type_names(),
                        a.namespace(),
                        a.name(),
                    )
            }
        }
    }

    pub(crate) fn type_ref_is_global(&self, a: &TypeRef) -> bool {
        self.is_global_type(NamedType::TypeRef(a))
    }

    pub(crate) fn exported_type_is_global(&self, a: &ExportedType) -> bool {
        self.is_global_type(NamedType::ExportedType(a))
    }

    pub(crate) fn project_type_def(&self, def: &TypeDef) -> Option<TypeRefRc> {
        if self.cmp.options.dont_project_win_md_refs() {
            return None;
        }
        self.cmp
            .projector?
            .project_type_def(def, self.context_module(def.module.as_ref()))
    }

    pub(crate) fn project_type_ref(&self, reference: &TypeRef) -> Option<TypeRefRc> {
        if self.cmp.options.dont_project_win_md_refs() {
            return None;
        }
        self.cmp
            .projector?
            .project_type_ref(reference, self.context_module(reference.module.as_ref()))
    }

    pub(crate) fn project_exported_type(&self, exported: &ExportedType) -> Option<ExportedTypeRc> {
        if self.cmp.options.dont_project_win_md_refs() {
            return None;
        }
        self.cmp
            .projector?
            .project_exported_type(exported, self.context_module(exported.module.as_ref()))
    }

    /// Compares any two type representations
    pub(crate) fn type_view_eq(&mut self, a: TypeView<'_>, b: TypeView<'_>) -> bool {
        use TypeView as V;

        match (a, b) {
            (V::TypeDef(a), V::TypeDef(b)) => self.type_def_eq(a, b),
            (V::TypeRef(a), V::TypeRef(b)) => self.type_ref_eq(a, b),
            (V::TypeSpec(a), V::TypeSpec(b)) => self.type_spec_eq(a, b),
            (V::TypeSignature(a), V::TypeSignature(b)) => self.sig_eq(a, b),
            (V::ExportedType(a), V::ExportedType(b)) => self.exported_type_eq(a, b),

            (V::TypeDef(a), V::TypeRef(b)) | (V::TypeRef(b), V::TypeDef(a)) => {
                self.type_def_type_ref_eq(a, b)
            }
            (V::TypeDef(a), V::TypeSpec(b)) | (V::TypeSpec(b), V::TypeDef(a)) => {
                self.named_type_sig_eq(NamedType::TypeDef(a), &b.signature)
            }
            (V::TypeDef(a), V::TypeSignature(b)) | (V::TypeSignature(b), V::TypeDef(a)) => {
                self.named_type_sig_eq(NamedType::TypeDef(a), b)
            }
            (V::TypeDef(a), V::ExportedType(b)) | (V::ExportedType(b), V::TypeDef(a)) => {
                self.type_def_exported_eq(a, b)
            }
            (V::TypeRef(a), V::TypeSpec(b)) | (V::TypeSpec(b), V::TypeRef(a)) => {
                self.named_type_sig_eq(NamedType::TypeRef(a), &b.signature)
            }
            (V::TypeRef(a), V::TypeSignature(b)) | (V::TypeSignature(b), V::TypeRef(a)) => {
                self.named_type_sig_eq(NamedType::TypeRef(a), b)
            }
            (V::TypeRef(a), V::ExportedType(b)) | (V::ExportedType(b), V::TypeRef(a)) => {
                self.type_ref_exported_eq(a, b)
            }
            (V::TypeSpec(a), V::TypeSignature(b)) | (V::TypeSignature(b), V::TypeSpec(a)) => {
                self.sig_eq(&a.signature, b)
            }
            (V::TypeSpec(a), V::ExportedType(b)) | (V::ExportedType(b), V::TypeSpec(a)) => {
                self.named_type_sig_eq(NamedType::ExportedType(b), &a.signature)
            }
            (V::TypeSignature(a), V::ExportedType(b))
            | (V::ExportedType(b), V::TypeSignature(a)) => {
                self.named_type_sig_eq(NamedType::ExportedType(b), a)
            }
        }
    }

    /// Hashes any type representation
    pub(crate) fn type_view_hash(&mut self, a: TypeView<'_>) -> i32 {
        match a {
            TypeView::TypeDef(def) => self.type_def_hash(Some(def)),
            TypeView::TypeRef(reference) => self.type_ref_hash(reference),
            TypeView::TypeSpec(spec) => self.type_spec_hash(spec),
            TypeView::TypeSignature(sig) => self.sig_hash(sig),
            TypeView::ExportedType(exported) => self.exported_type_hash(exported),
        }
    }

    pub(crate) fn type_def_or_ref_eq(&mut self, a: &TypeDefOrRef, b: &TypeDefOrRef) -> bool {
        self.type_view_eq(a.into(), b.into())
    }

    pub(crate) fn type_def_or_ref_hash(&mut self, a: &TypeDefOrRef) -> i32 {
        self.type_view_hash(a.into())
    }

    pub(crate) fn type_def_eq(&mut self, a: &TypeDef, b: &TypeDef) -> bool {
        if ptr::eq(a, b) {
            return true;
        }
        if self.cmp.options.reference_compare_for_member_defs()
            && in_same_module(a.module.as_ref(), b.module.as_ref())
        {
            return false;
        }

        self.guarded(|s| {
            let projected_a = s.project_type_def(a);
            let projected_b = s.project_type_def(b);
            if projected_a.is_some() || projected_b.is_some() {
                let a = projected_a.as_deref().map_or(TypeView::TypeDef(a), TypeView::TypeRef);
                let b = projected_b.as_deref().map_or(TypeView::TypeDef(b), TypeView::TypeRef);
                return s.type_view_eq(a, b);
            }

            a.is_global_module_type() == b.is_global_module_type()
                && s.type_names_eq(&a.name, &b.name)
                && s.type_namespaces_eq(&a.namespace, &b.namespace)
                && s.type_def_opt_eq(
                    a.declaring_type().map(|outer| &**outer),
                    b.declaring_type().map(|outer| &**outer),
                )
                && (s.cmp.options.dont_compare_type_scope() || s.type_def_scope_eq(Some(a), Some(b)))
        })
    }

    /// Compares optional definitions, two absent ones are equal
    pub(crate) fn type_def_opt_eq(&mut self, a: Option<&TypeDef>, b: Option<&TypeDef>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => self.type_def_eq(a, b),
            _ => false,
        }
    }

    /// Hashes an optional definition. A missing type and the `<Module>` type share the
    /// global type hash.
    pub(crate) fn type_def_hash(&mut self, a: Option<&TypeDef>) -> i32 {
        let Some(def) = a else {
            return GLOBAL_TYPE;
        };
        if def.is_global_module_type() {
            return GLOBAL_TYPE;
        }
        if let Some(projected) = self.project_type_def(def) {
            return self.type_ref_hash(&projected);
        }

        let scope = if def.is_nested() {
            NESTED_TYPE
        } else {
            self.type_namespace_hash(&def.namespace)
        };
        self.type_name_hash(&def.name).wrapping_add(scope)
    }

    pub(crate) fn type_ref_eq(&mut self, a: &TypeRef, b: &TypeRef) -> bool {
        if ptr::eq(a, b) {
            return true;
        }

        self.guarded(|s| {
            let projected_a = s.project_type_ref(a);
            let projected_b = s.project_type_ref(b);
            let a = projected_a.as_deref().unwrap_or(a);
            let b = projected_b.as_deref().unwrap_or(b);

            s.type_names_eq(&a.name, &b.name)
                && s.type_namespaces_eq(&a.namespace, &b.namespace)
                && s.resolution_scope_eq(a, b)
        })
    }

    pub(crate) fn type_ref_hash(&mut self, a: &TypeRef) -> i32 {
        let projected = self.project_type_ref(a);
        let a = projected.as_deref().unwrap_or(a);

        if self.type_ref_is_global(a) {
            return GLOBAL_TYPE;
        }

        let scope = if a.is_nested() {
            NESTED_TYPE
        } else {
            self.type_namespace_hash(&a.namespace)
        };
        self.type_name_hash(&a.name).wrapping_add(scope)
    }

    pub(crate) fn exported_type_eq(&mut self, a: &ExportedType, b: &ExportedType) -> bool {
        if ptr::eq(a, b) {
            return true;
        }

        self.guarded(|s| {
            let projected_a = s.project_exported_type(a);
            let projected_b = s.project_exported_type(b);
            let a = projected_a.as_deref().unwrap_or(a);
            let b = projected_b.as_deref().unwrap_or(b);

            s.type_names_eq(&a.name, &b.name)
                && s.type_namespaces_eq(&a.namespace, &b.namespace)
                && s.implementation_eq(a, b)
        })
    }

    pub(crate) fn exported_type_hash(&mut self, a: &ExportedType) -> i32 {
        let projected = self.project_exported_type(a);
        let a = projected.as_deref().unwrap_or(a);
        if self.exported_type_is_global(a) {
            return GLOBAL_TYPE;
        }

        let scope = if a.is_nested() {
            NESTED_TYPE
        } else {
            self.type_namespace_hash(&a.namespace)
        };
        self.type_name_hash(&a.name).wrapping_add(scope)
    }

    pub(crate) fn type_spec_eq(&mut self, a: &TypeSpec, b: &TypeSpec) -> bool {
        ptr::eq(a, b) || self.guarded(|s| s.sig_eq(&a.signature, &b.signature))
    }

    pub(crate) fn type_spec_hash(&mut self, a: &TypeSpec) -> i32 {
        self.sig_hash(&a.signature)
    }

    /// A definition against a reference
    pub(crate) fn type_def_type_ref_eq(&mut self, a: &TypeDef, b: &TypeRef) -> bool {
        self.guarded(|s| {
            let projected_b = s.project_type_ref(b);
            let b = projected_b.as_deref().unwrap_or(b);
            if let Some(projected_a) = s.project_type_def(a) {
                return s.type_ref_eq(&projected_a, b);
            }

            let scope = &b.resolution_scope;
            let equal = if !s.type_names_eq(&a.name, &b.name)
                || !s.type_namespaces_eq(&a.namespace, &b.namespace)
            {
                false
            } else if let ResolutionScope::TypeRef(enclosing) = scope {
                match a.declaring_type() {
                    Some(outer) => s.type_def_type_ref_eq(outer, enclosing),
                    None => false,
                }
            } else if a.is_nested() {
                false
            } else if s.cmp.options.dont_compare_type_scope() {
                true
            } else if let Some(module) = ModuleScope::of(scope) {
                s.type_def_in_module_scope(a, module, b)
            } else if let ResolutionScope::AssemblyRef(assembly) = scope {
                let found = a.module.is_some()
                    && s.assembly_eq_resolving(
                        definition_assembly(a),
                        named(assembly),
                        Forward::TypeRef(b),
                    );
                found || (!s.cmp.options.dont_check_type_equivalence() && {
                    let resolved = s.resolve_type_ref(b);
                    s.type_def_scope_eq(Some(a), resolved.as_deref())
                })
            } else {
                false
            };

            equal && a.is_global_module_type() == s.type_ref_is_global(b)
        })
    }

    /// A definition against an exported type
    pub(crate) fn type_def_exported_eq(&mut self, a: &TypeDef, b: &ExportedType) -> bool {
        self.guarded(|s| {
            let projected_b = s.project_exported_type(b);
            let b = projected_b.as_deref().unwrap_or(b);
            if let Some(projected_a) = s.project_type_def(a) {
                return s.type_ref_exported_eq(&projected_a, b);
            }

            let implementation = &b.implementation;
            let equal = if !s.type_names_eq(&a.name, &b.name)
                || !s.type_namespaces_eq(&a.namespace, &b.namespace)
            {
                false
            } else if let Implementation::ExportedType(enclosing) = implementation {
                match a.declaring_type() {
                    Some(outer) => s.type_def_exported_eq(outer, enclosing),
                    None => false,
                }
            } else if a.is_nested() {
                false
            } else if s.cmp.options.dont_compare_type_scope() {
                true
            } else {
                let found = match implementation {
                    Implementation::File(file) => s.type_def_in_file_scope(a, file, b),
                    Implementation::AssemblyRef(assembly) => {
                        a.module.is_some()
                            && s.assembly_eq_resolving(
                                definition_assembly(a),
                                named(assembly),
                                Forward::ExportedType(b),
                            )
                    }
                    _ => false,
                };
                found || (!s.cmp.options.dont_check_type_equivalence() && {
                    let resolved = s.resolve_exported_type(b);
                    s.type_def_scope_eq(Some(a), resolved.as_deref())
                })
            };

            equal && a.is_global_module_type() == s.exported_type_is_global(b)
        })
    }

    /// A reference against an exported type
    pub(crate) fn type_ref_exported_eq(&mut self, a: &TypeRef, b: &ExportedType) -> bool {
        self.guarded(|s| {
            let projected_a = s.project_type_ref(a);
            let projected_b = s.project_exported_type(b);
            let a = projected_a.as_deref().unwrap_or(a);
            let b = projected_b.as_deref().unwrap_or(b);

            s.type_names_eq(&a.name, &b.name)
                && s.type_namespaces_eq(&a.namespace, &b.namespace)
                && s.scope_implementation_eq(a, b)
        })
    }

    /// A named type against a signature node
    fn named_type_sig_eq(&mut self, a: NamedType<'_>, b: &TypeSignature) -> bool {
        self.guarded(|s| match b {
            TypeSignature::Class(ty) | TypeSignature::ValueType(ty) => {
                s.type_view_eq(a.view(), ty.into())
            }
            TypeSignature::ModifiedRequired(modifier) | TypeSignature::ModifiedOptional(modifier) => {
                s.named_type_sig_eq(a, &modifier.base)
            }
            TypeSignature::Pinned(base) => s.named_type_sig_eq(a, base),
            other => other
                .element_type()
                .core_library_name()
                .is_some_and(|name| s.is_core_library_type(a, name)),
        })
    }

    /// True if `a` is the core library type `System.<name>`
    fn is_core_library_type(&self, a: NamedType<'_>, name: &str) -> bool {
        !a.is_nested()
            && !self.is_global_type(a)
            && self.type_names_eq(a.name(), name)
            && self.type_namespaces_eq(a.namespace(), SYSTEM_NAMESPACE)
            && (self.cmp.options.dont_compare_type_scope()
                || a.definition_assembly()
                    .is_some_and(|assembly| assembly.is_core_library()))
    }

    /// The hash of the core library type `System.<name>`, which is what primitive
    /// signature leaves hash as
    pub(crate) fn core_library_type_hash(&self, name: &str) -> i32 {
        self.type_name_hash(name)
            .wrapping_add(self.type_namespace_hash(SYSTEM_NAMESPACE))
    }
}
