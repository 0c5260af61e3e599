//! Ownership equality: modules, files, assemblies and the scope chains of references.
//!
//! Owners are compared by name, case-insensitively. Assemblies additionally compare the
//! identity facts the options ask for. Two owners that both are the core library are
//! always equal unless `MSCORLIB_IS_NOT_SPECIAL` is set, because the core library is
//! retargeted between platform versions under different names.
//!
//! When the owners of two references differ, the references may still denote the same
//! type through a type forwarder. Those routines resolve the references through the
//! [`crate::comparer::Resolver`] and compare the owners of the resolved definitions.

use std::{ptr, sync::Arc};

use log::trace;

use crate::{
    comparer::{hash::names_equal, session::Session},
    metadata::{
        tables::{
            is_neutral_culture, AssemblyName, AssemblyRef, AssemblyRefRc, ExportedType, File,
            Module, ModuleRef, TypeDef, TypeDefRc, TypeRef,
        },
        typesystem::{Implementation, ResolutionScope},
    },
};

/// A module or a module reference, the owners a type reference can point into
#[derive(Clone, Copy, Debug)]
pub(crate) enum ModuleScope<'e> {
    Module(&'e Module),
    ModuleRef(&'e ModuleRef),
}

impl<'e> ModuleScope<'e> {
    pub(crate) fn of(scope: &'e ResolutionScope) -> Option<Self> {
        match scope {
            ResolutionScope::Module(module) => Some(ModuleScope::Module(module)),
            ResolutionScope::ModuleRef(module_ref) => Some(ModuleScope::ModuleRef(module_ref)),
            _ => None,
        }
    }

    pub(crate) fn name(self) -> &'e str {
        match self {
            ModuleScope::Module(module) => &module.name,
            ModuleScope::ModuleRef(module_ref) => &module_ref.name,
        }
    }

    /// A module reference is never the core library, only its manifest module is
    pub(crate) fn is_core_library(self) -> bool {
        match self {
            ModuleScope::Module(module) => module.is_core_library(),
            ModuleScope::ModuleRef(_) => false,
        }
    }

    fn same(self, other: ModuleScope<'_>) -> bool {
        match (self, other) {
            (ModuleScope::Module(a), ModuleScope::Module(b)) => ptr::eq(a, b),
            (ModuleScope::ModuleRef(a), ModuleScope::ModuleRef(b)) => ptr::eq(a, b),
            _ => false,
        }
    }
}

/// A reference that can be resolved to a definition
#[derive(Clone, Copy, Debug)]
pub(crate) enum Forward<'e> {
    TypeRef(&'e TypeRef),
    ExportedType(&'e ExportedType),
}

impl<'e> Forward<'e> {
    fn definition_assembly(self) -> Option<&'e dyn AssemblyName> {
        match self {
            Forward::TypeRef(reference) => reference.definition_assembly(),
            Forward::ExportedType(exported) => exported.definition_assembly(),
        }
    }
}

/// The assembly a module belongs to
pub(crate) fn module_assembly(module: &Module) -> Option<&dyn AssemblyName> {
    module
        .assembly
        .as_deref()
        .map(|assembly| assembly as &dyn AssemblyName)
}

/// The assembly owning a definition
pub(crate) fn definition_assembly(def: &TypeDef) -> Option<&dyn AssemblyName> {
    def.module.as_deref().and_then(module_assembly)
}

pub(crate) fn named(assembly: &AssemblyRefRc) -> Option<&dyn AssemblyName> {
    let assembly: &AssemblyRef = assembly;
    Some(assembly)
}

fn same_assembly(a: &dyn AssemblyName, b: &dyn AssemblyName) -> bool {
    ptr::eq(
        (a as *const dyn AssemblyName).cast::<()>(),
        (b as *const dyn AssemblyName).cast::<()>(),
    )
}

fn cultures_equal(a: Option<&str>, b: Option<&str>) -> bool {
    let canonical = |culture: Option<&str>| -> String {
        if is_neutral_culture(culture) {
            String::new()
        } else {
            culture.unwrap_or_default().to_string()
        }
    };
    names_equal(true, &canonical(a), &canonical(b))
}

/// True if both scopes are the same row, or both are absent
fn same_resolution_scope(a: &ResolutionScope, b: &ResolutionScope) -> bool {
    match (a, b) {
        (ResolutionScope::Module(a), ResolutionScope::Module(b)) => Arc::ptr_eq(a, b),
        (ResolutionScope::ModuleRef(a), ResolutionScope::ModuleRef(b)) => {
            Arc::ptr_eq(a, b)
        }
        (ResolutionScope::AssemblyRef(a), ResolutionScope::AssemblyRef(b)) => {
            Arc::ptr_eq(a, b)
        }
        (ResolutionScope::TypeRef(a), ResolutionScope::TypeRef(b)) => Arc::ptr_eq(a, b),
        (ResolutionScope::None, ResolutionScope::None) => true,
        _ => false,
    }
}

fn same_implementation(a: &Implementation, b: &Implementation) -> bool {
    match (a, b) {
        (Implementation::File(a), Implementation::File(b)) => Arc::ptr_eq(a, b),
        (Implementation::AssemblyRef(a), Implementation::AssemblyRef(b)) => {
            Arc::ptr_eq(a, b)
        }
        (Implementation::ExportedType(a), Implementation::ExportedType(b)) => {
            Arc::ptr_eq(a, b)
        }
        (Implementation::None, Implementation::None) => true,
        _ => false,
    }
}

fn same_scope_and_implementation(a: &ResolutionScope, b: &Implementation) -> bool {
    match (a, b) {
        (ResolutionScope::AssemblyRef(a), Implementation::AssemblyRef(b)) => {
            Arc::ptr_eq(a, b)
        }
        (ResolutionScope::None, Implementation::None) => true,
        _ => false,
    }
}

impl Session<'_> {
    pub(crate) fn core_library_is_special(&self) -> bool {
        !self.cmp.options.mscorlib_is_not_special()
    }

    /// Module names, with the core library special case
    pub(crate) fn module_scope_eq(
        &mut self,
        a: Option<ModuleScope<'_>>,
        b: Option<ModuleScope<'_>>,
    ) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                a.same(b)
                    || (self.core_library_is_special()
                        && a.is_core_library()
                        && b.is_core_library())
                    || names_equal(true, a.name(), b.name())
            }
            _ => false,
        }
    }

    /// Module names and the assemblies owning the modules
    pub(crate) fn module_eq(&mut self, a: Option<&Module>, b: Option<&Module>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                if ptr::eq(a, b)
                    || (self.core_library_is_special() && a.is_core_library() && b.is_core_library())
                {
                    return true;
                }
                self.guarded(|s| {
                    s.module_scope_eq(Some(ModuleScope::Module(a)), Some(ModuleScope::Module(b)))
                        && s.assembly_eq(module_assembly(a), module_assembly(b))
                })
            }
            _ => false,
        }
    }

    /// A module against a file of a multi-file assembly, by name
    pub(crate) fn module_file_eq(&self, a: Option<ModuleScope<'_>>, b: &File) -> bool {
        a.is_some_and(|module| names_equal(true, module.name(), &b.name))
    }

    pub(crate) fn file_eq(&self, a: &File, b: &File) -> bool {
        ptr::eq(a, b) || names_equal(true, &a.name, &b.name)
    }

    /// Assembly identities: names always, public key tokens, versions and cultures as
    /// the options ask for
    pub(crate) fn assembly_eq(
        &mut self,
        a: Option<&dyn AssemblyName>,
        b: Option<&dyn AssemblyName>,
    ) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => {
                if same_assembly(a, b)
                    || (self.core_library_is_special() && a.is_core_library() && b.is_core_library())
                {
                    return true;
                }
                self.guarded(|s| {
                    let options = s.cmp.options;
                    names_equal(true, a.name(), b.name())
                        && (!options.compare_assembly_public_key_token()
                            || a.public_key_token() == b.public_key_token())
                        && (!options.compare_assembly_version() || a.version() == b.version())
                        && (!options.compare_assembly_locale()
                            || cultures_equal(a.culture(), b.culture()))
                })
            }
            _ => false,
        }
    }

    pub(crate) fn resolve_type_ref(&self, reference: &TypeRef) -> Option<TypeDefRc> {
        let resolver = self.cmp.resolver?;
        let context = self.cmp.source_module.or(reference.module.as_ref());
        let resolved = resolver.resolve_type_ref(reference, context);
        trace!(
            "Resolved {} for scope comparison: {}",
            reference.full_name(),
            resolved.is_some()
        );
        resolved
    }

    pub(crate) fn resolve_exported_type(&self, exported: &ExportedType) -> Option<TypeDefRc> {
        let resolver = self.cmp.resolver?;
        let context = self.context_module(exported.module.as_ref());
        let resolved = resolver.resolve_exported_type(exported, context);
        trace!(
            "Resolved exported {} for scope comparison: {}",
            exported.full_name(),
            resolved.is_some()
        );
        resolved
    }

    fn resolve_forward(&self, forward: Forward<'_>) -> Option<TypeDefRc> {
        match forward {
            Forward::TypeRef(reference) => self.resolve_type_ref(reference),
            Forward::ExportedType(exported) => self.resolve_exported_type(exported),
        }
    }

    /// Asks the type equivalence oracle, unless disabled
    pub(crate) fn equivalent(&self, a: &TypeDef, b: &TypeDef) -> bool {
        if self.cmp.options.dont_check_type_equivalence() {
            return false;
        }
        let equivalent = self
            .cmp
            .type_equivalence
            .is_some_and(|oracle| oracle.equivalent(a, b));
        if equivalent {
            trace!("{} and {} are equivalent types", a.full_name(), b.full_name());
        }
        equivalent
    }

    /// Two definitions live in the same module, or are equivalent
    pub(crate) fn type_def_scope_eq(&mut self, a: Option<&TypeDef>, b: Option<&TypeDef>) -> bool {
        let (Some(a), Some(b)) = (a, b) else {
            return false;
        };
        self.equivalent(a, b) || self.module_eq(a.module.as_deref(), b.module.as_deref())
    }

    /// `a` and `b` are the same assembly, or `b` resolves into `a`
    pub(crate) fn assembly_eq_resolving(
        &mut self,
        a: Option<&dyn AssemblyName>,
        b: Option<&dyn AssemblyName>,
        b_forward: Forward<'_>,
    ) -> bool {
        if self.assembly_eq(a, b) {
            return true;
        }
        match self.resolve_forward(b_forward) {
            Some(def) => self.assembly_eq(a, definition_assembly(&def)),
            None => false,
        }
    }

    /// `a` and `b` are the same assembly, or the two references resolve into the same one
    pub(crate) fn assembly_eq_resolving_both(
        &mut self,
        a: Option<&dyn AssemblyName>,
        a_forward: Forward<'_>,
        b: Option<&dyn AssemblyName>,
        b_forward: Forward<'_>,
    ) -> bool {
        if self.assembly_eq(a, b) {
            return true;
        }
        match (self.resolve_forward(a_forward), self.resolve_forward(b_forward)) {
            (Some(a_def), Some(b_def)) => {
                self.assembly_eq(definition_assembly(&a_def), definition_assembly(&b_def))
            }
            _ => false,
        }
    }

    /// Module owner of two references, or the owners of what they resolve to
    fn module_scopes_eq_resolving(
        &mut self,
        a: Forward<'_>,
        a_module: ModuleScope<'_>,
        b: Forward<'_>,
        b_scope: ModuleOrFile<'_>,
    ) -> bool {
        let owners_equal = match b_scope {
            ModuleOrFile::Module(b_module) => self.module_scope_eq(Some(a_module), Some(b_module)),
            ModuleOrFile::File(file) => self.module_file_eq(Some(a_module), file),
        };
        if owners_equal && self.assembly_eq(a.definition_assembly(), b.definition_assembly()) {
            return true;
        }
        match (self.resolve_forward(a), self.resolve_forward(b)) {
            (Some(a_def), Some(b_def)) => {
                self.module_eq(a_def.module.as_deref(), b_def.module.as_deref())
                    && self.assembly_eq(definition_assembly(&a_def), definition_assembly(&b_def))
            }
            _ => false,
        }
    }

    /// Retries a failed scope comparison on the resolved definitions
    fn resolved_scope_fallback(&mut self, a: Forward<'_>, b: Forward<'_>) -> bool {
        if self.cmp.options.dont_check_type_equivalence() {
            return false;
        }
        match (self.resolve_forward(a), self.resolve_forward(b)) {
            (Some(a_def), Some(b_def)) => self.type_def_scope_eq(Some(&a_def), Some(&b_def)),
            _ => false,
        }
    }

    /// A definition against the module a type reference points into
    pub(crate) fn type_def_in_module_scope(
        &mut self,
        a: &TypeDef,
        b_module: ModuleScope<'_>,
        b: &TypeRef,
    ) -> bool {
        let a_module = a.module.as_deref().map(ModuleScope::Module);
        if self.module_scope_eq(a_module, Some(b_module))
            && self.assembly_eq(definition_assembly(a), b.definition_assembly())
        {
            return true;
        }

        let Some(resolved) = self.resolve_type_ref(b) else {
            return false;
        };
        if self.equivalent(a, &resolved) {
            return true;
        }
        self.module_eq(a.module.as_deref(), resolved.module.as_deref())
            && self.assembly_eq(definition_assembly(a), definition_assembly(&resolved))
    }

    /// A definition against the file an exported type forwards to
    pub(crate) fn type_def_in_file_scope(
        &mut self,
        a: &TypeDef,
        b_file: &File,
        b: &ExportedType,
    ) -> bool {
        let a_module = a.module.as_deref().map(ModuleScope::Module);
        if self.module_file_eq(a_module, b_file)
            && self.assembly_eq(definition_assembly(a), b.definition_assembly())
        {
            return true;
        }

        match self.resolve_exported_type(b) {
            Some(resolved) => {
                self.module_eq(a.module.as_deref(), resolved.module.as_deref())
                    && self.assembly_eq(definition_assembly(a), definition_assembly(&resolved))
            }
            None => false,
        }
    }

    /// The scopes of two type references
    pub(crate) fn resolution_scope_eq(&mut self, a: &TypeRef, b: &TypeRef) -> bool {
        if ptr::eq(a, b) {
            return true;
        }
        let (ra, rb) = (&a.resolution_scope, &b.resolution_scope);
        if same_resolution_scope(ra, rb) {
            return true;
        }
        if matches!(ra, ResolutionScope::None) || matches!(rb, ResolutionScope::None) {
            return false;
        }

        self.guarded(|s| {
            let (result, resolve_check) = if let (
                ResolutionScope::TypeRef(enclosing_a),
                ResolutionScope::TypeRef(enclosing_b),
            ) = (ra, rb)
            {
                (s.type_ref_eq(enclosing_a, enclosing_b), false)
            } else if matches!(ra, ResolutionScope::TypeRef(_))
                || matches!(rb, ResolutionScope::TypeRef(_))
            {
                (false, false)
            } else if s.cmp.options.dont_compare_type_scope() {
                (true, true)
            } else if let (Some(module_a), Some(module_b)) = (ModuleScope::of(ra), ModuleScope::of(rb))
            {
                let equal = s.module_scopes_eq_resolving(
                    Forward::TypeRef(a),
                    module_a,
                    Forward::TypeRef(b),
                    ModuleOrFile::Module(module_b),
                );
                (equal, true)
            } else {
                (s.assembly_scopes_eq(a, b), true)
            };

            if !result && resolve_check {
                return s.resolved_scope_fallback(Forward::TypeRef(a), Forward::TypeRef(b));
            }
            result
        })
    }

    /// The assembly reference cases of [`Session::resolution_scope_eq`]. Scope
    /// combinations without an assembly reference on either side are unequal.
    fn assembly_scopes_eq(&mut self, a: &TypeRef, b: &TypeRef) -> bool {
        let (ra, rb) = (&a.resolution_scope, &b.resolution_scope);
        match (ra, rb) {
            (ResolutionScope::AssemblyRef(asm_a), ResolutionScope::AssemblyRef(asm_b)) => self
                .assembly_eq_resolving_both(
                    named(asm_a),
                    Forward::TypeRef(a),
                    named(asm_b),
                    Forward::TypeRef(b),
                ),
            (ResolutionScope::AssemblyRef(asm_a), ResolutionScope::ModuleRef(_)) => {
                b.module.as_deref().is_some_and(|module| {
                    self.assembly_eq_resolving_both(
                        module_assembly(module),
                        Forward::TypeRef(b),
                        named(asm_a),
                        Forward::TypeRef(a),
                    )
                })
            }
            (ResolutionScope::ModuleRef(_), ResolutionScope::AssemblyRef(asm_b)) => {
                a.module.as_deref().is_some_and(|module| {
                    self.assembly_eq_resolving_both(
                        module_assembly(module),
                        Forward::TypeRef(a),
                        named(asm_b),
                        Forward::TypeRef(b),
                    )
                })
            }
            (ResolutionScope::AssemblyRef(asm_a), ResolutionScope::Module(module_b)) => self
                .assembly_eq_resolving(
                    module_assembly(module_b),
                    named(asm_a),
                    Forward::TypeRef(a),
                ),
            (ResolutionScope::Module(module_a), ResolutionScope::AssemblyRef(asm_b)) => self
                .assembly_eq_resolving(
                    module_assembly(module_a),
                    named(asm_b),
                    Forward::TypeRef(b),
                ),
            _ => false,
        }
    }

    /// The implementations of two exported types
    pub(crate) fn implementation_eq(&mut self, a: &ExportedType, b: &ExportedType) -> bool {
        if ptr::eq(a, b) {
            return true;
        }
        let (ia, ib) = (&a.implementation, &b.implementation);
        if same_implementation(ia, ib) {
            return true;
        }
        if matches!(ia, Implementation::None) || matches!(ib, Implementation::None) {
            return false;
        }

        self.guarded(|s| {
            let (result, resolve_check) = match (ia, ib) {
                (Implementation::ExportedType(enclosing_a), Implementation::ExportedType(enclosing_b)) => {
                    (s.exported_type_eq(enclosing_a, enclosing_b), false)
                }
                (Implementation::ExportedType(_), _) | (_, Implementation::ExportedType(_)) => {
                    (false, false)
                }
                _ if s.cmp.options.dont_compare_type_scope() => (true, true),
                (Implementation::File(file_a), Implementation::File(file_b)) => {
                    (s.file_eq(file_a, file_b), true)
                }
                (Implementation::AssemblyRef(asm_a), Implementation::AssemblyRef(asm_b)) => {
                    let equal = s.assembly_eq_resolving_both(
                        named(asm_a),
                        Forward::ExportedType(a),
                        named(asm_b),
                        Forward::ExportedType(b),
                    );
                    (equal, true)
                }
                (Implementation::File(_), Implementation::AssemblyRef(asm_b)) => {
                    let equal = s.assembly_eq_resolving(
                        a.definition_assembly(),
                        named(asm_b),
                        Forward::ExportedType(b),
                    );
                    (equal, true)
                }
                (Implementation::AssemblyRef(asm_a), Implementation::File(_)) => {
                    let equal = s.assembly_eq_resolving(
                        b.definition_assembly(),
                        named(asm_a),
                        Forward::ExportedType(a),
                    );
                    (equal, true)
                }
                _ => (false, false),
            };

            if !result && resolve_check {
                return s.resolved_scope_fallback(Forward::ExportedType(a), Forward::ExportedType(b));
            }
            result
        })
    }

    /// The scope of a type reference against the implementation of an exported type
    pub(crate) fn scope_implementation_eq(&mut self, a: &TypeRef, b: &ExportedType) -> bool {
        let (ra, ib) = (&a.resolution_scope, &b.implementation);
        if same_scope_and_implementation(ra, ib) {
            return true;
        }
        if matches!(ra, ResolutionScope::None) || matches!(ib, Implementation::None) {
            return false;
        }

        self.guarded(|s| {
            let module_a = ModuleScope::of(ra);
            let (result, resolve_check) = match (ra, ib) {
                (ResolutionScope::TypeRef(enclosing_a), Implementation::ExportedType(enclosing_b)) => {
                    (s.type_ref_exported_eq(enclosing_a, enclosing_b), false)
                }
                (ResolutionScope::TypeRef(_), _) | (_, Implementation::ExportedType(_)) => {
                    (false, false)
                }
                _ if s.cmp.options.dont_compare_type_scope() => (true, true),
                (ResolutionScope::Module(_) | ResolutionScope::ModuleRef(_), Implementation::File(file)) => {
                    let equal = module_a.is_some_and(|module_a| {
                        s.module_scopes_eq_resolving(
                            Forward::TypeRef(a),
                            module_a,
                            Forward::ExportedType(b),
                            ModuleOrFile::File(file),
                        )
                    });
                    (equal, true)
                }
                (ResolutionScope::AssemblyRef(asm_a), Implementation::AssemblyRef(asm_b)) => {
                    let equal = s.assembly_eq_resolving_both(
                        named(asm_a),
                        Forward::TypeRef(a),
                        named(asm_b),
                        Forward::ExportedType(b),
                    );
                    (equal, true)
                }
                (ResolutionScope::Module(_) | ResolutionScope::ModuleRef(_), Implementation::AssemblyRef(asm_b)) => {
                    let equal = s.assembly_eq_resolving(
                        a.definition_assembly(),
                        named(asm_b),
                        Forward::ExportedType(b),
                    );
                    (equal, true)
                }
                (ResolutionScope::AssemblyRef(asm_a), Implementation::File(_)) => {
                    let equal = s.assembly_eq_resolving(
                        b.definition_assembly(),
                        named(asm_a),
                        Forward::TypeRef(a),
                    );
                    (equal, true)
                }
                _ => (false, false),
            };

            if !result && resolve_check {
                return s.resolved_scope_fallback(Forward::TypeRef(a), Forward::ExportedType(b));
            }
            result
        })
    }
}

/// The right-hand owner of [`Session::module_scopes_eq_resolving`]
#[derive(Clone, Copy)]
enum ModuleOrFile<'e> {
    Module(ModuleScope<'e>),
    File(&'e File),
}
