//! The transient state of one top-level comparison or hash call.

use crate::{
    comparer::{
        generics::GenericArguments,
        hash::{name_hash, names_equal, system_intptr_hash},
        recursion::RecursionGuard,
        SigComparer,
    },
    metadata::{signatures::TypeSignature, tables::ModuleRc},
};

/// Recursion guard and generic substitution frames of one call, together with the
/// comparer configuration currently in effect.
///
/// Routines that need different options for a sub-comparison swap [`Session::cmp`]
/// for the duration of that sub-comparison through [`Session::with_comparer`].
pub struct Session<'a> {
    pub(crate) cmp: SigComparer<'a>,
    guard: RecursionGuard,
    pub(crate) generics: GenericArguments,
}

impl<'a> Session<'a> {
    pub(crate) fn new(cmp: SigComparer<'a>) -> Self {
        Session {
            cmp,
            guard: RecursionGuard::default(),
            generics: GenericArguments::default(),
        }
    }

    /// Runs `f` one recursion level deeper. Yields `T::default()` (unequal, hash 0)
    /// without running `f` once the bound is reached.
    pub(crate) fn guarded<T: Default>(&mut self, f: impl FnOnce(&mut Self) -> T) -> T {
        if !self.guard.enter() {
            return T::default();
        }
        let result = f(self);
        self.guard.exit();
        result
    }

    /// True once any routine of this call hit the recursion bound
    pub(crate) fn exceeded(&self) -> bool {
        self.guard.exceeded()
    }

    /// Runs `f` with `cmp` in effect, restoring the previous comparer afterwards
    pub(crate) fn with_comparer<T>(
        &mut self,
        cmp: SigComparer<'a>,
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        let saved = std::mem::replace(&mut self.cmp, cmp);
        let result = f(self);
        self.cmp = saved;
        result
    }

    /// Runs `f` with `arguments` substituted for the type generic parameters
    pub(crate) fn with_type_args<T>(
        &mut self,
        arguments: &[TypeSignature],
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.generics.push_type_args(arguments);
        let result = f(self);
        self.generics.pop_type_args();
        result
    }

    /// Runs `f` with `arguments` substituted for the method generic parameters
    pub(crate) fn with_method_args<T>(
        &mut self,
        arguments: &[TypeSignature],
        f: impl FnOnce(&mut Self) -> T,
    ) -> T {
        self.generics.push_method_args(arguments);
        let result = f(self);
        self.generics.pop_method_args();
        result
    }

    /// The module `own` if present, the home module of the comparer otherwise
    pub(crate) fn context_module<'m>(&self, own: Option<&'m ModuleRc>) -> Option<&'m ModuleRc>
    where
        'a: 'm,
    {
        own.or(self.cmp.source_module)
    }

    pub(crate) fn type_names_eq(&self, a: &str, b: &str) -> bool {
        names_equal(self.cmp.options.case_insensitive_type_names(), a, b)
    }

    pub(crate) fn type_namespaces_eq(&self, a: &str, b: &str) -> bool {
        names_equal(self.cmp.options.case_insensitive_type_namespaces(), a, b)
    }

    pub(crate) fn method_field_names_eq(&self, a: &str, b: &str) -> bool {
        names_equal(self.cmp.options.case_insensitive_method_field_names(), a, b)
    }

    pub(crate) fn property_names_eq(&self, a: &str, b: &str) -> bool {
        names_equal(self.cmp.options.case_insensitive_property_names(), a, b)
    }

    pub(crate) fn event_names_eq(&self, a: &str, b: &str) -> bool {
        names_equal(self.cmp.options.case_insensitive_event_names(), a, b)
    }

    pub(crate) fn type_name_hash(&self, name: &str) -> i32 {
        name_hash(self.cmp.options.case_insensitive_type_names(), name)
    }

    pub(crate) fn type_namespace_hash(&self, namespace: &str) -> i32 {
        name_hash(self.cmp.options.case_insensitive_type_namespaces(), namespace)
    }

    pub(crate) fn method_field_name_hash(&self, name: &str) -> i32 {
        name_hash(self.cmp.options.case_insensitive_method_field_names(), name)
    }

    pub(crate) fn property_name_hash(&self, name: &str) -> i32 {
        name_hash(self.cmp.options.case_insensitive_property_names(), name)
    }

    pub(crate) fn event_name_hash(&self, name: &str) -> i32 {
        name_hash(self.cmp.options.case_insensitive_event_names(), name)
    }

    /// The hash of `System.IntPtr`, shared by function pointers
    pub(crate) fn intptr_hash(&self) -> i32 {
        system_intptr_hash(
            self.cmp.options.case_insensitive_type_namespaces(),
            self.cmp.options.case_insensitive_type_names(),
        )
    }
}
