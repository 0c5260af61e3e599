//! Preconfigured comparers for use as map and set key comparers.
//!
//! Each facade binds one fixed [`SigComparerOptions`] set and forwards to a fresh
//! [`SigComparer`] call. The named constants mirror the option sets commonly used by
//! metadata tooling:
//!
//! - `COMPARE_DECLARING_TYPES` / `DONT_COMPARE_DECLARING_TYPES` - whether members of
//!   different types with the same name and signature are distinct
//! - `CASE_INSENSITIVE_*` - the same with case insensitive names
//! - `COMPARE_REFERENCE_IN_SAME_MODULE` - definitions of one module compare by identity
//!
//! [`Keyed`] wraps a value together with a comparer so it can be stored in the standard
//! hash collections.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::HashSet;
//! use std::sync::Arc;
//! use cilcompare::comparer::facades::TypeEqualityComparer;
//! use cilcompare::metadata::tables::{AssemblyRef, TypeRef};
//! use cilcompare::metadata::typesystem::{ResolutionScope, TypeEntity};
//!
//! let lib = Arc::new(AssemblyRef::new(1, "Lib"));
//! let upper = Arc::new(TypeRef::new(1, "N", "Foo", ResolutionScope::AssemblyRef(lib.clone())));
//! let lower = Arc::new(TypeRef::new(2, "n", "foo", ResolutionScope::AssemblyRef(lib)));
//!
//! let facade = TypeEqualityComparer::CASE_INSENSITIVE;
//! let mut set = HashSet::new();
//! set.insert(facade.key(TypeEntity::TypeRef(upper)));
//! assert!(!set.insert(facade.key(TypeEntity::TypeRef(lower))));
//! ```

use std::hash::{Hash, Hasher};

use crate::{
    comparer::{Comparable, RuntimeComparable, SigComparer, SigComparerOptions, TypeLike},
    metadata::{
        members::{FieldEntity, MethodEntity},
        signatures::CallingConventionSignature,
        tables::{Event, Property},
    },
    runtime::{RuntimeEvent, RuntimeField, RuntimeMethod, RuntimeProperty, RuntimeType},
};

/// A value paired with the comparer that defines its equality and hash.
///
/// All keys stored in one collection must carry the same comparer. A comparison that
/// exceeds [`crate::comparer::MAX_RECURSION_DEPTH`] reports the keys as unequal, even for
/// a key compared with itself.
#[derive(Debug, Clone)]
pub struct Keyed<'a, T> {
    comparer: SigComparer<'a>,
    value: T,
}

impl<'a, T> Keyed<'a, T> {
    /// Pairs `value` with `comparer`
    pub fn new(comparer: SigComparer<'a>, value: T) -> Self {
        Keyed { comparer, value }
    }

    /// The wrapped value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Unwraps the value
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T: Comparable> PartialEq for Keyed<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.comparer.equals(&self.value, &other.value)
    }
}

impl<T: Comparable> Eq for Keyed<'_, T> {}

impl<T: Comparable> Hash for Keyed<'_, T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.comparer.hash(&self.value));
    }
}

/// Compares types in any of their representations
#[derive(Debug, Clone, Copy)]
pub struct TypeEqualityComparer {
    comparer: SigComparer<'static>,
}

impl TypeEqualityComparer {
    /// Default options
    pub const INSTANCE: Self = Self::new(SigComparerOptions::empty());

    /// Case insensitive names
    pub const CASE_INSENSITIVE: Self = Self::new(SigComparerOptions::CASE_INSENSITIVE_ALL);

    /// Definitions of one module compare by identity
    pub const COMPARE_REFERENCE_IN_SAME_MODULE: Self =
        Self::new(SigComparerOptions::REFERENCE_COMPARE_FOR_MEMBER_DEFS_IN_SAME_MODULE);

    /// A facade for `options`
    #[must_use]
    pub const fn new(options: SigComparerOptions) -> Self {
        TypeEqualityComparer {
            comparer: SigComparer::new(options),
        }
    }

    /// The comparer this facade forwards to
    #[must_use]
    pub fn comparer(&self) -> SigComparer<'static> {
        self.comparer
    }

    /// True if `a` and `b` denote the same type
    pub fn equals<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: Comparable<B> + TypeLike + ?Sized,
        B: TypeLike + ?Sized,
    {
        self.comparer.equals(a, b)
    }

    /// The hash code of `a`
    pub fn hash<A>(&self, a: &A) -> i32
    where
        A: Comparable + TypeLike + ?Sized,
    {
        self.comparer.hash(a)
    }

    /// True if `a` denotes the runtime type `b`
    pub fn equals_runtime<A>(&self, a: &A, b: &RuntimeType) -> bool
    where
        A: RuntimeComparable<RuntimeType> + TypeLike + ?Sized,
    {
        self.comparer.equals_runtime(a, b)
    }

    /// The hash code of the runtime type `b`
    pub fn runtime_hash(&self, b: &RuntimeType) -> i32 {
        self.comparer.runtime_hash(b)
    }

    /// Wraps `value` as a hash collection key
    pub fn key<T: Comparable + TypeLike>(&self, value: T) -> Keyed<'static, T> {
        Keyed::new(self.comparer, value)
    }
}

macro_rules! member_facade {
    ($(#[$meta:meta])* $name:ident, $entity:ty, $runtime:ty, $declaring:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy)]
        pub struct $name {
            comparer: SigComparer<'static>,
        }

        impl $name {
            /// Compares the declaring types
            pub const COMPARE_DECLARING_TYPES: Self = Self::new(SigComparerOptions::$declaring);

            /// Doesn't compare the declaring types
            pub const DONT_COMPARE_DECLARING_TYPES: Self = Self::new(SigComparerOptions::empty());

            /// Compares the declaring types, case insensitive names
            pub const CASE_INSENSITIVE_COMPARE_DECLARING_TYPES: Self = Self::new(
                SigComparerOptions::$declaring.union(SigComparerOptions::CASE_INSENSITIVE_ALL),
            );

            /// Doesn't compare the declaring types, case insensitive names
            pub const CASE_INSENSITIVE_DONT_COMPARE_DECLARING_TYPES: Self =
                Self::new(SigComparerOptions::CASE_INSENSITIVE_ALL);

            /// Definitions of one module compare by identity
            pub const COMPARE_REFERENCE_IN_SAME_MODULE: Self =
                Self::new(SigComparerOptions::REFERENCE_COMPARE_FOR_MEMBER_DEFS_IN_SAME_MODULE);

            /// A facade for `options`
            #[must_use]
            pub const fn new(options: SigComparerOptions) -> Self {
                $name {
                    comparer: SigComparer::new(options),
                }
            }

            /// The comparer this facade forwards to
            #[must_use]
            pub fn comparer(&self) -> SigComparer<'static> {
                self.comparer
            }

            /// True if `a` and `b` denote the same member
            pub fn equals(&self, a: &$entity, b: &$entity) -> bool {
                self.comparer.equals(a, b)
            }

            /// The hash code of `a`
            pub fn hash(&self, a: &$entity) -> i32 {
                self.comparer.hash(a)
            }

            /// True if `a` denotes the runtime member `b`
            pub fn equals_runtime(&self, a: &$entity, b: &$runtime) -> bool {
                self.comparer.equals_runtime(a, b)
            }

            /// The hash code of the runtime member `b`
            pub fn runtime_hash(&self, b: &$runtime) -> i32 {
                self.comparer.runtime_hash(b)
            }

            /// Wraps `value` as a hash collection key
            pub fn key(&self, value: $entity) -> Keyed<'static, $entity> {
                Keyed::new(self.comparer, value)
            }
        }
    };
}

member_facade!(
    /// Compares fields and field references
    FieldEqualityComparer,
    FieldEntity,
    RuntimeField,
    COMPARE_METHOD_FIELD_DECLARING_TYPE
);

member_facade!(
    /// Compares methods, method references and method instantiations
    MethodEqualityComparer,
    MethodEntity,
    RuntimeMethod,
    COMPARE_METHOD_FIELD_DECLARING_TYPE
);

member_facade!(
    /// Compares properties
    PropertyEqualityComparer,
    Property,
    RuntimeProperty,
    COMPARE_PROPERTY_DECLARING_TYPE
);

member_facade!(
    /// Compares events
    EventEqualityComparer,
    Event,
    RuntimeEvent,
    COMPARE_EVENT_DECLARING_TYPE
);

/// Compares calling convention signatures
#[derive(Debug, Clone, Copy)]
pub struct SignatureEqualityComparer {
    comparer: SigComparer<'static>,
}

impl SignatureEqualityComparer {
    /// Default options
    pub const INSTANCE: Self = Self::new(SigComparerOptions::empty());

    /// Case insensitive names
    pub const CASE_INSENSITIVE: Self = Self::new(SigComparerOptions::CASE_INSENSITIVE_ALL);

    /// A facade for `options`
    #[must_use]
    pub const fn new(options: SigComparerOptions) -> Self {
        SignatureEqualityComparer {
            comparer: SigComparer::new(options),
        }
    }

    /// The comparer this facade forwards to
    #[must_use]
    pub fn comparer(&self) -> SigComparer<'static> {
        self.comparer
    }

    /// True if `a` and `b` are the same signature
    pub fn equals(&self, a: &CallingConventionSignature, b: &CallingConventionSignature) -> bool {
        self.comparer.equals(a, b)
    }

    /// The hash code of `a`
    pub fn hash(&self, a: &CallingConventionSignature) -> i32 {
        self.comparer.hash(a)
    }

    /// Wraps `value` as a hash collection key
    pub fn key(
        &self,
        value: CallingConventionSignature,
    ) -> Keyed<'static, CallingConventionSignature> {
        Keyed::new(self.comparer, value)
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use super::*;
    use crate::{
        metadata::{
            members::FieldEntity,
            signatures::{SignatureMethod, TypeSignature},
            tables::Property,
            typesystem::TypeEntity,
        },
        test::*,
    };

    #[test]
    fn test_declaring_type_presets() {
        let module = create_module("Lib.dll", "Lib");
        let first = create_type_def(2, "N", "First", &module);
        let second = create_type_def(3, "N", "Second", &module);

        let a = FieldEntity::from(create_field(1, "value", TypeSignature::I4, &first));
        let b = FieldEntity::from(create_field(2, "value", TypeSignature::I4, &second));

        assert!(FieldEqualityComparer::DONT_COMPARE_DECLARING_TYPES.equals(&a, &b));
        assert!(!FieldEqualityComparer::COMPARE_DECLARING_TYPES.equals(&a, &b));

        let facade = FieldEqualityComparer::DONT_COMPARE_DECLARING_TYPES;
        assert_eq!(facade.hash(&a), facade.hash(&b));
    }

    #[test]
    fn test_case_insensitive_presets() {
        let module = create_module("Lib.dll", "Lib");
        let owner = create_type_def(2, "N", "Owner", &module);
        let getter = SignatureMethod::new_instance(TypeSignature::String, vec![]);

        let a = Property::new(1, "Name", Some(getter.clone()), Some(owner.clone()));
        let b = Property::new(2, "NAME", Some(getter), Some(owner));

        assert!(!PropertyEqualityComparer::COMPARE_DECLARING_TYPES.equals(&a, &b));
        let facade = PropertyEqualityComparer::CASE_INSENSITIVE_COMPARE_DECLARING_TYPES;
        assert!(facade.equals(&a, &b));
        assert_eq!(facade.hash(&a), facade.hash(&b));
    }

    #[test]
    fn test_preset_options() {
        assert_eq!(
            MethodEqualityComparer::CASE_INSENSITIVE_COMPARE_DECLARING_TYPES
                .comparer()
                .options(),
            SigComparerOptions::COMPARE_METHOD_FIELD_DECLARING_TYPE
                | SigComparerOptions::CASE_INSENSITIVE_ALL
        );
        assert_eq!(
            EventEqualityComparer::COMPARE_DECLARING_TYPES.comparer().options(),
            SigComparerOptions::COMPARE_EVENT_DECLARING_TYPE
        );
        assert_eq!(
            TypeEqualityComparer::COMPARE_REFERENCE_IN_SAME_MODULE
                .comparer()
                .options(),
            SigComparerOptions::REFERENCE_COMPARE_FOR_MEMBER_DEFS_IN_SAME_MODULE
        );
        assert!(SignatureEqualityComparer::INSTANCE.comparer().options().is_empty());
    }

    #[test]
    fn test_reference_compare_in_same_module() {
        let module = create_module("Lib.dll", "Lib");
        let a = TypeEntity::TypeDef(create_type_def(2, "N", "Twin", &module));
        let b = TypeEntity::TypeDef(create_type_def(3, "N", "Twin", &module));

        assert!(TypeEqualityComparer::INSTANCE.equals(&a, &b));
        assert!(!TypeEqualityComparer::COMPARE_REFERENCE_IN_SAME_MODULE.equals(&a, &b));
        assert!(TypeEqualityComparer::COMPARE_REFERENCE_IN_SAME_MODULE.equals(&a, &a));
    }

    #[test]
    fn test_keyed_map() {
        let lib = create_assembly_ref(1, "Lib");
        let def_module = create_module("Lib.dll", "Lib");
        let def = create_type_def(2, "N", "Foo", &def_module);
        let reference = create_type_ref(5, "N", "Foo", &lib);

        let facade = TypeEqualityComparer::INSTANCE;
        let mut map = HashMap::new();
        map.insert(facade.key(TypeEntity::TypeDef(def)), 1);
        map.insert(facade.key(TypeEntity::TypeSignature(class_sig(reference))), 2);

        assert_eq!(map.len(), 1);
        assert_eq!(map.values().copied().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_signature_facade() {
        let a = CallingConventionSignature::from(SignatureMethod::new_static(
            TypeSignature::Void,
            vec![TypeSignature::I4, TypeSignature::String],
        ));
        let b = CallingConventionSignature::from(SignatureMethod::new_static(
            TypeSignature::Void,
            vec![TypeSignature::String, TypeSignature::I4],
        ));

        let facade = SignatureEqualityComparer::INSTANCE;
        assert!(facade.equals(&a, &a.clone()));
        assert!(!facade.equals(&a, &b));
        assert_ne!(facade.hash(&a), facade.hash(&b));
        assert!(Arc::new(facade.key(a.clone())) == Arc::new(facade.key(a)));
    }
}
