//! Structural equality and hashing of metadata entities.
//!
//! [`SigComparer`] decides whether two entities denote the same type or member, whatever
//! representation each of them uses, and produces hash codes consistent with that
//! decision. Its behavior is fixed at construction by a [`SigComparerOptions`] set, an
//! optional home module and optional collaborators:
//!
//! - [`Resolver`] - resolves references to definitions when owner scopes look different
//! - [`TypeEquivalence`] - declares distinct definitions equivalent for interop purposes
//! - [`ForeignProjector`] - maps foreign-ABI references to their native counterparts
//!
//! # Architecture
//!
//! Every top-level call creates a [`Session`] holding a recursion guard and the generic
//! substitution frames. All comparison and hash routines are methods of the session, so
//! a `SigComparer` itself stays an immutable `Copy` value that can be shared freely
//! between threads. Routines that need different options for a sub-comparison run it
//! with a child comparer rather than mutating the shared one.
//!
//! Recursion is bounded by [`MAX_RECURSION_DEPTH`]. A call that hits the bound yields the
//! conservative default (`false`, hash `0`), or [`crate::Error::RecursionLimit`] through
//! [`SigComparer::try_equals`] and [`SigComparer::try_hash`].
//!
//! # Hash consistency
//!
//! If `equals(a, b)` holds then `hash(a) == hash(b)` for every representation, including
//! the runtime reflection view compared through [`SigComparer::equals_runtime`] and hashed
//! through [`SigComparer::runtime_hash`]. All routines draw their magic constants from one
//! table in the `hash` module.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use cilcompare::comparer::{SigComparer, SigComparerOptions};
//! use cilcompare::metadata::tables::{AssemblyRef, TypeRef};
//! use cilcompare::metadata::typesystem::ResolutionScope;
//!
//! let lib = Arc::new(AssemblyRef::new(1, "Lib"));
//! let a = TypeRef::new(1, "N", "Foo", ResolutionScope::AssemblyRef(lib.clone()));
//! let b = TypeRef::new(2, "n", "FOO", ResolutionScope::AssemblyRef(lib));
//!
//! assert!(!SigComparer::new(SigComparerOptions::empty()).equals(&a, &b));
//!
//! let relaxed = SigComparer::new(SigComparerOptions::CASE_INSENSITIVE_TYPES);
//! assert!(relaxed.equals(&a, &b));
//! assert_eq!(relaxed.hash(&a), relaxed.hash(&b));
//! ```

mod context;
pub mod facades;
mod generics;
mod hash;
mod members;
mod options;
mod recursion;
mod runtime;
mod scope;
mod session;
mod signatures;
mod types;

pub use context::{ForeignProjector, Resolver, TypeEquivalence};
pub use options::SigComparerOptions;
pub use session::Session;

use std::sync::Arc;

use crate::{
    metadata::{
        members::{FieldEntity, MemberEntity, MethodDefOrRef, MethodEntity},
        signatures::{
            CallingConventionSignature, SignatureField, SignatureLocalVariables, SignatureMethod,
            SignatureMethodSpec, TypeSignature,
        },
        tables::{
            Event, ExportedType, Field, MemberRef, Method, MethodSpec, ModuleRc, Property,
            TypeDef, TypeRef, TypeSpec,
        },
        typesystem::{TypeDefOrRef, TypeEntity, TypeView},
    },
    runtime::{RuntimeEvent, RuntimeField, RuntimeMethod, RuntimeProperty, RuntimeType},
    Error, Result,
};

/// Maximum nesting depth of the comparison and hash routines within one call.
///
/// Legitimate metadata (nested types, generic instantiations, function pointer
/// signatures) stays far below this depth.
pub const MAX_RECURSION_DEPTH: usize = 100;

/// Compares types, members and signatures across their representations.
///
/// # Examples
///
/// ```rust
/// use cilcompare::comparer::{SigComparer, SigComparerOptions};
/// use cilcompare::metadata::signatures::{SignatureMethod, TypeSignature};
///
/// let comparer = SigComparer::new(SigComparerOptions::empty());
/// let fn_ptr = TypeSignature::fn_ptr(SignatureMethod::new_static(TypeSignature::Void, vec![]));
///
/// // Function pointers hash like `System.IntPtr`
/// assert_eq!(comparer.hash(&fn_ptr), comparer.hash(&TypeSignature::I));
/// assert!(!comparer.equals(&fn_ptr, &TypeSignature::I));
/// ```
#[derive(Clone, Copy)]
pub struct SigComparer<'a> {
    pub(crate) options: SigComparerOptions,
    pub(crate) source_module: Option<&'a ModuleRc>,
    pub(crate) resolver: Option<&'a dyn Resolver>,
    pub(crate) type_equivalence: Option<&'a dyn TypeEquivalence>,
    pub(crate) projector: Option<&'a dyn ForeignProjector>,
    pub(crate) compare_method_params: bool,
    /// Cleared in the child comparer used against runtime generic method instances, whose
    /// generic arguments must not be substituted into the resolved definition
    pub(crate) substitute_generics: bool,
}

impl<'a> SigComparer<'a> {
    /// A comparer without home module or collaborators
    #[must_use]
    pub const fn new(options: SigComparerOptions) -> Self {
        SigComparer {
            options,
            source_module: None,
            resolver: None,
            type_equivalence: None,
            projector: None,
            compare_method_params: true,
            substitute_generics: true,
        }
    }

    /// Sets the module used as lookup context for entities that have no module of their own
    #[must_use]
    pub fn with_source_module(mut self, module: &'a ModuleRc) -> Self {
        self.source_module = Some(module);
        self
    }

    /// Sets the resolver consulted when owner scopes differ
    #[must_use]
    pub fn with_resolver(mut self, resolver: &'a dyn Resolver) -> Self {
        self.resolver = Some(resolver);
        self
    }

    /// Sets the type equivalence oracle
    #[must_use]
    pub fn with_type_equivalence(mut self, oracle: &'a dyn TypeEquivalence) -> Self {
        self.type_equivalence = Some(oracle);
        self
    }

    /// Sets the foreign-ABI projector
    #[must_use]
    pub fn with_projector(mut self, projector: &'a dyn ForeignProjector) -> Self {
        self.projector = Some(projector);
        self
    }

    /// Whether method parameter lists take part in method signature comparisons (default `true`)
    #[must_use]
    pub fn with_compare_method_params(mut self, compare: bool) -> Self {
        self.compare_method_params = compare;
        self
    }

    /// Replaces the option set, keeping home module and collaborators
    #[must_use]
    pub fn with_options(mut self, options: SigComparerOptions) -> Self {
        self.options = options;
        self
    }

    /// The options in effect
    #[must_use]
    pub fn options(&self) -> SigComparerOptions {
        self.options
    }

    /// The same comparer with `options` removed from its option set
    pub(crate) fn without(mut self, options: SigComparerOptions) -> Self {
        self.options.remove(options);
        self
    }

    /// Runs `f` in a fresh session, `None` if the recursion bound was hit
    fn run<T>(&self, f: impl FnOnce(&mut Session<'a>) -> T) -> Option<T> {
        let mut session = Session::new(*self);
        let result = f(&mut session);
        (!session.exceeded()).then_some(result)
    }

    /// True if `a` and `b` denote the same entity.
    ///
    /// Returns `false` if the comparison exceeded [`MAX_RECURSION_DEPTH`].
    pub fn equals<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: Comparable<B> + ?Sized,
        B: ?Sized,
    {
        self.run(|s| a.eq_in(s, b)).unwrap_or(false)
    }

    /// The hash code of `a`, consistent with [`SigComparer::equals`].
    ///
    /// Returns `0` if hashing exceeded [`MAX_RECURSION_DEPTH`].
    pub fn hash<A>(&self, a: &A) -> i32
    where
        A: Comparable + ?Sized,
    {
        self.run(|s| a.hash_in(s)).unwrap_or(0)
    }

    /// Like [`SigComparer::equals`], but reports hitting the recursion bound.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecursionLimit`] if the comparison exceeded [`MAX_RECURSION_DEPTH`].
    pub fn try_equals<A, B>(&self, a: &A, b: &B) -> Result<bool>
    where
        A: Comparable<B> + ?Sized,
        B: ?Sized,
    {
        self.run(|s| a.eq_in(s, b))
            .ok_or(Error::RecursionLimit(MAX_RECURSION_DEPTH))
    }

    /// Like [`SigComparer::hash`], but reports hitting the recursion bound.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecursionLimit`] if hashing exceeded [`MAX_RECURSION_DEPTH`].
    pub fn try_hash<A>(&self, a: &A) -> Result<i32>
    where
        A: Comparable + ?Sized,
    {
        self.run(|s| a.hash_in(s))
            .ok_or(Error::RecursionLimit(MAX_RECURSION_DEPTH))
    }

    /// True if the metadata entity `a` denotes the runtime entity `b`
    pub fn equals_runtime<A, B>(&self, a: &A, b: &B) -> bool
    where
        A: RuntimeComparable<B> + ?Sized,
        B: ?Sized,
    {
        self.run(|s| a.eq_runtime_in(s, b)).unwrap_or(false)
    }

    /// The hash code of a runtime entity, equal to the hash of every metadata entity it
    /// compares equal to
    pub fn runtime_hash<B>(&self, b: &B) -> i32
    where
        B: RuntimeHashable + ?Sized,
    {
        self.run(|s| b.hash_runtime_in(s)).unwrap_or(0)
    }
}

impl Default for SigComparer<'_> {
    fn default() -> Self {
        SigComparer::new(SigComparerOptions::empty())
    }
}

impl std::fmt::Debug for SigComparer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigComparer")
            .field("options", &self.options)
            .field("source_module", &self.source_module.map(|module| &module.name))
            .field("resolver", &self.resolver.is_some())
            .field("type_equivalence", &self.type_equivalence.is_some())
            .field("projector", &self.projector.is_some())
            .field("compare_method_params", &self.compare_method_params)
            .finish()
    }
}

mod sealed {
    pub trait Sealed {}
}

/// Entities [`SigComparer`] can compare against `Rhs` and hash.
///
/// Implemented for every type and member representation, the signature kinds, signature
/// lists and `Arc`s of those. Cross-representation pairs are implemented where both sides
/// can denote the same entity, e.g. `TypeDef` against `TypeRef` or `Method` against
/// `MemberRef`. This trait is sealed.
pub trait Comparable<Rhs: ?Sized = Self>: sealed::Sealed {
    #[doc(hidden)]
    fn eq_in(&self, session: &mut Session<'_>, other: &Rhs) -> bool;

    #[doc(hidden)]
    fn hash_in(&self, session: &mut Session<'_>) -> i32;
}

/// Metadata entities [`SigComparer`] can compare against the runtime entity `R`. This
/// trait is sealed.
pub trait RuntimeComparable<R: ?Sized>: sealed::Sealed {
    #[doc(hidden)]
    fn eq_runtime_in(&self, session: &mut Session<'_>, other: &R) -> bool;
}

/// Runtime entities [`SigComparer`] can hash. This trait is sealed.
pub trait RuntimeHashable: sealed::Sealed {
    #[doc(hidden)]
    fn hash_runtime_in(&self, session: &mut Session<'_>) -> i32;
}

/// Type representations, viewed uniformly. This trait is sealed.
pub trait TypeLike: sealed::Sealed {
    #[doc(hidden)]
    fn view(&self) -> TypeView<'_>;
}

macro_rules! sealed {
    ($($ty:ty),* $(,)?) => {
        $(impl sealed::Sealed for $ty {})*
    };
}

sealed!(
    TypeEntity,
    TypeDef,
    TypeRef,
    TypeSpec,
    TypeSignature,
    ExportedType,
    TypeDefOrRef,
    MethodEntity,
    MethodDefOrRef,
    FieldEntity,
    MemberEntity,
    Method,
    Field,
    MemberRef,
    MethodSpec,
    Property,
    Event,
    SignatureMethod,
    SignatureField,
    SignatureLocalVariables,
    SignatureMethodSpec,
    CallingConventionSignature,
    [TypeSignature],
    Vec<TypeSignature>,
    RuntimeType,
    RuntimeMethod,
    RuntimeField,
    RuntimeProperty,
    RuntimeEvent,
);

impl<T: sealed::Sealed + ?Sized> sealed::Sealed for Arc<T> {}

impl TypeLike for TypeEntity {
    fn view(&self) -> TypeView<'_> {
        self.into()
    }
}

impl TypeLike for TypeDefOrRef {
    fn view(&self) -> TypeView<'_> {
        self.into()
    }
}

impl TypeLike for TypeDef {
    fn view(&self) -> TypeView<'_> {
        TypeView::TypeDef(self)
    }
}

impl TypeLike for TypeRef {
    fn view(&self) -> TypeView<'_> {
        TypeView::TypeRef(self)
    }
}

impl TypeLike for TypeSpec {
    fn view(&self) -> TypeView<'_> {
        TypeView::TypeSpec(self)
    }
}

impl TypeLike for TypeSignature {
    fn view(&self) -> TypeView<'_> {
        TypeView::TypeSignature(self)
    }
}

impl TypeLike for ExportedType {
    fn view(&self) -> TypeView<'_> {
        TypeView::ExportedType(self)
    }
}

impl<T: TypeLike + ?Sized> TypeLike for Arc<T> {
    fn view(&self) -> TypeView<'_> {
        (**self).view()
    }
}

macro_rules! type_comparable {
    ($($ty:ty),* $(,)?) => {
        $(
            impl<B: TypeLike + ?Sized> Comparable<B> for $ty {
                fn eq_in(&self, session: &mut Session<'_>, other: &B) -> bool {
                    session.type_view_eq(self.view(), other.view())
                }

                fn hash_in(&self, session: &mut Session<'_>) -> i32 {
                    session.type_view_hash(self.view())
                }
            }

            impl RuntimeComparable<RuntimeType> for $ty {
                fn eq_runtime_in(&self, session: &mut Session<'_>, other: &RuntimeType) -> bool {
                    session.type_runtime_eq(self.view(), Some(other))
                }
            }
        )*
    };
}

type_comparable!(
    TypeEntity,
    TypeDefOrRef,
    TypeDef,
    TypeRef,
    TypeSpec,
    TypeSignature,
    ExportedType,
);

/// Implements `Comparable<$rhs> for $lhs` from an equality routine, hashing `$lhs`
/// with a hash routine of the session
macro_rules! comparable {
    ($lhs:ty, $rhs:ty, |$s:ident, $a:ident, $b:ident| $eq:expr, $hash:ident) => {
        impl Comparable<$rhs> for $lhs {
            fn eq_in(&self, $s: &mut Session<'_>, $b: &$rhs) -> bool {
                let $a = self;
                $eq
            }

            fn hash_in(&self, session: &mut Session<'_>) -> i32 {
                session.$hash(self)
            }
        }
    };
}

comparable!(MethodEntity, MethodEntity, |s, a, b| s.method_entity_eq(a, b), method_entity_hash);
comparable!(MethodDefOrRef, MethodDefOrRef, |s, a, b| s.method_def_or_ref_eq(a, b), method_def_or_ref_hash);
comparable!(FieldEntity, FieldEntity, |s, a, b| s.field_entity_eq(a, b), field_entity_hash);
comparable!(MemberEntity, MemberEntity, |s, a, b| s.member_entity_eq(a, b), member_entity_hash);
comparable!(Method, Method, |s, a, b| s.method_def_eq(a, b), method_def_hash);
comparable!(Method, MemberRef, |s, a, b| s.method_def_member_ref_eq(a, b), method_def_hash);
comparable!(MemberRef, MemberRef, |s, a, b| s.member_ref_eq(a, b), member_ref_hash);
comparable!(MemberRef, Method, |s, a, b| s.method_def_member_ref_eq(b, a), member_ref_hash);
comparable!(MemberRef, Field, |s, a, b| s.field_def_member_ref_eq(b, a), member_ref_hash);
comparable!(Field, Field, |s, a, b| s.field_def_eq(a, b), field_def_hash);
comparable!(Field, MemberRef, |s, a, b| s.field_def_member_ref_eq(a, b), field_def_hash);
comparable!(MethodSpec, MethodSpec, |s, a, b| s.method_spec_eq(a, b), method_spec_hash);
comparable!(Property, Property, |s, a, b| s.property_eq(a, b), property_hash);
comparable!(Event, Event, |s, a, b| s.event_eq(a, b), event_hash);
comparable!(SignatureMethod, SignatureMethod, |s, a, b| s.method_sig_eq(a, b), method_sig_hash);
comparable!(SignatureField, SignatureField, |s, a, b| s.field_sig_eq(a, b), field_sig_hash);
comparable!(SignatureLocalVariables, SignatureLocalVariables, |s, a, b| s.local_sig_eq(a, b), local_sig_hash);
comparable!(SignatureMethodSpec, SignatureMethodSpec, |s, a, b| s.method_spec_sig_eq(a, b), method_spec_sig_hash);
comparable!(CallingConventionSignature, CallingConventionSignature, |s, a, b| s.cc_sig_eq(a, b), cc_sig_hash);
comparable!([TypeSignature], [TypeSignature], |s, a, b| s.sig_list_eq(a, b), sig_list_hash);
comparable!(Vec<TypeSignature>, Vec<TypeSignature>, |s, a, b| s.sig_list_eq(a, b), sig_list_hash);

impl<T, R> Comparable<Arc<R>> for Arc<T>
where
    T: Comparable<R> + ?Sized,
    R: ?Sized,
{
    fn eq_in(&self, session: &mut Session<'_>, other: &Arc<R>) -> bool {
        (**self).eq_in(session, other)
    }

    fn hash_in(&self, session: &mut Session<'_>) -> i32 {
        (**self).hash_in(session)
    }
}

macro_rules! runtime_comparable {
    ($lhs:ty, $rhs:ty, |$s:ident, $a:ident, $b:ident| $eq:expr) => {
        impl RuntimeComparable<$rhs> for $lhs {
            fn eq_runtime_in(&self, $s: &mut Session<'_>, $b: &$rhs) -> bool {
                let $a = self;
                $eq
            }
        }
    };
}

runtime_comparable!(MethodEntity, RuntimeMethod, |s, a, b| s.method_entity_runtime_eq(a, b));
runtime_comparable!(MethodDefOrRef, RuntimeMethod, |s, a, b| s.method_def_or_ref_runtime_eq(a, b));
runtime_comparable!(Method, RuntimeMethod, |s, a, b| s.method_def_runtime_eq(a, b));
runtime_comparable!(MemberRef, RuntimeMethod, |s, a, b| s.member_ref_method_runtime_eq(a, b));
runtime_comparable!(MethodSpec, RuntimeMethod, |s, a, b| s.method_spec_runtime_eq(a, b));
runtime_comparable!(FieldEntity, RuntimeField, |s, a, b| s.field_entity_runtime_eq(a, b));
runtime_comparable!(Field, RuntimeField, |s, a, b| s.field_def_runtime_eq(a, b));
runtime_comparable!(MemberRef, RuntimeField, |s, a, b| s.member_ref_field_runtime_eq(a, b));
runtime_comparable!(Property, RuntimeProperty, |s, a, b| s.property_runtime_eq(a, b));
runtime_comparable!(Event, RuntimeEvent, |s, a, b| s.event_runtime_eq(a, b));

impl<T, R> RuntimeComparable<Arc<R>> for Arc<T>
where
    T: RuntimeComparable<R> + ?Sized,
    R: ?Sized,
{
    fn eq_runtime_in(&self, session: &mut Session<'_>, other: &Arc<R>) -> bool {
        (**self).eq_runtime_in(session, other)
    }
}

impl RuntimeHashable for RuntimeType {
    fn hash_runtime_in(&self, session: &mut Session<'_>) -> i32 {
        session.runtime_type_hash(Some(self))
    }
}

impl RuntimeHashable for RuntimeMethod {
    fn hash_runtime_in(&self, session: &mut Session<'_>) -> i32 {
        session.runtime_method_hash(self)
    }
}

impl RuntimeHashable for RuntimeField {
    fn hash_runtime_in(&self, session: &mut Session<'_>) -> i32 {
        session.runtime_field_hash(self)
    }
}

impl RuntimeHashable for RuntimeProperty {
    fn hash_runtime_in(&self, session: &mut Session<'_>) -> i32 {
        session.runtime_property_hash(self)
    }
}

impl RuntimeHashable for RuntimeEvent {
    fn hash_runtime_in(&self, session: &mut Session<'_>) -> i32 {
        session.runtime_event_hash(self)
    }
}

impl<T: RuntimeHashable + ?Sized> RuntimeHashable for Arc<T> {
    fn hash_runtime_in(&self, session: &mut Session<'_>) -> i32 {
        (**self).hash_runtime_in(session)
    }
}
