//! Equality and hashing of signature trees and calling-convention signatures.
//!
//! Signature trees compare strictly by shape: the element kinds of both nodes must match,
//! so a `U4` leaf is never equal to a `ValueType` node of `System.UInt32`. Hashing is
//! looser than equality on purpose of the cross-representation contract: `Class`,
//! `ValueType` and primitive nodes hash as the type they denote, and modifier and pinned
//! nodes hash as what they wrap.
//!
//! While a generic frame is active the hash of a generic parameter is the hash of the
//! argument it stands for. The substituted argument itself is hashed without further
//! substitution.

use std::ptr;

use crate::{
    comparer::{
        hash::{
            list_hash, method_generic_count_hash, ET_ARRAY, ET_BYREF, ET_GENERICINST, ET_MODULE,
            ET_MVAR, ET_PTR, ET_SENTINEL, ET_SZARRAY, ET_VALUEARRAY, ET_VAR,
        },
        session::Session,
    },
    metadata::{
        signatures::{
            CallingConvention, CallingConventionSignature, SignatureField, SignatureLocalVariables,
            SignatureMethod, SignatureMethodSpec, TypeSignature,
        },
        typesystem::TypeDefOrRef,
    },
};

/// The hash of a calling convention byte.
///
/// Only the `GENERIC`, `HAS_THIS` and `EXPLICIT_THIS` flags contribute, except for local
/// variable signatures and undefined kinds, which hash the whole byte. Reflection reports
/// nothing but these flags for a method.
pub(crate) fn calling_convention_hash(cc: CallingConvention) -> i32 {
    match cc.kind() {
        CallingConvention::DEFAULT..=CallingConvention::FIELD
        | CallingConvention::PROPERTY..=CallingConvention::NATIVE_VARARG => i32::from(
            cc.value()
                & (CallingConvention::GENERIC
                    | CallingConvention::HAS_THIS
                    | CallingConvention::EXPLICIT_THIS),
        ),
        _ => i32::from(cc.value()),
    }
}

/// The type a `Class` or `ValueType` node denotes
fn type_def_or_ref_of(sig: &TypeSignature) -> Option<&TypeDefOrRef> {
    match sig {
        TypeSignature::Class(ty) | TypeSignature::ValueType(ty) => Some(ty),
        _ => None,
    }
}

/// Raw comparison: both absent, or both with the same token
fn tokens_eq(a: Option<&TypeDefOrRef>, b: Option<&TypeDefOrRef>) -> bool {
    match (a, b) {
        (None, None) => true,
        (Some(a), Some(b)) => a.token() == b.token(),
        _ => false,
    }
}

impl Session<'_> {
    pub(crate) fn sig_eq(&mut self, a: &TypeSignature, b: &TypeSignature) -> bool {
        let (a, b) = if self.cmp.options.ignore_modifiers() {
            (a.remove_modifiers(), b.remove_modifiers())
        } else {
            (a, b)
        };
        if ptr::eq(a, b) {
            return true;
        }

        self.guarded(|s| {
            if a.element_type() != b.element_type() {
                return false;
            }

            let raw = s.cmp.options.raw_signature_compare();
            match (a, b) {
                (TypeSignature::Ptr(a), TypeSignature::Ptr(b))
                | (TypeSignature::ByRef(a), TypeSignature::ByRef(b))
                | (TypeSignature::SzArray(a), TypeSignature::SzArray(b))
                | (TypeSignature::Pinned(a), TypeSignature::Pinned(b)) => s.sig_eq(a, b),
                (TypeSignature::Array(a), TypeSignature::Array(b)) => {
                    a.rank == b.rank
                        && (s.cmp.options.ignore_multi_dimensional_array_bounds()
                            || (a.sizes().eq(b.sizes()) && a.lower_bounds().eq(b.lower_bounds())))
                        && s.sig_eq(&a.base, &b.base)
                }
                (TypeSignature::Class(a), TypeSignature::Class(b))
                | (TypeSignature::ValueType(a), TypeSignature::ValueType(b)) => {
                    if raw {
                        a.token() == b.token()
                    } else {
                        s.type_def_or_ref_eq(a, b)
                    }
                }
                (TypeSignature::GenericParamType(a), TypeSignature::GenericParamType(b))
                | (TypeSignature::GenericParamMethod(a), TypeSignature::GenericParamMethod(b)) => {
                    a == b
                }
                (TypeSignature::GenericInst(a), TypeSignature::GenericInst(b)) => {
                    let generic_types_equal = if raw {
                        tokens_eq(
                            type_def_or_ref_of(&a.generic_type),
                            type_def_or_ref_of(&b.generic_type),
                        )
                    } else {
                        s.sig_eq(&a.generic_type, &b.generic_type)
                    };
                    generic_types_equal && s.sig_list_eq(&a.generic_args, &b.generic_args)
                }
                (TypeSignature::FnPtr(a), TypeSignature::FnPtr(b)) => s.method_sig_eq(a, b),
                (TypeSignature::ModifiedRequired(a), TypeSignature::ModifiedRequired(b))
                | (TypeSignature::ModifiedOptional(a), TypeSignature::ModifiedOptional(b)) => {
                    let modifiers_equal = if raw {
                        a.modifier.token() == b.modifier.token()
                    } else {
                        s.type_def_or_ref_eq(&a.modifier, &b.modifier)
                    };
                    modifiers_equal && s.sig_eq(&a.base, &b.base)
                }
                (TypeSignature::ValueArray(a), TypeSignature::ValueArray(b)) => {
                    a.size == b.size && s.sig_eq(&a.base, &b.base)
                }
                (TypeSignature::Module(a), TypeSignature::Module(b)) => {
                    a.index == b.index && s.sig_eq(&a.base, &b.base)
                }
                // Primitive leaves and sentinels carry nothing beyond their kind
                _ => true,
            }
        })
    }

    pub(crate) fn sig_hash(&mut self, a: &TypeSignature) -> i32 {
        self.sig_hash_in(a, true)
    }

    fn sig_hash_in(&mut self, a: &TypeSignature, substitute: bool) -> i32 {
        self.guarded(|s| {
            let substituted = if substitute && s.cmp.substitute_generics && !s.generics.is_empty() {
                s.generics.resolve(a)
            } else {
                None
            };
            let (a, substitute) = match &substituted {
                Some(argument) => (argument, false),
                None => (a, substitute),
            };

            match a {
                TypeSignature::Class(ty) | TypeSignature::ValueType(ty) => s.type_def_or_ref_hash(ty),
                TypeSignature::Sentinel => ET_SENTINEL,
                TypeSignature::Ptr(next) => ET_PTR.wrapping_add(s.sig_hash_in(next, substitute)),
                TypeSignature::ByRef(next) => ET_BYREF.wrapping_add(s.sig_hash_in(next, substitute)),
                TypeSignature::SzArray(next) => {
                    ET_SZARRAY.wrapping_add(s.sig_hash_in(next, substitute))
                }
                TypeSignature::ModifiedRequired(modifier)
                | TypeSignature::ModifiedOptional(modifier) => s.sig_hash_in(&modifier.base, substitute),
                TypeSignature::Pinned(next) => s.sig_hash_in(next, substitute),
                // Sizes and lower bounds are not part of the hash, reflection doesn't know them
                TypeSignature::Array(array) => ET_ARRAY
                    .wrapping_add(array.rank as i32)
                    .wrapping_add(s.sig_hash_in(&array.base, substitute)),
                TypeSignature::GenericParamType(number) => ET_VAR.wrapping_add(*number as i32),
                TypeSignature::GenericParamMethod(number) => ET_MVAR.wrapping_add(*number as i32),
                TypeSignature::GenericInst(instance) => ET_GENERICINST
                    .wrapping_add(s.sig_hash_in(&instance.generic_type, substitute))
                    .wrapping_add(s.sig_list_hash_in(&instance.generic_args, substitute)),
                TypeSignature::FnPtr(_) => s.intptr_hash(),
                TypeSignature::ValueArray(array) => ET_VALUEARRAY
                    .wrapping_add(array.size as i32)
                    .wrapping_add(s.sig_hash_in(&array.base, substitute)),
                TypeSignature::Module(module) => ET_MODULE
                    .wrapping_add(module.index as i32)
                    .wrapping_add(s.sig_hash_in(&module.base, substitute)),
                leaf => leaf
                    .element_type()
                    .core_library_name()
                    .map_or(0, |name| s.core_library_type_hash(name)),
            }
        })
    }

    /// Element-wise comparison, the lengths must match
    pub(crate) fn sig_list_eq(&mut self, a: &[TypeSignature], b: &[TypeSignature]) -> bool {
        if ptr::eq(a, b) {
            return true;
        }
        self.guarded(|s| a.len() == b.len() && a.iter().zip(b).all(|(a, b)| s.sig_eq(a, b)))
    }

    pub(crate) fn sig_list_hash(&mut self, a: &[TypeSignature]) -> i32 {
        self.sig_list_hash_in(a, true)
    }

    fn sig_list_hash_in(&mut self, a: &[TypeSignature], substitute: bool) -> i32 {
        self.guarded(|s| {
            let hashes: Vec<i32> = a.iter().map(|sig| s.sig_hash_in(sig, substitute)).collect();
            list_hash(hashes)
        })
    }

    pub(crate) fn method_sig_eq(&mut self, a: &SignatureMethod, b: &SignatureMethod) -> bool {
        if ptr::eq(a, b) {
            return true;
        }
        self.guarded(|s| {
            let options = s.cmp.options;
            a.calling_convention == b.calling_convention
                && (options.dont_compare_return_type() || s.sig_eq(&a.return_type, &b.return_type))
                && (!s.cmp.compare_method_params || s.sig_list_eq(&a.params, &b.params))
                && (!a.is_generic() || a.param_count_generic == b.param_count_generic)
                && (!options.compare_sentinel_params() || s.sig_list_eq(&a.varargs, &b.varargs))
        })
    }

    pub(crate) fn method_sig_hash(&mut self, a: &SignatureMethod) -> i32 {
        self.guarded(|s| {
            let options = s.cmp.options;
            let mut hash = calling_convention_hash(a.calling_convention);
            if s.cmp.compare_method_params {
                hash = hash.wrapping_add(s.sig_list_hash(&a.params));
            }
            if !options.dont_compare_return_type() {
                hash = hash.wrapping_add(s.sig_hash(&a.return_type));
            }
            if a.is_generic() {
                hash = hash.wrapping_add(method_generic_count_hash(a.param_count_generic as usize));
            }
            if options.compare_sentinel_params() {
                hash = hash.wrapping_add(s.sig_list_hash(&a.varargs));
            }
            hash
        })
    }

    pub(crate) fn field_sig_eq(&mut self, a: &SignatureField, b: &SignatureField) -> bool {
        ptr::eq(a, b)
            || self.guarded(|s| {
                a.calling_convention == b.calling_convention && s.sig_eq(&a.base, &b.base)
            })
    }

    pub(crate) fn field_sig_hash(&mut self, a: &SignatureField) -> i32 {
        self.guarded(|s| calling_convention_hash(a.calling_convention).wrapping_add(s.sig_hash(&a.base)))
    }

    pub(crate) fn local_sig_eq(
        &mut self,
        a: &SignatureLocalVariables,
        b: &SignatureLocalVariables,
    ) -> bool {
        ptr::eq(a, b)
            || self.guarded(|s| {
                a.calling_convention == b.calling_convention && s.sig_list_eq(&a.locals, &b.locals)
            })
    }

    pub(crate) fn local_sig_hash(&mut self, a: &SignatureLocalVariables) -> i32 {
        self.guarded(|s| {
            calling_convention_hash(a.calling_convention).wrapping_add(s.sig_list_hash(&a.locals))
        })
    }

    pub(crate) fn method_spec_sig_eq(
        &mut self,
        a: &SignatureMethodSpec,
        b: &SignatureMethodSpec,
    ) -> bool {
        ptr::eq(a, b)
            || self.guarded(|s| {
                a.calling_convention == b.calling_convention
                    && s.sig_list_eq(&a.generic_args, &b.generic_args)
            })
    }

    pub(crate) fn method_spec_sig_hash(&mut self, a: &SignatureMethodSpec) -> i32 {
        self.guarded(|s| {
            calling_convention_hash(a.calling_convention)
                .wrapping_add(s.sig_list_hash(&a.generic_args))
        })
    }

    /// Compares signatures of any kind. The calling convention bytes must be identical and
    /// both signatures must be of the shape the kind calls for.
    pub(crate) fn cc_sig_eq(
        &mut self,
        a: &CallingConventionSignature,
        b: &CallingConventionSignature,
    ) -> bool {
        if ptr::eq(a, b) {
            return true;
        }
        self.guarded(|s| {
            let cc = a.calling_convention();
            if cc != b.calling_convention() {
                return false;
            }

            use CallingConventionSignature as Sig;
            match (cc.kind(), a, b) {
                (CallingConvention::FIELD, Sig::Field(a), Sig::Field(b)) => s.field_sig_eq(a, b),
                (CallingConvention::LOCAL_SIG, Sig::LocalVariables(a), Sig::LocalVariables(b)) => {
                    s.local_sig_eq(a, b)
                }
                (CallingConvention::GENERIC_INST, Sig::MethodSpec(a), Sig::MethodSpec(b)) => {
                    s.method_spec_sig_eq(a, b)
                }
                (
                    CallingConvention::FIELD
                    | CallingConvention::LOCAL_SIG
                    | CallingConvention::GENERIC_INST,
                    _,
                    _,
                ) => false,
                (
                    CallingConvention::DEFAULT..=CallingConvention::NATIVE_VARARG,
                    Sig::Method(a) | Sig::Property(a),
                    Sig::Method(b) | Sig::Property(b),
                ) => s.method_sig_eq(a, b),
                _ => false,
            }
        })
    }

    pub(crate) fn cc_sig_hash(&mut self, a: &CallingConventionSignature) -> i32 {
        self.guarded(|s| {
            use CallingConventionSignature as Sig;
            match (a.calling_convention().kind(), a) {
                (CallingConvention::FIELD, Sig::Field(sig)) => s.field_sig_hash(sig),
                (CallingConvention::LOCAL_SIG, Sig::LocalVariables(sig)) => s.local_sig_hash(sig),
                (CallingConvention::GENERIC_INST, Sig::MethodSpec(sig)) => {
                    s.method_spec_sig_hash(sig)
                }
                (
                    CallingConvention::FIELD
                    | CallingConvention::LOCAL_SIG
                    | CallingConvention::GENERIC_INST,
                    _,
                ) => 0,
                (
                    CallingConvention::DEFAULT..=CallingConvention::NATIVE_VARARG,
                    Sig::Method(sig) | Sig::Property(sig),
                ) => s.method_sig_hash(sig),
                (CallingConvention::DEFAULT..=CallingConvention::NATIVE_VARARG, _) => 0,
                _ => calling_convention_hash(a.calling_convention()),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        comparer::{SigComparer, SigComparerOptions},
        metadata::tables::TypeRef,
        metadata::typesystem::ResolutionScope,
        test::{
            class_sig, create_assembly_ref, create_module, create_type_def, create_type_ref,
            create_type_ref_in_corlib, value_type_sig,
        },
    };
    use std::sync::Arc;

    fn session(options: SigComparerOptions) -> Session<'static> {
        Session::new(SigComparer::new(options))
    }

    #[test]
    fn test_element_types_must_match() {
        let mut s = session(SigComparerOptions::empty());
        let uint32 = create_type_ref_in_corlib(1, "System", "UInt32");

        assert!(s.sig_eq(&TypeSignature::U4, &TypeSignature::U4));
        assert!(!s.sig_eq(&TypeSignature::U4, &TypeSignature::I4));
        assert!(!s.sig_eq(&TypeSignature::U4, &value_type_sig(uint32.clone())));
        // Both forms still hash as System.UInt32
        assert_eq!(
            s.sig_hash(&TypeSignature::U4),
            s.sig_hash(&value_type_sig(uint32))
        );
        assert!(s.sig_eq(&TypeSignature::Sentinel, &TypeSignature::Sentinel));
        assert_eq!(s.sig_hash(&TypeSignature::Sentinel), ET_SENTINEL);
    }

    #[test]
    fn test_array_dimensions() {
        let a = TypeSignature::array(TypeSignature::I4, 2, &[3, 4], &[0, 0]).unwrap();
        let b = TypeSignature::array(TypeSignature::I4, 2, &[5], &[]).unwrap();
        let c = TypeSignature::array(TypeSignature::I4, 3, &[3, 4], &[0, 0]).unwrap();

        let mut s = session(SigComparerOptions::empty());
        assert!(!s.sig_eq(&a, &b));
        assert!(!s.sig_eq(&a, &c));
        assert_eq!(s.sig_hash(&a), s.sig_hash(&b));
        assert_ne!(s.sig_hash(&a), s.sig_hash(&c));

        let mut loose = session(SigComparerOptions::IGNORE_MULTI_DIMENSIONAL_ARRAY_LOWER_BOUNDS_AND_SIZES);
        assert!(loose.sig_eq(&a, &b));
        assert!(!loose.sig_eq(&a, &c));
    }

    #[test]
    fn test_generic_instances() {
        let list = create_type_ref_in_corlib(1, "System.Collections.Generic", "List`1");
        let list_of_int = TypeSignature::generic_inst(class_sig(list.clone()), vec![TypeSignature::I4]);
        let list_of_int_again =
            TypeSignature::generic_inst(class_sig(list.clone()), vec![TypeSignature::I4]);
        let list_of_long = TypeSignature::generic_inst(class_sig(list), vec![TypeSignature::I8]);

        let mut s = session(SigComparerOptions::empty());
        assert!(s.sig_eq(&list_of_int, &list_of_int_again));
        assert!(!s.sig_eq(&list_of_int, &list_of_long));
        assert_eq!(s.sig_hash(&list_of_int), s.sig_hash(&list_of_int_again));
        assert_ne!(s.sig_hash(&list_of_int), s.sig_hash(&list_of_long));
    }

    #[test]
    fn test_ignore_modifiers() {
        let volatile = create_type_ref_in_corlib(1, "System.Runtime.CompilerServices", "IsVolatile");
        let modified = TypeSignature::modreq(volatile.into(), TypeSignature::I4);

        let mut s = session(SigComparerOptions::empty());
        assert!(!s.sig_eq(&modified, &TypeSignature::I4));
        assert_eq!(s.sig_hash(&modified), s.sig_hash(&TypeSignature::I4));

        let mut ignoring = session(SigComparerOptions::IGNORE_MODIFIERS);
        assert!(ignoring.sig_eq(&modified, &TypeSignature::I4));
    }

    #[test]
    fn test_raw_compare_uses_tokens() {
        let lib = create_assembly_ref(1, "Lib");
        let first = create_type_ref(5, "N", "A", &lib);
        let same_row = Arc::new(TypeRef::new(5, "N", "Renamed", ResolutionScope::AssemblyRef(lib.clone())));
        let other_row = create_type_ref(6, "N", "A", &lib);

        let mut raw = session(SigComparerOptions::RAW_SIGNATURE_COMPARE);
        assert!(raw.sig_eq(&class_sig(first.clone()), &class_sig(same_row.clone())));
        assert!(!raw.sig_eq(&class_sig(first.clone()), &class_sig(other_row.clone())));

        let mut s = session(SigComparerOptions::empty());
        assert!(!s.sig_eq(&class_sig(first.clone()), &class_sig(same_row)));
        assert!(s.sig_eq(&class_sig(first), &class_sig(other_row)));
    }

    #[test]
    fn test_hash_substitutes_generic_parameters() {
        let mut s = session(SigComparerOptions::empty());
        let var0 = TypeSignature::GenericParamType(0);
        let unsubstituted = s.sig_hash(&var0);
        assert_eq!(unsubstituted, ET_VAR);

        let substituted = s.with_type_args(&[TypeSignature::String], |s| s.sig_hash(&var0));
        assert_eq!(substituted, s.sig_hash(&TypeSignature::String));

        // An array of !0 hashes as an array of the argument
        let array = TypeSignature::sz_array(var0);
        let inside = s.with_type_args(&[TypeSignature::String], |s| s.sig_hash(&array));
        assert_eq!(
            inside,
            s.sig_hash(&TypeSignature::sz_array(TypeSignature::String))
        );
    }

    #[test]
    fn test_method_signatures() {
        let a = SignatureMethod::new_instance(TypeSignature::Void, vec![TypeSignature::I4]);
        let returns_int = SignatureMethod::new_instance(TypeSignature::I4, vec![TypeSignature::I4]);
        let other_params = SignatureMethod::new_instance(TypeSignature::Void, vec![TypeSignature::I8]);
        let static_sig = SignatureMethod::new_static(TypeSignature::Void, vec![TypeSignature::I4]);

        let mut s = session(SigComparerOptions::empty());
        assert!(!s.method_sig_eq(&a, &returns_int));
        assert!(!s.method_sig_eq(&a, &other_params));
        assert!(!s.method_sig_eq(&a, &static_sig));

        let mut no_return = session(SigComparerOptions::DONT_COMPARE_RETURN_TYPE);
        assert!(no_return.method_sig_eq(&a, &returns_int));
        assert_eq!(no_return.method_sig_hash(&a), no_return.method_sig_hash(&returns_int));

        let cmp = SigComparer::new(SigComparerOptions::empty()).with_compare_method_params(false);
        let mut no_params = Session::new(cmp);
        assert!(no_params.method_sig_eq(&a, &other_params));
        assert_eq!(no_params.method_sig_hash(&a), no_params.method_sig_hash(&other_params));
    }

    #[test]
    fn test_generic_method_signatures() {
        let one = SignatureMethod::new_static(TypeSignature::Void, vec![]).with_generic_params(1);
        let two = SignatureMethod::new_static(TypeSignature::Void, vec![]).with_generic_params(2);

        let mut s = session(SigComparerOptions::empty());
        assert!(!s.method_sig_eq(&one, &two));
        assert_eq!(
            s.method_sig_hash(&two),
            calling_convention_hash(two.calling_convention)
                .wrapping_add(list_hash([]))
                .wrapping_add(s.sig_hash(&TypeSignature::Void))
                .wrapping_add(method_generic_count_hash(2))
        );
    }

    #[test]
    fn test_sentinel_parameters() {
        let a = SignatureMethod::new_static(TypeSignature::Void, vec![TypeSignature::String])
            .with_varargs(vec![TypeSignature::I4]);
        let b = SignatureMethod::new_static(TypeSignature::Void, vec![TypeSignature::String])
            .with_varargs(vec![TypeSignature::R8]);

        let mut s = session(SigComparerOptions::empty());
        assert!(s.method_sig_eq(&a, &b));

        let mut sentinel = session(SigComparerOptions::COMPARE_SENTINEL_PARAMS);
        assert!(!sentinel.method_sig_eq(&a, &b));
        assert_ne!(sentinel.method_sig_hash(&a), sentinel.method_sig_hash(&b));
    }

    #[test]
    fn test_calling_convention_hash() {
        let instance = CallingConvention(CallingConvention::DEFAULT | CallingConvention::HAS_THIS);
        assert_eq!(calling_convention_hash(instance), 0x20);
        let generic_vararg = CallingConvention(CallingConvention::VARARG | CallingConvention::GENERIC);
        assert_eq!(calling_convention_hash(generic_vararg), 0x10);
        assert_eq!(
            calling_convention_hash(CallingConvention(CallingConvention::LOCAL_SIG)),
            0x07
        );
        assert_eq!(calling_convention_hash(CallingConvention(0x0C)), 0x0C);
    }

    #[test]
    fn test_calling_convention_signatures() {
        let module = create_module("Lib.dll", "Lib");
        let point = create_type_def(2, "N", "Point", &module);

        let field = CallingConventionSignature::Field(SignatureField::new(value_type_sig(point.clone())));
        let same_field = CallingConventionSignature::Field(SignatureField::new(value_type_sig(point)));
        let method: CallingConventionSignature =
            SignatureMethod::new_static(TypeSignature::Void, vec![]).into();
        let locals = CallingConventionSignature::LocalVariables(SignatureLocalVariables::new(vec![
            TypeSignature::I4,
            TypeSignature::pinned(TypeSignature::by_ref(TypeSignature::U1)),
        ]));
        let spec = CallingConventionSignature::MethodSpec(SignatureMethodSpec::new(vec![TypeSignature::I4]));

        let mut s = session(SigComparerOptions::empty());
        assert!(s.cc_sig_eq(&field, &same_field));
        assert_eq!(s.cc_sig_hash(&field), s.cc_sig_hash(&same_field));
        assert!(!s.cc_sig_eq(&field, &method));
        assert!(s.cc_sig_eq(&locals, &locals.clone()));
        assert!(s.cc_sig_eq(&spec, &spec.clone()));
        assert!(!s.cc_sig_eq(&locals, &spec));

        // Local signatures hash their full calling convention byte
        let CallingConventionSignature::LocalVariables(local_sig) = &locals else {
            unreachable!()
        };
        assert_eq!(
            s.cc_sig_hash(&locals),
            0x07i32.wrapping_add(s.sig_list_hash(&local_sig.locals))
        );
    }
}
