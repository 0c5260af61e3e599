//! Integration tests for end-to-end comparison scenarios.
//!
//! Every scenario builds its entities through the public API only and checks equality
//! together with hash consistency, the way a consumer using the comparer for map keys
//! relies on them.

use std::sync::Arc;

use cilcompare::{
    metadata::{
        tables::{Assembly, ExportedType, ModuleRc, ModuleRef, TypeDefRc, TypeRefRc},
        typesystem::Implementation,
    },
    prelude::*,
    runtime::{RuntimeModuleRc, RuntimeTypeRc},
};

fn create_module(name: &str, assembly: &str) -> ModuleRc {
    Arc::new(Module::new(name, Some(Arc::new(Assembly::new(assembly)))))
}

fn create_type_def(rid: u32, namespace: &str, name: &str, module: &ModuleRc) -> TypeDefRc {
    Arc::new(TypeDef::new(rid, namespace, name, Some(module.clone())))
}

fn create_type_ref(rid: u32, namespace: &str, name: &str, scope: ResolutionScope) -> TypeRefRc {
    Arc::new(TypeRef::new(rid, namespace, name, scope))
}

fn assembly_scope(rid: u32, name: &str) -> ResolutionScope {
    ResolutionScope::AssemblyRef(Arc::new(AssemblyRef::new(rid, name)))
}

fn runtime_module(file: &str, assembly: &str) -> RuntimeModuleRc {
    let assembly = Arc::new(RuntimeAssembly::new(assembly, AssemblyVersion::new(1, 0, 0, 0)));
    Arc::new(RuntimeModule::new(file, assembly))
}

fn runtime_int32() -> RuntimeTypeRc {
    let corlib = runtime_module("System.Private.CoreLib.dll", "System.Private.CoreLib");
    Arc::new(RuntimeType::definition("System", "Int32", corlib))
}

fn assert_equal_and_hash<A, B>(comparer: &SigComparer<'_>, a: &A, b: &B)
where
    A: Comparable<B> + Comparable + ?Sized,
    B: Comparable<A> + Comparable + ?Sized,
{
    assert!(comparer.equals(a, b));
    assert!(comparer.equals(b, a));
    assert_eq!(comparer.hash(a), comparer.hash(b));
}

/// References scoped to modules of different names are distinct types, module names
/// compare case insensitively.
#[test]
fn test_module_scope_names() {
    let owner = create_module("App.dll", "App");
    let scoped = |rid: u32, module: &str| {
        Arc::new(
            TypeRef::new(
                rid,
                "N",
                "Foo",
                ResolutionScope::ModuleRef(Arc::new(ModuleRef::new(rid, module, Some(owner.clone())))),
            )
            .with_module(owner.clone()),
        )
    };

    let comparer = SigComparer::new(SigComparerOptions::empty());
    let in_m1 = scoped(1, "M1");
    assert!(!comparer.equals(&*in_m1, &*scoped(2, "M2")));
    assert_equal_and_hash(&comparer, &*in_m1, &*scoped(3, "m1"));
}

/// A definition equal to a reference is equal to every specification wrapping that reference.
#[test]
fn test_representation_transitivity() {
    let lib = create_module("Lib.dll", "Lib");
    let definition = create_type_def(2, "N", "Foo", &lib);
    let reference = create_type_ref(1, "N", "Foo", assembly_scope(1, "Lib"));
    let signature = TypeSig::class(reference.clone().into());
    let specification = Arc::new(TypeSpec::new(1, signature.clone()));
    let exported = Arc::new(ExportedType::new(
        1,
        "N",
        "Foo",
        Implementation::AssemblyRef(Arc::new(AssemblyRef::new(2, "Lib"))),
    ));

    let comparer = SigComparer::new(SigComparerOptions::empty());
    assert_equal_and_hash(&comparer, &*definition, &*reference);
    assert_equal_and_hash(&comparer, &*reference, &*specification);
    assert_equal_and_hash(&comparer, &*definition, &*specification);
    assert_equal_and_hash(&comparer, &*definition, &signature);
    assert_equal_and_hash(&comparer, &*exported, &*definition);

    let entities = [
        TypeEntity::TypeDef(definition),
        TypeEntity::TypeRef(reference),
        TypeEntity::TypeSpec(specification),
        TypeEntity::TypeSignature(signature),
        TypeEntity::ExportedType(exported),
    ];
    let hash = comparer.hash(&entities[0]);
    for a in &entities {
        assert_eq!(comparer.hash(a), hash);
        for b in &entities {
            assert!(comparer.equals(a, b));
        }
    }
}

/// Types in different assemblies stay distinct whichever side is asked first.
#[test]
fn test_symmetry_of_unequal_pairs() {
    let lib = create_module("Lib.dll", "Lib");
    let entities = [
        TypeEntity::TypeDef(create_type_def(2, "N", "Foo", &lib)),
        TypeEntity::TypeRef(create_type_ref(1, "N", "Foo", assembly_scope(1, "Other"))),
        TypeEntity::TypeRef(create_type_ref(2, "N", "Bar", assembly_scope(2, "Lib"))),
        TypeEntity::TypeSignature(TypeSig::sz_array(TypeSig::I4)),
        TypeEntity::TypeSignature(TypeSig::I4),
    ];

    for options in [
        SigComparerOptions::empty(),
        SigComparerOptions::DONT_COMPARE_TYPE_SCOPE,
        SigComparerOptions::CASE_INSENSITIVE_ALL,
    ] {
        let comparer = SigComparer::new(options);
        for a in &entities {
            for b in &entities {
                assert_eq!(comparer.equals(a, b), comparer.equals(b, a), "{options:?}");
            }
        }
    }
}

#[test]
fn test_array_dimensions() -> Result<()> {
    let small = TypeSig::array(TypeSig::I4, 2, &[3, 4], &[0, 0])?;
    let large = TypeSig::array(TypeSig::I4, 2, &[5, 4], &[0, 0])?;
    let rank3 = TypeSig::array(TypeSig::I4, 3, &[3, 4], &[0, 0])?;

    let strict = SigComparer::new(SigComparerOptions::empty());
    assert!(!strict.equals(&small, &large));
    assert!(!strict.equals(&small, &rank3));

    let relaxed = SigComparer::new(
        SigComparerOptions::IGNORE_MULTI_DIMENSIONAL_ARRAY_LOWER_BOUNDS_AND_SIZES,
    );
    assert_equal_and_hash(&relaxed, &small, &large);
    assert!(!relaxed.equals(&small, &rank3));
    Ok(())
}

/// Function pointers hash like `System.IntPtr` under every option set.
#[test]
fn test_function_pointer_hash() {
    let signatures = [
        SignatureMethod::new_static(TypeSig::Void, vec![]),
        SignatureMethod::new_instance(TypeSig::I4, vec![TypeSig::String, TypeSig::R8]),
        SignatureMethod::new_static(TypeSig::Object, vec![]).with_generic_params(1),
    ];

    for options in [
        SigComparerOptions::empty(),
        SigComparerOptions::CASE_INSENSITIVE_ALL,
        SigComparerOptions::DONT_COMPARE_TYPE_SCOPE | SigComparerOptions::IGNORE_MODIFIERS,
        SigComparerOptions::MSCORLIB_IS_NOT_SPECIAL,
    ] {
        let comparer = SigComparer::new(options);
        for signature in &signatures {
            let fn_ptr = TypeSig::fn_ptr(signature.clone());
            assert_eq!(comparer.hash(&fn_ptr), comparer.hash(&TypeSig::I), "{options:?}");
            assert!(!comparer.equals(&fn_ptr, &TypeSig::I));
        }
    }
}

/// A generic instantiation chain far deeper than the recursion bound.
#[test]
fn test_deep_generic_chain() {
    let lib = create_module("Lib.dll", "Lib");
    let wrapper = create_type_def(2, "N", "Wrapper`1", &lib);
    let chain = || {
        (0..500).fold(TypeSig::I4, |inner, _| {
            TypeSig::generic_inst(TypeSig::class(wrapper.clone().into()), vec![inner])
        })
    };
    let (a, b) = (chain(), chain());

    let comparer = SigComparer::new(SigComparerOptions::empty());
    assert!(!comparer.equals(&a, &b));
    assert_eq!(comparer.hash(&a), 0);
    assert!(matches!(
        comparer.try_equals(&a, &b),
        Err(Error::RecursionLimit(MAX_RECURSION_DEPTH))
    ));
    assert!(matches!(comparer.try_hash(&a), Err(Error::RecursionLimit(_))));

    // Shallow chains still compare structurally
    let shallow = TypeSig::generic_inst(TypeSig::class(wrapper.clone().into()), vec![TypeSig::I4]);
    assert_eq!(comparer.try_equals(&shallow, &shallow.clone()).ok(), Some(true));
}

/// Types nesting each other in a cycle terminate with the conservative default.
#[test]
fn test_cyclic_nesting() -> Result<()> {
    let cycle = |module: &ModuleRc| -> Result<TypeDefRc> {
        let outer = create_type_def(2, "", "Outer", module);
        let inner = Arc::new(TypeDef::new_nested(3, "Inner", &outer));
        outer.set_declaring_type(inner)?;
        Ok(outer)
    };
    let a = cycle(&create_module("Lib.dll", "Lib"))?;
    let b = cycle(&create_module("Lib.dll", "Lib"))?;

    let comparer = SigComparer::new(SigComparerOptions::empty());
    assert!(!comparer.equals(&*a, &*b));
    assert!(matches!(comparer.try_equals(&*a, &*b), Err(Error::RecursionLimit(_))));

    // Nested types hash by name only, so hashing never follows the cycle
    assert_eq!(comparer.try_hash(&*a).ok(), comparer.try_hash(&*b).ok());

    // The identity fast path never walks the cycle
    assert!(comparer.equals(&*a, &*a));
    Ok(())
}

/// The field `Value` of `Box<int32>` hashes identically through metadata and reflection.
#[test]
fn test_generic_instance_field_against_runtime() {
    let lib = create_module("Lib.dll", "Lib");
    let boxed = create_type_def(2, "N", "Box`1", &lib);
    let instance = Arc::new(TypeSpec::new(
        1,
        TypeSig::generic_inst(TypeSig::class(boxed.clone().into()), vec![TypeSig::I4]),
    ));
    let reference = Arc::new(MemberRef::new(
        1,
        "Value",
        MemberRefParent::TypeSpec(instance),
        SignatureField::new(TypeSig::GenericParamType(0)),
    ));

    let rt_lib = runtime_module("Lib.dll", "Lib");
    let rt_box = Arc::new(RuntimeType::generic_definition("N", "Box`1", rt_lib.clone(), 1));
    let rt_closed = Arc::new(RuntimeType::instantiate(&rt_box, vec![runtime_int32()]));
    let rt_definition = Arc::new(RuntimeField::new(
        "Value",
        Some(rt_box.clone()),
        rt_lib.clone(),
        rt_box.generic_arguments()[0].clone(),
    ));
    let rt_field =
        RuntimeField::new("Value", Some(rt_closed), rt_lib, runtime_int32()).with_definition(rt_definition);

    let facade = FieldEqualityComparer::COMPARE_DECLARING_TYPES;
    let entity = FieldEntity::MemberRef(reference);
    assert!(facade.equals_runtime(&entity, &rt_field));
    assert_eq!(facade.hash(&entity), facade.runtime_hash(&rt_field));
}

/// Case insensitive comparers fold the case of every name they hash.
#[test]
fn test_case_insensitive_members() {
    let lib = create_module("Lib.dll", "Lib");
    let owner = create_type_def(2, "N", "Owner", &lib);
    let method = |rid: u32, name: &str| {
        MethodEntity::MethodDef(Arc::new(Method::new(
            rid,
            name,
            SignatureMethod::new_instance(TypeSig::Void, vec![TypeSig::I4]),
            Some(owner.clone()),
        )))
    };
    let (upper, lower) = (method(1, "Run"), method(2, "run"));

    assert!(!MethodEqualityComparer::COMPARE_DECLARING_TYPES.equals(&upper, &lower));
    let facade = MethodEqualityComparer::CASE_INSENSITIVE_COMPARE_DECLARING_TYPES;
    assert!(facade.equals(&upper, &lower));
    assert_eq!(facade.hash(&upper), facade.hash(&lower));
}
