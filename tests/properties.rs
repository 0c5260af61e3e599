//! Property tests for the comparer contract.
//!
//! Signature trees are generated as shapes over a fixed pool of named types, then built
//! in several representations: once with every named type as a definition, once as a
//! reference into the defining assembly, and once as the runtime reflection view. The
//! pool's first entry is the `<Module>` type, which references may only denote when the
//! comparer allows it. Every named type is also available as an exported type, both
//! forwarded to the defining assembly and pointing at the defining file.

use std::sync::Arc;

use cilcompare::{
    metadata::{
        tables::{Assembly, ExportedTypeRc, File, ModuleRc, TypeDefRc, TypeRefRc},
        typesystem::ElementType,
    },
    prelude::*,
    runtime::{RuntimeModuleRc, RuntimeTypeRc},
};
use proptest::{prelude::*, sample::select};
use rayon::prelude::*;
use strum::IntoEnumIterator;

/// Index of the `<Module>` type in the pool
const GLOBAL: usize = 0;

const NAMES: [(&str, &str); 5] = [
    ("", "<Module>"),
    ("N", "Foo"),
    ("N", "Bar"),
    ("N.Collections", "List`1"),
    ("Other", "Foo"),
];

#[derive(Debug, Clone)]
enum Shape {
    Primitive(ElementType),
    Named(usize),
    GenericParam(u32),
    SzArray(Box<Shape>),
    Ptr(Box<Shape>),
    ByRef(Box<Shape>),
    GenericInst(usize, Vec<Shape>),
}

impl Shape {
    fn mentions_global(&self) -> bool {
        match self {
            Shape::Named(index) => *index == GLOBAL,
            Shape::GenericInst(index, arguments) => {
                *index == GLOBAL || arguments.iter().any(Shape::mentions_global)
            }
            Shape::SzArray(inner) | Shape::Ptr(inner) | Shape::ByRef(inner) => {
                inner.mentions_global()
            }
            Shape::Primitive(_) | Shape::GenericParam(_) => false,
        }
    }
}

struct Pool {
    defs: Vec<TypeDefRc>,
    refs: Vec<TypeRefRc>,
    forwarded: Vec<ExportedTypeRc>,
    in_file: Vec<ExportedTypeRc>,
    runtime: Vec<RuntimeTypeRc>,
    runtime_lib: RuntimeModuleRc,
    runtime_corlib: RuntimeModuleRc,
}

impl Pool {
    fn new() -> Self {
        let module: ModuleRc = Arc::new(Module::new("Lib.dll", Some(Arc::new(Assembly::new("Lib")))));
        let lib = Arc::new(AssemblyRef::new(1, "Lib"));
        let forward_target = Arc::new(AssemblyRef::new(2, "Lib"));
        let file = Arc::new(File::new(1, "Lib.dll"));
        let runtime_module = |file: &str, assembly: &str| {
            let assembly = Arc::new(RuntimeAssembly::new(assembly, AssemblyVersion::new(1, 0, 0, 0)));
            Arc::new(RuntimeModule::new(file, assembly))
        };
        let runtime_lib = runtime_module("Lib.dll", "Lib");

        // Row 1 of the definitions is the global type
        let defs = NAMES
            .iter()
            .zip(1..)
            .map(|(&(namespace, name), rid)| {
                Arc::new(TypeDef::new(rid, namespace, name, Some(module.clone())))
            })
            .collect();
        let refs = NAMES
            .iter()
            .zip(1..)
            .map(|(&(namespace, name), rid)| {
                Arc::new(TypeRef::new(
                    rid,
                    namespace,
                    name,
                    ResolutionScope::AssemblyRef(lib.clone()),
                ))
            })
            .collect();
        let forwarded = NAMES
            .iter()
            .zip(1..)
            .map(|(&(namespace, name), rid)| {
                Arc::new(ExportedType::new(
                    rid,
                    namespace,
                    name,
                    Implementation::AssemblyRef(forward_target.clone()),
                ))
            })
            .collect();
        let in_file = NAMES
            .iter()
            .zip(10..)
            .map(|(&(namespace, name), rid)| {
                Arc::new(
                    ExportedType::new(rid, namespace, name, Implementation::File(file.clone()))
                        .with_module(module.clone()),
                )
            })
            .collect();
        let runtime = NAMES
            .iter()
            .map(|&(namespace, name)| {
                Arc::new(RuntimeType::definition(namespace, name, runtime_lib.clone()))
            })
            .collect();

        Pool {
            defs,
            refs,
            forwarded,
            in_file,
            runtime,
            runtime_lib,
            runtime_corlib: runtime_module("System.Private.CoreLib.dll", "System.Private.CoreLib"),
        }
    }

    fn named(&self, index: usize, as_reference: bool) -> TypeSig {
        if as_reference {
            TypeSig::class(self.refs[index].clone().into())
        } else {
            TypeSig::class(self.defs[index].clone().into())
        }
    }

    fn build(&self, shape: &Shape, as_reference: bool) -> TypeSig {
        match shape {
            Shape::Primitive(element) => {
                TypeSig::from_primitive(*element).expect("primitive element kind")
            }
            Shape::Named(index) => self.named(*index, as_reference),
            Shape::GenericParam(position) => TypeSig::GenericParamType(*position),
            Shape::SzArray(inner) => TypeSig::sz_array(self.build(inner, as_reference)),
            Shape::Ptr(inner) => TypeSig::ptr(self.build(inner, as_reference)),
            Shape::ByRef(inner) => TypeSig::by_ref(self.build(inner, as_reference)),
            Shape::GenericInst(index, arguments) => TypeSig::generic_inst(
                self.named(*index, as_reference),
                arguments
                    .iter()
                    .map(|argument| self.build(argument, as_reference))
                    .collect(),
            ),
        }
    }

    fn build_runtime(&self, shape: &Shape) -> RuntimeTypeRc {
        let ty = match shape {
            Shape::Primitive(element) => RuntimeType::definition(
                "System",
                element.core_library_name().expect("primitive element kind"),
                self.runtime_corlib.clone(),
            ),
            Shape::Named(index) => return self.runtime[*index].clone(),
            Shape::GenericParam(position) => RuntimeType::type_parameter(*position),
            Shape::SzArray(inner) => RuntimeType::SzArray(self.build_runtime(inner)),
            Shape::Ptr(inner) => RuntimeType::Pointer(self.build_runtime(inner)),
            Shape::ByRef(inner) => RuntimeType::ByRef(self.build_runtime(inner)),
            Shape::GenericInst(index, arguments) => {
                let (namespace, name) = NAMES[*index];
                let definition = Arc::new(RuntimeType::generic_definition(
                    namespace,
                    name,
                    self.runtime_lib.clone(),
                    arguments.len() as u32,
                ));
                RuntimeType::instantiate(
                    &definition,
                    arguments.iter().map(|argument| self.build_runtime(argument)).collect(),
                )
            }
        };
        Arc::new(ty)
    }

    /// Every metadata representation of the named type at `index`. The definition comes
    /// first, then the representations that reach it through a reference or an export,
    /// then a signature over the definition itself.
    fn entities(&self, index: usize) -> Vec<TypeEntity> {
        vec![
            TypeEntity::TypeDef(self.defs[index].clone()),
            TypeEntity::TypeRef(self.refs[index].clone()),
            TypeEntity::ExportedType(self.forwarded[index].clone()),
            TypeEntity::ExportedType(self.in_file[index].clone()),
            TypeEntity::TypeSpec(Arc::new(TypeSpec::new(1, self.named(index, true)))),
            TypeEntity::TypeSignature(self.named(index, false)),
        ]
    }
}

fn primitives() -> Vec<ElementType> {
    ElementType::iter().filter(|e| e.is_primitive()).collect()
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![
        select(primitives()).prop_map(Shape::Primitive),
        (0..NAMES.len()).prop_map(Shape::Named),
        (0u32..3).prop_map(Shape::GenericParam),
    ];

    leaf.prop_recursive(4, 32, 3, |inner| {
        prop_oneof![
            inner.clone().prop_map(|s| Shape::SzArray(Box::new(s))),
            inner.clone().prop_map(|s| Shape::Ptr(Box::new(s))),
            inner.clone().prop_map(|s| Shape::ByRef(Box::new(s))),
            (0..NAMES.len(), prop::collection::vec(inner, 1..4))
                .prop_map(|(index, arguments)| Shape::GenericInst(index, arguments)),
        ]
    })
}

fn option_sets() -> impl Strategy<Value = SigComparerOptions> {
    select(vec![
        SigComparerOptions::empty(),
        SigComparerOptions::CASE_INSENSITIVE_ALL,
        SigComparerOptions::DONT_COMPARE_TYPE_SCOPE,
        SigComparerOptions::COMPARE_DECLARING_TYPES | SigComparerOptions::IGNORE_MODIFIERS,
        SigComparerOptions::TYPE_REF_CAN_REFERENCE_GLOBAL_TYPE,
        SigComparerOptions::TYPE_REF_CAN_REFERENCE_GLOBAL_TYPE
            | SigComparerOptions::CASE_INSENSITIVE_ALL,
        SigComparerOptions::TYPE_REF_CAN_REFERENCE_GLOBAL_TYPE
            | SigComparerOptions::DONT_COMPARE_TYPE_SCOPE,
    ])
}

/// True if references to the global type denote the definition under `options`
fn global_linked(options: SigComparerOptions) -> bool {
    options.contains(SigComparerOptions::TYPE_REF_CAN_REFERENCE_GLOBAL_TYPE)
}

proptest! {
    #[test]
    fn symmetric(a in shape(), b in shape(), options in option_sets()) {
        let pool = Pool::new();
        let comparer = SigComparer::new(options);
        let (a, b) = (pool.build(&a, false), pool.build(&b, true));

        prop_assert_eq!(comparer.equals(&a, &b), comparer.equals(&b, &a));
    }

    #[test]
    fn hash_consistent(a in shape(), b in shape(), options in option_sets()) {
        let pool = Pool::new();
        let comparer = SigComparer::new(options);
        let (a, b) = (pool.build(&a, false), pool.build(&b, true));

        if comparer.equals(&a, &b) {
            prop_assert_eq!(comparer.hash(&a), comparer.hash(&b));
        }
    }

    #[test]
    fn representations_agree(shape in shape(), options in option_sets()) {
        let pool = Pool::new();
        let comparer = SigComparer::new(options);
        let definition = pool.build(&shape, false);
        let reference = pool.build(&shape, true);
        let specification = TypeSpec::new(1, reference.clone());
        let runtime = pool.build_runtime(&shape);
        let global = shape.mentions_global();
        let linked = !global || global_linked(options);

        prop_assert_eq!(comparer.equals(&definition, &reference), linked);
        prop_assert_eq!(comparer.equals(&specification, &definition), linked);
        prop_assert!(comparer.equals(&specification, &reference));
        // The global type only stands for a missing runtime declaring type
        prop_assert_eq!(comparer.equals_runtime(&definition, &*runtime), !global);

        let hash = comparer.hash(&definition);
        prop_assert_eq!(
            hash,
            comparer.hash(&TypeEntity::TypeSignature(definition.clone()))
        );
        prop_assert_eq!(comparer.hash(&reference), comparer.hash(&specification));
        if linked {
            prop_assert_eq!(hash, comparer.hash(&reference));
        }
        if !global {
            prop_assert_eq!(hash, comparer.runtime_hash(&*runtime));
        }
    }

    #[test]
    fn named_representations_consistent(index in 0..NAMES.len(), options in option_sets()) {
        let pool = Pool::new();
        let comparer = SigComparer::new(options);
        let entities = pool.entities(index);
        let runtime = &*pool.runtime[index];

        for a in &entities {
            for b in &entities {
                let equal = comparer.equals(a, b);
                prop_assert_eq!(equal, comparer.equals(b, a));
                if equal {
                    prop_assert_eq!(comparer.hash(a), comparer.hash(b));
                }
            }
            if comparer.equals_runtime(a, runtime) {
                prop_assert_eq!(comparer.hash(a), comparer.runtime_hash(runtime));
            }
        }

        let (definition, rest) = entities.split_first().expect("pool entities");
        let (own_signature, linked_entities) = rest.split_last().expect("pool entities");
        let linked = index != GLOBAL || global_linked(options);
        for other in linked_entities {
            prop_assert_eq!(comparer.equals(definition, other), linked);
        }
        prop_assert!(comparer.equals(definition, own_signature));
        prop_assert_eq!(comparer.equals_runtime(definition, runtime), index != GLOBAL);
    }

    #[test]
    fn permutation_sensitive(
        x in select(primitives()),
        y in select(primitives()),
        index in 0..NAMES.len(),
    ) {
        prop_assume!(x != y);
        let pool = Pool::new();
        let comparer = SigComparer::new(SigComparerOptions::empty());
        let build = |first: ElementType, second: ElementType| {
            pool.build(
                &Shape::GenericInst(index, vec![Shape::Primitive(first), Shape::Primitive(second)]),
                false,
            )
        };
        let (forward, backward) = (build(x, y), build(y, x));

        prop_assert!(!comparer.equals(&forward, &backward));
        prop_assert_ne!(comparer.hash(&forward), comparer.hash(&backward));
    }
}

/// One comparer shared by many threads gives the same answers as a sequential run.
#[test]
fn test_shared_comparer_across_threads() {
    let pool = Pool::new();
    let comparer = SigComparer::new(SigComparerOptions::CASE_INSENSITIVE_ALL);
    let shapes: Vec<Shape> = (GLOBAL + 1..NAMES.len())
        .flat_map(|index| {
            primitives().into_iter().map(move |element| {
                Shape::GenericInst(index, vec![Shape::SzArray(Box::new(Shape::Primitive(element)))])
            })
        })
        .collect();
    let definitions: Vec<TypeSig> = shapes.iter().map(|s| pool.build(s, false)).collect();
    let references: Vec<TypeSig> = shapes.iter().map(|s| pool.build(s, true)).collect();

    let sequential: Vec<i32> = definitions.iter().map(|sig| comparer.hash(sig)).collect();
    let parallel: Vec<i32> = references.par_iter().map(|sig| comparer.hash(sig)).collect();
    assert_eq!(sequential, parallel);

    let all_equal = definitions
        .par_iter()
        .zip(references.par_iter())
        .all(|(definition, reference)| comparer.equals(definition, reference));
    assert!(all_equal);
}
