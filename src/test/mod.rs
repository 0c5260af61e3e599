use std::sync::Arc;

use crate::metadata::{
    signatures::{SignatureField, SignatureMethod, TypeSignature},
    tables::{
        Assembly, AssemblyRef, AssemblyRefRc, Field, FieldRc, Method, MethodRc, Module, ModuleRc,
        TypeDef, TypeDefRc, TypeRef, TypeRefRc,
    },
    typesystem::{ResolutionScope, TypeDefOrRef},
};

// Helper function to create the manifest module of a fresh assembly
pub fn create_module(name: &str, assembly: &str) -> ModuleRc {
    Arc::new(Module::new(name, Some(Arc::new(Assembly::new(assembly)))))
}

// Helper function to create the manifest module of the core library
pub fn create_corlib_module() -> ModuleRc {
    create_module("System.Private.CoreLib.dll", "System.Private.CoreLib")
}

// Helper function to create an AssemblyRef
pub fn create_assembly_ref(rid: u32, name: &str) -> AssemblyRefRc {
    Arc::new(AssemblyRef::new(rid, name))
}

// Helper function to create a TypeDef owned by `module`
pub fn create_type_def(rid: u32, namespace: &str, name: &str, module: &ModuleRc) -> TypeDefRc {
    Arc::new(TypeDef::new(rid, namespace, name, Some(module.clone())))
}

// Helper function to create a nested TypeDef
pub fn create_nested_type_def(rid: u32, name: &str, declaring_type: &TypeDefRc) -> TypeDefRc {
    Arc::new(TypeDef::new_nested(rid, name, declaring_type))
}

// Helper function to create a TypeRef into another assembly
pub fn create_type_ref(rid: u32, namespace: &str, name: &str, assembly: &AssemblyRefRc) -> TypeRefRc {
    Arc::new(TypeRef::new(
        rid,
        namespace,
        name,
        ResolutionScope::AssemblyRef(assembly.clone()),
    ))
}

// Helper function to create a TypeRef into the core library
pub fn create_type_ref_in_corlib(rid: u32, namespace: &str, name: &str) -> TypeRefRc {
    create_type_ref(rid, namespace, name, &create_assembly_ref(rid, "System.Runtime"))
}

// Helper function to create a TypeRef nested in another TypeRef
pub fn create_nested_type_ref(rid: u32, name: &str, declaring_type: &TypeRefRc) -> TypeRefRc {
    Arc::new(TypeRef::new(
        rid,
        "",
        name,
        ResolutionScope::TypeRef(declaring_type.clone()),
    ))
}

// Helper function to create a `Class` signature of a TypeDef or TypeRef
pub fn class_sig(ty: impl Into<TypeDefOrRef>) -> TypeSignature {
    TypeSignature::class(ty.into())
}

// Helper function to create a `ValueType` signature of a TypeDef or TypeRef
pub fn value_type_sig(ty: impl Into<TypeDefOrRef>) -> TypeSignature {
    TypeSignature::value_type(ty.into())
}

// Helper function to create a method
pub fn create_method(
    rid: u32,
    name: &str,
    signature: SignatureMethod,
    declaring_type: &TypeDefRc,
) -> MethodRc {
    Arc::new(Method::new(rid, name, signature, Some(declaring_type.clone())))
}

// Helper function to create a field
pub fn create_field(
    rid: u32,
    name: &str,
    field_type: TypeSignature,
    declaring_type: &TypeDefRc,
) -> FieldRc {
    Arc::new(Field::new(
        rid,
        name,
        SignatureField::new(field_type),
        Some(declaring_type.clone()),
    ))
}
