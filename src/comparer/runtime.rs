//! Equality and hashing of metadata entities against the runtime reflection view.
//!
//! Reflection reports members of instantiated generic types with the type arguments
//! already substituted, so metadata signatures are compared with the instantiation
//! arguments of the member's parent pushed as a generic frame. When declaring types are
//! not compared, a runtime member of an instantiated type is replaced by the member as
//! declared on the generic type definition first, so that `Foo<int>::M(!0)` and the
//! runtime `Foo<int>.M(int)` hash alike either way.
//!
//! Reflection reports a generic type definition used inside its own members (`Foo<T>`
//! inside `Foo<T>`) as the definition itself, where metadata encodes an instantiation
//! with the type's own parameters. A runtime type that is the very declaring type of the
//! member being compared is therefore treated as a generic instance.

use std::{borrow::Cow, ptr};

use crate::{
    comparer::{
        hash::{
            list_hash, method_generic_count_hash, names_equal, ET_ARRAY, ET_BYREF, ET_GENERICINST,
            ET_MVAR, ET_PTR, ET_SZARRAY, ET_VAR, GLOBAL_TYPE, NESTED_TYPE,
        },
        members::generic_instance_args,
        scope::{definition_assembly, module_assembly, named, ModuleScope},
        session::Session,
        SigComparer, SigComparerOptions,
    },
    metadata::{
        members::{FieldEntity, MethodDefOrRef, MethodEntity},
        signatures::{CallingConvention, SignatureMethod, TypeSignature},
        tables::{
            AssemblyName, Event, ExportedType, Field, MemberRef, Method, MethodSpec, Module,
            Property, TypeDef, TypeRef,
        },
        typesystem::{Implementation, MemberRefParent, ResolutionScope, TypeView},
    },
    runtime::{
        RuntimeCallingConventions, RuntimeEvent, RuntimeField, RuntimeMethod, RuntimeModule,
        RuntimeProperty, RuntimeType, RuntimeTypeRc,
    },
};

const SYSTEM_NAMESPACE: &str = "System";

fn runtime_assembly(module: &RuntimeModule) -> Option<&dyn AssemblyName> {
    Some(module.assembly.as_ref())
}

/// The calling convention flags reflection reports, as a metadata calling convention byte
fn runtime_calling_convention(b: &RuntimeMethod) -> u8 {
    let mut cc = 0;
    if b.is_generic_method() {
        cc |= CallingConvention::GENERIC;
    }
    if b.calling_convention.contains(RuntimeCallingConventions::HAS_THIS) {
        cc |= CallingConvention::HAS_THIS;
    }
    if b.calling_convention.contains(RuntimeCallingConventions::EXPLICIT_THIS) {
        cc |= CallingConvention::EXPLICIT_THIS;
    }
    cc
}

/// True if reflection reports `b` as the generic type definition standing for its own
/// instantiation with its own parameters
fn treat_as_generic_instance(
    declaring: Option<&RuntimeType>,
    b: &RuntimeType,
    treat: Option<bool>,
) -> bool {
    treat.unwrap_or_else(|| {
        declaring.is_some_and(|declaring| declaring.is_generic_type_definition() && ptr::eq(declaring, b))
    })
}

/// The leading custom modifiers of `sig`, outermost first, split into required and
/// optional ones
fn modifiers_of(sig: &TypeSignature) -> (Vec<TypeView<'_>>, Vec<TypeView<'_>>) {
    let mut required = Vec::new();
    let mut optional = Vec::new();
    let mut current = sig;
    loop {
        match current {
            TypeSignature::ModifiedRequired(modifier) => {
                required.push((&modifier.modifier).into());
                current = &modifier.base;
            }
            TypeSignature::ModifiedOptional(modifier) => {
                optional.push((&modifier.modifier).into());
                current = &modifier.base;
            }
            _ => return (required, optional),
        }
    }
}

impl<'a> Session<'a> {
    /// The comparer used against the definition a runtime generic method instance
    /// resolves to
    fn generic_definition_comparer(&self) -> SigComparer<'a> {
        SigComparer {
            substitute_generics: false,
            ..self
                .cmp
                .without(SigComparerOptions::COMPARE_METHOD_FIELD_DECLARING_TYPE)
        }
    }

    /// Replaces a method of an instantiated generic type by the method as declared on the
    /// generic type definition, unless declaring types are compared
    fn runtime_method_definition<'m>(&self, b: &'m RuntimeMethod) -> Cow<'m, RuntimeMethod> {
        if self.cmp.options.compare_method_field_declaring_type()
            || !b
                .declaring_type
                .as_ref()
                .is_some_and(|declaring| declaring.is_generic_instance())
        {
            return Cow::Borrowed(b);
        }
        match &b.definition {
            Some(definition) if b.is_generic_instance() => {
                Cow::Owned(definition.instantiate(b.generic_arguments.clone()))
            }
            Some(definition) => Cow::Borrowed(definition),
            None => Cow::Borrowed(b),
        }
    }

    fn runtime_field_definition<'m>(&self, b: &'m RuntimeField) -> &'m RuntimeField {
        if self.cmp.options.compare_method_field_declaring_type()
            || !b
                .declaring_type
                .as_ref()
                .is_some_and(|declaring| declaring.is_generic_instance())
        {
            return b;
        }
        b.definition.as_deref().unwrap_or(b)
    }

    fn runtime_namespaces_eq(&self, a: &str, b: &RuntimeType) -> bool {
        b.is_nested() || self.type_namespaces_eq(a, b.namespace())
    }

    /// A module against the module reflection reports
    fn module_runtime_eq(&mut self, a: Option<&Module>, b: &RuntimeModule) -> bool {
        let Some(a) = a else {
            return false;
        };
        if self.core_library_is_special() && a.is_core_library() && b.is_core_library() {
            return true;
        }
        names_equal(true, &a.name, &b.scope_name)
            && self.assembly_eq(module_assembly(a), runtime_assembly(b))
    }

    /// True if `b` is the core library type `System.<name>`
    fn runtime_core_type_eq(&self, b: &RuntimeType, name: &str) -> bool {
        let RuntimeType::Definition(def) = b else {
            return false;
        };
        def.declaring_type.is_none()
            && self.type_names_eq(name, &b.name())
            && self.type_namespaces_eq(SYSTEM_NAMESPACE, &def.namespace)
            && (self.cmp.options.dont_compare_type_scope() || def.module.assembly.is_core_library())
    }

    /// Compares any type representation against a runtime type. `None` stands for the
    /// missing declaring type of a global member.
    pub(crate) fn type_runtime_eq(&mut self, a: TypeView<'_>, b: Option<&RuntimeType>) -> bool {
        match (a, b) {
            (TypeView::TypeDef(a), b) => self.type_def_runtime_eq(a, b),
            (_, None) => false,
            (TypeView::TypeRef(a), Some(b)) => self.type_ref_runtime_eq(a, b),
            (TypeView::TypeSpec(a), b) => self.sig_runtime_eq(&a.signature, b, None, None),
            (TypeView::TypeSignature(a), b) => self.sig_runtime_eq(a, b, None, None),
            (TypeView::ExportedType(a), Some(b)) => self.exported_type_runtime_eq(a, b),
        }
    }

    fn type_def_runtime_eq(&mut self, a: &TypeDef, b: Option<&RuntimeType>) -> bool {
        let Some(b) = b else {
            return a.is_global_module_type();
        };
        if a.is_global_module_type() {
            return false;
        }

        self.guarded(|s| {
            if let Some(projected) = s.project_type_def(a) {
                return s.type_ref_runtime_eq(&projected, b);
            }
            let RuntimeType::Definition(def) = b else {
                return false;
            };

            s.type_names_eq(&a.name, &b.name())
                && s.runtime_namespaces_eq(&a.namespace, b)
                && match (a.declaring_type(), def.declaring_type.as_deref()) {
                    (None, None) => true,
                    (Some(outer), Some(b_outer)) => s.type_def_runtime_eq(outer, Some(b_outer)),
                    _ => false,
                }
                && (s.cmp.options.dont_compare_type_scope()
                    || s.module_runtime_eq(a.module.as_deref(), &def.module))
        })
    }

    fn type_ref_runtime_eq(&mut self, a: &TypeRef, b: &RuntimeType) -> bool {
        self.guarded(|s| {
            let projected = s.project_type_ref(a);
            let a = projected.as_deref().unwrap_or(a);
            if s.type_ref_is_global(a) {
                return false;
            }
            let RuntimeType::Definition(def) = b else {
                return false;
            };
            if !s.type_names_eq(&a.name, &b.name()) || !s.runtime_namespaces_eq(&a.namespace, b) {
                return false;
            }

            let scope = &a.resolution_scope;
            if let ResolutionScope::TypeRef(outer) = scope {
                return match def.declaring_type.as_deref() {
                    Some(b_outer) => s.type_ref_runtime_eq(outer, b_outer),
                    None => false,
                };
            }
            if b.is_nested() {
                return false;
            }
            if s.cmp.options.dont_compare_type_scope() {
                return true;
            }

            let b_module = &def.module;
            if let Some(module) = ModuleScope::of(scope) {
                let owners_equal = (s.core_library_is_special()
                    && module.is_core_library()
                    && b_module.is_core_library())
                    || names_equal(true, module.name(), &b_module.scope_name);
                if owners_equal && s.assembly_eq(a.definition_assembly(), runtime_assembly(b_module)) {
                    return true;
                }
                match s.resolve_type_ref(a) {
                    Some(resolved) => s.module_runtime_eq(resolved.module.as_deref(), b_module),
                    None => false,
                }
            } else if let ResolutionScope::AssemblyRef(assembly) = scope {
                if s.assembly_eq(named(assembly), runtime_assembly(b_module)) {
                    return true;
                }
                match s.resolve_type_ref(a) {
                    Some(resolved) => s.assembly_eq(definition_assembly(&resolved), runtime_assembly(b_module)),
                    None => false,
                }
            } else {
                false
            }
        })
    }

    fn exported_type_runtime_eq(&mut self, a: &ExportedType, b: &RuntimeType) -> bool {
        self.guarded(|s| {
            let projected = s.project_exported_type(a);
            let a = projected.as_deref().unwrap_or(a);
            if s.exported_type_is_global(a) {
                return false;
            }
            let RuntimeType::Definition(def) = b else {
                return false;
            };
            if !s.type_names_eq(&a.name, &b.name()) || !s.runtime_namespaces_eq(&a.namespace, b) {
                return false;
            }

            let implementation = &a.implementation;
            if let Implementation::ExportedType(outer) = implementation {
                return match def.declaring_type.as_deref() {
                    Some(b_outer) => s.exported_type_runtime_eq(outer, b_outer),
                    None => false,
                };
            }
            if b.is_nested() {
                return false;
            }
            if s.cmp.options.dont_compare_type_scope() {
                return true;
            }

            let b_module = &def.module;
            let found = match implementation {
                Implementation::File(file) => {
                    names_equal(true, &file.name, &b_module.name)
                        && s.assembly_eq(a.definition_assembly(), runtime_assembly(b_module))
                }
                Implementation::AssemblyRef(assembly) => {
                    s.assembly_eq(named(assembly), runtime_assembly(b_module))
                }
                _ => return false,
            };
            found || match s.resolve_exported_type(a) {
                Some(resolved) => s.module_runtime_eq(resolved.module.as_deref(), b_module),
                None => false,
            }
        })
    }

    /// Compares a signature tree against a runtime type. `declaring` is the declaring type
    /// of the member whose signature this is.
    fn sig_runtime_eq(
        &mut self,
        a: &TypeSignature,
        b: Option<&RuntimeType>,
        declaring: Option<&RuntimeType>,
        treat: Option<bool>,
    ) -> bool {
        let Some(b) = b else {
            return false;
        };

        self.guarded(|s| {
            let substituted = if s.cmp.substitute_generics && !s.generics.is_empty() {
                s.generics.resolve(a)
            } else {
                None
            };
            let a = substituted.as_ref().unwrap_or(a);
            let treat = treat_as_generic_instance(declaring, b, treat);

            match (a, b) {
                (TypeSignature::I, RuntimeType::FunctionPointer) => true,
                (TypeSignature::FnPtr(_), b) => {
                    b.is_system_intptr() || matches!(b, RuntimeType::FunctionPointer)
                }
                (TypeSignature::Ptr(next), RuntimeType::Pointer(element))
                | (TypeSignature::ByRef(next), RuntimeType::ByRef(element))
                | (TypeSignature::SzArray(next), RuntimeType::SzArray(element)) => {
                    s.element_runtime_eq(next, element, declaring)
                }
                (TypeSignature::Array(array), RuntimeType::Array { element, rank }) => {
                    array.rank == *rank && s.element_runtime_eq(&array.base, element, declaring)
                }
                (
                    TypeSignature::ModifiedRequired(modifier)
                    | TypeSignature::ModifiedOptional(modifier),
                    b,
                ) => s.sig_runtime_eq(&modifier.base, Some(b), declaring, Some(treat)),
                (TypeSignature::Pinned(next), b) => {
                    s.sig_runtime_eq(next, Some(b), declaring, Some(treat))
                }
                (TypeSignature::Class(ty) | TypeSignature::ValueType(ty), b) => match TypeView::from(ty) {
                    TypeView::TypeSpec(spec) => {
                        s.sig_runtime_eq(&spec.signature, Some(b), declaring, Some(treat))
                    }
                    view => !treat && s.type_runtime_eq(view, Some(b)),
                },
                (
                    TypeSignature::GenericParamType(number),
                    RuntimeType::GenericParameter {
                        position,
                        declaring_method: false,
                    },
                )
                | (
                    TypeSignature::GenericParamMethod(number),
                    RuntimeType::GenericParameter {
                        position,
                        declaring_method: true,
                    },
                ) => number == position,
                (TypeSignature::GenericInst(instance), b) => {
                    let (definition, arguments) = match b {
                        _ if treat => (b, b.generic_arguments()),
                        RuntimeType::GenericInstance {
                            definition,
                            arguments,
                        } => (definition.as_ref(), arguments.as_slice()),
                        _ => return false,
                    };
                    s.sig_runtime_eq(&instance.generic_type, Some(definition), None, Some(false))
                        && s.sig_list_runtime_eq(&instance.generic_args, arguments)
                }
                (leaf, b) => leaf
                    .element_type()
                    .core_library_name()
                    .is_some_and(|name| !treat && s.runtime_core_type_eq(b, name)),
            }
        })
    }

    /// The element of a pointer, reference or array. A function pointer element is
    /// matched by kind only, reflection knows nothing more about it.
    fn element_runtime_eq(
        &mut self,
        a: &TypeSignature,
        b: &RuntimeType,
        declaring: Option<&RuntimeType>,
    ) -> bool {
        if matches!(b, RuntimeType::FunctionPointer) {
            return matches!(a.remove_modifiers(), TypeSignature::FnPtr(_));
        }
        self.sig_runtime_eq(a, Some(b), declaring, None)
    }

    fn sig_list_runtime_eq(&mut self, a: &[TypeSignature], b: &[RuntimeTypeRc]) -> bool {
        a.len() == b.len()
            && a
                .iter()
                .zip(b)
                .all(|(a, b)| self.sig_runtime_eq(a, Some(b), None, None))
    }

    /// Modifier lists in the order reflection reports them, innermost first
    fn modifiers_runtime_eq(&mut self, a: &[TypeView<'_>], b: &[RuntimeTypeRc]) -> bool {
        a.len() == b.len()
            && a
                .iter()
                .rev()
                .zip(b)
                .all(|(a, b)| self.type_runtime_eq(*a, Some(b)))
    }

    /// A parameter, field or property type together with its custom modifiers
    fn typed_runtime_eq(
        &mut self,
        a: &TypeSignature,
        b: &RuntimeType,
        required: &[RuntimeTypeRc],
        optional: &[RuntimeTypeRc],
        declaring: Option<&RuntimeType>,
    ) -> bool {
        if !self.cmp.options.ignore_modifiers() {
            let (a_required, a_optional) = modifiers_of(a);
            if !self.modifiers_runtime_eq(&a_required, required)
                || !self.modifiers_runtime_eq(&a_optional, optional)
            {
                return false;
            }
        }
        self.sig_runtime_eq(a.remove_modifiers(), Some(b), declaring, None)
    }

    /// The owner of a member against the declaring type reported by reflection, `None`
    /// for global members
    fn declaring_runtime_eq(&mut self, a: Option<&TypeDef>, b: Option<&RuntimeType>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), b) => self.type_def_runtime_eq(a, b),
            (None, Some(_)) => false,
        }
    }

    fn parent_runtime_eq(
        &mut self,
        a: &MemberRefParent,
        b: Option<&RuntimeType>,
        b_module: &RuntimeModule,
    ) -> bool {
        self.guarded(|s| match a {
            MemberRefParent::TypeDef(def) => s.type_def_runtime_eq(def, b),
            MemberRefParent::TypeRef(reference) => {
                b.is_some_and(|b| s.type_ref_runtime_eq(reference, b))
            }
            MemberRefParent::TypeSpec(spec) => s.sig_runtime_eq(&spec.signature, b, None, None),
            MemberRefParent::ModuleRef(module_ref) => {
                b.is_none()
                    && s.module_scope_eq_runtime(ModuleScope::ModuleRef(module_ref), b_module)
                    && s.assembly_eq(
                        module_ref.module.as_deref().and_then(module_assembly),
                        runtime_assembly(b_module),
                    )
            }
            MemberRefParent::MethodDef(method) => {
                s.declaring_runtime_eq(method.declaring_type.as_deref(), b)
            }
            MemberRefParent::None => false,
        })
    }

    fn module_scope_eq_runtime(&self, a: ModuleScope<'_>, b: &RuntimeModule) -> bool {
        (self.core_library_is_special() && a.is_core_library() && b.is_core_library())
            || names_equal(true, a.name(), &b.scope_name)
    }

    /// The calling convention flags reflection knows about must match. A vararg method
    /// must be a vararg method on both sides.
    fn calling_convention_runtime_eq(&self, a: CallingConvention, b: &RuntimeMethod) -> bool {
        let flags = CallingConvention::GENERIC | CallingConvention::HAS_THIS | CallingConvention::EXPLICIT_THIS;
        let vararg = matches!(
            a.kind(),
            CallingConvention::VARARG | CallingConvention::NATIVE_VARARG
        );
        (a.value() & flags) == runtime_calling_convention(b)
            && vararg == b.calling_convention.contains(RuntimeCallingConventions::VAR_ARGS)
    }

    fn method_sig_runtime_eq(&mut self, a: &SignatureMethod, b: &RuntimeMethod) -> bool {
        self.guarded(|s| {
            let declaring = b.declaring_type.as_deref();
            let return_equal = s.cmp.options.dont_compare_return_type()
                || match &b.return_parameter {
                    Some(ret) => s.typed_runtime_eq(
                        &a.return_type,
                        &ret.parameter_type,
                        &ret.required_modifiers,
                        &ret.optional_modifiers,
                        declaring,
                    ),
                    None => matches!(a.return_type.remove_modifiers(), TypeSignature::Void),
                };

            s.calling_convention_runtime_eq(a.calling_convention, b)
                && return_equal
                && (!s.cmp.compare_method_params
                    || (a.params.len() == b.parameters.len()
                        && a.params.iter().zip(&b.parameters).all(|(a, param)| {
                            s.typed_runtime_eq(
                                a,
                                &param.parameter_type,
                                &param.required_modifiers,
                                &param.optional_modifiers,
                                declaring,
                            )
                        })))
                && (!a.is_generic() || a.param_count_generic as usize == b.generic_arguments.len())
        })
    }

    pub(crate) fn method_entity_runtime_eq(&mut self, a: &MethodEntity, b: &RuntimeMethod) -> bool {
        match a {
            MethodEntity::MethodDef(method) => self.method_def_runtime_eq(method, b),
            MethodEntity::MemberRef(member) => self.member_ref_method_runtime_eq(member, b),
            MethodEntity::MethodSpec(spec) => self.method_spec_runtime_eq(spec, b),
        }
    }

    pub(crate) fn method_def_or_ref_runtime_eq(&mut self, a: &MethodDefOrRef, b: &RuntimeMethod) -> bool {
        match a {
            MethodDefOrRef::MethodDef(method) => self.method_def_runtime_eq(method, b),
            MethodDefOrRef::MemberRef(member) => self.member_ref_method_runtime_eq(member, b),
        }
    }

    pub(crate) fn method_def_runtime_eq(&mut self, a: &Method, b: &RuntimeMethod) -> bool {
        self.guarded(|s| {
            if let Some(projected) = s.project_method(a) {
                return s.member_ref_method_runtime_eq(&projected, b);
            }
            let b = s.runtime_method_definition(b);

            s.method_field_names_eq(&a.name, &b.name)
                && a.signature.is_generic() == b.is_generic_method()
                && s.method_sig_runtime_eq(&a.signature, &b)
                && (!s.cmp.options.compare_method_field_declaring_type()
                    || s.declaring_runtime_eq(a.declaring_type.as_deref(), b.declaring_type.as_deref()))
        })
    }

    pub(crate) fn member_ref_method_runtime_eq(&mut self, a: &MemberRef, b: &RuntimeMethod) -> bool {
        self.guarded(|s| {
            let projected = s.project_member_ref(a);
            let a = projected.as_deref().unwrap_or(a);
            let Some(sig) = a.signature.as_method() else {
                return false;
            };

            if b.is_generic_instance() {
                // Only the open form `M<!!0, ...>` of a generic method reference matches an
                // instantiation reported by reflection
                let Some(definition) = b.definition.as_deref() else {
                    return false;
                };
                let child = s.generic_definition_comparer();
                return sig.is_generic()
                    && s.with_comparer(child, |s| s.member_ref_method_runtime_eq(a, definition))
                    && (!s.cmp.options.compare_method_field_declaring_type()
                        || s.parent_runtime_eq(&a.class, b.declaring_type.as_deref(), &b.module))
                    && sig.param_count_generic as usize == b.generic_arguments.len()
                    && b.generic_arguments.iter().all(|argument| {
                        matches!(
                            argument.as_ref(),
                            RuntimeType::GenericParameter {
                                declaring_method: true,
                                ..
                            }
                        )
                    });
            }

            let b = s.runtime_method_definition(b);
            let declaring = s.cmp.options.compare_method_field_declaring_type();
            if !s.method_field_names_eq(&a.name, &b.name) || sig.is_generic() != b.is_generic_method() {
                return false;
            }
            let instance_args = generic_instance_args(&a.class)
                .filter(|_| declaring && s.cmp.substitute_generics);
            let signatures_equal = match instance_args {
                Some(arguments) => s.with_type_args(arguments, |s| s.method_sig_runtime_eq(sig, &b)),
                None => s.method_sig_runtime_eq(sig, &b),
            };
            signatures_equal
                && (!declaring || s.parent_runtime_eq(&a.class, b.declaring_type.as_deref(), &b.module))
        })
    }

    pub(crate) fn method_spec_runtime_eq(&mut self, a: &MethodSpec, b: &RuntimeMethod) -> bool {
        if !b.is_generic_instance() {
            return false;
        }
        let Some(definition) = b.definition.as_deref() else {
            return false;
        };

        self.guarded(|s| {
            let child = s.generic_definition_comparer();
            s.with_comparer(child, |s| s.method_def_or_ref_runtime_eq(&a.method, definition))
                && (!s.cmp.options.compare_method_field_declaring_type()
                    || match &a.method {
                        MethodDefOrRef::MethodDef(method) => s.declaring_runtime_eq(
                            method.declaring_type.as_deref(),
                            b.declaring_type.as_deref(),
                        ),
                        MethodDefOrRef::MemberRef(member) => {
                            s.parent_runtime_eq(&member.class, b.declaring_type.as_deref(), &b.module)
                        }
                    })
                && s.sig_list_runtime_eq(&a.instantiation.generic_args, &b.generic_arguments)
        })
    }

    pub(crate) fn field_entity_runtime_eq(&mut self, a: &FieldEntity, b: &RuntimeField) -> bool {
        match a {
            FieldEntity::Field(field) => self.field_def_runtime_eq(field, b),
            FieldEntity::MemberRef(member) => self.member_ref_field_runtime_eq(member, b),
        }
    }

    fn field_type_runtime_eq(&mut self, a: &TypeSignature, b: &RuntimeField) -> bool {
        self.typed_runtime_eq(
            a,
            &b.field_type,
            &b.required_modifiers,
            &b.optional_modifiers,
            b.declaring_type.as_deref(),
        )
    }

    pub(crate) fn field_def_runtime_eq(&mut self, a: &Field, b: &RuntimeField) -> bool {
        self.guarded(|s| {
            let b = s.runtime_field_definition(b);
            s.method_field_names_eq(&a.name, &b.name)
                && s.field_type_runtime_eq(&a.signature.base, b)
                && (!s.cmp.options.compare_method_field_declaring_type()
                    || s.declaring_runtime_eq(a.declaring_type.as_deref(), b.declaring_type.as_deref()))
        })
    }

    pub(crate) fn member_ref_field_runtime_eq(&mut self, a: &MemberRef, b: &RuntimeField) -> bool {
        self.guarded(|s| {
            let projected = s.project_member_ref(a);
            let a = projected.as_deref().unwrap_or(a);
            let Some(sig) = a.signature.as_field() else {
                return false;
            };
            let b = s.runtime_field_definition(b);
            let declaring = s.cmp.options.compare_method_field_declaring_type();

            let instance_args = generic_instance_args(&a.class)
                .filter(|_| declaring && s.cmp.substitute_generics);
            let types_equal = match instance_args {
                Some(arguments) => {
                    s.with_type_args(arguments, |s| s.field_type_runtime_eq(&sig.base, b))
                }
                None => s.field_type_runtime_eq(&sig.base, b),
            };
            s.method_field_names_eq(&a.name, &b.name)
                && types_equal
                && (!declaring || s.parent_runtime_eq(&a.class, b.declaring_type.as_deref(), &b.module))
        })
    }

    pub(crate) fn property_runtime_eq(&mut self, a: &Property, b: &RuntimeProperty) -> bool {
        self.guarded(|s| {
            s.property_names_eq(&a.name, &b.name)
                && a.signature.as_ref().is_some_and(|sig| {
                    s.typed_runtime_eq(
                        &sig.return_type,
                        &b.property_type,
                        &b.required_modifiers,
                        &b.optional_modifiers,
                        b.declaring_type.as_deref(),
                    )
                })
                && (!s.cmp.options.compare_property_declaring_type()
                    || s.declaring_runtime_eq(a.declaring_type.as_deref(), b.declaring_type.as_deref()))
        })
    }

    pub(crate) fn event_runtime_eq(&mut self, a: &Event, b: &RuntimeEvent) -> bool {
        self.guarded(|s| {
            s.event_names_eq(&a.name, &b.name)
                && a
                    .event_type
                    .as_ref()
                    .is_some_and(|ty| s.type_runtime_eq(ty.into(), Some(&b.event_handler_type)))
                && (!s.cmp.options.compare_event_declaring_type()
                    || s.declaring_runtime_eq(a.declaring_type.as_deref(), b.declaring_type.as_deref()))
        })
    }

    /// Hashes a runtime type the way the metadata representations of the same type hash.
    /// `None` is the missing declaring type of a global member.
    pub(crate) fn runtime_type_hash(&mut self, b: Option<&RuntimeType>) -> i32 {
        self.runtime_type_hash_in(b, None, None)
    }

    fn runtime_type_hash_in(
        &mut self,
        b: Option<&RuntimeType>,
        declaring: Option<&RuntimeType>,
        treat: Option<bool>,
    ) -> i32 {
        let Some(b) = b else {
            return GLOBAL_TYPE;
        };

        self.guarded(|s| {
            let instance = if treat_as_generic_instance(declaring, b, treat) {
                Some((b, b.generic_arguments()))
            } else if let RuntimeType::GenericInstance {
                definition,
                arguments,
            } = b
            {
                Some((definition.as_ref(), arguments.as_slice()))
            } else {
                None
            };
            if let Some((definition, arguments)) = instance {
                let arguments: Vec<i32> = arguments
                    .iter()
                    .map(|argument| s.runtime_type_hash_in(Some(argument), None, None))
                    .collect();
                return ET_GENERICINST
                    .wrapping_add(s.runtime_type_hash_in(Some(definition), None, Some(false)))
                    .wrapping_add(list_hash(arguments));
            }

            match b {
                RuntimeType::Definition(def) => {
                    let scope = if def.declaring_type.is_some() {
                        NESTED_TYPE
                    } else {
                        s.type_namespace_hash(&def.namespace)
                    };
                    s.type_name_hash(&b.name()).wrapping_add(scope)
                }
                RuntimeType::Pointer(element) => {
                    ET_PTR.wrapping_add(s.runtime_type_hash_in(Some(element), declaring, None))
                }
                RuntimeType::ByRef(element) => {
                    ET_BYREF.wrapping_add(s.runtime_type_hash_in(Some(element), declaring, None))
                }
                RuntimeType::SzArray(element) => {
                    ET_SZARRAY.wrapping_add(s.runtime_type_hash_in(Some(element), declaring, None))
                }
                RuntimeType::Array { element, rank } => ET_ARRAY
                    .wrapping_add(*rank as i32)
                    .wrapping_add(s.runtime_type_hash_in(Some(element), declaring, None)),
                RuntimeType::GenericParameter {
                    position,
                    declaring_method: false,
                } => ET_VAR.wrapping_add(*position as i32),
                RuntimeType::GenericParameter {
                    position,
                    declaring_method: true,
                } => ET_MVAR.wrapping_add(*position as i32),
                RuntimeType::FunctionPointer => s.intptr_hash(),
                RuntimeType::GenericInstance { .. } => 0,
            }
        })
    }

    fn runtime_declaring_hash(&mut self, declaring: Option<&RuntimeTypeRc>) -> i32 {
        self.runtime_type_hash(declaring.map(|declaring| &**declaring))
    }

    pub(crate) fn runtime_method_hash(&mut self, b: &RuntimeMethod) -> i32 {
        self.guarded(|s| {
            let b = s.runtime_method_definition(b);
            let declaring = b.declaring_type.as_deref();

            let mut hash = s
                .method_field_name_hash(&b.name)
                .wrapping_add(i32::from(runtime_calling_convention(&b)));
            if s.cmp.compare_method_params {
                let params: Vec<i32> = b
                    .parameters
                    .iter()
                    .map(|param| s.runtime_type_hash_in(Some(&param.parameter_type), declaring, None))
                    .collect();
                hash = hash.wrapping_add(list_hash(params));
            }
            if !s.cmp.options.dont_compare_return_type() {
                let return_hash = match &b.return_parameter {
                    Some(ret) => s.runtime_type_hash_in(Some(&ret.parameter_type), declaring, None),
                    None => s.core_library_type_hash("Void"),
                };
                hash = hash.wrapping_add(return_hash);
            }
            if b.is_generic_method() {
                hash = hash.wrapping_add(method_generic_count_hash(b.generic_arguments.len()));
            }
            if s.cmp.options.compare_method_field_declaring_type() {
                hash = hash.wrapping_add(s.runtime_declaring_hash(b.declaring_type.as_ref()));
            }
            hash
        })
    }

    pub(crate) fn runtime_field_hash(&mut self, b: &RuntimeField) -> i32 {
        self.guarded(|s| {
            let b = s.runtime_field_definition(b);
            let mut hash = s.method_field_name_hash(&b.name).wrapping_add(s.runtime_type_hash_in(
                Some(&b.field_type),
                b.declaring_type.as_deref(),
                None,
            ));
            if s.cmp.options.compare_method_field_declaring_type() {
                hash = hash.wrapping_add(s.runtime_declaring_hash(b.declaring_type.as_ref()));
            }
            hash
        })
    }

    pub(crate) fn runtime_property_hash(&mut self, b: &RuntimeProperty) -> i32 {
        self.guarded(|s| {
            let mut hash = s.property_name_hash(&b.name).wrapping_add(s.runtime_type_hash_in(
                Some(&b.property_type),
                b.declaring_type.as_deref(),
                None,
            ));
            if s.cmp.options.compare_property_declaring_type() {
                hash = hash.wrapping_add(s.runtime_declaring_hash(b.declaring_type.as_ref()));
            }
            hash
        })
    }

    pub(crate) fn runtime_event_hash(&mut self, b: &RuntimeEvent) -> i32 {
        self.guarded(|s| {
            let mut hash = s
                .event_name_hash(&b.name)
                .wrapping_add(s.runtime_type_hash(Some(&b.event_handler_type)));
            if s.cmp.options.compare_event_declaring_type() {
                hash = hash.wrapping_add(s.runtime_declaring_hash(b.declaring_type.as_ref()));
            }
            hash
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        comparer::{SigComparer, SigComparerOptions},
        metadata::{
            members::FieldEntity,
            signatures::{CallingConventionSignature, SignatureField, SignatureMethod, TypeSignature},
            tables::{AssemblyVersion, MemberRef, TypeRef, TypeSpec},
            typesystem::{MemberRefParent, ResolutionScope, TypeDefOrRef},
        },
        runtime::{
            RuntimeAssembly, RuntimeField, RuntimeMethod, RuntimeModule, RuntimeModuleRc,
            RuntimeParameter, RuntimeType, RuntimeTypeRc,
        },
        test::{class_sig, create_field, create_method, create_module, create_type_def},
    };

    fn runtime_module(file: &str, assembly: &str) -> RuntimeModuleRc {
        let assembly = Arc::new(RuntimeAssembly::new(assembly, AssemblyVersion::new(1, 0, 0, 0)));
        Arc::new(RuntimeModule::new(file, assembly))
    }

    fn runtime_corlib() -> RuntimeModuleRc {
        runtime_module("System.Private.CoreLib.dll", "System.Private.CoreLib")
    }

    fn runtime_int32() -> RuntimeTypeRc {
        Arc::new(RuntimeType::definition("System", "Int32", runtime_corlib()))
    }

    #[test]
    fn test_field_of_generic_instance() {
        let lib = create_module("Lib.dll", "Lib");
        let boxed = create_type_def(2, "N", "Box`1", &lib);
        let field = create_field(1, "Value", TypeSignature::GenericParamType(0), &boxed);
        let instance = Arc::new(TypeSpec::new(
            1,
            TypeSignature::generic_inst(class_sig(boxed.clone()), vec![TypeSignature::I4]),
        ));
        let reference = MemberRef::new(
            1,
            "Value",
            MemberRefParent::TypeSpec(instance),
            CallingConventionSignature::Field(SignatureField::new(TypeSignature::GenericParamType(0))),
        );

        let rt_lib = runtime_module("Lib.dll", "Lib");
        let rt_box = Arc::new(RuntimeType::generic_definition("N", "Box`1", rt_lib.clone(), 1));
        let rt_closed = Arc::new(RuntimeType::instantiate(&rt_box, vec![runtime_int32()]));
        let rt_definition = Arc::new(RuntimeField::new(
            "Value",
            Some(rt_box.clone()),
            rt_lib.clone(),
            rt_box.generic_arguments()[0].clone(),
        ));
        let rt_field = RuntimeField::new("Value", Some(rt_closed), rt_lib, runtime_int32())
            .with_definition(rt_definition);

        for options in [
            SigComparerOptions::COMPARE_METHOD_FIELD_DECLARING_TYPE,
            SigComparerOptions::empty(),
        ] {
            let comparer = SigComparer::new(options);
            assert!(comparer.equals_runtime(&reference, &rt_field), "{options:?}");
            assert_eq!(comparer.hash(&reference), comparer.runtime_hash(&rt_field), "{options:?}");
        }

        // Without declaring types the field definition matches the instantiated runtime field
        let comparer = SigComparer::new(SigComparerOptions::empty());
        assert!(comparer.equals_runtime(&*field, &rt_field));
        assert_eq!(comparer.hash(&*field), comparer.runtime_hash(&rt_field));

        let entity = FieldEntity::MemberRef(Arc::new(reference));
        assert!(comparer.equals_runtime(&entity, &rt_field));
    }

    #[test]
    fn test_types() {
        let lib = create_module("Lib.dll", "Lib");
        let def = create_type_def(2, "N", "Foo", &lib);
        let rt_lib = runtime_module("Lib.dll", "Lib");
        let rt_foo = RuntimeType::definition("N", "Foo", rt_lib.clone());
        let rt_other = RuntimeType::definition("N", "Foo", runtime_module("Other.dll", "Other"));

        let comparer = SigComparer::new(SigComparerOptions::empty());
        assert!(comparer.equals_runtime(&*def, &rt_foo));
        assert!(!comparer.equals_runtime(&*def, &rt_other));
        assert_eq!(comparer.hash(&*def), comparer.runtime_hash(&rt_foo));

        let relaxed = SigComparer::new(SigComparerOptions::DONT_COMPARE_TYPE_SCOPE);
        assert!(relaxed.equals_runtime(&*def, &rt_other));

        let array = TypeSignature::sz_array(TypeSignature::I4);
        let rt_array = RuntimeType::SzArray(runtime_int32());
        assert!(comparer.equals_runtime(&array, &rt_array));
        assert_eq!(comparer.hash(&array), comparer.runtime_hash(&rt_array));
        assert!(!comparer.equals_runtime(&TypeSignature::sz_array(TypeSignature::U4), &rt_array));

        let escaped = RuntimeType::definition("N", r"Odd\+Name", rt_lib);
        let odd = create_type_def(3, "N", "Odd+Name", &lib);
        assert!(comparer.equals_runtime(&*odd, &escaped));
        assert_eq!(comparer.hash(&*odd), comparer.runtime_hash(&escaped));
    }

    #[test]
    fn test_global_type_against_runtime() {
        let lib = create_module("Lib.dll", "Lib");
        let global = create_type_def(1, "", "<Module>", &lib);
        let global_ref = Arc::new(TypeRef::new(1, "", "<Module>", ResolutionScope::Module(lib.clone())));
        let rt_global = RuntimeType::definition("", "<Module>", runtime_module("Lib.dll", "Lib"));

        let comparer = SigComparer::new(
            SigComparerOptions::TYPE_REF_CAN_REFERENCE_GLOBAL_TYPE
                | SigComparerOptions::CASE_INSENSITIVE_ALL,
        );
        // The global type only stands for a missing runtime declaring type
        assert!(!comparer.equals_runtime(&*global, &rt_global));
        assert!(!comparer.equals_runtime(&*global_ref, &rt_global));
        assert_eq!(comparer.hash(&*global), comparer.hash(&*global_ref));
    }

    #[test]
    fn test_function_pointers() {
        let fn_ptr = TypeSignature::fn_ptr(SignatureMethod::new_static(TypeSignature::Void, vec![]));
        let rt_intptr = RuntimeType::definition("System", "IntPtr", runtime_corlib());
        let comparer = SigComparer::new(SigComparerOptions::empty());

        assert!(comparer.equals_runtime(&fn_ptr, &rt_intptr));
        assert!(comparer.equals_runtime(&fn_ptr, &RuntimeType::FunctionPointer));
        assert_eq!(comparer.hash(&fn_ptr), comparer.runtime_hash(&rt_intptr));

        let pointer = TypeSignature::ptr(fn_ptr);
        let rt_pointer = RuntimeType::Pointer(Arc::new(RuntimeType::FunctionPointer));
        assert!(comparer.equals_runtime(&pointer, &rt_pointer));
        assert!(!comparer.equals_runtime(&TypeSignature::ptr(TypeSignature::I), &rt_pointer));
        assert_eq!(comparer.hash(&pointer), comparer.runtime_hash(&rt_pointer));
    }

    #[test]
    fn test_methods() {
        let lib = create_module("Lib.dll", "Lib");
        let foo = create_type_def(2, "N", "Foo", &lib);
        let method = create_method(
            1,
            "Add",
            SignatureMethod::new_instance(TypeSignature::Void, vec![TypeSignature::I4]),
            &foo,
        );

        let rt_lib = runtime_module("Lib.dll", "Lib");
        let rt_foo = Arc::new(RuntimeType::definition("N", "Foo", rt_lib.clone()));
        let rt_void = Arc::new(RuntimeType::definition("System", "Void", runtime_corlib()));
        let rt_method = RuntimeMethod::new(
            "Add",
            Some(rt_foo.clone()),
            rt_lib.clone(),
            Some(RuntimeParameter::new(rt_void.clone())),
            vec![RuntimeParameter::new(runtime_int32())],
        )
        .with_this();
        let rt_static = RuntimeMethod::new(
            "Add",
            Some(rt_foo),
            rt_lib,
            Some(RuntimeParameter::new(rt_void)),
            vec![RuntimeParameter::new(runtime_int32())],
        );

        let comparer = SigComparer::new(SigComparerOptions::COMPARE_DECLARING_TYPES);
        assert!(comparer.equals_runtime(&*method, &rt_method));
        assert!(!comparer.equals_runtime(&*method, &rt_static));
        assert_eq!(comparer.hash(&*method), comparer.runtime_hash(&rt_method));

        let entity = crate::metadata::members::MethodEntity::MethodDef(method.clone());
        assert!(comparer.equals_runtime(&entity, &rt_method));
    }

    #[test]
    fn test_generic_type_definition_inside_itself() {
        let lib = create_module("Lib.dll", "Lib");
        let list = create_type_def(2, "N", "List`1", &lib);
        let self_instance = TypeSignature::generic_inst(
            class_sig(TypeDefOrRef::TypeDef(list.clone())),
            vec![TypeSignature::GenericParamType(0)],
        );
        let method = create_method(
            1,
            "Clone",
            SignatureMethod::new_instance(self_instance, vec![]),
            &list,
        );

        let rt_lib = runtime_module("Lib.dll", "Lib");
        let rt_list = Arc::new(RuntimeType::generic_definition("N", "List`1", rt_lib.clone(), 1));
        let rt_method = RuntimeMethod::new(
            "Clone",
            Some(rt_list.clone()),
            rt_lib,
            Some(RuntimeParameter::new(rt_list)),
            vec![],
        )
        .with_this();

        let comparer = SigComparer::new(SigComparerOptions::COMPARE_DECLARING_TYPES);
        assert!(comparer.equals_runtime(&*method, &rt_method));
        assert_eq!(comparer.hash(&*method), comparer.runtime_hash(&rt_method));
    }
}
