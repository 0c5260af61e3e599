use std::{borrow::Cow, sync::Arc};

use crate::metadata::tables::{is_core_library_name, AssemblyName, AssemblyVersion};

/// A reference to a `RuntimeAssembly`
pub type RuntimeAssemblyRc = Arc<RuntimeAssembly>;
/// A reference to a `RuntimeModule`
pub type RuntimeModuleRc = Arc<RuntimeModule>;
/// A reference to a `RuntimeType`
pub type RuntimeTypeRc = Arc<RuntimeType>;

/// A loaded assembly as reported by reflection
#[derive(Debug, Clone)]
pub struct RuntimeAssembly {
    /// The simple assembly name
    pub name: String,
    /// The assembly version
    pub version: AssemblyVersion,
    /// The culture, `None` for neutral assemblies
    pub culture: Option<String>,
    /// The public key token, `None` for assemblies without a strong name
    pub public_key_token: Option<u64>,
    /// Overrides the name based core library detection
    pub core_library: Option<bool>,
}

impl RuntimeAssembly {
    /// A culture-neutral assembly without strong name
    #[must_use]
    pub fn new(name: &str, version: AssemblyVersion) -> Self {
        RuntimeAssembly {
            name: name.to_string(),
            version,
            culture: None,
            public_key_token: None,
            core_library: None,
        }
    }

    /// Sets the public key token
    #[must_use]
    pub fn with_public_key_token(mut self, token: u64) -> Self {
        self.public_key_token = Some(token);
        self
    }

    /// Sets the culture
    #[must_use]
    pub fn with_culture(mut self, culture: &str) -> Self {
        self.culture = Some(culture.to_string());
        self
    }

    /// Marks the assembly as the runtime's core library, or explicitly not
    #[must_use]
    pub fn with_core_library(mut self, core_library: bool) -> Self {
        self.core_library = Some(core_library);
        self
    }
}

impl AssemblyName for RuntimeAssembly {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> AssemblyVersion {
        self.version
    }

    fn culture(&self) -> Option<&str> {
        self.culture.as_deref()
    }

    fn public_key_token(&self) -> Option<u64> {
        self.public_key_token
    }

    fn is_core_library(&self) -> bool {
        self.core_library
            .unwrap_or_else(|| is_core_library_name(&self.name, self.culture.as_deref()))
    }
}

/// A loaded module as reported by reflection
#[derive(Debug, Clone)]
pub struct RuntimeModule {
    /// The file name of the module
    pub name: String,
    /// The module name stored in its metadata
    pub scope_name: String,
    /// The assembly the module belongs to
    pub assembly: RuntimeAssemblyRc,
    /// True for the manifest module of the assembly
    pub is_manifest: bool,
}

impl RuntimeModule {
    /// The manifest module of `assembly`, using `name` as both file and scope name
    #[must_use]
    pub fn new(name: &str, assembly: RuntimeAssemblyRc) -> Self {
        RuntimeModule {
            name: name.to_string(),
            scope_name: name.to_string(),
            assembly,
            is_manifest: true,
        }
    }

    /// True if this is the manifest module of the runtime's core library
    #[must_use]
    pub fn is_core_library(&self) -> bool {
        self.is_manifest && self.assembly.is_core_library()
    }
}

/// A named type as reported by reflection: a non-generic type or a generic type definition
#[derive(Debug, Clone)]
pub struct RuntimeTypeDefinition {
    /// The type name, possibly with reflection escapes
    pub name: String,
    /// The namespace, empty for nested types
    pub namespace: String,
    /// The enclosing type of a nested type
    pub declaring_type: Option<RuntimeTypeRc>,
    /// The module defining the type
    pub module: RuntimeModuleRc,
    /// The generic parameters of a generic type definition
    pub generic_parameters: Vec<RuntimeTypeRc>,
}

/// A type as reported by reflection.
///
/// Reflection always reports members of instantiated generic types with the type
/// arguments already substituted, so a closed `List<int>` appears as a
/// [`RuntimeType::GenericInstance`] whose methods take `int` where the definition takes `T`.
#[derive(Debug, Clone)]
pub enum RuntimeType {
    /// A named type or generic type definition
    Definition(RuntimeTypeDefinition),
    /// A closed (or partially open) instantiation of a generic type definition
    GenericInstance {
        /// The generic type definition
        definition: RuntimeTypeRc,
        /// The type arguments
        arguments: Vec<RuntimeTypeRc>,
    },
    /// An unmanaged pointer
    Pointer(RuntimeTypeRc),
    /// A managed reference
    ByRef(RuntimeTypeRc),
    /// A single-dimensional zero based array
    SzArray(RuntimeTypeRc),
    /// A general array
    Array {
        /// The element type
        element: RuntimeTypeRc,
        /// The rank
        rank: u32,
    },
    /// A generic parameter of a type or method
    GenericParameter {
        /// The parameter position
        position: u32,
        /// True for method generic parameters
        declaring_method: bool,
    },
    /// A function pointer, which reflection surfaces as `System.IntPtr`
    FunctionPointer,
}

impl RuntimeType {
    /// A top-level named type
    #[must_use]
    pub fn definition(namespace: &str, name: &str, module: RuntimeModuleRc) -> Self {
        RuntimeType::Definition(RuntimeTypeDefinition {
            name: name.to_string(),
            namespace: namespace.to_string(),
            declaring_type: None,
            module,
            generic_parameters: Vec::new(),
        })
    }

    /// A nested type inside `declaring_type`, defined in the same module
    ///
    /// Returns `None` if `declaring_type` is not a [`RuntimeType::Definition`].
    #[must_use]
    pub fn nested(name: &str, declaring_type: &RuntimeTypeRc) -> Option<Self> {
        let module = declaring_type.module()?.clone();
        Some(RuntimeType::Definition(RuntimeTypeDefinition {
            name: name.to_string(),
            namespace: String::new(),
            declaring_type: Some(declaring_type.clone()),
            module,
            generic_parameters: Vec::new(),
        }))
    }

    /// A generic type definition with `arity` type parameters
    #[must_use]
    pub fn generic_definition(
        namespace: &str,
        name: &str,
        module: RuntimeModuleRc,
        arity: u32,
    ) -> Self {
        RuntimeType::Definition(RuntimeTypeDefinition {
            name: name.to_string(),
            namespace: namespace.to_string(),
            declaring_type: None,
            module,
            generic_parameters: (0..arity)
                .map(|position| Arc::new(RuntimeType::type_parameter(position)))
                .collect(),
        })
    }

    /// A generic parameter of the declaring type
    #[must_use]
    pub fn type_parameter(position: u32) -> Self {
        RuntimeType::GenericParameter {
            position,
            declaring_method: false,
        }
    }

    /// A generic parameter of the declaring method
    #[must_use]
    pub fn method_parameter(position: u32) -> Self {
        RuntimeType::GenericParameter {
            position,
            declaring_method: true,
        }
    }

    /// Instantiates a generic type definition
    #[must_use]
    pub fn instantiate(definition: &RuntimeTypeRc, arguments: Vec<RuntimeTypeRc>) -> Self {
        RuntimeType::GenericInstance {
            definition: definition.clone(),
            arguments,
        }
    }

    /// The named part of this type, the generic type definition for instances
    #[must_use]
    pub fn as_definition(&self) -> Option<&RuntimeTypeDefinition> {
        match self {
            RuntimeType::Definition(def) => Some(def),
            RuntimeType::GenericInstance { definition, .. } => definition.as_definition(),
            _ => None,
        }
    }

    /// The type name with reflection escapes removed
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        self.as_definition()
            .map_or(Cow::Borrowed(""), |def| unescape_name(&def.name))
    }

    /// The namespace, empty for nested and constructed types
    #[must_use]
    pub fn namespace(&self) -> &str {
        self.as_definition().map_or("", |def| def.namespace.as_str())
    }

    /// The enclosing type of a nested type
    #[must_use]
    pub fn declaring_type(&self) -> Option<&RuntimeTypeRc> {
        self.as_definition()?.declaring_type.as_ref()
    }

    /// True if this is a nested type
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.declaring_type().is_some()
    }

    /// The module defining this type
    #[must_use]
    pub fn module(&self) -> Option<&RuntimeModuleRc> {
        self.as_definition().map(|def| &def.module)
    }

    /// True for plain named types and generic type definitions
    #[must_use]
    pub fn is_type_definition(&self) -> bool {
        matches!(self, RuntimeType::Definition(_))
    }

    /// True for generic type definitions
    #[must_use]
    pub fn is_generic_type_definition(&self) -> bool {
        matches!(self, RuntimeType::Definition(def) if !def.generic_parameters.is_empty())
    }

    /// True for instantiated generic types
    #[must_use]
    pub fn is_generic_instance(&self) -> bool {
        matches!(self, RuntimeType::GenericInstance { .. })
    }

    /// The element type of pointers, references and arrays
    #[must_use]
    pub fn element_type(&self) -> Option<&RuntimeTypeRc> {
        match self {
            RuntimeType::Pointer(element)
            | RuntimeType::ByRef(element)
            | RuntimeType::SzArray(element)
            | RuntimeType::Array { element, .. } => Some(element),
            _ => None,
        }
    }

    /// True if this type has an element type
    #[must_use]
    pub fn has_element_type(&self) -> bool {
        self.element_type().is_some()
    }

    /// The generic arguments of an instance, or the generic parameters of a definition
    #[must_use]
    pub fn generic_arguments(&self) -> &[RuntimeTypeRc] {
        match self {
            RuntimeType::GenericInstance { arguments, .. } => arguments,
            RuntimeType::Definition(def) => &def.generic_parameters,
            _ => &[],
        }
    }

    /// True if this is `System.IntPtr` of the core library
    #[must_use]
    pub fn is_system_intptr(&self) -> bool {
        match self {
            RuntimeType::Definition(def) => {
                def.declaring_type.is_none()
                    && def.namespace == "System"
                    && def.name == "IntPtr"
                    && def.module.assembly.is_core_library()
            }
            _ => false,
        }
    }

    /// True for `FnPtr*`, `FnPtr&`, `FnPtr[]` and `FnPtr[,]`, whose element is reported as
    /// `System.IntPtr`
    #[must_use]
    pub fn is_function_pointer_element(&self) -> bool {
        self.element_type()
            .is_some_and(|element| matches!(element.as_ref(), RuntimeType::FunctionPointer))
    }

    /// Replaces method generic parameters by `arguments`
    #[must_use]
    pub fn substitute_method_arguments(
        this: &RuntimeTypeRc,
        arguments: &[RuntimeTypeRc],
    ) -> RuntimeTypeRc {
        let substitute = |ty: &RuntimeTypeRc| Self::substitute_method_arguments(ty, arguments);
        match this.as_ref() {
            RuntimeType::GenericParameter {
                position,
                declaring_method: true,
            } => arguments
                .get(*position as usize)
                .cloned()
                .unwrap_or_else(|| this.clone()),
            RuntimeType::GenericInstance {
                definition,
                arguments: type_arguments,
            } => Arc::new(RuntimeType::GenericInstance {
                definition: definition.clone(),
                arguments: type_arguments.iter().map(substitute).collect(),
            }),
            RuntimeType::Pointer(element) => Arc::new(RuntimeType::Pointer(substitute(element))),
            RuntimeType::ByRef(element) => Arc::new(RuntimeType::ByRef(substitute(element))),
            RuntimeType::SzArray(element) => Arc::new(RuntimeType::SzArray(substitute(element))),
            RuntimeType::Array { element, rank } => Arc::new(RuntimeType::Array {
                element: substitute(element),
                rank: *rank,
            }),
            _ => this.clone(),
        }
    }
}

/// Removes the backslash escapes reflection adds to names containing `,`, `+`, `&`,
/// `*`, `[`, `]` or `\`
#[must_use]
pub fn unescape_name(name: &str) -> Cow<'_, str> {
    if !name.contains('\\') {
        return Cow::Borrowed(name);
    }

    let mut unescaped = String::with_capacity(name.len());
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                unescaped.push(escaped);
            }
        } else {
            unescaped.push(c);
        }
    }
    Cow::Owned(unescaped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corlib() -> RuntimeModuleRc {
        let assembly = Arc::new(RuntimeAssembly::new(
            "System.Private.CoreLib",
            AssemblyVersion::new(8, 0, 0, 0),
        ));
        Arc::new(RuntimeModule::new("System.Private.CoreLib.dll", assembly))
    }

    #[test]
    fn test_unescape_name() {
        assert_eq!(unescape_name("Plain"), "Plain");
        assert_eq!(unescape_name(r"A\,B\+C"), "A,B+C");
        assert_eq!(unescape_name(r"Back\\slash"), r"Back\slash");
        assert!(matches!(unescape_name("Plain"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_generic_definition_arguments() {
        let list = Arc::new(RuntimeType::generic_definition(
            "System.Collections.Generic",
            "List`1",
            corlib(),
            1,
        ));
        assert!(list.is_generic_type_definition());
        assert!(matches!(
            list.generic_arguments()[0].as_ref(),
            RuntimeType::GenericParameter {
                position: 0,
                declaring_method: false
            }
        ));

        let int = Arc::new(RuntimeType::definition("System", "Int32", corlib()));
        let closed = RuntimeType::instantiate(&list, vec![int]);
        assert!(closed.is_generic_instance());
        assert_eq!(closed.name(), "List`1");
        assert_eq!(closed.namespace(), "System.Collections.Generic");
    }

    #[test]
    fn test_nested_and_intptr() {
        let module = corlib();
        let outer = Arc::new(RuntimeType::definition("System", "Environment", module.clone()));
        let inner = RuntimeType::nested("SpecialFolder", &outer).unwrap();
        assert!(inner.is_nested());
        assert_eq!(inner.namespace(), "");

        let intptr = RuntimeType::definition("System", "IntPtr", module);
        assert!(intptr.is_system_intptr());
        assert!(!outer.is_system_intptr());

        let fn_ptr_array = RuntimeType::SzArray(Arc::new(RuntimeType::FunctionPointer));
        assert!(fn_ptr_array.is_function_pointer_element());
    }

    #[test]
    fn test_substitute_method_arguments() {
        let module = corlib();
        let int = Arc::new(RuntimeType::definition("System", "Int32", module));
        let param = Arc::new(RuntimeType::SzArray(Arc::new(RuntimeType::method_parameter(0))));
        let type_param = Arc::new(RuntimeType::type_parameter(0));

        let substituted = RuntimeType::substitute_method_arguments(&param, &[int.clone()]);
        let element = substituted.element_type().unwrap();
        assert!(Arc::ptr_eq(element, &int));

        let untouched = RuntimeType::substitute_method_arguments(&type_param, &[int]);
        assert!(Arc::ptr_eq(&untouched, &type_param));
    }
}
