use std::sync::Arc;

use bitflags::bitflags;

use crate::runtime::{RuntimeModuleRc, RuntimeType, RuntimeTypeRc};

/// A reference to a `RuntimeMethod`
pub type RuntimeMethodRc = Arc<RuntimeMethod>;
/// A reference to a `RuntimeField`
pub type RuntimeFieldRc = Arc<RuntimeField>;
/// A reference to a `RuntimeProperty`
pub type RuntimePropertyRc = Arc<RuntimeProperty>;
/// A reference to a `RuntimeEvent`
pub type RuntimeEventRc = Arc<RuntimeEvent>;

bitflags! {
    /// Calling conventions as reported by reflection
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RuntimeCallingConventions: u32 {
        /// The default managed calling convention
        const STANDARD = 0x0001;
        /// A vararg method
        const VAR_ARGS = 0x0002;
        /// Either calling convention
        const ANY = Self::STANDARD.bits() | Self::VAR_ARGS.bits();
        /// Instance method
        const HAS_THIS = 0x0020;
        /// The `this` parameter is explicit
        const EXPLICIT_THIS = 0x0040;
    }
}

/// A parameter (or return value) with its custom modifiers
#[derive(Debug, Clone)]
pub struct RuntimeParameter {
    /// The parameter type, modifiers removed
    pub parameter_type: RuntimeTypeRc,
    /// Required modifiers, innermost first
    pub required_modifiers: Vec<RuntimeTypeRc>,
    /// Optional modifiers, innermost first
    pub optional_modifiers: Vec<RuntimeTypeRc>,
}

impl RuntimeParameter {
    /// A parameter without modifiers
    #[must_use]
    pub fn new(parameter_type: RuntimeTypeRc) -> Self {
        RuntimeParameter {
            parameter_type,
            required_modifiers: Vec::new(),
            optional_modifiers: Vec::new(),
        }
    }

    /// Sets the required and optional modifiers
    #[must_use]
    pub fn with_modifiers(
        mut self,
        required: Vec<RuntimeTypeRc>,
        optional: Vec<RuntimeTypeRc>,
    ) -> Self {
        self.required_modifiers = required;
        self.optional_modifiers = optional;
        self
    }
}

/// A method or constructor as reported by reflection
#[derive(Debug, Clone)]
pub struct RuntimeMethod {
    /// The method name
    pub name: String,
    /// The declaring type, `None` for global methods
    pub declaring_type: Option<RuntimeTypeRc>,
    /// The module defining the method
    pub module: RuntimeModuleRc,
    /// The calling convention
    pub calling_convention: RuntimeCallingConventions,
    /// The method generic arguments, or its generic parameters for a generic method definition
    pub generic_arguments: Vec<RuntimeTypeRc>,
    /// True for generic method definitions
    pub is_generic_method_definition: bool,
    /// The parameters, with generic arguments of the declaring type substituted
    pub parameters: Vec<RuntimeParameter>,
    /// The return parameter, `None` for constructors
    pub return_parameter: Option<RuntimeParameter>,
    /// The method this one resolves to through its metadata token: the method as declared
    /// on the generic type definition, and the generic method definition. `None` if the
    /// method is its own definition.
    pub definition: Option<RuntimeMethodRc>,
}

impl RuntimeMethod {
    /// A non-generic method
    #[must_use]
    pub fn new(
        name: &str,
        declaring_type: Option<RuntimeTypeRc>,
        module: RuntimeModuleRc,
        return_parameter: Option<RuntimeParameter>,
        parameters: Vec<RuntimeParameter>,
    ) -> Self {
        RuntimeMethod {
            name: name.to_string(),
            declaring_type,
            module,
            calling_convention: RuntimeCallingConventions::STANDARD,
            generic_arguments: Vec::new(),
            is_generic_method_definition: false,
            parameters,
            return_parameter,
            definition: None,
        }
    }

    /// Makes this an instance method
    #[must_use]
    pub fn with_this(mut self) -> Self {
        self.calling_convention |= RuntimeCallingConventions::HAS_THIS;
        self
    }

    /// Sets the calling convention
    #[must_use]
    pub fn with_calling_convention(mut self, calling_convention: RuntimeCallingConventions) -> Self {
        self.calling_convention = calling_convention;
        self
    }

    /// Makes this a generic method definition with `arity` method type parameters
    #[must_use]
    pub fn with_generic_parameters(mut self, arity: u32) -> Self {
        self.generic_arguments = (0..arity)
            .map(|position| Arc::new(RuntimeType::method_parameter(position)))
            .collect();
        self.is_generic_method_definition = arity > 0;
        self
    }

    /// Sets the token-resolved definition
    #[must_use]
    pub fn with_definition(mut self, definition: RuntimeMethodRc) -> Self {
        self.definition = Some(definition);
        self
    }

    /// True for generic method definitions and instantiations
    #[must_use]
    pub fn is_generic_method(&self) -> bool {
        !self.generic_arguments.is_empty()
    }

    /// True for instantiated generic methods
    #[must_use]
    pub fn is_generic_instance(&self) -> bool {
        self.is_generic_method() && !self.is_generic_method_definition
    }

    /// True for constructors
    #[must_use]
    pub fn is_constructor(&self) -> bool {
        self.return_parameter.is_none()
    }

    /// Instantiates this generic method definition with `arguments`
    ///
    /// Parameter and return types have their method generic parameters replaced; the
    /// result resolves back to this method through [`RuntimeMethod::definition`].
    #[must_use]
    pub fn instantiate(self: &Arc<Self>, arguments: Vec<RuntimeTypeRc>) -> RuntimeMethod {
        let substitute = |param: &RuntimeParameter| RuntimeParameter {
            parameter_type: RuntimeType::substitute_method_arguments(
                &param.parameter_type,
                &arguments,
            ),
            required_modifiers: param.required_modifiers.clone(),
            optional_modifiers: param.optional_modifiers.clone(),
        };

        RuntimeMethod {
            name: self.name.clone(),
            declaring_type: self.declaring_type.clone(),
            module: self.module.clone(),
            calling_convention: self.calling_convention,
            parameters: self.parameters.iter().map(substitute).collect(),
            return_parameter: self.return_parameter.as_ref().map(substitute),
            generic_arguments: arguments,
            is_generic_method_definition: false,
            definition: Some(self.clone()),
        }
    }
}

/// A field as reported by reflection
#[derive(Debug, Clone)]
pub struct RuntimeField {
    /// The field name
    pub name: String,
    /// The declaring type, `None` for global fields
    pub declaring_type: Option<RuntimeTypeRc>,
    /// The module defining the field
    pub module: RuntimeModuleRc,
    /// The field type, with generic arguments of the declaring type substituted
    pub field_type: RuntimeTypeRc,
    /// Required modifiers, innermost first
    pub required_modifiers: Vec<RuntimeTypeRc>,
    /// Optional modifiers, innermost first
    pub optional_modifiers: Vec<RuntimeTypeRc>,
    /// The field as declared on the generic type definition, `None` if this is it
    pub definition: Option<RuntimeFieldRc>,
}

impl RuntimeField {
    /// A field without modifiers
    #[must_use]
    pub fn new(
        name: &str,
        declaring_type: Option<RuntimeTypeRc>,
        module: RuntimeModuleRc,
        field_type: RuntimeTypeRc,
    ) -> Self {
        RuntimeField {
            name: name.to_string(),
            declaring_type,
            module,
            field_type,
            required_modifiers: Vec::new(),
            optional_modifiers: Vec::new(),
            definition: None,
        }
    }

    /// Sets the token-resolved definition
    #[must_use]
    pub fn with_definition(mut self, definition: RuntimeFieldRc) -> Self {
        self.definition = Some(definition);
        self
    }
}

/// A property as reported by reflection
#[derive(Debug, Clone)]
pub struct RuntimeProperty {
    /// The property name
    pub name: String,
    /// The declaring type
    pub declaring_type: Option<RuntimeTypeRc>,
    /// The property type
    pub property_type: RuntimeTypeRc,
    /// Required modifiers, innermost first
    pub required_modifiers: Vec<RuntimeTypeRc>,
    /// Optional modifiers, innermost first
    pub optional_modifiers: Vec<RuntimeTypeRc>,
}

impl RuntimeProperty {
    /// A property without modifiers
    #[must_use]
    pub fn new(
        name: &str,
        declaring_type: Option<RuntimeTypeRc>,
        property_type: RuntimeTypeRc,
    ) -> Self {
        RuntimeProperty {
            name: name.to_string(),
            declaring_type,
            property_type,
            required_modifiers: Vec::new(),
            optional_modifiers: Vec::new(),
        }
    }
}

/// An event as reported by reflection
#[derive(Debug, Clone)]
pub struct RuntimeEvent {
    /// The event name
    pub name: String,
    /// The declaring type
    pub declaring_type: Option<RuntimeTypeRc>,
    /// The delegate type of the event
    pub event_handler_type: RuntimeTypeRc,
}

impl RuntimeEvent {
    /// Creates an event
    #[must_use]
    pub fn new(
        name: &str,
        declaring_type: Option<RuntimeTypeRc>,
        event_handler_type: RuntimeTypeRc,
    ) -> Self {
        RuntimeEvent {
            name: name.to_string(),
            declaring_type,
            event_handler_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::tables::AssemblyVersion,
        runtime::{RuntimeAssembly, RuntimeModule},
    };

    #[test]
    fn test_instantiate_generic_method() {
        let assembly = Arc::new(RuntimeAssembly::new("Lib", AssemblyVersion::new(1, 0, 0, 0)));
        let module = Arc::new(RuntimeModule::new("Lib.dll", assembly));
        let string = Arc::new(RuntimeType::definition("System", "String", module.clone()));

        let generic = Arc::new(
            RuntimeMethod::new(
                "Echo",
                None,
                module,
                Some(RuntimeParameter::new(Arc::new(RuntimeType::method_parameter(0)))),
                vec![RuntimeParameter::new(Arc::new(RuntimeType::method_parameter(0)))],
            )
            .with_generic_parameters(1),
        );
        assert!(generic.is_generic_method_definition);
        assert!(!generic.is_generic_instance());

        let closed = generic.instantiate(vec![string.clone()]);
        assert!(closed.is_generic_instance());
        assert!(Arc::ptr_eq(&closed.parameters[0].parameter_type, &string));
        assert!(Arc::ptr_eq(closed.definition.as_ref().unwrap(), &generic));
        assert!(!closed.is_constructor());
    }
}
