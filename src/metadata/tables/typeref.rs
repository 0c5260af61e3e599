use std::{fmt, sync::Arc};

use crate::{
    comparer::MAX_RECURSION_DEPTH,
    metadata::{
        tables::{AssemblyName, ModuleRc},
        token::Token,
        typesystem::ResolutionScope,
    },
};

/// A reference to a `TypeRef`
pub type TypeRefRc = Arc<TypeRef>;

/// The `TypeRef` table references types defined in other modules or assemblies.
pub struct TypeRef {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The type name
    pub name: String,
    /// The namespace, empty for nested types
    pub namespace: String,
    /// Where the referenced type is defined
    pub resolution_scope: ResolutionScope,
    /// The module whose metadata contains this row
    pub module: Option<ModuleRc>,
}

impl TypeRef {
    /// Creates a type reference
    #[must_use]
    pub fn new(rid: u32, namespace: &str, name: &str, resolution_scope: ResolutionScope) -> Self {
        TypeRef {
            rid,
            token: Token::from_parts(Token::TYPE_REF, rid),
            name: name.to_string(),
            namespace: namespace.to_string(),
            resolution_scope,
            module: None,
        }
    }

    /// Sets the module owning this row
    #[must_use]
    pub fn with_module(mut self, module: ModuleRc) -> Self {
        self.module = Some(module);
        self
    }

    /// The enclosing type reference of a nested reference
    #[must_use]
    pub fn declaring_type(&self) -> Option<&TypeRefRc> {
        match &self.resolution_scope {
            ResolutionScope::TypeRef(parent) => Some(parent),
            _ => None,
        }
    }

    /// True if the resolution scope is another type reference
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.declaring_type().is_some()
    }

    /// The assembly the referenced type is defined in, as far as the scope chain tells.
    ///
    /// Module scopes report the assembly of that module, `ModuleRef` scopes the assembly
    /// of the module owning the `ModuleRef` row. Missing scopes report `None`.
    #[must_use]
    pub fn definition_assembly(&self) -> Option<&dyn AssemblyName> {
        let mut current = self;
        for _ in 0..MAX_RECURSION_DEPTH {
            match &current.resolution_scope {
                ResolutionScope::AssemblyRef(assembly) => return Some(assembly.as_ref()),
                ResolutionScope::Module(module) => {
                    return module
                        .assembly
                        .as_deref()
                        .map(|assembly| assembly as &dyn AssemblyName)
                }
                ResolutionScope::ModuleRef(module_ref) => {
                    return module_ref
                        .module
                        .as_ref()?
                        .assembly
                        .as_deref()
                        .map(|assembly| assembly as &dyn AssemblyName)
                }
                ResolutionScope::TypeRef(parent) => current = parent,
                ResolutionScope::None => return None,
            }
        }
        None
    }

    /// `Namespace.Name`, with enclosing references separated by `/`
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.declaring_type() {
            Some(parent) => format!("{}/{}", parent.full_name(), self.name),
            None if self.namespace.is_empty() => self.name.clone(),
            None => format!("{}.{}", self.namespace, self.name),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeRef")
            .field("token", &self.token)
            .field("name", &self.full_name())
            .field("scope", &self.resolution_scope)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::tables::{AssemblyRef, ModuleRef},
        test::create_module,
    };

    #[test]
    fn test_definition_assembly_through_nesting() {
        let corlib = Arc::new(AssemblyRef::new(1, "mscorlib"));
        let outer = Arc::new(TypeRef::new(
            1,
            "System",
            "Environment",
            ResolutionScope::AssemblyRef(corlib),
        ));
        let inner = TypeRef::new(2, "", "SpecialFolder", ResolutionScope::TypeRef(outer));

        assert_eq!(inner.definition_assembly().map(|a| a.name()), Some("mscorlib"));
        assert_eq!(inner.full_name(), "System.Environment/SpecialFolder");
        assert!(inner.is_nested());
    }

    #[test]
    fn test_definition_assembly_of_module_scopes() {
        let module = create_module("lib.dll", "Lib");
        let local = TypeRef::new(1, "N", "T", ResolutionScope::Module(module.clone()));
        let module_ref = Arc::new(ModuleRef::new(1, "other.netmodule", Some(module)));
        let sibling = TypeRef::new(2, "N", "U", ResolutionScope::ModuleRef(module_ref));
        let unscoped = TypeRef::new(3, "N", "V", ResolutionScope::None);

        assert_eq!(local.definition_assembly().map(|a| a.name()), Some("Lib"));
        assert_eq!(sibling.definition_assembly().map(|a| a.name()), Some("Lib"));
        assert!(unscoped.definition_assembly().is_none());
    }
}
