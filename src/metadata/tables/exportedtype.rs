use std::{fmt, sync::Arc};

use crate::{
    comparer::MAX_RECURSION_DEPTH,
    metadata::{
        tables::{AssemblyName, ModuleRc},
        token::Token,
        typesystem::Implementation,
    },
};

/// A reference to an `ExportedType`
pub type ExportedTypeRc = Arc<ExportedType>;

/// The `ExportedType` table forwards types to other files of the assembly or to
/// other assemblies (type forwarders).
pub struct ExportedType {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 4-byte bitmask of type `TypeAttributes`
    pub flags: u32,
    /// A hint for the `TypeDef` row in the target module
    pub type_def_id: u32,
    /// The type name
    pub name: String,
    /// The namespace, empty for nested types
    pub namespace: String,
    /// Where the type is forwarded to
    pub implementation: Implementation,
    /// The module whose metadata contains this row
    pub module: Option<ModuleRc>,
}

impl ExportedType {
    /// Creates an exported type
    #[must_use]
    pub fn new(rid: u32, namespace: &str, name: &str, implementation: Implementation) -> Self {
        ExportedType {
            rid,
            token: Token::from_parts(Token::EXPORTED_TYPE, rid),
            flags: 0,
            type_def_id: 0,
            name: name.to_string(),
            namespace: namespace.to_string(),
            implementation,
            module: None,
        }
    }

    /// Sets the module owning this row
    #[must_use]
    pub fn with_module(mut self, module: ModuleRc) -> Self {
        self.module = Some(module);
        self
    }

    /// The enclosing exported type of a nested export
    #[must_use]
    pub fn declaring_type(&self) -> Option<&ExportedTypeRc> {
        match &self.implementation {
            Implementation::ExportedType(parent) => Some(parent),
            _ => None,
        }
    }

    /// True if the implementation is another exported type
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.declaring_type().is_some()
    }

    /// The assembly the forwarded type is defined in.
    ///
    /// `File` implementations report the assembly of the module owning the row.
    #[must_use]
    pub fn definition_assembly(&self) -> Option<&dyn AssemblyName> {
        let mut current = self;
        for _ in 0..MAX_RECURSION_DEPTH {
            match &current.implementation {
                Implementation::AssemblyRef(assembly) => return Some(assembly.as_ref()),
                Implementation::File(_) => {
                    return current
                        .module
                        .as_ref()?
                        .assembly
                        .as_deref()
                        .map(|assembly| assembly as &dyn AssemblyName)
                }
                Implementation::ExportedType(parent) => current = parent,
                Implementation::None => return None,
            }
        }
        None
    }

    /// `Namespace.Name`, with enclosing exports separated by `/`
    #[must_use]
    pub fn full_name(&self) -> String {
        match self.declaring_type() {
            Some(parent) => format!("{}/{}", parent.full_name(), self.name),
            None if self.namespace.is_empty() => self.name.clone(),
            None => format!("{}.{}", self.namespace, self.name),
        }
    }
}

impl fmt::Debug for ExportedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExportedType")
            .field("token", &self.token)
            .field("name", &self.full_name())
            .field("implementation", &self.implementation)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metadata::tables::{AssemblyRef, File},
        test::create_module,
    };

    #[test]
    fn test_forwarder_definition_assembly() {
        let target = Arc::new(AssemblyRef::new(1, "System.Runtime"));
        let outer = Arc::new(ExportedType::new(
            1,
            "System",
            "Console",
            Implementation::AssemblyRef(target),
        ));
        let nested = ExportedType::new(2, "", "Color", Implementation::ExportedType(outer));

        assert_eq!(
            nested.definition_assembly().map(|a| a.name()),
            Some("System.Runtime")
        );
        assert_eq!(nested.full_name(), "System.Console/Color");
    }

    #[test]
    fn test_file_implementation_uses_owner_assembly() {
        let module = create_module("main.dll", "Main");
        let file = Arc::new(File::new(1, "part.netmodule"));
        let exported =
            ExportedType::new(1, "N", "T", Implementation::File(file)).with_module(module);

        assert_eq!(exported.definition_assembly().map(|a| a.name()), Some("Main"));
    }
}
