use std::{
    fmt,
    sync::{Arc, OnceLock},
};

use crate::{
    comparer::MAX_RECURSION_DEPTH,
    metadata::{
        tables::{AssemblyRc, ModuleRc},
        token::Token,
    },
    Result,
};

/// A reference to a `TypeDef`
pub type TypeDefRc = Arc<TypeDef>;

#[allow(non_snake_case)]
/// The visibility flags of `TypeAttributes`
pub mod TypeAttributes {
    /// Mask for extracting type visibility information.
    pub const VISIBILITY_MASK: u32 = 0x0000_0007;
    /// Type has no public scope (internal to assembly).
    pub const NOT_PUBLIC: u32 = 0x0000_0000;
    /// Type has public scope.
    pub const PUBLIC: u32 = 0x0000_0001;
    /// Nested type with public visibility.
    pub const NESTED_PUBLIC: u32 = 0x0000_0002;
    /// Nested type with private visibility.
    pub const NESTED_PRIVATE: u32 = 0x0000_0003;
    /// Type is an interface.
    pub const INTERFACE: u32 = 0x0000_0020;
    /// Type is imported, e.g. a COM or Windows Runtime type.
    pub const IMPORT: u32 = 0x0000_1000;
    /// Windows Runtime type.
    pub const WINDOWS_RUNTIME: u32 = 0x0000_4000;
}

/// The `TypeDef` table holds the types defined in a module.
///
/// Nested types link their enclosing type through [`TypeDef::declaring_type`], which is set
/// once after construction since enclosing and nested types are created independently.
pub struct TypeDef {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 4-byte bitmask of type `TypeAttributes`
    pub flags: u32,
    /// The type name
    pub name: String,
    /// The namespace, empty for nested and global types
    pub namespace: String,
    /// The module owning this definition
    pub module: Option<ModuleRc>,
    /// The enclosing type of a nested type
    pub declaring_type: OnceLock<TypeDefRc>,
}

impl TypeDef {
    /// Creates a top-level type definition
    #[must_use]
    pub fn new(rid: u32, namespace: &str, name: &str, module: Option<ModuleRc>) -> Self {
        TypeDef {
            rid,
            token: Token::from_parts(Token::TYPE_DEF, rid),
            flags: TypeAttributes::PUBLIC,
            name: name.to_string(),
            namespace: namespace.to_string(),
            module,
            declaring_type: OnceLock::new(),
        }
    }

    /// Creates a nested type definition inside `declaring_type`, owned by the same module
    #[must_use]
    pub fn new_nested(rid: u32, name: &str, declaring_type: &TypeDefRc) -> Self {
        let nested = TypeDef {
            flags: TypeAttributes::NESTED_PUBLIC,
            ..TypeDef::new(rid, "", name, declaring_type.module.clone())
        };
        let _ = nested.declaring_type.set(declaring_type.clone());
        nested
    }

    /// Sets the `TypeAttributes` flags
    #[must_use]
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// Links the enclosing type
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the enclosing type was already set.
    pub fn set_declaring_type(&self, declaring_type: TypeDefRc) -> Result<()> {
        self.declaring_type.set(declaring_type).map_err(|_| {
            malformed_error!("Declaring type of {} is already set", self.token)
        })
    }

    /// The enclosing type of a nested type
    #[must_use]
    pub fn declaring_type(&self) -> Option<&TypeDefRc> {
        self.declaring_type.get()
    }

    /// True if this type is nested in another type
    #[must_use]
    pub fn is_nested(&self) -> bool {
        self.declaring_type.get().is_some()
    }

    /// True if this is the `<Module>` type holding a module's global members
    #[must_use]
    pub fn is_global_module_type(&self) -> bool {
        self.module.is_some() && self.token.row() == 1 && !self.is_nested()
    }

    /// The assembly owning the module of this definition
    #[must_use]
    pub fn definition_assembly(&self) -> Option<&AssemblyRc> {
        self.module.as_ref()?.assembly.as_ref()
    }

    /// `Namespace.Name`, with enclosing types separated by `/`
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut chain = vec![self.name.as_str()];
        let mut outermost = self;
        while let Some(parent) = outermost.declaring_type() {
            if chain.len() > MAX_RECURSION_DEPTH {
                break;
            }
            chain.push(&parent.name);
            outermost = parent;
        }
        chain.reverse();

        let nested = chain.join("/");
        if outermost.namespace.is_empty() {
            nested
        } else {
            format!("{}.{}", outermost.namespace, nested)
        }
    }
}

impl fmt::Debug for TypeDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDef")
            .field("token", &self.token)
            .field("name", &self.full_name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::create_module;

    #[test]
    fn test_full_name_nested() {
        let module = create_module("lib.dll", "Lib");
        let outer = Arc::new(TypeDef::new(2, "N", "Outer", Some(module)));
        let inner = Arc::new(TypeDef::new_nested(3, "Inner", &outer));
        let innermost = TypeDef::new_nested(4, "Innermost", &inner);

        assert_eq!(outer.full_name(), "N.Outer");
        assert_eq!(innermost.full_name(), "N.Outer/Inner/Innermost");
        assert!(innermost.is_nested());
    }

    #[test]
    fn test_global_module_type() {
        let module = create_module("lib.dll", "Lib");
        let global = TypeDef::new(1, "", "<Module>", Some(module.clone()));
        let other = TypeDef::new(2, "", "<Module>", Some(module));
        let detached = TypeDef::new(1, "", "<Module>", None);

        assert!(global.is_global_module_type());
        assert!(!other.is_global_module_type());
        assert!(!detached.is_global_module_type());
    }

    #[test]
    fn test_declaring_type_set_once() {
        let module = create_module("lib.dll", "Lib");
        let outer = Arc::new(TypeDef::new(2, "N", "Outer", Some(module.clone())));
        let inner = TypeDef::new(3, "", "Inner", Some(module));

        assert!(inner.set_declaring_type(outer.clone()).is_ok());
        assert!(inner.set_declaring_type(outer).is_err());
    }

    #[test]
    fn test_full_name_of_cycle_terminates() {
        let module = create_module("lib.dll", "Lib");
        let cyclic = Arc::new(TypeDef::new(2, "N", "Loop", Some(module)));
        cyclic.set_declaring_type(cyclic.clone()).unwrap();

        assert!(cyclic.full_name().ends_with("Loop/Loop"));
    }
}
