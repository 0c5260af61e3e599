//! `Module`, `ModuleRef` and `File` rows.

use std::sync::Arc;

use crate::metadata::{
    tables::{AssemblyName, AssemblyRc},
    token::Token,
};

/// A reference to a `Module`
pub type ModuleRc = Arc<Module>;
/// A reference to a `ModuleRef`
pub type ModuleRefRc = Arc<ModuleRef>;
/// A reference to a `File`
pub type FileRc = Arc<File>;

/// The `Module` table describes the module an entity was loaded from.
#[derive(Debug)]
pub struct Module {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The module name, usually the file name
    pub name: String,
    /// The assembly this module belongs to, `None` for stand-alone netmodules
    pub assembly: Option<AssemblyRc>,
    /// True if this module carries the assembly manifest
    pub is_manifest: bool,
}

impl Module {
    /// Creates the manifest module of `assembly`
    #[must_use]
    pub fn new(name: &str, assembly: Option<AssemblyRc>) -> Self {
        Module {
            rid: 1,
            token: Token::new(0x0000_0001),
            name: name.to_string(),
            assembly,
            is_manifest: true,
        }
    }

    /// Marks this module as a secondary (non manifest) module
    #[must_use]
    pub fn secondary(mut self) -> Self {
        self.is_manifest = false;
        self
    }

    /// True if this is the manifest module of the platform base library
    #[must_use]
    pub fn is_core_library(&self) -> bool {
        self.is_manifest
            && self
                .assembly
                .as_ref()
                .is_some_and(|assembly| assembly.is_core_library())
    }
}

/// The `ModuleRef` table references other modules of the same assembly.
#[derive(Debug)]
pub struct ModuleRef {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The name of the referenced module
    pub name: String,
    /// The module whose metadata contains this row
    pub module: Option<ModuleRc>,
}

impl ModuleRef {
    /// Creates a module reference owned by `module`
    #[must_use]
    pub fn new(rid: u32, name: &str, module: Option<ModuleRc>) -> Self {
        ModuleRef {
            rid,
            token: Token::from_parts(Token::MODULE_REF, rid),
            name: name.to_string(),
            module,
        }
    }
}

/// The `File` table lists the files of a multi-file assembly.
#[derive(Debug)]
pub struct File {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// a 4-byte bitmask of type `FileAttributes`
    pub flags: u32,
    /// The file name
    pub name: String,
}

impl File {
    /// Creates a file row
    #[must_use]
    pub fn new(rid: u32, name: &str) -> Self {
        File {
            rid,
            token: Token::from_parts(Token::FILE, rid),
            flags: 0,
            name: name.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::tables::Assembly;

    #[test]
    fn test_core_library_module_requires_manifest() {
        let corlib = Arc::new(Assembly::new("mscorlib"));
        let manifest = Module::new("mscorlib.dll", Some(corlib.clone()));
        let secondary = Module::new("extra.netmodule", Some(corlib)).secondary();

        assert!(manifest.is_core_library());
        assert!(!secondary.is_core_library());
        assert!(!Module::new("mscorlib.dll", None).is_core_library());
    }

    #[test]
    fn test_row_tokens() {
        assert_eq!(ModuleRef::new(2, "native", None).token, Token::new(0x1A00_0002));
        assert_eq!(File::new(3, "a.netmodule").token, Token::new(0x2600_0003));
    }
}
