use std::sync::Arc;

use bitflags::bitflags;

use crate::metadata::{
    signatures::SignatureMethod,
    tables::{ModuleRc, TypeDefRc},
    token::Token,
};

/// A reference to a `Method`
pub type MethodRc = Arc<Method>;

/// Bitmask for `ACCESS` state extraction
pub const METHOD_ACCESS_MASK: u32 = 0x0007;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Method access flags
    pub struct MethodAccessFlags: u32 {
        /// Member not referenceable
        const COMPILER_CONTROLLED = 0x0000;
        /// Accessible only by the parent type
        const PRIVATE = 0x0001;
        /// Accessible by sub-types only in this Assembly
        const FAM_AND_ASSEM = 0x0002;
        /// Accessibly by anyone in the Assembly
        const ASSEM = 0x0003;
        /// Accessible only by type and sub-types
        const FAMILY = 0x0004;
        /// Accessibly by sub-types anywhere, plus anyone in assembly
        const FAM_OR_ASSEM = 0x0005;
        /// Accessibly by anyone who has visibility to this scope
        const PUBLIC = 0x0006;
    }
}

impl MethodAccessFlags {
    /// Extract access flags from raw method flags
    #[must_use]
    pub fn from_method_flags(flags: u32) -> Self {
        Self::from_bits_truncate(flags & METHOD_ACCESS_MASK)
    }
}

/// The `MethodDef` table holds the methods defined in a module.
#[derive(Debug)]
pub struct Method {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The method name
    pub name: String,
    /// a 2-byte bitmask of type `MethodAttributes`
    pub flags: u32,
    /// The method signature
    pub signature: SignatureMethod,
    /// The type declaring this method, `<Module>` for global methods
    pub declaring_type: Option<TypeDefRc>,
}

impl Method {
    /// Creates a public method
    #[must_use]
    pub fn new(
        rid: u32,
        name: &str,
        signature: SignatureMethod,
        declaring_type: Option<TypeDefRc>,
    ) -> Self {
        Method {
            rid,
            token: Token::from_parts(Token::METHOD_DEF, rid),
            name: name.to_string(),
            flags: MethodAccessFlags::PUBLIC.bits(),
            signature,
            declaring_type,
        }
    }

    /// Sets the `MethodAttributes` flags
    #[must_use]
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// The access flags
    #[must_use]
    pub fn flags_access(&self) -> MethodAccessFlags {
        MethodAccessFlags::from_method_flags(self.flags)
    }

    /// True for compiler controlled methods, which can only be referenced by token
    #[must_use]
    pub fn is_private_scope(&self) -> bool {
        self.flags & METHOD_ACCESS_MASK == MethodAccessFlags::COMPILER_CONTROLLED.bits()
    }

    /// The module owning the declaring type
    #[must_use]
    pub fn module(&self) -> Option<&ModuleRc> {
        self.declaring_type.as_ref()?.module.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::signatures::TypeSignature;

    #[test]
    fn test_access_flags() {
        let sig = SignatureMethod::new_static(TypeSignature::Void, vec![]);
        let public = Method::new(1, "Run", sig.clone(), None);
        let hidden = Method::new(2, "Run", sig, None).with_flags(0x0010);

        assert_eq!(public.flags_access(), MethodAccessFlags::PUBLIC);
        assert!(!public.is_private_scope());
        assert!(hidden.is_private_scope());
        assert_eq!(hidden.flags_access(), MethodAccessFlags::COMPILER_CONTROLLED);
    }
}
