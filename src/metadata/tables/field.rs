use std::sync::Arc;

use crate::metadata::{
    signatures::SignatureField,
    tables::{ModuleRc, TypeDefRc},
    token::Token,
};

/// A reference to a `Field`
pub type FieldRc = Arc<Field>;

#[allow(non_snake_case)]
/// All possible flags for `FieldAttributes`
pub mod FieldAttributes {
    /// These 3 bits contain one of the following values:
    pub const FIELD_ACCESS_MASK: u32 = 0x0007;
    /// Member not referenceable
    pub const COMPILER_CONTROLLED: u32 = 0x0000;
    /// Accessible only by the parent type
    pub const PRIVATE: u32 = 0x0001;
    /// Accessible by sub-types only in this Assembly
    pub const FAM_AND_ASSEM: u32 = 0x0002;
    /// Accessibly by anyone in the Assembly
    pub const ASSEMBLY: u32 = 0x0003;
    /// Accessible only by type and sub-types
    pub const FAMILY: u32 = 0x0004;
    /// Accessibly by sub-types anywhere, plus anyone in assembly
    pub const FAM_OR_ASSEM: u32 = 0x0005;
    /// Accessibly by anyone who has visibility to this scope field contract attributes
    pub const PUBLIC: u32 = 0x0006;
    /// Defined on type, else per instance
    pub const STATIC: u32 = 0x0010;
    /// Field can only be initialized, not written to after init
    pub const INIT_ONLY: u32 = 0x0020;
    /// Value is compile time constant
    pub const LITERAL: u32 = 0x0040;
}

/// The `Field` table holds the fields defined in a module.
#[derive(Debug)]
pub struct Field {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The field name
    pub name: String,
    /// a 2-byte bitmask of type `FieldAttributes`
    pub flags: u32,
    /// The field signature
    pub signature: SignatureField,
    /// The type declaring this field, `<Module>` for global fields
    pub declaring_type: Option<TypeDefRc>,
}

impl Field {
    /// Creates a public field
    #[must_use]
    pub fn new(
        rid: u32,
        name: &str,
        signature: SignatureField,
        declaring_type: Option<TypeDefRc>,
    ) -> Self {
        Field {
            rid,
            token: Token::from_parts(Token::FIELD, rid),
            name: name.to_string(),
            flags: FieldAttributes::PUBLIC,
            signature,
            declaring_type,
        }
    }

    /// Sets the `FieldAttributes` flags
    #[must_use]
    pub fn with_flags(mut self, flags: u32) -> Self {
        self.flags = flags;
        self
    }

    /// True for compiler controlled fields, which can only be referenced by token
    #[must_use]
    pub fn is_private_scope(&self) -> bool {
        self.flags & FieldAttributes::FIELD_ACCESS_MASK == FieldAttributes::COMPILER_CONTROLLED
    }

    /// The module owning the declaring type
    #[must_use]
    pub fn module(&self) -> Option<&ModuleRc> {
        self.declaring_type.as_ref()?.module.as_ref()
    }
}
