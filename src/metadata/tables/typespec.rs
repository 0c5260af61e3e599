use std::sync::Arc;

use crate::metadata::{signatures::TypeSignature, tables::ModuleRc, token::Token};

/// A reference to a `TypeSpec`
pub type TypeSpecRc = Arc<TypeSpec>;

/// The `TypeSpec` table wraps a type signature so it can be referenced by token,
/// most commonly an instantiated generic type.
#[derive(Debug)]
pub struct TypeSpec {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The wrapped signature
    pub signature: TypeSignature,
    /// The module whose metadata contains this row
    pub module: Option<ModuleRc>,
}

impl TypeSpec {
    /// Creates a type specification
    #[must_use]
    pub fn new(rid: u32, signature: TypeSignature) -> Self {
        TypeSpec {
            rid,
            token: Token::from_parts(Token::TYPE_SPEC, rid),
            signature,
            module: None,
        }
    }

    /// Sets the module owning this row
    #[must_use]
    pub fn with_module(mut self, module: ModuleRc) -> Self {
        self.module = Some(module);
        self
    }
}
