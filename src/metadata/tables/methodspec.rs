use std::sync::Arc;

use crate::metadata::{
    members::MethodDefOrRef, signatures::SignatureMethodSpec, tables::ModuleRc, token::Token,
};

/// A reference to a `MethodSpec`
pub type MethodSpecRc = Arc<MethodSpec>;

/// The `MethodSpec` table instantiates generic methods.
#[derive(Debug)]
pub struct MethodSpec {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The generic method being instantiated
    pub method: MethodDefOrRef,
    /// The method type arguments
    pub instantiation: SignatureMethodSpec,
    /// The module whose metadata contains this row
    pub module: Option<ModuleRc>,
}

impl MethodSpec {
    /// Creates a method instantiation
    #[must_use]
    pub fn new(rid: u32, method: MethodDefOrRef, instantiation: SignatureMethodSpec) -> Self {
        MethodSpec {
            rid,
            token: Token::from_parts(Token::METHOD_SPEC, rid),
            method,
            instantiation,
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
