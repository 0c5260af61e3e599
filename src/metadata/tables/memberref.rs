use std::sync::Arc;

use crate::metadata::{
    signatures::CallingConventionSignature, tables::ModuleRc, token::Token,
    typesystem::MemberRefParent,
};

/// A reference to a `MemberRef`
pub type MemberRefRc = Arc<MemberRef>;

/// The `MemberRef` table references methods and fields through their parent and signature.
#[derive(Debug)]
pub struct MemberRef {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The member name
    pub name: String,
    /// The owner of the referenced member
    pub class: MemberRefParent,
    /// A method or field signature
    pub signature: CallingConventionSignature,
    /// The module whose metadata contains this row
    pub module: Option<ModuleRc>,
}

impl MemberRef {
    /// Creates a member reference
    #[must_use]
    pub fn new(
        rid: u32,
        name: &str,
        class: MemberRefParent,
        signature: impl Into<CallingConventionSignature>,
    ) -> Self {
        MemberRef {
            rid,
            token: Token::from_parts(Token::MEMBER_REF, rid),
            name: name.to_string(),
            class,
            signature: signature.into(),
            module: None,
        }
    }

    /// Sets the module owning this row
    #[must_use]
    pub fn with_module(mut self, module: ModuleRc) -> Self {
        self.module = Some(module);
        self
    }

    /// True if this references a method
    #[must_use]
    pub fn is_method_ref(&self) -> bool {
        matches!(self.signature, CallingConventionSignature::Method(_))
    }

    /// True if this references a field
    #[must_use]
    pub fn is_field_ref(&self) -> bool {
        matches!(self.signature, CallingConventionSignature::Field(_))
    }
}
