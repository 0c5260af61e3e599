use std::sync::Arc;

use crate::metadata::{signatures::SignatureMethod, tables::TypeDefRc, token::Token};

/// A reference to a `Property`
pub type PropertyRc = Arc<Property>;

/// The `Property` table holds the properties defined in a module.
#[derive(Debug)]
pub struct Property {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The property name
    pub name: String,
    /// a 2-byte bitmask of type `PropertyAttributes`
    pub flags: u32,
    /// The property signature, the return type is the property type
    pub signature: Option<SignatureMethod>,
    /// The declaring type
    pub declaring_type: Option<TypeDefRc>,
}

impl Property {
    /// Creates a property
    #[must_use]
    pub fn new(
        rid: u32,
        name: &str,
        signature: Option<SignatureMethod>,
        declaring_type: Option<TypeDefRc>,
    ) -> Self {
        Property {
            rid,
            token: Token::from_parts(Token::PROPERTY, rid),
            name: name.to_string(),
            flags: 0,
            signature,
            declaring_type,
        }
    }
}
