//! Metadata tokens referencing rows of metadata tables.

use std::fmt;
use std::hash::{Hash, Hasher};

/// A metadata token representing a reference to a metadata table entry.
///
/// Tokens in .NET metadata consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the table type
/// - The low 24 bits (bits 0-23) indicate the row index within that table
///
/// Raw signature comparison compares type references by token instead of by
/// structure, so tokens only ever need to be compared within one module.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Table id of `TypeRef`
    pub const TYPE_REF: u8 = 0x01;
    /// Table id of `TypeDef`
    pub const TYPE_DEF: u8 = 0x02;
    /// Table id of `Field`
    pub const FIELD: u8 = 0x04;
    /// Table id of `MethodDef`
    pub const METHOD_DEF: u8 = 0x06;
    /// Table id of `MemberRef`
    pub const MEMBER_REF: u8 = 0x0A;
    /// Table id of `Event`
    pub const EVENT: u8 = 0x14;
    /// Table id of `Property`
    pub const PROPERTY: u8 = 0x17;
    /// Table id of `ModuleRef`
    pub const MODULE_REF: u8 = 0x1A;
    /// Table id of `TypeSpec`
    pub const TYPE_SPEC: u8 = 0x1B;
    /// Table id of `Assembly`
    pub const ASSEMBLY: u8 = 0x20;
    /// Table id of `AssemblyRef`
    pub const ASSEMBLY_REF: u8 = 0x23;
    /// Table id of `File`
    pub const FILE: u8 = 0x26;
    /// Table id of `ExportedType`
    pub const EXPORTED_TYPE: u8 = 0x27;
    /// Table id of `MethodSpec`
    pub const METHOD_SPEC: u8 = 0x2B;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table id and a row index
    ///
    /// ## Arguments
    /// * `table` - The table id (high byte)
    /// * `rid`   - The row index, only the low 24 bits are used
    #[must_use]
    pub fn from_parts(table: u8, rid: u32) -> Self {
        Token((u32::from(table) << 24) | (rid & 0x00FF_FFFF))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }

    /// Returns true if this token points into the given table
    #[must_use]
    pub fn is_table(&self, table: u8) -> bool {
        self.table() == table
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_parts() {
        let token = Token::new(0x0200_0001);
        assert_eq!(token.table(), Token::TYPE_DEF);
        assert_eq!(token.row(), 1);
        assert!(token.is_table(Token::TYPE_DEF));
        assert!(!token.is_table(Token::TYPE_REF));
        assert!(!token.is_null());
    }

    #[test]
    fn test_token_from_parts() {
        assert_eq!(Token::from_parts(Token::TYPE_SPEC, 3), Token::new(0x1B00_0003));
        assert_eq!(
            Token::from_parts(Token::MEMBER_REF, 0x0100_0002),
            Token::new(0x0A00_0002)
        );
    }

    #[test]
    fn test_token_formatting() {
        let token = Token::new(0x0100_002A);
        assert_eq!(format!("{}", token), "0x0100002a");
        assert_eq!(
            format!("{:?}", token),
            "Token(0x0100002a, table: 0x01, row: 42)"
        );
    }

    #[test]
    fn test_token_conversions() {
        let token: Token = 0x2300_0001.into();
        let raw: u32 = token.into();
        assert_eq!(raw, 0x2300_0001);
        assert!(Token::new(0).is_null());
    }
}
