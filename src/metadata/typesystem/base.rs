use strum::{EnumCount, EnumIter};

#[allow(non_snake_case)]
#[allow(missing_docs)]
/// Raw element type tags as defined in ECMA-335 II.23.1.16
pub mod ELEMENT_TYPE {
    //Marks end of a list
    pub const END: u8 = 0x00;
    pub const VOID: u8 = 0x01;
    pub const BOOLEAN: u8 = 0x02;
    pub const CHAR: u8 = 0x03;
    pub const I1: u8 = 0x04;
    pub const U1: u8 = 0x05;
    pub const I2: u8 = 0x06;
    pub const U2: u8 = 0x07;
    pub const I4: u8 = 0x08;
    pub const U4: u8 = 0x09;
    pub const I8: u8 = 0x0a;
    pub const U8: u8 = 0x0b;
    pub const R4: u8 = 0x0c;
    pub const R8: u8 = 0x0d;
    pub const STRING: u8 = 0x0e;
    // Followed by type
    pub const PTR: u8 = 0x0f;
    // Followed by type
    pub const BYREF: u8 = 0x10;
    // Followed by TypeDef or TypeRef token
    pub const VALUETYPE: u8 = 0x11;
    // Followed by TypeDef or TypeRef token
    pub const CLASS: u8 = 0x12;
    // Generic parameter in a generic type definition, represented as number (compressed unsigned integer)
    pub const VAR: u8 = 0x13;
    // type rank boundsCount bound1 ... loCount lo1 ...
    pub const ARRAY: u8 = 0x14;
    // Generic type instantiation. Followed by type type-arg-count type-1 ... type-n
    pub const GENERICINST: u8 = 0x15;
    pub const TYPEDBYREF: u8 = 0x16;
    // Followed by size and type, not part of ECMA-335 but emitted by some compilers
    pub const VALUEARRAY: u8 = 0x17;
    // System.IntPtr
    pub const I: u8 = 0x18;
    // System.UIntPtr
    pub const U: u8 = 0x19;
    // Native real, unused
    pub const R: u8 = 0x1a;
    // Followed by full method signature
    pub const FNPTR: u8 = 0x1b;
    // System.Object
    pub const OBJECT: u8 = 0x1c;
    // Single-dim array with 0 lower bound
    pub const SZARRAY: u8 = 0x1d;
    // Generic parameter in a generic method definition, represented as number (compressed unsigned integer)
    pub const MVAR: u8 = 0x1e;
    // Required modifier : followed by a TypeDef or TypeRef token
    pub const CMOD_REQD: u8 = 0x1f;
    // Optional modifier : followed by a TypeDef or TypeRef token
    pub const CMOD_OPT: u8 = 0x20;
    // Implemented within the CLI
    pub const INTERNAL: u8 = 0x21;
    // Module index followed by type, not part of ECMA-335
    pub const MODULE: u8 = 0x3f;
    // Or'd with following element types
    pub const MODIFIER: u8 = 0x40;
    // Sentinel for vararg method signature
    pub const SENTINEL: u8 = 0x41;
    // Denotes a local variable that points at a pinned object
    pub const PINNED: u8 = 0x45;
}

/// The element kind of a signature node.
///
/// Comparisons branch on these tags verbatim: two signature nodes with different
/// tags are never equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum ElementType {
    End = ELEMENT_TYPE::END,
    Void = ELEMENT_TYPE::VOID,
    Boolean = ELEMENT_TYPE::BOOLEAN,
    Char = ELEMENT_TYPE::CHAR,
    I1 = ELEMENT_TYPE::I1,
    U1 = ELEMENT_TYPE::U1,
    I2 = ELEMENT_TYPE::I2,
    U2 = ELEMENT_TYPE::U2,
    I4 = ELEMENT_TYPE::I4,
    U4 = ELEMENT_TYPE::U4,
    I8 = ELEMENT_TYPE::I8,
    U8 = ELEMENT_TYPE::U8,
    R4 = ELEMENT_TYPE::R4,
    R8 = ELEMENT_TYPE::R8,
    String = ELEMENT_TYPE::STRING,
    Ptr = ELEMENT_TYPE::PTR,
    ByRef = ELEMENT_TYPE::BYREF,
    ValueType = ELEMENT_TYPE::VALUETYPE,
    Class = ELEMENT_TYPE::CLASS,
    Var = ELEMENT_TYPE::VAR,
    Array = ELEMENT_TYPE::ARRAY,
    GenericInst = ELEMENT_TYPE::GENERICINST,
    TypedByRef = ELEMENT_TYPE::TYPEDBYREF,
    ValueArray = ELEMENT_TYPE::VALUEARRAY,
    I = ELEMENT_TYPE::I,
    U = ELEMENT_TYPE::U,
    R = ELEMENT_TYPE::R,
    FnPtr = ELEMENT_TYPE::FNPTR,
    Object = ELEMENT_TYPE::OBJECT,
    SzArray = ELEMENT_TYPE::SZARRAY,
    MVar = ELEMENT_TYPE::MVAR,
    CModReqd = ELEMENT_TYPE::CMOD_REQD,
    CModOpt = ELEMENT_TYPE::CMOD_OPT,
    Internal = ELEMENT_TYPE::INTERNAL,
    Module = ELEMENT_TYPE::MODULE,
    Sentinel = ELEMENT_TYPE::SENTINEL,
    Pinned = ELEMENT_TYPE::PINNED,
}

impl ElementType {
    /// The raw tag byte
    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// True for the leaf kinds that denote a core library type
    #[must_use]
    pub fn is_primitive(self) -> bool {
        self.core_library_name().is_some()
    }

    /// The name of the `System` type a primitive element kind stands for.
    ///
    /// Returns `None` for every composite kind.
    #[must_use]
    pub fn core_library_name(self) -> Option<&'static str> {
        Some(match self {
            ElementType::Void => "Void",
            ElementType::Boolean => "Boolean",
            ElementType::Char => "Char",
            ElementType::I1 => "SByte",
            ElementType::U1 => "Byte",
            ElementType::I2 => "Int16",
            ElementType::U2 => "UInt16",
            ElementType::I4 => "Int32",
            ElementType::U4 => "UInt32",
            ElementType::I8 => "Int64",
            ElementType::U8 => "UInt64",
            ElementType::R4 => "Single",
            ElementType::R8 => "Double",
            ElementType::String => "String",
            ElementType::TypedByRef => "TypedReference",
            ElementType::I => "IntPtr",
            ElementType::U => "UIntPtr",
            ElementType::Object => "Object",
            _ => return None,
        })
    }
}

/// A single dimension of an array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ArrayDimensions {
    /// The size of this dimension
    pub size: Option<u32>,
    /// The lower bound of this dimension (lowest index that can be used to access an element)
    pub lower_bound: Option<i32>,
}
