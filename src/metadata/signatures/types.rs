use crate::{
    metadata::typesystem::{ArrayDimensions, ElementType, TypeDefOrRef},
    Result,
};

/// The first byte of every non-type signature.
///
/// The low nibble holds the signature kind ([`CallingConvention::MASK`]), the
/// high bits are flags ([`CallingConvention::GENERIC`], [`CallingConvention::HAS_THIS`],
/// [`CallingConvention::EXPLICIT_THIS`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CallingConvention(pub u8);

impl CallingConvention {
    /// Managed default calling convention
    pub const DEFAULT: u8 = 0x00;
    /// Unmanaged cdecl
    pub const C: u8 = 0x01;
    /// Unmanaged stdcall
    pub const STDCALL: u8 = 0x02;
    /// Unmanaged thiscall
    pub const THISCALL: u8 = 0x03;
    /// Unmanaged fastcall
    pub const FASTCALL: u8 = 0x04;
    /// Managed vararg
    pub const VARARG: u8 = 0x05;
    /// Field signature
    pub const FIELD: u8 = 0x06;
    /// Local variable signature
    pub const LOCAL_SIG: u8 = 0x07;
    /// Property signature
    pub const PROPERTY: u8 = 0x08;
    /// Unmanaged calling convention encoded in modifiers
    pub const UNMANAGED: u8 = 0x09;
    /// Generic method instantiation
    pub const GENERIC_INST: u8 = 0x0A;
    /// Native vararg
    pub const NATIVE_VARARG: u8 = 0x0B;
    /// Mask for the signature kind
    pub const MASK: u8 = 0x0F;
    /// Generic method signature
    pub const GENERIC: u8 = 0x10;
    /// Instance method or property
    pub const HAS_THIS: u8 = 0x20;
    /// The `this` pointer is the first explicit parameter
    pub const EXPLICIT_THIS: u8 = 0x40;
    /// Reserved
    pub const RESERVED: u8 = 0x80;

    /// The raw byte
    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// The signature kind (low nibble)
    #[must_use]
    pub fn kind(self) -> u8 {
        self.0 & Self::MASK
    }

    /// True if the `GENERIC` flag is set
    #[must_use]
    pub fn is_generic(self) -> bool {
        self.0 & Self::GENERIC != 0
    }

    /// True if the `HAS_THIS` flag is set
    #[must_use]
    pub fn has_this(self) -> bool {
        self.0 & Self::HAS_THIS != 0
    }

    /// True if the `EXPLICIT_THIS` flag is set
    #[must_use]
    pub fn explicit_this(self) -> bool {
        self.0 & Self::EXPLICIT_THIS != 0
    }

    /// True for managed and native vararg signatures
    #[must_use]
    pub fn is_vararg(self) -> bool {
        matches!(self.kind(), Self::VARARG | Self::NATIVE_VARARG)
    }
}

impl From<u8> for CallingConvention {
    fn from(value: u8) -> Self {
        CallingConvention(value)
    }
}

/// A type signature tree (ECMA-335 II.23.2.12)
#[derive(Debug, Clone)]
pub enum TypeSignature {
    /// `System.Void`
    Void,
    /// `System.Boolean`
    Boolean,
    /// `System.Char`
    Char,
    /// `System.SByte`
    I1,
    /// `System.Byte`
    U1,
    /// `System.Int16`
    I2,
    /// `System.UInt16`
    U2,
    /// `System.Int32`
    I4,
    /// `System.UInt32`
    U4,
    /// `System.Int64`
    I8,
    /// `System.UInt64`
    U8,
    /// `System.Single`
    R4,
    /// `System.Double`
    R8,
    /// `System.String`
    String,
    /// `System.TypedReference`
    TypedByRef,
    /// `System.IntPtr`
    I,
    /// `System.UIntPtr`
    U,
    /// `System.Object`
    Object,
    /// An unmanaged pointer to the inner type
    Ptr(Box<TypeSignature>),
    /// A managed reference to the inner type
    ByRef(Box<TypeSignature>),
    /// A value type
    ValueType(TypeDefOrRef),
    /// A reference type
    Class(TypeDefOrRef),
    /// A generic parameter of the declaring type
    GenericParamType(u32),
    /// A generic parameter of the declaring method
    GenericParamMethod(u32),
    /// A general (possibly multi-dimensional) array
    Array(SignatureArray),
    /// A generic type instantiation
    GenericInst(SignatureGenericInst),
    /// A function pointer
    FnPtr(Box<SignatureMethod>),
    /// A single-dimensional, zero based array
    SzArray(Box<TypeSignature>),
    /// A required custom modifier applied to the inner type
    ModifiedRequired(SignatureModifier),
    /// An optional custom modifier applied to the inner type
    ModifiedOptional(SignatureModifier),
    /// A fixed size value array (not part of ECMA-335)
    ValueArray(SignatureValueArray),
    /// A type living in another module (not part of ECMA-335)
    Module(SignatureModuleIndex),
    /// Marks the start of the vararg parameters of a call site
    Sentinel,
    /// A pinned local
    Pinned(Box<TypeSignature>),
}

/// A general array signature
#[derive(Debug, Clone)]
pub struct SignatureArray {
    /// The element type
    pub base: Box<TypeSignature>,
    /// The rank (number of dimensions)
    pub rank: u32,
    /// Sizes and lower bounds as far as they are encoded
    pub dimensions: Vec<ArrayDimensions>,
}

impl SignatureArray {
    /// Creates an array signature from the encoded size and lower bound lists.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if more sizes or lower bounds than dimensions are given.
    pub fn new(base: TypeSignature, rank: u32, sizes: &[u32], lower_bounds: &[i32]) -> Result<Self> {
        if sizes.len() > rank as usize || lower_bounds.len() > rank as usize {
            return Err(malformed_error!(
                "Array of rank {} with {} sizes and {} lower bounds",
                rank,
                sizes.len(),
                lower_bounds.len()
            ));
        }

        let count = sizes.len().max(lower_bounds.len());
        let dimensions = (0..count)
            .map(|i| ArrayDimensions {
                size: sizes.get(i).copied(),
                lower_bound: lower_bounds.get(i).copied(),
            })
            .collect();

        Ok(SignatureArray {
            base: Box::new(base),
            rank,
            dimensions,
        })
    }

    /// The encoded sizes, in dimension order
    pub fn sizes(&self) -> impl Iterator<Item = u32> + '_ {
        self.dimensions.iter().map_while(|dim| dim.size)
    }

    /// The encoded lower bounds, in dimension order
    pub fn lower_bounds(&self) -> impl Iterator<Item = i32> + '_ {
        self.dimensions.iter().map_while(|dim| dim.lower_bound)
    }
}

/// A generic instantiation `generic_type<generic_args...>`
#[derive(Debug, Clone)]
pub struct SignatureGenericInst {
    /// The generic type, a `ValueType` or `Class` node
    pub generic_type: Box<TypeSignature>,
    /// The type arguments
    pub generic_args: Vec<TypeSignature>,
}

/// A custom modifier applied to `base`
#[derive(Debug, Clone)]
pub struct SignatureModifier {
    /// The modifier type
    pub modifier: TypeDefOrRef,
    /// The modified type
    pub base: Box<TypeSignature>,
}

/// A fixed size value array
#[derive(Debug, Clone)]
pub struct SignatureValueArray {
    /// Number of elements
    pub size: u32,
    /// The element type
    pub base: Box<TypeSignature>,
}

/// A type living in another module of the same assembly
#[derive(Debug, Clone)]
pub struct SignatureModuleIndex {
    /// Module index
    pub index: u32,
    /// The type in that module
    pub base: Box<TypeSignature>,
}

impl TypeSignature {
    /// A reference type node
    #[must_use]
    pub fn class(ty: TypeDefOrRef) -> Self {
        TypeSignature::Class(ty)
    }

    /// A value type node
    #[must_use]
    pub fn value_type(ty: TypeDefOrRef) -> Self {
        TypeSignature::ValueType(ty)
    }

    /// A pointer to `base`
    #[must_use]
    pub fn ptr(base: TypeSignature) -> Self {
        TypeSignature::Ptr(Box::new(base))
    }

    /// A managed reference to `base`
    #[must_use]
    pub fn by_ref(base: TypeSignature) -> Self {
        TypeSignature::ByRef(Box::new(base))
    }

    /// A pinned `base`
    #[must_use]
    pub fn pinned(base: TypeSignature) -> Self {
        TypeSignature::Pinned(Box::new(base))
    }

    /// A zero based single-dimensional array of `base`
    #[must_use]
    pub fn sz_array(base: TypeSignature) -> Self {
        TypeSignature::SzArray(Box::new(base))
    }

    /// A general array of `base`
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if more sizes or lower bounds than dimensions are given.
    pub fn array(base: TypeSignature, rank: u32, sizes: &[u32], lower_bounds: &[i32]) -> Result<Self> {
        Ok(TypeSignature::Array(SignatureArray::new(
            base,
            rank,
            sizes,
            lower_bounds,
        )?))
    }

    /// A generic instantiation
    #[must_use]
    pub fn generic_inst(generic_type: TypeSignature, generic_args: Vec<TypeSignature>) -> Self {
        TypeSignature::GenericInst(SignatureGenericInst {
            generic_type: Box::new(generic_type),
            generic_args,
        })
    }

    /// A function pointer
    #[must_use]
    pub fn fn_ptr(signature: SignatureMethod) -> Self {
        TypeSignature::FnPtr(Box::new(signature))
    }

    /// A required modifier node
    #[must_use]
    pub fn modreq(modifier: TypeDefOrRef, base: TypeSignature) -> Self {
        TypeSignature::ModifiedRequired(SignatureModifier {
            modifier,
            base: Box::new(base),
        })
    }

    /// An optional modifier node
    #[must_use]
    pub fn modopt(modifier: TypeDefOrRef, base: TypeSignature) -> Self {
        TypeSignature::ModifiedOptional(SignatureModifier {
            modifier,
            base: Box::new(base),
        })
    }

    /// A value array node
    #[must_use]
    pub fn value_array(size: u32, base: TypeSignature) -> Self {
        TypeSignature::ValueArray(SignatureValueArray {
            size,
            base: Box::new(base),
        })
    }

    /// A module index node
    #[must_use]
    pub fn module(index: u32, base: TypeSignature) -> Self {
        TypeSignature::Module(SignatureModuleIndex {
            index,
            base: Box::new(base),
        })
    }

    /// The leaf signature of a primitive element kind
    #[must_use]
    pub fn from_primitive(element: ElementType) -> Option<Self> {
        Some(match element {
            ElementType::Void => TypeSignature::Void,
            ElementType::Boolean => TypeSignature::Boolean,
            ElementType::Char => TypeSignature::Char,
            ElementType::I1 => TypeSignature::I1,
            ElementType::U1 => TypeSignature::U1,
            ElementType::I2 => TypeSignature::I2,
            ElementType::U2 => TypeSignature::U2,
            ElementType::I4 => TypeSignature::I4,
            ElementType::U4 => TypeSignature::U4,
            ElementType::I8 => TypeSignature::I8,
            ElementType::U8 => TypeSignature::U8,
            ElementType::R4 => TypeSignature::R4,
            ElementType::R8 => TypeSignature::R8,
            ElementType::String => TypeSignature::String,
            ElementType::TypedByRef => TypeSignature::TypedByRef,
            ElementType::I => TypeSignature::I,
            ElementType::U => TypeSignature::U,
            ElementType::Object => TypeSignature::Object,
            _ => return None,
        })
    }

    /// The element kind of this node
    #[must_use]
    pub fn element_type(&self) -> ElementType {
        match self {
            TypeSignature::Void => ElementType::Void,
            TypeSignature::Boolean => ElementType::Boolean,
            TypeSignature::Char => ElementType::Char,
            TypeSignature::I1 => ElementType::I1,
            TypeSignature::U1 => ElementType::U1,
            TypeSignature::I2 => ElementType::I2,
            TypeSignature::U2 => ElementType::U2,
            TypeSignature::I4 => ElementType::I4,
            TypeSignature::U4 => ElementType::U4,
            TypeSignature::I8 => ElementType::I8,
            TypeSignature::U8 => ElementType::U8,
            TypeSignature::R4 => ElementType::R4,
            TypeSignature::R8 => ElementType::R8,
            TypeSignature::String => ElementType::String,
            TypeSignature::TypedByRef => ElementType::TypedByRef,
            TypeSignature::I => ElementType::I,
            TypeSignature::U => ElementType::U,
            TypeSignature::Object => ElementType::Object,
            TypeSignature::Ptr(_) => ElementType::Ptr,
            TypeSignature::ByRef(_) => ElementType::ByRef,
            TypeSignature::ValueType(_) => ElementType::ValueType,
            TypeSignature::Class(_) => ElementType::Class,
            TypeSignature::GenericParamType(_) => ElementType::Var,
            TypeSignature::GenericParamMethod(_) => ElementType::MVar,
            TypeSignature::Array(_) => ElementType::Array,
            TypeSignature::GenericInst(_) => ElementType::GenericInst,
            TypeSignature::FnPtr(_) => ElementType::FnPtr,
            TypeSignature::SzArray(_) => ElementType::SzArray,
            TypeSignature::ModifiedRequired(_) => ElementType::CModReqd,
            TypeSignature::ModifiedOptional(_) => ElementType::CModOpt,
            TypeSignature::ValueArray(_) => ElementType::ValueArray,
            TypeSignature::Module(_) => ElementType::Module,
            TypeSignature::Sentinel => ElementType::Sentinel,
            TypeSignature::Pinned(_) => ElementType::Pinned,
        }
    }

    /// The wrapped type of a single-child node
    #[must_use]
    pub fn next(&self) -> Option<&TypeSignature> {
        match self {
            TypeSignature::Ptr(base)
            | TypeSignature::ByRef(base)
            | TypeSignature::SzArray(base)
            | TypeSignature::Pinned(base) => Some(base),
            TypeSignature::Array(array) => Some(&array.base),
            TypeSignature::ModifiedRequired(modifier) | TypeSignature::ModifiedOptional(modifier) => {
                Some(&modifier.base)
            }
            TypeSignature::ValueArray(array) => Some(&array.base),
            TypeSignature::Module(module) => Some(&module.base),
            _ => None,
        }
    }

    /// Strips leading custom modifier nodes
    #[must_use]
    pub fn remove_modifiers(&self) -> &TypeSignature {
        let mut current = self;
        while let TypeSignature::ModifiedRequired(modifier) | TypeSignature::ModifiedOptional(modifier) =
            current
        {
            current = &modifier.base;
        }
        current
    }

    /// Strips leading custom modifier and pinned nodes
    #[must_use]
    pub fn remove_pinned_and_modifiers(&self) -> &TypeSignature {
        let mut current = self;
        loop {
            match current {
                TypeSignature::ModifiedRequired(modifier)
                | TypeSignature::ModifiedOptional(modifier) => current = &modifier.base,
                TypeSignature::Pinned(base) => current = base,
                _ => return current,
            }
        }
    }

    /// True for generic type and method parameters
    #[must_use]
    pub fn is_generic_parameter(&self) -> bool {
        matches!(
            self,
            TypeSignature::GenericParamType(_) | TypeSignature::GenericParamMethod(_)
        )
    }
}

/// A method or property signature
#[derive(Debug, Clone)]
pub struct SignatureMethod {
    /// Calling convention and flags
    pub calling_convention: CallingConvention,
    /// Number of generic parameters, only meaningful with [`CallingConvention::GENERIC`]
    pub param_count_generic: u32,
    /// The return type, or the property type for properties
    pub return_type: TypeSignature,
    /// The declared parameters
    pub params: Vec<TypeSignature>,
    /// Parameters following the sentinel of a vararg call site
    pub varargs: Vec<TypeSignature>,
}

impl SignatureMethod {
    /// A signature with the given raw calling convention
    #[must_use]
    pub fn new(
        calling_convention: CallingConvention,
        return_type: TypeSignature,
        params: Vec<TypeSignature>,
    ) -> Self {
        SignatureMethod {
            calling_convention,
            param_count_generic: 0,
            return_type,
            params,
            varargs: Vec::new(),
        }
    }

    /// A static method signature
    #[must_use]
    pub fn new_static(return_type: TypeSignature, params: Vec<TypeSignature>) -> Self {
        Self::new(
            CallingConvention(CallingConvention::DEFAULT),
            return_type,
            params,
        )
    }

    /// An instance method signature
    #[must_use]
    pub fn new_instance(return_type: TypeSignature, params: Vec<TypeSignature>) -> Self {
        Self::new(
            CallingConvention(CallingConvention::DEFAULT | CallingConvention::HAS_THIS),
            return_type,
            params,
        )
    }

    /// A property signature
    #[must_use]
    pub fn new_property(
        has_this: bool,
        property_type: TypeSignature,
        params: Vec<TypeSignature>,
    ) -> Self {
        let this = if has_this {
            CallingConvention::HAS_THIS
        } else {
            0
        };
        Self::new(
            CallingConvention(CallingConvention::PROPERTY | this),
            property_type,
            params,
        )
    }

    /// Makes this a generic method signature with `count` type parameters
    #[must_use]
    pub fn with_generic_params(mut self, count: u32) -> Self {
        self.calling_convention.0 |= CallingConvention::GENERIC;
        self.param_count_generic = count;
        self
    }

    /// Makes this a vararg call site signature with the given trailing parameters
    #[must_use]
    pub fn with_varargs(mut self, varargs: Vec<TypeSignature>) -> Self {
        self.calling_convention.0 =
            (self.calling_convention.0 & !CallingConvention::MASK) | CallingConvention::VARARG;
        self.varargs = varargs;
        self
    }

    /// True if the `GENERIC` flag is set
    #[must_use]
    pub fn is_generic(&self) -> bool {
        self.calling_convention.is_generic()
    }

    /// True if the `HAS_THIS` flag is set
    #[must_use]
    pub fn has_this(&self) -> bool {
        self.calling_convention.has_this()
    }
}

/// A field signature
#[derive(Debug, Clone)]
pub struct SignatureField {
    /// Calling convention, normally [`CallingConvention::FIELD`]
    pub calling_convention: CallingConvention,
    /// The field type
    pub base: TypeSignature,
}

impl SignatureField {
    /// A field signature of type `base`
    #[must_use]
    pub fn new(base: TypeSignature) -> Self {
        SignatureField {
            calling_convention: CallingConvention(CallingConvention::FIELD),
            base,
        }
    }
}

/// A local variable signature
#[derive(Debug, Clone)]
pub struct SignatureLocalVariables {
    /// Calling convention, normally [`CallingConvention::LOCAL_SIG`]
    pub calling_convention: CallingConvention,
    /// The local variable types
    pub locals: Vec<TypeSignature>,
}

impl SignatureLocalVariables {
    /// A local variable signature
    #[must_use]
    pub fn new(locals: Vec<TypeSignature>) -> Self {
        SignatureLocalVariables {
            calling_convention: CallingConvention(CallingConvention::LOCAL_SIG),
            locals,
        }
    }
}

/// A generic method instantiation
#[derive(Debug, Clone)]
pub struct SignatureMethodSpec {
    /// Calling convention, normally [`CallingConvention::GENERIC_INST`]
    pub calling_convention: CallingConvention,
    /// The method type arguments
    pub generic_args: Vec<TypeSignature>,
}

impl SignatureMethodSpec {
    /// An instantiation with the given arguments
    #[must_use]
    pub fn new(generic_args: Vec<TypeSignature>) -> Self {
        SignatureMethodSpec {
            calling_convention: CallingConvention(CallingConvention::GENERIC_INST),
            generic_args,
        }
    }
}

/// Any signature that starts with a calling convention byte
#[derive(Debug, Clone)]
pub enum CallingConventionSignature {
    /// A method signature
    Method(SignatureMethod),
    /// A property signature
    Property(SignatureMethod),
    /// A field signature
    Field(SignatureField),
    /// A local variable signature
    LocalVariables(SignatureLocalVariables),
    /// A generic method instantiation
    MethodSpec(SignatureMethodSpec),
}

impl CallingConventionSignature {
    /// The calling convention byte
    #[must_use]
    pub fn calling_convention(&self) -> CallingConvention {
        match self {
            CallingConventionSignature::Method(sig) | CallingConventionSignature::Property(sig) => {
                sig.calling_convention
            }
            CallingConventionSignature::Field(sig) => sig.calling_convention,
            CallingConventionSignature::LocalVariables(sig) => sig.calling_convention,
            CallingConventionSignature::MethodSpec(sig) => sig.calling_convention,
        }
    }

    /// The method signature, if this is one
    #[must_use]
    pub fn as_method(&self) -> Option<&SignatureMethod> {
        match self {
            CallingConventionSignature::Method(sig) => Some(sig),
            _ => None,
        }
    }

    /// The field signature, if this is one
    #[must_use]
    pub fn as_field(&self) -> Option<&SignatureField> {
        match self {
            CallingConventionSignature::Field(sig) => Some(sig),
            _ => None,
        }
    }
}

impl From<SignatureMethod> for CallingConventionSignature {
    fn from(sig: SignatureMethod) -> Self {
        if sig.calling_convention.kind() == CallingConvention::PROPERTY {
            CallingConventionSignature::Property(sig)
        } else {
            CallingConventionSignature::Method(sig)
        }
    }
}

impl From<SignatureField> for CallingConventionSignature {
    fn from(sig: SignatureField) -> Self {
        CallingConventionSignature::Field(sig)
    }
}
