use bitflags::bitflags;

bitflags! {
    /// Switches controlling what [`crate::comparer::SigComparer`] considers equal.
    ///
    /// The bit values match the comparer options of the .NET metadata tooling, so option
    /// sets can be exchanged with it as plain integers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SigComparerOptions: u32 {
        /// Don't compare the resolution scope, implementation or module of types
        const DONT_COMPARE_TYPE_SCOPE = 0x0000_0001;
        /// Compare the declaring types of methods and fields
        const COMPARE_METHOD_FIELD_DECLARING_TYPE = 0x0000_0002;
        /// Compare the declaring types of properties
        const COMPARE_PROPERTY_DECLARING_TYPE = 0x0000_0004;
        /// Compare the declaring types of events
        const COMPARE_EVENT_DECLARING_TYPE = 0x0000_0008;
        /// Compare the declaring types of all members
        const COMPARE_DECLARING_TYPES = Self::COMPARE_METHOD_FIELD_DECLARING_TYPE.bits()
            | Self::COMPARE_PROPERTY_DECLARING_TYPE.bits()
            | Self::COMPARE_EVENT_DECLARING_TYPE.bits();
        /// Compare the parameters following the vararg sentinel
        const COMPARE_SENTINEL_PARAMS = 0x0000_0010;
        /// Compare assembly public key tokens
        const COMPARE_ASSEMBLY_PUBLIC_KEY_TOKEN = 0x0000_0020;
        /// Compare assembly versions
        const COMPARE_ASSEMBLY_VERSION = 0x0000_0040;
        /// Compare assembly cultures
        const COMPARE_ASSEMBLY_LOCALE = 0x0000_0080;
        /// A type reference may resolve to the `<Module>` type of a module
        const TYPE_REF_CAN_REFERENCE_GLOBAL_TYPE = 0x0000_0100;
        /// Ignore method return types
        const DONT_COMPARE_RETURN_TYPE = 0x0000_0200;
        /// Case insensitive namespaces
        const CASE_INSENSITIVE_TYPE_NAMESPACES = 0x0000_0800;
        /// Case insensitive type names
        const CASE_INSENSITIVE_TYPE_NAMES = 0x0000_1000;
        /// Case insensitive namespaces and type names
        const CASE_INSENSITIVE_TYPES = Self::CASE_INSENSITIVE_TYPE_NAMESPACES.bits()
            | Self::CASE_INSENSITIVE_TYPE_NAMES.bits();
        /// Case insensitive method and field names
        const CASE_INSENSITIVE_METHOD_FIELD_NAMES = 0x0000_2000;
        /// Case insensitive property names
        const CASE_INSENSITIVE_PROPERTY_NAMES = 0x0000_4000;
        /// Case insensitive event names
        const CASE_INSENSITIVE_EVENT_NAMES = 0x0000_8000;
        /// All names are case insensitive
        const CASE_INSENSITIVE_ALL = Self::CASE_INSENSITIVE_TYPES.bits()
            | Self::CASE_INSENSITIVE_METHOD_FIELD_NAMES.bits()
            | Self::CASE_INSENSITIVE_PROPERTY_NAMES.bits()
            | Self::CASE_INSENSITIVE_EVENT_NAMES.bits();
        /// A compiler-controlled field may match a member reference
        const PRIVATE_SCOPE_FIELD_IS_COMPARABLE = 0x0001_0000;
        /// A compiler-controlled method may match a member reference
        const PRIVATE_SCOPE_METHOD_IS_COMPARABLE = 0x0002_0000;
        /// Compiler-controlled fields and methods may match member references
        const PRIVATE_SCOPE_IS_COMPARABLE = Self::PRIVATE_SCOPE_FIELD_IS_COMPARABLE.bits()
            | Self::PRIVATE_SCOPE_METHOD_IS_COMPARABLE.bits();
        /// Compare the raw tokens of types referenced from signatures
        const RAW_SIGNATURE_COMPARE = 0x0004_0000;
        /// Skip custom modifiers when comparing signatures
        const IGNORE_MODIFIERS = 0x0008_0000;
        /// Treat the core library like any other assembly
        const MSCORLIB_IS_NOT_SPECIAL = 0x0010_0000;
        /// Don't project foreign-ABI references to their native counterparts
        const DONT_PROJECT_WIN_MD_REFS = 0x0020_0000;
        /// Don't consult the type equivalence oracle
        const DONT_CHECK_TYPE_EQUIVALENCE = 0x0040_0000;
        /// Ignore sizes and lower bounds of multi-dimensional arrays
        const IGNORE_MULTI_DIMENSIONAL_ARRAY_LOWER_BOUNDS_AND_SIZES = 0x0080_0000;
        /// Distinct definitions of one module are never equal, whatever their structure
        const REFERENCE_COMPARE_FOR_MEMBER_DEFS_IN_SAME_MODULE = 0x0100_0000;
    }
}

impl SigComparerOptions {
    pub(crate) fn dont_compare_type_scope(self) -> bool {
        self.contains(Self::DONT_COMPARE_TYPE_SCOPE)
    }

    pub(crate) fn compare_method_field_declaring_type(self) -> bool {
        self.contains(Self::COMPARE_METHOD_FIELD_DECLARING_TYPE)
    }

    pub(crate) fn compare_property_declaring_type(self) -> bool {
        self.contains(Self::COMPARE_PROPERTY_DECLARING_TYPE)
    }

    pub(crate) fn compare_event_declaring_type(self) -> bool {
        self.contains(Self::COMPARE_EVENT_DECLARING_TYPE)
    }

    pub(crate) fn compare_sentinel_params(self) -> bool {
        self.contains(Self::COMPARE_SENTINEL_PARAMS)
    }

    pub(crate) fn compare_assembly_public_key_token(self) -> bool {
        self.contains(Self::COMPARE_ASSEMBLY_PUBLIC_KEY_TOKEN)
    }

    pub(crate) fn compare_assembly_version(self) -> bool {
        self.contains(Self::COMPARE_ASSEMBLY_VERSION)
    }

    pub(crate) fn compare_assembly_locale(self) -> bool {
        self.contains(Self::COMPARE_ASSEMBLY_LOCALE)
    }

    pub(crate) fn case_insensitive_type_namespaces(self) -> bool {
        self.contains(Self::CASE_INSENSITIVE_TYPE_NAMESPACES)
    }

    pub(crate) fn case_insensitive_type_names(self) -> bool {
        self.contains(Self::CASE_INSENSITIVE_TYPE_NAMES)
    }

    pub(crate) fn case_insensitive_method_field_names(self) -> bool {
        self.contains(Self::CASE_INSENSITIVE_METHOD_FIELD_NAMES)
    }

    pub(crate) fn case_insensitive_property_names(self) -> bool {
        self.contains(Self::CASE_INSENSITIVE_PROPERTY_NAMES)
    }

    pub(crate) fn case_insensitive_event_names(self) -> bool {
        self.contains(Self::CASE_INSENSITIVE_EVENT_NAMES)
    }

    pub(crate) fn type_ref_can_reference_global_type(self) -> bool {
        self.contains(Self::TYPE_REF_CAN_REFERENCE_GLOBAL_TYPE)
    }

    pub(crate) fn dont_compare_return_type(self) -> bool {
        self.contains(Self::DONT_COMPARE_RETURN_TYPE)
    }

    pub(crate) fn private_scope_field_is_comparable(self) -> bool {
        self.contains(Self::PRIVATE_SCOPE_FIELD_IS_COMPARABLE)
    }

    pub(crate) fn private_scope_method_is_comparable(self) -> bool {
        self.contains(Self::PRIVATE_SCOPE_METHOD_IS_COMPARABLE)
    }

    pub(crate) fn raw_signature_compare(self) -> bool {
        self.contains(Self::RAW_SIGNATURE_COMPARE)
    }

    pub(crate) fn ignore_modifiers(self) -> bool {
        self.contains(Self::IGNORE_MODIFIERS)
    }

    pub(crate) fn mscorlib_is_not_special(self) -> bool {
        self.contains(Self::MSCORLIB_IS_NOT_SPECIAL)
    }

    pub(crate) fn dont_project_win_md_refs(self) -> bool {
        self.contains(Self::DONT_PROJECT_WIN_MD_REFS)
    }

    pub(crate) fn dont_check_type_equivalence(self) -> bool {
        self.contains(Self::DONT_CHECK_TYPE_EQUIVALENCE)
    }

    pub(crate) fn ignore_multi_dimensional_array_bounds(self) -> bool {
        self.contains(Self::IGNORE_MULTI_DIMENSIONAL_ARRAY_LOWER_BOUNDS_AND_SIZES)
    }

    pub(crate) fn reference_compare_for_member_defs(self) -> bool {
        self.contains(Self::REFERENCE_COMPARE_FOR_MEMBER_DEFS_IN_SAME_MODULE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_composite_values() {
        assert_eq!(SigComparerOptions::COMPARE_DECLARING_TYPES.bits(), 0xE);
        assert_eq!(SigComparerOptions::CASE_INSENSITIVE_TYPES.bits(), 0x1800);
        assert_eq!(SigComparerOptions::CASE_INSENSITIVE_ALL.bits(), 0xF800);
        assert_eq!(SigComparerOptions::PRIVATE_SCOPE_IS_COMPARABLE.bits(), 0x30000);
    }

    #[test]
    fn test_internal_bit_is_not_public() {
        // 0x400 is reserved for the internal substitution switch
        assert!(SigComparerOptions::from_bits(0x400).is_none());
        assert_eq!(SigComparerOptions::from_bits_truncate(0x401), SigComparerOptions::DONT_COMPARE_TYPE_SCOPE);
    }
}
