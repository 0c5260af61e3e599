//! The hash composition table shared by every hash routine.
//!
//! Equal entities must hash equally across all of their representations, including the
//! runtime view. All routines therefore assemble their hash codes from the same pieces:
//! the magic constants below for structural kinds, [`name_hash`] for names, and
//! [`list_hash`] for ordered lists. Addition is wrapping `i32` arithmetic throughout.

/// The `<Module>` type, a `ModuleRef` member reference parent and a missing declaring type
pub(crate) const GLOBAL_TYPE: i32 = 1_654_396_648;
/// Added instead of the namespace hash for nested types
pub(crate) const NESTED_TYPE: i32 = -1_049_070_942;
pub(crate) const ET_MODULE: i32 = -299_744_851;
pub(crate) const ET_VALUEARRAY: i32 = -674_970_533;
pub(crate) const ET_GENERICINST: i32 = -2_050_514_639;
pub(crate) const ET_VAR: i32 = 1_288_450_097;
pub(crate) const ET_MVAR: i32 = -990_598_495;
pub(crate) const ET_ARRAY: i32 = -96_331_531;
pub(crate) const ET_SZARRAY: i32 = 871_833_535;
pub(crate) const ET_BYREF: i32 = -634_749_586;
pub(crate) const ET_PTR: i32 = 1_976_400_808;
pub(crate) const ET_SENTINEL: i32 = 68_439_620;

/// Name of the type holding the global members of a module
pub(crate) const GLOBAL_TYPE_NAME: &str = "<Module>";

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

/// FNV-1a over the characters of `name`, upper-cased first when `case_insensitive`
pub(crate) fn name_hash(case_insensitive: bool, name: &str) -> i32 {
    let fold = |state: u32, c: char| (state ^ u32::from(c)).wrapping_mul(FNV_PRIME);
    let hash = if case_insensitive {
        name.chars().flat_map(char::to_uppercase).fold(FNV_OFFSET_BASIS, fold)
    } else {
        name.chars().fold(FNV_OFFSET_BASIS, fold)
    };
    hash as i32
}

/// Name equality matching [`name_hash`]
pub(crate) fn names_equal(case_insensitive: bool, a: &str, b: &str) -> bool {
    if case_insensitive {
        a.chars()
            .flat_map(char::to_uppercase)
            .eq(b.chars().flat_map(char::to_uppercase))
    } else {
        a == b
    }
}

/// True if a top level type named `namespace.name` names the `<Module>` type, names
/// compared the way [`names_equal`] compares them
pub(crate) fn is_global_type_name(case_insensitive: bool, namespace: &str, name: &str) -> bool {
    namespace.is_empty() && names_equal(case_insensitive, name, GLOBAL_TYPE_NAME)
}

/// Order sensitive fold of element hashes: add, then rotate left by 13
pub(crate) fn list_hash(hashes: impl IntoIterator<Item = i32>) -> i32 {
    hashes
        .into_iter()
        .fold(0u32, |state, hash| state.wrapping_add(hash as u32).rotate_left(13)) as i32
}

/// The hash of `count` generic parameters of kind `magic`
pub(crate) fn generic_count_hash(count: usize, magic: i32) -> i32 {
    list_hash((0..count).map(|i| magic.wrapping_add(i as i32)))
}

/// The hash of `count` method generic parameters
pub(crate) fn method_generic_count_hash(count: usize) -> i32 {
    generic_count_hash(count, ET_MVAR)
}

/// The hash `System.IntPtr` gets, shared by function pointer signatures
pub(crate) fn system_intptr_hash(namespaces_case_insensitive: bool, names_case_insensitive: bool) -> i32 {
    name_hash(namespaces_case_insensitive, "System")
        .wrapping_add(name_hash(names_case_insensitive, "IntPtr"))
}
