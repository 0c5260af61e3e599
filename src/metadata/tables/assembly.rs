//! `Assembly` and `AssemblyRef` rows together with assembly versions and the
//! [`AssemblyName`] capability the comparer uses to compare assembly identities.
//!
//! # Core library detection
//!
//! The platform base library has been shipped under several names over the years
//! (`mscorlib`, `System.Runtime`, `System.Private.CoreLib`, `netstandard`, `corefx`).
//! Any culture-neutral assembly with one of these names is treated as *the* core library
//! by [`is_core_library_name`]; definitions may override the detection with
//! [`Assembly::core_library`].

use std::{fmt, str::FromStr, sync::Arc};

use crate::{
    metadata::{identity::Identity, token::Token},
    Error, Result,
};

/// A reference to an `Assembly`
pub type AssemblyRc = Arc<Assembly>;
/// A reference to an `AssemblyRef`
pub type AssemblyRefRc = Arc<AssemblyRef>;

/// Names under which the platform base library is shipped.
pub const CORE_LIBRARY_NAMES: [&str; 5] = [
    "mscorlib",
    "System.Runtime",
    "System.Private.CoreLib",
    "netstandard",
    "corefx",
];

#[allow(non_snake_case)]
/// All possible flags for `AssemblyFlags`
pub mod AssemblyFlags {
    /// The assembly reference holds the full (unhashed) public key
    pub const PUBLIC_KEY: u32 = 0x0001;
    /// The implementation of this assembly used at runtime is not expected to match the version seen at compile time
    pub const RETARGETABLE: u32 = 0x0100;
    /// The assembly is a Windows Runtime metadata file
    pub const CONTENT_TYPE_WINDOWS_RUNTIME: u32 = 0x0200;
}

#[allow(non_snake_case)]
/// All possible values for `AssemblyHashAlgorithm`
pub mod AssemblyHashAlgorithm {
    /// No hash algorithm specified
    pub const NONE: u32 = 0x0000;
    /// MD5 hash algorithm
    pub const MD5: u32 = 0x8003;
    /// SHA1 hash algorithm
    pub const SHA1: u32 = 0x8004;
}

/// Returns true if `name` with `culture` names the platform base library.
///
/// The culture must be neutral (absent, empty or `"neutral"`), the name is compared
/// case-insensitively.
#[must_use]
pub fn is_core_library_name(name: &str, culture: Option<&str>) -> bool {
    is_neutral_culture(culture)
        && CORE_LIBRARY_NAMES
            .iter()
            .any(|corlib| corlib.eq_ignore_ascii_case(name))
}

/// Returns true if the culture is absent, empty or `"neutral"`.
#[must_use]
pub fn is_neutral_culture(culture: Option<&str>) -> bool {
    match culture {
        None => true,
        Some(culture) => culture.is_empty() || culture.eq_ignore_ascii_case("neutral"),
    }
}

/// A four part assembly version.
///
/// Versions order component-wise, starting with `major`. Rows that carry no version
/// report [`AssemblyVersion::UNKNOWN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct AssemblyVersion {
    /// Major version component.
    pub major: u16,
    /// Minor version component.
    pub minor: u16,
    /// Build version component.
    pub build: u16,
    /// Revision version component.
    pub revision: u16,
}

impl AssemblyVersion {
    /// Sentinel value (0.0.0.0) representing an unknown or unspecified version.
    pub const UNKNOWN: Self = Self {
        major: 0,
        minor: 0,
        build: 0,
        revision: 0,
    };

    /// Create a new assembly version with the specified components.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cilcompare::metadata::tables::AssemblyVersion;
    ///
    /// let version = AssemblyVersion::new(1, 2, 3, 4);
    /// assert_eq!(version.major, 1);
    /// assert_eq!(version.revision, 4);
    /// ```
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Builds a version from the four 2-byte row columns, which are stored widened to `u32`.
    #[must_use]
    pub fn from_columns(major: u32, minor: u32, build: u32, revision: u32) -> Self {
        Self::new(major as u16, minor as u16, build as u16, revision as u16)
    }

    /// Check if this version represents an unknown/unspecified version.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.major == 0 && self.minor == 0 && self.build == 0 && self.revision == 0
    }

    /// Parse a dotted version string with one to four components.
    ///
    /// Missing trailing components are zero.
    ///
    /// # Errors
    /// Returns [`Error::Malformed`] if the version string has an invalid format.
    pub fn parse(version_str: &str) -> Result<Self> {
        let parts: Vec<&str> = version_str.split('.').collect();

        if parts.is_empty() || parts.len() > 4 {
            return Err(malformed_error!("Invalid version format: {}", version_str));
        }

        let mut components = [0u16; 4];
        for (i, part) in parts.iter().enumerate() {
            components[i] = part
                .parse::<u16>()
                .map_err(|_| malformed_error!("Invalid version component: {}", part))?;
        }

        Ok(Self::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl FromStr for AssemblyVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// The identity facts of an assembly, whichever row or view it comes from.
///
/// Implemented by [`Assembly`], [`AssemblyRef`] and
/// [`crate::runtime::RuntimeAssembly`].
pub trait AssemblyName {
    /// The simple name
    fn name(&self) -> &str;
    /// The version, [`AssemblyVersion::UNKNOWN`] if none is recorded
    fn version(&self) -> AssemblyVersion;
    /// The culture, `None` for neutral assemblies
    fn culture(&self) -> Option<&str>;
    /// The public key token, derived from the public key if needed
    fn public_key_token(&self) -> Option<u64>;
    /// True if this assembly is the platform base library
    fn is_core_library(&self) -> bool {
        is_core_library_name(self.name(), self.culture())
    }
}

/// The `Assembly` table holds the identity of the assembly a module manifests.
#[derive(Debug)]
pub struct Assembly {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The `AssemblyHashAlgorithm` used for the file hashes of this assembly
    pub hash_alg_id: u32,
    /// a 2-byte value specifying the Major version number
    pub major_version: u32,
    /// a 2-byte value specifying the Minor version number
    pub minor_version: u32,
    /// a 2-byte value specifying the Build number
    pub build_number: u32,
    /// a 2-byte value specifying the Revision number
    pub revision_number: u32,
    /// a 4-byte bitmask of type `AssemblyFlags`
    pub flags: u32,
    /// The full public key, if the assembly is strong named
    pub public_key: Option<Identity>,
    /// The name of the Assembly
    pub name: String,
    /// Culture string
    pub culture: Option<String>,
    /// Overrides core library detection when set
    pub core_library: Option<bool>,
}

impl Assembly {
    /// Creates a culture neutral, unversioned, not strong named assembly.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Assembly {
            rid: 1,
            token: Token::from_parts(Token::ASSEMBLY, 1),
            hash_alg_id: AssemblyHashAlgorithm::SHA1,
            major_version: 0,
            minor_version: 0,
            build_number: 0,
            revision_number: 0,
            flags: 0,
            public_key: None,
            name: name.to_string(),
            culture: None,
            core_library: None,
        }
    }

    /// Sets the version columns
    #[must_use]
    pub fn with_version(mut self, version: AssemblyVersion) -> Self {
        self.major_version = u32::from(version.major);
        self.minor_version = u32::from(version.minor);
        self.build_number = u32::from(version.build);
        self.revision_number = u32::from(version.revision);
        self
    }

    /// Sets the culture
    #[must_use]
    pub fn with_culture(mut self, culture: &str) -> Self {
        self.culture = Some(culture.to_string());
        self
    }

    /// Sets the full public key and the `PUBLIC_KEY` flag
    #[must_use]
    pub fn with_public_key(mut self, key: &[u8]) -> Self {
        self.public_key = Some(Identity::PubKey(key.to_vec()));
        self.flags |= AssemblyFlags::PUBLIC_KEY;
        self
    }

    /// Forces core library detection on or off
    #[must_use]
    pub fn with_core_library(mut self, core_library: bool) -> Self {
        self.core_library = Some(core_library);
        self
    }
}

impl AssemblyName for Assembly {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> AssemblyVersion {
        AssemblyVersion::from_columns(
            self.major_version,
            self.minor_version,
            self.build_number,
            self.revision_number,
        )
    }

    fn culture(&self) -> Option<&str> {
        self.culture.as_deref()
    }

    fn public_key_token(&self) -> Option<u64> {
        self.public_key.as_ref().and_then(Identity::public_key_token)
    }

    fn is_core_library(&self) -> bool {
        self.core_library
            .unwrap_or_else(|| is_core_library_name(&self.name, self.culture.as_deref()))
    }
}

/// The `AssemblyRef` table contains references to external assemblies.
#[derive(Debug)]
pub struct AssemblyRef {
    /// `RowID`
    pub rid: u32,
    /// Token
    pub token: Token,
    /// The name of the Assembly
    pub name: String,
    /// Culture string
    pub culture: Option<String>,
    /// a 2-byte value specifying the Major version number
    pub major_version: u32,
    /// a 2-byte value specifying the Minor version number
    pub minor_version: u32,
    /// a 2-byte value specifying the Build number
    pub build_number: u32,
    /// a 2-byte value specifying the Revision number
    pub revision_number: u32,
    /// a 4-byte bitmask of type `AssemblyFlags`
    pub flags: u32,
    /// The identifier of the referenced assembly, either a pub-key or token
    pub identifier: Option<Identity>,
}

impl AssemblyRef {
    /// Creates a culture neutral, unversioned reference without identifier.
    #[must_use]
    pub fn new(rid: u32, name: &str) -> Self {
        AssemblyRef {
            rid,
            token: Token::from_parts(Token::ASSEMBLY_REF, rid),
            name: name.to_string(),
            culture: None,
            major_version: 0,
            minor_version: 0,
            build_number: 0,
            revision_number: 0,
            flags: 0,
            identifier: None,
        }
    }

    /// Sets the version columns
    #[must_use]
    pub fn with_version(mut self, version: AssemblyVersion) -> Self {
        self.major_version = u32::from(version.major);
        self.minor_version = u32::from(version.minor);
        self.build_number = u32::from(version.build);
        self.revision_number = u32::from(version.revision);
        self
    }

    /// Sets the culture
    #[must_use]
    pub fn with_culture(mut self, culture: &str) -> Self {
        self.culture = Some(culture.to_string());
        self
    }

    /// Sets the identifier, updating the `PUBLIC_KEY` flag to match
    #[must_use]
    pub fn with_identifier(mut self, identifier: Identity) -> Self {
        match identifier {
            Identity::PubKey(_) => self.flags |= AssemblyFlags::PUBLIC_KEY,
            Identity::Token(_) => self.flags &= !AssemblyFlags::PUBLIC_KEY,
        }
        self.identifier = Some(identifier);
        self
    }
}

impl AssemblyName for AssemblyRef {
    fn name(&self) -> &str {
        &self.name
    }

    fn version(&self) -> AssemblyVersion {
        AssemblyVersion::from_columns(
            self.major_version,
            self.minor_version,
            self.build_number,
            self.revision_number,
        )
    }

    fn culture(&self) -> Option<&str> {
        self.culture.as_deref()
    }

    fn public_key_token(&self) -> Option<u64> {
        self.identifier.as_ref().and_then(Identity::public_key_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_library_names() {
        assert!(is_core_library_name("mscorlib", None));
        assert!(is_core_library_name("MSCORLIB", Some("")));
        assert!(is_core_library_name("System.Private.CoreLib", Some("neutral")));
        assert!(is_core_library_name("netstandard", None));
        assert!(!is_core_library_name("mscorlib", Some("de-DE")));
        assert!(!is_core_library_name("System.Core", None));
    }

    #[test]
    fn test_core_library_override() {
        let fake = Assembly::new("MyCorlib").with_core_library(true);
        assert!(fake.is_core_library());

        let demoted = Assembly::new("mscorlib").with_core_library(false);
        assert!(!demoted.is_core_library());

        assert!(Assembly::new("System.Runtime").is_core_library());
    }

    #[test]
    fn test_version_parse() {
        assert_eq!(
            AssemblyVersion::parse("4.0.0.0").unwrap(),
            AssemblyVersion::new(4, 0, 0, 0)
        );
        assert_eq!(
            "2.1".parse::<AssemblyVersion>().unwrap(),
            AssemblyVersion::new(2, 1, 0, 0)
        );
        assert!(AssemblyVersion::parse("1.2.3.4.5").is_err());
        assert!(matches!(
            AssemblyVersion::parse("1.x"),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_version_columns_roundtrip_display() {
        let asm = AssemblyRef::new(1, "System").with_version(AssemblyVersion::new(4, 0, 1, 2));
        assert_eq!(asm.version().to_string(), "4.0.1.2");
        assert!(AssemblyRef::new(2, "x").version().is_unknown());
    }

    #[test]
    fn test_identifier_sets_flag() {
        let with_key = AssemblyRef::new(1, "a").with_identifier(Identity::PubKey(vec![1, 2]));
        assert_eq!(with_key.flags & AssemblyFlags::PUBLIC_KEY, AssemblyFlags::PUBLIC_KEY);

        let with_token = AssemblyRef::new(1, "a").with_identifier(Identity::Token(7));
        assert_eq!(with_token.flags & AssemblyFlags::PUBLIC_KEY, 0);
        assert_eq!(with_token.public_key_token(), Some(7));
    }
}
