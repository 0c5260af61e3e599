//! Strong-name identities of .NET assemblies.
//!
//! An assembly is identified either by its full public key or by the public key token,
//! which is the last eight bytes of the hash of the public key, stored in reverse order.
//! Definitions usually carry the full key and references the token, so comparisons
//! reduce both to tokens first.
//!
//! # Key Types
//! - [`Identity`] - Represents either a full public key or a token identity
//!
//! # Example
//! ```rust
//! use cilcompare::metadata::{identity::Identity, tables::AssemblyHashAlgorithm};
//!
//! // The ECMA standard public key
//! let key = Identity::from(&[0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0], true)?;
//! let token = Identity::from(&[0xb7, 0x7a, 0x5c, 0x56, 0x19, 0x34, 0xe0, 0x89], false)?;
//! assert_eq!(
//!     key.to_token(AssemblyHashAlgorithm::SHA1)?,
//!     token.to_token(AssemblyHashAlgorithm::SHA1)?
//! );
//! # Ok::<(), cilcompare::Error>(())
//! ```

use crate::{metadata::tables::AssemblyHashAlgorithm, Error, Result};

use md5::{Digest, Md5};
use sha1::Sha1;

/// An identifier for `Assembly` in .NET CIL.
/// Can be either a public-key or a hashed Token, indication from 'Flags'.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Identity {
    /// The full RSA public-key
    PubKey(Vec<u8>),
    /// The public key token, read little-endian from the eight token bytes
    Token(u64),
}

impl Identity {
    /// Create an `Identity` from raw data.
    ///
    /// # Arguments
    /// * `data`    - The data to create the identity from
    /// * `is_pub`  - Is it a token, or a public-key
    ///
    /// # Errors
    /// Returns [`Error::OutOfBounds`] if a token is requested from less than eight bytes.
    pub fn from(data: &[u8], is_pub: bool) -> Result<Self> {
        Ok(if is_pub {
            Identity::PubKey(data.to_vec())
        } else {
            let bytes: [u8; 8] = data
                .get(..8)
                .and_then(|slice| slice.try_into().ok())
                .ok_or(Error::OutOfBounds)?;
            Identity::Token(u64::from_le_bytes(bytes))
        })
    }

    /// Get the token based on the provided `algo`.
    ///
    /// The token bytes are the last 8 bytes of the hash of the public-key in reverse order,
    /// so the value read back matches a `Token` identity built from the stored token bytes.
    ///
    /// # Arguments
    /// * `algo` - The `AssemblyHashAlgorithm` used to hash the public key
    ///
    /// # Errors
    /// Returns [`Error::NotSupported`] if the algorithm is neither MD5 nor SHA1.
    pub fn to_token(&self, algo: u32) -> Result<u64> {
        match &self {
            Identity::PubKey(data) => {
                let digest = match algo {
                    AssemblyHashAlgorithm::MD5 => Md5::digest(data).to_vec(),
                    AssemblyHashAlgorithm::SHA1 => Sha1::digest(data).to_vec(),
                    _ => return Err(Error::NotSupported),
                };

                let tail: [u8; 8] = digest
                    .get(digest.len() - 8..)
                    .and_then(|slice| slice.try_into().ok())
                    .ok_or(Error::OutOfBounds)?;
                Ok(u64::from_be_bytes(tail))
            }
            Identity::Token(token) => Ok(*token),
        }
    }

    /// The public key token as used for identity comparison.
    ///
    /// Public keys are always reduced with SHA1, the algorithm the runtime uses for
    /// public key tokens regardless of the assembly's file hash algorithm.
    #[must_use]
    pub fn public_key_token(&self) -> Option<u64> {
        self.to_token(AssemblyHashAlgorithm::SHA1).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECMA_KEY: [u8; 16] = [0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0];
    const ECMA_TOKEN: [u8; 8] = [0xb7, 0x7a, 0x5c, 0x56, 0x19, 0x34, 0xe0, 0x89];

    #[test]
    fn test_identity_from_pubkey() {
        let data = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];
        let identity = Identity::from(&data, true).unwrap();

        match identity {
            Identity::PubKey(pubkey_data) => assert_eq!(pubkey_data, data),
            Identity::Token(_) => panic!("Expected PubKey variant"),
        }
    }

    #[test]
    fn test_identity_from_token() {
        let data = vec![0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        let identity = Identity::from(&data, false).unwrap();
        assert_eq!(identity, Identity::Token(0xF0DEBC9A78563412));
    }

    #[test]
    fn test_identity_from_token_insufficient_data() {
        let result = Identity::from(&[1, 2, 3], false);
        assert!(matches!(result, Err(Error::OutOfBounds)));
    }

    #[test]
    fn test_ecma_key_reduces_to_known_token() {
        let key = Identity::from(&ECMA_KEY, true).unwrap();
        let token = Identity::from(&ECMA_TOKEN, false).unwrap();

        assert_eq!(
            key.to_token(AssemblyHashAlgorithm::SHA1).unwrap(),
            token.to_token(AssemblyHashAlgorithm::SHA1).unwrap()
        );
        assert_eq!(key.public_key_token(), token.public_key_token());
    }

    #[test]
    fn test_to_token_md5_differs_from_sha1() {
        let key: Vec<u8> = (0..=255).collect();
        let identity = Identity::PubKey(key);

        let md5 = identity.to_token(AssemblyHashAlgorithm::MD5).unwrap();
        let sha1 = identity.to_token(AssemblyHashAlgorithm::SHA1).unwrap();
        assert_ne!(md5, sha1);
    }

    #[test]
    fn test_to_token_unsupported_algorithm() {
        let identity = Identity::PubKey(vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(matches!(identity.to_token(0x9999), Err(Error::NotSupported)));
    }

    #[test]
    fn test_token_identity_ignores_algorithm() {
        let identity = Identity::Token(0x1234_5678_9ABC_DEF0);
        assert_eq!(
            identity.to_token(AssemblyHashAlgorithm::NONE).unwrap(),
            0x1234_5678_9ABC_DEF0
        );
    }
}
