use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// The comparison engine itself never fails: structural mismatches, unresolvable references
/// and depth-exceeded sessions all produce a conservative result (`false` / `0`). Errors are
/// only surfaced by entity construction helpers that validate their input and by the checked
/// entry points of [`crate::comparer::SigComparer`].
///
/// # Error Categories
///
/// ## Entity Construction Errors
/// - [`Error::Malformed`] - Inconsistent entity data (array shapes, version strings)
/// - [`Error::OutOfBounds`] - Not enough bytes to build a value (public key tokens)
/// - [`Error::NotSupported`] - Unsupported hash algorithm or feature
///
/// ## Comparison Errors
/// - [`Error::RecursionLimit`] - Maximum recursion depth exceeded during a checked comparison
///
/// # Examples
///
/// ```rust
/// use cilcompare::{Error, metadata::identity::Identity};
///
/// match Identity::from(&[1, 2, 3], false) {
///     Ok(identity) => println!("Token identity"),
///     Err(Error::OutOfBounds) => println!("A token needs eight bytes"),
///     Err(e) => println!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The entity data is inconsistent and could not be used.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An out of bound access was attempted while reading raw bytes.
    #[error("Out of Bound read would have occurred!")]
    OutOfBounds,

    /// This feature is not supported.
    ///
    /// Returned for hash algorithms other than MD5 and SHA1 when deriving
    /// a public key token.
    #[error("This feature is not supported")]
    NotSupported,

    /// Recursion limit reached.
    ///
    /// The comparison walked deeper than the fixed bound, which happens for cyclic or
    /// adversarially deep structures. The contained value is the bound that was hit.
    #[error("Reach the maximum recursion level allowed - {0}")]
    RecursionLimit(usize),
}
