//! Depth bound for the mutually recursive comparison and hash routines.

use crate::comparer::MAX_RECURSION_DEPTH;

/// Counts the nesting depth of one comparison session.
///
/// Once [`RecursionGuard::enter`] refuses, the guard remembers it so the top-level call
/// can report the conservative default for the whole session.
#[derive(Debug, Default)]
pub(crate) struct RecursionGuard {
    depth: usize,
    exceeded: bool,
}

impl RecursionGuard {
    /// Enters one level. Returns `false` if the bound is reached; the caller must not
    /// call [`RecursionGuard::exit`] in that case.
    pub(crate) fn enter(&mut self) -> bool {
        if self.depth >= MAX_RECURSION_DEPTH {
            if !self.exceeded {
                log::debug!("Comparison exceeded the recursion limit of {}", MAX_RECURSION_DEPTH);
            }
            self.exceeded = true;
            return false;
        }
        self.depth += 1;
        true
    }

    pub(crate) fn exit(&mut self) {
        debug_assert!(self.depth > 0, "unbalanced recursion guard");
        self.depth = self.depth.saturating_sub(1);
    }

    pub(crate) fn exceeded(&self) -> bool {
        self.exceeded
    }

    #[cfg(test)]
    pub(crate) fn depth(&self) -> usize {
        self.depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound() {
        let mut guard = RecursionGuard::default();
        for _ in 0..MAX_RECURSION_DEPTH {
            assert!(guard.enter());
        }
        assert!(!guard.exceeded());
        assert!(!guard.enter());
        assert!(guard.exceeded());
        assert_eq!(guard.depth(), MAX_RECURSION_DEPTH);

        guard.exit();
        assert!(guard.enter());
        // Stays flagged for the rest of the session
        assert!(guard.exceeded());
    }
}
