//! Outcome values returned by the storage adapter.

/// Result of reading one snapshot.
///
/// Keeps "empty because nothing was stored" apart from "empty because the
/// read failed", even though most callers treat all non-`Found` cases the same.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    Found(T),
    /// Nothing stored under the key.
    Missing,
    /// The store failed its availability probe or the read failed.
    Unavailable,
    /// A value exists but could not be deserialized.
    Corrupt,
}

impl<T> Lookup<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }
}

/// Result of a write, remove or clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// Skipped: the store failed its availability probe.
    Unavailable,
    /// The store was available but the operation failed (quota, IO, encoding).
    Failed,
}

impl WriteOutcome {
    pub fn is_written(self) -> bool {
        self == WriteOutcome::Written
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_option_collapses_failures() {
        assert_eq!(Lookup::Found(3).into_option(), Some(3));
        assert_eq!(Lookup::<i32>::Missing.into_option(), None);
        assert_eq!(Lookup::<i32>::Unavailable.into_option(), None);
        assert_eq!(Lookup::<i32>::Corrupt.into_option(), None);
    }
}
