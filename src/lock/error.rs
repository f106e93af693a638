use std::fmt;

use crate::kv::KvError;

/// Error type for lock operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockError {
    /// The backing key-value store failed.
    Store(KvError),
}

impl fmt::Display for LockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LockError::Store(e) => write!(f, "lock store error: {}", e),
        }
    }
}

impl std::error::Error for LockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LockError::Store(e) => Some(e),
        }
    }
}

impl From<KvError> for LockError {
    fn from(err: KvError) -> Self {
        LockError::Store(err)
    }
}
