//! User identifiers.
//!
//! An identifier is an opaque string. The default generator produces
//! hyphenated UUID v4 values, but callers must not parse or order them.

use crate::error::{UserError, UserResult};

pub trait IdGenerator: Send + Sync {
    fn generate(&self) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn generate(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}

/// Reject identifiers that cannot name any user.
pub fn ensure_id(id: &str) -> UserResult<()> {
    if id.trim().is_empty() {
        return Err(UserError::InvalidArgument("id must not be empty".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuid_generator_unique() {
        let ids = UuidGenerator;
        let a = ids.generate();
        let b = ids.generate();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }

    #[test]
    fn test_ensure_id() {
        assert!(ensure_id("3f1c").is_ok());
        assert!(matches!(ensure_id(""), Err(UserError::InvalidArgument(_))));
        assert!(matches!(ensure_id("   "), Err(UserError::InvalidArgument(_))));
    }
}
