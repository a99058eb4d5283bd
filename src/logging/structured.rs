//! Structured logging utilities.
//!
//! Provides context-aware logging with trip_id and user_id included in
//! every log message.

use std::fmt;

/// Logging context for one engine operation.
#[derive(Debug, Clone)]
pub struct LogContext {
    pub trip_id: String,
    pub user_id: Option<String>,
}

impl LogContext {
    pub fn new(trip_id: &str) -> Self {
        Self {
            trip_id: trip_id.to_string(),
            user_id: None,
        }
    }

    pub fn with_user(&self, user_id: &str) -> Self {
        Self {
            trip_id: self.trip_id.clone(),
            user_id: Some(user_id.to_string()),
        }
    }
}

impl fmt::Display for LogContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.user_id {
            Some(uid) => write!(f, "[trip={}] [user={}]", self.trip_id, uid),
            None => write!(f, "[trip={}]", self.trip_id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_context_display() {
        let ctx = LogContext::new("trip-123");
        assert_eq!(format!("{}", ctx), "[trip=trip-123]");

        let ctx_with_user = ctx.with_user("user-456");
        assert_eq!(
            format!("{}", ctx_with_user),
            "[trip=trip-123] [user=user-456]"
        );
    }
}
