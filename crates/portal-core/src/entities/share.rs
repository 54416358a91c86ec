//! Exam share link - time-limited read-only access without authentication

use chrono::{DateTime, Utc};

/// Share link granting anonymous read access to one exam until `expires_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamShare {
    pub id: i64,
    pub exam_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ExamShare {
    /// Check if the link is past its expiry
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_expiry() {
        let now = Utc::now();
        let share = ExamShare {
            id: 1,
            exam_id: 1,
            token: "abc".to_string(),
            expires_at: now + Duration::hours(1),
            created_at: now,
        };
        assert!(!share.is_expired(now));
        assert!(share.is_expired(now + Duration::hours(2)));
    }
}
