//! Startup readiness loop.
//!
//! The server, the migration runner and the `wait-for-db` binary all block on
//! [`wait_for_database`] before touching the schema.

use std::time::Duration;

use tracing::{info, warn};

use crate::domain::DomainError;
use crate::domain::ports::DatabasePing;

/// How often and how long to poll the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Pause between failed attempts.
    pub interval: Duration,
    /// Give up after this many attempts. `None` waits forever.
    pub max_attempts: Option<u32>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: None,
        }
    }
}

/// Poll `database` until it succeeds.
///
/// Returns the number of attempts made.
///
/// # Errors
///
/// `service_unavailable` once `max_attempts` failures have been seen.
pub async fn wait_for_database<P>(database: &P, policy: RetryPolicy) -> Result<u32, DomainError>
where
    P: DatabasePing + ?Sized,
{
    let mut attempt: u32 = 0;
    loop {
        attempt = attempt.saturating_add(1);
        match database.ping().await {
            Ok(()) => {
                info!(attempts = attempt, "database available");
                return Ok(attempt);
            }
            Err(err) => {
                warn!(attempt, error = %err, "database unavailable, waiting");
                if policy.max_attempts.is_some_and(|max| attempt >= max) {
                    return Err(DomainError::service_unavailable(format!(
                        "database still unavailable after {attempt} attempts"
                    )));
                }
                tokio::time::sleep(policy.interval).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockDatabasePing, PingError};
    use mockall::Sequence;

    fn quick(max_attempts: Option<u32>) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(1),
            max_attempts,
        }
    }

    #[tokio::test]
    async fn keeps_polling_until_the_database_answers() {
        let mut database = MockDatabasePing::new();
        let mut seq = Sequence::new();
        database
            .expect_ping()
            .times(5)
            .in_sequence(&mut seq)
            .returning(|| Err(PingError::unreachable("connection refused")));
        database
            .expect_ping()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|| Ok(()));

        let attempts = wait_for_database(&database, quick(None))
            .await
            .expect("database eventually answers");

        assert_eq!(attempts, 6);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let mut database = MockDatabasePing::new();
        database
            .expect_ping()
            .times(3)
            .returning(|| Err(PingError::unreachable("connection refused")));

        let err = wait_for_database(&database, quick(Some(3)))
            .await
            .expect_err("never answers");

        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }

    #[tokio::test]
    async fn first_success_returns_immediately() {
        let mut database = MockDatabasePing::new();
        database.expect_ping().times(1).returning(|| Ok(()));

        let attempts = wait_for_database(&database, quick(Some(1)))
            .await
            .expect("available");

        assert_eq!(attempts, 1);
    }
}
