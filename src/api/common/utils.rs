use std::future::Future;
use std::time::Duration;

use crate::errors::AppError;

/// Bounds a store call. An elapsed timer becomes `AppError::Timeout`.
pub async fn with_timeout<T, F>(duration: Duration, fut: F) -> Result<T, AppError>
where
    F: Future<Output = Result<T, AppError>>,
{
    match tokio::time::timeout(duration, fut).await {
        Ok(res) => res,
        Err(elapsed) => {
            tracing::error!("Store call timed out after {:?}", duration);
            Err(AppError::Timeout(elapsed))
        }
    }
}

pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

pub fn new_document_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn slow_calls_time_out() {
        let result: Result<(), AppError> = with_timeout(Duration::from_millis(10), async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(AppError::Timeout(_))));
    }

    #[tokio::test]
    async fn inner_errors_pass_through() {
        let result: Result<(), AppError> = with_timeout(Duration::from_secs(1), async {
            Err(AppError::NotFound("gone".into()))
        })
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
