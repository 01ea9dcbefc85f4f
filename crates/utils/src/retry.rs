// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use std::{fmt::Display, future::Future, time::Duration};
use tokio::time::sleep;
use tracing::{error, warn};

/// Tells [`retry_with_backoff`] whether an error is worth another attempt
pub enum RetryError<E> {
    Failure(E),
    Retry(E),
}

/// Retries an async operation with exponential backoff
///
/// # Arguments
/// * `operation` - Async function to retry, it receives the attempt number starting at 1
/// * `max_attempts` - Maximum number of attempts, values below 1 are treated as 1
/// * `initial_delay_ms` - Initial delay between retries in milliseconds
///
/// # Returns
/// The first successful value, the first `Failure`, or the last `Retry` error once attempts
/// are exhausted.
pub async fn retry_with_backoff<F, Fut, T, E>(
    operation: F,
    max_attempts: u32,
    initial_delay_ms: u64,
) -> Result<T, E>
where
    F: Fn(u32) -> Fut,
    Fut: Future<Output = Result<T, RetryError<E>>>,
    E: Display,
{
    let max_attempts = max_attempts.max(1);
    let mut current_attempt = 1;
    let mut delay_ms = initial_delay_ms;

    loop {
        match operation(current_attempt).await {
            Ok(value) => return Ok(value),
            Err(RetryError::Retry(e)) => {
                if current_attempt >= max_attempts {
                    error!("Operation failed after {} attempts. Last error: {}", max_attempts, e);
                    return Err(e);
                }

                warn!(
                    "Attempt {}/{} failed, retrying in {}ms: {}",
                    current_attempt, max_attempts, delay_ms, e
                );

                sleep(Duration::from_millis(delay_ms)).await;
                current_attempt += 1;
                delay_ms = delay_ms.saturating_mul(2);
            }
            Err(RetryError::Failure(e)) => return Err(e),
        }
    }
}
