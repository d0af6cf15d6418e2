//! Command execution helpers
//!
//! Provides utilities to reduce boilerplate when implementing commands with
//! timing and logging.

use std::future::Future;
use std::time::Instant;

use artistcal_domain::Result as DomainResult;

use crate::utils::logging::{error_label, log_command_execution};

/// Execute a command with automatic timing and outcome logging
///
/// # Example
///
/// ```rust,ignore
/// pub async fn my_command(ctx: &AppContext) -> Result<MyResponse> {
///     execute_command("my_module::my_command", || async {
///         ctx.calendar.do_something().await
///     })
///     .await
/// }
/// ```
pub async fn execute_command<F, Fut, T>(command_name: &str, command_fn: F) -> DomainResult<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = DomainResult<T>>,
{
    let start = Instant::now();

    let result = command_fn().await;

    let error_type = result.as_ref().err().map(error_label);
    log_command_execution(command_name, start.elapsed(), error_type);

    result
}

#[cfg(test)]
mod tests {
    use artistcal_domain::CalendarError;

    use super::*;

    #[tokio::test]
    async fn passes_through_success_and_failure() {
        let ok = execute_command("test::ok", || async { Ok::<_, CalendarError>(7) }).await;
        assert_eq!(ok.unwrap(), 7);

        let err = execute_command("test::err", || async {
            Err::<(), _>(CalendarError::Pending("in flight".into()))
        })
        .await;
        assert!(matches!(err, Err(CalendarError::Pending(_))));
    }
}
