//! Error-chain logging helpers.

use std::error::Error as StdError;

/// Walks the source chain of an error and logs every link, optionally
/// with a context label.
pub fn log_error_chain<E>(error: &E, context: Option<&str>)
where
    E: StdError + 'static,
{
    let mut error_chain = Vec::new();
    let mut current_error: Option<&dyn StdError> = Some(error);

    while let Some(err) = current_error {
        error_chain.push(err.to_string());
        current_error = err.source();
    }

    if let Some(ctx) = context {
        tracing::error!(
            context = %ctx,
            error_chain = ?error_chain,
            "error with full chain"
        );
    } else {
        tracing::error!(error_chain = ?error_chain, "error with full chain");
    }
}

/// Extension trait that logs the error chain of a `Result` in passing.
///
/// ```ignore
/// store.create_session(ttl)
///     .await
///     .log_error_context("creating admin session")?;
/// ```
pub trait ErrorLogExt<T, E> {
    fn log_error_chain(self) -> Result<T, E>;
    fn log_error_context(self, context: &str) -> Result<T, E>;
}

impl<T, E> ErrorLogExt<T, E> for Result<T, E>
where
    E: StdError + 'static,
{
    fn log_error_chain(self) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, None);
        }
        self
    }

    fn log_error_context(self, context: &str) -> Result<T, E> {
        if let Err(ref error) = self {
            log_error_chain(error, Some(context));
        }
        self
    }
}
