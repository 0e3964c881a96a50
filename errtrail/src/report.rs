//! Reporting errors through `tracing`

use crate::{error_stack, Error};

/// Emit one `error` event for `err`.
///
/// Fields: `error` (the composed message), `kind` (classification of the
/// cause, or `unclassified`), `code` (status code of the cause, 0 when
/// unset) and `stack` (the stack trace, oldest node first).
pub fn report(err: &Error) {
    let cause = err.cause();
    tracing::error!(
        error = %err,
        kind = cause.kind().map_or("unclassified", |kind| kind.as_str()),
        code = cause.code(),
        stack = %error_stack(err),
        "operation failed"
    );
}
