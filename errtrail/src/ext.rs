//! Composition on `Result`

use crate::{report, Error, IntoError, Result};

/// Annotate the error side of a `Result` on its way out.
///
/// ```rust
/// use errtrail::{not_found, ResultExt};
///
/// fn find(id: u32) -> errtrail::Result<String> {
///     Err(not_found(format!("user {id}")))
/// }
///
/// fn profile(id: u32) -> errtrail::Result<String> {
///     let name = find(id).annotate("loading profile")?;
///     Ok(format!("profile of {name}"))
/// }
///
/// let err = profile(7).unwrap_err();
/// assert_eq!(err.to_string(), "loading profile: user 7 not found");
/// assert!(errtrail::is_not_found(&err));
/// ```
pub trait ResultExt<T> {
    /// Record the caller's location on the error.
    fn trace(self) -> Result<T>;

    /// Prefix the error's message, keeping its cause.
    fn annotate(self, message: impl Into<String>) -> Result<T>;

    /// [`ResultExt::annotate`] with a lazily built message.
    fn with_annotation<M, F>(self, message: F) -> Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M;

    /// Hide the error's cause.
    fn mask(self) -> Result<T>;

    /// Substitute the error built by `new` as the cause.
    fn wrap<F>(self, new: F) -> Result<T>
    where
        F: FnOnce() -> Error;

    /// Report the error through `tracing` and pass it on.
    fn log_err(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: IntoError,
{
    #[track_caller]
    fn trace(self) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.into_error().trace()),
        }
    }

    #[track_caller]
    fn annotate(self, message: impl Into<String>) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.into_error().annotate(message)),
        }
    }

    #[track_caller]
    fn with_annotation<M, F>(self, message: F) -> Result<T>
    where
        M: Into<String>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.into_error().annotate(message())),
        }
    }

    #[track_caller]
    fn mask(self) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.into_error().mask()),
        }
    }

    #[track_caller]
    fn wrap<F>(self, new: F) -> Result<T>
    where
        F: FnOnce() -> Error,
    {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.into_error().wrap(new())),
        }
    }

    fn log_err(self) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => {
                let err = err.into_error();
                report(&err);
                Err(err)
            }
        }
    }
}
