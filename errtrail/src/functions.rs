//! Composition functions
//!
//! Every function that takes an input error passes `None` through, so an
//! error can be annotated unconditionally on the way out of a function.
//!
//! | Function | message | cause | previous |
//! |---|---|---|---|
//! | [`new`] / [`errorf!`](crate::errorf) | text | itself | none |
//! | [`trace`] | empty | cause of `err` | `err` |
//! | [`annotate`] | text | cause of `err` | `err` |
//! | [`mask`] / [`maskf`] | empty / text | itself | `err` |
//! | [`wrap`] / [`wrapf`] | empty / text | `new` | `err` |

use crate::{Error, Frame};

/// How a new node derives its cause from the node it is built on.
#[doc(hidden)]
pub enum CauseRule {
    /// Keep the cause found below (trace, annotate)
    Keep,
    /// The new node is its own cause (new, mask)
    Reset,
    /// Substitute a new cause (wrap)
    Replace(Error),
}

/// Build a node on `previous`. Shared by the functions, the `Error`
/// methods and the macros, which also pass the enclosing function.
#[doc(hidden)]
#[track_caller]
pub fn link(
    previous: Option<Error>,
    rule: CauseRule,
    message: String,
    function: &'static str,
) -> Error {
    let cause = match rule {
        CauseRule::Keep => cause_of(previous.as_ref()),
        CauseRule::Reset => None,
        CauseRule::Replace(new) => Some(new),
    };
    let mut frame = Frame::chained(previous, cause, message);
    frame.set_function(function);
    frame.into()
}

/// The cause of an error.
///
/// For an annotated node with an explicit cause this is that cause (one
/// level, no further resolution). Every other error is its own cause.
/// [`trace`] and [`annotate`] keep the cause of the error they build on;
/// [`new`], [`mask`] and [`wrap`] set a new one.
pub fn cause(err: &Error) -> Error {
    match err.frame().and_then(Frame::cause) {
        Some(cause) => cause.clone(),
        None => err.clone(),
    }
}

/// [`cause`] for a possibly absent error
pub fn cause_of(err: Option<&Error>) -> Option<Error> {
    err.map(cause)
}

/// Create a new error located at the caller.
#[track_caller]
pub fn new(message: impl Into<String>) -> Error {
    link(None, CauseRule::Reset, message.into(), "")
}

/// Record the caller's location on `err`, keeping its message and cause.
#[track_caller]
pub fn trace(err: impl Into<Option<Error>>) -> Option<Error> {
    match err.into() {
        Some(err) => Some(err.trace()),
        None => None,
    }
}

/// Prefix the message of `err`, keeping its cause.
#[track_caller]
pub fn annotate(err: impl Into<Option<Error>>, message: impl Into<String>) -> Option<Error> {
    match err.into() {
        Some(err) => Some(err.annotate(message)),
        None => None,
    }
}

/// Hide the cause of `err`; the result is its own cause.
#[track_caller]
pub fn mask(err: impl Into<Option<Error>>) -> Option<Error> {
    match err.into() {
        Some(err) => Some(err.mask()),
        None => None,
    }
}

/// Hide the cause of `err` and prefix its message.
#[track_caller]
pub fn maskf(err: impl Into<Option<Error>>, message: impl Into<String>) -> Option<Error> {
    match err.into() {
        Some(err) => Some(err.mask_with(message)),
        None => None,
    }
}

/// Substitute `new` for `err`, keeping `err` in the stack trace.
///
/// Unlike the other functions this always returns a node: wrapping `None`
/// still yields an error whose message is `new`'s.
#[track_caller]
pub fn wrap(err: impl Into<Option<Error>>, new: impl Into<Error>) -> Error {
    link(err.into(), CauseRule::Replace(new.into()), String::new(), "")
}

/// [`wrap`] with a message prefix.
#[track_caller]
pub fn wrapf(err: impl Into<Option<Error>>, new: impl Into<Error>, message: impl Into<String>) -> Error {
    link(err.into(), CauseRule::Replace(new.into()), message.into(), "")
}

/// Annotate the error held in `err`, in place.
///
/// Meant for an error slot filled later in a function; does nothing when
/// the slot is empty. The recorded location is this call.
#[track_caller]
pub fn deferred_annotate(err: &mut Option<Error>, message: impl Into<String>) {
    if let Some(previous) = err.take() {
        *err = Some(previous.annotate(message));
    }
}

// =============================================================================
// Macros - formatted variants that also record the enclosing function
// =============================================================================

/// Create a new error from format arguments.
///
/// ```rust
/// let err = errtrail::errorf!("testing {}", 42);
/// assert_eq!(err.to_string(), "testing 42");
/// ```
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::__private::link(
            ::core::option::Option::None,
            $crate::__private::CauseRule::Reset,
            ::std::format!($($arg)+),
            $crate::__function!(),
        )
    };
}

/// [`trace`](crate::trace()) that also records the enclosing function.
#[macro_export]
macro_rules! trace {
    ($err:expr $(,)?) => {
        match ::core::convert::Into::<::core::option::Option<$crate::Error>>::into($err) {
            ::core::option::Option::Some(err) => ::core::option::Option::Some($crate::__private::link(
                ::core::option::Option::Some(err),
                $crate::__private::CauseRule::Keep,
                ::std::string::String::new(),
                $crate::__function!(),
            )),
            ::core::option::Option::None => ::core::option::Option::None,
        }
    };
}

/// [`annotate`](crate::annotate()) with format arguments.
///
/// ```rust
/// let first = errtrail::new("first");
/// let err = errtrail::annotatef!(first, "annotation {}", 2).unwrap();
/// assert_eq!(err.to_string(), "annotation 2: first");
/// ```
#[macro_export]
macro_rules! annotatef {
    ($err:expr, $($arg:tt)+) => {
        match ::core::convert::Into::<::core::option::Option<$crate::Error>>::into($err) {
            ::core::option::Option::Some(err) => ::core::option::Option::Some($crate::__private::link(
                ::core::option::Option::Some(err),
                $crate::__private::CauseRule::Keep,
                ::std::format!($($arg)+),
                $crate::__function!(),
            )),
            ::core::option::Option::None => ::core::option::Option::None,
        }
    };
}

/// [`maskf`](crate::maskf()) with format arguments.
#[macro_export]
macro_rules! maskf {
    ($err:expr, $($arg:tt)+) => {
        match ::core::convert::Into::<::core::option::Option<$crate::Error>>::into($err) {
            ::core::option::Option::Some(err) => ::core::option::Option::Some($crate::__private::link(
                ::core::option::Option::Some(err),
                $crate::__private::CauseRule::Reset,
                ::std::format!($($arg)+),
                $crate::__function!(),
            )),
            ::core::option::Option::None => ::core::option::Option::None,
        }
    };
}

/// [`wrapf`](crate::wrapf()) with format arguments.
#[macro_export]
macro_rules! wrapf {
    ($err:expr, $new:expr, $($arg:tt)+) => {
        $crate::__private::link(
            ::core::convert::Into::<::core::option::Option<$crate::Error>>::into($err),
            $crate::__private::CauseRule::Replace(::core::convert::Into::<$crate::Error>::into($new)),
            ::std::format!($($arg)+),
            $crate::__function!(),
        )
    };
}
