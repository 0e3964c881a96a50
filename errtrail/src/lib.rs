//! # errtrail
//!
//! Error annotation that keeps track of where an error has been.
//!
//! ## Design Philosophy
//!
//! - **Cause**: the error callers should reason about; kept by
//!   [`trace`] and [`annotate`], replaced by [`new`], [`mask`] and [`wrap`]
//! - **Message**: each step may prefix the message; the rendered text reads
//!   outermost annotation first, `"ctx: more ctx: original"`
//! - **Location**: every step records its call site, so [`error_stack`]
//!   shows one line per step, oldest first
//! - **Kind**: classified errors carry a [`Kind`] tag and an HTTP-style
//!   status code, checked with predicates such as [`is_not_found`]
//!
//! ## Usage
//!
//! ```rust
//! use errtrail::{annotate, cause, error_stack, new, trace, Error};
//!
//! fn open() -> Option<Error> {
//!     Some(new("connection refused"))
//! }
//!
//! fn connect() -> Option<Error> {
//!     annotate(trace(open()), "connecting to db")
//! }
//!
//! let err = connect().unwrap();
//! assert_eq!(err.to_string(), "connecting to db: connection refused");
//! assert_eq!(cause(&err).to_string(), "connection refused");
//! assert_eq!(error_stack(&err).lines().count(), 3);
//! ```
//!
//! ## Principles
//!
//! - Every composition function passes `None` through, so errors can be
//!   annotated unconditionally
//! - Callers branch on [`cause`] and the `is_*` predicates, never on the
//!   previous links of a chain
//! - Foreign errors join a chain as they are; nothing is required of them
//!   beyond `std::error::Error`

mod classified;
mod error;
mod ext;
mod frame;
mod functions;
mod kind;
mod location;
mod path;
mod report;
mod stack;

pub use classified::{
    already_exists, bad_request, classified, internal_server, is_already_exists,
    is_bad_request, is_internal_server, is_kind, is_method_not_allowed, is_not_assigned,
    is_not_found, is_not_implemented, is_not_provisioned, is_not_supported, is_not_valid,
    is_unauthorized, is_user_not_found, method_not_allowed, new_already_exists,
    new_bad_request, new_classified, new_internal_server, new_method_not_allowed,
    new_not_assigned, new_not_found, new_not_implemented, new_not_provisioned,
    new_not_supported, new_not_valid, new_unauthorized, new_user_not_found, not_assigned,
    not_found, not_implemented, not_provisioned, not_supported, not_valid, status_code,
    unauthorized, user_not_found, Classified,
};
pub use error::{Error, IntoError};
pub use ext::ResultExt;
pub use frame::{Frame, Traced, APPLICATION_JSON, TEXT_PLAIN};
pub use functions::{
    annotate, cause, cause_of, deferred_annotate, mask, maskf, new, trace, wrap, wrapf,
};
pub use kind::Kind;
pub use location::Location;
pub use path::{init_path_prefix, path_prefix};
pub use report::report;
pub use stack::{details, error_stack, MAX_STACK_DEPTH};

/// Result type alias using errtrail Error
pub type Result<T> = std::result::Result<T, Error>;

#[doc(hidden)]
pub mod __private {
    pub use crate::classified::classify_in;
    pub use crate::functions::{link, CauseRule};
}
