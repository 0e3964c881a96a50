//! Classified errors
//!
//! A classified error is a node tagged with a [`Kind`] and, for HTTP-mapped
//! kinds, a status code. Classified nodes are their own cause, so the
//! classification survives any later [`trace`](crate::trace()) or
//! [`annotate`](crate::annotate()) and is found again through
//! [`cause`](crate::cause):
//!
//! ```rust
//! use errtrail::{annotate, is_not_found, not_found};
//!
//! let err = not_found("user 42");
//! assert_eq!(err.to_string(), "user 42 not found");
//!
//! let err = annotate(err, "loading profile").unwrap();
//! assert!(is_not_found(&err));
//! assert_eq!(errtrail::status_code(&err), Some(404));
//! ```

use crate::{cause, Error, Frame, Kind, Traced};

/// A [`Frame`] tagged with a [`Kind`].
#[derive(Debug, Clone)]
pub struct Classified {
    frame: Frame,
    kind: Kind,
}

impl Classified {
    /// Create a classified error with `message` as is, located at the caller.
    #[track_caller]
    pub fn new(kind: Kind, message: impl Into<String>) -> Self {
        Self::wrapping(None, kind, message)
    }

    /// Create a classified error built on `err`.
    ///
    /// `err` stays visible in the message and the stack trace, but the new
    /// node is its own cause.
    #[track_caller]
    pub fn wrapping(err: impl Into<Option<Error>>, kind: Kind, message: impl Into<String>) -> Self {
        let mut frame = Frame::chained(err.into(), None, message.into());
        frame.set_code(kind.status_code().unwrap_or(0));
        Self { frame, kind }
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }
}

impl Traced for Classified {
    fn frame(&self) -> &Frame {
        &self.frame
    }

    fn frame_mut(&mut self) -> Option<&mut Frame> {
        Some(&mut self.frame)
    }
}

/// Create a classified error; the kind's suffix is appended to `message`.
#[track_caller]
pub fn classified(kind: Kind, message: impl Into<String>) -> Error {
    let mut message = message.into();
    message.push_str(kind.suffix());
    Classified::new(kind, message).into()
}

/// Create a classified error that wraps `err`.
#[track_caller]
pub fn new_classified(kind: Kind, err: impl Into<Option<Error>>, message: impl Into<String>) -> Error {
    Classified::wrapping(err, kind, message).into()
}

/// Whether the cause of `err` is classified as `kind`
pub fn is_kind(err: &Error, kind: Kind) -> bool {
    cause(err)
        .downcast_ref::<Classified>()
        .is_some_and(|classified| classified.kind == kind)
}

/// Status code of the cause of `err`, if it carries one
pub fn status_code(err: &Error) -> Option<u16> {
    Some(cause(err).code()).filter(|code| *code != 0)
}

#[doc(hidden)]
#[track_caller]
pub fn classify_in(kind: Kind, message: String, function: &'static str) -> Error {
    let mut err = Classified::new(kind, message + kind.suffix());
    err.frame.set_function(function);
    err.into()
}

/// Create a classified error from format arguments; the kind's suffix is
/// appended.
///
/// ```rust
/// use errtrail::{classified, is_not_valid, Kind};
///
/// let err = classified!(Kind::NotValid, "port {}", 70000);
/// assert_eq!(err.to_string(), "port 70000 not valid");
/// assert!(is_not_valid(&err));
/// ```
#[macro_export]
macro_rules! classified {
    ($kind:expr, $($arg:tt)+) => {
        $crate::__private::classify_in($kind, ::std::format!($($arg)+), $crate::__function!())
    };
}

macro_rules! kinds {
    ($($kind:ident => $make:ident, $wrap:ident, $is:ident;)+) => {
        $(
            #[doc = concat!("Create a [`Kind::", stringify!($kind), "`] error; the kind's suffix is appended to `message`.")]
            #[track_caller]
            pub fn $make(message: impl Into<String>) -> Error {
                classified(Kind::$kind, message)
            }

            #[doc = concat!("Create a [`Kind::", stringify!($kind), "`] error that wraps `err`.")]
            #[track_caller]
            pub fn $wrap(err: impl Into<Option<Error>>, message: impl Into<String>) -> Error {
                new_classified(Kind::$kind, err, message)
            }

            #[doc = concat!("Whether the cause of `err` is a [`Kind::", stringify!($kind), "`] error")]
            pub fn $is(err: &Error) -> bool {
                is_kind(err, Kind::$kind)
            }
        )+
    };
}

kinds! {
    NotFound => not_found, new_not_found, is_not_found;
    Unauthorized => unauthorized, new_unauthorized, is_unauthorized;
    NotImplemented => not_implemented, new_not_implemented, is_not_implemented;
    BadRequest => bad_request, new_bad_request, is_bad_request;
    MethodNotAllowed => method_not_allowed, new_method_not_allowed, is_method_not_allowed;
    InternalServer => internal_server, new_internal_server, is_internal_server;
    AlreadyExists => already_exists, new_already_exists, is_already_exists;
    NotSupported => not_supported, new_not_supported, is_not_supported;
    NotValid => not_valid, new_not_valid, is_not_valid;
    NotProvisioned => not_provisioned, new_not_provisioned, is_not_provisioned;
    NotAssigned => not_assigned, new_not_assigned, is_not_assigned;
    UserNotFound => user_not_found, new_user_not_found, is_user_not_found;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{annotate, deferred_annotate, path, trace};
    use std::fmt;

    #[derive(Debug)]
    struct External(&'static str);

    impl fmt::Display for External {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl std::error::Error for External {}

    fn external(message: &'static str) -> Error {
        Error::from_std(External(message))
    }

    /// The named constructor and predicate of every kind
    struct KindFns {
        kind: Kind,
        make: fn(String) -> Error,
        wrap: fn(Option<Error>, &'static str) -> Error,
        is: fn(&Error) -> bool,
    }

    macro_rules! kind_fns {
        ($($kind:ident => $make:ident, $wrap:ident, $is:ident;)+) => {
            vec![$(KindFns {
                kind: Kind::$kind,
                make: |message| $make(message),
                wrap: |err, message| $wrap(err, message),
                is: $is,
            },)+]
        };
    }

    fn all_kinds() -> Vec<KindFns> {
        kind_fns! {
            NotFound => not_found, new_not_found, is_not_found;
            Unauthorized => unauthorized, new_unauthorized, is_unauthorized;
            NotImplemented => not_implemented, new_not_implemented, is_not_implemented;
            BadRequest => bad_request, new_bad_request, is_bad_request;
            MethodNotAllowed => method_not_allowed, new_method_not_allowed, is_method_not_allowed;
            InternalServer => internal_server, new_internal_server, is_internal_server;
            AlreadyExists => already_exists, new_already_exists, is_already_exists;
            NotSupported => not_supported, new_not_supported, is_not_supported;
            NotValid => not_valid, new_not_valid, is_not_valid;
            NotProvisioned => not_provisioned, new_not_provisioned, is_not_provisioned;
            NotAssigned => not_assigned, new_not_assigned, is_not_assigned;
            UserNotFound => user_not_found, new_user_not_found, is_user_not_found;
        }
    }

    /// `err` satisfies exactly the predicate of `expected`, or none at all.
    fn check_exclusive(err: &Error, expected: Option<Kind>, kinds: &[KindFns]) {
        for fns in kinds {
            assert_eq!(
                (fns.is)(err),
                Some(fns.kind) == expected,
                "{:?} against is_* of {}",
                err,
                fns.kind
            );
        }
        assert_eq!(err.kind(), expected);
    }

    #[test]
    fn test_all_kinds() {
        let kinds = all_kinds();
        assert_eq!(kinds.len(), Kind::ALL.len());

        for fns in &kinds {
            let suffix = fns.kind.suffix();
            let cases = [
                ((fns.make)(format!("foo {}", 42)), format!("foo 42{suffix}")),
                ((fns.make)(String::new()), suffix.to_string()),
                ((fns.wrap)(Some(external("pow!")), "prefix"), "prefix: pow!".to_string()),
                ((fns.wrap)(Some(external("pow!")), ""), "pow!".to_string()),
                ((fns.wrap)(None, "prefix"), "prefix".to_string()),
            ];
            for (err, message) in cases {
                assert_eq!(err.to_string(), message);
                check_exclusive(&err, Some(fns.kind), &kinds);
            }
        }
    }

    #[test]
    fn test_deferred_annotate_keeps_kind() {
        let kinds = all_kinds();

        let mut err = Some(external("blast"));
        deferred_annotate(&mut err, "comment");
        let err = err.unwrap();
        assert_eq!(err.to_string(), "comment: blast");
        check_exclusive(&err, None, &kinds);

        for fns in &kinds {
            let suffix = fns.kind.suffix();
            let cases = [
                ((fns.make)(format!("foo {}", 42)), format!("comment 69: foo 42{suffix}")),
                ((fns.make)(String::new()), format!("comment 69: {suffix}")),
                ((fns.wrap)(Some(external("pow!")), "woo"), "comment 69: woo: pow!".to_string()),
            ];
            for (err, message) in cases {
                let mut slot = Some(err);
                deferred_annotate(&mut slot, format!("comment {}", 69));
                let err = slot.unwrap();
                assert_eq!(err.to_string(), message);
                check_exclusive(&err, Some(fns.kind), &kinds);
            }
        }
    }

    #[test]
    fn test_plain_errors_are_unclassified() {
        let kinds = all_kinds();
        check_exclusive(&crate::new("plain"), None, &kinds);
        check_exclusive(&external("foreign"), None, &kinds);
    }

    #[test]
    fn test_annotation_keeps_classified_cause() {
        let original = not_found("user 42");
        let err = annotate(trace(original.clone()), "loading profile").unwrap();
        assert_eq!(cause(&err), original);
        assert!(is_not_found(&err));
        assert_eq!(err.to_string(), "loading profile: user 42 not found");
    }

    #[test]
    fn test_mask_hides_classification() {
        let err = crate::mask(not_found("user 42")).unwrap();
        assert!(!is_not_found(&err));
        assert_eq!(err.kind(), None);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(status_code(&not_found("x")), Some(404));
        assert_eq!(status_code(&unauthorized("x")), Some(401));
        assert_eq!(status_code(&not_implemented("x")), Some(501));
        assert_eq!(status_code(&bad_request("x")), Some(400));
        assert_eq!(status_code(&method_not_allowed("x")), Some(405));
        assert_eq!(status_code(&internal_server("x")), Some(500));
        assert_eq!(status_code(&already_exists("x")), None);
        assert_eq!(status_code(&crate::new("x")), None);

        let err = annotate(bad_request("missing field"), "parsing body").unwrap();
        assert_eq!(err.code(), 0);
        assert_eq!(status_code(&err), Some(400));
    }

    #[test]
    fn test_classification_is_by_tag_not_code() {
        let mut frame = Frame::new(0, "custom");
        frame.set_code(404);
        let err = Error::from(frame);
        assert_eq!(status_code(&err), Some(404));
        assert!(!is_not_found(&err));
    }

    #[test]
    fn test_classified_macro_records_location() {
        let (err, line) = (crate::classified!(Kind::AlreadyExists, "user {}", "bob"), line!());
        assert_eq!(err.to_string(), "user bob already exists");
        assert!(is_already_exists(&err));

        let location = err.location().unwrap();
        assert_eq!(location.file(), path::trim_file(file!()));
        assert_eq!(location.line(), line);
        assert!(location.function().ends_with("test_classified_macro_records_location"));
    }

    #[test]
    fn test_downcast_classified() {
        let err = new_not_assigned(external("no slot"), "unit 7");
        let classified = err.downcast_ref::<Classified>().unwrap();
        assert_eq!(classified.kind(), Kind::NotAssigned);
        assert_eq!(classified.frame().message(), "unit 7");
    }
}
