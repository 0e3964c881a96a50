//! Error kinds for classified errors

use std::fmt;

/// The classification of a [`Classified`](crate::Classified) error.
///
/// Kinds are compared by tag, never by status code: two kinds that share a
/// code stay distinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Kind {
    // =========================================================================
    // HTTP-mapped kinds
    // =========================================================================
    /// Something was not found (404)
    NotFound,

    /// The operation is not authorized (401)
    Unauthorized,

    /// Something is not implemented (501)
    NotImplemented,

    /// A request has bad parameters (400)
    BadRequest,

    /// A request used an inappropriate method (405)
    MethodNotAllowed,

    /// Something unexpected happened (500)
    InternalServer,

    // =========================================================================
    // Tag-only kinds
    // =========================================================================
    /// Something already exists
    AlreadyExists,

    /// Something is not supported
    NotSupported,

    /// Something is not valid
    NotValid,

    /// Something is not provisioned
    NotProvisioned,

    /// Something is not assigned
    NotAssigned,

    /// A user was not found
    UserNotFound,
}

impl Kind {
    /// Every kind, HTTP-mapped kinds first
    pub const ALL: [Kind; 12] = [
        Kind::NotFound,
        Kind::Unauthorized,
        Kind::NotImplemented,
        Kind::BadRequest,
        Kind::MethodNotAllowed,
        Kind::InternalServer,
        Kind::AlreadyExists,
        Kind::NotSupported,
        Kind::NotValid,
        Kind::NotProvisioned,
        Kind::NotAssigned,
        Kind::UserNotFound,
    ];

    /// Returns the kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::NotFound => "NotFound",
            Kind::Unauthorized => "Unauthorized",
            Kind::NotImplemented => "NotImplemented",
            Kind::BadRequest => "BadRequest",
            Kind::MethodNotAllowed => "MethodNotAllowed",
            Kind::InternalServer => "InternalServer",
            Kind::AlreadyExists => "AlreadyExists",
            Kind::NotSupported => "NotSupported",
            Kind::NotValid => "NotValid",
            Kind::NotProvisioned => "NotProvisioned",
            Kind::NotAssigned => "NotAssigned",
            Kind::UserNotFound => "UserNotFound",
        }
    }

    /// HTTP status code, `None` for tag-only kinds
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Kind::NotFound => Some(404),
            Kind::Unauthorized => Some(401),
            Kind::NotImplemented => Some(501),
            Kind::BadRequest => Some(400),
            Kind::MethodNotAllowed => Some(405),
            Kind::InternalServer => Some(500),
            Kind::AlreadyExists
            | Kind::NotSupported
            | Kind::NotValid
            | Kind::NotProvisioned
            | Kind::NotAssigned
            | Kind::UserNotFound => None,
        }
    }

    /// Text appended to messages built by the kind's message constructor
    pub fn suffix(&self) -> &'static str {
        match self {
            Kind::NotFound => " not found",
            Kind::NotImplemented => " not implemented",
            Kind::AlreadyExists => " already exists",
            Kind::NotSupported => " not supported",
            Kind::NotValid => " not valid",
            Kind::NotProvisioned => " not provisioned",
            Kind::NotAssigned => " not assigned",
            Kind::UserNotFound => " user not found",
            Kind::Unauthorized
            | Kind::BadRequest
            | Kind::MethodNotAllowed
            | Kind::InternalServer => "",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
