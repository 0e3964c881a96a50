//! The shared error handle

use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use crate::functions::{link, CauseRule};
use crate::stack::{self, Node};
use crate::{Classified, Frame, Kind, Location, Traced};

/// A node of an error chain.
///
/// `Error` is a cheap, clonable handle. It is either an annotated node (a
/// [`Frame`] or any type implementing [`Traced`]) or a foreign error (any
/// `std::error::Error + Send + Sync`). Clones share the node, and equality is
/// node identity: two handles are equal only if they refer to the same node.
///
/// # Example
///
/// ```rust
/// use errtrail::{cause, Error};
///
/// let io = Error::from(std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"));
/// let err = io.clone().trace().annotate("loading config");
///
/// assert_eq!(err.to_string(), "loading config: no such file");
/// assert_eq!(cause(&err), io);
/// assert_eq!(err.stack_trace().len(), 3);
/// ```
#[derive(Clone)]
pub struct Error(Repr);

#[derive(Clone)]
enum Repr {
    Traced(Arc<dyn Traced>),
    Foreign(Arc<dyn StdError + Send + Sync>),
}

impl Error {
    /// Put an annotated node in a chain.
    pub fn traced<T: Traced>(node: T) -> Self {
        Self(Repr::Traced(Arc::new(node)))
    }

    /// Adopt a foreign error as a chain node.
    ///
    /// Passing an [`Error`] back in returns the same node.
    pub fn from_std<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        match (&err as &dyn Any).downcast_ref::<Error>() {
            Some(err) => err.clone(),
            None => Self(Repr::Foreign(Arc::new(err))),
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// The frame of an annotated node, `None` for foreign errors
    pub fn frame(&self) -> Option<&Frame> {
        self.as_traced().map(|node| node.frame())
    }

    /// Where this node was created, `None` for foreign errors
    pub fn location(&self) -> Option<&Location> {
        self.frame().map(Frame::location)
    }

    /// The annotation recorded at this node; a foreign error's own text
    pub fn message(&self) -> String {
        match &self.0 {
            Repr::Traced(node) => node.frame().message().to_string(),
            Repr::Foreign(err) => err.to_string(),
        }
    }

    /// Status code of this node, 0 when unset or foreign
    pub fn code(&self) -> u16 {
        self.frame().map_or(0, Frame::code)
    }

    /// Content type of this node's message
    pub fn content_type(&self) -> &'static str {
        self.frame().map_or(crate::TEXT_PLAIN, Frame::content_type)
    }

    /// See [`cause`](crate::cause).
    pub fn cause(&self) -> Error {
        crate::cause(self)
    }

    /// Classification of this error's cause
    pub fn kind(&self) -> Option<Kind> {
        self.cause().downcast_ref::<Classified>().map(Classified::kind)
    }

    /// Whether this error's cause is classified as `kind`
    pub fn is(&self, kind: Kind) -> bool {
        self.kind() == Some(kind)
    }

    /// One line per node of the chain, oldest first.
    pub fn stack_trace(&self) -> Vec<String> {
        stack::lines(self.node())
    }

    /// Downcast an annotated node to its concrete type.
    pub fn downcast_ref<T: Traced>(&self) -> Option<&T> {
        self.as_traced()?.as_any().downcast_ref::<T>()
    }

    /// Downcast a foreign node to its concrete type.
    pub fn downcast_foreign_ref<T: StdError + 'static>(&self) -> Option<&T> {
        match &self.0 {
            Repr::Foreign(err) => err.downcast_ref::<T>(),
            Repr::Traced(_) => None,
        }
    }

    /// Whether both handles refer to the same node
    pub fn ptr_eq(&self, other: &Error) -> bool {
        self.addr() == other.addr()
    }

    fn addr(&self) -> *const () {
        match &self.0 {
            Repr::Traced(node) => Arc::as_ptr(node) as *const (),
            Repr::Foreign(err) => Arc::as_ptr(err) as *const (),
        }
    }

    fn as_traced(&self) -> Option<&dyn Traced> {
        match &self.0 {
            Repr::Traced(node) => Some(&**node),
            Repr::Foreign(_) => None,
        }
    }

    /// The frame of a node this handle owns alone
    pub(crate) fn frame_mut(&mut self) -> Option<&mut Frame> {
        match &mut self.0 {
            Repr::Traced(node) => Arc::get_mut(node)?.frame_mut(),
            Repr::Foreign(_) => None,
        }
    }

    pub(crate) fn node(&self) -> Node<'_> {
        match &self.0 {
            Repr::Traced(node) => Node::Traced(&**node),
            Repr::Foreign(err) => Node::Foreign(&**err),
        }
    }

    // =========================================================================
    // Composition (see the free functions for the `Option` forms)
    // =========================================================================

    /// Record the caller's location, keeping message and cause.
    #[track_caller]
    pub fn trace(self) -> Error {
        link(Some(self), CauseRule::Keep, String::new(), "")
    }

    /// Prefix the message with `message`, keeping the cause.
    #[track_caller]
    pub fn annotate(self, message: impl Into<String>) -> Error {
        link(Some(self), CauseRule::Keep, message.into(), "")
    }

    /// Hide the cause: the new node becomes its own cause.
    #[track_caller]
    pub fn mask(self) -> Error {
        link(Some(self), CauseRule::Reset, String::new(), "")
    }

    /// Hide the cause and prefix the message with `message`.
    #[track_caller]
    pub fn mask_with(self, message: impl Into<String>) -> Error {
        link(Some(self), CauseRule::Reset, message.into(), "")
    }

    /// Substitute `new` as the cause; the message continues from `new`.
    #[track_caller]
    pub fn wrap(self, new: impl Into<Error>) -> Error {
        link(Some(self), CauseRule::Replace(new.into()), String::new(), "")
    }

    /// Substitute `new` as the cause and prefix the message with `message`.
    #[track_caller]
    pub fn wrap_with(self, new: impl Into<Error>, message: impl Into<String>) -> Error {
        link(Some(self), CauseRule::Replace(new.into()), message.into(), "")
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for Error {}

// =============================================================================
// Display - the composed message chain
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Traced(node) => fmt::Display::fmt(node.frame(), f),
            Repr::Foreign(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Repr::Traced(node) => fmt::Debug::fmt(node, f),
            Repr::Foreign(err) => fmt::Debug::fmt(err, f),
        }
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match &self.0 {
            Repr::Traced(node) => node
                .frame()
                .underlying()
                .map(|previous| previous as &(dyn StdError + 'static)),
            Repr::Foreign(err) => err.source(),
        }
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<Frame> for Error {
    fn from(frame: Frame) -> Self {
        Error::traced(frame)
    }
}

impl From<Classified> for Error {
    fn from(err: Classified) -> Self {
        Error::traced(err)
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::from_std(err)
    }
}

impl From<Box<dyn StdError + Send + Sync>> for Error {
    fn from(err: Box<dyn StdError + Send + Sync>) -> Self {
        match err.downcast::<Error>() {
            Ok(err) => *err,
            Err(err) => Self(Repr::Foreign(Arc::from(err))),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        // an errtrail error that passed through anyhow comes back as itself
        match err.downcast::<Error>() {
            Ok(err) => err,
            Err(err) => Self(Repr::Foreign(Arc::from(
                Box::<dyn StdError + Send + Sync>::from(err),
            ))),
        }
    }
}

/// Conversion into a chain node, used by [`ResultExt`](crate::ResultExt).
///
/// Implemented for every `std::error::Error + Send + Sync + 'static`,
/// including [`Error`] itself, which converts to the same node.
pub trait IntoError {
    fn into_error(self) -> Error;
}

impl<E> IntoError for E
where
    E: StdError + Send + Sync + 'static,
{
    fn into_error(self) -> Error {
        Error::from_std(self)
    }
}
