//! The annotated error node

use std::any::Any;
use std::fmt;

use crate::stack::{self, Node};
use crate::{cause_of, Error, Location};

/// Content type of plain text error bodies
pub const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Content type of frames whose message is a JSON document
pub const APPLICATION_JSON: &str = "application/json; charset=utf-8";

/// One node of an error chain.
///
/// A frame holds:
/// - `message`: the annotation added at this step, possibly empty
/// - `cause`: the error callers see through [`cause`](crate::cause); `None`
///   means the node is its own cause
/// - `previous`: the error this node was built on, used to render the
///   message chain and the stack trace
/// - `location`: where the node was created
/// - `code` / `content_type`: HTTP-style status data for classified errors
///
/// Frames are usually created by the composition functions. Custom error
/// types embed one and implement [`Traced`] to behave like any other node:
///
/// ```rust
/// use errtrail::{Error, Frame, Traced};
///
/// #[derive(Debug)]
/// struct QuotaError {
///     frame: Frame,
///     limit: u64,
/// }
///
/// impl Traced for QuotaError {
///     fn frame(&self) -> &Frame {
///         &self.frame
///     }
/// }
///
/// #[track_caller]
/// fn quota_exceeded(limit: u64) -> Error {
///     Error::traced(QuotaError {
///         frame: Frame::new(429, format!("quota of {limit} exceeded")),
///         limit,
///     })
/// }
///
/// let err = quota_exceeded(10);
/// assert_eq!(err.to_string(), "quota of 10 exceeded");
/// assert_eq!(err.code(), 429);
/// assert_eq!(err.downcast_ref::<QuotaError>().map(|e| e.limit), Some(10));
/// ```
#[derive(Clone)]
pub struct Frame {
    message: String,
    cause: Option<Error>,
    previous: Option<Error>,
    location: Location,
    code: u16,
    content_type: &'static str,
}

impl Frame {
    /// Create a frame with no cause and no previous error, located at the caller.
    #[track_caller]
    pub fn new(code: u16, message: impl Into<String>) -> Self {
        Self::chained(None, None, message.into()).with_code(code)
    }

    /// Create a frame built on `other`, keeping `other`'s cause.
    #[track_caller]
    pub fn with_cause(other: impl Into<Option<Error>>, code: u16, message: impl Into<String>) -> Self {
        let previous = other.into();
        let cause = cause_of(previous.as_ref());
        Self::chained(previous, cause, message.into()).with_code(code)
    }

    /// Same as [`Frame::with_cause`], but the message is a JSON document.
    #[track_caller]
    pub fn json_with_cause(
        other: impl Into<Option<Error>>,
        code: u16,
        message: impl Into<String>,
    ) -> Self {
        let mut frame = Self::with_cause(other, code, message);
        frame.content_type = APPLICATION_JSON;
        frame
    }

    #[track_caller]
    pub(crate) fn chained(previous: Option<Error>, cause: Option<Error>, message: String) -> Self {
        Self {
            message,
            cause,
            previous,
            location: Location::caller(),
            code: 0,
            content_type: TEXT_PLAIN,
        }
    }

    fn with_code(mut self, code: u16) -> Self {
        self.code = code;
        self
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Where this frame was created or last relocated
    pub fn location(&self) -> &Location {
        &self.location
    }

    /// HTTP status code to send for this error, 0 when unset
    pub fn code(&self) -> u16 {
        self.code
    }

    /// HTTP content type of the message
    pub fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// The annotation added at this step; empty for traces and plain masks
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The explicit cause, `None` when the frame is its own cause
    pub fn cause(&self) -> Option<&Error> {
        self.cause.as_ref()
    }

    /// The error this frame was built on.
    ///
    /// Only used to render messages and stack traces. Callers should not
    /// branch on it; [`cause`](crate::cause) is the stable accessor.
    pub fn underlying(&self) -> Option<&Error> {
        self.previous.as_ref()
    }

    // =========================================================================
    // Construction-time setters
    // =========================================================================

    /// Set the status code. Frames are immutable once shared in an [`Error`].
    pub fn set_code(&mut self, code: u16) {
        self.code = code;
    }

    /// Recapture the location at the caller.
    ///
    /// Used by constructors of embedding types that are not `#[track_caller]`
    /// themselves and want the frame to point at their own call site.
    #[track_caller]
    pub fn set_location(&mut self) {
        self.location = Location::caller();
    }

    /// Record the enclosing function name in the location.
    pub fn set_function(&mut self, function: &'static str) {
        if !function.is_empty() {
            self.location = self.location.with_function(function);
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// The cause, when it is not the one already found below `previous`.
    ///
    /// Set for wrap nodes and for constructors that were handed a new cause;
    /// the message chain continues from it instead of from `previous`.
    pub(crate) fn diverged_cause(&self) -> Option<&Error> {
        let cause = self.cause.as_ref()?;
        if cause_of(self.previous.as_ref()).as_ref() == Some(cause) {
            None
        } else {
            Some(cause)
        }
    }

    fn take_links(&mut self) -> [Option<Error>; 2] {
        [self.previous.take(), self.cause.take()]
    }

    /// One line per node of the chain ending here, oldest first.
    pub fn stack_trace(&self) -> Vec<String> {
        stack::lines(Node::Traced(self))
    }

    /// The stack trace joined with `;`.
    pub fn stack(&self) -> String {
        self.stack_trace().join(";")
    }
}

/// Renders `message: <rest of chain>`, innermost message last.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut frame = self;
        loop {
            let Some(next) = frame.diverged_cause().or(frame.previous.as_ref()) else {
                return f.write_str(&frame.message);
            };
            if !frame.message.is_empty() {
                write!(f, "{}: ", frame.message)?;
            }
            match next.frame() {
                Some(inner) => frame = inner,
                None => return fmt::Display::fmt(next, f),
            }
        }
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Frame")
            .field("message", &self.message)
            .field("location", &format_args!("{}", self.location))
            .field("code", &self.code)
            .field("content_type", &self.content_type)
            .field("cause", &self.cause.as_ref().map(ToString::to_string))
            .field("previous", &self.previous.as_ref().map(ToString::to_string))
            .finish()
    }
}

/// Unlinks uniquely owned nodes one at a time, so dropping a long chain
/// does not recurse once per node.
impl Drop for Frame {
    fn drop(&mut self) {
        let mut pending: Vec<Error> = self.take_links().into_iter().flatten().collect();
        while let Some(mut err) = pending.pop() {
            if let Some(frame) = err.frame_mut() {
                pending.extend(frame.take_links().into_iter().flatten());
            }
        }
    }
}

/// An error type that carries a [`Frame`].
///
/// Implementors gain message composition, cause tracking, location and stack
/// rendering by delegating to their frame. Wrap them with
/// [`Error::traced`] to put them in a chain; [`Error::downcast_ref`] gets the
/// concrete type back.
pub trait Traced: AsAny + fmt::Debug + Send + Sync + 'static {
    fn frame(&self) -> &Frame;

    /// Mutable access to the frame, used to unlink a chain as it is dropped.
    ///
    /// Without it a chain running through this type is dropped recursively.
    fn frame_mut(&mut self) -> Option<&mut Frame> {
        None
    }
}

impl Traced for Frame {
    fn frame(&self) -> &Frame {
        self
    }

    fn frame_mut(&mut self) -> Option<&mut Frame> {
        Some(self)
    }
}

#[doc(hidden)]
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
}
