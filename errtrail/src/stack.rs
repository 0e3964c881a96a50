//! Stack reconstruction
//!
//! Walks the `previous` links of a chain and renders one line per node.
//! Annotated nodes render as `file:line[ function]: message`; a foreign node
//! renders as its own text and ends the walk, since its internals are
//! opaque.

use std::error::Error as StdError;
use std::fmt::Write;

use crate::{Error, Frame, Traced};

/// Upper bound on the nodes rendered by one walk.
///
/// Longer chains keep their newest nodes and their origin; the nodes in
/// between are left out.
pub const MAX_STACK_DEPTH: usize = 4096;

/// A borrowed chain node
#[derive(Clone, Copy)]
pub(crate) enum Node<'a> {
    Traced(&'a dyn Traced),
    Foreign(&'a (dyn StdError + Send + Sync)),
}

impl<'a> Node<'a> {
    /// The node this one was built on; foreign nodes end the chain.
    fn previous(self) -> Option<Node<'a>> {
        match self {
            Node::Traced(node) => node.frame().underlying().map(Error::node),
            Node::Foreign(_) => None,
        }
    }
}

/// The stack trace of `err`, oldest node first, one line per node.
///
/// An absent error yields an empty string.
///
/// ```rust
/// let err = errtrail::new("first error");
/// let err = err.annotate("annotation");
///
/// let stack = errtrail::error_stack(&err);
/// let lines: Vec<&str> = stack.lines().collect();
/// assert_eq!(lines.len(), 2);
/// assert!(lines[0].ends_with(": first error"));
/// assert!(lines[1].ends_with(": annotation"));
/// ```
pub fn error_stack<'a>(err: impl Into<Option<&'a Error>>) -> String {
    match err.into() {
        Some(err) => lines(err.node()).join("\n"),
        None => String::new(),
    }
}

/// Newest-first summary of the chain: `[{location: message} {...}]`.
///
/// Only the message recorded at each node is shown. An absent error yields
/// `[]`. Truncated like [`error_stack`].
pub fn details<'a>(err: impl Into<Option<&'a Error>>) -> String {
    let mut out = String::from("[");
    let nodes = err.into().map(|err| walk(err.node())).unwrap_or_default();
    for (i, node) in nodes.into_iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        out.push('{');
        match node {
            Node::Traced(node) => {
                let frame = node.frame();
                write_location(&mut out, frame);
                out.push_str(frame.message());
            }
            Node::Foreign(err) => {
                let _ = write!(out, "{err}");
            }
        }
        out.push('}');
    }
    out.push(']');
    out
}

pub(crate) fn lines(start: Node<'_>) -> Vec<String> {
    let mut lines: Vec<String> = walk(start)
        .into_iter()
        .map(|node| match node {
            Node::Traced(node) => line(node.frame()),
            Node::Foreign(err) => err.to_string(),
        })
        .collect();
    lines.reverse();
    lines
}

/// Nodes from `start` back to the origin, newest first.
///
/// Past `MAX_STACK_DEPTH` nodes the middle of the chain is dropped: the
/// newest `MAX_STACK_DEPTH - 1` nodes and the origin are kept.
fn walk(start: Node<'_>) -> Vec<Node<'_>> {
    let mut nodes = Vec::new();
    let mut omitted = 0usize;
    let mut next = Some(start);
    while let Some(node) = next.take() {
        next = node.previous();
        if nodes.len() < MAX_STACK_DEPTH - 1 || next.is_none() {
            nodes.push(node);
        } else {
            omitted += 1;
        }
    }
    if omitted > 0 {
        tracing::warn!(depth = MAX_STACK_DEPTH, omitted, "error stack truncated");
    }
    nodes
}

fn line(frame: &Frame) -> String {
    let mut line = String::new();
    write_location(&mut line, frame);
    line.push_str(frame.message());
    // wrap nodes show the error they substituted
    if let Some(cause) = frame.diverged_cause() {
        if !frame.message().is_empty() {
            line.push_str(": ");
        }
        let _ = write!(line, "{cause}");
    }
    line
}

fn write_location(out: &mut String, frame: &Frame) {
    let location = frame.location();
    if location.is_known() {
        let _ = write!(out, "{location}: ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{annotate, maskf, new, path, trace, wrap};
    use std::fmt;

    #[derive(Debug)]
    struct External(&'static str);

    impl fmt::Display for External {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.0)
        }
    }

    impl StdError for External {}

    fn external(message: &'static str) -> Error {
        Error::from_std(External(message))
    }

    fn at(line: u32) -> String {
        format!("{}:{}", path::trim_file(file!()), line)
    }

    fn check(err: &Error, expected: &[String]) {
        let stack = error_stack(err);
        assert_eq!(stack, expected.join("\n"));
        assert_eq!(err.stack_trace(), expected);
    }

    #[test]
    fn test_empty_stack() {
        assert_eq!(error_stack(None), "");
        assert_eq!(details(None), "[]");
    }

    #[test]
    fn test_raw_error() {
        let err = external("raw");
        check(&err, &["raw".to_string()]);
        assert_eq!(details(&err), "[{raw}]");
    }

    #[test]
    fn test_single_error() {
        let (err, l0) = (new("first error"), line!());
        check(&err, &[format!("{}: first error", at(l0))]);
    }

    #[test]
    fn test_annotated_error() {
        let (err, l0) = (new("first error"), line!());
        let (err, l1) = (err.annotate("annotation"), line!());
        check(
            &err,
            &[format!("{}: first error", at(l0)), format!("{}: annotation", at(l1))],
        );
    }

    #[test]
    fn test_wrapped_error() {
        let (err, l0) = (new("first error"), line!());
        let (err, l1) = (wrap(err, external("detailed error")), line!());
        check(
            &err,
            &[format!("{}: first error", at(l0)), format!("{}: detailed error", at(l1))],
        );
    }

    #[test]
    fn test_annotated_wrapped_error() {
        let (err, l0) = (crate::errorf!("first error"), line!());
        let (err, l1) = (wrap(err, external("detailed error")), line!());
        let (err, l2) = (crate::annotatef!(err, "annotated").unwrap(), line!());
        let function = err.location().unwrap().function();
        assert!(function.ends_with("test_annotated_wrapped_error"));

        check(
            &err,
            &[
                format!("{} {function}: first error", at(l0)),
                format!("{}: detailed error", at(l1)),
                format!("{} {function}: annotated", at(l2)),
            ],
        );
    }

    #[test]
    fn test_traced_and_annotated() {
        let (err, l0) = (new("first error"), line!());
        let (err, l1) = (trace(err), line!());
        let (err, l2) = (annotate(err, "some context"), line!());
        let (err, l3) = (trace(err), line!());
        let (err, l4) = (annotate(err, "more context"), line!());
        let (err, l5) = (trace(err).unwrap(), line!());
        check(
            &err,
            &[
                format!("{}: first error", at(l0)),
                format!("{}: ", at(l1)),
                format!("{}: some context", at(l2)),
                format!("{}: ", at(l3)),
                format!("{}: more context", at(l4)),
                format!("{}: ", at(l5)),
            ],
        );
        assert_eq!(err.to_string(), "more context: some context: first error");
    }

    #[test]
    fn test_foreign_wrapped_with_value_error() {
        let err = external("first error");
        let (err, l1) = (trace(err), line!());
        let (err, l2) = (wrap(err, external("value error")), line!());
        let (err, l3) = (maskf(err, "masked"), line!());
        let (err, l4) = (annotate(err, "more context"), line!());
        let (err, l5) = (trace(err).unwrap(), line!());
        check(
            &err,
            &[
                "first error".to_string(),
                format!("{}: ", at(l1)),
                format!("{}: value error", at(l2)),
                format!("{}: masked", at(l3)),
                format!("{}: more context", at(l4)),
                format!("{}: ", at(l5)),
            ],
        );
    }

    #[test]
    fn test_details() {
        let (err0, l0) = (new("foo"), line!());
        assert_eq!(details(&err0), format!("[{{{}: foo}}]", at(l0)));

        let (err1, l1) = (annotate(err0, "bar").unwrap(), line!());
        assert_eq!(
            details(&err1),
            format!("[{{{}: bar}} {{{}: foo}}]", at(l1), at(l0))
        );

        let (err2, l2) = (trace(err1).unwrap(), line!());
        assert_eq!(
            details(&err2),
            format!("[{{{}: }} {{{}: bar}} {{{}: foo}}]", at(l2), at(l1), at(l0))
        );
    }

    #[test]
    fn test_details_stops_at_foreign() {
        let err = annotate(external("other"), "ctx").unwrap();
        assert!(details(&err).ends_with(": ctx} {other}]"));
    }

    #[test]
    fn test_stack_line_count_matches_steps() {
        let mut err = new("start");
        for i in 0..25 {
            err = match i % 4 {
                0 => err.trace(),
                1 => err.annotate(format!("step {i}")),
                2 => err.mask(),
                _ => err.wrap(new(format!("replacement {i}"))),
            };
        }
        let stack = err.stack_trace();
        assert_eq!(stack.len(), 26);
        assert!(stack[0].ends_with(": start"));
        assert!(stack[2].ends_with(": step 1"));
    }

    #[test]
    fn test_deep_stack_keeps_newest_and_origin() {
        let extra = 10;
        let mut err = new("start");
        for i in 0..MAX_STACK_DEPTH + extra {
            err = err.annotate(format!("step {i}"));
        }

        let stack = err.stack_trace();
        assert_eq!(stack.len(), MAX_STACK_DEPTH);
        assert!(stack[0].ends_with(": start"));
        assert!(stack[1].ends_with(&format!(": step {}", extra + 1)));
        assert!(stack[MAX_STACK_DEPTH - 1].ends_with(&format!(": step {}", MAX_STACK_DEPTH + extra - 1)));
        assert_eq!(error_stack(&err).lines().count(), MAX_STACK_DEPTH);
    }

    #[test]
    fn test_deep_details_truncated_like_stack() {
        let mut err = new("start");
        for _ in 0..MAX_STACK_DEPTH {
            err = err.trace();
        }

        let details = details(&err);
        assert_eq!(details.matches('{').count(), MAX_STACK_DEPTH);
        assert!(details.ends_with(": start}]"));
    }

    #[test]
    fn test_stack_at_depth_limit_is_complete() {
        let mut err = new("start");
        for _ in 0..MAX_STACK_DEPTH - 1 {
            err = err.trace();
        }
        assert_eq!(err.stack_trace().len(), MAX_STACK_DEPTH);
        assert_eq!(err.to_string(), "start");
    }
}
