//! Call-site capture

use std::fmt;

use crate::path;

/// Source location recorded when an error node is created.
///
/// Captured through `#[track_caller]`, so the reported site is the outermost
/// caller in a chain of tracked functions. The function name is only known
/// when the node was built by one of the crate's macros; otherwise it is
/// empty. An empty file means the location could not be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Location {
    file: &'static str,
    line: u32,
    column: u32,
    function: &'static str,
}

impl Location {
    /// Capture the location of the (tracked) caller.
    #[track_caller]
    pub fn caller() -> Self {
        let site = std::panic::Location::caller();
        Self {
            file: path::trim_file(site.file()),
            line: site.line(),
            column: site.column(),
            function: "",
        }
    }

    /// Record the enclosing function, dropping its crate segment.
    pub fn with_function(mut self, function: &'static str) -> Self {
        self.function = path::trim_function(function);
        self
    }

    /// File relative to the source path prefix
    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    /// Enclosing function, or `""` when unknown
    pub fn function(&self) -> &'static str {
        self.function
    }

    /// Whether a file was resolved for this location
    pub fn is_known(&self) -> bool {
        !self.file.is_empty()
    }
}

/// `file:line`, followed by ` function` when the function is known.
impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.line)?;
        if !self.function.is_empty() {
            write!(f, " {}", self.function)?;
        }
        Ok(())
    }
}

/// Name of the function enclosing the macro call, crate path included.
#[doc(hidden)]
#[macro_export]
macro_rules! __function {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::core::any::type_name::<T>()
        }
        let name = type_name_of(f);
        match name.strip_suffix("::f") {
            ::core::option::Option::Some(name) => name,
            ::core::option::Option::None => name,
        }
    }};
}
