//! Source path trimming for captured locations.
//!
//! Files reported by the compiler are either relative to the workspace being
//! built or absolute (registry and git dependencies). The prefix in front of
//! this crate's own directory is derived once and stripped from every
//! captured file, so registry paths shrink to `<crate>-<version>/src/...`.

use std::path::Path;
use std::sync::OnceLock;

use crate::{Classified, Error, Kind, Result};

static PREFIX: OnceLock<&'static str> = OnceLock::new();

/// Fix the prefix stripped from captured file paths.
///
/// Only takes effect before the first location is captured. Once the prefix
/// is known (set here or derived lazily) it never changes, and later calls
/// fail with a [`Kind::NotValid`] error.
#[track_caller]
pub fn init_path_prefix(prefix: &'static str) -> Result<()> {
    match PREFIX.set(prefix) {
        Ok(()) => Ok(()),
        Err(_) => {
            let current = path_prefix();
            Err(Error::from(Classified::new(
                Kind::NotValid,
                format!("path prefix {prefix:?}: already initialized to {current:?}"),
            )))
        }
    }
}

/// The prefix currently stripped from captured file paths.
pub fn path_prefix() -> &'static str {
    PREFIX.get_or_init(|| {
        let prefix = derive_prefix(file!());
        tracing::debug!(prefix, "derived source path prefix");
        prefix
    })
}

/// `own` is this file as compiled: `<prefix><crate-dir>/src/path.rs`.
fn derive_prefix(own: &'static str) -> &'static str {
    Path::new(own)
        .ancestors()
        .nth(3)
        .and_then(Path::to_str)
        .unwrap_or("")
}

pub(crate) fn trim_file(file: &'static str) -> &'static str {
    strip(path_prefix(), file)
}

fn strip(prefix: &'static str, file: &'static str) -> &'static str {
    if prefix.is_empty() {
        return file;
    }
    // whole components only: `/a/b` does not strip `/a/bc/x.rs`
    match Path::new(file).strip_prefix(prefix).map(Path::to_str) {
        Ok(Some(rest)) => rest,
        _ => file,
    }
}

/// Drop the leading crate segment: `app::store::load` becomes `store::load`.
pub(crate) fn trim_function(function: &'static str) -> &'static str {
    match function.split_once("::") {
        Some((_, rest)) => rest,
        None => function,
    }
}
