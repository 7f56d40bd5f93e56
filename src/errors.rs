// Copyright 2023-2024 the docver developers
// Licensed under the MIT License.

//! Error handling.
//!
//! We just lean on [anyhow] and add a convenience macro for attaching context
//! to fallible operations without breaking up the flow of the calling code.

pub use anyhow::{Error, Result};

/// "Annotated try" — like the `?` operator, but requiring a context
/// annotation describing the operation that might fail:
///
/// ```ignore
/// let f = atry!(
///     File::open(&path);
///     ["failed to open `{}`", path.display()]
/// );
/// ```
#[macro_export]
macro_rules! atry {
    ($op:expr ; [$($annotation:tt)+]) => {{
        use anyhow::Context;
        $op.with_context(|| format!($($annotation)+))?
    }};
}
