#![deny(missing_docs)]

//! This crate defines error & result types for lh5-truncate.
//! It also contains a variety of useful macros for error handling.

mod ext;

use std::backtrace::Backtrace;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;
use std::{fmt, io};

pub use ext::*;

/// A string that can be used as an error message.
#[derive(Debug)]
pub struct ErrString(Cow<'static, str>);

impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    fn from(msg: T) -> Self {
        Self(msg.into())
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

// Alias so `thiserror` does not treat these fields as backtrace sources,
// which would emit a nightly-only `Error::provide` impl.
type CapturedBacktrace = Backtrace;

/// The top-level error type for lh5-truncate.
#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum Lh5Error {
    /// An index is out of bounds.
    #[error("index {0} out of bounds from {1} to {2}\nBacktrace:\n{3}")]
    OutOfBounds(usize, usize, usize, CapturedBacktrace),
    /// An invalid argument was provided.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidArgument(ErrString, CapturedBacktrace),
    /// A descriptor string matched no classification rule.
    #[error("unknown datatype '{0}'\nBacktrace:\n{1}")]
    UnknownDatatype(ErrString, CapturedBacktrace),
    /// A node has neither an array view nor children, so its rows cannot be mapped.
    #[error("cannot map node at {0}: {1} has no array view\nBacktrace:\n{2}")]
    UnsupportedNodeKind(ErrString, ErrString, CapturedBacktrace),
    /// Hit-ordered data was requested without a coincidence map.
    #[error("{0}\nBacktrace:\n{1}")]
    MissingCoincidenceMap(ErrString, CapturedBacktrace),
    /// The data ordering of a file could not be determined.
    #[error("{0}\nBacktrace:\n{1}")]
    UnknownFileCategory(ErrString, CapturedBacktrace),
    /// A named object or file does not exist.
    #[error("{0} not found\nBacktrace:\n{1}")]
    NotFound(ErrString, CapturedBacktrace),
    /// A write would replace an existing object.
    #[error("{0} already exists\nBacktrace:\n{1}")]
    AlreadyExists(ErrString, CapturedBacktrace),
    /// A wrapper for other errors, carrying additional context.
    #[error("{0}: {1}")]
    Context(ErrString, Box<Lh5Error>),
    /// A wrapper for IO errors.
    #[error(transparent)]
    IOError(#[from] io::Error),
    /// A wrapper for serde_json errors.
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
    /// A wrapper for regex compilation errors.
    #[error(transparent)]
    RegexError(#[from] regex::Error),
}

impl Lh5Error {
    /// Adds additional context to an error.
    pub fn with_context<T: Into<ErrString>>(self, msg: T) -> Self {
        Lh5Error::Context(msg.into(), Box::new(self))
    }
}

impl Debug for Lh5Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A type alias for Results that return [`Lh5Error`]s as their error type.
pub type Lh5Result<T> = Result<T, Lh5Error>;

/// A trait for unwrapping a [`Lh5Result`] when the failure case is a broken invariant.
pub trait Lh5Expect {
    /// The type of the value being expected.
    type Output;

    /// Returns the value of the result if it is successful, otherwise panics with the given
    /// message.
    fn lh5_expect(self, msg: &str) -> Self::Output;
}

impl<T, E> Lh5Expect for Result<T, E>
where
    E: Into<Lh5Error>,
{
    type Output = T;

    #[inline(always)]
    fn lh5_expect(self, msg: &str) -> Self::Output {
        self.map_err(|err| err.into())
            .unwrap_or_else(|e| lh5_panic!(e.with_context(msg.to_string())))
    }
}

impl<T> Lh5Expect for Option<T> {
    type Output = T;

    #[inline(always)]
    fn lh5_expect(self, msg: &str) -> Self::Output {
        self.unwrap_or_else(|| {
            let err = Lh5Error::InvalidArgument(msg.to_string().into(), Backtrace::capture());
            lh5_panic!(err)
        })
    }
}

/// A convenient macro for creating a [`Lh5Error`].
#[macro_export]
macro_rules! lh5_err {
    (OutOfBounds: $idx:expr, $start:expr, $stop:expr) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::Lh5Error::OutOfBounds($idx, $start, $stop, Backtrace::capture())
        )
    }};
    (UnsupportedNodeKind: $path:expr, $kind:expr) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::Lh5Error::UnsupportedNodeKind(
                $path.to_string().into(),
                $kind.to_string().into(),
                Backtrace::capture(),
            )
        )
    }};
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::Lh5Error::$variant(format!($fmt, $($arg),*).into(), Backtrace::capture())
        )
    }};
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::lh5_err!(InvalidArgument: $fmt, $($arg),*)
    };
}

/// A convenient macro for returning a [`Lh5Error`].
#[macro_export]
macro_rules! lh5_bail {
    ($($tt:tt)+) => {
        return Err($crate::lh5_err!($($tt)+))
    };
}

/// A convenient macro for panicking with a [`Lh5Error`] in the presence of a programmer error
/// (e.g., an invariant has been violated).
#[macro_export]
macro_rules! lh5_panic {
    (OutOfBounds: $idx:expr, $start:expr, $stop:expr) => {{
        $crate::lh5_panic!($crate::lh5_err!(OutOfBounds: $idx, $start, $stop))
    }};
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::lh5_panic!($crate::lh5_err!($variant: $fmt, $($arg),*))
    };
    ($err:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let err: $crate::Lh5Error = $err;
        panic!("{}", err.with_context(format!($fmt, $($arg),*)))
    }};
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::lh5_panic!($crate::lh5_err!($fmt, $($arg),*))
    };
    ($err:expr) => {{
        let err: $crate::Lh5Error = $err;
        panic!("{}", err)
    }};
}

#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    #[inline]
    #[cold]
    #[must_use]
    pub const fn must_use(error: crate::Lh5Error) -> crate::Lh5Error {
        error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fails() -> Lh5Result<()> {
        lh5_bail!(UnknownDatatype: "{}", "bogus")
    }

    #[test]
    fn bail_builds_variant() {
        let err = fails().unwrap_err();
        assert!(matches!(err, Lh5Error::UnknownDatatype(..)));
        assert!(err.to_string().starts_with("unknown datatype 'bogus'"));
    }

    #[test]
    fn default_variant_is_invalid_argument() {
        let err = lh5_err!("row {} missing", 3);
        assert!(matches!(err, Lh5Error::InvalidArgument(..)));
        assert!(err.to_string().starts_with("row 3 missing"));
    }

    #[test]
    fn context_wraps_inner_error() {
        let err = lh5_err!(OutOfBounds: 7, 0, 5).with_context("reading ch1/raw");
        let msg = err.to_string();
        assert!(msg.starts_with("reading ch1/raw: index 7 out of bounds from 0 to 5"));
    }

    #[test]
    fn unsupported_kind_names_path() {
        let err = lh5_err!(UnsupportedNodeKind: "ch1/raw/flag", "scalar");
        assert!(
            err.to_string()
                .starts_with("cannot map node at ch1/raw/flag: scalar has no array view")
        );
    }

    #[test]
    #[should_panic]
    fn expect_none_panics() {
        let value: Option<u8> = None;
        value.lh5_expect("value must be set");
    }
}
