use core::fmt;

/// An error returned when parsing a decimal from a string.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseError {
    kind: ErrorKind,
}

impl ParseError {
    pub(crate) const fn empty() -> Self {
        Self {
            kind: ErrorKind::Empty,
        }
    }

    /// Creates an error for the byte at `pos`.
    ///
    /// `byte` is `None` if the input ended early.
    pub(crate) const fn invalid(pos: usize, byte: Option<u8>) -> Self {
        Self {
            kind: ErrorKind::Invalid { pos, byte },
        }
    }

    pub(crate) const fn too_long() -> Self {
        Self {
            kind: ErrorKind::CoefficientTooLong,
        }
    }

    pub(crate) const fn payload_too_long() -> Self {
        Self {
            kind: ErrorKind::PayloadTooLong,
        }
    }

    /// Returns the kind of error.
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }
}

#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
impl std::error::Error for ParseError {}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.kind.fmt(f)
    }
}

/// Describes why a string could not be parsed.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The input was empty.
    Empty,
    /// The input is not a valid decimal literal.
    Invalid {
        /// The byte offset of the offending byte.
        pos: usize,
        /// The offending byte, or `None` if the input ended
        /// where more was expected.
        byte: Option<u8>,
    },
    /// The literal has more digits than the coefficient buffer
    /// can hold.
    CoefficientTooLong,
    /// The NaN payload does not fit in the context's precision.
    PayloadTooLong,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "cannot parse decimal from empty string"),
            Self::Invalid {
                pos,
                byte: Some(c),
            } => {
                if c.is_ascii_graphic() {
                    write!(f, "invalid decimal literal: unexpected `{}` at {pos}", *c as char)
                } else {
                    write!(f, "invalid decimal literal: unexpected byte {c:#04x} at {pos}")
                }
            }
            Self::Invalid { pos, byte: None } => {
                write!(f, "invalid decimal literal: unexpected end of input at {pos}")
            }
            Self::CoefficientTooLong => write!(f, "decimal literal has too many digits"),
            Self::PayloadTooLong => write!(f, "NaN payload has too many digits"),
        }
    }
}

/// Reports whether `s` and `t` are equal, ignoring ASCII case.
pub(crate) const fn equal_fold_ascii(s: &[u8], t: &[u8]) -> bool {
    if s.len() != t.len() {
        return false;
    }
    let mut i = 0;
    while i < s.len() {
        #[allow(clippy::indexing_slicing)] // `i < s.len() == t.len()`
        if !s[i].eq_ignore_ascii_case(&t[i]) {
            return false;
        }
        i += 1;
    }
    true
}
