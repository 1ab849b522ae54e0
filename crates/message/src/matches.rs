//! Byte class lookup tables for URI components and RFC 7230 header grammar.
//!
//! Every table is a `[bool; 256]` built at compile time, so a membership check
//! is a single indexed load.

macro_rules! byte_map {
    {
        $(#[$meta:meta])*
        $vis:vis const $name:ident = |$byte:ident| $e:expr;
    } => {
        $(#[$meta])*
        $vis const $name: [bool; 256] = {
            let mut table = [false; 256];
            let mut idx = 0usize;
            while idx < 256 {
                #[allow(clippy::cast_possible_truncation, reason = "idx is always below 256")]
                let $byte = idx as u8;
                table[idx] = $e;
                idx += 1;
            }
            table
        };
    };
}

const fn is_unreserved(byte: u8) -> bool {
    matches!(byte, b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}

const fn is_sub_delim(byte: u8) -> bool {
    matches!(byte, b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'=')
}

byte_map! {
    /// `pchar` plus `/`, without the percent sign.
    pub(crate) const PATH = |byte| is_unreserved(byte) || is_sub_delim(byte) || matches!(byte, b':' | b'@' | b'/');
}

byte_map! {
    /// [`PATH`] plus `?`.
    pub(crate) const QUERY_OR_FRAGMENT =
        |byte| is_unreserved(byte) || is_sub_delim(byte) || matches!(byte, b':' | b'@' | b'/' | b'?');
}

byte_map! {
    /// `ALPHA / DIGIT / "+" / "-" / "."`, the tail of a scheme.
    pub(crate) const SCHEME = |byte| byte.is_ascii_alphanumeric() || matches!(byte, b'+' | b'-' | b'.');
}

byte_map! {
    /// Bytes allowed in a registered host name.
    ///
    /// Lenient towards non-ASCII (internationalized) names, strict towards
    /// anything that would split the authority on reconstruction.
    pub(crate) const HOST = |byte| {
        !matches!(byte, 0x00..=0x20 | 0x7f | b'/' | b'?' | b'#' | b'@' | b':' | b'[' | b']' | b'\\')
    };
}

byte_map! {
    /// RFC 7230 `tchar`.
    pub(crate) const TOKEN = |byte| {
        byte.is_ascii_alphanumeric()
            || matches!(
                byte,
                b'!' | b'#' | b'$' | b'%' | b'&' | b'\'' | b'*' | b'+' | b'-' | b'.' | b'^' | b'_' | b'`' | b'|' | b'~'
            )
    };
}

byte_map! {
    /// RFC 7230 `field-vchar`, `obs-text` and the folding whitespace `SP / HTAB`.
    pub(crate) const FIELD_VALUE = |byte| matches!(byte, b' ' | b'\t' | 0x21..=0x7e | 0x80..=0xff);
}

/// Returns `true` when `bytes` starts with a complete `%XX` triplet.
#[inline]
pub(crate) fn is_pct_triplet(bytes: &[u8]) -> bool {
    matches!(bytes, [b'%', hi, lo, ..] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit())
}
