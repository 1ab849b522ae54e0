//! Percent-encoding filters for the path, query and fragment components.
//!
//! Both filters leave allowed bytes and well-formed `%XX` triplets untouched and
//! escape everything else byte by byte, so applying a filter to its own output
//! is a no-op.

use crate::matches::{PATH, QUERY_OR_FRAGMENT, is_pct_triplet};

const HEX: &[u8; 16] = b"0123456789ABCDEF";

/// Escapes every byte outside `pchar / "/"`.
pub(crate) fn filter_path(path: &str) -> String {
    filter(path, &PATH)
}

/// Escapes every byte outside `pchar / "/" / "?"`.
pub(crate) fn filter_query_or_fragment(component: &str) -> String {
    filter(component, &QUERY_OR_FRAGMENT)
}

fn filter(input: &str, allowed: &[bool; 256]) -> String {
    let bytes = input.as_bytes();
    let mut output = String::with_capacity(bytes.len());

    let mut idx = 0;
    while idx < bytes.len() {
        let byte = bytes[idx];
        if is_pct_triplet(&bytes[idx..]) {
            output.push_str(&input[idx..idx + 3]);
            idx += 3;
            continue;
        }

        if allowed[byte as usize] {
            // allowed bytes are all ASCII
            output.push(byte as char);
        } else {
            output.push('%');
            output.push(HEX[(byte >> 4) as usize] as char);
            output.push(HEX[(byte & 0x0f) as usize] as char);
        }
        idx += 1;
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_allowed_chars() {
        assert_eq!(filter_path("/foo/bar:baz@qux;a=1,b!$&'()*+"), "/foo/bar:baz@qux;a=1,b!$&'()*+");
        assert_eq!(filter_path("a-b._~"), "a-b._~");
    }

    #[test]
    fn encodes_disallowed_bytes() {
        assert_eq!(filter_path("/foo bar"), "/foo%20bar");
        assert_eq!(filter_path("/a?b#c"), "/a%3Fb%23c");
        assert_eq!(filter_path("/ü"), "/%C3%BC");
        assert_eq!(filter_path("/[x]"), "/%5Bx%5D");
    }

    #[test]
    fn query_allows_question_mark() {
        assert_eq!(filter_query_or_fragment("a=1?b=2"), "a=1?b=2");
        assert_eq!(filter_query_or_fragment("a=1 b"), "a=1%20b");
        assert_eq!(filter_query_or_fragment("frag#ment"), "frag%23ment");
    }

    #[test]
    fn leaves_valid_triplets() {
        assert_eq!(filter_path("/foo%20bar"), "/foo%20bar");
        assert_eq!(filter_path("/foo%2fbar"), "/foo%2fbar");
        assert_eq!(filter_query_or_fragment("q=%E2%82%AC"), "q=%E2%82%AC");
    }

    #[test]
    fn encodes_lone_percent() {
        assert_eq!(filter_path("/100%"), "/100%25");
        assert_eq!(filter_path("/%zz"), "/%25zz");
        assert_eq!(filter_query_or_fragment("a=%2"), "a=%252");
    }

    #[test]
    fn idempotent_on_samples() {
        for sample in ["/a b/%2x/ü", "%", "%%41", "?#[]", "%41%4", ""] {
            let once = filter_path(sample);
            assert_eq!(filter_path(&once), once);

            let once = filter_query_or_fragment(sample);
            assert_eq!(filter_query_or_fragment(&once), once);
        }
    }
}
