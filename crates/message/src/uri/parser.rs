//! Decomposition of a URI reference into its RFC 3986 components.
//!
//! The parser only splits and checks structure. Case normalization, default
//! port suppression and percent-encoding are applied by [`Uri`](super::Uri).

use std::net::Ipv6Addr;

use crate::ensure;
use crate::error::ParseError;
use crate::matches::{HOST, SCHEME};

/// Borrowed components of a URI reference, as they appear in the input.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct RawUri<'a> {
    pub(crate) scheme: Option<&'a str>,
    pub(crate) user_info: Option<&'a str>,
    pub(crate) host: Option<&'a str>,
    pub(crate) port: Option<u16>,
    pub(crate) path: &'a str,
    pub(crate) query: Option<&'a str>,
    pub(crate) fragment: Option<&'a str>,
}

/// Schemes whose URIs must carry a non-empty host (RFC 7230 §2.7.1).
const HOST_REQUIRED: [&str; 2] = ["http", "https"];

pub(crate) fn parse(input: &str) -> Result<RawUri<'_>, ParseError> {
    let (rest, fragment) = match input.split_once('#') {
        Some((rest, fragment)) => (rest, Some(fragment)),
        None => (input, None),
    };
    let (rest, query) = match rest.split_once('?') {
        Some((rest, query)) => (rest, Some(query)),
        None => (rest, None),
    };
    let (scheme, rest) = split_scheme(rest);

    let mut raw = RawUri { scheme, path: rest, query, fragment, ..RawUri::default() };

    if let Some(hier) = rest.strip_prefix("//") {
        let end = hier.find('/').unwrap_or(hier.len());
        let (authority, path) = hier.split_at(end);
        let (user_info, host, port) = split_authority(authority)?;

        let host_required = scheme.is_some_and(|s| HOST_REQUIRED.iter().any(|h| s.eq_ignore_ascii_case(h)));
        ensure!(!(host.is_empty() && host_required), ParseError::missing_host(authority));

        raw.user_info = user_info;
        raw.host = Some(host);
        raw.port = port;
        raw.path = path;
    }

    Ok(raw)
}

/// Splits `scheme ":"` off the front, if the prefix is a valid scheme.
fn split_scheme(input: &str) -> (Option<&str>, &str) {
    let Some((candidate, rest)) = input.split_once(':') else {
        return (None, input);
    };

    let bytes = candidate.as_bytes();
    match bytes.split_first() {
        Some((first, tail)) if first.is_ascii_alphabetic() && tail.iter().all(|b| SCHEME[*b as usize]) => {
            (Some(candidate), rest)
        }
        _ => (None, input),
    }
}

/// Splits `[ userinfo "@" ] host [ ":" port ]`.
fn split_authority(authority: &str) -> Result<(Option<&str>, &str, Option<u16>), ParseError> {
    let (user_info, host_port) = match authority.rsplit_once('@') {
        Some((user_info, host_port)) => (Some(user_info), host_port),
        None => (None, authority),
    };

    let (host, port) = if host_port.starts_with('[') {
        let end = host_port.find(']').ok_or_else(|| ParseError::invalid_ip_literal(host_port))?;
        let (literal, after) = host_port.split_at(end + 1);
        validate_ip_literal(literal)?;
        match after {
            "" => (literal, None),
            _ => match after.strip_prefix(':') {
                Some(port) => (literal, Some(port)),
                None => return Err(ParseError::invalid_host(host_port)),
            },
        }
    } else {
        match host_port.rsplit_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (host_port, None),
        }
    };

    ensure!(host.starts_with('[') || host.bytes().all(|b| HOST[b as usize]), ParseError::invalid_host(host));

    let port = match port {
        None | Some("") => None,
        Some(port) => Some(parse_port(port)?),
    };

    ensure!(!host.is_empty() || (port.is_none() && user_info.is_none()), ParseError::missing_host(authority));

    Ok((user_info, host, port))
}

fn parse_port(port: &str) -> Result<u16, ParseError> {
    ensure!(port.bytes().all(|b| b.is_ascii_digit()), ParseError::invalid_port(port));
    port.parse::<u16>().ok().ok_or_else(|| ParseError::invalid_port(port))
}

fn validate_ip_literal(literal: &str) -> Result<(), ParseError> {
    ensure!(is_ip_literal(literal), ParseError::invalid_ip_literal(literal));
    Ok(())
}

/// Checks `"[" ( IPv6address / IPvFuture ) "]"`.
pub(crate) fn is_ip_literal(literal: &str) -> bool {
    let Some(inner) = literal.strip_prefix('[').and_then(|s| s.strip_suffix(']')) else {
        return false;
    };

    match inner.as_bytes() {
        [b'v' | b'V', ..] => is_ip_future(&inner[1..]),
        _ => inner.parse::<Ipv6Addr>().is_ok(),
    }
}

/// `1*HEXDIG "." 1*( unreserved / sub-delims / ":" )`, without the leading `v`.
fn is_ip_future(rest: &str) -> bool {
    let Some((version, address)) = rest.split_once('.') else {
        return false;
    };
    !version.is_empty()
        && version.bytes().all(|b| b.is_ascii_hexdigit())
        && !address.is_empty()
        && address.bytes().all(|b| {
            b.is_ascii_alphanumeric()
                || matches!(
                    b,
                    b'-' | b'.' | b'_' | b'~' | b':'
                        | b'!' | b'$' | b'&' | b'\'' | b'(' | b')' | b'*' | b'+' | b',' | b';' | b'='
                )
        })
}
