//! Splits a redirect target into the few components the checks look at.
//!
//! This deliberately accepts less than RFC 3986 does: anything that could be
//! read in more than one way by a browser is reported as an error instead.

/// The components of a candidate, borrowed from it.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub(crate) struct ParsedUri<'a> {
    pub scheme: Option<&'a str>,
    pub userinfo: Option<&'a str>,
    pub host: Option<&'a str>,
    /// Possibly empty. Never `None`, since the parser has no opaque form.
    pub path: &'a str,
    // Validated, but no check depends on them.
    #[allow(dead_code)]
    pub port: Option<&'a str>,
    #[allow(dead_code)]
    pub query: Option<&'a str>,
    #[allow(dead_code)]
    pub fragment: Option<&'a str>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum ParsingError {
    #[error("invalid scheme {0:?}")]
    InvalidScheme(String),
    #[error("a scheme must be followed by `//`")]
    MissingAuthority,
    #[error("the host is empty")]
    EmptyHost,
    #[error("invalid host {0:?}")]
    InvalidHost(String),
    #[error("invalid port {0:?}")]
    InvalidPort(String),
    #[error("invalid userinfo")]
    InvalidUserinfo,
    #[error("invalid character {0:?}")]
    InvalidCharacter(char),
    #[error("invalid percent encoding at byte {0}")]
    InvalidPercentEncoding(usize),
}

type Result<T> = std::result::Result<T, ParsingError>;

fn is_unreserved(char: char) -> bool {
    char.is_ascii_alphanumeric() || matches!(char, '-' | '.' | '_' | '~')
}

fn is_sub_delim(char: char) -> bool {
    matches!(
        char,
        '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';' | '='
    )
}

/// `pchar`. What follows a `%` is checked by [`check_characters`].
fn is_pchar(char: char) -> bool {
    is_unreserved(char) || is_sub_delim(char) || matches!(char, ':' | '@' | '%')
}

/// Rejects any character that has no place in a URI at all, and any `%` not
/// followed by two hex digits.
fn check_characters(input: &str) -> Result<()> {
    if let Some(char) = input.chars().find(|&char| {
        !(is_pchar(char) || matches!(char, '/' | '?' | '#' | '[' | ']' | '\\'))
    }) {
        return Err(ParsingError::InvalidCharacter(char));
    }

    let bytes = input.as_bytes();
    for (i, byte) in bytes.iter().enumerate() {
        if *byte != b'%' {
            continue;
        }
        let valid = bytes
            .get(i + 1..i + 3)
            .is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit));
        if !valid {
            return Err(ParsingError::InvalidPercentEncoding(i));
        }
    }

    Ok(())
}

fn check_component(component: &str, allowed: impl Fn(char) -> bool) -> Result<()> {
    match component.chars().find(|&char| !allowed(char)) {
        Some(char) => Err(ParsingError::InvalidCharacter(char)),
        None => Ok(()),
    }
}

fn parse_scheme(scheme: &str) -> Result<&str> {
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|char| char.is_ascii_alphabetic())
        && chars.all(|char| char.is_ascii_alphanumeric() || matches!(char, '+' | '-' | '.'));

    if valid {
        Ok(scheme)
    } else {
        Err(ParsingError::InvalidScheme(scheme.to_owned()))
    }
}

fn parse_reg_name(host: &str) -> Result<&str> {
    if host.is_empty() {
        return Err(ParsingError::EmptyHost);
    }

    let valid = host.split('.').all(|label| {
        !label.is_empty()
            && label
                .chars()
                .all(|char| char.is_ascii_alphanumeric() || matches!(char, '-' | '_' | '~'))
    });

    if valid {
        Ok(host)
    } else {
        Err(ParsingError::InvalidHost(host.to_owned()))
    }
}

fn parse_port(port: &str) -> Result<&str> {
    if !port.is_empty() && port.bytes().all(|byte| byte.is_ascii_digit()) {
        Ok(port)
    } else {
        Err(ParsingError::InvalidPort(port.to_owned()))
    }
}

/// Parses `host[:port]`, where host may be a bracketed IPv6 literal.
fn parse_host_port(host_port: &str) -> Result<(&str, Option<&str>)> {
    if host_port.starts_with('[') {
        let close = host_port
            .find(']')
            .ok_or_else(|| ParsingError::InvalidHost(host_port.to_owned()))?;
        let (host, rest) = host_port.split_at(close + 1);

        if !matches!(url::Host::parse(host), Ok(url::Host::Ipv6(_))) {
            return Err(ParsingError::InvalidHost(host.to_owned()));
        }

        return match rest.strip_prefix(':') {
            Some(port) => Ok((host, Some(parse_port(port)?))),
            None if rest.is_empty() => Ok((host, None)),
            None => Err(ParsingError::InvalidHost(host_port.to_owned())),
        };
    }

    match host_port.rsplit_once(':') {
        Some((host, port)) => Ok((parse_reg_name(host)?, Some(parse_port(port)?))),
        None => Ok((parse_reg_name(host_port)?, None)),
    }
}

struct Authority<'a> {
    userinfo: Option<&'a str>,
    host: &'a str,
    port: Option<&'a str>,
}

fn parse_authority(authority: &str) -> Result<Authority<'_>> {
    // Browsers read a backslash as a slash here, which would move the host.
    if authority.contains('\\') {
        return Err(ParsingError::InvalidCharacter('\\'));
    }

    let (userinfo, host_port) = match authority.split_once('@') {
        Some((userinfo, host_port)) => {
            if host_port.contains('@') {
                return Err(ParsingError::InvalidUserinfo);
            }
            check_component(userinfo, |char| {
                is_unreserved(char) || is_sub_delim(char) || matches!(char, ':' | '%')
            })
            .map_err(|_| ParsingError::InvalidUserinfo)?;
            (Some(userinfo), host_port)
        }
        None => (None, authority),
    };

    let (host, port) = parse_host_port(host_port)?;

    Ok(Authority {
        userinfo,
        host,
        port,
    })
}

impl<'a> ParsedUri<'a> {
    pub fn parse(input: &'a str) -> Result<Self> {
        check_characters(input)?;

        let (rest, fragment) = match input.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (input, None),
        };
        let (rest, query) = match rest.split_once('?') {
            Some((rest, query)) => (rest, Some(query)),
            None => (rest, None),
        };

        for component in query.into_iter().chain(fragment) {
            check_component(component, |char| is_pchar(char) || matches!(char, '/' | '?'))?;
        }

        // A colon before the first separator can only start a scheme, since
        // relative references can't have one in their first segment.
        let (scheme, rest) = match rest.find([':', '/', '\\']) {
            Some(i) if rest.as_bytes()[i] == b':' => {
                let scheme = parse_scheme(&rest[..i])?;
                let rest = &rest[i + 1..];
                if !rest.starts_with("//") {
                    return Err(ParsingError::MissingAuthority);
                }
                (Some(scheme), rest)
            }
            _ => (None, rest),
        };

        let (authority, path) = match rest.strip_prefix("//") {
            Some(rest) => {
                let (authority, path) = rest.split_at(rest.find('/').unwrap_or(rest.len()));
                (Some(parse_authority(authority)?), path)
            }
            None => (None, rest),
        };

        check_component(path, |char| is_pchar(char) || matches!(char, '/' | '\\'))?;

        let result = ParsedUri {
            scheme,
            userinfo: authority.as_ref().and_then(|authority| authority.userinfo),
            host: authority.as_ref().map(|authority| authority.host),
            port: authority.as_ref().and_then(|authority| authority.port),
            path,
            query,
            fragment,
        };

        tracing::trace!("Parsed candidate: {:?}", result);

        Ok(result)
    }
}

#[cfg(test)]
mod test {
    use super::{ParsedUri, ParsingError};

    fn parse(input: &str) -> Result<ParsedUri<'_>, ParsingError> {
        ParsedUri::parse(input)
    }

    #[test]
    fn relative_reference() {
        assert_eq!(
            parse("/a/b?c=d#e"),
            Ok(ParsedUri {
                scheme: None,
                userinfo: None,
                host: None,
                path: "/a/b",
                port: None,
                query: Some("c=d"),
                fragment: Some("e"),
            })
        );
    }

    #[test]
    fn absolute_url() {
        assert_eq!(
            parse("https://user:pw@test.com:8443/x?y"),
            Ok(ParsedUri {
                scheme: Some("https"),
                userinfo: Some("user:pw"),
                host: Some("test.com"),
                path: "/x",
                port: Some("8443"),
                query: Some("y"),
                fragment: None,
            })
        );
    }

    #[test]
    fn network_path_reference() {
        let uri = parse("//test.com").unwrap();

        assert_eq!(uri.scheme, None);
        assert_eq!(uri.host, Some("test.com"));
        assert_eq!(uri.path, "");
    }

    #[test]
    fn colon_after_first_segment_is_not_a_scheme() {
        let uri = parse("/a:b").unwrap();

        assert_eq!(uri.scheme, None);
        assert_eq!(uri.path, "/a:b");
    }

    #[test]
    fn errors() {
        assert_eq!(
            parse("1http://test.com/"),
            Err(ParsingError::InvalidScheme("1http".to_owned()))
        );
        assert_eq!(parse("mailto:a@b.c"), Err(ParsingError::MissingAuthority));
        assert_eq!(
            parse("http://a@b@test.com/"),
            Err(ParsingError::InvalidUserinfo)
        );
        assert_eq!(
            parse("http://te%73t.com/"),
            Err(ParsingError::InvalidHost("te%73t.com".to_owned()))
        );
        assert_eq!(parse("/a#b#c"), Err(ParsingError::InvalidCharacter('#')));
        assert_eq!(parse("/a?b\\c"), Err(ParsingError::InvalidCharacter('\\')));
        assert_eq!(parse("/a[1]"), Err(ParsingError::InvalidCharacter('[')));
        assert_eq!(parse("/a\tb"), Err(ParsingError::InvalidCharacter('\t')));
    }
}
