//! Decides whether a redirect target is safe to send a client to.

use itertools::Itertools;
use tracing::instrument;

use crate::policy::{Policy, PolicyError};


mod host;
mod normalize;
mod parsing;

use self::{host::host_allowed, normalize::remove_dot_segments, parsing::ParsedUri};

pub use self::parsing::ParsingError;

/// Why a candidate was found unsafe.
///
/// Only the first failing check is reported.
#[derive(Debug, thiserror::Error, PartialEq, Eq, Clone)]
pub enum Rejection {
    #[error("the target contains `///`")]
    TripleSlash,
    #[error("the target is malformed: {0}")]
    Malformed(#[from] ParsingError),
    #[error("the path doesn't start with `/`")]
    RelativePath,
    #[error("the path contains consecutive slashes or backslashes")]
    RepeatedSeparator,
    #[error("scheme {0:?} is neither http nor https")]
    DisallowedScheme(String),
    #[error("the target contains userinfo")]
    Userinfo,
    #[error("the path doesn't match {0:?}")]
    PathMismatch(String),
    #[error("the target is not an absolute URL")]
    NotAbsolute,
    #[error("scheme {0:?} is not https")]
    InsecureScheme(String),
    #[error("host {0:?} is not allowed")]
    HostNotAllowed(String),
}

#[must_use]
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Verdict {
    Safe,
    Unsafe(Rejection),
}

impl Verdict {
    pub fn is_safe(&self) -> bool {
        matches!(self, Self::Safe)
    }
}

fn is_separator(char: char) -> bool {
    char == '/' || char == '\\'
}

/// Runs the checks in order, stopping at the first one that fails.
fn check(candidate: &str, policy: &Policy) -> Result<(), Rejection> {
    use Rejection as R;

    // Catches empty hosts (`http:///evil.com`) before the parser sees them.
    if candidate.contains("///") {
        return Err(R::TripleSlash);
    }

    let uri = ParsedUri::parse(candidate)?;

    if !uri.path.starts_with('/') {
        return Err(R::RelativePath);
    }
    if uri
        .path
        .chars()
        .tuple_windows()
        .any(|(a, b)| is_separator(a) && is_separator(b))
    {
        return Err(R::RepeatedSeparator);
    }

    if let Some(scheme) = uri.scheme {
        if scheme != "http" && scheme != "https" {
            return Err(R::DisallowedScheme(scheme.to_owned()));
        }
    }

    if uri.userinfo.is_some() {
        return Err(R::Userinfo);
    }

    // The raw path alone could be escaped with `..`, e.g. `/admin/../invalid`.
    if let Some(path_match) = &policy.path_match {
        if !path_match.is_match(uri.path) || !path_match.is_match(&remove_dot_segments(uri.path))
        {
            return Err(R::PathMismatch(path_match.as_str().to_owned()));
        }
    }

    if policy.require_absolute && uri.host.is_none() {
        return Err(R::NotAbsolute);
    }

    if let Some(scheme) = uri.scheme {
        if policy.require_ssl && scheme != "https" {
            return Err(R::InsecureScheme(scheme.to_owned()));
        }
    }

    if !host_allowed(uri.host, &policy.whitelist, &policy.subdomains) {
        return Err(R::HostNotAllowed(uri.host.unwrap_or_default().to_owned()));
    }

    Ok(())
}

/// Evaluates `candidate` against `policy`, reporting why it was rejected.
///
/// Unsafe input is never an error: the only error is a misconfigured policy,
/// which is reported whatever the candidate is.
#[instrument(skip_all)]
pub fn evaluate(candidate: &str, policy: &Policy) -> Result<Verdict, PolicyError> {
    if let Err(error) = policy.validate() {
        tracing::warn!("Refusing to evaluate with a misconfigured policy: {}", error);
        return Err(error);
    }

    tracing::trace!("Started to evaluate: {:?}", candidate);

    let verdict = match check(candidate, policy) {
        Ok(()) => Verdict::Safe,
        Err(rejection) => {
            tracing::debug!("Rejected redirect target {:?}: {}", candidate, rejection);
            Verdict::Unsafe(rejection)
        }
    };

    tracing::trace!("Resulted in: {:?}", verdict);

    Ok(verdict)
}

/// Simply maps [`evaluate`] to a boolean.
pub fn is_safe(candidate: &str, policy: &Policy) -> Result<bool, PolicyError> {
    evaluate(candidate, policy).map(|verdict| verdict.is_safe())
}

/// Returns `candidate` if it is present, non-empty and safe, `default`
/// otherwise.
///
/// The candidate is converted into the type of the default, so an owned
/// `String` candidate can fall back to e.g. a `Cow::Borrowed("/")`.
/// The policy is validated even when there is no candidate, so a
/// misconfiguration can't hide behind empty input.
pub fn make_safe<S, T>(candidate: Option<S>, default: T, policy: &Policy) -> Result<T, PolicyError>
where
    S: AsRef<str> + Into<T>,
{
    let candidate = match candidate {
        Some(candidate) if !candidate.as_ref().is_empty() => candidate,
        _ => {
            policy.validate()?;
            return Ok(default);
        }
    };

    if is_safe(candidate.as_ref(), policy)? {
        Ok(candidate.into())
    } else {
        Ok(default)
    }
}
