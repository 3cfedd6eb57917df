/// Whether a redirect to `host` is allowed.
///
/// Relative references (no host) are always allowed. Hosts are compared
/// literally: the whitelist needs an exact match, subdomains a suffix match,
/// so `.test.com` accepts `sub.test.com` but neither `test.com` nor
/// `eviltest.com`.
pub(crate) fn host_allowed(
    host: Option<&str>,
    whitelist: &[String],
    subdomains: &[String],
) -> bool {
    let Some(host) = host else {
        return true;
    };

    whitelist.iter().any(|allowed| allowed == host)
        || subdomains.iter().any(|suffix| host.ends_with(suffix.as_str()))
}
