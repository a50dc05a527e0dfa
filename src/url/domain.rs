use url::Url;

/// Extracts the host of an absolute URL.
///
/// Returns the lower-cased host portion of the URL, or `None` if the URL
/// cannot be parsed or has no host (e.g. `mailto:` links).
///
/// # Examples
///
/// ```
/// use monzo_crawler::url::host;
///
/// assert_eq!(host("https://Example.COM/path"), Some("example.com".to_string()));
/// assert_eq!(host("not a url"), None);
/// ```
pub fn host(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    parsed.host_str().map(|h| h.to_ascii_lowercase())
}

/// Decides whether a link host belongs to the seed's domain.
///
/// True iff both hosts are present and the link host either equals the seed
/// host or is a subdomain of it. The subdomain match is strict: the link host
/// must end with `".{seed_host}"` on a dot boundary, so `api.monzo.com`
/// matches a seed of `monzo.com` while `evilmonzo.com` does not.
///
/// No public-suffix-list logic is applied; the caller is responsible for
/// passing a sensible seed authority.
pub fn same_domain(seed_host: Option<&str>, link_host: Option<&str>) -> bool {
    let (seed, link) = match (seed_host, link_host) {
        (Some(s), Some(l)) => (s, l),
        _ => return false,
    };
    if link == seed {
        return true;
    }
    // Strict suffix: the character before the seed suffix must be a dot.
    link.len() > seed.len()
        && link.ends_with(seed)
        && link.as_bytes()[link.len() - seed.len() - 1] == b'.'
}
