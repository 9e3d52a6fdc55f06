pub use url::Url;

/// Resolves `href` against `base`; `None` when the reference is malformed.
pub fn resolve_url(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}

/// Turns `href` into the absolute, canonical form used for comparisons.
///
/// The reference is resolved against `base`, its fragment is dropped, and a
/// single trailing `/` is removed. References the URL parser rejects are
/// appended to the origin of `base`, which keeps the result absolute; such
/// strings simply never match anything downstream.
///
/// ```
/// use sitesnap::utils::url::{normalize_url, Url};
///
/// let base = Url::parse("https://example.com").unwrap();
/// assert_eq!(normalize_url(&base, "/about/"), "https://example.com/about");
/// ```
pub fn normalize_url(base: &Url, href: &str) -> String {
    let href = href.trim();

    let mut absolute = match base.join(href) {
        Ok(mut resolved) => {
            resolved.set_fragment(None);
            resolved.to_string()
        }
        Err(_) => format!(
            "{}/{}",
            base.origin().ascii_serialization(),
            href.trim_start_matches('/')
        ),
    };

    if absolute.ends_with('/') {
        absolute.pop();
    }

    absolute
}

/// Parses a normalized URL string back into a [`Url`].
pub fn parse_normalized(normalized: &str) -> Option<Url> {
    Url::parse(normalized).ok()
}

pub fn is_http_url(url: &Url) -> bool {
    url.scheme() == "http" || url.scheme() == "https"
}

/// Two URLs belong to the same site when scheme, host and effective port agree.
pub fn is_same_site(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

/// Host of `url` with a non-default port appended, e.g. `example.com:8080`.
pub fn host_with_port(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();

    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}
