use sha2::{Digest, Sha256};

use super::url::{host_with_port, is_same_site, Url};

/// Characters that cannot appear in a local file name.
pub const INVALID_FILE_NAME_CHARS: &[char] = &[':', '*', '?', '"', '<', '>', '|', '\\', '/'];
/// Stem of the file the base page is saved as.
pub const INDEX_FILE_STEM: &str = "index";
pub const HTML_EXTENSION: &str = "html";

const DISAMBIGUATOR_LENGTH: usize = 8;

/// Replaces every character that is invalid in a file name with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if INVALID_FILE_NAME_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect()
}

/// Local file stem for a link target: one leading separator is stripped, the
/// rest is sanitized, and an empty result means the index page.
pub fn local_file_stem(target: &str) -> String {
    let target = target
        .strip_prefix('/')
        .or_else(|| target.strip_prefix('\\'))
        .unwrap_or(target);
    let sanitized = sanitize_file_name(target);

    if sanitized.is_empty() {
        INDEX_FILE_STEM.to_string()
    } else {
        sanitized
    }
}

/// Default local file stem for `url` inside a snapshot of `site`.
///
/// Same-site URLs are named after their path and query, URLs on other hosts
/// get their host prepended so they cannot shadow same-site pages.
pub fn url_file_stem(site: &Url, url: &Url) -> String {
    let path = url.path().trim_end_matches('/');
    let mut target = if is_same_site(site, url) {
        path.to_string()
    } else {
        format!("{}{}", host_with_port(url), path)
    };

    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    local_file_stem(&target)
}

/// Appends a short hash of `source_url` to `stem`.
pub fn disambiguate_file_stem(stem: &str, source_url: &str) -> String {
    let digest = Sha256::digest(source_url.as_bytes());
    let hash: String = digest[..DISAMBIGUATOR_LENGTH / 2]
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect();

    format!("{stem}-{hash}")
}

pub fn html_file_name(stem: &str) -> String {
    format!("{stem}.{HTML_EXTENSION}")
}
