//! Link rewriting
//!
//! Points same-site anchors at the local files a snapshot holds for them.
//! Anchors to other sites, fragment-only anchors and non-navigational
//! schemes are left alone.
//!
//! Targets are named through a [`LinkRewriteMap`], planned once per snapshot
//! so that a link and the file written for its target always agree. A
//! same-site target that was never fetched still gets its default local name,
//! so such links dangle in the saved copy.

use std::collections::{HashMap, HashSet};

use markup5ever_rcdom::{Handle, RcDom};

use crate::core::SnapshotError;
use crate::parsers::html::{
    find_nodes_by_name, get_node_attr, html_to_dom, serialize_document, set_node_attr,
};
use crate::utils::filename::{
    disambiguate_file_stem, html_file_name, url_file_stem, INDEX_FILE_STEM,
};
use crate::utils::url::{is_same_site, normalize_url, parse_normalized, Url};

/// Normalized URL to local file stem, for one snapshot.
#[derive(Clone, Debug)]
pub struct LinkRewriteMap {
    site: Url,
    file_stems: HashMap<String, String>,
    taken: HashSet<String>,
}

impl LinkRewriteMap {
    /// A map that only knows the site's own page, saved as `index`.
    pub fn new(site: &Url) -> LinkRewriteMap {
        let mut file_stems = HashMap::new();
        file_stems.insert(normalize_url(site, ""), INDEX_FILE_STEM.to_string());

        LinkRewriteMap {
            site: site.clone(),
            file_stems,
            taken: HashSet::from([INDEX_FILE_STEM.to_string()]),
        }
    }

    /// Assigns a unique file stem to every page of the snapshot.
    ///
    /// Stems are handed out in iteration order; a page whose default stem is
    /// already taken gets a hash of its URL appended.
    pub fn plan<'a, I>(site: &Url, pages: I) -> LinkRewriteMap
    where
        I: IntoIterator<Item = &'a String>,
    {
        let mut map = LinkRewriteMap::new(site);

        for page in pages {
            if map.file_stems.contains_key(page) {
                continue;
            }

            let stem = match parse_normalized(page) {
                Some(url) => url_file_stem(site, &url),
                None => continue,
            };
            let stem = map.free_file_stem(stem, page);

            map.taken.insert(stem.clone());
            map.file_stems.insert(page.clone(), stem);
        }

        map
    }

    pub fn site(&self) -> &Url {
        &self.site
    }

    /// File stem planned for a normalized URL, if any.
    pub fn planned_file_stem(&self, normalized: &str) -> Option<&str> {
        self.file_stems.get(normalized).map(String::as_str)
    }

    /// File stem for `url`: the planned one, or the default local name.
    ///
    /// A default name already held by a planned page is disambiguated, so an
    /// unplanned target dangles instead of pointing at some other page.
    pub fn file_stem(&self, url: &Url) -> String {
        let normalized = normalize_url(url, "");

        if let Some(stem) = self.planned_file_stem(&normalized) {
            return stem.to_string();
        }

        let stem = match parse_normalized(&normalized) {
            Some(canonical) => url_file_stem(&self.site, &canonical),
            None => url_file_stem(&self.site, url),
        };
        self.free_file_stem(stem, &normalized)
    }

    fn free_file_stem(&self, stem: String, normalized: &str) -> String {
        if self.taken.contains(&stem) {
            disambiguate_file_stem(&stem, normalized)
        } else {
            stem
        }
    }

    pub fn file_name(&self, url: &Url) -> String {
        html_file_name(&self.file_stem(url))
    }

    pub fn len(&self) -> usize {
        self.file_stems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.file_stems.is_empty()
    }
}

/// Anchors that never point at another document of the site.
fn should_skip_link(href: &str) -> bool {
    href.is_empty()
        || href.starts_with('#')
        || href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
        || href.starts_with("blob:")
}

/// Computes the local href for `href` found on the page at `page_url`.
fn rewrite_href(href: &str, page_url: &Url, rewrite_map: &LinkRewriteMap) -> Option<String> {
    let href = href.trim();
    if should_skip_link(href) {
        return None;
    }

    let target = page_url.join(href).ok()?;
    if !is_same_site(rewrite_map.site(), &target) {
        return None;
    }

    let mut local_href = format!("./{}", rewrite_map.file_name(&target));
    if let Some(fragment) = target.fragment() {
        local_href.push('#');
        local_href.push_str(fragment);
    }

    Some(local_href)
}

/// Rewrites the anchors of `dom`, returning how many were changed.
pub fn rewrite_links_in_dom(dom: &RcDom, page_url: &Url, rewrite_map: &LinkRewriteMap) -> usize {
    let rewrites: Vec<(Handle, String)> = find_nodes_by_name(&dom.document, "a")
        .into_iter()
        .filter_map(|anchor| {
            let href = get_node_attr(&anchor, "href")?;
            let local_href = rewrite_href(&href, page_url, rewrite_map)?;
            Some((anchor, local_href))
        })
        .collect();

    for (anchor, local_href) in rewrites.iter() {
        set_node_attr(anchor, "href", Some(local_href.clone()));
    }

    rewrites.len()
}

/// Rewrites the anchors of a page of the site rooted at `base_url`.
pub fn rewrite_links(base_url: &Url, html: &str) -> Result<String, SnapshotError> {
    let dom = html_to_dom(html);
    rewrite_links_in_dom(&dom, base_url, &LinkRewriteMap::new(base_url));

    Ok(serialize_document(&dom)?)
}
