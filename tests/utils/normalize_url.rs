//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use sitesnap::normalize_url;
    use url::Url;

    fn base() -> Url {
        Url::parse("https://example.com").unwrap()
    }

    #[test]
    fn trailing_slash_does_not_matter() {
        assert_eq!(normalize_url(&base(), "/about/"), "https://example.com/about");
        assert_eq!(normalize_url(&base(), "about"), "https://example.com/about");
    }

    #[test]
    fn base_page_has_no_trailing_slash() {
        assert_eq!(normalize_url(&base(), ""), "https://example.com");
        assert_eq!(normalize_url(&base(), "/"), "https://example.com");
    }

    #[test]
    fn relative_references_resolve_against_base_path() {
        let base = Url::parse("https://example.com/docs/intro").unwrap();

        assert_eq!(normalize_url(&base, "guide"), "https://example.com/docs/guide");
        assert_eq!(normalize_url(&base, "../blog/"), "https://example.com/blog");
    }

    #[test]
    fn absolute_references_keep_their_host() {
        assert_eq!(
            normalize_url(&base(), "https://other.org/page/"),
            "https://other.org/page"
        );
    }

    #[test]
    fn fragment_and_surrounding_whitespace_are_dropped() {
        assert_eq!(
            normalize_url(&base(), "  /about#team "),
            "https://example.com/about"
        );
    }

    #[test]
    fn results_are_absolute_without_trailing_slash() {
        for href in ["", "/", "a", "a/", "/x/y/", "?q=1", "https://other.org/", "//cdn.net/"] {
            let normalized = normalize_url(&base(), href);

            assert!(!normalized.ends_with('/'), "{href} -> {normalized}");
            assert!(Url::parse(&normalized).is_ok(), "{href} -> {normalized}");
        }
    }
}

//  ███████╗ █████╗ ██╗██╗     ██╗███╗   ██╗ ██████╗
//  ██╔════╝██╔══██╗██║██║     ██║████╗  ██║██╔════╝
//  █████╗  ███████║██║██║     ██║██╔██╗ ██║██║  ███╗
//  ██╔══╝  ██╔══██║██║██║     ██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║██║███████╗██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚═╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod failing {
    use sitesnap::normalize_url;
    use url::Url;

    #[test]
    fn unparsable_reference_stays_on_base_origin() {
        let base = Url::parse("https://example.com/a/b").unwrap();

        let normalized = normalize_url(&base, "http://[broken");

        assert!(normalized.starts_with("https://example.com/"));
        assert!(!normalized.ends_with('/'));
    }

    #[test]
    fn only_one_trailing_slash_is_removed() {
        let base = Url::parse("https://example.com").unwrap();

        assert_eq!(normalize_url(&base, "/about//"), "https://example.com/about/");
    }
}
