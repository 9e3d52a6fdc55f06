//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use sitesnap::{transform_page, LinkRewriteMap};
    use url::Url;

    use crate::common::StaticFetcher;

    #[test]
    fn inlines_css_and_rewrites_links_in_one_pass() {
        let site = Url::parse("https://example.com").unwrap();
        let fetcher = StaticFetcher::new().with_page("https://example.com/style.css", "p{margin:0}");
        let raw_html = concat!(
            r#"<html><head><link rel="stylesheet" href="/style.css"></head>"#,
            r#"<body><a href="/about">About</a></body></html>"#,
        );

        let record = transform_page(
            &fetcher,
            &LinkRewriteMap::new(&site),
            site.clone(),
            raw_html.to_string(),
        )
        .unwrap();

        assert_eq!(record.file_name, "index.html");
        assert_eq!(record.raw_html, raw_html);
        assert_eq!(
            record.transformed_html,
            concat!(
                "<html><head><style>p{margin:0}</style></head>",
                r#"<body><a href="./about.html">About</a></body></html>"#,
            )
        );
        assert_eq!(record.css.inlined, 1);
        assert_eq!(record.css.failed, 0);
    }

    #[test]
    fn subpage_stylesheets_resolve_against_the_subpage() {
        let site = Url::parse("https://example.com").unwrap();
        let page = Url::parse("https://example.com/docs/intro").unwrap();
        let fetcher =
            StaticFetcher::new().with_page("https://example.com/docs/docs.css", "h1{}");

        let record = transform_page(
            &fetcher,
            &LinkRewriteMap::new(&site),
            page,
            r#"<link rel="stylesheet" href="docs.css">"#.to_string(),
        )
        .unwrap();

        assert_eq!(record.file_name, "docs_intro.html");
        assert!(record.transformed_html.contains("<style>h1{}</style>"));
    }
}
