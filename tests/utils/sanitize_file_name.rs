//  ██████╗  █████╗ ███████╗███████╗██╗███╗   ██╗ ██████╗
//  ██╔══██╗██╔══██╗██╔════╝██╔════╝██║████╗  ██║██╔════╝
//  ██████╔╝███████║███████╗███████╗██║██╔██╗ ██║██║  ███╗
//  ██╔═══╝ ██╔══██║╚════██║╚════██║██║██║╚██╗██║██║   ██║
//  ██║     ██║  ██║███████║███████║██║██║ ╚████║╚██████╔╝
//  ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝╚═╝  ╚═══╝ ╚═════╝

#[cfg(test)]
mod passing {
    use sitesnap::sanitize_file_name;

    #[test]
    fn each_invalid_character_becomes_underscore() {
        assert_eq!(sanitize_file_name(":bad*name?"), "_bad_name_");
    }

    #[test]
    fn length_is_preserved() {
        let name = r#"a:b*c?d"e<f>g|h\i/j"#;

        assert_eq!(
            sanitize_file_name(name).chars().count(),
            name.chars().count()
        );
    }

    #[test]
    fn valid_names_are_unchanged() {
        assert_eq!(sanitize_file_name("about-us.v2"), "about-us.v2");
        assert_eq!(sanitize_file_name("résumé"), "résumé");
        assert_eq!(sanitize_file_name(""), "");
    }

    #[test]
    fn result_has_no_invalid_characters() {
        let sanitized = sanitize_file_name(r#"a/b\c:d*e?f"g<h>i|j"#);

        assert!(!sanitized.contains(['/', '\\', ':', '*', '?', '"', '<', '>', '|']));
    }
}
