use fast_webdav::{ClientConfig, Credentials, DavError};

fn config(base: &str) -> ClientConfig {
    ClientConfig::new("https://example.com", base).expect("Failed to create config")
}

#[test]
fn test_rejects_empty_identifiers() {
    assert!(matches!(
        ClientConfig::new("", "/dav/"),
        Err(DavError::InvalidArgument(_))
    ));
    assert!(matches!(
        ClientConfig::new("https://example.com", ""),
        Err(DavError::InvalidArgument(_))
    ));
    assert!(matches!(
        ClientConfig::new("https://example.com", "   "),
        Err(DavError::InvalidArgument(_))
    ));
}

#[test]
fn test_rejects_non_origin_servers() {
    for server in [
        "example.com",
        "ftp://example.com",
        "https://example.com/dav",
        "https://example.com/?x=1",
    ] {
        assert!(
            matches!(
                ClientConfig::new(server, "/"),
                Err(DavError::InvalidArgument(_))
            ),
            "{server} should be rejected"
        );
    }
}

#[test]
fn test_origin_normalization() {
    let cfg = ClientConfig::new("http://localhost:8080/", "/").expect("config");
    assert_eq!(cfg.origin(), "http://localhost:8080");

    let cfg = ClientConfig::new("https://bob:pw@dav.example.com", "/").expect("config");
    assert_eq!(cfg.origin(), "https://dav.example.com");
    assert!(cfg.credentials().is_ambient());
}

#[test]
fn test_base_path_normalization() {
    assert_eq!(config("dav").base_path(), "/dav/");
    assert_eq!(config("/dav").base_path(), "/dav/");
    assert_eq!(config("//remote.php/webdav//").base_path(), "/remote.php/webdav/");
    assert_eq!(config("/").base_path(), "/");
}

#[test]
fn test_resolve_plain_and_collection() {
    let cfg = config("/dav/");
    assert_eq!(
        cfg.resolve("docs/report.txt", false).unwrap().to_string(),
        "https://example.com/dav/docs/report.txt"
    );
    assert_eq!(
        cfg.resolve("docs", true).unwrap().to_string(),
        "https://example.com/dav/docs/"
    );
}

#[test]
fn test_resolve_trims_any_number_of_separators() {
    let cfg = config("/dav/");
    for path in ["a/b", "/a/b", "a/b/", "///a/b///", "/a/b/"] {
        let plain = cfg.resolve(path, false).unwrap().to_string();
        assert_eq!(plain, "https://example.com/dav/a/b", "plain form of {path:?}");
        assert!(!plain.ends_with('/'));

        let collection = cfg.resolve(path, true).unwrap().to_string();
        assert_eq!(collection, "https://example.com/dav/a/b/", "collection form of {path:?}");
        assert!(!collection.ends_with("//"));
    }
}

#[test]
fn test_resolve_empty_path_is_base() {
    let cfg = config("/dav/");
    assert_eq!(cfg.resolve("", false).unwrap().to_string(), "https://example.com/dav/");
    assert_eq!(cfg.resolve("/", true).unwrap().to_string(), "https://example.com/dav/");

    let root = config("/");
    assert_eq!(root.resolve("", true).unwrap().to_string(), "https://example.com/");
    assert_eq!(
        root.resolve("file.txt", false).unwrap().to_string(),
        "https://example.com/file.txt"
    );
}

#[test]
fn test_resolve_percent_encodes_segments() {
    let cfg = config("/my dav/");
    assert_eq!(
        cfg.resolve("a folder/50% #1?.txt", false).unwrap().to_string(),
        "https://example.com/my%20dav/a%20folder/50%25%20%231%3F.txt"
    );
}

#[test]
fn test_credentials_debug_is_redacted() {
    let basic = format!("{:?}", Credentials::basic("alice", "hunter2"));
    assert!(basic.contains("alice"));
    assert!(!basic.contains("hunter2"));

    let bearer = format!("{:?}", Credentials::Bearer("tok-123".into()));
    assert!(!bearer.contains("tok-123"));
}

#[test]
fn test_with_credentials() {
    let cfg = config("/").with_credentials(Credentials::basic("u", "p"));
    assert_eq!(cfg.credentials(), Credentials::basic("u", "p"));
}

#[test]
fn test_cloned_config_keeps_its_own_credentials() {
    let cfg = config("/").with_credentials(Credentials::basic("u", "p"));
    let copy = cfg.clone();
    cfg.set_credentials(Credentials::Bearer("later".into()));

    assert_eq!(cfg.credentials(), Credentials::Bearer("later".into()));
    assert_eq!(copy.credentials(), Credentials::basic("u", "p"));
}
