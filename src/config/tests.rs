use std::path::Path;

use super::*;
use crate::pipeline::StageSpec;
use crate::pool::{Content, ResourceKind};

const CATALOG: &str = r#"
[[module]]
name = "app"
requires = ["base"]

[[module.resource]]
path = "app/Main.class"
content = "main"

[[module]]
name = "base"

[[module.resource]]
path = "conf/base.properties"
kind = "config"
content = "k=v"

[[module.resource]]
path = "lib/libnative.so"
kind = "native-lib"
file = "bin/libnative.so"
"#;

// ── catalog ────────────────────────────────────────────────

#[test]
fn test_parse_catalog() {
    let catalog = parse_catalog(CATALOG, Path::new("/cat/modules.toml")).unwrap();
    assert_eq!(catalog.len(), 2);

    let app = catalog.lookup("app").unwrap();
    assert_eq!(app.requires(), &["base"]);
    assert_eq!(app.resources()[0].kind, ResourceKind::ClassOrResource);
    assert_eq!(app.resources()[0].content, Content::text("main"));

    let base = catalog.lookup("base").unwrap();
    assert_eq!(base.resources()[0].kind, ResourceKind::Config);
    assert_eq!(base.resources()[1].kind, ResourceKind::NativeLib);
    assert_eq!(
        base.resources()[1].content,
        Content::File(Path::new("/cat/bin/libnative.so").to_path_buf())
    );
}

#[test]
fn test_empty_catalog() {
    let catalog = parse_catalog("", Path::new("modules.toml")).unwrap();
    assert!(catalog.is_empty());
}

#[test]
fn test_catalog_syntax_error_has_span() {
    let text = "[[module]]\nname = \n";
    let err = parse_catalog(text, Path::new("modules.toml")).unwrap_err();
    match err {
        LinkError::Config { path, span, .. } => {
            assert_eq!(path, Path::new("modules.toml"));
            let span = span.expect("toml errors carry a span");
            assert!(span.start <= text.len());
        }
        other => panic!("expected Config, got {:?}", other),
    }
}

#[test]
fn test_catalog_unknown_kind() {
    let text = "[[module]]\nname = \"m\"\n[[module.resource]]\npath = \"a\"\nkind = \"class\"\ncontent = \"\"\n";
    let err = parse_catalog(text, Path::new("modules.toml")).unwrap_err();
    assert!(matches!(err, LinkError::Config { .. }), "got {:?}", err);
}

#[test]
fn test_catalog_resource_needs_one_source() {
    let both = "[[module]]\nname = \"m\"\n[[module.resource]]\npath = \"a\"\ncontent = \"x\"\nfile = \"a.bin\"\n";
    let neither = "[[module]]\nname = \"m\"\n[[module.resource]]\npath = \"a\"\n";
    for text in [both, neither] {
        let err = parse_catalog(text, Path::new("modules.toml")).unwrap_err();
        match err {
            LinkError::Config { message, span, .. } => {
                assert!(message.contains("exactly one"), "{}", message);
                assert!(span.is_none());
            }
            other => panic!("expected Config, got {:?}", other),
        }
    }
}

#[test]
fn test_catalog_duplicate_module() {
    let text = "[[module]]\nname = \"m\"\n[[module]]\nname = \"m\"\n";
    let err = parse_catalog(text, Path::new("modules.toml")).unwrap_err();
    assert!(matches!(err, LinkError::DuplicateModule { name } if name == "m"));
}

#[test]
fn test_load_catalog_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_catalog(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, LinkError::Io { .. }));
}

// ── link file ──────────────────────────────────────────────

#[test]
fn test_link_config_resolves_relative_paths() {
    let text = r#"
catalog = "modules.toml"
roots = ["app"]
output = "out/image"
log = "debug"

[[stage]]
plugin = "exclude-resources"
options = "**/*.txt"

[[stage]]
plugin = "exclude-files"
"#;
    let config = LinkConfig::parse(text, Path::new("/work/modlink.toml")).unwrap();
    assert_eq!(config.catalog, Some(Path::new("/work/modules.toml").to_path_buf()));
    assert_eq!(config.output, Some(Path::new("/work/out/image").to_path_buf()));
    assert_eq!(config.roots, vec!["app"]);
    assert_eq!(config.log.as_deref(), Some("debug"));
    assert_eq!(
        config.stages,
        vec![
            StageSpec::new("exclude-resources", "**/*.txt"),
            StageSpec {
                plugin: "exclude-files".to_string(),
                options: None
            },
        ]
    );
}

#[test]
fn test_link_config_keeps_absolute_paths() {
    let config = LinkConfig::parse("output = \"/abs/out\"", Path::new("/work/modlink.toml")).unwrap();
    assert_eq!(config.output, Some(Path::new("/abs/out").to_path_buf()));
    assert!(config.catalog.is_none());
    assert!(config.stages.is_empty());
}

#[test]
fn test_link_config_rejects_unknown_keys() {
    let err = LinkConfig::parse("rootz = [\"app\"]", Path::new("modlink.toml")).unwrap_err();
    assert!(matches!(err, LinkError::Config { .. }), "got {:?}", err);
}

#[test]
fn test_link_config_find_walks_up() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a").join("b");
    std::fs::create_dir_all(&nested).unwrap();

    let file = dir.path().join(LINK_FILE);
    std::fs::write(&file, "roots = [\"app\"]\n").unwrap();
    assert_eq!(LinkConfig::find(&nested), Some(file.clone()));

    let loaded = LinkConfig::load(&file).unwrap();
    assert_eq!(loaded.roots, vec!["app"]);
}
