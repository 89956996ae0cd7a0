//! End-to-end tests: collect metadata from fixture collaborators, write the
//! XML document, and read it back.

use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

use testmeta::collect::{CommandError, CommandRunner, Collector, EnvDumpFile};
use testmeta::core::types::{MetaMap, MetaValue};
use testmeta::xml::{parse_document, write_metadata_file, Node};

struct FixedHost;

impl CommandRunner for FixedHost {
    fn run(&self, _command: &str, _cwd: Option<&Path>) -> Result<String, CommandError> {
        Ok("ci-runner-07".to_string())
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("git command failed")
        .status;
    assert!(status.success(), "git {:?} failed", args);
}

/// A poky-like checkout: one repository holding `meta` and `bitbake`.
fn poky_checkout() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    run_git(root, &["init"]);
    run_git(root, &["symbolic-ref", "HEAD", "refs/heads/scarthgap"]);
    run_git(root, &["config", "user.email", "test@example.com"]);
    run_git(root, &["config", "user.name", "Test User"]);

    std::fs::create_dir_all(root.join("meta/conf")).unwrap();
    std::fs::create_dir_all(root.join("bitbake/lib/bb")).unwrap();
    std::fs::write(root.join("meta/conf/layer.conf"), "BBFILE_COLLECTIONS += \"core\"\n").unwrap();
    std::fs::write(root.join("bitbake/lib/bb/__init__.py"), "").unwrap();
    run_git(root, &["add", "."]);
    run_git(root, &["commit", "-m", "Initial import"]);
    dir
}

fn write_fixtures(dir: &Path, layers: &str) {
    std::fs::write(
        dir.join("env.txt"),
        format!(
            "DISTRO=\"poky\"\n\
             DISTRO_VERSION=\"5.0.3\"\n\
             BBLAYERS=\"{}\"\n\
             MACHINE=\"qemux86-64\"\n\
             BB_NUMBER_THREADS=\"16\"\n\
             PARALLEL_MAKE=\"-j 16\"\n",
            layers
        ),
    )
    .unwrap();
    std::fs::write(
        dir.join("os-release"),
        "PRETTY_NAME=\"Ubuntu 22.04.4 LTS\"\nNAME=\"Ubuntu\"\nVERSION_ID=\"22.04\"\nID=ubuntu\n",
    )
    .unwrap();
}

fn collect(work: &Path, poky: &Path) -> MetaMap {
    let vars = EnvDumpFile::new(work.join("env.txt"));
    Collector::new(&FixedHost, &vars)
        .with_os_release(work.join("os-release"))
        .with_bitbake_dir(poky.join("bitbake/lib/bb"))
        .metadata_from_bb()
        .unwrap()
}

/// Assert every scalar and every layer/variable name in `map` is present in
/// `node`.
fn assert_recovered(tag: &str, map: &MetaMap, node: &Node) {
    for (key, value) in map {
        let child = match tag {
            "layers" => node.named_child("layer", key),
            "config" if value.as_str().is_some() => node.named_child("variable", key),
            _ => node.child(key),
        }
        .unwrap_or_else(|| panic!("<{}> lost entry {}", tag, key));

        match value {
            MetaValue::Scalar(text) => assert_eq!(child.text(), Some(text.as_str())),
            MetaValue::Map(inner) => assert_recovered(key, inner, child),
        }
    }
}

#[test]
fn collected_document_shape() {
    let poky = poky_checkout();
    let work = TempDir::new().unwrap();
    let local = work.path().join("meta-local");
    std::fs::create_dir(&local).unwrap();
    write_fixtures(
        work.path(),
        &format!("{} {}", poky.path().join("meta").display(), local.display()),
    );

    let metadata = collect(work.path(), poky.path());

    assert_eq!(
        metadata.keys().collect::<Vec<_>>(),
        vec!["hostname", "distro", "host_distro", "layers", "bitbake", "config"]
    );
    assert_eq!(metadata.get_str("hostname"), Some("ci-runner-07"));

    let host = metadata.get_map("host_distro").unwrap();
    assert_eq!(host.get_str("id"), Some("ubuntu"));
    assert_eq!(host.get_str("pretty_name"), Some("Ubuntu 22.04.4 LTS"));

    let layers = metadata.get_map("layers").unwrap();
    assert_eq!(
        layers.get_map("meta").unwrap().get_str("branch"),
        Some("scarthgap")
    );
    assert!(layers.get_map("meta-local").unwrap().is_empty());

    let bitbake = metadata.get_map("bitbake").unwrap();
    assert_eq!(bitbake.get_str("commit_count"), Some("1"));
}

#[test]
fn written_document_round_trips() {
    let poky = poky_checkout();
    let work = TempDir::new().unwrap();
    let local = work.path().join("meta-local");
    std::fs::create_dir(&local).unwrap();
    write_fixtures(
        work.path(),
        &format!("{} {}", poky.path().join("meta").display(), local.display()),
    );
    let metadata = collect(work.path(), poky.path());

    let out = work.path().join("metadata.xml");
    write_metadata_file(&out, &metadata).unwrap();
    let xml = std::fs::read_to_string(&out).unwrap();

    assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<metadata>\n"));
    assert!(xml.contains("\t\t<variable name=\"MACHINE\">qemux86-64</variable>\n"));
    assert!(xml.contains("\t\t<layer name=\"meta-local\"/>\n"));

    let root = parse_document(&xml).unwrap();
    assert_eq!(root.tag(), "metadata");
    assert_recovered("metadata", &metadata, &root);
}

#[test]
fn nested_mapping_with_escapes_round_trips() {
    let mut meta = MetaMap::new();
    meta.insert("commit", "abc123");
    let mut layers = MetaMap::new();
    layers.insert("meta", meta);
    layers.insert("meta-empty", MetaMap::new());

    let mut config = MetaMap::new();
    config.insert("BB_NUMBER_THREADS", "4");
    config.insert("MACHINE", "qemux86");

    let mut doc = MetaMap::new();
    doc.insert("hostname", "h & co <lab>");
    doc.insert("layers", layers);
    doc.insert("bitbake", MetaMap::new());
    doc.insert("config", config);

    let dir = TempDir::new().unwrap();
    let out = dir.path().join("metadata.xml");
    write_metadata_file(&out, &doc).unwrap();

    let root = parse_document(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_recovered("metadata", &doc, &root);

    let meta = root.child("layers").unwrap().named_child("layer", "meta").unwrap();
    assert_eq!(meta.child("commit").and_then(Node::text), Some("abc123"));
    assert!(root.child("config").unwrap().child("MACHINE").is_none());
}
