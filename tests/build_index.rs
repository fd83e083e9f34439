//! Build Integration Tests
//!
//! Tests for identifier stability, metadata extraction, tag deduplication
//! and ordering over real directory trees.

use std::path::Path;

use content_indexer::index::{write_outputs, BuildOptions, IndexBuilder, OutputOptions};
use content_indexer::{Catalog, ContentItem, IdMap, IndexError};
use filetime::{set_file_mtime, FileTime};
use tempfile::TempDir;

const BASE_URL: &str = "https://raw.example.com/content/";

/// Write a file under `root`, creating parent directories, with a fixed mtime
fn write_file(root: &Path, rel: &str, content: &str, mtime: i64) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, content).unwrap();
    set_file_mtime(&path, FileTime::from_unix_time(mtime, 0)).unwrap();
}

fn builder(root: &Path) -> IndexBuilder {
    IndexBuilder::new(BuildOptions {
        root: root.to_path_buf(),
        base_url: BASE_URL.to_string(),
        exclude: Vec::new(),
    })
    .unwrap()
}

fn find<'a>(items: &'a [ContentItem], path: &str) -> &'a ContentItem {
    items
        .iter()
        .find(|i| i.path == path)
        .unwrap_or_else(|| panic!("no item for {}", path))
}

#[test]
fn test_prior_id_is_kept() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    write_file(&root, "a.txt", "title: A", 1_000);
    write_file(&root, "b.txt", "title: B", 2_000);
    write_file(&root, "c.txt", "title: C", 3_000);

    let prior = temp.path().join("index.json");
    let entry = r#"{"id": 5, "title": "old", "path": "a.txt", "githubPath": "x"}"#;
    std::fs::write(&prior, format!("[{}]", entry)).unwrap();

    let index = builder(&root).build_from(&prior).unwrap();

    assert_eq!(find(&index.items, "a.txt").id, 5);
    // New paths are minted above the previous maximum, in walk order
    assert_eq!(find(&index.items, "b.txt").id, 6);
    assert_eq!(find(&index.items, "c.txt").id, 7);
}

#[test]
fn test_removed_paths_do_not_free_ids() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    write_file(&root, "a.txt", "", 1_000);
    write_file(&root, "new.txt", "", 1_000);

    let ids = IdMap::from_pairs([("a.txt", 5), ("gone.txt", 9)]);
    let index = builder(&root).build(ids).unwrap();

    assert_eq!(index.items.len(), 2);
    assert_eq!(find(&index.items, "a.txt").id, 5);
    assert_eq!(find(&index.items, "new.txt").id, 10);
}

#[test]
fn test_corrupt_prior_index_starts_fresh() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    write_file(&root, "a.txt", "", 1_000);
    write_file(&root, "b.txt", "", 1_000);

    let prior = temp.path().join("index.json");
    std::fs::write(&prior, "not json at all").unwrap();

    let index = builder(&root).build_from(&prior).unwrap();

    assert_eq!(find(&index.items, "a.txt").id, 1);
    assert_eq!(find(&index.items, "b.txt").id, 2);
}

#[test]
fn test_metadata_and_remote_path() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    write_file(
        &root,
        "posts/2024/hello.md",
        "title: Hello\ndescription: World\ntags: [\"a\", \"b\", \"c\"]\n\n# Hello\n\nBody text.\n",
        1_700_000_000,
    );

    let index = builder(&root).build(IdMap::new()).unwrap();
    let item = find(&index.items, "posts/2024/hello.md");

    assert_eq!(item.title, "Hello");
    assert_eq!(item.description, "World");
    assert_eq!(item.description_image, "");
    assert_eq!(item.tags, vec!["a", "b", "c"]);
    assert_eq!(item.remote_path, format!("{}posts/2024/hello.md", BASE_URL));
    assert_eq!(item.created_at.timestamp(), 1_700_000_000);
}

#[test]
fn test_tag_registry_dedup_across_files() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    write_file(&root, "1.md", "tags: [\"x\", \"y\"]", 1_000);
    write_file(&root, "2.md", "tags: [\"y\", \"z\"]", 2_000);
    write_file(&root, "3.md", "tags: []", 3_000);

    let index = builder(&root).build(IdMap::new()).unwrap();

    assert_eq!(index.tags.as_slice(), ["x", "y", "z"]);
    assert_eq!(find(&index.items, "3.md").tags, vec![""]);
}

#[test]
fn test_items_sorted_newest_first() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    write_file(&root, "t1.md", "", 1_000);
    write_file(&root, "t3.md", "", 3_000);
    write_file(&root, "t2.md", "", 2_000);

    let index = builder(&root).build(IdMap::new()).unwrap();
    let paths: Vec<&str> = index.items.iter().map(|i| i.path.as_str()).collect();

    assert_eq!(paths, vec!["t3.md", "t2.md", "t1.md"]);
}

#[test]
fn test_excluded_files_get_no_id() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    write_file(&root, "a.md", "", 1_000);
    write_file(&root, "drafts/wip.md", "tags: [secret]", 1_000);
    write_file(&root, "z.md", "", 1_000);

    let builder = IndexBuilder::new(BuildOptions {
        root: root.clone(),
        base_url: BASE_URL.to_string(),
        exclude: vec!["drafts/*".to_string()],
    })
    .unwrap();
    let index = builder.build(IdMap::new()).unwrap();

    assert_eq!(index.items.len(), 2);
    assert_eq!(find(&index.items, "a.md").id, 1);
    assert_eq!(find(&index.items, "z.md").id, 2);
    assert!(index.tags.is_empty());
}

#[test]
fn test_fresh_builds_are_identical() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    write_file(&root, "a.md", "title: A\ntags: [one]", 1_000);
    write_file(&root, "b/b.md", "title: B\ntags: [two, one]", 2_000);
    write_file(&root, "c.md", "title: C", 3_000);

    let first = builder(&root).build(IdMap::new()).unwrap();
    let second = builder(&root).build(IdMap::new()).unwrap();

    assert_eq!(first.items, second.items);
    assert_eq!(first.tags, second.tags);
}

#[test]
fn test_rebuild_from_written_index_keeps_ids() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    write_file(&root, "m.md", "title: M", 1_000);
    write_file(&root, "n.md", "title: N", 2_000);

    let options = OutputOptions {
        index_path: temp.path().join("index.json"),
        tag_index_path: Some(temp.path().join("tag_index.json")),
        pretty: false,
    };

    let first = builder(&root).build_from(&options.index_path).unwrap();
    write_outputs(&first, &options).unwrap();

    // A new file that sorts before the existing ones must not shift their ids
    write_file(&root, "a.md", "title: A", 3_000);
    let second = builder(&root).build_from(&options.index_path).unwrap();

    assert_eq!(find(&second.items, "m.md").id, find(&first.items, "m.md").id);
    assert_eq!(find(&second.items, "n.md").id, find(&first.items, "n.md").id);
    assert_eq!(find(&second.items, "a.md").id, 3);

    write_outputs(&second, &options).unwrap();
    let catalog = Catalog::load(&options.index_path).unwrap();
    assert_eq!(catalog.items[0].path, "a.md");
    assert_eq!(catalog.len(), 3);
}

#[test]
fn test_prior_id_at_i64_max_fails_instead_of_wrapping() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    write_file(&root, "a.md", "title: A", 1_000);
    write_file(&root, "b.md", "title: B", 2_000);

    let prior = temp.path().join("index.json");
    let entry = format!(r#"{{"id": {}, "path": "a.md"}}"#, i64::MAX);
    std::fs::write(&prior, format!("[{}]", entry)).unwrap();

    let result = builder(&root).build_from(&prior);

    assert!(matches!(result, Err(IndexError::IdOverflow(_))));
}

#[cfg(unix)]
#[test]
fn test_dangling_symlink_aborts_build() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("content");
    write_file(&root, "a.md", "title: A", 1_000);
    std::os::unix::fs::symlink(root.join("missing.md"), root.join("b.md")).unwrap();

    let result = builder(&root).build(IdMap::new());

    match result {
        Err(IndexError::Read { path, .. }) => assert_eq!(path, root.join("b.md")),
        other => panic!("expected read error, got {:?}", other),
    }
}
