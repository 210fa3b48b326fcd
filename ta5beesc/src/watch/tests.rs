use std::fs;

use super::WatchTarget;

#[test]
fn test_directory_snapshot_keeps_sources_only() {
    let dir = std::env::temp_dir().join(format!("ta5beesc-watch-{}", std::process::id()));
    let nested = dir.join("nested");
    fs::create_dir_all(&nested).unwrap();

    fs::write(dir.join("main.ta5bees"), "gool(1);").unwrap();
    fs::write(nested.join("lib.ta5bees"), "gool(2);").unwrap();
    fs::write(dir.join("main.js"), "console.log(1);").unwrap();

    let snapshot = WatchTarget::Directory(dir.clone()).snapshot();

    fs::remove_dir_all(&dir).unwrap();

    assert_eq!(snapshot.len(), 2);
    assert!(snapshot.contains_key(&dir.join("main.ta5bees")));
    assert!(snapshot.contains_key(&nested.join("lib.ta5bees")));
}

#[test]
fn test_missing_file_snapshot_is_empty() {
    let target = WatchTarget::File(std::env::temp_dir().join("ta5beesc-no-such-file.ta5bees"));

    assert!(target.snapshot().is_empty());
}

#[test]
fn test_directory_display() {
    let target = WatchTarget::Directory("src".into());

    assert_eq!(target.to_string(), "src/**/*.ta5bees");
}
