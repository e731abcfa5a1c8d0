//! Filesystem + gitignore integration tests.

use repopack_adapters::{GitignoreCompiler, LocalFileSystem};
use repopack_ports::{
    FileSystemEntryKind, FileSystemPort, FileSystemPortExt, IgnoreCompilerPort, IgnorePatterns,
    SafeRelativePath,
};
use repopack_shared::Result;
use std::fs;
use std::path::Path;

fn write(root: &Path, relative: &str, contents: &str) -> Result<()> {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[test]
fn walk_fixture_with_gitignore_patterns() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let root = dir.path();
    write(root, "README.md", "# demo")?;
    write(root, "src/lib.rs", "pub fn lib() {}")?;
    write(root, "src/main.rs", "fn main() {}")?;
    write(root, "src/debug.log", "noise")?;
    write(root, "node_modules/pkg/index.js", "module.exports = 1;")?;
    write(root, "target/release/app", "bin")?;

    let patterns: IgnorePatterns = ["node_modules", "target/", "*.log"].into_iter().collect();
    let compiled = GitignoreCompiler::new().compile(&patterns);
    assert!(compiled.rejected.is_empty());

    let fs = LocalFileSystem::default();
    let session = fs.session(root.to_path_buf());
    let mut pending = vec![SafeRelativePath::root()];
    let mut files = Vec::new();
    while let Some(dir) = pending.pop() {
        for entry in session.read_dir(&dir)? {
            let child = dir.join(&entry.name)?;
            let is_dir = entry.kind == FileSystemEntryKind::Directory;
            if !compiled.predicate.is_entry_included(child.as_str(), is_dir) {
                continue;
            }
            match entry.kind {
                FileSystemEntryKind::Directory => pending.push(child),
                FileSystemEntryKind::File => files.push(child.as_str().to_owned()),
                FileSystemEntryKind::Other => {},
            }
        }
    }

    files.sort();
    assert_eq!(files, vec!["README.md", "src/lib.rs", "src/main.rs"]);
    Ok(())
}

#[test]
fn read_dir_returns_sorted_entries() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "src/main.rs", "fn main() {}")?;
    write(dir.path(), "src/lib.rs", "pub fn lib() {}")?;
    fs::create_dir_all(dir.path().join("src/bin"))?;

    let entries = LocalFileSystem::default().read_dir(dir.path(), &SafeRelativePath::new("src")?)?;
    let names: Vec<(&str, FileSystemEntryKind)> = entries
        .iter()
        .map(|entry| (entry.name.as_ref(), entry.kind))
        .collect();
    assert_eq!(
        names,
        vec![
            ("bin", FileSystemEntryKind::Directory),
            ("lib.rs", FileSystemEntryKind::File),
            ("main.rs", FileSystemEntryKind::File),
        ]
    );
    Ok(())
}

#[test]
fn text_and_byte_reads_agree_on_utf8_files() -> Result<()> {
    let dir = tempfile::tempdir()?;
    write(dir.path(), "notes.txt", "hello\nworld\n")?;

    let fs = LocalFileSystem::default();
    let file = SafeRelativePath::new("notes.txt")?;
    let text = fs.read_file_text(dir.path(), &file)?;
    let bytes = fs.read_file_bytes(dir.path(), &file)?;
    assert_eq!(text.as_bytes(), bytes.as_slice());
    Ok(())
}
