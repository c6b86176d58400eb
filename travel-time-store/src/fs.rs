//! Filesystem helpers built on `cap-std` and `camino`.

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8};
use std::io;

/// Open the store file for reading using ambient authority.
pub(crate) fn open_utf8_file(path: &Utf8Path) -> io::Result<fs_utf8::File> {
    fs_utf8::File::open_ambient(path, ambient_authority())
}

/// Open the directory holding the store file, creating it when missing, and
/// return it with the file name.
///
/// A bare file name resolves against the working directory.
pub(crate) fn store_dir(path: &Utf8Path) -> io::Result<(fs_utf8::Dir, String)> {
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::other(format!("store path {path} has no file name")))?
        .to_owned();
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    fs_utf8::Dir::create_ambient_dir_all(parent, ambient_authority())?;
    let dir = fs_utf8::Dir::open_ambient_dir(parent, ambient_authority())?;
    Ok((dir, file_name))
}

/// Write `contents` next to `path` and rename it into place.
///
/// Readers see either the old file or the new one, never a partial write.
pub(crate) fn replace_file(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let (dir, name) = store_dir(path)?;
    let staging = format!(".{name}.tmp");
    dir.write(&staging, contents)?;
    dir.rename(&staging, &dir, &name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    #[fixture]
    fn temp_dir() -> TempDir {
        TempDir::new().expect("create temp dir")
    }

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 temp path")
    }

    #[rstest]
    fn store_dir_creates_missing_parents(temp_dir: TempDir) {
        let path = utf8(&temp_dir).join("state/travel_time/entries.json");
        let (_, name) = store_dir(&path).expect("open store dir");

        assert_eq!(name, "entries.json");
        assert!(path.parent().expect("parent").is_dir());
    }

    #[rstest]
    fn replace_file_overwrites_and_leaves_no_staging_file(temp_dir: TempDir) {
        let root = utf8(&temp_dir);
        let path = root.join("store.json");
        replace_file(&path, b"first").expect("first write");
        replace_file(&path, b"second").expect("second write");

        assert_eq!(std::fs::read(&path).expect("read back"), b"second");
        let names: Vec<_> = std::fs::read_dir(&root)
            .expect("list dir")
            .map(|entry| entry.expect("dir entry").file_name())
            .collect();
        assert_eq!(names, vec!["store.json"]);
    }

    #[rstest]
    fn store_paths_need_a_file_name() {
        let err = store_dir(Utf8Path::new("/")).expect_err("root has no file name");
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }
}
