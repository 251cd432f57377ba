use crate::error::OutputError;
use std::fs;
use std::path::{Path, PathBuf};

/// Writes `text` to `dir/file`, creating `dir` if needed. Returns the written path.
pub fn write_script(dir: &Path, file: &str, text: &str) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir).map_err(|source| OutputError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(file);
    let mut content = text.trim().to_string();
    content.push('\n');
    fs::write(&path, content).map_err(|source| OutputError::WriteScript {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

/// Replaces `to` with a recursive copy of `from`.
pub fn copy_assets(from: &Path, to: &Path) -> Result<(), OutputError> {
    let wrap = |source| OutputError::CopyAssets {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    };

    if !from.is_dir() {
        return Err(wrap(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "asset directory does not exist",
        )));
    }
    if to.exists() {
        fs::remove_dir_all(to).map_err(wrap)?;
    }
    copy_tree(from, to).map_err(wrap)
}

fn copy_tree(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_tree(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_trimmed_script_with_trailing_newline() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested/script");
        let path = write_script(&out, "index.js", "\n\nexport default function () {\n}\n\n").unwrap();
        assert_eq!(
            fs::read_to_string(path).unwrap(),
            "export default function () {\n}\n"
        );
    }

    #[test]
    fn copies_nested_tree_and_replaces_destination() {
        let src = tempfile::tempdir().unwrap();
        fs::create_dir_all(src.path().join("lib")).unwrap();
        fs::write(src.path().join("post_script.ts"), "a").unwrap();
        fs::write(src.path().join("lib/util.ts"), "b").unwrap();

        let dst = tempfile::tempdir().unwrap();
        let target = dst.path().join("assets");
        fs::create_dir_all(&target).unwrap();
        fs::write(target.join("stale.txt"), "old").unwrap();

        copy_assets(src.path(), &target).unwrap();
        assert_eq!(fs::read_to_string(target.join("lib/util.ts")).unwrap(), "b");
        assert!(!target.join("stale.txt").exists());
    }

    #[test]
    fn missing_source_is_an_error() {
        let dst = tempfile::tempdir().unwrap();
        let err = copy_assets(&dst.path().join("nope"), &dst.path().join("out")).unwrap_err();
        assert!(matches!(err, OutputError::CopyAssets { .. }));
    }
}
