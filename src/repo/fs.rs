//! Filesystem helpers for the working directory.

use std::io;

use camino::Utf8Path;
use cap_std::{ambient_authority, fs_utf8::Dir};

/// Mode applied to the working directory and the tracked document.
pub const DEFAULT_MODE: u32 = 0o755;

/// Creates `path` and any missing parents, then applies [`DEFAULT_MODE`] to
/// the leaf directory.
pub(crate) fn create_dir_tree(path: &Utf8Path) -> io::Result<()> {
    Dir::create_ambient_dir_all(path, ambient_authority())?;
    let (parent, name) = split(path)?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    apply_mode(&dir, name)
}

/// Replaces the contents of the file at `path` and applies
/// [`DEFAULT_MODE`].
pub(crate) fn write_document(path: &Utf8Path, contents: &[u8]) -> io::Result<()> {
    let (parent, name) = split(path)?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority())?;
    dir.write(name, contents)?;
    apply_mode(&dir, name)
}

/// Reads the file at `path`.
pub(crate) fn read_document(path: &Utf8Path) -> io::Result<Vec<u8>> {
    let (parent, name) = split(path)?;
    Dir::open_ambient_dir(parent, ambient_authority())?.read(name)
}

fn split(path: &Utf8Path) -> io::Result<(&Utf8Path, &str)> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{path} does not name a file or directory"),
        )
    })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Ok((parent, name))
}

#[cfg(unix)]
fn apply_mode(dir: &Dir, name: &str) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = std::fs::Permissions::from_mode(DEFAULT_MODE);
    dir.set_permissions(name, cap_std::fs::Permissions::from_std(mode))
}

#[cfg(not(unix))]
fn apply_mode(_dir: &Dir, _name: &str) -> io::Result<()> {
    Ok(())
}
