use std::path::{Component, Path, PathBuf};
use url::Url;

/// File name an item is stored under: the item name with its extension
/// replaced by `extension`.
pub fn archive_file_name(name: &str, extension: &str) -> PathBuf {
    Path::new(name).with_extension(extension.trim_start_matches('.'))
}

/// Rejects names that would escape the destination directory.
pub fn validate_item_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("name is empty");
    }
    let mut has_file_name = false;
    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) => has_file_name = true,
            Component::CurDir => {}
            Component::ParentDir => return Err("name contains a parent directory reference"),
            Component::RootDir | Component::Prefix(_) => return Err("name is an absolute path"),
        }
    }
    if !has_file_name {
        return Err("name does not name a file");
    }
    Ok(())
}

/// Appends `relative` to `base` one percent-encoded path segment at a time.
///
/// `base` is treated as a directory whether or not it ends with a slash.
pub fn join_url_path(base: &Url, relative: &Path) -> Option<Url> {
    let mut url = base.clone();
    {
        let mut segments = url.path_segments_mut().ok()?;
        segments.pop_if_empty();
        for component in relative.components() {
            if let Component::Normal(part) = component {
                segments.push(part.to_str()?);
            }
        }
    }
    Some(url)
}
