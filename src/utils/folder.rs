use crate::prelude::*;

/// Fetches `name` from `folder` and reads it as a String entry.
///
/// Misses are logged, except for the `optional` flag which is routinely
/// absent from shape configurations.
pub fn get_child_string(folder: &dyn Folder, name: &str) -> Option<String> {
    let Some(entry) = folder.fetch(name) else {
        if name != "optional" {
            debug!("missed lookup for {} in {}", name, folder.name());
        }
        return None;
    };
    match entry.into_string() {
        Some(string) => Some(string.get()),
        None => {
            debug!("wanted a String for {} in {}", name, folder.name());
            None
        }
    }
}

/// Fetches `name` from `folder` and narrows it to a Folder.
pub fn get_child_folder(folder: &dyn Folder, name: &str) -> Option<Arc<dyn Folder>> {
    folder.fetch(name)?.into_folder()
}

/// Splits a path into its parent directory and final segment.
///
/// `/a/b` gives `("/a", "b")`, `/a` gives `("/", "a")` and a bare `a` gives
/// `(".", "a")`.
pub fn split_path(path: &str) -> (&str, &str) {
    match path.rsplit_once('/') {
        Some(("", base)) => ("/", base),
        Some((dir, base)) => (dir, base),
        None => (".", path),
    }
}
