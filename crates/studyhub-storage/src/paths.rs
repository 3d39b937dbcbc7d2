//! Blob path and public URL conventions.

/// Collapse repeated slashes and strip leading and trailing ones.
///
/// `"global//folders///1/a.pdf"` becomes `"global/folders/1/a.pdf"`.
pub fn clean_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Public URL of an object: `<base>/<path>`.
pub fn public_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), clean_path(path))
}

/// Recover the object path from a public URL produced by [`public_url`].
pub fn path_from_url(base: &str, url: &str) -> Option<String> {
    let base = base.trim_end_matches('/');
    url.strip_prefix(base)
        .filter(|rest| rest.starts_with('/'))
        .map(clean_path)
        .filter(|p| !p.is_empty())
}
