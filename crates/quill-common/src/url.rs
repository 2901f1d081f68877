//! Resolution of document-relative references (`src`, `href`, `background`).
//!
//! Documents are loaded from the filesystem or from a base supplied by
//! `<base href>`. Resolution is purely textual: nothing is fetched and no
//! path is canonicalized against the real filesystem.

/// Whether `href` carries a scheme (`http:`, `file:`, `data:`, ...).
#[must_use]
pub fn has_scheme(href: &str) -> bool {
    href.split_once(':').is_some_and(|(scheme, _)| {
        scheme.len() > 1
            && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
            && scheme
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'+' | b'-' | b'.'))
    })
}

/// Split a path into `(directory, file name)`.
///
/// The directory keeps no trailing slash; a bare file name has an empty
/// directory.
#[must_use]
pub fn split_filename(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(0) => ("/", &path[1..]),
        Some(slash) => (&path[..slash], &path[slash + 1..]),
        None => ("", path),
    }
}

/// Resolve a potentially relative reference against a base directory.
///
/// Absolute references (with a scheme or a leading `/`) and fragment-only
/// references are returned unchanged. `.` and `..` segments of the relative
/// part are folded into the base.
#[must_use]
pub fn resolve_url(href: &str, base_dir: Option<&str>) -> String {
    if has_scheme(href) || href.starts_with('/') || href.starts_with('#') {
        return href.to_string();
    }
    let Some(base) = base_dir.filter(|base| !base.is_empty()) else {
        return href.to_string();
    };

    let (prefix, base_path) = split_origin(base);
    let mut segments: Vec<&str> = base_path.split('/').filter(|s| !s.is_empty()).collect();
    for segment in href.split('/') {
        match segment {
            "." | "" => {}
            ".." => {
                let _ = segments.pop();
            }
            _ => segments.push(segment),
        }
    }
    if href.ends_with('/') {
        segments.push("");
    }

    let rooted = base_path.starts_with('/');
    let joined = segments.join("/");
    match (prefix.is_empty(), rooted) {
        (true, true) => format!("/{joined}"),
        (true, false) => joined,
        (false, _) => format!("{prefix}/{joined}"),
    }
}

/// Split `scheme://host` from the path part of a base.
fn split_origin(base: &str) -> (&str, &str) {
    base.find("://").map_or(("", base), |scheme_end| {
        let after = scheme_end + 3;
        base[after..]
            .find('/')
            .map_or((base, ""), |slash| base.split_at(after + slash))
    })
}
