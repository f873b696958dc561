/// Whether `path` is a relative path prefix such as `./`, `../` or `.`.
pub fn is_relative(path: &str) -> bool {
    path.is_empty() || path.starts_with('.')
}

/// Whether `link` leaves the site: it has a scheme (`https://…`, `mailto:…`) or is
/// protocol-relative (`//host/…`).
pub fn is_external(link: &str) -> bool {
    if link.starts_with("//") {
        return true;
    }
    match link.find(':') {
        Some(idx) if idx > 0 => link[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.')),
        _ => false,
    }
}

/// Whether `link` is written out explicitly, and should be kept as is rather than restyled.
fn is_explicit(link: &str) -> bool {
    link.starts_with("./")
        || link.starts_with("../")
        || link.starts_with('/')
        || link.starts_with('#')
        || link == "."
        || is_external(link)
}

/// Write a site-relative link (e.g. `guide/intro`, or empty for the site root) in the link style
/// `base_path` implies: `./…` under a relative base path, `/…` otherwise. Explicit links are
/// returned unchanged.
pub fn styled_link(base_path: Option<&str>, link: &str) -> String {
    if is_explicit(link) {
        return link.to_owned();
    }

    let prefix = if base_path.is_some_and(is_relative) { "./" } else { "/" };
    let mut builder = String::with_capacity(prefix.len() + link.len());
    builder.push_str(prefix);
    builder.push_str(link);
    builder
}

/// Split a link into its path and the query and/or fragment suffix (including the leading `?`
/// or `#`).
pub fn split_suffix(link: &str) -> (&str, &str) {
    match link.find(['?', '#']) {
        Some(idx) => link.split_at(idx),
        None => (link, ""),
    }
}

/// Whether the last segment of a link path has a file extension.
pub fn has_extension(path: &str) -> bool {
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rfind('.') {
        Some(idx) => idx > 0 && idx + 1 < segment.len(),
        None => false,
    }
}
