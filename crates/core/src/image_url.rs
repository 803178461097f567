//! Public URL derivation for stored character images.
//!
//! Images are stored on disk and served read-only under [`STATIC_PREFIX`].
//! The URL is rebuilt on every response from the request's own scheme and
//! host so the same row works behind any hostname.

/// URL prefix under which the upload directory is served.
pub const STATIC_PREFIX: &str = "/static";

/// Build `{scheme}://{host}` from request information.
///
/// `scheme` defaults to `http` when the request carried no forwarding hint.
pub fn base_url(scheme: Option<&str>, host: &str) -> String {
    format!("{}://{}", scheme.unwrap_or("http"), host)
}

/// Final path component of a stored file path, accepting either separator.
pub fn file_basename(file_path: &str) -> &str {
    file_path
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_path)
}

/// Public URL for a stored image, or `None` when there is no image.
///
/// ```
/// use persona_core::image_url::image_url;
///
/// assert_eq!(
///     image_url("http://api.local:8000", Some("uploads/characters/a.png")).as_deref(),
///     Some("http://api.local:8000/static/a.png"),
/// );
/// assert_eq!(image_url("http://api.local:8000", None), None);
/// ```
pub fn image_url(base_url: &str, file_path: Option<&str>) -> Option<String> {
    let path = file_path.filter(|p| !p.is_empty())?;
    Some(format!("{base_url}{STATIC_PREFIX}/{}", file_basename(path)))
}
