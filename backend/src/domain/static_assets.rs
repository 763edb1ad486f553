//! Static asset URLs for course content.
//!
//! Course HTML refers to bundled assets as `"/static/<path>"`. Those URLs are
//! rewritten to live under the course's data directory on the static asset
//! host, so `"/static/images/x.png"` in course `toy` becomes
//! `"<base>/toy/images/x.png"`.

use super::Course;

/// Prefix that marks a course-relative asset URL inside content.
pub const STATIC_PREFIX: &str = "/static/";

const COURSE_IMAGE: &str = "images/course_image.jpg";

/// Resolver for static asset URLs.
///
/// # Examples
/// ```
/// use courseware::domain::StaticAssets;
///
/// let assets = StaticAssets::new("/static");
/// assert_eq!(assets.url("toy/images/a.png"), "/static/toy/images/a.png");
/// assert_eq!(
///     assets.rewrite_urls(r#"<img src="/static/a.png"/>"#, "toy"),
///     r#"<img src="/static/toy/a.png"/>"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAssets {
    base_url: String,
}

impl Default for StaticAssets {
    fn default() -> Self {
        Self::new(STATIC_PREFIX)
    }
}

impl StaticAssets {
    /// Build a resolver serving assets from `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    /// Base URL, always ending with `/`.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Public URL of an asset path relative to the asset root.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Public URL of the course's catalogue image.
    #[must_use]
    pub fn course_image_url(&self, course: &Course) -> String {
        self.url(&format!("{}/{COURSE_IMAGE}", course.data_dir()))
    }

    /// Rewrite every quoted `/static/...` URL in `text` into an asset URL
    /// scoped to `data_dir`.
    ///
    /// A URL is quoted by `"`, `'`, or a backslash-escaped form of either; the
    /// closing quote must match the opening one and sit on the same line.
    /// Quotes are preserved; unquoted or unterminated occurrences are left as
    /// they are.
    #[must_use]
    pub fn rewrite_urls(&self, text: &str, data_dir: &str) -> String {
        let bytes = text.as_bytes();
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut i = 0;
        while i < bytes.len() {
            let Some(quote) = quote_at(text, i) else {
                i += 1;
                continue;
            };
            let rest_start = i + quote.len() + STATIC_PREFIX.len();
            if !text[i + quote.len()..].starts_with(STATIC_PREFIX) {
                i += 1;
                continue;
            }
            let Some(rest_len) = closing_quote(&text[rest_start..], quote) else {
                i += 1;
                continue;
            };
            let rest = &text[rest_start..rest_start + rest_len];
            out.push_str(&text[copied..i]);
            out.push_str(quote);
            out.push_str(&self.url(&format!("{data_dir}/{rest}")));
            out.push_str(quote);
            i = rest_start + rest_len + quote.len();
            copied = i;
        }
        out.push_str(&text[copied..]);
        out
    }
}

/// Opening quote at byte `i`: `"`, `'`, `\"`, or `\'`.
fn quote_at(text: &str, i: usize) -> Option<&str> {
    let bytes = text.as_bytes();
    match bytes.get(i)? {
        b'"' | b'\'' => Some(&text[i..=i]),
        b'\\' if matches!(bytes.get(i + 1), Some(b'"' | b'\'')) => Some(&text[i..i + 2]),
        _ => None,
    }
}

/// Length of `rest` up to the first `quote`, if it closes before a newline.
fn closing_quote(rest: &str, quote: &str) -> Option<usize> {
    let end = rest.find(quote)?;
    if rest[..end].contains('\n') {
        return None;
    }
    Some(end)
}
