//! Markup for a chosen icon.

use std::borrow::Cow;

use bon::Builder;

/// Escape a value for use inside a double- or single-quoted HTML attribute
pub fn escape_attr(value: &str) -> Cow<'_, str> {
    if !value.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(value);
    }
    let mut out = String::with_capacity(value.len() + 8);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Render an empty icon element.
///
/// `class_names` must already be space-joined and escaped; `color` is
/// escaped here and emitted as an inline style.
///
/// ```
/// use fonticon::render_tag;
///
/// assert_eq!(render_tag("i", "fa fa-star", None), r#"<i class="fa fa-star"></i>"#);
/// assert_eq!(
///     render_tag("i", "fa fa-star", Some("#f00")),
///     r#"<i class="fa fa-star" style="color: #f00;"></i>"#
/// );
/// ```
pub fn render_tag(tag_name: &str, class_names: &str, color: Option<&str>) -> String {
    match color.filter(|c| !c.trim().is_empty()) {
        Some(color) => format!(
            r#"<{tag_name} class="{class_names}" style="color: {};"></{tag_name}>"#,
            escape_attr(color.trim())
        ),
        None => format!(r#"<{tag_name} class="{class_names}"></{tag_name}>"#),
    }
}

/// Presentation flags applied when rendering a record's icon
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Builder)]
pub struct IconStyle {
    /// Add the `list-item` class
    #[builder(default)]
    pub list_item: bool,
    /// Add the `fixed-width` class
    #[builder(default)]
    pub fixed_width: bool,
}
