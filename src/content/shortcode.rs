const OPENING_TAG: &str = "{{% hashtag %}}";
const CLOSING_TAG: &str = "{{% /hashtag %}}";

/// Renders the `hashtag` shortcode for `name`. A non-empty label is passed as
/// the shortcode's quoted parameter.
pub fn hashtag_token(name: &str, label: Option<&str>) -> String {
    let opening = match label {
        Some(label) if !label.is_empty() => format!("{{{{% hashtag \"{}\"%}}}}", label),
        _ => OPENING_TAG.to_string(),
    };
    format!("{}#{}{}", opening, name, CLOSING_TAG)
}
