//! Gate deciding whether a raw value is meaningful enough to be stored.
//! Type-specific checks (is this really an address, a port) belong to the
//! forms that edit settings; here we only keep out unset values.

/// Decides whether a raw value may enter a [`crate::config::ConfigMap`].
pub trait ValueValidator {
    fn is_acceptable(&self, value: Option<&str>) -> bool;
}

/// Rejects missing values, empty strings and `<...>` placeholders such as
/// `<enter IP>` left behind by unfilled form fields.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderValidator;

impl ValueValidator for PlaceholderValidator {
    fn is_acceptable(&self, value: Option<&str>) -> bool {
        match value {
            None => false,
            Some(text) if text.is_empty() => false,
            Some(text) => !is_placeholder(text),
        }
    }
}

const LINE_TERMINATORS: [char; 5] = ['\n', '\r', '\u{85}', '\u{2028}', '\u{2029}'];

/// Whole-string match of `<.*>` on a single line. As with an anchored regex,
/// one final line terminator after the `>` still counts as a match.
fn is_placeholder(text: &str) -> bool {
    let line = text
        .strip_suffix("\r\n")
        .or_else(|| text.strip_suffix(LINE_TERMINATORS))
        .unwrap_or(text);
    line.len() >= 2
        && line.starts_with('<')
        && line.ends_with('>')
        && !line.contains(LINE_TERMINATORS)
}

pub fn is_acceptable(value: Option<&str>) -> bool {
    PlaceholderValidator.is_acceptable(value)
}
