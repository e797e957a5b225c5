//! Text format of a `.fwknoprc` file.
//!
//! ```text
//! # comment
//! [default]
//! SPA_SERVER              192.0.2.10
//! KEY_BASE64 = wDpbyn1b7TzV4M6oH1sUiQ==
//! HTTP_USER_AGENT         " padded agent "
//!
//! [office]
//! SPA_SERVER              198.51.100.7
//! ```
//!
//! A setting is `NAME VALUE` or `NAME = VALUE`. Settings outside any stanza or
//! inside `[default]` make up the configuration; unknown names are ignored and
//! a repeated name keeps its last value. Other stanzas belong to other servers
//! and are carried through as raw text.
//!
//! A value wrapped in double quotes is unquoted on read, with `\\`, `\n` and
//! `\r` escapes. The writer quotes only values that would not read back
//! unchanged otherwise.

use crate::config::ConfigMap;
use crate::registry::SettingKey;

pub const DEFAULT_STANZA: &str = "default";
const HEADER: &str = "# fwknop client configuration, written by fwknop-rc";
const NAME_WIDTH: usize = 23;

/// A parsed rc file: the `[default]` settings plus every other stanza verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RcDocument {
    pub config: ConfigMap,
    /// Lines of the non-default stanzas, headers included, in file order.
    pub other_stanzas: String,
}

pub fn parse(text: &str) -> ConfigMap {
    parse_document(text).config
}

pub fn parse_document(text: &str) -> RcDocument {
    let mut document = RcDocument::default();
    let mut in_default = true;

    for (index, line) in text.lines().enumerate() {
        let trimmed = line.trim();

        if let Some(name) = stanza_name(trimmed) {
            in_default = name.eq_ignore_ascii_case(DEFAULT_STANZA);
            if !in_default {
                tracing::debug!(stanza = name, line = index + 1, "keeping stanza as written");
            }
        }
        if !in_default {
            document.other_stanzas.push_str(line);
            document.other_stanzas.push('\n');
            continue;
        }
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('[') {
            continue;
        }

        let Some((name, raw)) = split_setting(trimmed) else {
            tracing::debug!(line = index + 1, "ignoring malformed line");
            continue;
        };
        match name.parse::<SettingKey>() {
            Ok(key) => {
                document.config.insert(key, unquote(raw));
            }
            Err(_) => tracing::debug!(name, line = index + 1, "ignoring unknown setting"),
        }
    }

    document
}

fn stanza_name(line: &str) -> Option<&str> {
    line.strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .map(str::trim)
}

/// Splits on the first whitespace or `=`; one `=` separator is optional.
fn split_setting(line: &str) -> Option<(&str, &str)> {
    let end = line
        .find(|c: char| c.is_whitespace() || c == '=')
        .unwrap_or(line.len());
    let name = &line[..end];
    if name.is_empty() {
        return None;
    }
    let mut value = line[end..].trim_start();
    if let Some(rest) = value.strip_prefix('=') {
        value = rest.trim_start();
    }
    Some((name, value))
}

fn unquote(raw: &str) -> String {
    let Some(inner) = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return raw.to_string();
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Values that a bare write would not read back as-is: surrounding
/// whitespace is trimmed, a leading `=` is taken for the separator, a leading
/// quote starts a quoted value and a line break ends the line.
fn needs_quotes(value: &str) -> bool {
    value.trim() != value
        || value.starts_with(['=', '"'])
        || value.contains(['\n', '\r'])
}

fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Renders `config` in registry order under a `[default]` stanza, followed by
/// `other_stanzas` unchanged.
pub fn serialize(config: &ConfigMap, other_stanzas: &str) -> String {
    let mut out = String::new();
    out.push_str(HEADER);
    out.push('\n');
    out.push_str(&format!("[{}]\n", DEFAULT_STANZA));

    for (key, value) in config.iter() {
        let value = if needs_quotes(value) {
            quote(value)
        } else {
            value.to_string()
        };
        out.push_str(&format!("{:<width$} {}\n", key.as_str(), value, width = NAME_WIDTH));
    }

    if !other_stanzas.is_empty() {
        out.push('\n');
        out.push_str(other_stanzas);
        if !other_stanzas.ends_with('\n') {
            out.push('\n');
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::{parse, parse_document, serialize};
    use crate::config::ConfigMap;
    use crate::registry::SettingKey;

    #[test]
    fn reads_both_separators() {
        let config = parse("KEY = abc123\nSPA_SERVER 192.0.2.10\nUSE_HMAC=Y\nFOO = bar\n");
        assert_eq!(config.get(SettingKey::Key), Some("abc123"));
        assert_eq!(config.get(SettingKey::SpaServer), Some("192.0.2.10"));
        assert_eq!(config.get(SettingKey::UseHmac), Some("Y"));
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn reads_default_settings_and_keeps_other_stanzas() {
        let text = "\
# leading comment
ACCESS tcp/22

[default]
SPA_SERVER 192.0.2.1
  # indented comment
[other-host]
SPA_SERVER 198.51.100.7
# office key
KEY other
[DEFAULT]
FW_TIMEOUT 30
";
        let document = parse_document(text);
        let config = &document.config;
        assert_eq!(config.get(SettingKey::Access), Some("tcp/22"));
        assert_eq!(config.get(SettingKey::SpaServer), Some("192.0.2.1"));
        assert_eq!(config.get(SettingKey::FwTimeout), Some("30"));
        assert!(!config.contains(SettingKey::Key));
        assert_eq!(
            document.other_stanzas,
            "[other-host]\nSPA_SERVER 198.51.100.7\n# office key\nKEY other\n"
        );
    }

    #[test]
    fn last_duplicate_wins_and_placeholders_drop() {
        let config = parse("KEY first\nKEY second\nALLOW_IP <enter IP>\nHMAC_KEY\n");
        assert_eq!(config.get(SettingKey::Key), Some("second"));
        assert!(!config.contains(SettingKey::AllowIp));
        assert!(!config.contains(SettingKey::HmacKey));
    }

    #[test]
    fn bare_values_keep_inner_spaces() {
        let config = parse("HTTP_USER_AGENT   Mozilla/5.0 (X11; Linux)  \r\n");
        assert_eq!(config.get(SettingKey::HttpUserAgent), Some("Mozilla/5.0 (X11; Linux)"));
    }

    #[test]
    fn quoted_values_are_unescaped() {
        let config = parse("SPOOF_USER \" <x>\"\nHTTP_USER_AGENT = \"a\\nb\\\\c\\t\"\n");
        assert_eq!(config.get(SettingKey::SpoofUser), Some(" <x>"));
        assert_eq!(config.get(SettingKey::HttpUserAgent), Some("a\nb\\c\\t"));
    }

    #[test]
    fn writes_header_and_stanza() {
        let mut config = ConfigMap::new();
        config.insert(SettingKey::SpaServer, "192.0.2.10");
        config.insert(SettingKey::Access, "tcp/22");
        let text = serialize(&config, "");
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with('#'));
        assert_eq!(lines[1], "[default]");
        assert!(lines[2].starts_with("ACCESS ") && lines[2].ends_with(" tcp/22"));
        assert!(lines[3].starts_with("SPA_SERVER "));
    }

    #[test]
    fn awkward_values_survive_round_trip() {
        let mut config = ConfigMap::new();
        config.insert(SettingKey::GpgSigningPw, "=x= y");
        config.insert(SettingKey::SpoofUser, " <x>");
        config.insert(SettingKey::HttpUserAgent, " agent ");
        config.insert(SettingKey::GpgHomedir, " ");
        config.insert(SettingKey::Key, "\"quoted\"");
        config.insert(SettingKey::HmacKey, "two\r\nlines\\n");
        config.insert(SettingKey::SpoofSourceIp, "\t10.0.0.1");
        assert_eq!(parse(&serialize(&config, "")), config);
    }

    #[test]
    fn plain_values_are_written_bare() {
        let mut config = ConfigMap::new();
        config.insert(SettingKey::HttpUserAgent, "Mozilla/5.0 (X11)");
        let text = serialize(&config, "");
        assert!(text.contains(" Mozilla/5.0 (X11)\n"));
        assert!(!text.contains('"'));
    }

    #[test]
    fn other_stanzas_follow_default_unchanged() {
        let mut config = ConfigMap::new();
        config.insert(SettingKey::SpaServer, "192.0.2.1");
        let other = "[office]\nSPA_SERVER 198.51.100.7\nKEY officekey\n";

        let text = serialize(&config, other);
        assert!(text.ends_with(other));

        let document = parse_document(&text);
        assert_eq!(document.config, config);
        assert_eq!(document.other_stanzas, other);
        assert_eq!(serialize(&document.config, &document.other_stanzas), text);
    }
}
