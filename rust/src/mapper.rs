//! Turns whatever the editing surface holds into a [`ConfigMap`], and projects
//! a map onto server-side names for `access.conf` generation.

use std::borrow::Cow;
use std::collections::BTreeMap;

use crate::config::ConfigMap;
use crate::registry::{RemoteKey, SettingKey};
use crate::validator::{PlaceholderValidator, ValueValidator};

/// A live editable field. `None` means the field has no text at all.
pub trait ViewValue {
    fn text(&self) -> Option<Cow<'_, str>>;
}

impl ViewValue for str {
    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self))
    }
}

impl ViewValue for String {
    fn text(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed(self.as_str()))
    }
}

impl<T: ViewValue + ?Sized> ViewValue for &T {
    fn text(&self) -> Option<Cow<'_, str>> {
        (**self).text()
    }
}

impl<T: ViewValue> ViewValue for Option<T> {
    fn text(&self) -> Option<Cow<'_, str>> {
        self.as_ref().and_then(|value| value.text())
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConfigMapper<V = PlaceholderValidator> {
    validator: V,
}

impl ConfigMapper<PlaceholderValidator> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V: ValueValidator> ConfigMapper<V> {
    pub fn with_validator(validator: V) -> Self {
        Self { validator }
    }

    /// Keeps every entry whose text passes the validator, unchanged. Rejected
    /// entries are simply left out.
    pub fn to_config<I, T>(&self, values: I) -> ConfigMap
    where
        I: IntoIterator<Item = (SettingKey, T)>,
        T: ViewValue,
    {
        let mut config = ConfigMap::new();
        for (key, raw) in values {
            let text = raw.text();
            if !self.validator.is_acceptable(text.as_deref()) {
                tracing::trace!(setting = %key, "leaving unset value out");
                continue;
            }
            if let Some(text) = text {
                config.insert_with(&self.validator, key, text.into_owned());
            }
        }
        config
    }
}

/// Settings that have a server-side counterpart, keyed by that counterpart.
pub fn remote_view(config: &ConfigMap) -> BTreeMap<RemoteKey, String> {
    config
        .iter()
        .filter_map(|(key, value)| key.remote_key().map(|remote| (remote, value.to_string())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{remote_view, ConfigMapper};
    use crate::registry::{RemoteKey, SettingKey};
    use crate::validator::ValueValidator;
    use std::collections::HashMap;

    #[test]
    fn drops_unset_entries_and_keeps_the_rest_verbatim() {
        let view: HashMap<SettingKey, Option<String>> = HashMap::from([
            (SettingKey::SpaServer, Some("192.0.2.10".to_string())),
            (SettingKey::AllowIp, Some("<enter IP>".to_string())),
            (SettingKey::Key, Some(String::new())),
            (SettingKey::HmacKey, None),
            (SettingKey::HttpUserAgent, Some(" spaced value ".to_string())),
        ]);
        let config = ConfigMapper::new().to_config(view);
        assert_eq!(config.len(), 2);
        assert_eq!(config.get(SettingKey::SpaServer), Some("192.0.2.10"));
        assert_eq!(config.get(SettingKey::HttpUserAgent), Some(" spaced value "));
    }

    #[test]
    fn accepts_borrowed_text() {
        let fields = [(SettingKey::Access, "tcp/22"), (SettingKey::NatPort, "<port>")];
        let config = ConfigMapper::new().to_config(fields);
        assert_eq!(config.get(SettingKey::Access), Some("tcp/22"));
        assert!(!config.contains(SettingKey::NatPort));
    }

    #[test]
    fn custom_validator_is_honoured() {
        struct NonEmpty;
        impl ValueValidator for NonEmpty {
            fn is_acceptable(&self, value: Option<&str>) -> bool {
                value.is_some_and(|v| !v.is_empty())
            }
        }
        let config = ConfigMapper::with_validator(NonEmpty)
            .to_config([(SettingKey::SpoofUser, "<literal>")]);
        assert_eq!(config.get(SettingKey::SpoofUser), Some("<literal>"));
    }

    #[test]
    fn remote_view_uses_server_names() {
        let config = ConfigMapper::new().to_config([
            (SettingKey::AllowIp, "198.51.100.4"),
            (SettingKey::KeyBase64, "c2VjcmV0"),
            (SettingKey::SpaServer, "192.0.2.10"),
        ]);
        let remote = remote_view(&config);
        assert_eq!(remote.len(), 2);
        assert_eq!(remote[&RemoteKey::Source], "198.51.100.4");
        assert_eq!(remote[&RemoteKey::KeyBase64], "c2VjcmV0");
    }
}
