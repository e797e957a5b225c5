//! Catalog of every client-side `.fwknoprc` setting.
//! Each entry carries its semantic value type, the label key used by the
//! presentation layer, and the matching server-side `access.conf` setting when
//! one exists. The tables are plain `match` arms so adding a variant without
//! filling them in is a compile error.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown setting name: {0}")]
pub struct UnknownSetting(pub String);

/// Semantic kind of a setting value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    YesNo,
    String,
    Passphrase,
    Base64Passphrase,
    IpAddress,
    LocalIpAddress,
    SinglePort,
    ProtocolPlusPort,
    IpPlusPort,
    Protocol,
    EncryptMode,
    DigestAlgorithm,
    DirectoryPath,
    FilePath,
    Url,
    GpgKeyId,
    Seconds,
    Time,
}

/// Server-side (`access.conf`) setting names that client settings map onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RemoteKey {
    Source,
    Key,
    KeyBase64,
    HmacKey,
    HmacKeyBase64,
    HmacDigestType,
    GpgRemoteId,
    GpgDecryptId,
}

impl RemoteKey {
    pub fn as_str(self) -> &'static str {
        match self {
            RemoteKey::Source => "SOURCE",
            RemoteKey::Key => "KEY",
            RemoteKey::KeyBase64 => "KEY_BASE64",
            RemoteKey::HmacKey => "HMAC_KEY",
            RemoteKey::HmacKeyBase64 => "HMAC_KEY_BASE64",
            RemoteKey::HmacDigestType => "HMAC_DIGEST_TYPE",
            RemoteKey::GpgRemoteId => "GPG_REMOTE_ID",
            RemoteKey::GpgDecryptId => "GPG_DECRYPT_ID",
        }
    }
}

impl fmt::Display for RemoteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Client setting identifiers. `Ord` follows declaration order, which is also
/// the canonical order settings are written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SettingKey {
    Access,
    AllowIp,
    EncryptionMode,
    DigestType,
    UseGpg,
    UseGpgAgent,
    GpgSigningPw,
    GpgSigningPwBase64,
    GpgSigner,
    GpgRecipient,
    GpgHomedir,
    SpoofUser,
    SpoofSourceIp,
    RandPort,
    KeyFile,
    HttpUserAgent,
    NatAccess,
    NatLocal,
    NatPort,
    NatRandPort,
    SpaServer,
    SpaServerPort,
    SpaServerProto,
    Key,
    KeyBase64,
    UseHmac,
    HmacKey,
    HmacKeyBase64,
    HmacDigestType,
    SpaSourcePort,
    FwTimeout,
    ResolveIpHttps,
    ResolveHttpOnly,
    ResolveUrl,
    ServerResolveIpv4,
    TimeOffset,
}

impl SettingKey {
    pub const ALL: [SettingKey; 36] = [
        SettingKey::Access,
        SettingKey::AllowIp,
        SettingKey::EncryptionMode,
        SettingKey::DigestType,
        SettingKey::UseGpg,
        SettingKey::UseGpgAgent,
        SettingKey::GpgSigningPw,
        SettingKey::GpgSigningPwBase64,
        SettingKey::GpgSigner,
        SettingKey::GpgRecipient,
        SettingKey::GpgHomedir,
        SettingKey::SpoofUser,
        SettingKey::SpoofSourceIp,
        SettingKey::RandPort,
        SettingKey::KeyFile,
        SettingKey::HttpUserAgent,
        SettingKey::NatAccess,
        SettingKey::NatLocal,
        SettingKey::NatPort,
        SettingKey::NatRandPort,
        SettingKey::SpaServer,
        SettingKey::SpaServerPort,
        SettingKey::SpaServerProto,
        SettingKey::Key,
        SettingKey::KeyBase64,
        SettingKey::UseHmac,
        SettingKey::HmacKey,
        SettingKey::HmacKeyBase64,
        SettingKey::HmacDigestType,
        SettingKey::SpaSourcePort,
        SettingKey::FwTimeout,
        SettingKey::ResolveIpHttps,
        SettingKey::ResolveHttpOnly,
        SettingKey::ResolveUrl,
        SettingKey::ServerResolveIpv4,
        SettingKey::TimeOffset,
    ];

    /// Name as it appears in a `.fwknoprc` file.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::Access => "ACCESS",
            SettingKey::AllowIp => "ALLOW_IP",
            SettingKey::EncryptionMode => "ENCRYPTION_MODE",
            SettingKey::DigestType => "DIGEST_TYPE",
            SettingKey::UseGpg => "USE_GPG",
            SettingKey::UseGpgAgent => "USE_GPG_AGENT",
            SettingKey::GpgSigningPw => "GPG_SIGNING_PW",
            SettingKey::GpgSigningPwBase64 => "GPG_SIGNING_PW_BASE64",
            SettingKey::GpgSigner => "GPG_SIGNER",
            SettingKey::GpgRecipient => "GPG_RECIPIENT",
            SettingKey::GpgHomedir => "GPG_HOMEDIR",
            SettingKey::SpoofUser => "SPOOF_USER",
            SettingKey::SpoofSourceIp => "SPOOF_SOURCE_IP",
            SettingKey::RandPort => "RAND_PORT",
            SettingKey::KeyFile => "KEY_FILE",
            SettingKey::HttpUserAgent => "HTTP_USER_AGENT",
            SettingKey::NatAccess => "NAT_ACCESS",
            SettingKey::NatLocal => "NAT_LOCAL",
            SettingKey::NatPort => "NAT_PORT",
            SettingKey::NatRandPort => "NAT_RAND_PORT",
            SettingKey::SpaServer => "SPA_SERVER",
            SettingKey::SpaServerPort => "SPA_SERVER_PORT",
            SettingKey::SpaServerProto => "SPA_SERVER_PROTO",
            SettingKey::Key => "KEY",
            SettingKey::KeyBase64 => "KEY_BASE64",
            SettingKey::UseHmac => "USE_HMAC",
            SettingKey::HmacKey => "HMAC_KEY",
            SettingKey::HmacKeyBase64 => "HMAC_KEY_BASE64",
            SettingKey::HmacDigestType => "HMAC_DIGEST_TYPE",
            SettingKey::SpaSourcePort => "SPA_SOURCE_PORT",
            SettingKey::FwTimeout => "FW_TIMEOUT",
            SettingKey::ResolveIpHttps => "RESOLVE_IP_HTTPS",
            SettingKey::ResolveHttpOnly => "RESOLVE_HTTP_ONLY",
            SettingKey::ResolveUrl => "RESOLVE_URL",
            SettingKey::ServerResolveIpv4 => "SERVER_RESOLVE_IPV4",
            SettingKey::TimeOffset => "TIME_OFFSET",
        }
    }

    pub fn value_type(self) -> ValueType {
        use ValueType::*;
        match self {
            SettingKey::Access => ProtocolPlusPort,
            SettingKey::AllowIp => LocalIpAddress,
            SettingKey::EncryptionMode => EncryptMode,
            SettingKey::DigestType => DigestAlgorithm,
            SettingKey::UseGpg | SettingKey::UseGpgAgent => YesNo,
            SettingKey::GpgSigningPw => Passphrase,
            SettingKey::GpgSigningPwBase64 => Base64Passphrase,
            SettingKey::GpgSigner | SettingKey::GpgRecipient => GpgKeyId,
            SettingKey::GpgHomedir => DirectoryPath,
            SettingKey::SpoofUser => String,
            SettingKey::SpoofSourceIp => IpAddress,
            SettingKey::RandPort => YesNo,
            SettingKey::KeyFile => FilePath,
            SettingKey::HttpUserAgent => String,
            SettingKey::NatAccess => IpPlusPort,
            SettingKey::NatLocal => YesNo,
            SettingKey::NatPort => SinglePort,
            SettingKey::NatRandPort => YesNo,
            SettingKey::SpaServer => IpAddress,
            SettingKey::SpaServerPort => SinglePort,
            SettingKey::SpaServerProto => Protocol,
            SettingKey::Key => Passphrase,
            SettingKey::KeyBase64 => Base64Passphrase,
            SettingKey::UseHmac => YesNo,
            SettingKey::HmacKey => Passphrase,
            SettingKey::HmacKeyBase64 => Base64Passphrase,
            SettingKey::HmacDigestType => DigestAlgorithm,
            SettingKey::SpaSourcePort => SinglePort,
            SettingKey::FwTimeout => Seconds,
            SettingKey::ResolveIpHttps | SettingKey::ResolveHttpOnly => YesNo,
            SettingKey::ResolveUrl => Url,
            SettingKey::ServerResolveIpv4 => YesNo,
            SettingKey::TimeOffset => Time,
        }
    }

    /// Label key resolved by the presentation layer. Empty for settings the
    /// forms never show on their own.
    pub fn label_key(self) -> &'static str {
        match self {
            SettingKey::Access => "i18n.spa.access",
            SettingKey::AllowIp => "i18n.spa.client.allowip",
            SettingKey::EncryptionMode | SettingKey::DigestType => "",
            SettingKey::UseGpg => "i18n.gpg.use",
            SettingKey::UseGpgAgent => "i18n.gpg.use.agent",
            SettingKey::GpgSigningPw => "i18n.gpg.signing.password",
            SettingKey::GpgSigningPwBase64 => "i18n.gpg.signing.password.base64",
            SettingKey::GpgSigner => "i18n.gpg.signer",
            SettingKey::GpgRecipient => "i18n.gpg.recipient",
            SettingKey::GpgHomedir => "i18n.gpg.homedir",
            SettingKey::SpoofUser => "i18n.spa.spoof.user",
            SettingKey::SpoofSourceIp => "i18n.spa.spoof.source.ip",
            SettingKey::RandPort => "i18n.spa.random.source.port",
            SettingKey::KeyFile | SettingKey::HttpUserAgent => "",
            SettingKey::NatAccess => "i18n.nat.access.ip",
            SettingKey::NatLocal => "i18n.nat.local",
            SettingKey::NatPort => "i18n.nat.port",
            SettingKey::NatRandPort => "i18n.nat.rand.port",
            SettingKey::SpaServer => "i18n.spa.server.ip",
            SettingKey::SpaServerPort => "i18n.spa.server.port",
            SettingKey::SpaServerProto => "i18n.spa.client.proto",
            SettingKey::Key => "i18n.rijndael.key",
            SettingKey::KeyBase64 => "i18n.rijndael.keybase64",
            SettingKey::UseHmac => "i18n.hmac.use",
            SettingKey::HmacKey => "i18n.hmac.key",
            SettingKey::HmacKeyBase64 => "i18n.hmac.key.base64",
            SettingKey::HmacDigestType => "i18n.hmac.digest.type",
            SettingKey::SpaSourcePort => "i18n.spa.client.sourceport",
            SettingKey::FwTimeout => "i18n.misc.timeout",
            SettingKey::ResolveIpHttps => "i18n.resolve.ip.https",
            SettingKey::ResolveHttpOnly => "i18n.resolve.ip.http.only",
            SettingKey::ResolveUrl => "i18n.spa.client.resolveurl",
            SettingKey::ServerResolveIpv4 => "i18n.spa.server.resolve.ipv4",
            SettingKey::TimeOffset => "i18n.misc.timeoffset",
        }
    }

    pub fn tooltip_key(self) -> Option<String> {
        let label = self.label_key();
        if label.is_empty() {
            None
        } else {
            Some(format!("{label}.tooltip"))
        }
    }

    pub fn remote_key(self) -> Option<RemoteKey> {
        match self {
            SettingKey::AllowIp => Some(RemoteKey::Source),
            SettingKey::GpgSigner => Some(RemoteKey::GpgRemoteId),
            SettingKey::GpgRecipient => Some(RemoteKey::GpgDecryptId),
            SettingKey::Key => Some(RemoteKey::Key),
            SettingKey::KeyBase64 => Some(RemoteKey::KeyBase64),
            SettingKey::HmacKey => Some(RemoteKey::HmacKey),
            SettingKey::HmacKeyBase64 => Some(RemoteKey::HmacKeyBase64),
            SettingKey::HmacDigestType => Some(RemoteKey::HmacDigestType),
            _ => None,
        }
    }

    pub fn label(self, labels: &dyn LabelResolver) -> String {
        labels.resolve(self.label_key())
    }

    pub fn tooltip(self, labels: &dyn LabelResolver) -> Option<String> {
        self.tooltip_key()
            .and_then(|key| labels.resolve_or_none(&key))
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SettingKey {
    type Err = UnknownSetting;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SettingKey::ALL
            .iter()
            .copied()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| UnknownSetting(s.to_string()))
    }
}

/// Lookup of display strings for label keys. Core logic never branches on the
/// resolved text.
pub trait LabelResolver {
    fn resolve(&self, label_key: &str) -> String;
    fn resolve_or_none(&self, label_key: &str) -> Option<String>;
}

/// Resolver that echoes label keys back, falling back to the setting name for
/// unlabeled entries at the call site.
#[derive(Debug, Default, Clone, Copy)]
pub struct IdentityLabels;

impl LabelResolver for IdentityLabels {
    fn resolve(&self, label_key: &str) -> String {
        label_key.to_string()
    }

    fn resolve_or_none(&self, _label_key: &str) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{IdentityLabels, LabelResolver, RemoteKey, SettingKey, ValueType};
    use std::collections::HashMap;

    struct Table(HashMap<&'static str, &'static str>);

    impl LabelResolver for Table {
        fn resolve(&self, label_key: &str) -> String {
            self.0.get(label_key).map(|s| s.to_string()).unwrap_or_else(|| label_key.to_string())
        }

        fn resolve_or_none(&self, label_key: &str) -> Option<String> {
            self.0.get(label_key).map(|s| s.to_string())
        }
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for key in SettingKey::ALL {
            assert_eq!(key.as_str().parse::<SettingKey>().unwrap(), key);
        }
        assert!("FOO".parse::<SettingKey>().is_err());
        assert!("key".parse::<SettingKey>().is_err());
    }

    #[test]
    fn all_is_in_declaration_order() {
        let mut sorted = SettingKey::ALL;
        sorted.sort();
        assert_eq!(sorted, SettingKey::ALL);
    }

    #[test]
    fn remote_mapping_is_partial() {
        assert_eq!(SettingKey::AllowIp.remote_key(), Some(RemoteKey::Source));
        assert_eq!(SettingKey::GpgRecipient.remote_key(), Some(RemoteKey::GpgDecryptId));
        assert_eq!(SettingKey::HmacKeyBase64.remote_key(), Some(RemoteKey::HmacKeyBase64));
        assert_eq!(SettingKey::SpaServer.remote_key(), None);
        assert_eq!(SettingKey::ALL.iter().filter(|k| k.remote_key().is_some()).count(), 8);
    }

    #[test]
    fn value_types_match_catalog() {
        assert_eq!(SettingKey::UseHmac.value_type(), ValueType::YesNo);
        assert_eq!(SettingKey::KeyBase64.value_type(), ValueType::Base64Passphrase);
        assert_eq!(SettingKey::Access.value_type(), ValueType::ProtocolPlusPort);
        assert_eq!(SettingKey::FwTimeout.value_type(), ValueType::Seconds);
    }

    #[test]
    fn labels_go_through_resolver() {
        let table = Table(HashMap::from([
            ("i18n.spa.server.ip", "SPA server"),
            ("i18n.spa.server.ip.tooltip", "Address of the fwknopd host"),
        ]));
        assert_eq!(SettingKey::SpaServer.label(&table), "SPA server");
        assert_eq!(
            SettingKey::SpaServer.tooltip(&table).as_deref(),
            Some("Address of the fwknopd host")
        );
        assert_eq!(SettingKey::KeyFile.tooltip_key(), None);
        assert_eq!(SettingKey::Key.tooltip(&IdentityLabels), None);
    }
}
