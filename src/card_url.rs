use nid::Nanoid;
use url::Url;

use tapcard_macros::{impl_default_for, new_type};
use tapcard_util::result_ext::ResultExt as _;

new_type!(ProfileId, String);
impl_default_for!(ProfileId);

impl ProfileId {
    pub fn new() -> Self {
        let nanoid: Nanoid = Nanoid::new();
        Self(nanoid.to_string())
    }

    #[cfg(test)]
    pub fn preview_new() -> Self {
        Self("testtesttest".to_string())
    }
}

const SHARE_PATH: &str = "share";

/// Link to the hosted profile, `https://<host>/share/<profile-id>`
///
/// Only built from the host and the profile id, so editing the contact never changes it
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display, uniffi::Object)]
#[display("{_0}")]
pub struct CardUrl(String);

#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error, uniffi::Error)]
#[uniffi::export(Display)]
pub enum CardUrlError {
    #[error("share host is empty")]
    EmptyHost,

    #[error("profile id is empty")]
    EmptyProfileId,

    #[error("invalid share host: {0}")]
    InvalidHost(String),

    #[error("invalid card url: {0}")]
    InvalidUrl(String),

    #[error("not a card share url: {0}")]
    NotAShareUrl(String),
}

type Result<T, E = CardUrlError> = std::result::Result<T, E>;

impl CardUrl {
    pub fn new(host: &str, profile_id: &ProfileId) -> Result<Self> {
        let host = host.trim().trim_end_matches('/');
        if host.is_empty() {
            return Err(CardUrlError::EmptyHost);
        }

        let profile_id = profile_id.trim();
        if profile_id.is_empty() {
            return Err(CardUrlError::EmptyProfileId);
        }

        if host.contains("://") || host.contains(['/', '?', '#', '@']) {
            return Err(CardUrlError::InvalidHost(host.to_string()));
        }

        let mut url = Url::parse(&format!("https://{host}/")).map_err_str(CardUrlError::InvalidHost)?;

        url.path_segments_mut()
            .map_err(|_| CardUrlError::InvalidHost(host.to_string()))?
            .pop_if_empty()
            .push(SHARE_PATH)
            .push(profile_id);

        Ok(Self(url.to_string()))
    }

    /// Card url on the share host from the current config
    pub fn for_profile(profile_id: &ProfileId) -> Result<Self> {
        let config = crate::config::current();
        Self::new(&config.share_host, profile_id)
    }

    /// Parse a card url handed back by the backend
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = Url::parse(url.trim()).map_err_str(CardUrlError::InvalidUrl)?;

        if parsed.scheme() != "https" || parsed.host_str().is_none() {
            return Err(CardUrlError::NotAShareUrl(url.to_string()));
        }

        // the id is the last path segment, anything after it would end up in the id
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(CardUrlError::NotAShareUrl(url.to_string()));
        }

        let segments = parsed.path_segments().map(|segments| segments.collect::<Vec<_>>());
        match segments.as_deref() {
            Some([SHARE_PATH, profile_id]) if !profile_id.is_empty() => Ok(Self(parsed.to_string())),
            _ => Err(CardUrlError::NotAShareUrl(url.to_string())),
        }
    }

    pub fn profile_id(&self) -> ProfileId {
        let id = self.0.rsplit('/').next().unwrap_or_default();
        ProfileId::from(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

mod ffi {
    use super::*;

    #[uniffi::export]
    impl CardUrl {
        #[uniffi::constructor]
        pub fn from_host(host: String, profile_id: String) -> Result<Self, CardUrlError> {
            Self::new(&host, &ProfileId::from(profile_id))
        }

        #[uniffi::constructor]
        pub fn from_url(url: String) -> Result<Self, CardUrlError> {
            Self::parse(&url)
        }

        pub fn url(&self) -> String {
            self.0.clone()
        }

        pub fn id(&self) -> String {
            self.profile_id().to_string()
        }
    }

    #[uniffi::export]
    fn new_profile_id() -> String {
        ProfileId::new().to_string()
    }
}
