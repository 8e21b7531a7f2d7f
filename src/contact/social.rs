use std::str::FromStr as _;

/// Platforms with a known profile URL template
#[derive(
    Debug,
    Copy,
    Clone,
    Hash,
    Eq,
    PartialEq,
    uniffi::Enum,
    derive_more::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum SocialPlatform {
    #[display("LinkedIn")]
    #[strum(serialize = "linkedin")]
    LinkedIn,

    #[display("X")]
    #[strum(serialize = "twitter", serialize = "x")]
    Twitter,

    #[display("Instagram")]
    #[strum(serialize = "instagram")]
    Instagram,

    #[display("Facebook")]
    #[strum(serialize = "facebook")]
    Facebook,

    #[display("GitHub")]
    #[strum(serialize = "github")]
    GitHub,
}

impl SocialPlatform {
    pub fn parse(platform: &str) -> Option<Self> {
        Self::from_str(platform.trim()).ok()
    }

    /// Everything before the handle
    pub fn url_prefix(self) -> &'static str {
        match self {
            Self::LinkedIn => "https://linkedin.com/in/",
            Self::Twitter => "https://x.com/",
            Self::Instagram => "https://instagram.com/",
            Self::Facebook => "https://facebook.com/",
            Self::GitHub => "https://github.com/",
        }
    }

    pub fn profile_url(self, handle: &str) -> Option<String> {
        let handle = clean_handle(handle);
        if handle.is_empty() {
            return None;
        }

        Some(format!("{}{handle}", self.url_prefix()))
    }
}

/// Resolve a social link to the URL written on the card
///
/// Absolute URLs are kept as is for any platform, handles on known platforms go through the
/// platform template, anything else resolves to nothing
pub fn resolve_social_url(platform: &str, handle: &str) -> Option<String> {
    let handle = handle.trim();

    if is_absolute_url(handle) {
        return Some(handle.to_string());
    }

    SocialPlatform::parse(platform)?.profile_url(handle)
}

fn is_absolute_url(handle: &str) -> bool {
    handle.starts_with("https://") || handle.starts_with("http://")
}

fn clean_handle(handle: &str) -> &str {
    let handle = handle.trim();
    handle.strip_prefix('@').unwrap_or(handle)
}

mod ffi {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[uniffi::export]
    fn resolve_social_url(platform: String, handle: String) -> Option<String> {
        super::resolve_social_url(&platform, &handle)
    }

    #[uniffi::export]
    fn all_social_platforms() -> Vec<SocialPlatform> {
        SocialPlatform::iter().collect()
    }

    #[uniffi::export]
    fn social_platform_to_string(platform: SocialPlatform) -> String {
        platform.to_string()
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator as _;

    use super::*;

    #[test]
    fn test_known_platforms() {
        assert_eq!(
            resolve_social_url("github", "janedoe").as_deref(),
            Some("https://github.com/janedoe")
        );
        assert_eq!(
            resolve_social_url("linkedin", "jane-doe").as_deref(),
            Some("https://linkedin.com/in/jane-doe")
        );
        assert_eq!(
            resolve_social_url("instagram", "jd").as_deref(),
            Some("https://instagram.com/jd")
        );
        assert_eq!(
            resolve_social_url("facebook", "jane.doe").as_deref(),
            Some("https://facebook.com/jane.doe")
        );
    }

    #[test]
    fn test_twitter_and_x_share_a_template() {
        assert_eq!(resolve_social_url("twitter", "@jane").as_deref(), Some("https://x.com/jane"));
        assert_eq!(resolve_social_url("X", "jane").as_deref(), Some("https://x.com/jane"));
    }

    #[test]
    fn test_leading_at_is_stripped() {
        assert_eq!(
            resolve_social_url("GitHub", "@janedoe").as_deref(),
            Some("https://github.com/janedoe")
        );
    }

    #[test]
    fn test_absolute_urls_pass_through_for_any_platform() {
        assert_eq!(
            resolve_social_url("mastodon", "https://mastodon.social/@jane").as_deref(),
            Some("https://mastodon.social/@jane")
        );
        assert_eq!(
            resolve_social_url("github", "http://github.com/janedoe").as_deref(),
            Some("http://github.com/janedoe")
        );
    }

    #[test]
    fn test_unknown_platform_handle_is_dropped() {
        assert_eq!(resolve_social_url("mastodon", "jane"), None);
        assert_eq!(resolve_social_url("", "jane"), None);
    }

    #[test]
    fn test_empty_handle_is_dropped() {
        assert_eq!(resolve_social_url("github", ""), None);
        assert_eq!(resolve_social_url("github", "@"), None);
    }

    #[test]
    fn test_platform_table_is_complete() {
        for platform in SocialPlatform::iter() {
            assert!(platform.url_prefix().starts_with("https://"));
            assert!(platform.url_prefix().ends_with('/'));
        }
    }
}
