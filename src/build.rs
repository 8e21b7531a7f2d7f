const VERSION: &str = env!("CARGO_PKG_VERSION");
const GIT_SHORT_HASH: &str = env!("GIT_SHORT_HASH");
const BUILD_PROFILE: &str = env!("BUILD_PROFILE");

#[cfg(debug_assertions)]
const IS_RELEASE: bool = false;

#[cfg(not(debug_assertions))]
const IS_RELEASE: bool = true;

#[uniffi::export]
pub fn version() -> String {
    VERSION.to_string()
}

#[uniffi::export]
pub fn git_short_hash() -> String {
    GIT_SHORT_HASH.to_string()
}

#[uniffi::export]
pub fn is_release() -> bool {
    IS_RELEASE
}

#[uniffi::export(name = "build_profile")]
pub fn profile() -> String {
    BUILD_PROFILE.to_string()
}
