//! Shared User-Agent string for backend and download traffic.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/docchat";

/// Default User-Agent for every request (identifies the tool).
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("docchat/{version} (document-chat-client; +{PROJECT_UA_URL})")
}
