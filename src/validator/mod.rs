//! URL validation against a host allow-list
//!
//! Every fetch in the pipeline is gated here. URLs are treated as untrusted
//! input: they must parse as absolute http/https URLs and their host must
//! exactly match (or be a subdomain of) a caller-supplied allow-list entry.
//! Validation is a pass/fail decision; inputs are never silently corrected.

use tracing::debug;
use url::Url;

use crate::error::{ClipgateError, ClipgateResult};

/// Set of permitted hosts, matched exactly or as a parent domain
#[derive(Debug, Clone)]
pub struct HostAllowList {
    hosts: Vec<String>,
}

impl HostAllowList {
    /// Build an allow-list from host names (case-insensitive)
    pub fn new<I, S>(hosts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            hosts: hosts
                .into_iter()
                .map(|h| h.as_ref().trim().to_ascii_lowercase())
                .filter(|h| !h.is_empty())
                .collect(),
        }
    }

    /// Check whether a host is permitted.
    ///
    /// A host is permitted when it equals an entry or ends with
    /// `.{entry}` (subdomain match).
    pub fn permits(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        self.hosts
            .iter()
            .any(|allowed| host == *allowed || host.ends_with(&format!(".{}", allowed)))
    }

    /// Whether the allow-list contains any entries
    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}

/// A URL that has passed validation, safe to hand to a fetching tool.
///
/// Immutable once constructed; the only way to obtain one is through
/// [`UrlValidator::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUrl {
    url: Url,
}

impl ValidatedUrl {
    /// The normalized URL string
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    /// The validated host
    pub fn host(&self) -> &str {
        // Guaranteed present by validation.
        self.url.host_str().unwrap_or_default()
    }

    /// The validated scheme (always "http" or "https")
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }
}

impl std::fmt::Display for ValidatedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

/// Validator gating all network fetches.
///
/// Pure over its inputs and the allow-list; it has no fetch capability, so
/// a rejected URL can never reach the network through this crate.
#[derive(Debug, Clone)]
pub struct UrlValidator {
    allow_list: HostAllowList,
}

impl UrlValidator {
    /// Create a validator over an explicit allow-list
    pub fn new(allow_list: HostAllowList) -> Self {
        Self { allow_list }
    }

    /// Validate a raw URL string.
    ///
    /// Checks, in order: absolute-URL parse, scheme (http/https,
    /// case-insensitive), host membership in the allow-list.
    pub fn validate(&self, raw: &str) -> ClipgateResult<ValidatedUrl> {
        let url = Url::parse(raw.trim()).map_err(|_| ClipgateError::MalformedUrl {
            input: raw.to_string(),
        })?;

        // Url::parse lowercases the scheme, so exact comparison suffices.
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(ClipgateError::SchemeNotAllowed {
                    scheme: other.to_string(),
                })
            }
        }

        let host = url
            .host_str()
            .ok_or_else(|| ClipgateError::MalformedUrl {
                input: raw.to_string(),
            })?;

        if !self.allow_list.permits(host) {
            return Err(ClipgateError::HostNotAllowed {
                host: host.to_string(),
            });
        }

        debug!("URL accepted: {}", url);
        Ok(ValidatedUrl { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn youtube_validator() -> UrlValidator {
        UrlValidator::new(HostAllowList::new(["youtube.com", "youtu.be"]))
    }

    #[test]
    fn test_accepts_allowed_host() {
        let validated = youtube_validator()
            .validate("https://youtube.com/watch?v=dQw4w9WgXcQ")
            .unwrap();
        assert_eq!(validated.host(), "youtube.com");
        assert_eq!(validated.scheme(), "https");
    }

    #[test]
    fn test_accepts_subdomain_of_allowed_host() {
        let validated = youtube_validator()
            .validate("https://www.youtube.com/watch?v=dQw4w9WgXcQ")
            .unwrap();
        assert_eq!(validated.host(), "www.youtube.com");
    }

    #[test]
    fn test_rejects_disallowed_host() {
        let err = youtube_validator()
            .validate("http://evil.internal/admin")
            .unwrap_err();
        assert!(matches!(
            err,
            ClipgateError::HostNotAllowed { ref host } if host == "evil.internal"
        ));
    }

    #[test]
    fn test_rejects_suffix_lookalike_host() {
        // "evilyoutube.com" is not a subdomain of "youtube.com".
        let err = youtube_validator()
            .validate("https://evilyoutube.com/watch")
            .unwrap_err();
        assert!(matches!(err, ClipgateError::HostNotAllowed { .. }));
    }

    #[test]
    fn test_rejects_disallowed_scheme() {
        let err = youtube_validator()
            .validate("file:///etc/passwd")
            .unwrap_err();
        assert!(matches!(
            err,
            ClipgateError::SchemeNotAllowed { ref scheme } if scheme == "file"
        ));
    }

    #[test]
    fn test_scheme_comparison_is_case_insensitive() {
        let validated = youtube_validator()
            .validate("HTTPS://youtube.com/watch?v=abc")
            .unwrap();
        assert_eq!(validated.scheme(), "https");
    }

    #[test]
    fn test_rejects_malformed_input() {
        assert!(matches!(
            youtube_validator().validate("not a url").unwrap_err(),
            ClipgateError::MalformedUrl { .. }
        ));
        assert!(matches!(
            youtube_validator().validate("/relative/path").unwrap_err(),
            ClipgateError::MalformedUrl { .. }
        ));
    }

    #[test]
    fn test_rejects_flag_injection_payloads() {
        // Command-line flags must never be treated as URLs.
        for payload in ["--help", "--version", "-o/tmp/x"] {
            assert!(matches!(
                youtube_validator().validate(payload).unwrap_err(),
                ClipgateError::MalformedUrl { .. }
            ));
        }
    }

    #[test]
    fn test_empty_allow_list_rejects_everything() {
        let validator = UrlValidator::new(HostAllowList::new(Vec::<String>::new()));
        assert!(matches!(
            validator.validate("https://youtube.com/").unwrap_err(),
            ClipgateError::HostNotAllowed { .. }
        ));
    }

    #[test]
    fn test_host_matching_is_case_insensitive() {
        let validated = youtube_validator()
            .validate("https://YouTube.com/watch")
            .unwrap();
        // Url normalizes the host to lowercase.
        assert_eq!(validated.host(), "youtube.com");
    }
}
