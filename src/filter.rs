use crate::error::CrawlError;
use url::Url;

/// URL schemes that never lead to a crawlable page
const NON_NAVIGABLE_SCHEMES: [&str; 3] = ["javascript", "mailto", "tel"];

/// Scope and normalization rules derived from the seed URL.
///
/// Relative hrefs resolve against the seed's origin, fragments are stripped,
/// and only links on the seed's hostname are crawlable.
#[derive(Debug, Clone)]
pub struct UrlFilter {
    base_domain: String,
    base_url: String,
    origin: Url,
}

impl UrlFilter {
    /// Build a filter for the site the seed URL belongs to
    pub fn from_seed(seed: &Url) -> Result<Self, CrawlError> {
        let base_domain = seed
            .host_str()
            .filter(|host| !host.is_empty())
            .ok_or_else(|| CrawlError::MissingHost {
                url: seed.to_string(),
            })?
            .to_string();
        let base_url = seed.origin().ascii_serialization();
        let origin = Url::parse(&base_url).map_err(|source| CrawlError::InvalidUrl {
            url: seed.to_string(),
            source,
        })?;

        Ok(Self {
            base_domain,
            base_url,
            origin,
        })
    }

    /// Hostname every crawled page must share
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Scheme, host and port of the seed, without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve a raw href into an absolute, fragment-free link target.
    ///
    /// Returns `None` for hrefs that are empty, unresolvable, point at the
    /// bare origin, or use a non-navigable scheme.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        let resolved = match self.origin.join(href) {
            Ok(url) => url,
            Err(e) => {
                ::log::trace!("Dropping unresolvable href {:?}: {}", href, e);
                return None;
            }
        };

        if NON_NAVIGABLE_SCHEMES.contains(&resolved.scheme()) {
            return None;
        }

        let normalized = Self::normalize_url(&resolved);
        if self.is_bare_origin(&normalized) {
            return None;
        }
        Some(normalized)
    }

    /// Whether a URL lives on the seed's hostname
    pub fn is_same_domain(&self, url: &Url) -> bool {
        url.host_str() == Some(self.base_domain.as_str())
    }

    /// Create a normalized version of the URL (fragment removed)
    pub fn normalize_url(url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }

    fn is_bare_origin(&self, url: &Url) -> bool {
        let href = url.as_str();
        href == self.base_url || href.strip_suffix('/') == Some(self.base_url.as_str())
    }
}
