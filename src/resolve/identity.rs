// src/resolve/identity.rs

use anyhow::Result;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::fetch::{PeopleClient, WebSearchClient};

/// Host + path prefix that marks a public profile link.
static PROFILE_PATH_MARKER: &str = "linkedin.com/in";

static PUBLIC_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"linkedin\.com/in/([^/?#]+)").expect("public-id pattern"));

/// Per-row lookup input. Built once per roster name and never mutated.
#[derive(Debug, Clone)]
pub struct LookupQuery {
    pub name: String,
    pub school_filter: String,
}

/// What an identity source hands back: enough to fetch the full profile.
/// Only web discovery knows the public profile URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub public_id: String,
    pub profile_url: Option<String>,
}

/// One way of turning a name into a profile candidate. Sources are tried in
/// a fixed order; the first to produce a candidate wins.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    /// Short source name for logs.
    fn name(&self) -> &'static str;

    /// `Ok(None)` means this source has nothing for the query; `Err` means
    /// the source itself failed. Both make the chain fall through.
    async fn lookup(&self, query: &LookupQuery) -> Result<Option<Candidate>>;
}

/// Walk the source chain in order. Source failures are logged and treated as
/// a miss so a flaky collaborator never takes down the batch.
pub async fn resolve_identity(
    sources: &[Box<dyn IdentitySource>],
    query: &LookupQuery,
) -> Option<Candidate> {
    for source in sources {
        match source.lookup(query).await {
            Ok(Some(candidate)) => {
                debug!(
                    source = source.name(),
                    public_id = %candidate.public_id,
                    "candidate found"
                );
                return Some(candidate);
            }
            Ok(None) => debug!(source = source.name(), name = %query.name, "no candidate"),
            Err(e) => {
                warn!(source = source.name(), name = %query.name, error = %e, "source failed")
            }
        }
    }
    None
}

/// Extract the public ID from a profile link: the segment after the profile
/// path marker, with trailing separators and any query/fragment dropped.
/// Returns `None` for links that are not profile URLs.
pub fn public_id_from_link(link: &str) -> Option<String> {
    PUBLIC_ID_RE
        .captures(link)
        .map(|caps| caps[1].to_string())
        .filter(|id| !id.is_empty())
}

/// Primary source: web search scoped to the profile host, taking the top
/// organic result that links to a profile.
pub struct WebDiscovery {
    client: WebSearchClient,
}

impl WebDiscovery {
    pub fn new(client: WebSearchClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentitySource for WebDiscovery {
    fn name(&self) -> &'static str {
        "web-discovery"
    }

    async fn lookup(&self, query: &LookupQuery) -> Result<Option<Candidate>> {
        let q = format!(
            "site:{} {} {}",
            PROFILE_PATH_MARKER, query.name, query.school_filter
        );
        let hits = self.client.search(&q, 1).await?;
        Ok(hits.iter().find_map(|hit| {
            public_id_from_link(&hit.link).map(|public_id| Candidate {
                public_id,
                profile_url: Some(hit.link.clone()),
            })
        }))
    }
}

/// Fallback source: the profile API's own people search. Only the top result
/// is considered, and it must carry a public identifier.
pub struct DirectorySearch {
    client: Arc<PeopleClient>,
}

impl DirectorySearch {
    pub fn new(client: Arc<PeopleClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl IdentitySource for DirectorySearch {
    fn name(&self) -> &'static str {
        "directory-search"
    }

    async fn lookup(&self, query: &LookupQuery) -> Result<Option<Candidate>> {
        let results = self
            .client
            .search_people(&query.name, &query.school_filter)
            .await?;
        Ok(results
            .into_iter()
            .next()
            .and_then(|top| top.public_identifier)
            .filter(|id| !id.is_empty())
            .map(|public_id| Candidate {
                public_id,
                profile_url: None,
            }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn extracts_public_id_from_profile_links() {
        assert_eq!(
            public_id_from_link("https://www.linkedin.com/in/alice-smith-123"),
            Some("alice-smith-123".to_string())
        );
        assert_eq!(
            public_id_from_link("https://linkedin.com/in/alice-smith-123/"),
            Some("alice-smith-123".to_string())
        );
        assert_eq!(
            public_id_from_link("https://www.linkedin.com/in/alice-smith-123?trk=search"),
            Some("alice-smith-123".to_string())
        );
    }

    #[test]
    fn rejects_non_profile_links() {
        assert_eq!(public_id_from_link("https://www.linkedin.com/company/acme"), None);
        assert_eq!(public_id_from_link("https://example.com/in/alice"), None);
        assert_eq!(public_id_from_link("https://www.linkedin.com/in/"), None);
    }

    struct Fixed(Option<Candidate>);

    #[async_trait]
    impl IdentitySource for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }
        async fn lookup(&self, _query: &LookupQuery) -> Result<Option<Candidate>> {
            Ok(self.0.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl IdentitySource for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        async fn lookup(&self, _query: &LookupQuery) -> Result<Option<Candidate>> {
            Err(anyhow!("collaborator down"))
        }
    }

    fn candidate(id: &str) -> Candidate {
        Candidate {
            public_id: id.to_string(),
            profile_url: None,
        }
    }

    fn query() -> LookupQuery {
        LookupQuery {
            name: "Alice Smith".to_string(),
            school_filter: "Maryland".to_string(),
        }
    }

    #[tokio::test]
    async fn first_source_with_candidate_wins() {
        let sources: Vec<Box<dyn IdentitySource>> = vec![
            Box::new(Fixed(Some(candidate("from-primary")))),
            Box::new(Fixed(Some(candidate("from-fallback")))),
        ];
        let found = resolve_identity(&sources, &query()).await.unwrap();
        assert_eq!(found.public_id, "from-primary");
    }

    #[tokio::test]
    async fn misses_and_failures_fall_through() {
        let sources: Vec<Box<dyn IdentitySource>> = vec![
            Box::new(Fixed(None)),
            Box::new(Failing),
            Box::new(Fixed(Some(candidate("last-resort")))),
        ];
        let found = resolve_identity(&sources, &query()).await.unwrap();
        assert_eq!(found.public_id, "last-resort");
    }

    #[tokio::test]
    async fn exhausted_chain_yields_nothing() {
        let sources: Vec<Box<dyn IdentitySource>> =
            vec![Box::new(Fixed(None)), Box::new(Failing)];
        assert!(resolve_identity(&sources, &query()).await.is_none());
    }
}
