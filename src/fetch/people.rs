// src/fetch/people.rs

use anyhow::{bail, Context, Result};
use reqwest::header::SET_COOKIE;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

static AUTH_ENDPOINT: &str = "https://www.linkedin.com/uas/authenticate";
static API_BASE: &str = "https://www.linkedin.com/voyager/api";
static USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Safari/537.36";

/// One candidate from a people search. Only the public identifier matters
/// downstream; profiles outside the caller's network may not carry one.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersonSummary {
    pub public_identifier: Option<String>,
    #[serde(default)]
    pub headline: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct SearchResponse {
    #[serde(default)]
    elements: Vec<SearchCluster>,
}

/// People results arrive grouped into clusters by result type.
#[derive(Debug, Deserialize, Default)]
struct SearchCluster {
    #[serde(default)]
    elements: Vec<PersonSummary>,
}

#[derive(Debug, Deserialize, Default)]
struct AuthOutcome {
    #[serde(default)]
    login_result: String,
}

/// Cookie-session client for the profile API. Construct via
/// [`PeopleClient::authenticate`]; every request after that rides the cookie
/// jar plus the CSRF token minted at login.
pub struct PeopleClient {
    http: Client,
    csrf_token: String,
}

impl PeopleClient {
    /// Establish an authenticated session: seed the session cookie, post the
    /// credentials, then probe the session once so a bad login fails here
    /// rather than mid-batch.
    pub async fn authenticate(username: &str, password: &str) -> Result<Self> {
        let http = Client::builder()
            .cookie_store(true)
            .user_agent(USER_AGENT)
            .build()
            .context("building HTTP client")?;

        // the GET mints an anonymous JSESSIONID; its value doubles as the
        // CSRF token for everything that follows
        let seed = http
            .get(AUTH_ENDPOINT)
            .send()
            .await
            .context("reaching auth endpoint")?;
        let csrf_token =
            session_cookie(&seed).context("auth endpoint did not set a session cookie")?;

        let resp = http
            .post(AUTH_ENDPOINT)
            .header("csrf-token", csrf_token.as_str())
            .form(&[
                ("session_key", username),
                ("session_password", password),
                ("JSESSIONID", csrf_token.as_str()),
            ])
            .send()
            .await
            .context("posting credentials")?
            .error_for_status()
            .context("authentication rejected")?;

        let outcome: AuthOutcome = resp.json().await.context("decoding auth response")?;
        if outcome.login_result != "PASS" {
            bail!("authentication failed: {}", outcome.login_result);
        }

        let client = Self { http, csrf_token };
        client.verify_session().await?;
        Ok(client)
    }

    /// Cheap authenticated round-trip against the own-identity endpoint.
    async fn verify_session(&self) -> Result<()> {
        self.get(&format!("{}/me", API_BASE), &[])
            .await
            .context("session probe failed")?;
        debug!("session verified");
        Ok(())
    }

    /// Search people by free-text keywords, constrained to a school.
    pub async fn search_people(&self, keywords: &str, school: &str) -> Result<Vec<PersonSummary>> {
        let filters = format!("List(resultType->PEOPLE,school->{})", school);
        let resp = self
            .get(
                &format!("{}/search/blended", API_BASE),
                &[
                    ("keywords", keywords),
                    ("origin", "FACETED_SEARCH"),
                    ("filters", filters.as_str()),
                    ("count", "10"),
                ],
            )
            .await
            .with_context(|| format!("people search failed for {:?}", keywords))?;

        let body: SearchResponse = resp.json().await.context("decoding people search")?;
        Ok(body
            .elements
            .into_iter()
            .flat_map(|cluster| cluster.elements)
            .collect())
    }

    /// Fetch the full profile view for a public ID. Returned as raw JSON;
    /// the resolver decides whether the payload is usable.
    pub async fn get_profile(&self, public_id: &str) -> Result<Value> {
        let resp = self
            .get(
                &format!("{}/identity/profiles/{}/profileView", API_BASE, public_id),
                &[],
            )
            .await
            .with_context(|| format!("profile fetch failed for {:?}", public_id))?;

        resp.json().await.context("decoding profile payload")
    }

    async fn get(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Response> {
        self.http
            .get(endpoint)
            .header("csrf-token", self.csrf_token.as_str())
            .query(params)
            .send()
            .await
            .with_context(|| format!("GET {} failed", endpoint))?
            .error_for_status()
            .with_context(|| format!("non-success status from {}", endpoint))
    }
}

/// Pull the JSESSIONID value out of a response's Set-Cookie headers. The
/// server quotes the value; the CSRF header wants it unquoted.
fn session_cookie(resp: &Response) -> Option<String> {
    resp.headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookie| {
            let rest = cookie.strip_prefix("JSESSIONID=")?;
            let value = rest.split(';').next()?.trim().trim_matches('"');
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        })
}
