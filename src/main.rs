use anyhow::Result;
use linkscraper::{
    config::Config,
    fetch::{PeopleClient, WebSearchClient},
    resolve::{
        identity::{DirectorySearch, IdentitySource, LookupQuery, WebDiscovery},
        Resolution, Resolver,
    },
    table::Roster,
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) load configuration ───────────────────────────────────────
    let config = Config::from_env()?;

    // ─── 3) load the roster ──────────────────────────────────────────
    let mut roster = Roster::load(&config.roster_path)?;
    let names = roster.names();
    info!(
        count = names.len(),
        path = %roster.path().display(),
        school = %config.target_school,
        "roster loaded"
    );

    // ─── 4) establish the profile API session ────────────────────────
    // a failed login is fatal; the batch does not run without a session
    let people = match PeopleClient::authenticate(
        &config.linkedin_username,
        &config.linkedin_password,
    )
    .await
    {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!(error = %e, "authentication failed");
            return Err(e);
        }
    };
    info!("authenticated");

    // ─── 5) wire up the identity chain and resolver ──────────────────
    let web = WebSearchClient::new(reqwest::Client::new(), config.serpapi_key.clone());
    let sources: Vec<Box<dyn IdentitySource>> = vec![
        Box::new(WebDiscovery::new(web)),
        Box::new(DirectorySearch::new(Arc::clone(&people))),
    ];
    let resolver = Resolver::new(sources, people);

    // ─── 6) resolve each name, strictly in order ─────────────────────
    let mut updated = 0usize;
    for name in &names {
        info!(name = %name, "processing");
        let query = LookupQuery {
            name: name.clone(),
            school_filter: config.target_school.clone(),
        };
        match resolver.resolve(&query).await {
            Ok(Resolution::Resolved(profile)) => {
                let rows = roster.apply(&profile);
                updated += rows;
                info!(name = %name, rows, "row updated");
            }
            Ok(Resolution::Absent(reason)) => {
                warn!(name = %name, %reason, "not found");
            }
            Err(e) => {
                error!(name = %name, error = %e, "lookup failed");
            }
        }
    }

    // ─── 7) write the roster back once ───────────────────────────────
    roster.flush()?;
    info!(updated, total = names.len(), "all done");
    Ok(())
}
