// ── Directory HTTP client ──
//
// Wraps `reqwest::Client` with URL construction for the cursor-paged
// people endpoint and translation of wire shapes into domain types.
// This is the production implementation of `PageGateway`.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use roster_core::{CoreError, Cursor, Page, PageGateway};

use crate::error::Error;
use crate::models::PeoplePageBody;

/// HTTP client for a cursor-paged people directory.
///
/// Speaks one endpoint: `GET {base}/api/people?limit=N[&cursor=T]`,
/// returning `{"people": [...], "next": ...}`. Repeated calls with the
/// same cursor are expected and safe.
pub struct DirectoryClient {
    http: reqwest::Client,
    base_url: Url,
    page_limit: u32,
}

impl DirectoryClient {
    /// Create a client with its own connection pool.
    pub fn new(base_url: Url, page_limit: u32, timeout: Duration) -> Result<Self, Error> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url,
            page_limit,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url, page_limit: u32) -> Self {
        Self {
            http,
            base_url,
            page_limit,
        }
    }

    /// The directory base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build the people-page URL: `{base}/api/people?limit=N[&cursor=T]`.
    fn people_url(&self, cursor: Option<&Cursor>) -> Result<Url, Error> {
        let mut url = self.base_url.join("api/people")?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("limit", &self.page_limit.to_string());
            if let Some(cursor) = cursor {
                query.append_pair("cursor", cursor.as_str());
            }
        }
        Ok(url)
    }

    // ── Requests ─────────────────────────────────────────────────────

    /// Fetch one page of people, resuming at `cursor`.
    pub async fn people_page(&self, cursor: Option<&Cursor>) -> Result<Page, Error> {
        let url = self.people_url(cursor)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: PeoplePageBody = resp.json().await.map_err(|e| Error::Deserialization {
            message: e.to_string(),
        })?;
        Ok(Page::from(body))
    }
}

#[async_trait]
impl PageGateway for DirectoryClient {
    async fn fetch_page(&self, cursor: Option<Cursor>) -> Result<Page, CoreError> {
        self.people_page(cursor.as_ref()).await.map_err(CoreError::from)
    }
}
