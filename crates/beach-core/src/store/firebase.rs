//! Firebase Realtime Database over its REST API.
//!
//! Every reference path maps to `<database_url>/<path>.json`. Reads are plain
//! `GET`s, filtered reads add `orderBy`/`equalTo` (the rules for the reference
//! must declare `.indexOn: ["id"]`), full writes are `PUT`, partial writes are
//! `PATCH` on the child key. Requests authenticate with a [`Credential`]: a
//! database secret or ID token goes in the `auth` query parameter, a service
//! account's OAuth2 access token in `access_token`.

use super::oauth::{ServiceAccountKey, TokenSource};
use super::{collect_entries, BeachStore};
use crate::error::{BeachError, Result};
use crate::model::{BeachRecord, StoredBeach};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{Method, Url};
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_REFERENCE: &str = "beaches";

/// How requests to the database are authorised.
#[derive(Debug, Clone, Default)]
pub enum Credential {
    /// Unauthenticated; only works against open security rules.
    #[default]
    None,
    /// Database secret or Firebase ID token, sent as `auth`.
    Token(String),
    /// Service account; an access token is minted and sent as `access_token`.
    ServiceAccount(ServiceAccountKey),
}

#[derive(Debug, Clone)]
enum Auth {
    None,
    Token(String),
    OAuth(Arc<TokenSource>),
}

#[derive(Debug, Clone)]
pub struct FirebaseStore {
    client: Client,
    base: Url,
    reference: String,
    auth: Auth,
}

impl FirebaseStore {
    /// Build a store rooted at `reference` under `database_url`.
    ///
    /// Constructs a blocking HTTP client; call this outside of an async
    /// runtime.
    pub fn new(
        database_url: &str,
        reference: &str,
        credential: Credential,
        timeout: Duration,
    ) -> Result<Self> {
        let base = Url::parse(database_url)
            .map_err(|e| BeachError::Config(format!("invalid database url '{database_url}': {e}")))?;
        if base.cannot_be_a_base() {
            return Err(BeachError::Config(format!(
                "invalid database url '{database_url}'"
            )));
        }
        let reference = reference.trim_matches('/').to_string();
        if reference.is_empty() {
            return Err(BeachError::Config("empty database reference path".into()));
        }
        let client = Client::builder().timeout(timeout).build()?;
        let auth = match credential {
            Credential::None => Auth::None,
            Credential::Token(token) if token.is_empty() => Auth::None,
            Credential::Token(token) => Auth::Token(token),
            Credential::ServiceAccount(key) => {
                Auth::OAuth(Arc::new(TokenSource::new(client.clone(), key)?))
            }
        };
        Ok(Self {
            client,
            base,
            reference,
            auth,
        })
    }

    /// URL of the collection, or of one child when `key` is given.
    fn endpoint(&self, key: Option<&str>) -> Result<Url> {
        let mut parts: Vec<&str> = self.reference.split('/').filter(|s| !s.is_empty()).collect();
        if let Some(k) = key {
            parts.push(k);
        }
        let last = parts.pop().map(|p| format!("{p}.json")).unwrap_or_default();

        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| BeachError::Config(format!("invalid database url '{}'", self.base)))?
            .pop_if_empty()
            .extend(parts)
            .push(&last);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> Result<RequestBuilder> {
        let req = self.client.request(method, url);
        Ok(match &self.auth {
            Auth::None => req,
            Auth::Token(token) => req.query(&[("auth", token.as_str())]),
            Auth::OAuth(source) => req.query(&[("access_token", source.access_token()?)]),
        })
    }

    fn send(&self, req: RequestBuilder, what: &str) -> Result<Value> {
        let resp = req.send()?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(BeachError::Store(format!(
                "firebase {what} failed with {status}: {}",
                body.trim()
            )));
        }
        Ok(resp.json::<Value>()?)
    }
}

impl BeachStore for FirebaseStore {
    fn read_all(&self) -> Result<Vec<StoredBeach>> {
        let req = self.request(Method::GET, self.endpoint(None)?)?;
        Ok(collect_entries(self.send(req, "read")?))
    }

    fn read_where(&self, field: &str, value: &str) -> Result<Vec<StoredBeach>> {
        // Firebase expects JSON-encoded query values.
        let order_by = serde_json::to_string(field)?;
        let equal_to = serde_json::to_string(value)?;
        let req = self
            .request(Method::GET, self.endpoint(None)?)?
            .query(&[("orderBy", order_by), ("equalTo", equal_to)]);
        Ok(collect_entries(self.send(req, "query")?))
    }

    fn write_all(&self, records: &[BeachRecord]) -> Result<()> {
        let req = self.request(Method::PUT, self.endpoint(None)?)?.json(records);
        self.send(req, "write")?;
        Ok(())
    }

    fn patch(&self, key: &str, fields: &Map<String, Value>) -> Result<()> {
        let req = self
            .request(Method::PATCH, self.endpoint(Some(key))?)?
            .json(fields);
        self.send(req, "update")?;
        Ok(())
    }
}
