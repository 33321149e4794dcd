//! Vault HTTP client.
//!
//! Thin blocking client over the Vault API: the KV v1 logical endpoints the
//! reconciliation engine needs, plus the transit engine (see [`transit`]).
//! Responses are decoded into typed structs at this boundary so the rest of
//! the crate never touches raw JSON shapes.
//!
//! Transport policy is deliberately minimal: one request per call, no
//! retries, reqwest's default timeouts. A backend failure here indicates a
//! misconfiguration the user must fix, so it aborts the run.

mod transit;

pub use transit::Transit;

use reqwest::blocking::{Client, Response};
use reqwest::{Method, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::core::reconcile::SecretStore;
use crate::core::types::SecretDocument;
use crate::error::{Result, VaultError};

/// Generic envelope every Vault read returns.
#[derive(Debug, Deserialize)]
struct Secret<T> {
    data: T,
}

/// Payload of a `?list=true` request.
#[derive(Debug, Deserialize)]
struct KeyList {
    keys: Vec<String>,
}

/// Error body Vault returns on non-2xx responses.
#[derive(Debug, Default, Deserialize)]
struct VaultErrors {
    #[serde(default)]
    errors: Vec<String>,
}

/// Blocking Vault API client.
///
/// Constructed once per invocation from the environment and passed by
/// reference into everything that talks to Vault.
pub struct VaultClient {
    http: Client,
    addr: Url,
    token: String,
}

impl std::fmt::Debug for VaultClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Token stays out of debug output.
        f.debug_struct("VaultClient")
            .field("addr", &self.addr.as_str())
            .finish()
    }
}

impl VaultClient {
    /// Build a client from `VAULT_ADDR` and `VAULT_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns `VaultError::MissingAddr` / `VaultError::MissingToken` if the
    /// variables are unset, or `VaultError::InvalidAddr` if the address
    /// doesn't parse as a URL.
    pub fn from_env() -> Result<Self> {
        let addr = std::env::var("VAULT_ADDR").map_err(|_| VaultError::MissingAddr)?;
        let token = std::env::var("VAULT_TOKEN").map_err(|_| VaultError::MissingToken)?;
        Self::new(&addr, &token)
    }

    /// Build a client for an explicit address and token.
    pub fn new(addr: &str, token: &str) -> Result<Self> {
        let mut addr = Url::parse(addr).map_err(|_| VaultError::InvalidAddr(addr.to_string()))?;
        // Url::join treats a non-'/'-terminated path as a file and drops
        // its last segment, so an address like http://host/vault must be
        // normalized before joins.
        if !addr.path().ends_with('/') {
            addr.set_path(&format!("{}/", addr.path()));
        }
        let http = Client::builder().build().map_err(VaultError::Http)?;
        Ok(Self {
            http,
            addr,
            token: token.to_string(),
        })
    }

    /// The configured Vault address.
    pub fn addr(&self) -> &str {
        self.addr.as_str()
    }

    fn url(&self, path: &str) -> Result<Url> {
        self.addr
            .join(&format!("v1/{}", path.trim_start_matches('/')))
            .map_err(|_| VaultError::InvalidAddr(path.to_string()).into())
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::blocking::RequestBuilder> {
        let url = self.url(path)?;
        debug!(%method, %url, "vault request");
        Ok(self
            .http
            .request(method, url)
            .header("X-Vault-Token", &self.token))
    }

    /// Turn a non-2xx response into a typed API error.
    fn check(path: &str, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let errors = response
            .json::<VaultErrors>()
            .unwrap_or_default()
            .errors
            .join("; ");
        Err(VaultError::Api {
            status: status.as_u16(),
            path: path.to_string(),
            errors,
        }
        .into())
    }

    fn decode<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
        response.json::<T>().map_err(|e| {
            VaultError::Decode {
                path: path.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    }

    /// List child names under a path. A 404 means "nothing there yet" and
    /// yields an empty list.
    pub fn list_path(&self, path: &str) -> Result<Vec<String>> {
        let response = self
            .request(Method::GET, path)?
            .query(&[("list", "true")])
            .send()
            .map_err(VaultError::Http)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }
        let response = Self::check(path, response)?;
        let body: Secret<KeyList> = Self::decode(path, response)?;
        Ok(body.data.keys)
    }

    /// Read the document at a path.
    pub fn read_path(&self, path: &str) -> Result<SecretDocument> {
        let response = self
            .request(Method::GET, path)?
            .send()
            .map_err(VaultError::Http)?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(VaultError::NotFound(path.to_string()).into());
        }
        let response = Self::check(path, response)?;
        let body: Secret<SecretDocument> = Self::decode(path, response)?;
        Ok(body.data)
    }

    /// Write a document at a path (full replace, creates if absent).
    pub fn write_path(&self, path: &str, doc: &SecretDocument) -> Result<()> {
        let response = self
            .request(Method::POST, path)?
            .json(doc)
            .send()
            .map_err(VaultError::Http)?;
        Self::check(path, response)?;
        Ok(())
    }

    /// Delete a path and everything under it.
    pub fn delete_path(&self, path: &str) -> Result<()> {
        let response = self
            .request(Method::DELETE, path)?
            .send()
            .map_err(VaultError::Http)?;
        Self::check(path, response)?;
        Ok(())
    }

    /// POST a JSON body and decode the `data` payload of the response.
    pub(crate) fn post_data<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        let response = self
            .request(Method::POST, path)?
            .json(body)
            .send()
            .map_err(VaultError::Http)?;
        let response = Self::check(path, response)?;
        let secret: Secret<T> = Self::decode(path, response)?;
        Ok(secret.data)
    }

    /// POST with no interesting response body.
    pub(crate) fn post(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        let response = self
            .request(Method::POST, path)?
            .json(body)
            .send()
            .map_err(VaultError::Http)?;
        Self::check(path, response)?;
        Ok(())
    }

    /// GET and decode the `data` payload of the response.
    pub(crate) fn get_data<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .request(Method::GET, path)?
            .send()
            .map_err(VaultError::Http)?;
        let response = Self::check(path, response)?;
        let secret: Secret<T> = Self::decode(path, response)?;
        Ok(secret.data)
    }
}

impl SecretStore for VaultClient {
    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        self.list_path(prefix)
    }

    fn read(&self, path: &str) -> Result<SecretDocument> {
        self.read_path(path)
    }

    fn write(&self, path: &str, doc: &SecretDocument) -> Result<()> {
        self.write_path(path, doc)
    }

    fn delete(&self, path: &str) -> Result<()> {
        self.delete_path(path)
    }
}
