use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use super::PackageStore;
use crate::api::{ObjectKey, PackageRevision, PackageRevisionResources};
use crate::constants::{
    API_GROUP, API_VERSION, PACKAGE_REVISION_KIND, PACKAGE_REVISION_RESOURCES_KIND,
};
use crate::core::PkgctlError;

const REVISIONS: &str = "packagerevisions";
const RESOURCES: &str = "packagerevisionresources";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Items of a list response.
#[derive(serde::Deserialize)]
struct ObjectList<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
}

/// [`PackageStore`] backed by a package server's REST API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    base_url: String,
}

impl HttpStore {
    /// Create a store for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, PkgctlError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build().map_err(|e| {
            PkgctlError::Transport {
                url: base_url.clone(),
                reason: format!("failed to create HTTP client: {e}"),
            }
        })?;
        Ok(Self {
            client,
            base_url,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, namespace: &str, plural: &str) -> String {
        format!(
            "{}/apis/{API_GROUP}/{API_VERSION}/namespaces/{namespace}/{plural}",
            self.base_url
        )
    }

    fn object_url(&self, key: &ObjectKey, plural: &str) -> String {
        format!("{}/{}", self.collection_url(&key.namespace, plural), key.name)
    }

    async fn send<B: Serialize + Sync>(
        &self,
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> Result<Response, PkgctlError> {
        debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.map_err(|e| transport(url, &e))
    }

    async fn read_json<T: DeserializeOwned>(url: &str, response: Response) -> Result<T, PkgctlError> {
        response.json::<T>().await.map_err(|e| PkgctlError::Transport {
            url: url.to_string(),
            reason: format!("invalid response body: {e}"),
        })
    }
}

fn transport(url: &str, error: &reqwest::Error) -> PkgctlError {
    PkgctlError::Transport {
        url: url.to_string(),
        reason: error.to_string(),
    }
}

/// What the request was doing, for mapping 409 responses.
#[derive(Clone, Copy)]
enum Verb {
    Read,
    Create,
    Update,
    Delete,
}

async fn check_status(
    response: Response,
    url: &str,
    verb: Verb,
    kind: &str,
    key: &ObjectKey,
) -> Result<Response, PkgctlError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let error = match (status, verb) {
        (StatusCode::NOT_FOUND, _) => PkgctlError::not_found(kind, &key.namespace, &key.name),
        (StatusCode::CONFLICT, Verb::Create) => PkgctlError::AlreadyExists {
            kind: kind.to_string(),
            namespace: key.namespace.clone(),
            name: key.name.clone(),
        },
        (StatusCode::CONFLICT, Verb::Update) => PkgctlError::Conflict {
            kind: kind.to_string(),
            namespace: key.namespace.clone(),
            name: key.name.clone(),
            reason: body,
        },
        _ => PkgctlError::Transport {
            url: url.to_string(),
            reason: if body.is_empty() {
                format!("HTTP {status}")
            } else {
                format!("HTTP {status}: {}", body.trim())
            },
        },
    };
    Err(error)
}

#[async_trait]
impl PackageStore for HttpStore {
    async fn get_package_revision(&self, key: &ObjectKey) -> Result<PackageRevision, PkgctlError> {
        let url = self.object_url(key, REVISIONS);
        let response = self.send::<()>(Method::GET, &url, None).await?;
        let response = check_status(response, &url, Verb::Read, PACKAGE_REVISION_KIND, key).await?;
        Self::read_json(&url, response).await
    }

    async fn list_package_revisions(
        &self,
        namespace: &str,
    ) -> Result<Vec<PackageRevision>, PkgctlError> {
        let url = self.collection_url(namespace, REVISIONS);
        let key = ObjectKey::new(namespace, "");
        let response = self.send::<()>(Method::GET, &url, None).await?;
        let response = check_status(response, &url, Verb::Read, PACKAGE_REVISION_KIND, &key).await?;
        let list: ObjectList<PackageRevision> = Self::read_json(&url, response).await?;
        let mut items = list.items;
        items.sort_by(|a, b| a.metadata.name.cmp(&b.metadata.name));
        Ok(items)
    }

    async fn create_package_revision(
        &self,
        revision: PackageRevision,
    ) -> Result<PackageRevision, PkgctlError> {
        let key = revision.key();
        let url = self.collection_url(&key.namespace, REVISIONS);
        let response = self.send(Method::POST, &url, Some(&revision)).await?;
        let response =
            check_status(response, &url, Verb::Create, PACKAGE_REVISION_KIND, &key).await?;
        Self::read_json(&url, response).await
    }

    async fn update_package_revision(
        &self,
        revision: PackageRevision,
    ) -> Result<PackageRevision, PkgctlError> {
        let key = revision.key();
        let url = self.object_url(&key, REVISIONS);
        let response = self.send(Method::PUT, &url, Some(&revision)).await?;
        let response =
            check_status(response, &url, Verb::Update, PACKAGE_REVISION_KIND, &key).await?;
        Self::read_json(&url, response).await
    }

    async fn delete_package_revision(&self, key: &ObjectKey) -> Result<(), PkgctlError> {
        let url = self.object_url(key, REVISIONS);
        let response = self.send::<()>(Method::DELETE, &url, None).await?;
        check_status(response, &url, Verb::Delete, PACKAGE_REVISION_KIND, key).await?;
        Ok(())
    }

    async fn get_package_revision_resources(
        &self,
        key: &ObjectKey,
    ) -> Result<PackageRevisionResources, PkgctlError> {
        let url = self.object_url(key, RESOURCES);
        let response = self.send::<()>(Method::GET, &url, None).await?;
        let response =
            check_status(response, &url, Verb::Read, PACKAGE_REVISION_RESOURCES_KIND, key).await?;
        Self::read_json(&url, response).await
    }

    async fn update_package_revision_resources(
        &self,
        resources: PackageRevisionResources,
    ) -> Result<PackageRevisionResources, PkgctlError> {
        let key = resources.key();
        let url = self.object_url(&key, RESOURCES);
        let response = self.send(Method::PUT, &url, Some(&resources)).await?;
        let response =
            check_status(response, &url, Verb::Update, PACKAGE_REVISION_RESOURCES_KIND, &key)
                .await?;
        Self::read_json(&url, response).await
    }
}
