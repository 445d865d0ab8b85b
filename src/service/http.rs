use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::failure::{self, FailureText};
use super::{Collaborator, CollaboratorDraft, Product, ServiceError, VendorId, VendorService};
use crate::config::ApiConfig;

/// Live service backed by the onboarding REST API. Vendor calls go to
/// `base_url`, collaborator and product records to `catalog_url`.
pub struct HttpService {
    client: Client,
    base_url: Url,
    catalog_url: Url,
}

fn parse_base(raw: &str) -> Result<Url, ServiceError> {
    let url = Url::parse(raw.trim()).map_err(|e| ServiceError::InvalidBaseUrl(format!("{raw}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(ServiceError::InvalidBaseUrl(raw.to_string()));
    }
    Ok(url)
}

fn join(base: &Url, segments: &[&str]) -> Result<Url, ServiceError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| ServiceError::InvalidBaseUrl(base.to_string()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

impl HttpService {
    pub fn new(api: &ApiConfig) -> Result<Self, ServiceError> {
        let base_url = parse_base(&api.base_url)?;
        let catalog_url = parse_base(&api.catalog_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = api.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ServiceError::Transport(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            catalog_url,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        join(&self.base_url, segments)
    }

    fn catalog_endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        join(&self.catalog_url, segments)
    }

    /// Send `request`; a 2xx status is success and the body is not read.
    async fn execute(&self, request: RequestBuilder, text: &FailureText) -> Result<(), ServiceError> {
        let response = request.send().await.map_err(|e| text.transport(e))?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(rejection(response, text).await)
    }

    /// Bodiless request announcing JSON, as the vendor endpoints expect.
    async fn send_empty(&self, request: RequestBuilder, text: &FailureText) -> Result<(), ServiceError> {
        self.execute(request.header(CONTENT_TYPE, "application/json"), text).await
    }

    async fn fetch_list<T: DeserializeOwned>(&self, url: Url, text: &FailureText) -> Result<Vec<T>, ServiceError> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(|e| text.transport(e))?;

        if !response.status().is_success() {
            return Err(rejection(response, text).await);
        }

        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| ServiceError::Transport(format!("Unexpected response body: {e}")))
    }
}

async fn rejection(response: Response, text: &FailureText) -> ServiceError {
    let status = response.status().as_u16();
    let body = failure::body_or_empty(status, response.text().await);
    text.rejected(status, &body)
}

#[async_trait]
impl VendorService for HttpService {
    async fn notify_vendor(&self, vendor: VendorId) -> Result<(), ServiceError> {
        let url = self.endpoint(&["api", "vendor", "notify", &vendor.to_string()])?;
        info!("Notifying vendor {} via {}", vendor, url);

        let result = self.send_empty(self.client.post(url), &failure::NOTIFY).await;
        if let Err(ref e) = result {
            warn!("Notify for vendor {} failed: {}", vendor, e);
        }
        result
    }

    async fn deboard_vendor(&self, vendor: VendorId) -> Result<(), ServiceError> {
        let url = self.endpoint(&["api", "deboard", &vendor.to_string()])?;
        info!("Deboarding vendor {} via {}", vendor, url);

        let result = self.send_empty(self.client.delete(url), &failure::DEBOARD).await;
        match result {
            Ok(()) => info!("Vendor {} deboarded", vendor),
            Err(ref e) => warn!("Deboard for vendor {} failed: {}", vendor, e),
        }
        result
    }

    async fn list_collaborators(&self) -> Result<Vec<Collaborator>, ServiceError> {
        let url = self.catalog_endpoint(&["api", "collaborators"])?;
        self.fetch_list(url, &failure::COLLABORATORS).await
    }

    async fn list_products(&self, collaborator_id: &str) -> Result<Vec<Product>, ServiceError> {
        let url = self.catalog_endpoint(&["api", "collaborators", collaborator_id, "products"])?;
        self.fetch_list(url, &failure::PRODUCTS).await
    }

    async fn create_collaborator(&self, draft: &CollaboratorDraft) -> Result<(), ServiceError> {
        draft.validate()?;
        let url = self.catalog_endpoint(&["api", "collaborators"])?;
        info!("Creating collaborator {:?} via {}", draft.brand_name, url);
        self.execute(self.client.post(url).json(draft), &failure::CREATE_COLLABORATOR)
            .await
    }

    async fn update_collaborator(&self, collaborator_id: &str, draft: &CollaboratorDraft) -> Result<(), ServiceError> {
        draft.validate()?;
        let url = self.catalog_endpoint(&["api", "collaborators", collaborator_id])?;
        info!("Updating collaborator {} via {}", collaborator_id, url);
        self.execute(self.client.put(url).json(draft), &failure::UPDATE_COLLABORATOR)
            .await
    }

    async fn delete_collaborator(&self, collaborator_id: &str) -> Result<(), ServiceError> {
        let url = self.catalog_endpoint(&["api", "collaborators", collaborator_id])?;
        info!("Deleting collaborator {} via {}", collaborator_id, url);

        let result = self.execute(self.client.delete(url), &failure::DELETE_COLLABORATOR).await;
        if let Err(ref e) = result {
            warn!("Delete of collaborator {} failed: {}", collaborator_id, e);
        }
        result
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), ServiceError> {
        let url = self.catalog_endpoint(&["api", "products", product_id])?;
        info!("Deleting product {} via {}", product_id, url);

        let result = self.execute(self.client.delete(url), &failure::DELETE_PRODUCT).await;
        if let Err(ref e) = result {
            warn!("Delete of product {} failed: {}", product_id, e);
        }
        result
    }

    fn target(&self) -> String {
        self.base_url.host_str().unwrap_or("api").to_string()
    }
}
