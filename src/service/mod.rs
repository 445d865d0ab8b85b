mod dryrun;
pub mod failure;
mod http;
mod types;

pub use dryrun::DryrunService;
pub use http::HttpService;
pub use types::{Collaborator, CollaboratorDraft, Product, VendorId, COLLABORATOR_STATUSES, COMMISSION_TYPES};

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ConsoleConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// The API answered with a non-2xx status
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The request never produced a usable response
    #[error("{0}")]
    Transport(String),

    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),

    /// Rejected before any request was made
    #[error("{0}")]
    Invalid(String),
}

impl ServiceError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Operations the console performs against the onboarding backend
#[async_trait]
pub trait VendorService: Send + Sync {
    /// Tell the vendor their account is about to be removed.
    async fn notify_vendor(&self, vendor: VendorId) -> Result<(), ServiceError>;

    /// Irreversibly delete the vendor and everything attached to it.
    async fn deboard_vendor(&self, vendor: VendorId) -> Result<(), ServiceError>;

    async fn list_collaborators(&self) -> Result<Vec<Collaborator>, ServiceError>;

    async fn list_products(&self, collaborator_id: &str) -> Result<Vec<Product>, ServiceError>;

    async fn create_collaborator(&self, draft: &CollaboratorDraft) -> Result<(), ServiceError>;

    async fn update_collaborator(&self, collaborator_id: &str, draft: &CollaboratorDraft) -> Result<(), ServiceError>;

    async fn delete_collaborator(&self, collaborator_id: &str) -> Result<(), ServiceError>;

    async fn delete_product(&self, product_id: &str) -> Result<(), ServiceError>;

    /// Short label of where calls go, shown in headers and logs
    fn target(&self) -> String;
}

/// Create the appropriate service based on dryrun mode
pub fn create_service(config: &ConsoleConfig) -> Result<Arc<dyn VendorService>, ServiceError> {
    if config.general.dryrun {
        Ok(Arc::new(DryrunService::new()))
    } else {
        Ok(Arc::new(HttpService::new(&config.api)?))
    }
}
