use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use super::{Collaborator, CollaboratorDraft, Product, ServiceError, VendorId, VendorService};

const SIMULATED_LATENCY: Duration = Duration::from_millis(600);

/// Dryrun service that simulates the backend without network traffic
pub struct DryrunService {
    latency: Duration,
}

impl DryrunService {
    pub fn new() -> Self {
        Self { latency: SIMULATED_LATENCY }
    }

    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    async fn pause(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl Default for DryrunService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VendorService for DryrunService {
    async fn notify_vendor(&self, vendor: VendorId) -> Result<(), ServiceError> {
        info!("[dryrun] notify vendor {}", vendor);
        self.pause().await;
        Ok(())
    }

    async fn deboard_vendor(&self, vendor: VendorId) -> Result<(), ServiceError> {
        info!("[dryrun] deboard vendor {}", vendor);
        self.pause().await;
        Ok(())
    }

    async fn list_collaborators(&self) -> Result<Vec<Collaborator>, ServiceError> {
        self.pause().await;
        Ok(vec![
            sample_collaborator("1", "Asha Menon", "Pixel Cafe", "percentage", "12.5"),
            sample_collaborator("2", "Ravi Kumar", "Joypad Co", "fixed", "300"),
        ])
    }

    async fn list_products(&self, collaborator_id: &str) -> Result<Vec<Product>, ServiceError> {
        self.pause().await;
        Ok(vec![
            Product {
                product_id: format!("{collaborator_id}-1"),
                name: "Controller Grip".to_string(),
                category: "Accessories".to_string(),
                unit_price: "499.00".to_string(),
                sku: Some(format!("GRIP-{collaborator_id}")),
                stock_quantity: 40,
                min_order_quantity: 5,
                status: "active".to_string(),
                description: None,
                image_url: None,
            },
            Product {
                product_id: format!("{collaborator_id}-2"),
                name: "Energy Drink (24 pack)".to_string(),
                category: "Beverages".to_string(),
                unit_price: "960.00".to_string(),
                sku: None,
                stock_quantity: 0,
                min_order_quantity: 1,
                status: "inactive".to_string(),
                description: Some("Out of season".to_string()),
                image_url: None,
            },
        ])
    }

    async fn create_collaborator(&self, draft: &CollaboratorDraft) -> Result<(), ServiceError> {
        draft.validate()?;
        info!("[dryrun] create collaborator {:?}", draft.brand_name);
        self.pause().await;
        Ok(())
    }

    async fn update_collaborator(&self, collaborator_id: &str, draft: &CollaboratorDraft) -> Result<(), ServiceError> {
        draft.validate()?;
        info!("[dryrun] update collaborator {}", collaborator_id);
        self.pause().await;
        Ok(())
    }

    async fn delete_collaborator(&self, collaborator_id: &str) -> Result<(), ServiceError> {
        info!("[dryrun] delete collaborator {}", collaborator_id);
        self.pause().await;
        Ok(())
    }

    async fn delete_product(&self, product_id: &str) -> Result<(), ServiceError> {
        info!("[dryrun] delete product {}", product_id);
        self.pause().await;
        Ok(())
    }

    fn target(&self) -> String {
        "dryrun".to_string()
    }
}

fn sample_collaborator(id: &str, name: &str, brand: &str, kind: &str, value: &str) -> Collaborator {
    Collaborator {
        collaborator_id: id.to_string(),
        name: name.to_string(),
        brand_name: brand.to_string(),
        email: format!("{}@example.com", brand.to_lowercase().replace(' ', ".")),
        phone: None,
        address: None,
        website: None,
        commission_type: kind.to_string(),
        commission_value: value.to_string(),
        min_order_quantity: 1,
        status: "active".to_string(),
    }
}
