use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A catalog item with on-hand stock
#[derive(Clone, Debug, Serialize)]
pub struct Sweet {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sweet {
    pub fn new(name: String, category: String, price: f64, quantity: u32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            category,
            price,
            quantity,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSweetRequest {
    pub name: String,
    pub category: String,
    pub price: f64,
    pub quantity: Option<u32>,
}

/// Partial update: absent fields keep their stored value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSweetRequest {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PurchaseRequest {
    pub quantity: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    pub name: Option<String>,
    pub category: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

#[derive(Serialize)]
pub struct SweetResponse {
    pub message: String,
    pub sweet: Sweet,
}

#[derive(Serialize)]
pub struct SweetListResponse {
    pub sweets: Vec<Sweet>,
}

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
