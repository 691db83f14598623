use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::engagementmodel::{Lead, LeadStatus, LeadTemperature, Review};

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct CreateReviewDto {
    pub booking_id: Uuid,

    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    pub comment: Option<String>,
    pub would_recommend: Option<bool>,
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct ReviewQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    /// Restrict to one cleaner's reviews; otherwise public reviews only.
    pub cleaner_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewResponseDto {
    pub status: String,
    pub data: Review,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReviewListResponseDto {
    pub status: String,
    pub results: usize,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct CreateLeadDto {
    pub name: Option<String>,

    #[validate(email(message = "Email is invalid"))]
    pub email: Option<String>,

    pub phone: Option<String>,
    pub source: Option<String>,
    pub temperature: Option<LeadTemperature>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateLeadStatusDto {
    pub status: LeadStatus,
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct LeadQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,

    pub status: Option<LeadStatus>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeadResponseDto {
    pub status: String,
    pub data: Lead,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LeadListResponseDto {
    pub status: String,
    pub results: usize,
    pub leads: Vec<Lead>,
}
