use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::customermodel::{Customer, CustomerProfile};

#[derive(Debug, Clone, Validate, Serialize, Deserialize)]
pub struct CreateCustomerDto {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,

    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,

    #[validate(email(message = "Email is invalid"))]
    pub email: String,

    pub phone: Option<String>,
    pub address: Option<String>,
    pub apt_unit: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub source: Option<String>,
}

impl CreateCustomerDto {
    pub fn into_profile(self) -> CustomerProfile {
        CustomerProfile {
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            phone: self.phone,
            address: self.address,
            apt_unit: self.apt_unit,
            city: self.city,
            state: self.state,
            zip_code: self.zip_code,
            source: self.source,
        }
    }
}

#[derive(Debug, Validate, Serialize, Deserialize)]
pub struct CustomerQueryDto {
    #[validate(range(min = 1))]
    pub page: Option<u32>,

    #[validate(range(min = 1, max = 50))]
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerResponseDto {
    pub status: String,
    pub data: Customer,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CustomerListResponseDto {
    pub status: String,
    pub results: usize,
    pub customers: Vec<Customer>,
}
