use serde::{Deserialize, Serialize};

/// Customer record as returned by the customers endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}

/// Collection in server order. Never re-sorted client-side.
pub type Customers = Vec<Customer>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomerField {
    FirstName,
    LastName,
    Email,
    BusinessName,
}

impl CustomerField {
    pub const ALL: [CustomerField; 4] = [
        CustomerField::FirstName,
        CustomerField::LastName,
        CustomerField::Email,
        CustomerField::BusinessName,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CustomerField::FirstName => "First Name",
            CustomerField::LastName => "Last Name",
            CustomerField::Email => "Email Address",
            CustomerField::BusinessName => "Business Name",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, CustomerField::BusinessName)
    }
}
