use serde::{Deserialize, Serialize};

use crate::domain::CustomerField;

/// Freely editable form values for a customer that has not been created yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub business_name: String,
}

impl CustomerDraft {
    pub fn field(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::FirstName => &self.first_name,
            CustomerField::LastName => &self.last_name,
            CustomerField::Email => &self.email,
            CustomerField::BusinessName => &self.business_name,
        }
    }

    pub fn field_mut(&mut self, field: CustomerField) -> &mut String {
        match field {
            CustomerField::FirstName => &mut self.first_name,
            CustomerField::LastName => &mut self.last_name,
            CustomerField::Email => &mut self.email,
            CustomerField::BusinessName => &mut self.business_name,
        }
    }

    pub fn set_field(&mut self, field: CustomerField, value: impl Into<String>) {
        *self.field_mut(field) = value.into();
    }

    pub fn is_empty(&self) -> bool {
        CustomerField::ALL
            .iter()
            .all(|field| self.field(*field).is_empty())
    }

    /// Required fields that are still blank, in form order.
    pub fn missing_required(&self) -> Vec<CustomerField> {
        CustomerField::ALL
            .into_iter()
            .filter(|field| field.is_required() && self.field(*field).trim().is_empty())
            .collect()
    }

    pub fn to_request(&self) -> CreateCustomerRequest {
        CreateCustomerRequest {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            business_name: if self.business_name.is_empty() {
                None
            } else {
                Some(self.business_name.clone())
            },
        }
    }
}

/// Body of `POST /api/customers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
}
