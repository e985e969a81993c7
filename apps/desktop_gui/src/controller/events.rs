//! UI/backend events and error modeling for desktop GUI controller.

use client_core::CustomersSession;

pub enum UiEvent {
    SessionReady(CustomersSession),
    CustomerCreated { email: Option<String> },
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    CreateCustomer,
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("invalid")
            || message_lower.contains("already exists")
            || message_lower.contains("required")
            || message_lower.contains("must ")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("runtime")
            || message_lower.contains("unavailable")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Status bar text. Create failures are already shown inside the dialog.
    pub fn status_line(&self) -> String {
        match self.context {
            UiErrorContext::BackendStartup => {
                format!("Backend worker startup failure: {}", self.message)
            }
            UiErrorContext::CreateCustomer => match self.category {
                UiErrorCategory::Validation => "Customer was not created; fix the form and retry."
                    .to_string(),
                UiErrorCategory::Transport | UiErrorCategory::Unknown => {
                    format!("Customer was not created: {}", self.message)
                }
            },
        }
    }
}
