use std::sync::Arc;

use tokio::runtime::Handle;

pub mod add_customer_form;
pub mod api;
pub mod config;
pub mod error;
pub mod list_store;
pub mod render;

pub use add_customer_form::{AddCustomerForm, DialogState, FormSnapshot};
pub use api::{CustomersApi, HttpCustomersApi};
pub use config::{load_settings, ClientSettings, ConfigError};
pub use error::{FetchError, RequestError, SubmitError};
pub use list_store::{FetchState, ListSnapshot, ListStore};

/// List store and add form wired to the same endpoint, scoped to one client session.
#[derive(Clone)]
pub struct CustomersSession {
    pub list: ListStore,
    pub form: AddCustomerForm,
}

impl CustomersSession {
    /// Mounts the list store, which starts the initial fetch on `runtime`.
    pub fn start(api: Arc<dyn CustomersApi>, runtime: Handle) -> Self {
        let list = ListStore::mount(Arc::clone(&api), runtime);
        let form = AddCustomerForm::new(api, list.clone());
        Self { list, form }
    }

    pub fn connect(settings: &ClientSettings, runtime: Handle) -> Result<Self, ConfigError> {
        let api = HttpCustomersApi::from_settings(settings)?;
        tracing::info!(endpoint = %api.endpoint(), "customers session starting");
        Ok(Self::start(Arc::new(api), runtime))
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod test_support;

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
