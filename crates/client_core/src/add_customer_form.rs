use std::sync::Arc;

use shared::{
    domain::{Customer, CustomerField},
    protocol::{CreateCustomerRequest, CustomerDraft},
};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::{api::CustomersApi, error::SubmitError, list_store::ListStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormSnapshot {
    pub dialog: DialogState,
    pub draft: CustomerDraft,
    pub submitting: bool,
    /// Failure notice from the last rejected submit.
    pub notice: Option<String>,
    /// Bumped each time a closed dialog opens; a submit only touches the
    /// dialog it was started from.
    dialog_id: u64,
}

impl FormSnapshot {
    pub fn is_open(&self) -> bool {
        self.dialog == DialogState::Open
    }

    pub fn missing_required(&self) -> Vec<CustomerField> {
        self.draft.missing_required()
    }

    /// Whether the submit button should be enabled.
    pub fn can_submit(&self) -> bool {
        self.is_open() && !self.submitting && self.draft.missing_required().is_empty()
    }
}

struct AddCustomerFormInner {
    api: Arc<dyn CustomersApi>,
    list: ListStore,
    state: watch::Sender<FormSnapshot>,
}

/// Dialog visibility and draft for creating one customer at a time.
#[derive(Clone)]
pub struct AddCustomerForm {
    inner: Arc<AddCustomerFormInner>,
}

impl AddCustomerForm {
    pub fn new(api: Arc<dyn CustomersApi>, list: ListStore) -> Self {
        let (state, _) = watch::channel(FormSnapshot::default());
        Self {
            inner: Arc::new(AddCustomerFormInner { api, list, state }),
        }
    }

    pub fn snapshot(&self) -> FormSnapshot {
        self.inner.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormSnapshot> {
        self.inner.state.subscribe()
    }

    pub fn open(&self) {
        self.inner.state.send_modify(|form| {
            if !form.is_open() {
                form.dialog_id += 1;
            }
            form.dialog = DialogState::Open;
            form.notice = None;
        });
    }

    pub fn cancel(&self) {
        self.inner.state.send_modify(|form| {
            form.dialog = DialogState::Closed;
            form.draft = CustomerDraft::default();
            form.notice = None;
        });
    }

    pub fn set_field(&self, field: CustomerField, value: impl Into<String>) {
        let value = value.into();
        self.inner.state.send_if_modified(|form| {
            if form.draft.field(field) == value {
                return false;
            }
            form.draft.set_field(field, value);
            true
        });
    }

    /// Posts the current draft.
    ///
    /// Refused while another submit is pending or the dialog is closed. On
    /// rejection the dialog stays open with the draft intact and the notice
    /// set; on success the dialog closes, the draft resets and the list
    /// store is asked to revalidate. If the dialog was cancelled and opened
    /// again meanwhile, the outcome only clears the pending flag.
    pub async fn submit(&self) -> Result<Option<Customer>, SubmitError> {
        let (dialog_id, request) = self.claim_submission()?;

        match self.inner.api.create_customer(&request).await {
            Ok(created) => {
                self.inner.state.send_modify(|form| {
                    form.submitting = false;
                    if form.dialog_id == dialog_id {
                        form.dialog = DialogState::Closed;
                        form.draft = CustomerDraft::default();
                        form.notice = None;
                    }
                });
                info!(
                    email = %request.email,
                    echoed = created.is_some(),
                    "customer created"
                );
                let _ = self.inner.list.revalidate();
                Ok(created)
            }
            Err(err) => {
                warn!(error = %err, "customer create failed");
                let rejection = SubmitError::from_request(&err);
                self.inner.state.send_modify(|form| {
                    form.submitting = false;
                    if form.dialog_id == dialog_id {
                        form.notice = Some(rejection.to_string());
                    }
                });
                Err(rejection)
            }
        }
    }

    fn claim_submission(&self) -> Result<(u64, CreateCustomerRequest), SubmitError> {
        let mut claim = Err(SubmitError::DialogClosed);
        self.inner.state.send_if_modified(|form| {
            if !form.is_open() {
                return false;
            }
            if form.submitting {
                claim = Err(SubmitError::AlreadyPending);
                return false;
            }
            form.submitting = true;
            form.notice = None;
            claim = Ok((form.dialog_id, form.draft.to_request()));
            true
        });
        if let Err(refusal) = &claim {
            warn!(reason = %refusal, "submit ignored");
        }
        claim
    }
}

#[cfg(test)]
#[path = "tests/add_customer_form_tests.rs"]
mod tests;
