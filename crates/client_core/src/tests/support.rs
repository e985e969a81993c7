//! In-memory `CustomersApi` whose replies can be held back to control arrival order.

use std::collections::VecDeque;

use async_trait::async_trait;
use shared::{
    domain::{Customer, Customers},
    error::ApiError,
    protocol::CreateCustomerRequest,
};
use tokio::sync::{oneshot, watch, Mutex};

use crate::{api::CustomersApi, error::RequestError};

pub(crate) type ListResult = Result<Customers, RequestError>;
pub(crate) type CreateResult = Result<Option<Customer>, RequestError>;

enum Reply<T> {
    Ready(T),
    Gated(oneshot::Receiver<T>),
}

impl<U> Reply<Result<U, RequestError>> {
    async fn resolve(self) -> Result<U, RequestError> {
        match self {
            Reply::Ready(value) => value,
            Reply::Gated(rx) => rx
                .await
                .unwrap_or_else(|_| Err(RequestError::Transport("gate dropped".into()))),
        }
    }
}

pub(crate) struct FakeCustomersApi {
    list_replies: Mutex<VecDeque<Reply<ListResult>>>,
    default_list: Mutex<ListResult>,
    create_replies: Mutex<VecDeque<Reply<CreateResult>>>,
    list_calls: watch::Sender<usize>,
    create_calls: watch::Sender<usize>,
    created: Mutex<Vec<CreateCustomerRequest>>,
}

impl FakeCustomersApi {
    pub(crate) fn new() -> Self {
        let (list_calls, _) = watch::channel(0);
        let (create_calls, _) = watch::channel(0);
        Self {
            list_replies: Mutex::new(VecDeque::new()),
            default_list: Mutex::new(Ok(Vec::new())),
            create_replies: Mutex::new(VecDeque::new()),
            list_calls,
            create_calls,
            created: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_customers(customers: Customers) -> Self {
        let api = Self::new();
        *api.default_list.try_lock().expect("fresh fake") = Ok(customers);
        api
    }

    pub(crate) async fn push_list(&self, reply: ListResult) {
        self.list_replies.lock().await.push_back(Reply::Ready(reply));
    }

    pub(crate) async fn gate_list(&self) -> oneshot::Sender<ListResult> {
        let (tx, rx) = oneshot::channel();
        self.list_replies.lock().await.push_back(Reply::Gated(rx));
        tx
    }

    pub(crate) async fn push_create(&self, reply: CreateResult) {
        self.create_replies
            .lock()
            .await
            .push_back(Reply::Ready(reply));
    }

    pub(crate) async fn gate_create(&self) -> oneshot::Sender<CreateResult> {
        let (tx, rx) = oneshot::channel();
        self.create_replies.lock().await.push_back(Reply::Gated(rx));
        tx
    }

    pub(crate) fn list_calls(&self) -> usize {
        *self.list_calls.borrow()
    }

    pub(crate) fn create_calls(&self) -> usize {
        *self.create_calls.borrow()
    }

    pub(crate) async fn wait_for_list_calls(&self, count: usize) {
        let mut rx = self.list_calls.subscribe();
        let _ = rx.wait_for(|calls| *calls >= count).await;
    }

    pub(crate) async fn wait_for_create_calls(&self, count: usize) {
        let mut rx = self.create_calls.subscribe();
        let _ = rx.wait_for(|calls| *calls >= count).await;
    }

    pub(crate) async fn created(&self) -> Vec<CreateCustomerRequest> {
        self.created.lock().await.clone()
    }
}

#[async_trait]
impl CustomersApi for FakeCustomersApi {
    async fn list_customers(&self) -> Result<Customers, RequestError> {
        let reply = self.list_replies.lock().await.pop_front();
        self.list_calls.send_modify(|calls| *calls += 1);
        match reply {
            Some(reply) => reply.resolve().await,
            None => self.default_list.lock().await.clone(),
        }
    }

    async fn create_customer(
        &self,
        request: &CreateCustomerRequest,
    ) -> Result<Option<Customer>, RequestError> {
        let reply = self.create_replies.lock().await.pop_front();
        self.created.lock().await.push(request.clone());
        self.create_calls.send_modify(|calls| *calls += 1);
        match reply {
            Some(reply) => reply.resolve().await,
            None => Ok(None),
        }
    }
}

pub(crate) fn customer(first: &str, last: &str, email: &str, business: Option<&str>) -> Customer {
    Customer {
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: email.to_string(),
        business_name: business.map(str::to_string),
    }
}

/// What a customers server echoes back for an accepted create request.
pub(crate) fn echoed(request: CreateCustomerRequest) -> Customer {
    Customer {
        first_name: request.first_name,
        last_name: request.last_name,
        email: request.email,
        business_name: request.business_name,
    }
}

pub(crate) fn rejected(status: u16, code: &str, message: &str) -> RequestError {
    RequestError::Status {
        status,
        body: Some(ApiError::new(code, message)),
    }
}
