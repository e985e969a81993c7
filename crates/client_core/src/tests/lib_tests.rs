use super::*;
use crate::{
    render::ListView,
    test_support::{customer, echoed},
};
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use shared::{
    domain::{Customer, CustomerField},
    error::ApiError,
    protocol::CreateCustomerRequest,
};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone)]
struct CustomersServer {
    customers: Arc<Mutex<Vec<Customer>>>,
    list_requests: Arc<Mutex<u32>>,
}

async fn list_customers(State(state): State<CustomersServer>) -> Json<Vec<Customer>> {
    *state.list_requests.lock().await += 1;
    Json(state.customers.lock().await.clone())
}

async fn create_customer(
    State(state): State<CustomersServer>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<Customer>), (StatusCode, Json<ApiError>)> {
    let mut customers = state.customers.lock().await;
    if customers.iter().any(|c| c.email == payload.email) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("VALIDATION", "Email already exists")),
        ));
    }
    let created = echoed(payload);
    customers.push(created.clone());
    Ok((StatusCode::CREATED, Json(created)))
}

async fn spawn_customers_server(
    seed: Vec<Customer>,
) -> std::io::Result<(ClientSettings, CustomersServer)> {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = CustomersServer {
        customers: Arc::new(Mutex::new(seed)),
        list_requests: Arc::new(Mutex::new(0)),
    };
    let app = Router::new()
        .route("/api/customers", get(list_customers).post(create_customer))
        .with_state(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    let settings = ClientSettings {
        api_base_url: format!("http://{addr}"),
        ..ClientSettings::default()
    };
    Ok((settings, state))
}

fn table_lines(session: &CustomersSession) -> Vec<String> {
    match ListView::from_snapshot(&session.list.snapshot()) {
        ListView::Table(rows) => rows.iter().map(|row| row.to_line()).collect(),
        other => panic!("expected table, got {other:?}"),
    }
}

#[tokio::test]
async fn add_customer_round_trip_refreshes_table_in_server_order() {
    let (settings, server) = spawn_customers_server(vec![customer(
        "Jane",
        "Doe",
        "jane@x.com",
        None,
    )])
    .await
    .expect("spawn server");
    let session = CustomersSession::connect(&settings, Handle::current()).expect("session");

    session.list.wait_idle().await;
    assert_eq!(table_lines(&session), vec!["Jane | Doe | jane@x.com | -"]);

    session.form.open();
    session.form.set_field(CustomerField::FirstName, "Sam");
    session.form.set_field(CustomerField::LastName, "Lee");
    session.form.set_field(CustomerField::Email, "sam@x.com");
    session.form.set_field(CustomerField::BusinessName, "Acme");
    session.form.submit().await.expect("submit");
    session.list.wait_idle().await;

    assert!(!session.form.snapshot().is_open());
    assert_eq!(*server.list_requests.lock().await, 2);
    assert_eq!(
        table_lines(&session),
        vec![
            "Jane | Doe | jane@x.com | -",
            "Sam | Lee | sam@x.com | Acme"
        ]
    );
}

#[tokio::test]
async fn duplicate_email_keeps_dialog_open_with_server_message() {
    let (settings, server) = spawn_customers_server(vec![customer(
        "Jane",
        "Doe",
        "jane@x.com",
        None,
    )])
    .await
    .expect("spawn server");
    let session = CustomersSession::connect(&settings, Handle::current()).expect("session");
    session.list.wait_idle().await;

    session.form.open();
    session.form.set_field(CustomerField::FirstName, "Janet");
    session.form.set_field(CustomerField::LastName, "Doe");
    session.form.set_field(CustomerField::Email, "jane@x.com");
    let err = session.form.submit().await.expect_err("duplicate");

    assert_eq!(err.to_string(), "Email already exists");
    let form = session.form.snapshot();
    assert!(form.is_open());
    assert_eq!(form.draft.first_name, "Janet");
    assert_eq!(form.notice.as_deref(), Some("Email already exists"));
    assert_eq!(*server.list_requests.lock().await, 1);
    assert_eq!(table_lines(&session).len(), 1);
}

#[tokio::test]
async fn unreachable_api_shows_inline_fetch_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let settings = ClientSettings {
        api_base_url: format!("http://{addr}"),
        ..ClientSettings::default()
    };

    let session = CustomersSession::connect(&settings, Handle::current()).expect("session");
    session.list.wait_idle().await;

    assert_eq!(
        ListView::from_snapshot(&session.list.snapshot()),
        ListView::Error("Error: Failed to load customers".into())
    );
}

#[test]
fn connect_rejects_invalid_endpoint() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("runtime");
    let settings = ClientSettings {
        api_base_url: "not a url".into(),
        ..ClientSettings::default()
    };
    assert!(CustomersSession::connect(&settings, runtime.handle().clone()).is_err());
}
