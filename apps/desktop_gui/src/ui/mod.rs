//! UI layer for desktop GUI: customer table and add-customer dialog.

pub mod app;

pub use app::CustomersApp;
