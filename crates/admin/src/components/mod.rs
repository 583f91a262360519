//! Text components for the console screens.

pub mod dashboard;
pub mod data_table;

pub use dashboard::{render_dashboard, render_request_detail, render_requests, render_users};
pub use data_table::{DataTableConfig, TableColumn};
