//! API endpoint implementations.

mod auth;
mod dashboard;
mod email;
mod enquiries;
mod health;

pub use auth::AuthApi;
pub use dashboard::DashboardApi;
pub use email::EmailApi;
pub use enquiries::EnquiriesApi;
pub use health::HealthApi;
