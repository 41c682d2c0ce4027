mod contact;
mod health;
mod metrics;
mod portfolio;

pub use contact::{create_contact_message, list_contact_messages, mark_message_read};
pub use health::{detailed_health_handler, health_handler};
pub use metrics::{metrics_handler, prometheus_handler};
pub use portfolio::{get_portfolio, update_portfolio};
