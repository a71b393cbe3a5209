// BookWise state managers
// Managers own a document in a key-value store: admin/visitor session, per-user data, admin stats.

pub mod session_manager;
pub mod stats_manager;
pub mod user_data_manager;
