// BookWise shared type definitions
// Each submodule defines the records exchanged with the backend or persisted locally.

pub mod blog;
pub mod contact;
pub mod errors;
pub mod session;
pub mod settings;
pub mod stats;
pub mod summary;
pub mod user_data;
