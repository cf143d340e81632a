//! Repository implementations over Postgres connections.
//!
//! Repositories are thin structs constructed over a `&mut PgConnection`
//! (either a pooled connection or an open transaction), so callers control
//! transaction boundaries.

pub mod chats;
pub mod leads;
pub mod repository;
pub mod settings;

pub use chats::Chats;
pub use leads::Leads;
pub use repository::Repository;
pub use settings::Settings;
