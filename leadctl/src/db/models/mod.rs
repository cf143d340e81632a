//! Database row types and create/update request models.

pub mod chats;
pub mod leads;
pub mod settings;
