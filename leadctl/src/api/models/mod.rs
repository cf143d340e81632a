//! API request/response models.

pub mod chats;
pub mod dashboard;
pub mod leads;
pub mod reports;
pub mod settings;
