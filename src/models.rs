pub mod auth;
pub mod bail;
pub mod client;
pub mod completion;
pub mod document;
pub mod intake;
pub mod notaire;
pub mod notification;
pub mod property;
