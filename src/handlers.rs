pub mod auth;
pub mod bails;
pub mod clients;
pub mod documents;
pub mod intake;
pub mod notaire;
pub mod notifications;
pub mod properties;
