pub mod auth;

// Motor de completude
pub mod requirements;
pub mod completion_checker;
pub mod completion_status;
pub mod completion_service;
pub mod mailer;

pub mod client_service;
pub mod property_service;
pub mod bail_service;
pub mod document_service;
pub mod intake_service;
pub mod notaire_service;
pub mod notification_service;
