pub mod user_repo;
pub use user_repo::UserRepository;
pub mod client_repo;
pub use client_repo::ClientRepository;
pub mod property_repo;
pub use property_repo::PropertyRepository;
pub mod bail_repo;
pub use bail_repo::BailRepository;
pub mod document_repo;
pub use document_repo::DocumentRepository;
pub mod intake_repo;
pub use intake_repo::IntakeRepository;
pub mod notaire_repo;
pub use notaire_repo::NotaireRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;

pub mod completion_store;
pub use completion_store::{load_client_aggregate, load_property_aggregate, CompletionStore, PgCompletionStore};
