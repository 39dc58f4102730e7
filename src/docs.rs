// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Users ---
        handlers::auth::get_me,

        // --- Clients ---
        handlers::clients::create_client,
        handlers::clients::list_clients,
        handlers::clients::get_client,
        handlers::clients::delete_client,
        handlers::clients::convert_lead,
        handlers::clients::add_person,
        handlers::clients::set_primary_person,
        handlers::clients::update_person,
        handlers::clients::remove_person,
        handlers::clients::update_entreprise,

        // --- Completion ---
        handlers::clients::get_client_completion,
        handlers::clients::override_client_completion,
        handlers::properties::get_property_completion,
        handlers::properties::override_property_completion,

        // --- Properties ---
        handlers::properties::create_property,
        handlers::properties::list_properties,
        handlers::properties::get_property,
        handlers::properties::update_property,
        handlers::properties::delete_property,

        // --- Bails ---
        handlers::properties::list_property_bails,
        handlers::bails::create_bail,
        handlers::bails::get_bail,
        handlers::bails::transition_bail,

        // --- Documents ---
        handlers::documents::register_document,
        handlers::documents::list_documents,
        handlers::documents::delete_document,

        // --- Intake ---
        handlers::intake::create_link,
        handlers::intake::list_client_links,
        handlers::intake::revoke_link,
        handlers::intake::open_form,
        handlers::intake::submit_form,

        // --- Notaire ---
        handlers::notaire::assign_notaire,
        handlers::notaire::get_dossier,
        handlers::notaire::create_request,
        handlers::notaire::list_requests,
        handlers::notaire::update_request,
        handlers::notaire::post_message,
        handlers::notaire::list_messages,

        // --- Notifications ---
        handlers::notifications::list_unread,
        handlers::notifications::mark_read,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,

            // --- Clients ---
            models::client::ClientType,
            models::client::ProfilType,
            models::client::CompletionStatus,
            models::client::FamilyStatus,
            models::client::MatrimonialRegime,
            models::client::Client,
            models::client::Person,
            models::client::Entreprise,
            models::client::PersonWithDocuments,
            models::client::EntrepriseWithDocuments,
            models::client::ClientAggregate,
            models::client::PersonInput,
            models::client::EntrepriseInput,
            models::client::CreateClientPayload,
            models::client::AddPersonPayload,
            models::client::ConvertLeadPayload,

            // --- Completion ---
            models::completion::RequiredField,
            models::completion::Requirements,
            models::completion::CompletionCheck,
            models::completion::PersonCompletion,
            models::completion::EntrepriseCompletion,
            models::completion::DetailedClientCompletion,
            models::completion::CompletionReport,
            models::completion::OverrideCompletionPayload,
            services::completion_service::CompletionUpdate,
            services::completion_service::BailTransition,

            // --- Properties ---
            models::property::PropertyType,
            models::property::PropertyLegalStatus,
            models::property::PropertyStatus,
            models::property::Property,
            models::property::OwnerContact,
            models::property::PropertyAggregate,
            models::property::FurnitureInput,
            models::property::PropertyInput,
            models::property::CreatePropertyPayload,

            // --- Bails ---
            models::bail::BailType,
            models::bail::BailFamily,
            models::bail::BailStatus,
            models::bail::Bail,
            models::bail::BailParty,
            models::bail::BailDetail,
            models::bail::CreateBailPayload,
            models::bail::TransitionBailPayload,

            // --- Documents ---
            models::document::DocumentKind,
            models::document::Document,
            models::document::RegisterDocumentPayload,

            // --- Intake ---
            models::intake::IntakeTarget,
            models::intake::IntakeStatus,
            models::intake::IntakeLink,
            models::intake::CreateIntakeLinkPayload,
            models::intake::IntakeSubmission,
            models::intake::IntakeForm,

            // --- Notaire ---
            models::notaire::NotaireRequestType,
            models::notaire::NotaireRequestStatus,
            models::notaire::PartySide,
            models::notaire::DossierNotaireAssignment,
            models::notaire::NotaireRequest,
            models::notaire::BailMessage,
            models::notaire::AssignNotairePayload,
            models::notaire::CreateNotaireRequestPayload,
            models::notaire::UpdateNotaireRequestPayload,
            models::notaire::PostMessagePayload,

            // --- Notifications ---
            models::notification::NotificationType,
            models::notification::Notification,
        )
    ),
    tags(
        (name = "Users", description = "Usuário autenticado"),
        (name = "Clients", description = "Clientes, pessoas e empresas"),
        (name = "Completion", description = "Completude de dossiês de clientes e bens"),
        (name = "Properties", description = "Bens imobiliários"),
        (name = "Bails", description = "Baux e ciclo de vida"),
        (name = "Documents", description = "Metadados de documentos enviados"),
        (name = "Intake", description = "Formulários de coleta por link único"),
        (name = "Notaire", description = "Dossiê notarial, pedidos e mensagens"),
        (name = "Notifications", description = "Notificações internas")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}
