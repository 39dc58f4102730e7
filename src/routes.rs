// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn router(app_state: AppState) -> Router {
    let client_routes = Router::new()
        .route("/", post(handlers::clients::create_client).get(handlers::clients::list_clients))
        .route("/{id}", get(handlers::clients::get_client).delete(handlers::clients::delete_client))
        .route("/{id}/convert", post(handlers::clients::convert_lead))
        .route("/{id}/persons", post(handlers::clients::add_person))
        .route("/{id}/persons/{person_id}/primary", post(handlers::clients::set_primary_person))
        .route(
            "/{id}/completion",
            get(handlers::clients::get_client_completion).put(handlers::clients::override_client_completion),
        )
        .route("/{id}/intake-links", get(handlers::intake::list_client_links));

    let property_routes = Router::new()
        .route("/", post(handlers::properties::create_property).get(handlers::properties::list_properties))
        .route(
            "/{id}",
            get(handlers::properties::get_property)
                .patch(handlers::properties::update_property)
                .delete(handlers::properties::delete_property),
        )
        .route("/{id}/bails", get(handlers::properties::list_property_bails))
        .route(
            "/{id}/completion",
            get(handlers::properties::get_property_completion)
                .put(handlers::properties::override_property_completion),
        );

    let bail_routes = Router::new()
        .route("/", post(handlers::bails::create_bail))
        .route("/{id}", get(handlers::bails::get_bail))
        .route("/{id}/transition", post(handlers::bails::transition_bail))
        .route("/{id}/notaire", put(handlers::notaire::assign_notaire).get(handlers::notaire::get_dossier))
        .route(
            "/{id}/notaire/requests",
            post(handlers::notaire::create_request).get(handlers::notaire::list_requests),
        )
        .route("/{id}/notaire/requests/{request_id}", patch(handlers::notaire::update_request))
        .route("/{id}/messages", post(handlers::notaire::post_message).get(handlers::notaire::list_messages));

    let document_routes = Router::new()
        .route("/", post(handlers::documents::register_document).get(handlers::documents::list_documents))
        .route("/{id}", delete(handlers::documents::delete_document));

    let intake_link_routes = Router::new()
        .route("/", post(handlers::intake::create_link))
        .route("/{id}/revoke", post(handlers::intake::revoke_link));

    let notification_routes = Router::new()
        .route("/", get(handlers::notifications::list_unread))
        .route("/{id}/read", post(handlers::notifications::mark_read));

    // Tudo abaixo exige Bearer válido
    let protected = Router::new()
        .route("/api/users/me", get(handlers::auth::get_me))
        .nest("/api/clients", client_routes)
        .route(
            "/api/persons/{id}",
            patch(handlers::clients::update_person).delete(handlers::clients::remove_person),
        )
        .route("/api/entreprises/{id}", patch(handlers::clients::update_entreprise))
        .nest("/api/properties", property_routes)
        .nest("/api/bails", bail_routes)
        .nest("/api/documents", document_routes)
        .nest("/api/intake-links", intake_link_routes)
        .nest("/api/notifications", notification_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // O formulário de intake é público: o token do link é a credencial
    let public = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route(
            "/api/intake/{token}",
            get(handlers::intake::open_form).post(handlers::intake::submit_form),
        );

    Router::new()
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", ApiDoc::openapi()))
        .merge(public)
        .merge(protected)
        .with_state(app_state)
}
