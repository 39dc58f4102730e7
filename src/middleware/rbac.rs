// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    middleware::auth::AuthenticatedUser,
    models::auth::UserRole,
};

/// 1. O Trait que define quais papéis podem passar
pub trait RoleDef: Send + Sync + 'static {
    fn allowed() -> &'static [UserRole];
}

/// 2. O Extractor (Guardião). Carrega o usuário para o handler usar.
pub struct RequireRole<T> {
    pub user: AuthenticatedUser,
    _marker: PhantomData<T>,
}

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        if !user.has_role(T::allowed()) {
            tracing::warn!(user_id = %user.0.id, role = ?user.0.role, "acesso negado");
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole { user, _marker: PhantomData })
    }
}

// ---
// DEFINIÇÃO DOS PAPÉIS (TIPOS)
// ---

pub struct Admin;
impl RoleDef for Admin {
    fn allowed() -> &'static [UserRole] { &[UserRole::Admin] }
}

/// Equipe interna: administra clientes, bens e baux.
pub struct Staff;
impl RoleDef for Staff {
    fn allowed() -> &'static [UserRole] { &[UserRole::Admin, UserRole::Agent] }
}

/// Quem participa do dossiê notarial.
pub struct DossierAccess;
impl RoleDef for DossierAccess {
    fn allowed() -> &'static [UserRole] { &[UserRole::Admin, UserRole::Agent, UserRole::Notaire] }
}
