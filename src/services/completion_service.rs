// src/services/completion_service.rs

use std::sync::Arc;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CompletionStore,
    models::{
        bail::{BailPropagationView, BailStatus},
        client::{ClientAggregate, CompletionStatus},
        completion::{CompletionReport, DetailedClientCompletion},
        notification::{NewNotification, NotificationType},
        property::PropertyAggregate,
    },
    services::{
        completion_checker::{self, check_property, property_requirements},
        completion_status::{evaluate_client, evaluate_property},
        mailer::{Mailer, StatusChangeEmail},
    },
};

/// Resultado de um recálculo (ou de uma alteração manual) de completude.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionUpdate {
    pub previous: CompletionStatus,
    pub current: CompletionStatus,
    pub bail_transitions: Vec<BailTransition>,
}

impl CompletionUpdate {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BailTransition {
    pub bail_id: Uuid,
    pub from: BailStatus,
    pub to: BailStatus,
}

/// Decide a transição automática de um bail a partir do status das três partes.
/// Sem proprietário, locatário ou bem, o bail não é avaliado.
pub fn next_bail_status(view: &BailPropagationView) -> Option<BailStatus> {
    let (Some(owner), Some(tenant), Some(property)) = (view.owner_status, view.tenant_status, view.property_status)
    else {
        return None;
    };

    let all = |status: CompletionStatus| owner == status && tenant == status && property == status;

    if all(CompletionStatus::Completed) && view.status.is_open_for_propagation() {
        Some(BailStatus::ReadyForNotary)
    } else if all(CompletionStatus::PendingCheck) && view.status == BailStatus::Draft {
        Some(BailStatus::PendingValidation)
    } else {
        None
    }
}

#[derive(Clone)]
pub struct CompletionService {
    store: Arc<dyn CompletionStore>,
    mailer: Arc<dyn Mailer>,
    app_base_url: String,
}

impl CompletionService {
    pub fn new(store: Arc<dyn CompletionStore>, mailer: Arc<dyn Mailer>, app_base_url: String) -> Self {
        Self {
            store,
            mailer,
            app_base_url: app_base_url.trim_end_matches('/').to_string(),
        }
    }

    // =========================================================================
    //  LEITURA
    // =========================================================================

    pub async fn client_completion(&self, client_id: Uuid) -> Result<DetailedClientCompletion, AppError> {
        completion_checker::check_client_completion_detailed(self.store.as_ref(), client_id).await
    }

    pub async fn property_report(&self, property_id: Uuid) -> Result<CompletionReport, AppError> {
        let aggregate = self
            .store
            .load_property(property_id)
            .await?
            .ok_or(AppError::PropertyNotFound)?;

        let requirements = property_requirements(&aggregate);
        let check = check_property(&aggregate, &requirements);

        Ok(CompletionReport {
            status: aggregate.property.completion_status,
            requirements,
            check,
        })
    }

    // =========================================================================
    //  RECÁLCULO AUTOMÁTICO
    // =========================================================================

    /// Chamado depois de toda mutação que possa afetar a completude do cliente.
    pub async fn update_client_completion_status(&self, client_id: Uuid) -> Result<CompletionUpdate, AppError> {
        let Some(aggregate) = self.store.load_client(client_id).await? else {
            tracing::debug!(%client_id, "cliente inexistente, nada a recalcular");
            return Ok(CompletionUpdate {
                previous: CompletionStatus::NotStarted,
                current: CompletionStatus::NotStarted,
                bail_transitions: vec![],
            });
        };

        let previous = aggregate.client.completion_status;
        let current = evaluate_client(&aggregate);

        if current != previous {
            self.store.set_client_completion(client_id, current).await?;
            self.announce_client_change(&aggregate, previous, current).await?;
        }

        // Mesmo sem mudança local, outra parte pode ter destravado o bail
        let bail_transitions = self.propagate_from_client(client_id).await?;

        Ok(CompletionUpdate { previous, current, bail_transitions })
    }

    pub async fn update_property_completion_status(&self, property_id: Uuid) -> Result<CompletionUpdate, AppError> {
        let Some(aggregate) = self.store.load_property(property_id).await? else {
            tracing::debug!(%property_id, "bem inexistente, nada a recalcular");
            return Ok(CompletionUpdate {
                previous: CompletionStatus::NotStarted,
                current: CompletionStatus::NotStarted,
                bail_transitions: vec![],
            });
        };

        let previous = aggregate.property.completion_status;
        let current = evaluate_property(&aggregate);

        if current != previous {
            self.store.set_property_completion(property_id, current).await?;
            self.announce_property_change(&aggregate, previous, current).await?;
        }

        let bail_transitions = self.propagate_from_property(property_id).await?;

        Ok(CompletionUpdate { previous, current, bail_transitions })
    }

    // =========================================================================
    //  ALTERAÇÃO MANUAL (admin)
    // =========================================================================

    /// Único caminho que tira um cliente de PENDING_CHECK ou COMPLETED.
    pub async fn override_client_completion_status(
        &self,
        client_id: Uuid,
        status: CompletionStatus,
    ) -> Result<CompletionUpdate, AppError> {
        let aggregate = self
            .store
            .load_client(client_id)
            .await?
            .ok_or(AppError::ClientNotFound)?;

        let previous = aggregate.client.completion_status;
        self.store.set_client_completion(client_id, status).await?;

        if status != previous {
            tracing::info!(%client_id, from = previous.as_str(), to = status.as_str(), "status do cliente alterado manualmente");
            self.announce_client_change(&aggregate, previous, status).await?;
        }

        let bail_transitions = self.propagate_from_client(client_id).await?;

        Ok(CompletionUpdate { previous, current: status, bail_transitions })
    }

    pub async fn override_property_completion_status(
        &self,
        property_id: Uuid,
        status: CompletionStatus,
    ) -> Result<CompletionUpdate, AppError> {
        let aggregate = self
            .store
            .load_property(property_id)
            .await?
            .ok_or(AppError::PropertyNotFound)?;

        let previous = aggregate.property.completion_status;
        self.store.set_property_completion(property_id, status).await?;

        if status != previous {
            tracing::info!(%property_id, from = previous.as_str(), to = status.as_str(), "status do bem alterado manualmente");
            self.announce_property_change(&aggregate, previous, status).await?;
        }

        let bail_transitions = self.propagate_from_property(property_id).await?;

        Ok(CompletionUpdate { previous, current: status, bail_transitions })
    }

    // =========================================================================
    //  PROPAGAÇÃO PARA OS BAUX
    // =========================================================================

    pub async fn propagate_from_client(&self, client_id: Uuid) -> Result<Vec<BailTransition>, AppError> {
        let views = self.store.open_bails_for_client(client_id).await?;
        self.apply_transitions(views).await
    }

    pub async fn propagate_from_property(&self, property_id: Uuid) -> Result<Vec<BailTransition>, AppError> {
        let views = self.store.open_bails_for_property(property_id).await?;
        self.apply_transitions(views).await
    }

    async fn apply_transitions(&self, views: Vec<BailPropagationView>) -> Result<Vec<BailTransition>, AppError> {
        let mut applied = Vec::new();

        for view in views {
            let Some(next) = next_bail_status(&view) else {
                continue;
            };

            // Troca condicional: se outra chamada já moveu o bail, não repetimos
            if !self.store.transition_bail(view.bail_id, view.status, next).await? {
                continue;
            }

            tracing::info!(bail_id = %view.bail_id, from = view.status.as_str(), to = next.as_str(), "bail avançou");

            self.store
                .record_notification(NewNotification::for_bail(
                    NotificationType::BailStatusChanged,
                    view.bail_id,
                    format!("Bail passé de {} à {}", view.status.as_str(), next.as_str()),
                ))
                .await?;

            applied.push(BailTransition {
                bail_id: view.bail_id,
                from: view.status,
                to: next,
            });
        }

        Ok(applied)
    }

    // =========================================================================
    //  NOTIFICAÇÃO + E-MAIL
    // =========================================================================

    async fn announce_client_change(
        &self,
        aggregate: &ClientAggregate,
        previous: CompletionStatus,
        current: CompletionStatus,
    ) -> Result<(), AppError> {
        let client_id = aggregate.client.id;
        let name = aggregate.display_name();

        self.store
            .record_notification(NewNotification::for_client(
                NotificationType::CompletionStatusChanged,
                client_id,
                format!("{} : {} → {}", name, previous.as_str(), current.as_str()),
            ))
            .await?;

        match aggregate.contact_email() {
            Some(recipient) => self.dispatch_email(StatusChangeEmail {
                recipient,
                entity_name: name,
                old_status: previous,
                new_status: current,
                dashboard_url: format!("{}/clients/{}", self.app_base_url, client_id),
                profil_type: aggregate.client.profil_type,
            }),
            None => tracing::debug!(%client_id, "cliente sem e-mail, aviso não enviado"),
        }

        Ok(())
    }

    async fn announce_property_change(
        &self,
        aggregate: &PropertyAggregate,
        previous: CompletionStatus,
        current: CompletionStatus,
    ) -> Result<(), AppError> {
        let property_id = aggregate.property.id;
        let name = aggregate.property.display_name();

        self.store
            .record_notification(NewNotification::for_property(
                NotificationType::CompletionStatusChanged,
                property_id,
                format!("{} : {} → {}", name, previous.as_str(), current.as_str()),
            ))
            .await?;

        let Some(owner) = &aggregate.owner else {
            return Ok(());
        };

        match owner.email.clone() {
            Some(recipient) => self.dispatch_email(StatusChangeEmail {
                recipient,
                entity_name: name,
                old_status: previous,
                new_status: current,
                dashboard_url: format!("{}/properties/{}", self.app_base_url, property_id),
                profil_type: owner.profil_type,
            }),
            None => tracing::debug!(%property_id, "proprietário sem e-mail, aviso não enviado"),
        }

        Ok(())
    }

    /// Dispara e esquece: a falha só vai para o log.
    fn dispatch_email(&self, email: StatusChangeEmail) {
        let mailer = Arc::clone(&self.mailer);

        tokio::spawn(async move {
            if let Err(e) = mailer.send_status_change(&email).await {
                tracing::error!(error = ?e, recipient = %email.recipient, "falha ao enviar e-mail de status");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use CompletionStatus::*;

    fn view(status: BailStatus, owner: Option<CompletionStatus>, tenant: Option<CompletionStatus>, property: Option<CompletionStatus>) -> BailPropagationView {
        BailPropagationView {
            bail_id: Uuid::new_v4(),
            status,
            owner_status: owner,
            tenant_status: tenant,
            property_status: property,
        }
    }

    #[test]
    fn all_completed_is_ready_for_notary() {
        let v = view(BailStatus::Draft, Some(Completed), Some(Completed), Some(Completed));
        assert_eq!(next_bail_status(&v), Some(BailStatus::ReadyForNotary));

        let v = view(BailStatus::PendingValidation, Some(Completed), Some(Completed), Some(Completed));
        assert_eq!(next_bail_status(&v), Some(BailStatus::ReadyForNotary));
    }

    #[test]
    fn all_pending_check_only_moves_drafts() {
        let v = view(BailStatus::Draft, Some(PendingCheck), Some(PendingCheck), Some(PendingCheck));
        assert_eq!(next_bail_status(&v), Some(BailStatus::PendingValidation));

        let v = view(BailStatus::PendingValidation, Some(PendingCheck), Some(PendingCheck), Some(PendingCheck));
        assert_eq!(next_bail_status(&v), None);
    }

    #[test]
    fn mixed_statuses_do_not_move() {
        let v = view(BailStatus::Draft, Some(Completed), Some(PendingCheck), Some(Completed));
        assert_eq!(next_bail_status(&v), None);
    }

    #[test]
    fn missing_party_or_property_is_skipped() {
        let v = view(BailStatus::Draft, Some(Completed), None, Some(Completed));
        assert_eq!(next_bail_status(&v), None);

        let v = view(BailStatus::Draft, Some(Completed), Some(Completed), None);
        assert_eq!(next_bail_status(&v), None);
    }
}
