// src/services/bail_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BailRepository, ClientRepository, NotificationRepository, PropertyRepository},
    models::{
        bail::{Bail, BailDetail, BailStatus, CreateBailPayload},
        client::{Client, ProfilType},
        notification::{NewNotification, NotificationType},
        property::PropertyStatus,
    },
    services::completion_service::CompletionService,
};

/// Um bail tem exatamente um PROPRIETAIRE (o dono do bem) e no máximo um LOCATAIRE.
pub fn validate_parties(property_owner_id: Uuid, parties: &[Client]) -> Result<(), AppError> {
    let mut owners = 0;
    let mut tenants = 0;

    for (i, party) in parties.iter().enumerate() {
        if parties[..i].iter().any(|p| p.id == party.id) {
            return Err(AppError::InvalidBailParties("client en double"));
        }

        match party.profil_type {
            ProfilType::Proprietaire => {
                if party.id != property_owner_id {
                    return Err(AppError::InvalidBailParties("le propriétaire doit être celui du bien"));
                }
                owners += 1;
            }
            ProfilType::Locataire => tenants += 1,
            ProfilType::Lead => return Err(AppError::InvalidBailParties("un lead ne peut pas être partie")),
        }
    }

    if owners != 1 {
        return Err(AppError::InvalidBailParties("un seul propriétaire requis"));
    }
    if tenants > 1 {
        return Err(AppError::InvalidBailParties("au plus un locataire"));
    }

    Ok(())
}

/// Efeito de uma transição manual sobre o status do bem.
pub fn property_status_after(status: BailStatus) -> Option<PropertyStatus> {
    match status {
        BailStatus::Signed => Some(PropertyStatus::Active),
        BailStatus::Terminated | BailStatus::Canceled => Some(PropertyStatus::NonLouer),
        _ => None,
    }
}

#[derive(Clone)]
pub struct BailService {
    repo: BailRepository,
    properties: PropertyRepository,
    clients: ClientRepository,
    notifications: NotificationRepository,
    completion: CompletionService,
}

impl BailService {
    pub fn new(
        repo: BailRepository,
        properties: PropertyRepository,
        clients: ClientRepository,
        notifications: NotificationRepository,
        completion: CompletionService,
    ) -> Self {
        Self { repo, properties, clients, notifications, completion }
    }

    pub async fn create_bail(&self, pool: &PgPool, payload: &CreateBailPayload) -> Result<BailDetail, AppError> {
        let property = self
            .properties
            .find(pool, payload.property_id)
            .await?
            .ok_or(AppError::PropertyNotFound)?;

        let mut parties = Vec::with_capacity(payload.party_ids.len());
        for id in &payload.party_ids {
            let client = self.clients.find_client(pool, *id).await?.ok_or(AppError::ClientNotFound)?;
            parties.push(client);
        }
        validate_parties(property.owner_id, &parties)?;

        if payload.bail_type.is_furnished() && !property.is_furnished_eligible() {
            return Err(AppError::FurnishedLeaseNotAllowed);
        }

        let mut tx = pool.begin().await?;

        let bail = self
            .repo
            .insert(
                &mut *tx,
                property.id,
                payload.bail_type,
                payload.bail_type.family(),
                payload.rent_amount,
                payload.monthly_charges,
                payload.security_deposit,
                payload.effective_date,
                payload.end_date,
                payload.payment_day,
            )
            .await?;

        for party in &parties {
            self.repo.add_party(&mut *tx, bail.id, party.id).await?;
        }

        self.properties.update_status(&mut *tx, property.id, PropertyStatus::InProgress).await?;
        tx.commit().await?;

        tracing::info!(bail_id = %bail.id, property_id = %property.id, "bail criado");

        // As partes podem já estar completas
        self.completion.propagate_from_property(property.id).await?;
        self.get_bail(pool, bail.id).await
    }

    pub async fn get_bail(&self, pool: &PgPool, id: Uuid) -> Result<BailDetail, AppError> {
        let bail = self.repo.find(pool, id).await?.ok_or(AppError::BailNotFound)?;
        let parties = self.repo.list_parties(pool, id).await?;
        Ok(BailDetail { bail, parties })
    }

    pub async fn list_by_property(&self, pool: &PgPool, property_id: Uuid) -> Result<Vec<Bail>, AppError> {
        self.repo.list_by_property(pool, property_id).await
    }

    /// Transição manual seguindo o ciclo de vida.
    pub async fn transition(&self, pool: &PgPool, id: Uuid, next: BailStatus) -> Result<BailDetail, AppError> {
        let bail = self.repo.find(pool, id).await?.ok_or(AppError::BailNotFound)?;

        if !bail.status.can_transition_to(next) {
            return Err(AppError::InvalidBailTransition { from: bail.status, to: next });
        }

        let mut tx = pool.begin().await?;

        if !self.repo.transition_status(&mut *tx, id, bail.status, next).await? {
            // Alguém mudou o status entre a leitura e a escrita
            let current = self.repo.find(&mut *tx, id).await?.map(|b| b.status).unwrap_or(bail.status);
            return Err(AppError::InvalidBailTransition { from: current, to: next });
        }

        if let Some(property_status) = property_status_after(next) {
            self.properties.update_status(&mut *tx, bail.property_id, property_status).await?;
        }

        self.notifications
            .insert(
                &mut *tx,
                &NewNotification::for_bail(
                    NotificationType::BailStatusChanged,
                    id,
                    format!("Bail passé de {} à {}", bail.status.as_str(), next.as_str()),
                ),
            )
            .await?;

        tx.commit().await?;

        tracing::info!(bail_id = %id, from = bail.status.as_str(), to = next.as_str(), "transição manual do bail");
        self.get_bail(pool, id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::client::{ClientType, CompletionStatus};

    fn client(profil_type: ProfilType) -> Client {
        Client {
            id: Uuid::new_v4(),
            client_type: ClientType::PersonnePhysique,
            profil_type,
            completion_status: CompletionStatus::NotStarted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn owner_and_tenant_are_accepted() {
        let owner = client(ProfilType::Proprietaire);
        let tenant = client(ProfilType::Locataire);

        assert!(validate_parties(owner.id, &[owner.clone(), tenant]).is_ok());
        assert!(validate_parties(owner.id, &[owner.clone()]).is_ok());
    }

    #[test]
    fn owner_must_be_the_property_owner() {
        let owner = client(ProfilType::Proprietaire);
        assert!(matches!(
            validate_parties(Uuid::new_v4(), &[owner]),
            Err(AppError::InvalidBailParties(_))
        ));
    }

    #[test]
    fn rejects_leads_duplicates_and_missing_owner() {
        let owner = client(ProfilType::Proprietaire);
        let tenant = client(ProfilType::Locataire);
        let lead = client(ProfilType::Lead);

        assert!(validate_parties(owner.id, &[owner.clone(), lead]).is_err());
        assert!(validate_parties(owner.id, &[owner.clone(), owner.clone()]).is_err());
        assert!(validate_parties(owner.id, &[tenant.clone()]).is_err());
        assert!(validate_parties(owner.id, &[owner.clone(), tenant.clone(), client(ProfilType::Locataire)]).is_err());
    }

    #[test]
    fn property_follows_signature_and_end_of_lease() {
        assert_eq!(property_status_after(BailStatus::Signed), Some(PropertyStatus::Active));
        assert_eq!(property_status_after(BailStatus::Canceled), Some(PropertyStatus::NonLouer));
        assert_eq!(property_status_after(BailStatus::Terminated), Some(PropertyStatus::NonLouer));
        assert_eq!(property_status_after(BailStatus::ClientContacted), None);
    }
}
