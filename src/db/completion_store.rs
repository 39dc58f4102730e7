// src/db/completion_store.rs

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{BailRepository, ClientRepository, DocumentRepository, NotificationRepository, PropertyRepository},
    models::{
        bail::{BailPropagationView, BailStatus},
        client::{
            Client, ClientAggregate, CompletionStatus, Entreprise, EntrepriseWithDocuments, Person,
            PersonWithDocuments,
        },
        document::{Document, DocumentOwner},
        notification::NewNotification,
        property::{OwnerContact, PropertyAggregate},
    },
};

/// Leituras e escritas de que o motor de completude precisa.
/// Implementado sobre o Postgres em produção e em memória nos testes.
#[async_trait]
pub trait CompletionStore: Send + Sync {
    async fn load_client(&self, client_id: Uuid) -> Result<Option<ClientAggregate>, AppError>;

    async fn load_property(&self, property_id: Uuid) -> Result<Option<PropertyAggregate>, AppError>;

    async fn set_client_completion(&self, client_id: Uuid, status: CompletionStatus) -> Result<(), AppError>;

    async fn set_property_completion(&self, property_id: Uuid, status: CompletionStatus) -> Result<(), AppError>;

    /// Baux em DRAFT ou PENDING_VALIDATION em que o cliente é parte.
    async fn open_bails_for_client(&self, client_id: Uuid) -> Result<Vec<BailPropagationView>, AppError>;

    async fn open_bails_for_property(&self, property_id: Uuid) -> Result<Vec<BailPropagationView>, AppError>;

    /// Troca o status só se ainda for `from`; `false` quando outra chamada chegou antes.
    async fn transition_bail(&self, bail_id: Uuid, from: BailStatus, to: BailStatus) -> Result<bool, AppError>;

    async fn record_notification(&self, notification: NewNotification) -> Result<(), AppError>;
}

#[derive(Clone)]
pub struct PgCompletionStore {
    pool: PgPool,
    clients: ClientRepository,
    properties: PropertyRepository,
    bails: BailRepository,
    notifications: NotificationRepository,
}

impl PgCompletionStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            clients: ClientRepository::new(),
            properties: PropertyRepository::new(),
            bails: BailRepository::new(),
            notifications: NotificationRepository::new(),
        }
    }
}

/// Cliente com pessoas, empresa e documentos. Use dentro de uma transação
/// para que o agregado seja um retrato consistente.
pub async fn load_client_aggregate(
    conn: &mut PgConnection,
    client_id: Uuid,
) -> Result<Option<ClientAggregate>, AppError> {
    let clients = ClientRepository::new();
    let document_repo = DocumentRepository::new();

    let Some(client) = clients.find_client(&mut *conn, client_id).await? else {
        return Ok(None);
    };

    let persons = clients.list_persons(&mut *conn, client_id).await?;
    let entreprise = clients.find_entreprise_by_client(&mut *conn, client_id).await?;
    let documents = document_repo.list_for_client_tree(&mut *conn, client_id).await?;

    Ok(Some(assemble_client(client, persons, entreprise, documents)))
}

pub async fn load_property_aggregate(
    conn: &mut PgConnection,
    property_id: Uuid,
) -> Result<Option<PropertyAggregate>, AppError> {
    let Some(property) = PropertyRepository::new().find(&mut *conn, property_id).await? else {
        return Ok(None);
    };

    let documents = DocumentRepository::new()
        .list_for_owner(&mut *conn, DocumentOwner::Property(property_id))
        .await?;

    let owner = load_client_aggregate(conn, property.owner_id)
        .await?
        .map(|owner| OwnerContact {
            client_id: owner.client.id,
            email: owner.contact_email(),
            profil_type: owner.client.profil_type,
        });

    Ok(Some(PropertyAggregate { property, documents, owner }))
}

/// Distribui os documentos da árvore entre cliente, pessoas e empresa.
fn assemble_client(
    client: Client,
    persons: Vec<Person>,
    entreprise: Option<Entreprise>,
    documents: Vec<Document>,
) -> ClientAggregate {
    let mut client_docs = Vec::new();
    let mut person_docs: Vec<(Uuid, Document)> = Vec::new();
    let mut entreprise_docs = Vec::new();

    for doc in documents {
        match doc.owner() {
            Ok(DocumentOwner::Person(person_id)) => person_docs.push((person_id, doc)),
            Ok(DocumentOwner::Entreprise(_)) => entreprise_docs.push(doc),
            Ok(DocumentOwner::Client(_)) => client_docs.push(doc),
            // A árvore do cliente só contém esses três donos
            _ => {}
        }
    }

    let persons = persons
        .into_iter()
        .map(|person| {
            let documents = person_docs
                .iter()
                .filter(|(owner, _)| *owner == person.id)
                .map(|(_, doc)| doc.clone())
                .collect();
            PersonWithDocuments { person, documents }
        })
        .collect();

    let entreprise = entreprise.map(|entreprise| EntrepriseWithDocuments {
        entreprise,
        documents: entreprise_docs,
    });

    ClientAggregate {
        client,
        persons,
        entreprise,
        documents: client_docs,
    }
}

#[async_trait]
impl CompletionStore for PgCompletionStore {
    async fn load_client(&self, client_id: Uuid) -> Result<Option<ClientAggregate>, AppError> {
        // Uma única transação para que o agregado seja um retrato consistente
        let mut tx = self.pool.begin().await?;
        let aggregate = load_client_aggregate(&mut tx, client_id).await?;
        tx.commit().await?;
        Ok(aggregate)
    }

    async fn load_property(&self, property_id: Uuid) -> Result<Option<PropertyAggregate>, AppError> {
        let mut tx = self.pool.begin().await?;
        let aggregate = load_property_aggregate(&mut tx, property_id).await?;
        tx.commit().await?;
        Ok(aggregate)
    }

    async fn set_client_completion(&self, client_id: Uuid, status: CompletionStatus) -> Result<(), AppError> {
        self.clients.update_completion_status(&self.pool, client_id, status).await
    }

    async fn set_property_completion(&self, property_id: Uuid, status: CompletionStatus) -> Result<(), AppError> {
        self.properties.update_completion_status(&self.pool, property_id, status).await
    }

    async fn open_bails_for_client(&self, client_id: Uuid) -> Result<Vec<BailPropagationView>, AppError> {
        self.bails.propagation_views_for_client(&self.pool, client_id).await
    }

    async fn open_bails_for_property(&self, property_id: Uuid) -> Result<Vec<BailPropagationView>, AppError> {
        self.bails.propagation_views_for_property(&self.pool, property_id).await
    }

    async fn transition_bail(&self, bail_id: Uuid, from: BailStatus, to: BailStatus) -> Result<bool, AppError> {
        self.bails.transition_status(&self.pool, bail_id, from, to).await
    }

    async fn record_notification(&self, notification: NewNotification) -> Result<(), AppError> {
        self.notifications.insert(&self.pool, &notification).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::models::client::{ClientType, ProfilType};
    use crate::models::document::DocumentKind;

    fn client(id: Uuid) -> Client {
        Client {
            id,
            client_type: ClientType::PersonnePhysique,
            profil_type: ProfilType::Locataire,
            completion_status: CompletionStatus::NotStarted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn person(id: Uuid, client_id: Uuid, is_primary: bool) -> Person {
        Person {
            id,
            client_id,
            is_primary,
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            full_address: None,
            nationality: None,
            birth_date: None,
            birth_place: None,
            profession: None,
            family_status: None,
            matrimonial_regime: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn doc(kind: DocumentKind, owner: DocumentOwner) -> Document {
        let [client_id, person_id, entreprise_id, property_id, bail_id] = owner.columns();
        Document {
            id: Uuid::new_v4(),
            kind,
            file_key: "k".into(),
            mime_type: "application/pdf".into(),
            label: None,
            client_id,
            person_id,
            entreprise_id,
            property_id,
            bail_id,
            uploaded_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn documents_are_dispatched_to_their_owner() {
        let client_id = Uuid::new_v4();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        let aggregate = assemble_client(
            client(client_id),
            vec![person(first, client_id, true), person(second, client_id, false)],
            None,
            vec![
                doc(DocumentKind::IdIdentity, DocumentOwner::Person(first)),
                doc(DocumentKind::IdIdentity, DocumentOwner::Person(second)),
                doc(DocumentKind::Rib, DocumentOwner::Person(second)),
                doc(DocumentKind::Insurance, DocumentOwner::Client(client_id)),
            ],
        );

        assert_eq!(aggregate.persons[0].documents.len(), 1);
        assert_eq!(aggregate.persons[1].documents.len(), 2);
        assert_eq!(aggregate.documents.len(), 1);
        assert!(aggregate.entreprise.is_none());
    }
}
