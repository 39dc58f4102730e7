// tests/common/mod.rs
//
// Store em memória e mailer que grava, para exercitar o motor de completude
// sem banco de dados.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use bailnotarie::{
    common::error::AppError,
    db::CompletionStore,
    models::{
        bail::{BailPropagationView, BailStatus},
        client::{
            Client, ClientAggregate, ClientType, CompletionStatus, Entreprise, EntrepriseWithDocuments,
            FamilyStatus, MatrimonialRegime, Person, PersonWithDocuments, ProfilType,
        },
        document::{Document, DocumentKind, DocumentOwner},
        notification::{NewNotification, NotificationType},
        property::{OwnerContact, Property, PropertyAggregate, PropertyStatus},
    },
    services::{
        completion_service::CompletionService,
        mailer::{Mailer, StatusChangeEmail},
    },
};

// =============================================================================
//  STORE
// =============================================================================

struct MemBail {
    status: BailStatus,
    property_id: Uuid,
    owner_id: Option<Uuid>,
    tenant_id: Option<Uuid>,
}

#[derive(Default)]
struct State {
    clients: HashMap<Uuid, ClientAggregate>,
    properties: HashMap<Uuid, PropertyAggregate>,
    bails: HashMap<Uuid, MemBail>,
    notifications: Vec<NewNotification>,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn insert_client(&self, aggregate: ClientAggregate) -> Uuid {
        let id = aggregate.client.id;
        self.state.lock().unwrap().clients.insert(id, aggregate);
        id
    }

    pub fn insert_property(&self, aggregate: PropertyAggregate) -> Uuid {
        let id = aggregate.property.id;
        self.state.lock().unwrap().properties.insert(id, aggregate);
        id
    }

    pub fn insert_bail(&self, property_id: Uuid, owner_id: Option<Uuid>, tenant_id: Option<Uuid>) -> Uuid {
        let id = Uuid::new_v4();
        self.state.lock().unwrap().bails.insert(
            id,
            MemBail { status: BailStatus::Draft, property_id, owner_id, tenant_id },
        );
        id
    }

    pub fn with_client(&self, id: Uuid, edit: impl FnOnce(&mut ClientAggregate)) {
        let mut state = self.state.lock().unwrap();
        edit(state.clients.get_mut(&id).expect("cliente de teste"));
    }

    pub fn with_property(&self, id: Uuid, edit: impl FnOnce(&mut PropertyAggregate)) {
        let mut state = self.state.lock().unwrap();
        edit(state.properties.get_mut(&id).expect("bem de teste"));
    }

    pub fn client_status(&self, id: Uuid) -> CompletionStatus {
        self.state.lock().unwrap().clients[&id].client.completion_status
    }

    pub fn property_status(&self, id: Uuid) -> CompletionStatus {
        self.state.lock().unwrap().properties[&id].property.completion_status
    }

    pub fn bail_status(&self, id: Uuid) -> BailStatus {
        self.state.lock().unwrap().bails[&id].status
    }

    pub fn notifications(&self) -> Vec<NewNotification> {
        self.state.lock().unwrap().notifications.clone()
    }

    pub fn notifications_of(&self, kind: NotificationType) -> Vec<NewNotification> {
        self.notifications().into_iter().filter(|n| n.kind == kind).collect()
    }

    fn views(&self, filter: impl Fn(&MemBail) -> bool) -> Vec<BailPropagationView> {
        let state = self.state.lock().unwrap();
        let status_of = |id: Option<Uuid>| id.and_then(|id| state.clients.get(&id)).map(|c| c.client.completion_status);

        state
            .bails
            .iter()
            .filter(|(_, bail)| bail.status.is_open_for_propagation() && filter(bail))
            .map(|(id, bail)| BailPropagationView {
                bail_id: *id,
                status: bail.status,
                owner_status: status_of(bail.owner_id),
                tenant_status: status_of(bail.tenant_id),
                property_status: state.properties.get(&bail.property_id).map(|p| p.property.completion_status),
            })
            .collect()
    }
}

#[async_trait]
impl CompletionStore for MemoryStore {
    async fn load_client(&self, client_id: Uuid) -> Result<Option<ClientAggregate>, AppError> {
        Ok(self.state.lock().unwrap().clients.get(&client_id).cloned())
    }

    async fn load_property(&self, property_id: Uuid) -> Result<Option<PropertyAggregate>, AppError> {
        Ok(self.state.lock().unwrap().properties.get(&property_id).cloned())
    }

    async fn set_client_completion(&self, client_id: Uuid, status: CompletionStatus) -> Result<(), AppError> {
        if let Some(aggregate) = self.state.lock().unwrap().clients.get_mut(&client_id) {
            aggregate.client.completion_status = status;
        }
        Ok(())
    }

    async fn set_property_completion(&self, property_id: Uuid, status: CompletionStatus) -> Result<(), AppError> {
        if let Some(aggregate) = self.state.lock().unwrap().properties.get_mut(&property_id) {
            aggregate.property.completion_status = status;
        }
        Ok(())
    }

    async fn open_bails_for_client(&self, client_id: Uuid) -> Result<Vec<BailPropagationView>, AppError> {
        Ok(self.views(|b| b.owner_id == Some(client_id) || b.tenant_id == Some(client_id)))
    }

    async fn open_bails_for_property(&self, property_id: Uuid) -> Result<Vec<BailPropagationView>, AppError> {
        Ok(self.views(|b| b.property_id == property_id))
    }

    async fn transition_bail(&self, bail_id: Uuid, from: BailStatus, to: BailStatus) -> Result<bool, AppError> {
        let mut state = self.state.lock().unwrap();
        match state.bails.get_mut(&bail_id) {
            Some(bail) if bail.status == from => {
                bail.status = to;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn record_notification(&self, notification: NewNotification) -> Result<(), AppError> {
        self.state.lock().unwrap().notifications.push(notification);
        Ok(())
    }
}

// =============================================================================
//  MAILER
// =============================================================================

#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<StatusChangeEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<StatusChangeEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_status_change(&self, email: &StatusChangeEmail) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Mailer que sempre falha: o status tem que ser gravado mesmo assim.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send_status_change(&self, _email: &StatusChangeEmail) -> anyhow::Result<()> {
        anyhow::bail!("provedor fora do ar")
    }
}

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<RecordingMailer>,
    pub service: CompletionService,
}

pub fn harness() -> Harness {
    let store = Arc::new(MemoryStore::default());
    let mailer = Arc::new(RecordingMailer::default());
    let service = CompletionService::new(store.clone(), mailer.clone(), "https://app.example.fr/".to_string());
    Harness { store, mailer, service }
}

/// Deixa as tarefas de e-mail disparadas com `tokio::spawn` rodarem.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

// =============================================================================
//  CONSTRUTORES
// =============================================================================

pub fn client(client_type: ClientType, profil_type: ProfilType) -> Client {
    Client {
        id: Uuid::new_v4(),
        client_type,
        profil_type,
        completion_status: CompletionStatus::NotStarted,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn empty_person(client_id: Uuid, is_primary: bool) -> Person {
    Person {
        id: Uuid::new_v4(),
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

/// Pessoa principal com identidade, contato e endereço preenchidos.
pub fn full_person(client_id: Uuid, family_status: Option<FamilyStatus>) -> Person {
    Person {
        first_name: Some("Camille".into()),
        last_name: Some("Martin".into()),
        email: Some("camille.martin@example.fr".into()),
        phone: Some("+33 6 12 34 56 78".into()),
        full_address: Some("12 rue des Tables Claudiennes, 69001 Lyon".into()),
        nationality: Some("Française".into()),
        birth_date: NaiveDate::from_ymd_opt(1988, 4, 12),
        birth_place: Some("Lyon".into()),
        family_status,
        matrimonial_regime: match family_status {
            Some(FamilyStatus::Marie) => Some(MatrimonialRegime::CommunauteReduiteAuxAcquets),
            _ => None,
        },
        ..empty_person(client_id, true)
    }
}

pub fn full_entreprise(client_id: Uuid) -> Entreprise {
    Entreprise {
        id: Uuid::new_v4(),
        client_id,
        legal_name: Some("SCI Les Tilleuls".into()),
        name: None,
        registration: Some("812 345 678 00012".into()),
        email: Some("gerance@tilleuls.fr".into()),
        phone: Some("+33 4 78 00 00 00".into()),
        full_address: Some("3 place Bellecour, 69002 Lyon".into()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn document(kind: DocumentKind, owner: DocumentOwner) -> Document {
    let [client_id, person_id, entreprise_id, property_id, bail_id] = owner.columns();
    Document {
        id: Uuid::new_v4(),
        kind,
        file_key: format!("uploads/{}.pdf", Uuid::new_v4()),
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

pub fn physical_client(profil_type: ProfilType, person: Option<Person>, documents: Vec<Document>) -> ClientAggregate {
    let mut base = client(ClientType::PersonnePhysique, profil_type);
    if let Some(p) = &person {
        base.id = p.client_id;
    }

    ClientAggregate {
        client: base,
        persons: person
            .into_iter()
            .map(|person| PersonWithDocuments { person, documents: vec![] })
            .collect(),
        entreprise: None,
        documents,
    }
}

/// Cliente físico completo para o perfil, com todos os documentos exigidos.
pub fn complete_physical_client(profil_type: ProfilType) -> ClientAggregate {
    let client_id = Uuid::new_v4();
    let person = full_person(client_id, Some(FamilyStatus::Celibataire));
    let id_doc = document(DocumentKind::IdIdentity, DocumentOwner::Person(person.id));

    let mut documents = Vec::new();
    if profil_type == ProfilType::Locataire {
        documents.push(document(DocumentKind::Insurance, DocumentOwner::Client(client_id)));
        documents.push(document(DocumentKind::Rib, DocumentOwner::Client(client_id)));
    }

    let mut aggregate = physical_client(profil_type, Some(person), documents);
    aggregate.persons[0].documents.push(id_doc);
    aggregate
}

/// Empresa criada pelo formulário mas ainda sem nenhum dado.
pub fn empty_entreprise(client_id: Uuid) -> Entreprise {
    Entreprise {
        legal_name: None,
        registration: None,
        email: None,
        phone: None,
        full_address: None,
        ..full_entreprise(client_id)
    }
}

pub fn moral_client(profil_type: ProfilType, entreprise_documents: Vec<DocumentKind>) -> ClientAggregate {
    let base = client(ClientType::PersonneMorale, profil_type);
    let entreprise = full_entreprise(base.id);
    let documents = entreprise_documents
        .into_iter()
        .map(|kind| document(kind, DocumentOwner::Entreprise(entreprise.id)))
        .collect();

    ClientAggregate {
        client: base,
        persons: vec![],
        entreprise: Some(EntrepriseWithDocuments { entreprise, documents }),
        documents: vec![],
    }
}

pub fn property(owner_id: Uuid) -> Property {
    Property {
        id: Uuid::new_v4(),
        owner_id,
        label: None,
        full_address: "8 quai Saint-Vincent, 69001 Lyon".into(),
        surface_m2: None,
        property_type: None,
        legal_status: None,
        status: PropertyStatus::NonLouer,
        completion_status: CompletionStatus::NotStarted,
        has_bedding: false,
        has_blackout: false,
        has_hob: false,
        has_oven_or_microwave: false,
        has_fridge: false,
        has_freezer: false,
        has_tableware: false,
        has_kitchen_utensils: false,
        has_table: false,
        has_seating: false,
        has_storage_shelves: false,
        has_light_fixtures: false,
        has_cleaning_equipment: false,
        latitude: None,
        longitude: None,
        is_tight_zone: false,
        has_rent_control: false,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

pub fn property_aggregate(owner: &ClientAggregate, documents: Vec<DocumentKind>) -> PropertyAggregate {
    let property = property(owner.client.id);
    let documents = documents
        .into_iter()
        .map(|kind| document(kind, DocumentOwner::Property(property.id)))
        .collect();

    PropertyAggregate {
        property,
        documents,
        owner: Some(OwnerContact {
            client_id: owner.client.id,
            email: owner.contact_email(),
            profil_type: owner.client.profil_type,
        }),
    }
}

pub const PROPERTY_DOCUMENTS: [DocumentKind; 4] = [
    DocumentKind::Diagnostics,
    DocumentKind::TitleDeed,
    DocumentKind::Insurance,
    DocumentKind::Rib,
];
