// tests/completion_engine.rs

mod common;

use std::sync::Arc;

use uuid::Uuid;

use bailnotarie::{
    models::{
        bail::BailStatus,
        client::{ClientType, CompletionStatus, FamilyStatus, Person, ProfilType},
        completion::RequiredField,
        document::{DocumentKind, DocumentOwner},
        notification::NotificationType,
    },
    services::{
        completion_checker::check_client_completion, completion_service::CompletionService,
        requirements::required_client_fields,
    },
};

use common::*;

/// Proprietário casado: pessoa completa, RG na pessoa e livret no cliente.
fn married_owner(with_livret: bool) -> bailnotarie::models::client::ClientAggregate {
    let client_id = Uuid::new_v4();
    let person = full_person(client_id, Some(FamilyStatus::Marie));
    let person_id = person.id;

    let documents = if with_livret {
        vec![document(DocumentKind::LivretDeFamille, DocumentOwner::Client(client_id))]
    } else {
        vec![]
    };

    let mut aggregate = physical_client(ProfilType::Proprietaire, Some(person), documents);
    aggregate.persons[0]
        .documents
        .push(document(DocumentKind::IdIdentity, DocumentOwner::Person(person_id)));
    aggregate
}

/// Dono, locatário e bem completos, ainda em NOT_STARTED, com um bail em DRAFT.
fn ready_dossier(h: &Harness) -> (Uuid, Uuid, Uuid, Uuid) {
    let owner = complete_physical_client(ProfilType::Proprietaire);
    let tenant = complete_physical_client(ProfilType::Locataire);
    let property = property_aggregate(&owner, PROPERTY_DOCUMENTS.to_vec());

    let owner_id = h.store.insert_client(owner);
    let tenant_id = h.store.insert_client(tenant);
    let property_id = h.store.insert_property(property);
    let bail_id = h.store.insert_bail(property_id, Some(owner_id), Some(tenant_id));

    (owner_id, tenant_id, property_id, bail_id)
}

#[test]
fn moral_owner_requires_company_documents_only() {
    let req = required_client_fields(ClientType::PersonneMorale, ProfilType::Proprietaire, None, None);
    assert_eq!(req.required_documents, vec![DocumentKind::Kbis, DocumentKind::Statutes]);
}

#[tokio::test]
async fn complete_married_owner_goes_to_pending_check_with_one_email() {
    let h = harness();
    let client_id = h.store.insert_client(married_owner(true));

    let update = h.service.update_client_completion_status(client_id).await.unwrap();
    settle().await;

    assert_eq!(update.previous, CompletionStatus::NotStarted);
    assert_eq!(update.current, CompletionStatus::PendingCheck);
    assert_eq!(h.store.client_status(client_id), CompletionStatus::PendingCheck);

    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "camille.martin@example.fr");
    assert_eq!(sent[0].new_status, CompletionStatus::PendingCheck);
    assert!(sent[0].dashboard_url.ends_with(&format!("/clients/{}", client_id)));

    assert_eq!(h.store.notifications_of(NotificationType::CompletionStatusChanged).len(), 1);
}

#[tokio::test]
async fn married_owner_without_livret_misses_exactly_the_livret() {
    let h = harness();
    let client_id = h.store.insert_client(married_owner(false));

    let check = check_client_completion(h.store.as_ref(), client_id).await.unwrap();

    assert!(check.has_all_fields);
    assert!(check.missing_fields.is_empty());
    assert_eq!(check.missing_documents, vec![DocumentKind::LivretDeFamille]);

    let update = h.service.update_client_completion_status(client_id).await.unwrap();
    assert_eq!(update.current, CompletionStatus::Partial);
}

#[tokio::test]
async fn empty_lead_stays_not_started_silently() {
    let h = harness();
    let client_id = Uuid::new_v4();
    let lead = physical_client(ProfilType::Lead, Some(empty_person(client_id, true)), vec![]);
    let client_id = h.store.insert_client(lead);

    let update = h.service.update_client_completion_status(client_id).await.unwrap();
    settle().await;

    assert_eq!(update.previous, CompletionStatus::NotStarted);
    assert_eq!(update.current, CompletionStatus::NotStarted);
    assert!(!update.changed());
    assert!(h.store.notifications().is_empty());
    assert!(h.mailer.sent().is_empty());
}

#[tokio::test]
async fn sticky_statuses_survive_recalculation() {
    let h = harness();

    // Dados apagados depois da validação: continua COMPLETED
    let mut completed = physical_client(ProfilType::Locataire, None, vec![]);
    completed.client.completion_status = CompletionStatus::Completed;
    let completed_id = h.store.insert_client(completed);

    let mut pending = married_owner(false);
    pending.client.completion_status = CompletionStatus::PendingCheck;
    let pending_id = h.store.insert_client(pending);

    for _ in 0..2 {
        h.service.update_client_completion_status(completed_id).await.unwrap();
        h.service.update_client_completion_status(pending_id).await.unwrap();
    }
    settle().await;

    assert_eq!(h.store.client_status(completed_id), CompletionStatus::Completed);
    assert_eq!(h.store.client_status(pending_id), CompletionStatus::PendingCheck);
    assert!(h.store.notifications().is_empty());
    assert!(h.mailer.sent().is_empty());
}

#[tokio::test]
async fn only_an_override_leaves_a_sticky_status() {
    let h = harness();
    let mut aggregate = married_owner(false);
    aggregate.client.completion_status = CompletionStatus::Completed;
    let client_id = h.store.insert_client(aggregate);

    let update = h
        .service
        .override_client_completion_status(client_id, CompletionStatus::NotStarted)
        .await
        .unwrap();
    assert_eq!(update.previous, CompletionStatus::Completed);
    assert_eq!(update.current, CompletionStatus::NotStarted);

    // Agora o recálculo volta a valer: falta o livret
    let update = h.service.update_client_completion_status(client_id).await.unwrap();
    assert_eq!(update.current, CompletionStatus::Partial);
}

#[tokio::test]
async fn property_update_is_idempotent() {
    let h = harness();
    let owner = complete_physical_client(ProfilType::Proprietaire);
    let owner_email = owner.contact_email();
    let property = property_aggregate(&owner, vec![]);
    h.store.insert_client(owner);
    let property_id = h.store.insert_property(property);

    let first = h.service.update_property_completion_status(property_id).await.unwrap();
    settle().await;
    assert_eq!(first.current, CompletionStatus::Partial);
    assert!(first.changed());

    let second = h.service.update_property_completion_status(property_id).await.unwrap();
    settle().await;
    assert_eq!(second.previous, CompletionStatus::Partial);
    assert_eq!(second.current, CompletionStatus::Partial);
    assert!(!second.changed());

    assert_eq!(h.store.notifications_of(NotificationType::CompletionStatusChanged).len(), 1);
    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(Some(sent[0].recipient.clone()), owner_email);
}

#[tokio::test]
async fn unknown_entities_are_a_no_op() {
    let h = harness();

    let update = h.service.update_client_completion_status(Uuid::new_v4()).await.unwrap();
    assert_eq!(update.previous, CompletionStatus::NotStarted);
    assert_eq!(update.current, CompletionStatus::NotStarted);
    assert!(update.bail_transitions.is_empty());

    let update = h.service.update_property_completion_status(Uuid::new_v4()).await.unwrap();
    assert_eq!(update.current, CompletionStatus::NotStarted);
    assert!(h.store.notifications().is_empty());
}

#[tokio::test]
async fn status_is_saved_even_when_the_mailer_fails() {
    let store = Arc::new(MemoryStore::default());
    let service = CompletionService::new(store.clone(), Arc::new(FailingMailer), "https://app.example.fr".into());
    let client_id = store.insert_client(married_owner(true));

    let update = service.update_client_completion_status(client_id).await.unwrap();
    settle().await;

    assert_eq!(update.current, CompletionStatus::PendingCheck);
    assert_eq!(store.client_status(client_id), CompletionStatus::PendingCheck);
}

#[tokio::test]
async fn all_parties_pending_check_moves_draft_to_pending_validation() {
    let h = harness();
    let (owner_id, tenant_id, property_id, bail_id) = ready_dossier(&h);

    let owner = h.service.update_client_completion_status(owner_id).await.unwrap();
    assert_eq!(owner.current, CompletionStatus::PendingCheck);
    assert!(owner.bail_transitions.is_empty());

    let tenant = h.service.update_client_completion_status(tenant_id).await.unwrap();
    assert_eq!(tenant.current, CompletionStatus::PendingCheck);
    assert!(tenant.bail_transitions.is_empty());
    assert_eq!(h.store.bail_status(bail_id), BailStatus::Draft);

    let property = h.service.update_property_completion_status(property_id).await.unwrap();
    assert_eq!(property.current, CompletionStatus::PendingCheck);
    assert_eq!(property.bail_transitions.len(), 1);
    assert_eq!(property.bail_transitions[0].from, BailStatus::Draft);
    assert_eq!(property.bail_transitions[0].to, BailStatus::PendingValidation);

    assert_eq!(h.store.bail_status(bail_id), BailStatus::PendingValidation);
    assert_eq!(h.store.notifications_of(NotificationType::BailStatusChanged).len(), 1);
}

#[tokio::test]
async fn mixed_completed_and_pending_check_does_not_move_the_bail() {
    let h = harness();
    let (owner_id, tenant_id, property_id, bail_id) = ready_dossier(&h);

    h.service.update_client_completion_status(owner_id).await.unwrap();
    h.service
        .override_client_completion_status(tenant_id, CompletionStatus::Completed)
        .await
        .unwrap();
    h.service
        .override_property_completion_status(property_id, CompletionStatus::Completed)
        .await
        .unwrap();

    assert_eq!(h.store.client_status(owner_id), CompletionStatus::PendingCheck);
    assert_eq!(h.store.bail_status(bail_id), BailStatus::Draft);
}

#[derive(Clone, Copy, Debug)]
enum Party {
    Owner,
    Tenant,
    Property,
}

const PERMUTATIONS: [[Party; 3]; 6] = {
    use Party::*;
    [
        [Owner, Tenant, Property],
        [Owner, Property, Tenant],
        [Tenant, Owner, Property],
        [Tenant, Property, Owner],
        [Property, Owner, Tenant],
        [Property, Tenant, Owner],
    ]
};

#[tokio::test]
async fn ready_for_notary_happens_once_in_any_order() {
    for order in PERMUTATIONS {
        let h = harness();
        let (owner_id, tenant_id, property_id, bail_id) = ready_dossier(&h);
        let mut transitions = Vec::new();

        for party in order {
            let update = match party {
                Party::Owner => h.service.override_client_completion_status(owner_id, CompletionStatus::Completed).await,
                Party::Tenant => h.service.override_client_completion_status(tenant_id, CompletionStatus::Completed).await,
                Party::Property => {
                    h.service
                        .override_property_completion_status(property_id, CompletionStatus::Completed)
                        .await
                }
            }
            .unwrap();
            transitions.extend(update.bail_transitions);
        }

        // Repropagar não gera uma segunda transição
        transitions.extend(h.service.propagate_from_client(owner_id).await.unwrap());
        transitions.extend(h.service.propagate_from_property(property_id).await.unwrap());

        assert_eq!(transitions.len(), 1, "ordem {:?}", order);
        assert_eq!(transitions[0].to, BailStatus::ReadyForNotary);
        assert_eq!(h.store.bail_status(bail_id), BailStatus::ReadyForNotary);
        assert_eq!(h.store.notifications_of(NotificationType::BailStatusChanged).len(), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_propagation_transitions_once() {
    let h = harness();
    let (owner_id, tenant_id, property_id, bail_id) = ready_dossier(&h);

    // As três partes já validadas, sem propagação ainda
    for id in [owner_id, tenant_id] {
        h.store.with_client(id, |c| c.client.completion_status = CompletionStatus::Completed);
    }
    h.store.with_property(property_id, |p| p.property.completion_status = CompletionStatus::Completed);

    let spawn_client = |client_id: Uuid| {
        let service = h.service.clone();
        tokio::spawn(async move { service.propagate_from_client(client_id).await })
    };
    let service = h.service.clone();
    let (a, b, c) = tokio::join!(
        spawn_client(owner_id),
        spawn_client(tenant_id),
        tokio::spawn(async move { service.propagate_from_property(property_id).await }),
    );

    let total = a.unwrap().unwrap().len() + b.unwrap().unwrap().len() + c.unwrap().unwrap().len();

    assert_eq!(total, 1);
    assert_eq!(h.store.bail_status(bail_id), BailStatus::ReadyForNotary);
    assert_eq!(h.store.notifications_of(NotificationType::BailStatusChanged).len(), 1);
}

#[tokio::test]
async fn converted_lead_is_recalculated_against_its_new_profile() {
    let h = harness();

    let client_id = Uuid::new_v4();
    let person = Person {
        first_name: Some("Camille".into()),
        ..empty_person(client_id, true)
    };
    let lead = physical_client(ProfilType::Lead, Some(person), vec![]);
    let property = property_aggregate(&lead, PROPERTY_DOCUMENTS.to_vec());
    let lead_id = h.store.insert_client(lead);

    // LEAD não exige nada: um único campo já basta para PENDING_CHECK
    let update = h.service.update_client_completion_status(lead_id).await.unwrap();
    assert_eq!(update.current, CompletionStatus::PendingCheck);

    // Locatário e bem já prontos, esperando só o dono
    let tenant_id = h.store.insert_client(complete_physical_client(ProfilType::Locataire));
    let property_id = h.store.insert_property(property);
    h.store.with_client(tenant_id, |c| c.client.completion_status = CompletionStatus::PendingCheck);
    h.store.with_property(property_id, |p| p.property.completion_status = CompletionStatus::PendingCheck);
    let bail_id = h.store.insert_bail(property_id, Some(lead_id), Some(tenant_id));

    h.store.with_client(lead_id, |c| c.client.convert_to(ProfilType::Proprietaire));
    assert_eq!(h.store.client_status(lead_id), CompletionStatus::NotStarted);

    let update = h.service.update_client_completion_status(lead_id).await.unwrap();
    assert_eq!(update.previous, CompletionStatus::NotStarted);
    assert_eq!(update.current, CompletionStatus::Partial);
    assert!(update.bail_transitions.is_empty());
    assert_eq!(h.store.bail_status(bail_id), BailStatus::Draft);

    let check = check_client_completion(h.store.as_ref(), lead_id).await.unwrap();
    assert!(check.missing_fields.contains(&RequiredField::LastName));
    assert!(check.missing_fields.contains(&RequiredField::Email));
    assert!(!check.missing_fields.contains(&RequiredField::FirstName));
    assert_eq!(check.missing_documents, vec![DocumentKind::IdIdentity]);
}

#[tokio::test]
async fn blank_strings_count_as_cleared() {
    let h = harness();
    let client_id = Uuid::new_v4();
    let person = Person {
        first_name: Some("".into()),
        email: Some("   ".into()),
        ..empty_person(client_id, true)
    };
    let client_id = h.store.insert_client(physical_client(ProfilType::Locataire, Some(person), vec![]));

    let update = h.service.update_client_completion_status(client_id).await.unwrap();
    assert_eq!(update.current, CompletionStatus::NotStarted);
    assert!(h.store.notifications().is_empty());
}

fn moral_owner_with(entreprise_documents: Vec<DocumentKind>) -> bailnotarie::models::client::ClientAggregate {
    moral_client(ProfilType::Proprietaire, entreprise_documents)
}

#[tokio::test]
async fn moral_client_without_company_data_is_not_started() {
    let h = harness();
    let mut aggregate = moral_owner_with(vec![]);
    let empty = empty_entreprise(aggregate.client.id);
    aggregate.entreprise.as_mut().unwrap().entreprise = empty;
    let client_id = h.store.insert_client(aggregate);

    let update = h.service.update_client_completion_status(client_id).await.unwrap();

    assert_eq!(update.current, CompletionStatus::NotStarted);
    assert!(h.store.notifications().is_empty());
}

#[tokio::test]
async fn moral_client_with_only_a_kbis_is_partial() {
    let h = harness();
    let client_id = h.store.insert_client(moral_owner_with(vec![DocumentKind::Kbis]));

    let check = check_client_completion(h.store.as_ref(), client_id).await.unwrap();
    assert!(check.has_all_fields);
    assert_eq!(check.missing_documents, vec![DocumentKind::Statutes]);

    let update = h.service.update_client_completion_status(client_id).await.unwrap();
    assert_eq!(update.current, CompletionStatus::Partial);
}

#[tokio::test]
async fn moral_client_with_company_documents_goes_to_pending_check() {
    let h = harness();
    let client_id = h
        .store
        .insert_client(moral_owner_with(vec![DocumentKind::Kbis, DocumentKind::Statutes]));

    let update = h.service.update_client_completion_status(client_id).await.unwrap();
    settle().await;

    assert_eq!(update.current, CompletionStatus::PendingCheck);
    let sent = h.mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "gerance@tilleuls.fr");
    assert_eq!(sent[0].entity_name, "SCI Les Tilleuls");
}

#[tokio::test]
async fn statutes_on_the_client_itself_do_not_count() {
    let h = harness();
    let mut aggregate = moral_owner_with(vec![DocumentKind::Kbis]);
    let client_id = aggregate.client.id;
    aggregate
        .documents
        .push(document(DocumentKind::Statutes, DocumentOwner::Client(client_id)));
    h.store.insert_client(aggregate);

    let check = check_client_completion(h.store.as_ref(), client_id).await.unwrap();
    assert_eq!(check.missing_documents, vec![DocumentKind::Statutes]);

    let update = h.service.update_client_completion_status(client_id).await.unwrap();
    assert_eq!(update.current, CompletionStatus::Partial);
}
