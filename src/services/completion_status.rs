// src/services/completion_status.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CompletionStore,
    models::{
        client::{ClientAggregate, ClientType, CompletionStatus, Entreprise, Person},
        completion::{CompletionCheck, Requirements},
        property::PropertyAggregate,
    },
    services::completion_checker::{check_client, check_property, client_requirements, property_requirements},
};

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn person_has_any_data(person: &Person) -> bool {
    [
        &person.first_name,
        &person.last_name,
        &person.email,
        &person.phone,
        &person.full_address,
        &person.nationality,
        &person.birth_place,
        &person.profession,
    ]
    .into_iter()
    .any(filled)
        || person.birth_date.is_some()
        || person.family_status.is_some()
        || person.matrimonial_regime.is_some()
}

fn entreprise_has_any_data(entreprise: &Entreprise) -> bool {
    [
        &entreprise.legal_name,
        &entreprise.name,
        &entreprise.registration,
        &entreprise.email,
        &entreprise.phone,
        &entreprise.full_address,
    ]
    .into_iter()
    .any(filled)
}

/// Dados escalares do sujeito do cliente: pessoa principal ou empresa.
pub fn client_has_any_data(aggregate: &ClientAggregate) -> bool {
    match aggregate.client.client_type {
        ClientType::PersonnePhysique => aggregate
            .primary_person()
            .is_some_and(|p| person_has_any_data(&p.person)),
        ClientType::PersonneMorale => aggregate
            .entreprise
            .as_ref()
            .is_some_and(|e| entreprise_has_any_data(&e.entreprise)),
    }
}

pub fn property_has_any_data(aggregate: &PropertyAggregate) -> bool {
    let p = &aggregate.property;
    !p.full_address.trim().is_empty()
        || filled(&p.label)
        || p.surface_m2.is_some()
        || p.property_type.is_some()
        || p.legal_status.is_some()
}

/// Regra central. COMPLETED e PENDING_CHECK nunca saem daqui alterados.
pub fn derive_status(
    current: CompletionStatus,
    has_any_data: bool,
    requirements: &Requirements,
    check: &CompletionCheck,
) -> CompletionStatus {
    if current.is_sticky() {
        return current;
    }

    let has_any_document = check.missing_documents.len() < requirements.required_documents.len();

    if !has_any_data && !has_any_document {
        CompletionStatus::NotStarted
    } else if check.is_complete() {
        CompletionStatus::PendingCheck
    } else {
        CompletionStatus::Partial
    }
}

pub fn evaluate_client(aggregate: &ClientAggregate) -> CompletionStatus {
    let current = aggregate.client.completion_status;
    if current.is_sticky() {
        return current;
    }

    let req = client_requirements(aggregate);
    let check = check_client(aggregate, &req).summary;
    derive_status(current, client_has_any_data(aggregate), &req, &check)
}

pub fn evaluate_property(aggregate: &PropertyAggregate) -> CompletionStatus {
    let current = aggregate.property.completion_status;
    if current.is_sticky() {
        return current;
    }

    let req = property_requirements(aggregate);
    let check = check_property(aggregate, &req);
    derive_status(current, property_has_any_data(aggregate), &req, &check)
}

/// Entidade inexistente conta como NOT_STARTED.
pub async fn calculate_client_completion_status(
    store: &dyn CompletionStore,
    client_id: Uuid,
) -> Result<CompletionStatus, AppError> {
    Ok(store
        .load_client(client_id)
        .await?
        .map(|aggregate| evaluate_client(&aggregate))
        .unwrap_or(CompletionStatus::NotStarted))
}

pub async fn calculate_property_completion_status(
    store: &dyn CompletionStore,
    property_id: Uuid,
) -> Result<CompletionStatus, AppError> {
    Ok(store
        .load_property(property_id)
        .await?
        .map(|aggregate| evaluate_property(&aggregate))
        .unwrap_or(CompletionStatus::NotStarted))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{completion::RequiredField, document::DocumentKind};

    fn requirements() -> Requirements {
        Requirements {
            required_fields: vec![RequiredField::FirstName, RequiredField::Email],
            required_documents: vec![DocumentKind::IdIdentity, DocumentKind::Rib],
        }
    }

    #[test]
    fn sticky_statuses_ignore_the_check() {
        let nothing = CompletionCheck::from_missing(
            vec![RequiredField::FirstName, RequiredField::Email],
            vec![DocumentKind::IdIdentity, DocumentKind::Rib],
        );

        for sticky in [CompletionStatus::Completed, CompletionStatus::PendingCheck] {
            assert_eq!(derive_status(sticky, false, &requirements(), &nothing), sticky);
        }
    }

    #[test]
    fn no_data_and_no_document_is_not_started() {
        let check = CompletionCheck::from_missing(
            vec![RequiredField::FirstName, RequiredField::Email],
            vec![DocumentKind::IdIdentity, DocumentKind::Rib],
        );
        assert_eq!(
            derive_status(CompletionStatus::NotStarted, false, &requirements(), &check),
            CompletionStatus::NotStarted
        );
    }

    #[test]
    fn a_single_document_is_enough_to_be_partial() {
        let check = CompletionCheck::from_missing(
            vec![RequiredField::FirstName, RequiredField::Email],
            vec![DocumentKind::Rib],
        );
        assert_eq!(
            derive_status(CompletionStatus::NotStarted, false, &requirements(), &check),
            CompletionStatus::Partial
        );
    }

    #[test]
    fn complete_goes_to_pending_check_even_from_partial() {
        let check = CompletionCheck::from_missing(vec![], vec![]);
        assert_eq!(
            derive_status(CompletionStatus::Partial, true, &requirements(), &check),
            CompletionStatus::PendingCheck
        );
    }

    #[test]
    fn empty_requirements_need_data_to_leave_not_started() {
        let empty = Requirements::default();
        let check = CompletionCheck::from_missing(vec![], vec![]);

        assert_eq!(
            derive_status(CompletionStatus::NotStarted, false, &empty, &check),
            CompletionStatus::NotStarted
        );
        assert_eq!(
            derive_status(CompletionStatus::NotStarted, true, &empty, &check),
            CompletionStatus::PendingCheck
        );
    }
}
