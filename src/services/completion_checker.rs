// src/services/completion_checker.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CompletionStore,
    models::{
        client::{ClientAggregate, ClientType, Entreprise, Person},
        completion::{
            CompletionCheck, DetailedClientCompletion, EntrepriseCompletion, PersonCompletion,
            RequiredField, Requirements,
        },
        document::{Document, DocumentKind},
        property::{Property, PropertyAggregate},
    },
    services::requirements::{required_client_fields, required_property_fields},
};

// Tipos verificados em lugares específicos e por isso fora da busca "geral"
const SPECIAL_KINDS: [DocumentKind; 5] = [
    DocumentKind::IdIdentity,
    DocumentKind::LivretDeFamille,
    DocumentKind::ContratDePacs,
    DocumentKind::Kbis,
    DocumentKind::Statutes,
];

const FAMILY_KINDS: [DocumentKind; 2] = [DocumentKind::LivretDeFamille, DocumentKind::ContratDePacs];

const COMPANY_KINDS: [DocumentKind; 2] = [DocumentKind::Kbis, DocumentKind::Statutes];

fn filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

pub(crate) fn person_has(person: &Person, field: RequiredField) -> bool {
    match field {
        RequiredField::FirstName => filled(&person.first_name),
        RequiredField::LastName => filled(&person.last_name),
        RequiredField::Nationality => filled(&person.nationality),
        RequiredField::BirthDate => person.birth_date.is_some(),
        RequiredField::BirthPlace => filled(&person.birth_place),
        RequiredField::Email => filled(&person.email),
        RequiredField::Phone => filled(&person.phone),
        RequiredField::FullAddress => filled(&person.full_address),
        RequiredField::MatrimonialRegime => person.matrimonial_regime.is_some(),
        RequiredField::LegalName | RequiredField::Registration => false,
    }
}

pub(crate) fn entreprise_has(entreprise: &Entreprise, field: RequiredField) -> bool {
    match field {
        RequiredField::LegalName => filled(&entreprise.legal_name),
        RequiredField::Registration => filled(&entreprise.registration),
        RequiredField::Email => filled(&entreprise.email),
        RequiredField::Phone => filled(&entreprise.phone),
        RequiredField::FullAddress => filled(&entreprise.full_address),
        _ => false,
    }
}

fn property_has(property: &Property, field: RequiredField) -> bool {
    match field {
        RequiredField::FullAddress => !property.full_address.trim().is_empty(),
        _ => false,
    }
}

fn has_kind<'a>(mut documents: impl Iterator<Item = &'a Document>, kind: DocumentKind) -> bool {
    documents.any(|d| d.kind == kind)
}

/// Todos os documentos da árvore: nível cliente, pessoas e empresa.
fn all_client_documents(aggregate: &ClientAggregate) -> impl Iterator<Item = &Document> {
    aggregate
        .documents
        .iter()
        .chain(aggregate.persons.iter().flat_map(|p| p.documents.iter()))
        .chain(aggregate.entreprise.iter().flat_map(|e| e.documents.iter()))
}

/// Requisitos do cliente, com estado civil e regime tirados da pessoa principal.
pub fn client_requirements(aggregate: &ClientAggregate) -> Requirements {
    let primary = aggregate.primary_person().map(|p| &p.person);

    required_client_fields(
        aggregate.client.client_type,
        aggregate.client.profil_type,
        primary.and_then(|p| p.family_status),
        primary.and_then(|p| p.matrimonial_regime),
    )
}

pub fn property_requirements(aggregate: &PropertyAggregate) -> Requirements {
    required_property_fields(aggregate.property.legal_status)
}

/// Mantém a ordem dos requisitos e descarta o que não foi exigido.
fn ordered<T: PartialEq + Copy>(required: &[T], missing: &[T]) -> Vec<T> {
    required.iter().copied().filter(|item| missing.contains(item)).collect()
}

/// Verificação detalhada de um cliente já carregado.
pub fn check_client(aggregate: &ClientAggregate, req: &Requirements) -> DetailedClientCompletion {
    let mut missing_fields: Vec<RequiredField> = Vec::new();
    let mut missing_documents: Vec<DocumentKind> = Vec::new();
    let mut persons = Vec::new();
    let mut entreprise = None;

    match aggregate.client.client_type {
        ClientType::PersonnePhysique => {
            let primary_id = aggregate.primary_person().map(|p| p.person.id);
            let needs_id = req.required_documents.contains(&DocumentKind::IdIdentity);

            if aggregate.persons.is_empty() {
                missing_fields.extend(req.required_fields.iter().copied());
                if needs_id {
                    missing_documents.push(DocumentKind::IdIdentity);
                }
            }

            for entry in &aggregate.persons {
                let is_primary = Some(entry.person.id) == primary_id;

                // Co-titulares só precisam da identidade básica
                let person_missing: Vec<RequiredField> = req
                    .required_fields
                    .iter()
                    .copied()
                    .filter(|f| is_primary || RequiredField::IDENTITY.contains(f))
                    .filter(|f| !person_has(&entry.person, *f))
                    .collect();

                let mut person_docs = Vec::new();
                if needs_id && !has_kind(entry.documents.iter(), DocumentKind::IdIdentity) {
                    person_docs.push(DocumentKind::IdIdentity);
                    missing_documents.push(DocumentKind::IdIdentity);
                }

                missing_fields.extend(person_missing.iter().copied());
                persons.push(PersonCompletion {
                    person_id: entry.person.id,
                    is_primary,
                    missing_fields: person_missing,
                    missing_documents: person_docs,
                });
            }
        }
        ClientType::PersonneMorale => match &aggregate.entreprise {
            Some(entry) => {
                let company_missing: Vec<RequiredField> = req
                    .required_fields
                    .iter()
                    .copied()
                    .filter(|f| !entreprise_has(&entry.entreprise, *f))
                    .collect();

                let company_docs: Vec<DocumentKind> = req
                    .required_documents
                    .iter()
                    .copied()
                    .filter(|k| COMPANY_KINDS.contains(k))
                    .filter(|k| !has_kind(entry.documents.iter(), *k))
                    .collect();

                missing_fields.extend(company_missing.iter().copied());
                missing_documents.extend(company_docs.iter().copied());
                entreprise = Some(EntrepriseCompletion {
                    entreprise_id: entry.entreprise.id,
                    missing_fields: company_missing,
                    missing_documents: company_docs,
                });
            }
            None => {
                missing_fields.extend(req.required_fields.iter().copied());
                missing_documents.extend(
                    req.required_documents.iter().copied().filter(|k| COMPANY_KINDS.contains(k)),
                );
            }
        },
    }

    // Família e documentos gerais: basta existir em qualquer ponto da árvore
    let client_missing_documents: Vec<DocumentKind> = req
        .required_documents
        .iter()
        .copied()
        .filter(|k| FAMILY_KINDS.contains(k) || !SPECIAL_KINDS.contains(k))
        .filter(|k| !has_kind(all_client_documents(aggregate), *k))
        .collect();
    missing_documents.extend(client_missing_documents.iter().copied());

    DetailedClientCompletion {
        summary: CompletionCheck::from_missing(
            ordered(&req.required_fields, &missing_fields),
            ordered(&req.required_documents, &missing_documents),
        ),
        persons,
        entreprise,
        client_missing_documents,
    }
}

pub fn check_property(aggregate: &PropertyAggregate, req: &Requirements) -> CompletionCheck {
    let missing_fields = req
        .required_fields
        .iter()
        .copied()
        .filter(|f| !property_has(&aggregate.property, *f))
        .collect();

    let missing_documents = req
        .required_documents
        .iter()
        .copied()
        .filter(|k| !has_kind(aggregate.documents.iter(), *k))
        .collect();

    CompletionCheck::from_missing(missing_fields, missing_documents)
}

// =========================================================================
//  PONTOS DE ENTRADA (leitura + verificação)
// =========================================================================

pub async fn check_client_completion(store: &dyn CompletionStore, client_id: Uuid) -> Result<CompletionCheck, AppError> {
    Ok(check_client_completion_detailed(store, client_id).await?.summary)
}

/// Cliente inexistente não é erro: devolve o resultado "nada preenchido".
pub async fn check_client_completion_detailed(
    store: &dyn CompletionStore,
    client_id: Uuid,
) -> Result<DetailedClientCompletion, AppError> {
    let Some(aggregate) = store.load_client(client_id).await? else {
        return Ok(DetailedClientCompletion {
            summary: CompletionCheck::not_found(),
            ..Default::default()
        });
    };

    let req = client_requirements(&aggregate);
    Ok(check_client(&aggregate, &req))
}

pub async fn check_property_completion(
    store: &dyn CompletionStore,
    property_id: Uuid,
) -> Result<CompletionCheck, AppError> {
    let Some(aggregate) = store.load_property(property_id).await? else {
        return Ok(CompletionCheck::not_found());
    };

    let req = property_requirements(&aggregate);
    Ok(check_property(&aggregate, &req))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    use crate::models::client::{
        Client, CompletionStatus, EntrepriseWithDocuments, FamilyStatus, MatrimonialRegime,
        PersonWithDocuments, ProfilType,
    };
    use crate::models::document::DocumentOwner;

    fn doc(kind: DocumentKind, owner: DocumentOwner) -> Document {
        let [client_id, person_id, entreprise_id, property_id, bail_id] = owner.columns();
        Document {
            id: Uuid::new_v4(),
            kind,
            file_key: format!("docs/{}", kind.as_str()),
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

    fn full_person(client_id: Uuid, is_primary: bool) -> Person {
        Person {
            id: Uuid::new_v4(),
            client_id,
            is_primary,
            first_name: Some("Camille".into()),
            last_name: Some("Martin".into()),
            email: Some("camille@example.fr".into()),
            phone: Some("+33600000000".into()),
            full_address: Some("3 quai Saint-Vincent, Lyon".into()),
            nationality: Some("Française".into()),
            birth_date: NaiveDate::from_ymd_opt(1986, 3, 2),
            birth_place: Some("Lyon".into()),
            profession: None,
            family_status: Some(FamilyStatus::Marie),
            matrimonial_regime: Some(MatrimonialRegime::CommunauteReduiteAuxAcquets),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn physical(profil_type: ProfilType, persons: Vec<Person>) -> ClientAggregate {
        let client_id = persons.first().map(|p| p.client_id).unwrap_or_else(Uuid::new_v4);
        ClientAggregate {
            client: Client {
                id: client_id,
                client_type: ClientType::PersonnePhysique,
                profil_type,
                completion_status: CompletionStatus::NotStarted,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            persons: persons
                .into_iter()
                .map(|person| {
                    let id_doc = doc(DocumentKind::IdIdentity, DocumentOwner::Person(person.id));
                    PersonWithDocuments { person, documents: vec![id_doc] }
                })
                .collect(),
            entreprise: None,
            documents: vec![],
        }
    }

    fn check(aggregate: &ClientAggregate) -> DetailedClientCompletion {
        check_client(aggregate, &client_requirements(aggregate))
    }

    #[test]
    fn married_owner_misses_only_the_family_book() {
        let client_id = Uuid::new_v4();
        let mut aggregate = physical(ProfilType::Proprietaire, vec![full_person(client_id, true)]);

        let result = check(&aggregate);
        assert_eq!(result.summary.missing_documents, vec![DocumentKind::LivretDeFamille]);
        assert_eq!(result.client_missing_documents, vec![DocumentKind::LivretDeFamille]);
        assert!(result.summary.has_all_fields);

        aggregate
            .documents
            .push(doc(DocumentKind::LivretDeFamille, DocumentOwner::Client(client_id)));
        assert!(check(&aggregate).summary.is_complete());
    }

    #[test]
    fn co_holder_only_needs_identity_and_own_id() {
        let client_id = Uuid::new_v4();
        let mut co_holder = full_person(client_id, false);
        co_holder.email = None;
        co_holder.phone = None;
        co_holder.birth_place = None;

        let mut aggregate = physical(ProfilType::Proprietaire, vec![full_person(client_id, true), co_holder]);
        aggregate
            .documents
            .push(doc(DocumentKind::LivretDeFamille, DocumentOwner::Client(client_id)));
        aggregate.persons[1].documents.clear();

        let result = check(&aggregate);
        assert_eq!(result.summary.missing_fields, vec![RequiredField::BirthPlace]);
        assert_eq!(result.summary.missing_documents, vec![DocumentKind::IdIdentity]);
        assert!(result.persons[0].missing_documents.is_empty());
        assert_eq!(result.persons[1].missing_documents, vec![DocumentKind::IdIdentity]);
        assert_eq!(result.persons[1].missing_fields, vec![RequiredField::BirthPlace]);
    }

    #[test]
    fn tenant_general_documents_can_live_anywhere_in_the_tree() {
        let client_id = Uuid::new_v4();
        let mut person = full_person(client_id, true);
        person.family_status = Some(FamilyStatus::Celibataire);
        let mut aggregate = physical(ProfilType::Locataire, vec![person]);

        assert_eq!(
            check(&aggregate).summary.missing_documents,
            vec![DocumentKind::Insurance, DocumentKind::Rib]
        );

        let person_id = aggregate.persons[0].person.id;
        aggregate.persons[0]
            .documents
            .push(doc(DocumentKind::Rib, DocumentOwner::Person(person_id)));
        aggregate
            .documents
            .push(doc(DocumentKind::Insurance, DocumentOwner::Client(client_id)));

        assert!(check(&aggregate).summary.is_complete());
    }

    #[test]
    fn moral_client_is_checked_on_the_company() {
        let client_id = Uuid::new_v4();
        let company = Entreprise {
            id: Uuid::new_v4(),
            client_id,
            legal_name: Some("SCI Les Tilleuls".into()),
            name: None,
            registration: None,
            email: Some("contact@tilleuls.fr".into()),
            phone: Some("0478000000".into()),
            full_address: Some("Lyon".into()),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let company_id = company.id;

        let aggregate = ClientAggregate {
            client: Client {
                id: client_id,
                client_type: ClientType::PersonneMorale,
                profil_type: ProfilType::Proprietaire,
                completion_status: CompletionStatus::Partial,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            persons: vec![],
            entreprise: Some(EntrepriseWithDocuments {
                entreprise: company,
                documents: vec![doc(DocumentKind::Kbis, DocumentOwner::Entreprise(company_id))],
            }),
            // STATUTES fora da empresa não conta
            documents: vec![doc(DocumentKind::Statutes, DocumentOwner::Client(client_id))],
        };

        let result = check(&aggregate);
        assert_eq!(result.summary.missing_fields, vec![RequiredField::Registration]);
        assert_eq!(result.summary.missing_documents, vec![DocumentKind::Statutes]);
        assert!(result.persons.is_empty());
        assert!(result.client_missing_documents.is_empty());
    }

    #[test]
    fn physical_client_without_persons_misses_everything() {
        let aggregate = physical(ProfilType::Proprietaire, vec![]);
        let result = check(&aggregate);

        assert_eq!(result.summary.missing_fields.len(), 8);
        assert_eq!(result.summary.missing_documents, vec![DocumentKind::IdIdentity]);
    }
}
