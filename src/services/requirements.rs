// src/services/requirements.rs

use crate::models::{
    client::{ClientType, FamilyStatus, MatrimonialRegime, ProfilType},
    completion::{RequiredField, Requirements},
    document::DocumentKind,
    property::PropertyLegalStatus,
};

/// Campos e documentos exigidos de um cliente.
/// Um LEAD não exige nada: é só um contato ainda não qualificado.
pub fn required_client_fields(
    client_type: ClientType,
    profil_type: ProfilType,
    family_status: Option<FamilyStatus>,
    _matrimonial_regime: Option<MatrimonialRegime>,
) -> Requirements {
    let mut req = Requirements::default();

    if profil_type == ProfilType::Lead {
        return req;
    }

    match client_type {
        ClientType::PersonnePhysique => {
            for field in RequiredField::IDENTITY {
                req.field(field);
            }
            req.field(RequiredField::Email);
            req.document(DocumentKind::IdIdentity);

            match family_status {
                Some(FamilyStatus::Marie) => {
                    req.field(RequiredField::MatrimonialRegime);
                    req.document(DocumentKind::LivretDeFamille);
                }
                Some(FamilyStatus::Pacs) => req.document(DocumentKind::ContratDePacs),
                _ => {}
            }
        }
        ClientType::PersonneMorale => {
            req.field(RequiredField::LegalName);
            req.field(RequiredField::Registration);
            req.field(RequiredField::Email);
            req.document(DocumentKind::Kbis);
            req.document(DocumentKind::Statutes);
        }
    }

    match profil_type {
        // Seguro e RIB do proprietário ficam no bem, não no cliente
        ProfilType::Proprietaire => {
            req.field(RequiredField::Phone);
            req.field(RequiredField::FullAddress);
        }
        ProfilType::Locataire => {
            req.field(RequiredField::Phone);
            req.field(RequiredField::FullAddress);
            req.document(DocumentKind::Insurance);
            req.document(DocumentKind::Rib);
        }
        ProfilType::Lead => {}
    }

    req
}

pub fn required_property_fields(legal_status: Option<PropertyLegalStatus>) -> Requirements {
    let mut req = Requirements::default();

    req.field(RequiredField::FullAddress);
    req.document(DocumentKind::Diagnostics);
    req.document(DocumentKind::TitleDeed);
    req.document(DocumentKind::Insurance);
    req.document(DocumentKind::Rib);

    match legal_status {
        Some(PropertyLegalStatus::CoPropriete) => req.document(DocumentKind::ReglementCopropriete),
        Some(PropertyLegalStatus::Lotissement) => {
            req.document(DocumentKind::CahierDeChargeLotissement);
            req.document(DocumentKind::StatutDeLassociationSyndicale);
        }
        _ => {}
    }

    req
}

#[cfg(test)]
mod tests {
    use super::*;
    use DocumentKind::*;

    #[test]
    fn moral_owner_needs_only_company_documents() {
        let req = required_client_fields(ClientType::PersonneMorale, ProfilType::Proprietaire, None, None);

        assert_eq!(req.required_documents, vec![Kbis, Statutes]);
        assert!(!req.required_documents.contains(&IdIdentity));
        assert!(!req.required_documents.contains(&LivretDeFamille));
        assert_eq!(
            req.required_fields,
            vec![
                RequiredField::LegalName,
                RequiredField::Registration,
                RequiredField::Email,
                RequiredField::Phone,
                RequiredField::FullAddress,
            ]
        );
    }

    #[test]
    fn married_person_needs_regime_and_family_book() {
        let req = required_client_fields(
            ClientType::PersonnePhysique,
            ProfilType::Proprietaire,
            Some(FamilyStatus::Marie),
            Some(MatrimonialRegime::SeparationDeBiens),
        );

        assert!(req.required_fields.contains(&RequiredField::MatrimonialRegime));
        assert_eq!(req.required_documents, vec![IdIdentity, LivretDeFamille]);
    }

    #[test]
    fn pacs_needs_the_contract_but_no_regime() {
        let req = required_client_fields(ClientType::PersonnePhysique, ProfilType::Locataire, Some(FamilyStatus::Pacs), None);

        assert!(!req.required_fields.contains(&RequiredField::MatrimonialRegime));
        assert_eq!(req.required_documents, vec![IdIdentity, ContratDePacs, Insurance, Rib]);
    }

    #[test]
    fn lead_requires_nothing() {
        for client_type in [ClientType::PersonnePhysique, ClientType::PersonneMorale] {
            let req = required_client_fields(client_type, ProfilType::Lead, Some(FamilyStatus::Marie), None);
            assert!(req.is_empty());
        }
    }

    #[test]
    fn property_documents_follow_legal_status() {
        assert_eq!(
            required_property_fields(None).required_documents,
            vec![Diagnostics, TitleDeed, Insurance, Rib]
        );
        assert_eq!(
            required_property_fields(Some(PropertyLegalStatus::CoPropriete)).required_documents,
            vec![Diagnostics, TitleDeed, Insurance, Rib, ReglementCopropriete]
        );

        let lotissement = required_property_fields(Some(PropertyLegalStatus::Lotissement));
        assert!(lotissement.required_documents.contains(&CahierDeChargeLotissement));
        assert!(lotissement.required_documents.contains(&StatutDeLassociationSyndicale));
        assert_eq!(lotissement.required_fields, vec![RequiredField::FullAddress]);
    }
}
