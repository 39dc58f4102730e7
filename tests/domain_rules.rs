// tests/domain_rules.rs

mod common;

use uuid::Uuid;

use bailnotarie::models::{
    bail::BailType,
    client::ProfilType,
    document::{DocumentKind, DocumentOwner},
};

use common::*;

#[test]
fn furnished_lease_needs_every_furniture_item() {
    let mut p = property(Uuid::new_v4());
    assert!(!p.is_furnished_eligible());

    p.has_bedding = true;
    p.has_blackout = true;
    p.has_hob = true;
    p.has_oven_or_microwave = true;
    p.has_fridge = true;
    p.has_freezer = true;
    p.has_tableware = true;
    p.has_kitchen_utensils = true;
    p.has_table = true;
    p.has_seating = true;
    p.has_storage_shelves = true;
    p.has_light_fixtures = true;
    assert!(!p.is_furnished_eligible());

    p.has_cleaning_equipment = true;
    assert!(p.is_furnished_eligible());
    assert!(BailType::BailMeubleEtudiant.is_furnished());
}

#[test]
fn property_name_falls_back_to_the_address() {
    let mut p = property(Uuid::new_v4());
    assert_eq!(p.display_name(), "8 quai Saint-Vincent, 69001 Lyon");

    p.label = Some("   ".into());
    assert_eq!(p.display_name(), "8 quai Saint-Vincent, 69001 Lyon");

    p.label = Some("T2 Saint-Paul".into());
    assert_eq!(p.display_name(), "T2 Saint-Paul");
}

#[test]
fn aggregate_contact_follows_the_client_type() {
    let physical = complete_physical_client(ProfilType::Proprietaire);
    assert_eq!(physical.contact_email().as_deref(), Some("camille.martin@example.fr"));
    assert_eq!(physical.display_name(), "Camille Martin");

    let moral = moral_client(ProfilType::Proprietaire, vec![DocumentKind::Kbis]);
    assert_eq!(moral.contact_email().as_deref(), Some("gerance@tilleuls.fr"));
    assert_eq!(moral.display_name(), "SCI Les Tilleuls");
}

#[test]
fn stored_documents_resolve_to_a_single_owner() {
    let bail_id = Uuid::new_v4();
    let doc = document(DocumentKind::BailSigne, DocumentOwner::Bail(bail_id));
    assert_eq!(doc.owner().unwrap(), DocumentOwner::Bail(bail_id));

    let mut broken = doc.clone();
    broken.client_id = Some(Uuid::new_v4());
    assert!(broken.owner().is_err());
}
