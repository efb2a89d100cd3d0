//! Evaluation rubric catalog tests.

use std::collections::HashSet;

use tradedesk_core::rubric::{
    max_total_score, section_by_id, sections_in, RubricCategory, EVALUATION_POINT_SECTIONS,
    MAX_SECTION_SCORE,
};

#[test]
fn catalog_has_fifteen_uniquely_identified_sections() {
    assert_eq!(EVALUATION_POINT_SECTIONS.len(), 15);

    let ids: HashSet<&str> = EVALUATION_POINT_SECTIONS.iter().map(|s| s.id).collect();
    assert_eq!(ids.len(), EVALUATION_POINT_SECTIONS.len(), "section ids must be unique");
}

#[test]
fn category_sizes_match_the_evaluation_form() {
    let count = |c| sections_in(c).count();
    assert_eq!(count(RubricCategory::TradingTasks), 4);
    assert_eq!(count(RubricCategory::DisciplineCompliance), 5);
    assert_eq!(count(RubricCategory::AttitudeConduct), 3);
    assert_eq!(count(RubricCategory::ClientMetrics), 2);
    assert_eq!(count(RubricCategory::TeamContribution), 1);

    let total: usize = RubricCategory::ALL.iter().map(|&c| count(c)).sum();
    assert_eq!(total, EVALUATION_POINT_SECTIONS.len(), "every section belongs to a listed category");
}

#[test]
fn sections_are_grouped_in_category_order() {
    // The form renders categories in ALL order; the catalog must not interleave them.
    let order: Vec<RubricCategory> = EVALUATION_POINT_SECTIONS.iter().map(|s| s.category).collect();
    let mut deduped = order.clone();
    deduped.dedup();
    assert_eq!(deduped, RubricCategory::ALL.to_vec());
}

#[test]
fn every_section_is_labelled_and_described() {
    for s in EVALUATION_POINT_SECTIONS {
        assert!(!s.label.is_empty(), "section {} has no label", s.id);
        assert!(!s.description.is_empty(), "section {} has no description", s.id);
    }
    assert_eq!(RubricCategory::DisciplineCompliance.label(), "Discipline & Compliance");
    assert_eq!(RubricCategory::AttitudeConduct.label(), "Attitude & Professional Conduct");
}

#[test]
fn lookup_by_id() {
    let s = section_by_id("nots_target").expect("nots_target section");
    assert_eq!(s.category, RubricCategory::ClientMetrics);
    assert!(section_by_id("does_not_exist").is_none());
    assert_eq!(max_total_score(), 15 * MAX_SECTION_SCORE);
}
