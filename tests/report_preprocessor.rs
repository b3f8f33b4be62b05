use std::cell::Cell;

use cibguard::core::constraints::{
    CibConstraints, ColocationConstraint, ConstraintFetchError, ConstraintSource,
    LocationConstraint, OrderConstraint, ResourceSet, SetConstraint, TicketConstraint,
};
use cibguard::core::preprocessor::ReportPreprocessor;
use cibguard::core::reports::{
    AllowedValues, ReportItem, ReportMessage,
};

struct FakeConstraintSource {
    config: Option<CibConstraints>,
    failure_output: Option<String>,
    failure_reports: Vec<ReportItem>,
    fetch_count: Cell<usize>,
}

impl FakeConstraintSource {
    fn with_config(config: CibConstraints) -> Self {
        FakeConstraintSource {
            config: Some(config),
            failure_output: None,
            failure_reports: Vec::new(),
            fetch_count: Cell::new(0),
        }
    }

    fn failing(output: Option<&str>, reports: Vec<ReportItem>) -> Self {
        FakeConstraintSource {
            config: None,
            failure_output: output.map(|line| line.to_string()),
            failure_reports: reports,
            fetch_count: Cell::new(0),
        }
    }
}

impl ConstraintSource for FakeConstraintSource {
    fn constraint_config(
        &self,
        _evaluate_rules: bool,
    ) -> Result<CibConstraints, ConstraintFetchError> {
        self.fetch_count.set(self.fetch_count.get() + 1);
        match &self.config {
            Some(config) => Ok(config.clone()),
            None => Err(ConstraintFetchError {
                output: self.failure_output.clone(),
                reports: self.failure_reports.clone(),
            }),
        }
    }
}

fn names(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

fn constraint_config() -> CibConstraints {
    CibConstraints {
        location: vec![LocationConstraint {
            constraint_id: "loc-1".to_string(),
            resource: "web".to_string(),
            node: "node1".to_string(),
            score: "INFINITY".to_string(),
        }],
        location_set: vec![SetConstraint {
            constraint_id: "loc-set-1".to_string(),
            resource_sets: vec![ResourceSet {
                id: "loc-set-1-set".to_string(),
                resources: names(&["web", "db"]),
            }],
        }],
        colocation: vec![ColocationConstraint {
            constraint_id: "col-1".to_string(),
            resource: "web".to_string(),
            with_resource: "ip".to_string(),
            score: "INFINITY".to_string(),
        }],
        order: vec![OrderConstraint {
            constraint_id: "ord-1".to_string(),
            first: "ip".to_string(),
            then: "web".to_string(),
        }],
        ticket: vec![TicketConstraint {
            constraint_id: "tick-1".to_string(),
            resource: "db".to_string(),
            ticket: "ticket-a".to_string(),
            loss_policy: None,
        }],
        ..CibConstraints::default()
    }
}

fn duplicates_exist(ids: &[&str]) -> ReportItem {
    ReportItem::forceable(ReportMessage::DuplicateConstraintsExist {
        constraint_ids: names(ids),
    })
}

fn unrelated_item() -> ReportItem {
    ReportItem::forceable(ReportMessage::InvalidOptionValue {
        option_name: "time_param".to_string(),
        option_value: "10x".to_string(),
        allowed_values: AllowedValues::Description("time interval".to_string()),
    })
}

#[test]
fn unrelated_reports_pass_through_without_fetch() {
    let source = FakeConstraintSource::with_config(constraint_config());
    let mut buffer = Vec::new();
    let mut preprocessor = ReportPreprocessor::new(&source, &mut buffer);

    let item = unrelated_item();
    assert_eq!(preprocessor.process(item.clone()), Some(item));

    assert_eq!(source.fetch_count.get(), 0);
    assert!(buffer.is_empty());
}

#[test]
fn legacy_duplicate_list_report_is_dropped() {
    let source = FakeConstraintSource::with_config(constraint_config());
    let mut buffer = Vec::new();
    let mut preprocessor = ReportPreprocessor::new(&source, &mut buffer);

    let legacy = ReportItem::forceable(ReportMessage::DuplicateConstraintsList {
        constraint_info_list: vec![serde_json::json!({"options": {"id": "loc-1"}})],
    });
    assert_eq!(preprocessor.process(legacy), None);

    assert_eq!(source.fetch_count.get(), 0);
    assert!(buffer.is_empty());
}

#[test]
fn duplicate_constraints_are_described_ahead_of_the_report() {
    let source = FakeConstraintSource::with_config(constraint_config());
    let mut buffer = Vec::new();
    let mut preprocessor = ReportPreprocessor::new(&source, &mut buffer);

    let item = duplicates_exist(&["loc-1", "ord-1", "loc-set-1"]);
    assert_eq!(preprocessor.process(item.clone()), Some(item));
    drop(preprocessor);

    let side_text = String::from_utf8(buffer).expect("utf8 side channel");
    assert_eq!(
        side_text,
        "Duplicate constraints:\n\
         \x20\x20resource 'web' prefers node 'node1' with score INFINITY (id: loc-1)\n\
         \x20\x20resource sets (id: loc-set-1):\n\
         \x20\x20\x20\x20set web db (id: loc-set-1-set)\n\
         \x20\x20start resource 'ip' then start resource 'web' (id: ord-1)\n"
    );
    assert_eq!(source.fetch_count.get(), 1);
}

#[test]
fn constraint_config_is_fetched_once_per_session() {
    let source = FakeConstraintSource::with_config(constraint_config());
    let mut buffer = Vec::new();
    let mut preprocessor = ReportPreprocessor::new(&source, &mut buffer);

    let item = duplicates_exist(&["col-1"]);
    assert!(preprocessor.process(item.clone()).is_some());
    assert!(preprocessor.process(item).is_some());
    drop(preprocessor);

    assert_eq!(source.fetch_count.get(), 1);
    let side_text = String::from_utf8(buffer).expect("utf8 side channel");
    assert_eq!(
        side_text.matches("Duplicate constraints:").count(),
        2,
        "each diagnostic gets its own description block"
    );
}

#[test]
fn fetch_failure_degrades_to_bare_id_list() {
    let embedded = ReportItem::warning(ReportMessage::InvalidOptionValue {
        option_name: "op".to_string(),
        option_value: "v".to_string(),
        allowed_values: AllowedValues::Description("something".to_string()),
    });
    let source = FakeConstraintSource::failing(Some("crm query failed"), vec![embedded]);
    let mut buffer = Vec::new();
    let mut preprocessor = ReportPreprocessor::new(&source, &mut buffer);

    let item = duplicates_exist(&["dup-b", "dup-a"]);
    assert_eq!(preprocessor.process(item.clone()), Some(item));
    drop(preprocessor);

    let side_text = String::from_utf8(buffer).expect("utf8 side channel");
    let lines: Vec<&str> = side_text.lines().collect();
    assert_eq!(
        lines,
        vec![
            "crm query failed",
            "Warning: 'v' is not a valid op value, use something",
            "Duplicate constraints: 'dup-a', 'dup-b'",
        ]
    );
}

#[test]
fn fetch_failure_without_details_still_lists_ids() {
    let source = FakeConstraintSource::failing(None, Vec::new());
    let mut buffer = Vec::new();
    let mut preprocessor = ReportPreprocessor::new(&source, &mut buffer);

    assert!(preprocessor.process(duplicates_exist(&["dup-a"])).is_some());
    drop(preprocessor);

    let side_text = String::from_utf8(buffer).expect("utf8 side channel");
    assert_eq!(side_text, "Duplicate constraints: 'dup-a'\n");
}
