//! End-to-end pipeline runs over in-memory collections.

use proptest::prelude::*;
use serde_json::{Value, json};

use enroll_model::{
    DuplicateIdPolicy, EntityKind, FilterOptions, FilterStage, JoinSide, MatchingMode,
    NormalizationOptions, PipelineOptions, ValidationError, Violation, WarningCategory,
};
use enroll_transform::{PipelineInput, PipelineOutput, TransformError, run_pipeline};

#[derive(Debug, Clone)]
struct Fixture {
    courses: Vec<Value>,
    users: Vec<Value>,
    enrollments: Vec<Value>,
}

impl Fixture {
    fn input(&self) -> PipelineInput<'_> {
        PipelineInput {
            courses: &self.courses,
            users: &self.users,
            enrollments: &self.enrollments,
        }
    }

    fn run(&self, options: &PipelineOptions) -> PipelineOutput {
        run_pipeline(self.input(), options).expect("pipeline run")
    }
}

fn course(id: &str, course_id: &str, name: &str, available: &str) -> Value {
    json!({
        "id": id,
        "courseId": course_id,
        "name": name,
        "description": "",
        "availability": { "available": available }
    })
}

fn user(id: &str, given: &str, family: &str) -> Value {
    user_with_availability(id, given, family, "Yes")
}

fn user_with_availability(id: &str, given: &str, family: &str, available: &str) -> Value {
    json!({
        "id": id,
        "userName": given.to_lowercase(),
        "name": { "given": given, "family": family },
        "contact": { "email": format!("{}@example.edu", given.to_lowercase()) },
        "availability": { "available": available }
    })
}

fn enrollment(id: &str, user_id: &str, course_id: &str, kind: &str, available: bool) -> Value {
    json!({
        "id": id,
        "userId": user_id,
        "courseId": course_id,
        "type": kind,
        "role": kind,
        "availability": { "available": available }
    })
}

fn campus() -> Fixture {
    Fixture {
        courses: vec![
            course("_c1_1", "CS101-2025FA", "Intro to CS", "Yes"),
            course("_c2_1", "CS102-2025FA", "Data Structures", "No"),
            course("_c3_1", "MATH201", "Linear Algebra", "Yes"),
        ],
        users: vec![
            user("_u1_1", "Ada", "Lovelace"),
            user("_u2_1", "Alan", "Turing"),
            user("_u3_1", "Grace", "Hopper"),
            user("_u4_1", "Emmy", "Noether"),
        ],
        enrollments: vec![
            enrollment("_e1_1", "_u1_1", "_c1_1", "Instructor", true),
            enrollment("_e2_1", "_u2_1", "_c1_1", "Student", true),
            enrollment("_e3_1", "_u3_1", "_c2_1", "Student", true),
            enrollment("_e4_1", "_u4_1", "_c3_1", "Student", true),
            enrollment("_e5_1", "_u9_1", "_c1_1", "Student", true),
        ],
    }
}

fn course_ids(output: &PipelineOutput) -> Vec<&str> {
    output
        .records
        .iter()
        .map(|record| record.course.course_id.as_str())
        .collect()
}

#[test]
fn unmatched_user_is_dropped_with_one_warning() {
    let output = campus().run(&PipelineOptions::default());
    assert_eq!(output.records.len(), 4);
    assert_eq!(output.audit.loaded.enrollments, 5);
    assert_eq!(output.audit.joined, 4);
    assert_eq!(output.audit.dropped, 1);
    assert_eq!(
        output.audit.warning_count(WarningCategory::UnmatchedEnrollment),
        1
    );
    assert_eq!(output.audit.dropped_on(JoinSide::User), 1);
    assert_eq!(output.audit.emitted, 4);
}

#[test]
fn course_filter_then_availability() {
    let fixture = campus();
    let filter = FilterOptions::new().with_course_filter(Some("CS1".to_string()));
    let output = fixture.run(&PipelineOptions::new(filter.clone()));
    assert_eq!(
        course_ids(&output),
        vec!["CS101-2025FA", "CS101-2025FA", "CS102-2025FA"]
    );

    let output = fixture.run(&PipelineOptions::new(filter.with_only_available(true)));
    assert_eq!(course_ids(&output), vec!["CS101-2025FA", "CS101-2025FA"]);
    let stage = output.audit.stage(FilterStage::Availability).unwrap();
    assert_eq!((stage.before, stage.after), (3, 2));
}

fn enrollment_ids(output: &PipelineOutput) -> Vec<&str> {
    output
        .records
        .iter()
        .map(|record| record.enrollment.id.as_str())
        .collect()
}

#[test]
fn only_available_requires_user_and_enrollment() {
    let only_available = PipelineOptions::new(FilterOptions::new().with_only_available(true));

    let mut fixture = campus();
    fixture.users[1] = user_with_availability("_u2_1", "Alan", "Turing", "No");
    assert_eq!(
        enrollment_ids(&fixture.run(&PipelineOptions::default())),
        vec!["_e1_1", "_e2_1", "_e3_1", "_e4_1"]
    );
    assert_eq!(
        enrollment_ids(&fixture.run(&only_available)),
        vec!["_e1_1", "_e4_1"]
    );

    let mut fixture = campus();
    fixture.enrollments[3] = enrollment("_e4_1", "_u4_1", "_c3_1", "Student", false);
    let output = fixture.run(&only_available);
    assert_eq!(enrollment_ids(&output), vec!["_e1_1", "_e2_1"]);
    let stage = output.audit.stage(FilterStage::Availability).unwrap();
    assert_eq!((stage.before, stage.after), (4, 2));
}

#[test]
fn role_toggles() {
    let fixture = campus();
    let output = fixture.run(&PipelineOptions::new(
        FilterOptions::new().with_students(false),
    ));
    assert_eq!(output.records.len(), 1);
    assert_eq!(output.records[0].user_full_name, "Ada Lovelace");

    let output = fixture.run(&PipelineOptions::new(
        FilterOptions::new().with_instructors(false).with_students(false),
    ));
    assert!(output.records.is_empty());
    assert_eq!(output.audit.joined, 4);
}

#[test]
fn derived_fields_are_filled() {
    let output = campus().run(&PipelineOptions::default());
    let first = &output.records[0];
    assert_eq!(first.user_full_name, "Ada Lovelace");
    assert!(first.course_label.contains("CS101-2025FA"));
    assert!(first.course_label.contains("Intro to CS"));
    assert_eq!(first.course.term.as_deref(), Some("2025FA"));
    assert_eq!(first.course.description, None);
}

#[test]
fn identical_inputs_give_identical_output() {
    let fixture = campus();
    let options = PipelineOptions::default();
    let first = fixture.run(&options);
    let second = fixture.run(&options);
    assert_eq!(first.records, second.records);
    assert_eq!(first.audit, second.audit);
}

#[test]
fn unknown_role_is_kept_and_warned() {
    let mut fixture = campus();
    fixture.enrollments[1] = json!({
        "id": "_e2_1",
        "userId": "_u2_1",
        "courseId": "_c1_1",
        "type": "Student",
        "role": "SuperRole",
        "availability": { "available": true }
    });
    let output = fixture.run(&PipelineOptions::default());
    assert_eq!(output.records.len(), 4);
    assert_eq!(output.records[1].enrollment.role.as_str(), "SuperRole");
    assert_eq!(output.audit.warning_count(WarningCategory::UnknownRole), 1);
    let warning = output
        .audit
        .warnings
        .iter()
        .find(|warning| warning.category() == WarningCategory::UnknownRole)
        .unwrap();
    assert_eq!(warning.record_id(), "_e2_1");
    assert!(warning.to_string().contains("SuperRole"));
}

#[test]
fn strict_matching_flags_lowercase_values() {
    let mut fixture = campus();
    fixture.enrollments[1] = enrollment("_e2_1", "_u2_1", "_c1_1", "student", true);
    let options = PipelineOptions::default().with_normalization(
        NormalizationOptions::new().with_matching(MatchingMode::Strict),
    );
    let output = fixture.run(&options);
    assert_eq!(output.audit.warning_count(WarningCategory::UnknownType), 1);
    assert_eq!(output.audit.warning_count(WarningCategory::UnknownRole), 1);

    let output = fixture.run(&PipelineOptions::default());
    assert_eq!(output.audit.warning_count(WarningCategory::UnknownType), 0);
}

#[test]
fn invalid_email_aborts_the_run() {
    let mut fixture = campus();
    fixture.users[2]["contact"]["email"] = json!("grace.example.edu");
    let err = run_pipeline(fixture.input(), &PipelineOptions::default()).unwrap_err();
    match err {
        TransformError::Validation(ValidationError {
            entity,
            index,
            field,
            violation,
            ..
        }) => {
            assert_eq!(entity, EntityKind::User);
            assert_eq!(index, 2);
            assert_eq!(field, "contact.email");
            assert!(matches!(violation, Violation::InvalidEmail(_)));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn duplicate_ids_follow_policy() {
    let mut fixture = campus();
    fixture.users.push(user("_u1_1", "Augusta", "King"));
    let output = fixture.run(&PipelineOptions::default());
    assert_eq!(output.records[0].user_full_name, "Augusta King");
    assert_eq!(output.audit.warning_count(WarningCategory::DuplicateId), 1);

    let options = PipelineOptions::default().with_normalization(
        NormalizationOptions::new().with_duplicate_ids(DuplicateIdPolicy::Reject),
    );
    assert!(matches!(
        run_pipeline(fixture.input(), &options),
        Err(TransformError::DuplicateId { entity: EntityKind::User, .. })
    ));
}

fn arb_fixture() -> impl Strategy<Value = Fixture> {
    let kinds = prop::sample::select(vec!["Instructor", "Student", "Grader", "Mystery"]);
    let enrollments = prop::collection::vec(
        (0usize..4, 0usize..4, kinds, any::<bool>()),
        0..24,
    );
    let flags = || prop::collection::vec(any::<bool>(), 3);
    (flags(), flags(), enrollments).prop_map(|(course_flags, user_flags, rows)| {
        let names = ["CS101-2025FA", "CS102-2025FA", "MATH201"];
        Fixture {
            courses: names
                .iter()
                .zip(&course_flags)
                .enumerate()
                .map(|(i, (name, open))| {
                    course(
                        &format!("_c{i}_1"),
                        name,
                        "Course",
                        if *open { "Yes" } else { "No" },
                    )
                })
                .collect(),
            users: user_flags
                .iter()
                .enumerate()
                .map(|(i, open)| {
                    user_with_availability(
                        &format!("_u{i}_1"),
                        "Pat",
                        "Doe",
                        if *open { "Yes" } else { "No" },
                    )
                })
                .collect(),
            enrollments: rows
                .into_iter()
                .enumerate()
                .map(|(i, (u, c, kind, open))| {
                    enrollment(
                        &format!("_e{i}_1"),
                        &format!("_u{u}_1"),
                        &format!("_c{c}_1"),
                        kind,
                        open,
                    )
                })
                .collect(),
        }
    })
}

/// Whether `narrow` is an order-preserving subsequence of `broad`.
fn is_subsequence(narrow: &PipelineOutput, broad: &PipelineOutput) -> bool {
    let mut remaining = broad.records.iter();
    narrow
        .records
        .iter()
        .all(|record| remaining.any(|candidate| candidate == record))
}

fn role_filter(instructors: bool, students: bool) -> FilterOptions {
    FilterOptions::new()
        .with_instructors(instructors)
        .with_students(students)
}

proptest! {
    #[test]
    fn filters_only_ever_remove(
        fixture in arb_fixture(),
        instructors in any::<bool>(),
        students in any::<bool>(),
        only_available in any::<bool>(),
        needle in prop::sample::select(vec!["", "cs", "CS102", "math", "zzz"]),
    ) {
        let unfiltered = fixture.run(&PipelineOptions::default());
        let filter = FilterOptions::new()
            .with_instructors(instructors)
            .with_students(students)
            .with_course_filter(Some(needle.to_string()))
            .with_only_available(only_available);
        let filtered = fixture.run(&PipelineOptions::new(filter));

        prop_assert_eq!(unfiltered.records.len(), unfiltered.audit.joined);
        prop_assert_eq!(
            unfiltered.audit.joined + unfiltered.audit.dropped,
            fixture.enrollments.len()
        );
        prop_assert!(filtered.records.len() <= unfiltered.records.len());

        prop_assert!(is_subsequence(&filtered, &unfiltered));

        let mut previous = filtered.audit.joined;
        for stage in &filtered.audit.filter_stages {
            prop_assert_eq!(stage.before, previous);
            prop_assert!(stage.after <= stage.before);
            previous = stage.after;
        }
        prop_assert_eq!(previous, filtered.audit.emitted);
    }

    #[test]
    fn only_available_never_adds_records(
        fixture in arb_fixture(),
        instructors in any::<bool>(),
        students in any::<bool>(),
        needle in prop::sample::select(vec!["", "cs", "math"]),
    ) {
        let filter = role_filter(instructors, students)
            .with_course_filter(Some(needle.to_string()));
        let without = fixture.run(&PipelineOptions::new(filter.clone()));
        let with = fixture.run(&PipelineOptions::new(filter.with_only_available(true)));

        prop_assert!(is_subsequence(&with, &without));
        let all_available = with.records.iter().all(|record| {
            record.enrollment.available && record.user.available && record.course.available
        });
        prop_assert!(all_available);
    }

    #[test]
    fn narrower_course_filter_never_adds_records(
        fixture in arb_fixture(),
        instructors in any::<bool>(),
        students in any::<bool>(),
        only_available in any::<bool>(),
        (broad, narrow) in prop::sample::select(vec![
            ("", "cs"),
            ("cs", "CS1"),
            ("cs1", "CS102"),
            ("", "math"),
        ]),
    ) {
        let filter = role_filter(instructors, students).with_only_available(only_available);
        let broader = fixture.run(&PipelineOptions::new(
            filter.clone().with_course_filter(Some(broad.to_string())),
        ));
        let narrower = fixture.run(&PipelineOptions::new(
            filter.with_course_filter(Some(narrow.to_string())),
        ));

        prop_assert!(is_subsequence(&narrower, &broader));
    }
}
