#[path = "../src/record.rs"]
mod record;

use record::{validate_submission, ValidationError, REQUIRED_FIELDS};
use serde_json::{json, Value};

fn valid_submission() -> Value {
    json!({
        "teacherId": "t1",
        "teacherName": "Kim",
        "subjectId": "s1",
        "subjectName": "Korean",
        "classId": "c1",
        "className": "1-1",
        "studentId": "st1",
        "studentName": "Lee",
        "observation": "Participated actively",
        "achievementTags": ["a", " b ", "", ""]
    })
}

#[test]
fn example_submission_is_accepted() {
    assert_eq!(validate_submission(&valid_submission()), Ok(()));
}

#[test]
fn each_required_field_is_named_when_absent_blank_or_not_text() {
    for field in REQUIRED_FIELDS {
        for bad in [None, Some(json!("   \t")), Some(json!(42)), Some(Value::Null)] {
            let mut input = valid_submission();
            match bad {
                None => {
                    input.as_object_mut().expect("object").remove(field);
                }
                Some(v) => input[field] = v,
            }
            let e = validate_submission(&input).expect_err("must reject");
            assert_eq!(e, ValidationError::MissingField(field));
            assert!(e.to_string().contains(field), "message: {e}");
        }
    }
}

#[test]
fn first_failing_field_wins() {
    let mut input = valid_submission();
    input["studentName"] = json!("");
    input["teacherId"] = json!("");
    input["observation"] = json!("x".repeat(501));
    assert_eq!(
        validate_submission(&input),
        Err(ValidationError::MissingField("teacherId"))
    );
}

#[test]
fn non_object_body_is_missing_everything() {
    assert_eq!(
        validate_submission(&json!([1, 2, 3])),
        Err(ValidationError::MissingField("teacherId"))
    );
    assert_eq!(
        validate_submission(&json!({})),
        Err(ValidationError::MissingField("teacherId"))
    );
}

#[test]
fn observation_over_500_chars_is_rejected() {
    let mut input = valid_submission();
    input["observation"] = json!("x".repeat(501));
    let e = validate_submission(&input).expect_err("too long");
    assert_eq!(
        e,
        ValidationError::FieldTooLong {
            field: "observation",
            max: 500
        }
    );
    assert!(e.to_string().contains("observation"));

    input["observation"] = json!("x".repeat(500));
    assert_eq!(validate_submission(&input), Ok(()));
}

#[test]
fn observation_length_is_measured_before_trimming() {
    let mut input = valid_submission();
    input["observation"] = json!(format!("  {}  ", "x".repeat(499)));
    assert!(matches!(
        validate_submission(&input),
        Err(ValidationError::FieldTooLong {
            field: "observation",
            ..
        })
    ));
}

#[test]
fn length_counts_characters_not_bytes() {
    let mut input = valid_submission();
    input["observation"] = json!("관".repeat(500));
    input["lessonTopic"] = json!("단".repeat(80));
    assert_eq!(validate_submission(&input), Ok(()));
}

#[test]
fn astral_characters_count_as_two_units() {
    let mut input = valid_submission();
    input["observation"] = json!("😀".repeat(250));
    assert_eq!(validate_submission(&input), Ok(()));

    input["observation"] = json!("😀".repeat(251));
    assert_eq!(
        validate_submission(&input),
        Err(ValidationError::FieldTooLong {
            field: "observation",
            max: 500
        })
    );

    input["observation"] = json!("ok");
    input["lessonTopic"] = json!(format!("{}a", "🌱".repeat(40)));
    assert_eq!(
        validate_submission(&input),
        Err(ValidationError::FieldTooLong {
            field: "lessonTopic",
            max: 80
        })
    );
}

#[test]
fn lesson_topic_over_80_chars_is_rejected() {
    let mut input = valid_submission();
    input["lessonTopic"] = json!("y".repeat(81));
    assert_eq!(
        validate_submission(&input),
        Err(ValidationError::FieldTooLong {
            field: "lessonTopic",
            max: 80
        })
    );

    // Absent or non-text topics count as empty.
    input["lessonTopic"] = json!(12345);
    assert_eq!(validate_submission(&input), Ok(()));
    input.as_object_mut().expect("object").remove("lessonTopic");
    assert_eq!(validate_submission(&input), Ok(()));
}

#[test]
fn observation_check_precedes_lesson_topic_check() {
    let mut input = valid_submission();
    input["observation"] = json!("x".repeat(600));
    input["lessonTopic"] = json!("y".repeat(200));
    assert!(matches!(
        validate_submission(&input),
        Err(ValidationError::FieldTooLong {
            field: "observation",
            ..
        })
    ));
}
