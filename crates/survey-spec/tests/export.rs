use std::collections::{BTreeMap, BTreeSet};

use survey_spec::{
    ArtifactKind, ExportError, QuestionType, RuleSet, Schema, SurveyConfig, build, export,
    export::{BACKUP_FILE, SUMMARY_FILE, TABULAR_FILE, TABULAR_HEADER, UTF8_BOM},
    parse_backup, render_backup, render_tabular, write_all,
};

fn standard_schema() -> Schema {
    build(&RuleSet::standard()).expect("build")
}

fn fixture_schema() -> Schema {
    let config = SurveyConfig::from_json_str(include_str!("fixtures/small_config.json"))
        .expect("fixture config");
    build(&config.rules).expect("build")
}

#[test]
fn tabular_and_backup_agree_with_schema() {
    let schema = standard_schema();
    let bundle = export(&schema).expect("export");

    let expected = schema
        .questions
        .iter()
        .map(|q| (q.id.clone(), (q.kind, q.required, q.prompt.clone())))
        .collect::<BTreeMap<_, _>>();

    let tabular = bundle
        .rows
        .iter()
        .map(|row| {
            let kind: QuestionType =
                serde_json::from_value(serde_json::Value::String(row.question_type.clone()))
                    .expect("known question type");
            (
                row.question_id.clone(),
                (kind, row.is_required(), row.question_text.clone()),
            )
        })
        .collect::<BTreeMap<_, _>>();
    assert_eq!(tabular, expected);

    let backup = bundle
        .backup
        .groupings
        .values()
        .flatten()
        .map(|q| (q.id.clone(), (q.kind, q.required, q.prompt.clone())))
        .collect::<BTreeMap<_, _>>();
    assert_eq!(backup, expected);
}

#[test]
fn tabular_rows_keep_canonical_order() {
    let schema = standard_schema();
    let bundle = export(&schema).expect("export");
    assert!(
        bundle
            .rows
            .iter()
            .map(|row| row.question_id.as_str())
            .eq(schema.ids())
    );
}

#[test]
fn tabular_cells_render_flags_options_and_bounds() {
    let bundle = export(&standard_schema()).expect("export");

    let gender = &bundle.rows[2];
    assert_eq!(gender.options, "Nam|Nữ|Khác");
    assert_eq!(gender.scale_min, None);
    assert_eq!(gender.required, "Yes");

    let hometown = &bundle.rows[4];
    assert_eq!(hometown.required, "No");
    assert!(hometown.options.is_empty());

    let english = &bundle.rows[9];
    assert_eq!(english.scale_min, Some(1));
    assert_eq!(english.scale_max, Some(10));
}

#[test]
fn csv_has_header_and_quotes_commas() {
    let bundle = export(&fixture_schema()).expect("export");
    let csv = render_tabular(&bundle.rows).expect("csv");

    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some(TABULAR_HEADER.join(",").as_str()));
    assert!(csv.contains("B1_01,short_text,Full name,Yes,,,,Enter your full name"));
    assert!(csv.contains("\"Hanoi, North|Ho Chi Minh City\""));
    assert!(csv.contains("B2_01a,linear_scale,Skill: Teamwork,Yes,,1,10,"));
    assert_eq!(csv.lines().count(), bundle.rows.len() + 1);
}

#[test]
fn option_containing_delimiter_is_rejected() {
    let mut schema = fixture_schema();
    schema.questions[2].options.push("A|B".into());
    match export(&schema) {
        Err(ExportError::DelimiterCollision { question_id, .. }) => {
            assert_eq!(question_id, "B1_03")
        }
        other => panic!("expected delimiter collision, got {other:?}"),
    }
}

#[test]
fn backup_round_trips_to_an_equal_schema() {
    let schema = standard_schema();
    let bundle = export(&schema).expect("export");
    let text = render_backup(&bundle.backup).expect("render backup");

    let restored = parse_backup(&text).expect("parse backup");
    assert_eq!(restored, schema);

    let value: serde_json::Value = serde_json::from_str(&text).expect("json");
    assert_eq!(value["metadata"]["total_groups"], 20);
    assert_eq!(value["basic_questions"].as_array().map(Vec::len), Some(13));
    assert_eq!(value["core_questions"][0]["question_id"], "B2_01a");
    assert_eq!(value["core_questions"][0]["scale"]["max"], 10);
    assert!(value["core_questions"][1].get("scale").is_none());
}

#[test]
fn backup_with_missing_section_list_is_invalid() {
    let bundle = export(&fixture_schema()).expect("export");
    let mut value = serde_json::to_value(&bundle.backup).expect("json");
    value
        .as_object_mut()
        .expect("object")
        .remove("core_questions");
    let text = serde_json::to_string(&value).expect("text");
    assert!(matches!(
        parse_backup(&text),
        Err(ExportError::InvalidBackup(_))
    ));
}

#[test]
fn backup_with_repeated_question_id_is_invalid() {
    let bundle = export(&standard_schema()).expect("export");
    let text = render_backup(&bundle.backup).expect("render backup");
    let edited = text.replace("\"B1_02\"", "\"B1_01\"");
    assert_ne!(edited, text);

    match parse_backup(&edited) {
        Err(ExportError::InvalidBackup(message)) => assert!(message.contains("B1_01")),
        other => panic!("expected invalid backup, got {other:?}"),
    }
}

#[test]
fn summary_reports_counts() {
    let schema = standard_schema();
    let bundle = export(&schema).expect("export");

    assert!(bundle.summary.contains("Professional groups: 20"));
    assert!(bundle.summary.contains("basic_info: 13 questions"));
    assert!(bundle.summary.contains("core_skills: 20 questions"));
    assert!(bundle.summary.contains("Total questions: 33"));
    assert!(bundle.summary.contains(&schema.metadata.generated_at));
}

#[test]
fn write_all_emits_every_artifact() {
    let dir = tempfile::tempdir().expect("temp dir");
    let schema = fixture_schema();
    let bundle = export(&schema).expect("export");

    let report = write_all(dir.path(), &bundle);
    assert!(report.is_complete());

    let names = report
        .written()
        .map(|artifact| artifact.kind.file_name())
        .collect::<BTreeSet<_>>();
    assert_eq!(
        names,
        BTreeSet::from([TABULAR_FILE, BACKUP_FILE, SUMMARY_FILE])
    );

    let backup = std::fs::read_to_string(dir.path().join(BACKUP_FILE)).expect("backup file");
    assert_eq!(parse_backup(&backup).expect("parse"), schema);
}

#[test]
fn tabular_file_starts_with_byte_order_mark() {
    let dir = tempfile::tempdir().expect("temp dir");
    let bundle = export(&fixture_schema()).expect("export");
    assert!(write_all(dir.path(), &bundle).is_complete());

    let bytes = std::fs::read(dir.path().join(TABULAR_FILE)).expect("tabular file");
    assert_eq!(&bytes[..3], &[0xEF, 0xBB, 0xBF]);

    let text = String::from_utf8(bytes).expect("utf-8");
    let body = text.strip_prefix(UTF8_BOM).expect("bom");
    assert_eq!(body, render_tabular(&bundle.rows).expect("csv"));
    assert!(body.starts_with(&TABULAR_HEADER.join(",")));
}

#[test]
fn write_all_reports_partial_failure() {
    let dir = tempfile::tempdir().expect("temp dir");
    std::fs::create_dir(dir.path().join(SUMMARY_FILE)).expect("block summary path");
    let bundle = export(&fixture_schema()).expect("export");

    let report = write_all(dir.path(), &bundle);
    assert!(!report.is_complete());

    let failed = report
        .failures()
        .map(|artifact| artifact.kind)
        .collect::<Vec<_>>();
    assert_eq!(failed, vec![ArtifactKind::Summary]);
    assert!(dir.path().join(TABULAR_FILE).is_file());
    assert!(dir.path().join(BACKUP_FILE).is_file());
}

#[test]
fn backup_json_schema_describes_metadata() {
    let schema = survey_spec::backup_json_schema().expect("json schema");
    assert!(schema["properties"]["metadata"].is_object());
}
