use std::collections::HashSet;

use chrono::{TimeZone, Utc};

use survey_spec::{
    BuildError, GroupDescriptor, IdScheme, QuestionType, RuleSet, SectionRule, SkillDescriptor,
    SurveyConfig, build, build_at,
};

fn fixture_rules() -> RuleSet {
    SurveyConfig::from_json_str(include_str!("fixtures/small_config.json"))
        .expect("fixture config")
        .rules
}

#[test]
fn standard_rules_produce_profile_and_skill_sections() {
    let schema = build(&RuleSet::standard()).expect("build");

    assert_eq!(schema.len(), 13 + 20);
    assert_eq!(schema.metadata.total_groups, 20);
    let counts = schema
        .metadata
        .sections
        .iter()
        .map(|section| (section.name.as_str(), section.question_count))
        .collect::<Vec<_>>();
    assert_eq!(counts, vec![("basic_info", 13), ("core_skills", 20)]);

    assert_eq!(schema.questions[0].id, "B1_01");
    assert_eq!(schema.questions[12].id, "B1_13");
    assert_eq!(schema.questions[13].id, "B2_01a");
    assert_eq!(schema.questions[32].id, "B2_10b");
}

#[test]
fn ids_are_pairwise_unique() {
    let schema = build(&RuleSet::standard()).expect("build");
    let unique = schema.ids().collect::<HashSet<_>>();
    assert_eq!(unique.len(), schema.len());
}

#[test]
fn every_skill_yields_a_rating_and_an_evidence_item() {
    let rules = RuleSet::standard();
    let schema = build(&rules).expect("build");

    for (idx, skill) in rules.skills.iter().enumerate() {
        let rating = schema
            .get(&format!("B2_{:02}a", idx + 1))
            .expect("rating question");
        let evidence = schema
            .get(&format!("B2_{:02}b", idx + 1))
            .expect("evidence question");

        assert_eq!(rating.kind, QuestionType::LinearScale);
        let scale = rating.scale.expect("rating bounds");
        assert_eq!((scale.min, scale.max), (1, 10));
        assert!(rating.prompt.contains(&skill.name));

        assert_eq!(evidence.kind, QuestionType::Paragraph);
        assert!(evidence.scale.is_none());
        assert!(evidence.prompt.contains(&skill.name));
    }

    let core = schema.section("core_skills").count();
    assert_eq!(core, rules.skills.len() * 2);
}

#[test]
fn rebuilding_is_deterministic() {
    let rules = RuleSet::standard();
    let first = build(&rules).expect("first build");
    let second = build(&rules).expect("second build");

    assert_eq!(first.questions, second.questions);
    assert!(first.ids().eq(second.ids()));
}

#[test]
fn injected_timestamp_is_recorded() {
    let at = Utc.with_ymd_and_hms(2025, 7, 30, 9, 15, 0).unwrap();
    let schema = build_at(&RuleSet::standard(), at).expect("build");
    assert_eq!(schema.metadata.generated_at, "2025-07-30T09:15:00Z");
}

#[test]
fn two_groups_one_skill_scenario() {
    let rules = fixture_rules();
    let schema = build(&rules).expect("build");

    let template_len = match &rules.sections[0] {
        SectionRule::Template(template) => template.questions.len(),
        SectionRule::Skills(_) => panic!("expected template first"),
    };
    assert_eq!(schema.len(), template_len + 2);

    let position = schema.get("B1_03").expect("current position question");
    assert_eq!(position.kind, QuestionType::SingleChoice);
    assert_eq!(
        position.options,
        vec!["BOD - Senior management", "IT - Information technology"]
    );

    assert!(!schema.get("B1_02").expect("date question").required);
    assert_eq!(schema.get("B2_01a").expect("rating").section, "core_skills");
    assert!(schema.get("B2_02a").is_none());
}

#[test]
fn position_options_track_group_table_changes() {
    let mut rules = fixture_rules();
    rules
        .groups
        .push(GroupDescriptor::new(3, "NS", "Human resources", 4));
    let schema = build(&rules).expect("build");
    let position = schema.get("B1_03").expect("current position question");
    assert_eq!(position.options.len(), 3);
    assert_eq!(position.options[2], "NS - Human resources");
}

#[test]
fn duplicate_group_code_is_a_configuration_defect() {
    let mut rules = fixture_rules();
    rules.groups[1].code = rules.groups[0].code.clone();
    assert!(matches!(
        build(&rules),
        Err(BuildError::DuplicateGroupCode(code)) if code == "IT"
    ));
}

#[test]
fn duplicate_order_index_is_a_configuration_defect() {
    let mut rules = fixture_rules();
    rules.groups[1].order_index = 2;
    assert!(matches!(
        build(&rules),
        Err(BuildError::DuplicateOrderIndex(2))
    ));
}

#[test]
fn order_index_must_stay_in_range() {
    let mut rules = fixture_rules();
    rules.groups[0].order_index = 7;
    assert!(matches!(
        build(&rules),
        Err(BuildError::OrderIndexOutOfRange { index: 7, .. })
    ));
}

#[test]
fn empty_tables_are_rejected() {
    let mut no_groups = fixture_rules();
    no_groups.groups.clear();
    assert!(matches!(build(&no_groups), Err(BuildError::NoGroups)));

    let mut no_skills = fixture_rules();
    no_skills.skills.clear();
    assert!(matches!(build(&no_skills), Err(BuildError::NoSkills)));
}

#[test]
fn duplicate_skill_is_rejected() {
    let mut rules = fixture_rules();
    rules.skills.push(rules.skills[0].clone());
    assert!(matches!(build(&rules), Err(BuildError::DuplicateSkill(_))));
}

#[test]
fn overflowing_the_id_width_fails_instead_of_widening() {
    let mut rules = fixture_rules();
    rules.skills = (1..=10)
        .map(|n| SkillDescriptor::new(&format!("Skill {n}"), "description"))
        .collect();
    rules.id_scheme = IdScheme { width: 1 };
    assert!(matches!(
        build(&rules),
        Err(BuildError::SequenceOverflow { sequence: 10, width: 1, .. })
    ));

    rules.id_scheme = IdScheme { width: 2 };
    let schema = build(&rules).expect("build with wider ids");
    assert!(schema.get("B2_10b").is_some());
}
