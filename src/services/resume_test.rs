use super::*;

const RESUME: &str = r"
preface: Engineer who likes small, sharp tools.
sections:
  - title: Experience
    items:
      - title: Backend Developer
        annotation: 2022 - present
        subtitle: Acme
        block: Built the billing pipeline.
  - title: Skills
    items:
      - title: Languages
        list: [Rust, Go, SQL]
";

#[test]
fn parses_a_valid_resume() {
    let doc = ResumeDoc::parse(Path::new("resume.yaml"), RESUME).unwrap();
    assert_eq!(doc.preface, "Engineer who likes small, sharp tools.");
    assert_eq!(doc.sections.len(), 2);

    let job = &doc.sections[0].items[0];
    assert_eq!(job.annotation, "2022 - present");
    assert_eq!(job.content(), Some(ItemContent::Block("Built the billing pipeline.")));

    let skills = &doc.sections[1].items[0];
    assert_eq!(skills.subtitle, "");
    match skills.content() {
        Some(ItemContent::List(list)) => assert_eq!(list, ["Rust", "Go", "SQL"]),
        other => panic!("expected list, got {other:?}"),
    }
}

#[test]
fn item_with_both_block_and_list_is_rejected() {
    let text = "sections:\n  - title: S\n    items:\n      - title: I\n        block: b\n        list: [x]\n";
    let err = ResumeDoc::parse(Path::new("r.yaml"), text).unwrap_err();
    assert!(err.to_string().contains("exactly one of `block` or `list`"));
}

#[test]
fn item_with_neither_is_rejected() {
    let text = "sections:\n  - title: S\n    items:\n      - title: I\n";
    assert!(matches!(ResumeDoc::parse(Path::new("r.yaml"), text), Err(ContentError::Invalid { .. })));
}

#[test]
fn malformed_yaml_is_a_yaml_error() {
    let err = ResumeDoc::parse(Path::new("r.yaml"), "sections: {").unwrap_err();
    assert!(matches!(err, ContentError::Yaml { .. }));
}

#[test]
fn load_reads_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("resume.yaml");
    std::fs::write(&path, RESUME).unwrap();
    assert_eq!(ResumeDoc::load(&path).unwrap().sections[1].title, "Skills");

    let err = ResumeDoc::load(&dir.path().join("missing.yaml")).unwrap_err();
    assert!(matches!(err, ContentError::Io { .. }));
}
