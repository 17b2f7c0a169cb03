use psinorm_cli::replay::{SurvivorOutcome, parse_edits, replay};
use psinorm_core::models::lookup::Lookup;
use psinorm_instruments::Registry;
use uuid::Uuid;

fn tin_line(seq: u64, subject: Uuid, hits: u32, age: u32) -> String {
    format!(
        r#"{{"seq": {seq}, "subject_id": "{subject}", "request": {{"instrument_code": "tin", "age": {age}, "raw": {{"acertos": {hits}}}}}}}"#
    )
}

#[test]
fn older_edits_arriving_late_do_not_win() {
    let subject = Uuid::new_v4();
    let input = [
        tin_line(1, subject, 20, 8),
        tin_line(3, subject, 36, 8),
        String::new(),
        tin_line(2, subject, 24, 8),
    ]
    .join("\n");

    let edits = parse_edits(input.as_bytes()).unwrap();
    assert_eq!(edits.len(), 3);

    let report = replay(&Registry::builtin().unwrap(), &edits);
    assert_eq!(report.applied, 2);
    assert_eq!(report.stale, 1);
    assert_eq!(report.survivors.len(), 1);

    let survivor = &report.survivors[0];
    assert_eq!(survivor.seq, 3);
    assert_eq!(survivor.subject_id, subject);
    match &survivor.outcome {
        SurvivorOutcome::Scored { result } => {
            assert_eq!(result.derived("NOM"), Some(36.0));
            assert_eq!(result.normative("NOM"), Some(Lookup::Found(100.0)));
        }
        other => panic!("expected a scored outcome, got {other:?}"),
    }
}

#[test]
fn refusals_survive_like_results() {
    let subject = Uuid::new_v4();
    let input = [tin_line(1, subject, 36, 8), tin_line(2, subject, 36, 20)].join("\n");

    let edits = parse_edits(input.as_bytes()).unwrap();
    let report = replay(&Registry::builtin().unwrap(), &edits);

    assert_eq!(report.applied, 2);
    let survivor = &report.survivors[0];
    assert!(matches!(survivor.outcome, SurvivorOutcome::Refused { .. }));

    let json = serde_json::to_value(survivor).unwrap();
    assert_eq!(json["status"], "refused");
    assert_eq!(json["error"]["kind"], "age_out_of_range");
}

#[test]
fn subjects_are_kept_apart() {
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let input = [tin_line(5, a, 30, 8), tin_line(1, b, 40, 8)].join("\n");

    let edits = parse_edits(input.as_bytes()).unwrap();
    let report = replay(&Registry::builtin().unwrap(), &edits);

    assert_eq!(report.stale, 0);
    assert_eq!(report.survivors.len(), 2);
    assert!(report.survivors[0].subject_id < report.survivors[1].subject_id);
}

#[test]
fn bad_line_is_reported_by_number() {
    let subject = Uuid::new_v4();
    let input = format!("{}\n{{\"seq\": \"two\"}}\n", tin_line(1, subject, 20, 8));

    let err = parse_edits(input.as_bytes()).unwrap_err();
    assert!(err.to_string().contains("line 2"));
}
