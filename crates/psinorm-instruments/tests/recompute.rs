mod common;

use std::sync::Arc;
use std::thread;

use common::{ATTENTION, attention_inputs, attention_registry};
use psinorm_core::models::lookup::Lookup;
use psinorm_core::models::request::ScoringRequest;
use psinorm_instruments::error::ScoringError;
use psinorm_instruments::recompute::{Completion, RecomputeController, RecomputeKey};
use uuid::Uuid;

fn request(hits: f64) -> ScoringRequest {
    ScoringRequest::new(ATTENTION, 22, attention_inputs(hits, 0.0, 0.0))
}

#[test]
fn late_arrival_of_an_older_edit_is_discarded() {
    let registry = attention_registry();
    let controller = RecomputeController::new();
    let key = RecomputeKey::new(ATTENTION, Uuid::new_v4());

    let first = controller.issue(key.clone());
    let second = controller.issue(key.clone());
    assert!(second.seq > first.seq);

    // the second edit finishes first
    let newer = registry.score_request(&request(15.0));
    let older = registry.score_request(&request(5.0));
    assert_eq!(controller.complete(second.clone(), newer), Completion::Applied);
    assert_eq!(
        controller.complete(first, older),
        Completion::Stale {
            current: second.seq
        }
    );

    let (seq, outcome) = controller.latest(&key).unwrap();
    assert_eq!(seq, second.seq);
    let result = outcome.unwrap();
    assert_eq!(result.derived("AC"), Some(15.0));
    assert_eq!(result.normative("AC"), Some(Lookup::Found(50.0)));
}

#[test]
fn in_order_completions_each_apply() {
    let registry = attention_registry();
    let controller = RecomputeController::new();
    let key = RecomputeKey::new(ATTENTION, Uuid::new_v4());

    for hits in [5.0, 10.0, 20.0] {
        let ticket = controller.issue(key.clone());
        let outcome = registry.score_request(&request(hits));
        assert_eq!(controller.complete(ticket, outcome), Completion::Applied);
    }

    let (_, outcome) = controller.latest(&key).unwrap();
    assert_eq!(outcome.unwrap().normative("AC"), Some(Lookup::Found(90.0)));
}

#[test]
fn a_newer_error_supersedes_an_older_result() {
    let registry = attention_registry();
    let controller = RecomputeController::new();
    let key = RecomputeKey::new(ATTENTION, Uuid::new_v4());

    controller.submit(key.clone(), 1, registry.score_request(&request(10.0)));
    let mut bad = request(10.0);
    bad.raw.insert("erros", -1.0);
    assert_eq!(
        controller.submit(key.clone(), 2, registry.score_request(&bad)),
        Completion::Applied
    );

    let (seq, outcome) = controller.latest(&key).unwrap();
    assert_eq!(seq, 2);
    assert!(matches!(outcome, Err(ScoringError::InvalidInput { .. })));
}

#[test]
fn equal_sequence_keeps_the_first_outcome() {
    let registry = attention_registry();
    let controller = RecomputeController::new();
    let key = RecomputeKey::new(ATTENTION, Uuid::new_v4());

    controller.submit(key.clone(), 7, registry.score_request(&request(5.0)));
    assert_eq!(
        controller.submit(key.clone(), 7, registry.score_request(&request(20.0))),
        Completion::Stale { current: 7 }
    );
    let (_, outcome) = controller.latest(&key).unwrap();
    assert_eq!(outcome.unwrap().derived("AC"), Some(5.0));
}

#[test]
fn keys_are_independent() {
    let registry = attention_registry();
    let controller = RecomputeController::new();
    let alice = Uuid::new_v4();
    let bruno = Uuid::new_v4();

    controller.submit(
        RecomputeKey::new(ATTENTION, alice),
        5,
        registry.score_request(&request(5.0)),
    );
    assert_eq!(
        controller.submit(
            RecomputeKey::new(ATTENTION, bruno),
            1,
            registry.score_request(&request(20.0)),
        ),
        Completion::Applied
    );
    assert_eq!(controller.snapshot().len(), 2);
    assert!(
        controller
            .latest(&RecomputeKey::new("bpa", alice))
            .is_none()
    );
}

#[test]
fn forgotten_keys_release_their_outcome() {
    let registry = attention_registry();
    let controller = RecomputeController::new();
    let closed = RecomputeKey::new(ATTENTION, Uuid::new_v4());
    let open = RecomputeKey::new(ATTENTION, Uuid::new_v4());

    controller.submit(closed.clone(), 7, registry.score_request(&request(10.0)));
    controller.submit(open.clone(), 3, registry.score_request(&request(20.0)));

    let (seq, outcome) = controller.forget(&closed).unwrap();
    assert_eq!(seq, 7);
    assert_eq!(outcome.unwrap().derived("AC"), Some(10.0));
    assert!(controller.latest(&closed).is_none());
    assert!(controller.forget(&closed).is_none());
    assert_eq!(controller.snapshot().len(), 1);
    assert!(controller.latest(&open).is_some());

    // a forgotten key starts over
    assert_eq!(
        controller.submit(closed.clone(), 1, registry.score_request(&request(4.0))),
        Completion::Applied
    );
    assert_eq!(controller.latest(&closed).unwrap().0, 1);
}

#[test]
fn run_scores_and_records() {
    let registry = attention_registry();
    let controller = RecomputeController::new();
    let subject = Uuid::new_v4();

    let (ticket, completion) = controller.run(&registry, subject, &request(12.0));
    assert_eq!(completion, Completion::Applied);
    assert_eq!(ticket.key, RecomputeKey::new(ATTENTION, subject));

    let (seq, outcome) = controller.latest(&ticket.key).unwrap();
    assert_eq!(seq, ticket.seq);
    assert_eq!(outcome.unwrap().derived("AC"), Some(12.0));
}

#[test]
fn concurrent_completions_keep_the_highest_sequence() {
    let registry = Arc::new(attention_registry());
    let controller = Arc::new(RecomputeController::new());
    let key = RecomputeKey::new(ATTENTION, Uuid::new_v4());

    let tickets: Vec<_> = (0..16).map(|_| controller.issue(key.clone())).collect();
    let highest = tickets.iter().map(|t| t.seq).max().unwrap();

    let handles: Vec<_> = tickets
        .into_iter()
        .rev()
        .enumerate()
        .map(|(i, ticket)| {
            let registry = Arc::clone(&registry);
            let controller = Arc::clone(&controller);
            thread::spawn(move || {
                let hits = ticket.seq as f64;
                let outcome = registry.score_request(&request(hits));
                if i % 2 == 0 {
                    thread::yield_now();
                }
                controller.complete(ticket, outcome)
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let (seq, outcome) = controller.latest(&key).unwrap();
    assert_eq!(seq, highest);
    assert_eq!(outcome.unwrap().derived("AC"), Some(highest as f64));
}
