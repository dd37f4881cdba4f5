//! Crate-level tests for `times_table_drill`.
//!
//! Included from `lib.rs` under `#[cfg(test)]`.
//!
//! # Coverage
//!
//! | Group | What is tested |
//! |-------|----------------|
//! | Identity | Commuted facts share a key and a single stored record |
//! | Update rule | Exact smoothing values; fluency bounds and counter invariants under random input |
//! | Sampling | Mastered pools still yield a fact; weak facts dominate draws; seeded determinism |
//! | Session | End-to-end run over the 7 times table; misses and corrections in a full session |
//! | Persistence | File round-trip; corrupt file recovery; progress carried across sessions |

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::practice_engine::models::fluency_of;
use crate::practice_engine::{
    apply_attempt, apply_history, candidate_pool, select_from_pool, AnswerOutcome, Fact,
    FactPerformance, FluencyStore, JsonFileStore, MemoryStore, PerformanceData, QuestionSampler,
    SessionAttempt, SessionConfig, SessionRunner, SessionState, SessionSummary,
};

// ── helpers ──────────────────────────────────────────────────────────────────

/// Attempt at `fact`, answered correctly or with an off-by-one.
fn attempt(fact: Fact, correct: bool, ms: u64) -> SessionAttempt {
    let answer = if correct { fact.product() } else { fact.product() + 1 };
    SessionAttempt::new(fact, Some(answer), ms)
}

/// A long random stream of attempts over the 2–12 tables.
fn random_history(seed: u64, len: usize) -> Vec<SessionAttempt> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let fact = Fact::new(rng.gen_range(2..=12), rng.gen_range(2..=9));
            attempt(fact, rng.gen_bool(0.6), rng.gen_range(0..=9000))
        })
        .collect()
}

/// Five seeds that span different RNG states.
const SEEDS: [u64; 5] = [1, 42, 999, 0xDEAD_BEEF, 7];

// ── identity ─────────────────────────────────────────────────────────────────

#[test]
fn commuted_pairs_share_a_key() {
    for a in 1..=20 {
        for b in 1..=20 {
            assert_eq!(Fact::new(a, b).key(), Fact::new(b, a).key(), "{a}x{b}");
        }
    }
}

#[test]
fn store_never_duplicates_commuted_records() {
    let mut store = FluencyStore::open(MemoryStore::new());
    store.record(&attempt(Fact::new(4, 9), true, 1000));
    store.record(&attempt(Fact::new(9, 4), false, 1000));
    store.record(&attempt(Fact::new(4, 9), true, 3000));

    assert_eq!(store.data().len(), 1);
    let rec = &store.data()["4x9"];
    assert_eq!(rec.total_attempts, 3);
    assert_eq!(rec.response_times, vec![1000, 1000, 3000]);
}

// ── update rule ──────────────────────────────────────────────────────────────

#[test]
fn exact_update_values() {
    let fact = Fact::new(2, 7);
    let key = fact.key();

    // Miss: 0.8 · f.
    let mut data = PerformanceData::new();
    data.insert(key.clone(), FactPerformance { fluency: 0.65, ..Default::default() });
    let after_miss = apply_attempt(&data, &attempt(fact, false, 800));
    assert_eq!(after_miss[&key].fluency, 0.8 * 0.65);

    // Fast correct from unseen: 0.2.
    let after_fast = apply_attempt(&PerformanceData::new(), &attempt(fact, true, 1500));
    assert!((after_fast[&key].fluency - 0.2).abs() < 1e-12);

    // Steady correct from 0.5: 0.8·0.5 + 0.2·0.7 = 0.54.
    let mut data = PerformanceData::new();
    data.insert(key.clone(), FactPerformance { fluency: 0.5, ..Default::default() });
    let after_steady = apply_attempt(&data, &attempt(fact, true, 3000));
    assert!((after_steady[&key].fluency - 0.54).abs() < 1e-12);
}

#[test]
fn fluency_stays_in_unit_interval() {
    for seed in SEEDS {
        let mut data = PerformanceData::new();
        for a in random_history(seed, 2_000) {
            data = apply_attempt(&data, &a);
            let f = data[&a.fact.key()].fluency;
            assert!((0.0..=1.0).contains(&f), "seed={seed} fluency={f}");
        }
    }
}

#[test]
fn total_attempts_equals_correct_plus_incorrect() {
    for seed in SEEDS {
        let history = random_history(seed, 1_000);
        let data = apply_history(&PerformanceData::new(), &history);
        let total: u32 = data.values().map(|r| r.total_attempts).sum();
        assert_eq!(total as usize, history.len());
        for (key, rec) in &data {
            assert_eq!(rec.total_attempts, rec.correct + rec.incorrect, "{key}");
            assert_eq!(rec.response_times.len() as u32, rec.total_attempts, "{key}");
        }
    }
}

#[test]
fn one_attempt_changes_exactly_one_record() {
    let before = apply_history(&PerformanceData::new(), &random_history(3, 200));
    let after = apply_attempt(&before, &attempt(Fact::new(6, 8), true, 1200));
    let changed = after
        .iter()
        .filter(|(k, v)| before.get(*k) != Some(*v))
        .count();
    assert_eq!(changed, 1);
}

// ── sampling ─────────────────────────────────────────────────────────────────

#[test]
fn fully_mastered_pool_still_selects() {
    let config = SessionConfig::new([3, 8], 5);
    let pool = candidate_pool(&config.selected_tables);
    let mut data = PerformanceData::new();
    for fact in &pool {
        data.insert(fact.key(), FactPerformance { fluency: 1.0, ..Default::default() });
    }
    for seed in SEEDS {
        let mut sampler = QuestionSampler::new(Some(seed));
        let fact = sampler.select_next(&config.selected_tables, &data);
        assert!(fact.is_some_and(|f| pool.contains(&f)), "seed={seed}");
    }
}

#[test]
fn weak_fact_dominates_mastered_fact() {
    let weak = Fact::new(7, 8);
    let strong = Fact::new(2, 3);
    let mut data = PerformanceData::new();
    data.insert(strong.key(), FactPerformance { fluency: 1.0, ..Default::default() });

    let pool = [weak, strong];
    let mut rng = StdRng::seed_from_u64(2024);
    let draws = 10_000;
    let weak_hits = (0..draws)
        .filter(|_| select_from_pool(&mut rng, &pool, &data) == Some(weak))
        .count();

    // Expected share is ~98%; a strict majority is the contract.
    assert!(weak_hits > draws / 2, "weak fact drawn {weak_hits}/{draws}");
    assert!(weak_hits > draws * 9 / 10, "weak fact drawn {weak_hits}/{draws}");
}

#[test]
fn mastered_fact_still_recurs() {
    let weak = Fact::new(7, 8);
    let strong = Fact::new(2, 3);
    let mut data = PerformanceData::new();
    data.insert(strong.key(), FactPerformance { fluency: 1.0, ..Default::default() });

    let mut rng = StdRng::seed_from_u64(5);
    let strong_hits = (0..10_000)
        .filter(|_| select_from_pool(&mut rng, &[weak, strong], &data) == Some(strong))
        .count();
    assert!(strong_hits > 0);
}

#[test]
fn same_seed_same_session_questions() {
    let questions = |seed| {
        let mut store = FluencyStore::open(MemoryStore::new());
        let mut runner =
            SessionRunner::start(SessionConfig::new([4, 6, 7], 10), &mut store, Some(seed)).unwrap();
        let mut seen = Vec::new();
        while let Some(fact) = runner.current_fact() {
            seen.push(fact);
            runner.submit_answer(&fact.product().to_string(), 1500);
        }
        seen
    };
    assert_eq!(questions(77), questions(77));
}

// ── session ──────────────────────────────────────────────────────────────────

#[test]
fn seven_times_table_end_to_end() {
    let mut store = FluencyStore::open(MemoryStore::new());
    let mut runner =
        SessionRunner::start(SessionConfig::new([7], 5), &mut store, Some(12345)).unwrap();

    while let Some(fact) = runner.current_fact() {
        assert_eq!(fact.a, 7);
        let before = fluency_of(runner.performance(), fact);
        let outcome = runner.submit_answer(&fact.product().to_string(), 900);
        assert!(matches!(outcome, AnswerOutcome::Correct(_)));
        let after = fluency_of(runner.performance(), fact);
        assert!(after > before, "{fact}: {before} -> {after}");
        assert!(after <= 1.0);
    }

    assert_eq!(runner.state(), SessionState::Complete);
    let history = runner.finish().expect("session complete");
    assert_eq!(history.len(), 5);
    assert!(history.iter().all(|h| h.is_correct));
    assert!(history.iter().all(|h| h.time_taken == 900));

    let summary = SessionSummary::from_history(&history);
    assert_eq!(summary.accuracy, 100.0);
    assert!(summary.challenging_facts.is_empty());
}

#[test]
fn misses_count_toward_length_and_statistics() {
    let mut store = FluencyStore::open(MemoryStore::new());
    let mut runner =
        SessionRunner::start(SessionConfig::new([6, 7], 6), &mut store, Some(31)).unwrap();

    let mut corrections = 0;
    let mut turn = 0;
    while let Some(fact) = runner.current_fact() {
        if runner.state() == SessionState::Correcting {
            assert_eq!(runner.submit_answer(&fact.product().to_string(), 0), AnswerOutcome::Corrected);
            corrections += 1;
            continue;
        }
        let miss = turn % 2 == 0;
        let answer = if miss { fact.product() + 10 } else { fact.product() };
        runner.submit_answer(&answer.to_string(), 2500);
        turn += 1;
    }

    let history = runner.finish().unwrap();
    assert_eq!(history.len(), 6);
    assert_eq!(corrections, 3);
    assert_eq!(history.iter().filter(|h| !h.is_correct).count(), 3);

    let stored_total: u32 = store.data().values().map(|r| r.total_attempts).sum();
    assert_eq!(stored_total, 6);
    let stored_misses: u32 = store.data().values().map(|r| r.incorrect).sum();
    assert_eq!(stored_misses, 3);
}

// ── persistence ──────────────────────────────────────────────────────────────

#[test]
fn file_round_trip_preserves_data() {
    let dir = tempfile::tempdir().unwrap();
    let populated = apply_history(&PerformanceData::new(), &random_history(9, 300));

    let mut store = FluencyStore::open(JsonFileStore::in_dir(dir.path()));
    store.persist(&populated);

    let reloaded = FluencyStore::open(JsonFileStore::in_dir(dir.path()));
    assert_eq!(reloaded.data(), &populated);
}

#[test]
fn corrupt_file_loads_empty_and_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let backend = JsonFileStore::in_dir(dir.path());
    std::fs::write(backend.path(), "{\"2x3\": {\"correct\": \"many\"}}").unwrap();

    let mut store = FluencyStore::open(backend.clone());
    assert!(store.data().is_empty());

    store.record(&attempt(Fact::new(2, 3), true, 1000));
    let reloaded = FluencyStore::open(backend);
    assert_eq!(reloaded.data()["2x3"].correct, 1);
}

#[test]
fn progress_carries_across_sessions() {
    let dir = tempfile::tempdir().unwrap();

    let first_total = {
        let mut store = FluencyStore::open(JsonFileStore::in_dir(dir.path()));
        let mut runner =
            SessionRunner::start(SessionConfig::new([9], 5), &mut store, Some(1)).unwrap();
        while let Some(fact) = runner.current_fact() {
            runner.submit_answer(&fact.product().to_string(), 1000);
        }
        runner.finish().unwrap();
        store.data().values().map(|r| r.total_attempts).sum::<u32>()
    };
    assert_eq!(first_total, 5);

    // Abandon a second session after two answers; those still persist.
    let mut store = FluencyStore::open(JsonFileStore::in_dir(dir.path()));
    let mut runner = SessionRunner::start(SessionConfig::new([9], 5), &mut store, Some(2)).unwrap();
    for _ in 0..2 {
        let fact = runner.current_fact().unwrap();
        runner.submit_answer(&fact.product().to_string(), 1000);
    }
    let partial = runner.into_history();
    assert_eq!(partial.len(), 2);

    let reloaded = FluencyStore::open(JsonFileStore::in_dir(dir.path()));
    let total: u32 = reloaded.data().values().map(|r| r.total_attempts).sum();
    assert_eq!(total, 7);
}
