//! Scripted demo of the adaptive practice loop.
//!
//! Run with: `cargo run --example demo`
//!
//! A simulated learner who is shaky on the 7s and 8s practises three
//! sessions in a row. The demo shows:
//!
//! 1. **Adaptive sampling** — facts the learner keeps missing come up more
//!    often in later sessions.
//! 2. **Fluency model** — each answer nudges the stored fluency toward its
//!    performance score; the progress grid turns greener session by session.
//! 3. **Hints** — every miss gets strategy text from the built-in provider.
//!
//! Everything runs on fixed seeds in memory, so the output is reproducible.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use times_table_drill::{
    progress_grid, AnswerOutcome, Fact, FluencyBand, FluencyStore, HintService, MemoryStore,
    SessionConfig, SessionRunner, SessionSummary, StrategyHints,
};

/// Chance the simulated learner gets `fact` right, and how long they take.
fn learner_answer(rng: &mut StdRng, fact: Fact, seen: u32) -> (bool, u64) {
    let hard = matches!(fact.a, 7 | 8) || matches!(fact.b, 7 | 8);
    // Hard facts improve with exposure.
    let p_correct = if hard { (0.4 + 0.1 * seen as f64).min(0.95) } else { 0.95 };
    let base_ms = if hard { 3500 } else { 1400 };
    (rng.gen_bool(p_correct), base_ms + rng.gen_range(0..800))
}

fn band_symbol(band: FluencyBand) -> char {
    match band {
        FluencyBand::Unseen     => '·',
        FluencyBand::Weak       => '0',
        FluencyBand::Emerging   => '1',
        FluencyBand::Developing => '2',
        FluencyBand::Good       => '3',
        FluencyBand::Strong     => '4',
        FluencyBand::Mastered   => '5',
    }
}

fn print_grid(store: &FluencyStore<MemoryStore>) {
    let grid = progress_grid(store.data(), 9);
    print!("      ");
    for col in 1..=9 {
        print!("{col:>3}");
    }
    println!();
    for (r, row) in grid.iter().enumerate() {
        print!("  {:>3} ", r + 1);
        for cell in row {
            print!("{:>3}", band_symbol(cell.band));
        }
        println!();
    }
}

#[tokio::main]
async fn main() {
    let mut store = FluencyStore::open(MemoryStore::new());
    let hints = HintService::new(Arc::new(StrategyHints));
    let mut rng = StdRng::seed_from_u64(2024);
    let mut exposures = std::collections::HashMap::<String, u32>::new();

    let config = SessionConfig::new([6, 7, 8], 20);

    for session in 1..=3u64 {
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("  Session {session}  Tables: {:?}  Questions: {}",
            config.selected_tables, config.session_length);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let mut runner = SessionRunner::start(config.clone(), &mut store, Some(session))
            .expect("demo config is valid");

        while let Some(fact) = runner.current_fact() {
            let seen = exposures.entry(fact.key()).or_insert(0);
            let (right, ms) = learner_answer(&mut rng, fact, *seen);
            *seen += 1;

            let typed = if right { fact.product() } else { fact.product() + 1 };
            match runner.submit_answer(&typed.to_string(), ms) {
                AnswerOutcome::Correct(a) => {
                    println!("  [✓] {fact} = {:<4} {:>5} ms", a.correct_answer, a.time_taken);
                }
                AnswerOutcome::Incorrect(a) => {
                    println!("  [ ] {fact} = {:<4} {:>5} ms  (answer {})",
                        typed, a.time_taken, a.correct_answer);
                    println!("       hint: {}", hints.get_hint(fact).await);
                    runner.submit_answer(&fact.product().to_string(), 0);
                }
                other => println!("  unexpected outcome: {other:?}"),
            }
        }

        let history = runner.finish().expect("session ran to completion");
        let summary = SessionSummary::from_history(&history);
        println!();
        println!("  Accuracy: {:.0}%  Avg time: {:.2}s", summary.accuracy, summary.average_time_secs);
        if !summary.challenging_facts.is_empty() {
            let list: Vec<String> = summary.challenging_facts.iter().map(|f| f.to_string()).collect();
            println!("  Challenging: {}", list.join(", "));
        }
        println!();
        print_grid(&store);
        println!();
    }
}
