//! Interactive terminal practice.
//!
//! Run with:
//!   cargo run --example practice -- --tables 6,7,8 --length 20
//!
//! Progress is kept in `timesTablePerformance.json` inside `--data-dir`
//! (default: the current directory). Set `RUST_LOG=debug` to watch the
//! sampler and state machine.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use times_table_drill::{
    AnswerOutcome, FluencyStore, HintService, JsonFileStore, SessionConfig, SessionRunner,
    SessionSummary, StrategyHints,
};

#[derive(Parser, Debug)]
#[command(name = "practice", about = "Adaptive times-table practice")]
struct Args {
    /// Tables to practise, comma-separated
    #[arg(long, value_delimiter = ',', default_values_t = [2, 3, 4, 5])]
    tables: Vec<u32>,

    /// Number of questions
    #[arg(long, default_value_t = 20)]
    length: usize,

    /// Directory holding the progress file
    #[arg(long, default_value = ".")]
    data_dir: PathBuf,

    /// RNG seed for a reproducible question order
    #[arg(long)]
    seed: Option<u64>,

    /// Disable strategy hints after a miss
    #[arg(long)]
    no_hints: bool,

    /// Forget all stored progress before starting
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let hints = if args.no_hints {
        HintService::disabled()
    } else {
        HintService::new(Arc::new(StrategyHints))
    };

    let mut store = FluencyStore::open(JsonFileStore::in_dir(&args.data_dir));
    if args.reset {
        store.reset();
    }

    let config = SessionConfig::new(args.tables, args.length);
    let mut runner = match SessionRunner::start(config, &mut store, args.seed) {
        Ok(runner) => runner,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(2);
        }
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();

    while let Some(fact) = runner.current_fact() {
        if runner.pending_correction().is_some() {
            print!("  Type {} = {} to continue: ", fact, fact.product());
        } else {
            print!("[{}/{}] {} = ", runner.answered() + 1, runner.session_length(), fact);
        }
        stdout.flush()?;

        let Some(line) = lines.next() else {
            println!();
            println!("Session abandoned after {} answers.", runner.answered());
            return Ok(());
        };
        let line = line?;

        match runner.submit_answer(&line, runner.elapsed_ms()) {
            AnswerOutcome::Correct(a) => println!("  ✓ {:.1}s", a.time_taken as f64 / 1000.0),
            AnswerOutcome::Incorrect(a) => {
                println!("  ✗ Correct: {} = {}", a.fact, a.correct_answer);
                println!("  {}", hints.get_hint(a.fact).await);
            }
            AnswerOutcome::Incomplete => println!("  (enter a number)"),
            AnswerOutcome::Corrected | AnswerOutcome::SessionComplete => {}
        }
    }

    let history = runner.finish().unwrap_or_default();
    let summary = SessionSummary::from_history(&history);
    println!();
    println!("Questions: {}  Correct: {}  Accuracy: {:.0}%  Avg time: {:.2}s",
        summary.total_questions, summary.correct_answers, summary.accuracy, summary.average_time_secs);
    for fact in &summary.challenging_facts {
        println!("  keep practising {fact}");
    }
    Ok(())
}
