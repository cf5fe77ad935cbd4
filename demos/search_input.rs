//! # Example: search_input
//!
//! Type-ahead search backed by a `Restart` job: every keystroke supersedes the
//! query still in flight, so only the last one reaches the UI.
//!
//! Demonstrates how to:
//! - Build a [`Job`] with [`JobConfig`] and [`ConcurrencyMode::Restart`].
//! - Watch lifecycle [`Event`]s through [`Job::subscribe`].
//! - Tear the job down with [`Job::abort_on_drop`].
//!
//! ## Flow
//! ```text
//! keystroke ──► Job::perform(query)
//!     ├─► publish(TaskSuperseded)   (previous query aborted)
//!     ├─► publish(TaskStarted)
//!     └─► backend(query, signal)
//!           ├─ signal fired ──► publish(TaskAborted)
//!           └─ done         ──► publish(TaskFulfilled) ──► publish(JobIdle)
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=jobvisor=debug cargo run --example search_input
//! ```

use std::time::Duration;

use jobvisor::{AbortSignal, ConcurrencyMode, Event, Job, JobConfig, TaskError, timeout};
use tracing_subscriber::EnvFilter;

async fn backend(query: String, signal: AbortSignal) -> Result<Vec<String>, TaskError> {
    // Simulated latency; returns early once the query is superseded.
    timeout(&signal, Duration::from_millis(120)).await?;
    Ok(["crate", "book", "reference"]
        .iter()
        .map(|topic| format!("{query} {topic}"))
        .collect())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // 1. Build the job
    let cfg = JobConfig::with_mode(ConcurrencyMode::Restart).named("search");
    let search = Job::with_config(backend, cfg);

    // 2. Print every lifecycle event
    let mut rx = search.subscribe();
    let printer = tokio::spawn(async move {
        while let Ok(ev) = rx.recv().await {
            print_event(&ev);
        }
    });

    // 3. Simulate a user typing faster than the backend answers
    let guard = search.abort_on_drop();
    let mut last = None;
    for query in ["r", "ru", "rus", "rust"] {
        last = Some(search.perform(query.to_string()));
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    // 4. Only the final query produces results
    if let Some(task) = last {
        match task.await {
            Ok(hits) => println!("results: {hits:?}"),
            Err(err) => println!("search failed: {err}"),
        }
    }
    println!("performed {} searches", search.perform_count());

    drop(guard);
    drop(search);
    printer.await?;
    Ok(())
}

fn print_event(ev: &Event) {
    let task = ev.task.map(|id| id.to_string()).unwrap_or_default();
    match &ev.reason {
        Some(reason) => println!("[{}] #{:<3} {:?} {task}: {reason}", ev.job, ev.seq, ev.kind),
        None => println!("[{}] #{:<3} {:?} {task}", ev.job, ev.seq, ev.kind),
    }
}
