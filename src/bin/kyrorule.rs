//! KyroRule command-line driver
//!
//! Feeds facts into a session over the bundled medical rules and prints the
//! inferred facts and firing log.

use std::process::ExitCode;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use kyrorule::{Domain, KyroResult, Session, SessionConfig};

/// Forward-chain the bundled medical rules over the given facts.
#[derive(Debug, Parser)]
#[command(name = "kyrorule", version, about)]
struct Args {
    /// Rule domain: respiratory, cardiac or both.
    #[arg(short, long, default_value = "both")]
    domain: Domain,

    /// Print the knowledge base as Graphviz DOT after inference.
    #[arg(long)]
    dot: bool,

    /// Print a JSON report instead of text.
    #[arg(long, conflicts_with = "dot")]
    json: bool,

    /// Facts to assert, e.g. `fever cough body_aches`.
    facts: Vec<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> KyroResult<()> {
    let mut session = Session::medical(SessionConfig {
        log_limit: None,
        ..SessionConfig::default()
    })?;
    session.select_domain(args.domain)?;
    for fact in &args.facts {
        session.enter_fact(fact)?;
    }

    let report = session.submit();

    if args.json {
        let out = json!({
            "domain": session.domain(),
            "entered": session.entered_facts(),
            "inferred": session.inferred_facts(),
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    if args.dot {
        print!("{}", session.graph().to_dot());
        return Ok(());
    }

    println!("Domain: {}", session.domain());
    println!("Event log:");
    for line in session.log().messages() {
        println!("  {line}");
    }
    println!("Inferred facts:");
    if session.inferred_facts().is_empty() {
        println!("  (none)");
    }
    for fact in session.inferred_facts() {
        println!("  - {fact}");
    }
    Ok(())
}
