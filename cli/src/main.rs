//! proofpad CLI - submit source text to the checker and inspect history.
//!
//! This binary is the UI collaborator for the engine: it loads config and
//! history, drives the workbench operations, and renders records as text.
//! One invocation is one session; on startup the most recent record is the
//! active selection, exactly as a fresh editor session would see it.

use std::io::Read;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use proofpad_client::VerifierClient;
use proofpad_config::ProofpadConfig;
use proofpad_engine::types::{RecordId, VerificationRecord, VerificationStatus};
use proofpad_engine::{HistoryStore, Workbench};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("warn"))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        print_usage();
        return Ok(());
    };

    let config = ProofpadConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, continuing with defaults: {e}");
        ProofpadConfig::default()
    });
    let client = VerifierClient::from_config(&config);
    let history = HistoryStore::load(config.history_path());
    let workbench = Workbench::new(client, config.verifier_version(), history);

    match command {
        "check" => {
            let source = args.get(1).map(String::as_str).unwrap_or("-");
            let title = args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();
            check(&workbench, source, &title).await
        }
        "list" => {
            list(&workbench);
            Ok(())
        }
        "show" => show(&workbench, args.get(1).map(String::as_str)),
        "select" => select(&workbench, args.get(1).map(String::as_str)),
        "remove" => remove(&workbench, args.get(1).map(String::as_str)),
        "clear" => clear(&workbench, args.iter().any(|arg| arg == "--force")),
        "new" => {
            workbench.new_draft();
            print!("{}", workbench.working().code);
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => bail!("unknown command `{other}`; run `proofpad help`"),
    }
}

async fn check(workbench: &Workbench, source: &str, title: &str) -> Result<()> {
    let code = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("failed to read code from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(source)
            .with_context(|| format!("failed to read source file {source}"))?
    };

    let Some(id) = workbench.verify(&code, title).await else {
        bail!("nothing to verify: the submitted code is empty");
    };

    let record = workbench
        .record(id)
        .context("record vanished before it could be displayed")?;
    print_record(&record);

    if record.status == VerificationStatus::Error {
        std::process::exit(1);
    }
    Ok(())
}

fn list(workbench: &Workbench) {
    let records = workbench.records();
    if records.is_empty() {
        println!("history is empty");
        return;
    }

    let active = workbench.active();
    for record in &records {
        let marker = if active == Some(record.id) { "*" } else { " " };
        println!(
            "{marker} {} [{:>7}] {:<24} {}",
            record.id,
            record.status.as_str(),
            record.title,
            relative_time(record)
        );
    }
}

fn show(workbench: &Workbench, raw_id: Option<&str>) -> Result<()> {
    let record = match raw_id {
        Some(raw) => {
            let id = parse_id(raw)?;
            workbench
                .record(id)
                .with_context(|| format!("no record with id {id}"))?
        }
        None => match workbench.active() {
            Some(id) => workbench
                .record(id)
                .context("active record vanished from history")?,
            None => bail!("history is empty; nothing to show"),
        },
    };

    print_record(&record);
    println!("\n{}", record.code);
    Ok(())
}

fn select(workbench: &Workbench, raw_id: Option<&str>) -> Result<()> {
    let raw = raw_id.context("usage: proofpad select <id>")?;
    let id = parse_id(raw)?;
    if !workbench.select(id) {
        bail!("no record with id {id}");
    }
    // Emit the selected code so it can be piped back into an editor.
    print!("{}", workbench.working().code);
    Ok(())
}

fn remove(workbench: &Workbench, raw_id: Option<&str>) -> Result<()> {
    let raw = raw_id.context("usage: proofpad remove <id>")?;
    let id = parse_id(raw)?;
    if workbench.remove(id) {
        println!("removed {id}");
    } else {
        println!("no record with id {id}; history unchanged");
    }
    Ok(())
}

fn clear(workbench: &Workbench, force: bool) -> Result<()> {
    let count = workbench.records().len();
    if count == 0 {
        println!("history is already empty");
        return Ok(());
    }
    if !force {
        bail!("refusing to delete {count} record(s); re-run with --force to confirm");
    }
    workbench.clear();
    println!("cleared {count} record(s)");
    Ok(())
}

fn parse_id(raw: &str) -> Result<RecordId> {
    RecordId::parse(raw).with_context(|| format!("`{raw}` is not a record id"))
}

fn print_record(record: &VerificationRecord) {
    println!(
        "{} {} [{}] checked with {} {}",
        record.id,
        record.title,
        record.status.as_str(),
        record.verifier_version,
        relative_time(record)
    );
    for error in &record.errors {
        println!("  error: {error}");
    }
    for warning in &record.warnings {
        println!("  warning: {warning}");
    }
}

fn relative_time(record: &VerificationRecord) -> String {
    let elapsed = Utc::now().signed_duration_since(record.timestamp);
    let seconds = elapsed.num_seconds();
    if seconds < 5 {
        "just now".to_string()
    } else if seconds < 60 {
        format!("{seconds}s ago")
    } else if seconds < 60 * 60 {
        format!("{}m ago", elapsed.num_minutes())
    } else if seconds < 24 * 60 * 60 {
        format!("{}h ago", elapsed.num_hours())
    } else {
        format!("{}d ago", elapsed.num_days())
    }
}

fn print_usage() {
    println!(
        "proofpad - check proofs against a remote verifier\n\
         \n\
         Usage:\n\
         \x20 proofpad check <file|-> [title..]   submit code for verification\n\
         \x20 proofpad list                       show history, most recent first\n\
         \x20 proofpad show [id]                  print a record (active one by default)\n\
         \x20 proofpad select <id>                make a record active and print its code\n\
         \x20 proofpad remove <id>                delete one record\n\
         \x20 proofpad clear --force              delete the whole history\n\
         \x20 proofpad new                        print a fresh draft template\n\
         \n\
         Configuration: ~/.proofpad/config.toml, overridable via PROOFPAD_* env vars\n\
         (PROOFPAD_ENDPOINT, PROOFPAD_API_KEY, PROOFPAD_TIMEOUT_SECS, ...)."
    );
}
