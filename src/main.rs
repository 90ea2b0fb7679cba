use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;

use jira_sla_pipeline::config::{config, init_config};
use jira_sla_pipeline::holidays::{HolidayApiClient, HolidayProvider};
use jira_sla_pipeline::pipeline::{audit, bronze, gold, silver};
use jira_sla_pipeline::sla::{BusinessHoursCalculator, SlaEvaluator, SlaPolicy};
use jira_sla_pipeline::telemetry::{create_phase_span, generate_run_id, init_telemetry};

#[derive(Parser)]
#[command(name = "jira-sla-pipeline")]
#[command(about = "Issue-tracker SLA compliance pipeline")]
#[command(long_about = "Ingests an issue-tracker export, cleans it, computes per-ticket SLA \
                       compliance using business-hours arithmetic (weekends and national \
                       holidays excluded), and produces per-analyst and per-issue-type reports. \
                       Get started with 'jira-sla-pipeline run'.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full pipeline: ingestion, cleaning, SLA evaluation, reports, audit
    Run {
        /// Raw export file to ingest (defaults to the configured bronze path)
        #[arg(long, help = "Path to the raw issue export JSON")]
        input: Option<PathBuf>,
        /// Skip the data-quality audit phase
        #[arg(long, help = "Skip the final data-quality audit")]
        skip_audit: bool,
    },
    /// Audit the persisted layers without recomputing anything
    Audit,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        // Default behavior: no subcommand - explain how to run the pipeline
        None => {
            show_quick_start();
            Ok(())
        }
        Some(Commands::Run { input, skip_audit }) => {
            tokio::runtime::Runtime::new()?.block_on(async { run_command(input, skip_audit).await })
        }
        Some(Commands::Audit) => {
            tokio::runtime::Runtime::new()?.block_on(async { audit_command().await })
        }
    }
}

fn show_quick_start() {
    println!("🏆 jira-sla-pipeline: issue-tracker SLA compliance reports");
    println!();
    println!("🎯 QUICK START:");
    println!("   → Run everything:      jira-sla-pipeline run");
    println!("   → Custom export file:  jira-sla-pipeline run --input export.json");
    println!("   → Audit existing data: jira-sla-pipeline audit");
    println!();
    println!("📂 Outputs land in the configured gold directory (data/gold by default).");
}

async fn run_command(input: Option<PathBuf>, skip_audit: bool) -> Result<()> {
    let started = Instant::now();
    init_telemetry()?;
    init_config()?;
    let cfg = config()?;
    let run_id = generate_run_id();

    println!("{}", "=".repeat(60));
    println!("🚀 JIRA SLA PIPELINE");
    println!("{}", "=".repeat(60));

    // --- PHASE 1: BRONZE (Ingestion) ---
    println!();
    println!("[STEP 1/4] BRONZE PHASE: Raw export ingestion...");
    let bronze_path = input.unwrap_or_else(|| PathBuf::from(&cfg.pipeline.bronze_path));
    let export = match bronze::ingest(&bronze_path)
        .instrument(create_phase_span("bronze", &run_id))
        .await
    {
        Ok(export) => {
            println!(
                "✔️ Raw data readable: {} records in {}",
                export.issues.len(),
                bronze_path.display()
            );
            export
        }
        Err(e) => {
            println!("❌ Critical failure during ingestion. Aborting.");
            println!("   {}", e);
            return Err(e.into());
        }
    };

    // --- PHASE 2: SILVER (Transformation) ---
    println!();
    println!("[STEP 2/4] SILVER PHASE: Cleaning, normalization, and typing...");
    let span = create_phase_span("silver", &run_id);
    let outcome = {
        let _enter = span.enter();
        silver::transform(&export)
    };
    let silver_path = PathBuf::from(&cfg.pipeline.silver_path);
    if let Err(e) = silver::write_dataset(&silver_path, &outcome.tickets).await {
        println!("❌ Error in silver phase: {}", e);
        return Err(e.into());
    }
    println!(
        "🧹 Cleaning: {} records dropped ({} without id, {} without valid creation date).",
        outcome.dropped_total(),
        outcome.dropped_missing_id,
        outcome.dropped_missing_created
    );
    println!(
        "✔️ Normalized data saved: {} tickets in {}",
        outcome.tickets.len(),
        silver_path.display()
    );

    // --- PHASE 3: GOLD (Business rules / SLA) ---
    println!();
    println!("[STEP 3/4] GOLD PHASE: SLA calculation (business days & holidays)...");
    let source = Arc::new(HolidayApiClient::new(
        cfg.holiday_api.base_url.clone(),
        cfg.holiday_api.timeout(),
    )?);
    let provider = Arc::new(HolidayProvider::new(source));
    let evaluator = SlaEvaluator::new(
        BusinessHoursCalculator::new(provider),
        SlaPolicy::new(cfg.sla.clone()),
    );

    let gold_outcome = gold::build(
        &outcome.tickets,
        &evaluator,
        &cfg.pipeline.terminal_statuses,
    )
    .instrument(create_phase_span("gold", &run_id))
    .await;

    if gold_outcome.evaluated.is_empty() {
        println!("⚠️ Warning: No completed tickets found.");
    }
    if gold_outcome.missing_hours_anomalies > 0 {
        println!(
            "⚠️ {} terminal tickets had no computable resolution hours.",
            gold_outcome.missing_hours_anomalies
        );
    }

    let gold_dir = PathBuf::from(&cfg.pipeline.gold_dir);
    let paths = match gold::write_outputs(&gold_dir, &gold_outcome).await {
        Ok(paths) => paths,
        Err(e) => {
            println!("❌ Error in gold phase: {}", e);
            return Err(e.into());
        }
    };
    println!(
        "✔️ Metrics and reports generated: {} evaluated tickets.",
        gold_outcome.evaluated.len()
    );
    println!("   📂 Master table:  {}", paths.dataset.display());
    println!("   📊 Analyst report: {}", paths.analyst_report.display());
    println!("   📊 Type report:    {}", paths.issue_type_report.display());

    // --- PHASE 4: VALIDATION (Data quality) ---
    println!();
    if skip_audit {
        println!("[STEP 4/4] QUALITY: skipped (--skip-audit).");
    } else {
        println!("[STEP 4/4] QUALITY: Integrity and rules audit...");
        match audit::run_audit(
            &bronze_path,
            &silver_path,
            &paths.dataset,
            &SlaPolicy::new(cfg.sla.clone()),
        )
        .instrument(create_phase_span("audit", &run_id))
        .await
        {
            Ok(report) => {
                println!();
                println!("{}", audit::format_audit_report(&report));
            }
            Err(e) => println!("⚠️ Audit alert: {}", e),
        }
    }

    println!();
    println!("{}", "=".repeat(60));
    println!(
        "✅ EXECUTION COMPLETED SUCCESSFULLY IN {:.2}s",
        started.elapsed().as_secs_f64()
    );
    println!("{}", "=".repeat(60));
    Ok(())
}

async fn audit_command() -> Result<()> {
    init_telemetry()?;
    init_config()?;
    let cfg = config()?;

    let gold_dataset = PathBuf::from(&cfg.pipeline.gold_dir).join("final_sla_report.json");
    match audit::run_audit(
        &PathBuf::from(&cfg.pipeline.bronze_path),
        &PathBuf::from(&cfg.pipeline.silver_path),
        &gold_dataset,
        &SlaPolicy::new(cfg.sla.clone()),
    )
    .await
    {
        Ok(report) => {
            println!("{}", audit::format_audit_report(&report));
            if report.is_healthy() {
                println!("🏁 Audit completed: pipeline healthy.");
            } else {
                println!("🏁 Audit completed: anomalies found (see above).");
            }
            Ok(())
        }
        Err(e) => {
            println!("❌ Audit could not read the persisted layers.");
            println!("   {}", e);
            println!();
            println!("🎯 QUICK FIX:");
            println!("   → Run the pipeline first: jira-sla-pipeline run");
            Err(e.into())
        }
    }
}
