use crate::infra::{build_engine, describe, read_json, Engine};
use clap::Args;
use finsight::config::AppConfig;
use finsight::error::AppError;
use finsight::health::{
    BusinessMetrics, DiagnosisReport, MetricsImporter, SimulationOutcome, SimulationRequest,
    SliderImpact,
};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct DiagnoseArgs {
    /// JSON file holding the six metrics plus optional sector and currency
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the raw JSON report instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct SimulateArgs {
    /// JSON file shaped like `{"original": {...}, "adjustments": {"total_debt": -20}}`
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Print the raw JSON outcome instead of a summary
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct BatchArgs {
    /// CSV file with one business per row
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

fn engine() -> Result<Engine, AppError> {
    let config = AppConfig::load()?;
    build_engine(&config)
}

pub(crate) async fn run_diagnose(args: DiagnoseArgs) -> Result<(), AppError> {
    let metrics: BusinessMetrics = read_json(&args.input)?;
    let report = engine()?.diagnose(&metrics).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        render_diagnosis(&metrics, &report);
    }
    Ok(())
}

pub(crate) async fn run_simulate(args: SimulateArgs) -> Result<(), AppError> {
    let request: SimulationRequest = read_json(&args.input)?;
    let outcome = engine()?.simulate(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        render_simulation(&request, &outcome);
    }
    Ok(())
}

pub(crate) fn run_batch(args: BatchArgs) -> Result<(), AppError> {
    let rows = MetricsImporter::from_path(&args.csv)?;
    let engine = engine()?;

    println!("Scoring {} businesses from {}", rows.len(), args.csv.display());
    for (index, metrics) in rows.iter().enumerate() {
        let assessment = engine.assess(metrics)?;
        let lever = assessment
            .impacts
            .first()
            .map(|impact| impact.label.as_str())
            .unwrap_or("-");
        println!(
            "- row {}: {} | health {} (rules {}, distress {:.1}%) | top lever: {}",
            index + 1,
            describe(metrics),
            assessment.health_score,
            assessment.hand_score,
            assessment.distress_probability * 100.0,
            lever
        );
    }
    Ok(())
}

fn render_diagnosis(metrics: &BusinessMetrics, report: &DiagnosisReport) {
    println!("Financial health for {}", describe(metrics));
    println!("- Health score: {}/100", report.health_score);
    println!("Breakdown:");
    for (_, score) in report.breakdown.entries() {
        println!("  - {}: {}/{}", score.label, score.current, score.max);
    }
    println!("Levers:");
    for impact in &report.impacts {
        render_impact(impact);
    }
    println!("\n{}", report.explanation);
}

fn render_impact(impact: &SliderImpact) {
    println!(
        "  - {}: {} | {:.0}% of impact ({:?}, {:?})",
        impact.label,
        impact.current_value,
        impact.impact_share * 100.0,
        impact.tier,
        impact.status
    );
}

fn render_simulation(request: &SimulationRequest, outcome: &SimulationOutcome) {
    println!("What-if for {}", describe(&request.original));
    for (key, percent) in request.adjustments.iter() {
        println!("  - {} {:+.0}%", key.label(), percent);
    }
    match (outcome.previous_score, outcome.points_change) {
        (Some(previous), Some(change)) => println!(
            "- Score: {} -> {} ({:+} points)",
            previous, outcome.final_score, change
        ),
        _ => println!("- Score: {}", outcome.final_score),
    }
    println!("Potential benefits:");
    for benefit in &outcome.potential_benefits {
        println!("  - {}", benefit);
    }
}
