//! # Slabform CLI
//!
//! Terminal front end for the formwork engine.
//!
//! ```text
//! calc_cli request.json    evaluate a JSON request file
//! calc_cli                 prompt for inputs interactively
//! ```
//!
//! Prints a summary followed by the JSON report.

mod logging;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use calc_core::evaluation::{evaluate, DesignOutcome, EvaluationReport, EvaluationRequest, FormworkRequest};
use calc_core::loads::{ImposedLoads, LoadInputs, Stage};
use calc_core::systems::{FormworkSystem, SupportConfiguration};
use calc_core::{CalcError, CalcResult};

fn prompt_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    io::stdout().flush().ok()?;

    let mut input = String::new();
    io::stdin().lock().read_line(&mut input).ok()?;
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn prompt_f64(prompt: &str, default: f64) -> f64 {
    prompt_line(prompt)
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn prompt_imposed(stage: Stage, workers: f64, stored: f64) -> ImposedLoads {
    let n = stage.number();
    ImposedLoads::new(
        prompt_f64(&format!("Stage {} Q_w workers (kPa) [{}]: ", n, workers), workers),
        prompt_f64(&format!("Stage {} Q_m stored material (kPa) [{}]: ", n, stored), stored),
    )
}

fn prompt_request() -> CalcResult<EvaluationRequest> {
    let loads = LoadInputs::new(
        prompt_f64("G_f formwork self-weight (kPa) [0.5]: ", 0.5),
        prompt_f64("Slab thickness (m) [0.2]: ", 0.2),
        prompt_f64("Reinforcement ratio (%) [1.0]: ", 1.0),
    )
    .with_imposed(Stage::BeforePlacement, prompt_imposed(Stage::BeforePlacement, 1.0, 0.0))
    .with_imposed(Stage::DuringPlacement, prompt_imposed(Stage::DuringPlacement, 2.0, 2.5))
    .with_imposed(Stage::AfterPlacement, prompt_imposed(Stage::AfterPlacement, 1.0, 0.0));

    let system = match prompt_line("Formwork system A/B/C [C]: ") {
        Some(s) => FormworkSystem::from_str_flexible(&s)?,
        None => FormworkSystem::SystemC,
    };

    let mut formwork = FormworkRequest::new(
        system,
        prompt_f64("Span (m) [3.0]: ", 3.0),
        prompt_f64("Width (m) [6.0]: ", 6.0),
    );
    if system.is_support_sensitive() {
        let support = match prompt_line("Mid-support none/single/double/triple [single]: ") {
            Some(s) => SupportConfiguration::from_str_flexible(&s)?,
            None => SupportConfiguration::SingleMidSupport,
        };
        formwork = formwork.with_support(support);
    }

    Ok(EvaluationRequest::new(loads).with_formwork(formwork))
}

fn load_request(path: &str) -> CalcResult<EvaluationRequest> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CalcError::invalid_input("request", path, e.to_string()))?;
    Ok(serde_json::from_str(&text)?)
}

fn print_summary(report: &EvaluationReport) {
    println!("═══════════════════════════════════════");
    println!("  FORMWORK LOAD EVALUATION");
    println!("═══════════════════════════════════════");
    println!();
    println!(
        "G_c = {:.3} kPa (t = {} m, r = {} %, ρ = {} kN/m³)",
        report.concrete_load.value_kpa,
        report.concrete_load.thickness_m,
        report.concrete_load.reinforcement_pct,
        report.concrete_load.unit_weight_kn_m3
    );

    for (stage, combos) in &report.combinations {
        println!();
        println!("{} - {}:", stage, stage.display_name());
        for combo in combos {
            println!(
                "  {:<5} {:<13} {:>8.3} kPa  H {:>6.3} kN/m  = {}",
                combo.name,
                combo.member_class.display_name(),
                combo.vertical_kpa,
                combo.horizontal_kn_m,
                combo.equation
            );
        }
    }

    println!();
    println!(
        "Design load: {:.3} kPa ({} {}, {})",
        report.design_load.value_kpa,
        report.design_load.governing_stage,
        report.design_load.governing_combination,
        report.design_load.member_class.display_name()
    );
    if let Some(plain) = &report.non_critical_design_load {
        println!(
            "Non-critical members: {:.3} kPa ({} {})",
            plain.value_kpa, plain.governing_stage, plain.governing_combination
        );
    }

    match &report.design {
        Some(DesignOutcome::Accepted(design)) => {
            println!();
            println!("Formwork: {} ({})", design.system, design.material);
            if let Some(support) = design.support {
                println!("  Support:     {}", support);
            }
            println!(
                "  Span:        {} m (range {}-{} m)",
                design.span_m, design.min_span_m, design.max_span_m
            );
            println!(
                "  Joists:      {} @ {:.3} m (standard {} m)",
                design.joist_count, design.actual_spacing_m, design.standard_spacing_m
            );
            println!(
                "  Utilization: {:.0}% of {:.1} kPa",
                design.utilization * 100.0,
                design.spacing_capacity_kpa
            );
            println!("  Self-weight: {:.3} kPa", design.total_self_weight_kpa);
            println!(
                "  Deflection:  {:.2} mm est. / {:.2} mm allowed (L/{:.0}) {}",
                design.estimated_deflection_mm,
                design.allowed_deflection_mm,
                design.deflection_limit_ratio,
                status_icon(design.deflection_ok())
            );
        }
        Some(DesignOutcome::Rejected { error }) => {
            println!();
            println!("Formwork: [FAIL] {}", error);
        }
        None => {}
    }

    if let Some(bom) = &report.bill_of_materials {
        println!();
        println!("Bill of materials:");
        println!("  Decking:  {:.2} m²", bom.decking_area_m2);
        println!("  Joists:   {}", bom.joist_count);
        println!(
            "  Beams:    {} across + {} along",
            bom.beams_across_width, bom.beams_along_span
        );
        println!("  Supports: {}", bom.support_count);
    }
    println!("═══════════════════════════════════════");
}

fn report_error(e: &CalcError) {
    eprintln!("Error: {}", e);
    if let Ok(json) = serde_json::to_string_pretty(e) {
        eprintln!();
        eprintln!("Error JSON:");
        eprintln!("{}", json);
    }
}

fn status_icon(pass: bool) -> &'static str {
    if pass { "[OK]" } else { "[FAIL]" }
}

fn main() -> ExitCode {
    logging::init();

    let request = match std::env::args().nth(1) {
        Some(path) => load_request(&path),
        None => {
            println!("Slabform CLI - Formwork Load & Capacity Check");
            println!("=============================================");
            println!();
            prompt_request()
        }
    };

    let report = match request.and_then(|r| evaluate(&r)) {
        Ok(report) => report,
        Err(e) => {
            report_error(&e);
            return ExitCode::FAILURE;
        }
    };

    print_summary(&report);
    println!();
    println!("JSON Output:");
    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            report_error(&CalcError::from(e));
            return ExitCode::FAILURE;
        }
    }
    ExitCode::SUCCESS
}
