//! Sweep extra-payment levels across a reference loan
//!
//! Emits one row per extra-payment amount with the payoff horizon and
//! interest totals, for comparing acceleration strategies side by side

use fincalc_engine::amortization::{simulate, ExtraPaymentPolicy, LoanParameters};
use fincalc_engine::payment::level_payment;
use rayon::prelude::*;
use std::fs::File;
use std::io::Write;
use std::time::Instant;

/// One grid cell: an extra-payment level and its payoff outcome
#[derive(Debug, Clone)]
struct GridRow {
    extra_monthly: f64,
    periods: u32,
    years: f64,
    total_interest: f64,
    interest_saved: f64,
    periods_saved: u32,
}

fn main() {
    env_logger::init();

    let start = Instant::now();

    // Reference loan for the sweep
    let principal = 300_000.0;
    let annual_rate = 0.065;
    let term_months = 360u32;

    let base_payment = level_payment(principal, annual_rate / 12.0, term_months)
        .expect("payment solves for the reference loan");

    println!(
        "Reference loan: ${:.0} at {:.2}% over {} months",
        principal,
        annual_rate * 100.0,
        term_months
    );
    println!("Base payment: ${:.2}", base_payment);

    let baseline = simulate(&LoanParameters::monthly(principal, annual_rate, base_payment))
        .expect("baseline simulation succeeds")
        .summary();
    println!("Baseline interest: ${:.2}", baseline.total_interest);

    println!("\nSweeping extra payments...");
    let sweep_start = Instant::now();

    // $0 to $1000 in $25 steps
    let extras: Vec<f64> = (0..=40).map(|i| i as f64 * 25.0).collect();

    let rows: Vec<GridRow> = extras
        .par_iter()
        .map(|&extra| {
            let policy = if extra > 0.0 {
                ExtraPaymentPolicy::Monthly(extra)
            } else {
                ExtraPaymentPolicy::None
            };
            let params =
                LoanParameters::monthly(principal, annual_rate, base_payment).with_policy(policy);
            let summary = simulate(&params)
                .expect("sweep simulation succeeds")
                .summary();

            GridRow {
                extra_monthly: extra,
                periods: summary.periods_to_payoff,
                years: summary.periods_to_payoff as f64 / 12.0,
                total_interest: summary.total_interest,
                interest_saved: baseline.total_interest - summary.total_interest,
                periods_saved: baseline.periods_to_payoff - summary.periods_to_payoff,
            }
        })
        .collect();

    println!("Sweep complete in {:?}", sweep_start.elapsed());

    // Write output
    let output_path = "payoff_grid.csv";
    let mut file = File::create(output_path).expect("Failed to create output file");

    writeln!(
        file,
        "ExtraMonthly,Periods,Years,TotalInterest,InterestSaved,PeriodsSaved"
    )
    .unwrap();

    for row in &rows {
        writeln!(
            file,
            "{:.2},{},{:.2},{:.2},{:.2},{}",
            row.extra_monthly,
            row.periods,
            row.years,
            row.total_interest,
            row.interest_saved,
            row.periods_saved,
        )
        .unwrap();
    }

    println!("Output written to {}", output_path);

    // Marker rows: $0, $100, $200, $500, $1000
    println!("\nGrid Summary:");
    for &marker in &[0usize, 4, 8, 20, 40] {
        if let Some(row) = rows.get(marker) {
            println!(
                "  Extra ${:>4.0}: {:>3} periods ({:.1} yr), interest ${:>10.2}, saved ${:>9.2}",
                row.extra_monthly, row.periods, row.years, row.total_interest, row.interest_saved
            );
        }
    }

    println!("\nTotal time: {:?}", start.elapsed());
}
