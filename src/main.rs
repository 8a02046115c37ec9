//! Fincalc CLI
//!
//! Command-line front end for the projection engines:
//!
//! - `fincalc payment` - level payment for a new loan
//! - `fincalc payoff` - payoff horizon for an existing loan, with extras
//! - `fincalc auto` - auto loan from price, trade-in, tax, and fees
//! - `fincalc ira` - savings growth across tax treatments
//! - `fincalc rmd` - required minimum distributions
//! - `fincalc inflation` - historical or assumed-rate adjustment

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use fincalc_engine::amortization::{AmortizationResult, ExtraPaymentPolicy, LoanSummary};
use fincalc_engine::calculators::{
    AutoLoanRequest, CalculatorSuite, LoanRequest, MortgagePayoffRequest, PayoffMode,
};
use fincalc_engine::growth::GrowthParameters;
use fincalc_engine::rmd::{RmdParameters, RmdStatus};
use fincalc_engine::tables::CpiPeriod;

/// Personal finance calculators
#[derive(Parser)]
#[command(name = "fincalc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Load reference tables from CSV files in this directory
    #[arg(long, global = true)]
    tables: Option<PathBuf>,

    /// Print results as JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Level payment for a new loan
    Payment {
        /// Loan principal
        #[arg(short, long)]
        principal: f64,

        /// Annual interest rate as a decimal, e.g. 0.06
        #[arg(short, long)]
        rate: f64,

        /// Term in months
        #[arg(short, long)]
        term: u32,

        /// First payment date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Write the full schedule to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Payoff horizon for an existing loan, with optional extra payments
    Payoff {
        /// Outstanding balance
        #[arg(short, long)]
        balance: f64,

        /// Annual interest rate as a decimal
        #[arg(short, long)]
        rate: f64,

        /// Remaining term in months (mutually exclusive with --payment)
        #[arg(short, long, conflicts_with = "payment")]
        term: Option<u32>,

        /// Current monthly payment (mutually exclusive with --term)
        #[arg(short, long)]
        payment: Option<f64>,

        /// Extra amount added to every payment
        #[arg(long, default_value_t = 0.0)]
        extra_monthly: f64,

        /// Extra lump added once a year on the anniversary payment
        #[arg(long, default_value_t = 0.0)]
        extra_annual: f64,

        /// One-time lump as AMOUNT@PERIOD, e.g. 5000@12
        #[arg(long)]
        lump: Option<String>,

        /// First payment date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Write the full schedule to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Auto loan payment from price, down payment, trade-in, tax, and fees
    Auto {
        /// Vehicle price
        #[arg(short, long)]
        price: f64,

        /// Cash down payment
        #[arg(short, long, default_value_t = 0.0)]
        down: f64,

        /// Trade-in credit
        #[arg(long, default_value_t = 0.0)]
        trade_in: f64,

        /// Sales tax rate as a decimal, applied net of trade-in
        #[arg(long, default_value_t = 0.0)]
        tax_rate: f64,

        /// Title, registration, and dealer fees rolled into the loan
        #[arg(long, default_value_t = 0.0)]
        fees: f64,

        /// Annual interest rate as a decimal
        #[arg(short, long)]
        rate: f64,

        /// Term in months
        #[arg(short, long)]
        term: u32,

        /// First payment date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Write the full schedule to a CSV file
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Compare pre-tax, post-tax, and taxable savings up to retirement
    Ira {
        /// Current age
        #[arg(short, long)]
        age: u8,

        /// Retirement age
        #[arg(short = 'R', long, default_value_t = 65)]
        retirement_age: u8,

        /// Current balance
        #[arg(short, long, default_value_t = 0.0)]
        balance: f64,

        /// Annual contribution in pre-tax dollars
        #[arg(short, long)]
        contribution: f64,

        /// Annual growth rate as a decimal
        #[arg(short, long, default_value_t = 0.07)]
        growth: f64,

        /// Marginal tax rate today
        #[arg(long)]
        tax_rate: f64,

        /// Expected tax rate in retirement
        #[arg(long)]
        retirement_tax_rate: f64,
    },

    /// Required minimum distributions
    Rmd {
        /// Account balance at the end of last year
        #[arg(short, long)]
        balance: f64,

        /// Owner's age this year
        #[arg(short, long)]
        age: u8,

        /// Spouse's age; the joint table applies when more than 10 years
        /// younger
        #[arg(short, long)]
        spouse_age: Option<u8>,

        /// Assumed annual growth rate for the projection
        #[arg(short, long, default_value_t = 0.0)]
        growth: f64,

        /// Project distributions year by year instead of the current year
        /// only
        #[arg(long)]
        project: bool,
    },

    /// Adjust an amount for inflation
    Inflation {
        /// Amount to adjust
        #[arg(short, long)]
        amount: f64,

        /// Source period as YYYY or YYYY-MM (historical mode)
        #[arg(short, long, requires = "to")]
        from: Option<String>,

        /// Target period as YYYY or YYYY-MM (historical mode)
        #[arg(short, long)]
        to: Option<String>,

        /// Assumed annual inflation rate (assumed mode)
        #[arg(short, long, conflicts_with_all = ["from", "to"], requires = "years")]
        rate: Option<f64>,

        /// Number of years to project (assumed mode)
        #[arg(short, long, conflicts_with_all = ["from", "to"])]
        years: Option<u32>,

        /// Deflate instead of inflate (assumed mode)
        #[arg(long)]
        backward: bool,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    let suite = match &cli.tables {
        Some(dir) => CalculatorSuite::from_csv_path(dir)
            .map_err(|e| anyhow!("failed to load tables from {}: {}", dir.display(), e))?,
        None => CalculatorSuite::new(),
    };

    match cli.command {
        Commands::Payment {
            principal,
            rate,
            term,
            start_date,
            csv,
        } => run_payment(&suite, cli.json, principal, rate, term, start_date, csv.as_deref()),
        Commands::Payoff {
            balance,
            rate,
            term,
            payment,
            extra_monthly,
            extra_annual,
            lump,
            start_date,
            csv,
        } => run_payoff(
            &suite,
            cli.json,
            balance,
            rate,
            term,
            payment,
            extra_monthly,
            extra_annual,
            lump.as_deref(),
            start_date,
            csv.as_deref(),
        ),
        Commands::Auto {
            price,
            down,
            trade_in,
            tax_rate,
            fees,
            rate,
            term,
            start_date,
            csv,
        } => run_auto(
            &suite,
            cli.json,
            AutoLoanRequest {
                vehicle_price: price,
                down_payment: down,
                trade_in,
                sales_tax_rate: tax_rate,
                fees,
                annual_rate: rate,
                term_months: term,
                start_date,
            },
            csv.as_deref(),
        ),
        Commands::Ira {
            age,
            retirement_age,
            balance,
            contribution,
            growth,
            tax_rate,
            retirement_tax_rate,
        } => run_ira(
            &suite,
            cli.json,
            GrowthParameters {
                current_age: age,
                retirement_age,
                starting_balance: balance,
                annual_contribution: contribution,
                growth_rate: growth,
                current_tax_rate: tax_rate,
                retirement_tax_rate,
            },
        ),
        Commands::Rmd {
            balance,
            age,
            spouse_age,
            growth,
            project,
        } => run_rmd(&suite, cli.json, balance, age, spouse_age, growth, project),
        Commands::Inflation {
            amount,
            from,
            to,
            rate,
            years,
            backward,
        } => run_inflation(&suite, cli.json, amount, from, to, rate, years, backward),
    }
}

fn run_payment(
    suite: &CalculatorSuite,
    json: bool,
    principal: f64,
    rate: f64,
    term: u32,
    start_date: Option<NaiveDate>,
    csv: Option<&Path>,
) -> anyhow::Result<()> {
    let report = suite.loan_payment(&LoanRequest {
        principal,
        annual_rate: rate,
        term_months: term,
        start_date,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Monthly payment: ${:.2}\n", report.payment);
        print_schedule(&report.schedule);
        print_summary(&report.summary);
    }

    if let Some(path) = csv {
        write_schedule_csv(path, &report.schedule)?;
        if !json {
            println!("\nFull schedule written to: {}", path.display());
        }
    }
    Ok(())
}

fn run_payoff(
    suite: &CalculatorSuite,
    json: bool,
    balance: f64,
    rate: f64,
    term: Option<u32>,
    payment: Option<f64>,
    extra_monthly: f64,
    extra_annual: f64,
    lump: Option<&str>,
    start_date: Option<NaiveDate>,
    csv: Option<&Path>,
) -> anyhow::Result<()> {
    let mode = match (term, payment) {
        (Some(t), None) => PayoffMode::KnownTerm {
            remaining_periods: t,
        },
        (None, Some(p)) => PayoffMode::KnownPayment { payment: p },
        _ => bail!("provide exactly one of --term or --payment"),
    };

    let comparison = suite.mortgage_payoff(&MortgagePayoffRequest {
        balance,
        annual_rate: rate,
        mode,
        policy: build_policy(extra_monthly, extra_annual, lump)?,
        start_date,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&comparison)?);
    } else {
        println!("Base payment: ${:.2}\n", comparison.base_payment);
        print_schedule(&comparison.schedule);
        print_summary(&comparison.summary);
        println!("\nAgainst the no-extra baseline:");
        println!("  Periods saved: {}", comparison.periods_saved);
        println!("  Interest saved: ${:.2}", comparison.interest_saved);
    }

    if let Some(path) = csv {
        write_schedule_csv(path, &comparison.schedule)?;
        if !json {
            println!("\nFull schedule written to: {}", path.display());
        }
    }
    Ok(())
}

fn run_auto(
    suite: &CalculatorSuite,
    json: bool,
    request: AutoLoanRequest,
    csv: Option<&Path>,
) -> anyhow::Result<()> {
    let report = suite.auto_loan(&request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Amount financed: ${:.2}", report.amount_financed);
        println!("  Sales tax: ${:.2}", report.sales_tax);
        println!("Monthly payment: ${:.2}\n", report.payment);
        print_schedule(&report.schedule);
        print_summary(&report.summary);
    }

    if let Some(path) = csv {
        write_schedule_csv(path, &report.schedule)?;
        if !json {
            println!("\nFull schedule written to: {}", path.display());
        }
    }
    Ok(())
}

fn run_ira(suite: &CalculatorSuite, json: bool, params: GrowthParameters) -> anyhow::Result<()> {
    let result = suite.ira_comparison(&params)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if result.rows.is_empty() {
        println!("Already at or past retirement age; nothing to project.");
        return Ok(());
    }

    println!(
        "{:>5} {:>4} {:>14} {:>14} {:>14}",
        "Year", "Age", "Pre-Tax", "Post-Tax", "Taxable"
    );
    println!("{}", "-".repeat(55));
    for row in &result.rows {
        println!(
            "{:>5} {:>4} {:>14.2} {:>14.2} {:>14.2}",
            row.year, row.age, row.pre_tax, row.post_tax, row.taxable
        );
    }

    let summary = result.summary();
    println!(
        "\nAfter tax at retirement ({:.0}% rate):",
        result.retirement_tax_rate * 100.0
    );
    println!("  Pre-tax account:  ${:.2}", summary.pre_tax_after_tax);
    println!("  Post-tax account: ${:.2}", summary.post_tax_after_tax);
    println!("  Taxable account:  ${:.2}", summary.taxable_after_tax);
    Ok(())
}

fn run_rmd(
    suite: &CalculatorSuite,
    json: bool,
    balance: f64,
    age: u8,
    spouse_age: Option<u8>,
    growth: f64,
    project: bool,
) -> anyhow::Result<()> {
    if !project {
        let status = suite.current_rmd(balance, age, spouse_age)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&status)?);
        } else {
            match status {
                RmdStatus::NotYetRequired { first_rmd_age } => {
                    println!("No distribution required until age {}", first_rmd_age);
                }
                RmdStatus::Required { divisor, amount } => {
                    println!("Required distribution: ${:.2}", amount);
                    println!("  Divisor: {:.1}", divisor);
                    println!("  Balance: ${:.2}", balance);
                }
            }
        }
        return Ok(());
    }

    let projection = suite.rmd_projection(&RmdParameters {
        balance,
        start_age: age,
        spouse_age,
        growth_rate: growth,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&projection)?);
        return Ok(());
    }

    println!(
        "{:>4} {:>8} {:>14} {:>12} {:>14}",
        "Age", "Divisor", "BOY Balance", "RMD", "EOY Balance"
    );
    println!("{}", "-".repeat(56));
    for row in &projection.rows {
        let divisor = match row.divisor {
            Some(d) => format!("{:.1}", d),
            None => "-".to_string(),
        };
        println!(
            "{:>4} {:>8} {:>14.2} {:>12.2} {:>14.2}",
            row.age, divisor, row.beginning_balance, row.rmd, row.ending_balance
        );
    }

    let summary = projection.summary();
    println!("\nSummary:");
    println!("  Years projected: {}", summary.years_projected);
    println!("  Total withdrawn: ${:.2}", summary.total_withdrawn);
    println!("  Final balance: ${:.2}", summary.final_balance);
    if let Some(age) = summary.depleted_at_age {
        println!("  Depleted at age: {}", age);
    }
    Ok(())
}

fn run_inflation(
    suite: &CalculatorSuite,
    json: bool,
    amount: f64,
    from: Option<String>,
    to: Option<String>,
    rate: Option<f64>,
    years: Option<u32>,
    backward: bool,
) -> anyhow::Result<()> {
    let (report, span) = match (from, to, rate, years) {
        (Some(from), Some(to), None, None) => {
            let from = parse_cpi_period(&from)?;
            let to = parse_cpi_period(&to)?;
            let report = suite.adjust_for_inflation(amount, from, to)?;
            (report, format!("{} to {}", from, to))
        }
        (None, None, Some(rate), Some(years)) => {
            let report = suite.project_inflation(amount, rate, years, backward)?;
            let direction = if backward { "back" } else { "forward" };
            (report, format!("{} years {} at {:.2}%", years, direction, rate * 100.0))
        }
        _ => bail!("provide --from/--to for historical mode, or --rate/--years for an assumed rate"),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "${:.2} adjusted over {}: ${:.2}",
            report.original_amount, span, report.adjusted_amount
        );
        println!("  Total change: {:+.1}%", report.total_change * 100.0);
        if let Some(rate) = report.annual_rate {
            println!("  Annual rate: {:.2}%", rate * 100.0);
        }
    }
    Ok(())
}

/// Fold the extra-payment flags into a single policy
fn build_policy(
    extra_monthly: f64,
    extra_annual: f64,
    lump: Option<&str>,
) -> anyhow::Result<ExtraPaymentPolicy> {
    let mut parts = Vec::new();
    if extra_monthly > 0.0 {
        parts.push(ExtraPaymentPolicy::Monthly(extra_monthly));
    }
    if extra_annual > 0.0 {
        parts.push(ExtraPaymentPolicy::Annual(extra_annual));
    }
    if let Some(raw) = lump {
        let (amount, at_period) = parse_lump(raw)?;
        parts.push(ExtraPaymentPolicy::OneTime { amount, at_period });
    }

    Ok(if parts.is_empty() {
        ExtraPaymentPolicy::None
    } else if parts.len() == 1 {
        parts.remove(0)
    } else {
        ExtraPaymentPolicy::Composite(parts)
    })
}

/// Parse a one-time lump argument of the form AMOUNT@PERIOD
fn parse_lump(raw: &str) -> anyhow::Result<(f64, u32)> {
    let (amount, period) = raw
        .split_once('@')
        .ok_or_else(|| anyhow!("expected AMOUNT@PERIOD, got '{}'", raw))?;
    let amount = amount
        .trim()
        .parse()
        .with_context(|| format!("bad lump amount in '{}'", raw))?;
    let period = period
        .trim()
        .parse()
        .with_context(|| format!("bad lump period in '{}'", raw))?;
    Ok((amount, period))
}

/// Parse YYYY into an annual-average period, YYYY-MM into a monthly one
fn parse_cpi_period(raw: &str) -> anyhow::Result<CpiPeriod> {
    match raw.split_once('-') {
        Some((year, month)) => {
            let year = year
                .parse()
                .with_context(|| format!("bad year in '{}'", raw))?;
            let number: u8 = month
                .parse()
                .with_context(|| format!("bad month in '{}'", raw))?;
            let month = chrono::Month::try_from(number)
                .map_err(|_| anyhow!("month must be 01-12, got '{}'", month))?;
            Ok(CpiPeriod::monthly(year, month))
        }
        None => {
            let year = raw
                .parse()
                .with_context(|| format!("bad year '{}'", raw))?;
            Ok(CpiPeriod::annual(year))
        }
    }
}

fn print_schedule(schedule: &AmortizationResult) {
    println!(
        "{:>6} {:>12} {:>12} {:>12} {:>10} {:>14}",
        "Period", "Payment", "Interest", "Principal", "Extra", "Balance"
    );
    println!("{}", "-".repeat(71));

    for row in schedule.rows.iter().take(24) {
        println!(
            "{:>6} {:>12.2} {:>12.2} {:>12.2} {:>10.2} {:>14.2}",
            row.period, row.payment, row.interest, row.principal, row.extra, row.ending_balance
        );
    }

    if schedule.rows.len() > 24 {
        println!("... ({} more periods)", schedule.rows.len() - 24);
    }
}

fn print_summary(summary: &LoanSummary) {
    println!("\nSummary:");
    println!("  Periods to payoff: {}", summary.periods_to_payoff);
    println!("  Total interest: ${:.2}", summary.total_interest);
    println!("  Total paid: ${:.2}", summary.total_paid);
    println!("  Final payment: ${:.2}", summary.final_payment);
    if let Some(date) = summary.payoff_date {
        println!("  Payoff date: {}", date);
    }
}

fn write_schedule_csv(path: &Path, schedule: &AmortizationResult) -> anyhow::Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("unable to create {}", path.display()))?;

    writeln!(
        file,
        "Period,Payment,Interest,Principal,Extra,EndingBalance,CumulativeInterest,CumulativePrincipal"
    )?;
    for row in &schedule.rows {
        writeln!(
            file,
            "{},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2},{:.2}",
            row.period,
            row.payment,
            row.interest,
            row.principal,
            row.extra,
            row.ending_balance,
            row.cumulative_interest,
            row.cumulative_principal
        )?;
    }
    Ok(())
}
