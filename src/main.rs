//! Liquidity Plan CLI
//!
//! Command-line interface for loan figures and liquidity simulations
//!
//! ```bash
//! # Simulate every liquidity scenario of a plan
//! liquidity_plan simulate --plan plan.json
//!
//! # One scenario, full rows to CSV
//! liquidity_plan simulate --plan plan.json --scenario household --csv household.csv
//!
//! # Payment, balance and payoff of a single loan
//! liquidity_plan loan --principal 300000 --rate 3.7 --amortization 2 --elapsed 10
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use liquidity_plan::amortization::{elapsed_years_between, loan_snapshot};
use liquidity_plan::loader::DEFAULT_PLAN_PATH;
use liquidity_plan::{
    Amortization, GracePeriod, LoanParameters, MonthKey, ScenarioRunner, SimulationResult,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

/// Loan amortization and liquidity planning
#[derive(Parser)]
#[command(name = "liquidity_plan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate liquidity scenarios from a plan file
    Simulate {
        /// JSON plan file
        #[arg(short, long, default_value = DEFAULT_PLAN_PATH)]
        plan: PathBuf,

        /// Liquidity scenario id (all scenarios if omitted)
        #[arg(short, long)]
        scenario: Option<String>,

        /// Write monthly rows to this CSV file (requires --scenario)
        #[arg(long, requires = "scenario")]
        csv: Option<PathBuf>,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the consolidated monthly obligation of a credit scenario
    Obligation {
        /// JSON plan file
        #[arg(short, long, default_value = DEFAULT_PLAN_PATH)]
        plan: PathBuf,

        /// Credit scenario id
        #[arg(short, long)]
        scenario: String,
    },

    /// Payment, balance and payoff figures for a single loan
    Loan {
        #[arg(long)]
        principal: f64,

        /// Effective annual interest rate in percent
        #[arg(long)]
        rate: f64,

        /// Amortization rate in percent per year
        #[arg(long, conflicts_with = "term", required_unless_present = "term")]
        amortization: Option<f64>,

        /// Total term in years; the amortization rate is solved from it
        #[arg(long)]
        term: Option<f64>,

        /// Payment-free years at the start
        #[arg(long, default_value_t = 0.0, conflicts_with = "interest_only")]
        payment_free: f64,

        /// Interest-only years at the start
        #[arg(long, default_value_t = 0.0)]
        interest_only: f64,

        /// Years since the loan started
        #[arg(long, conflicts_with = "since")]
        elapsed: Option<f64>,

        /// Month the loan started (YYYY-MM); elapsed time runs to the current month
        #[arg(long)]
        since: Option<String>,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            plan,
            scenario,
            csv,
            json,
        } => run_simulate(plan, scenario, csv, json),
        Commands::Obligation { plan, scenario } => run_obligation(plan, &scenario),
        Commands::Loan {
            principal,
            rate,
            amortization,
            term,
            payment_free,
            interest_only,
            elapsed,
            since,
        } => {
            let amortization = match (amortization, term) {
                (Some(rate), _) => Amortization::Rate(rate),
                (None, Some(years)) => Amortization::FixedTerm(years),
                (None, None) => bail!("either --amortization or --term is required"),
            };
            let elapsed = match (elapsed, since) {
                (Some(years), _) => years,
                (None, Some(start)) => {
                    let start: MonthKey = start.parse()?;
                    elapsed_years_between(&start, &MonthKey::current())
                }
                (None, None) => 0.0,
            };
            let loan = LoanParameters::new(principal, rate, amortization)
                .with_grace_period(GracePeriod::new(payment_free, interest_only));
            run_loan(&loan, elapsed)
        }
    }
}

fn run_simulate(
    plan: PathBuf,
    scenario: Option<String>,
    csv: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let runner = ScenarioRunner::from_path(&plan)
        .with_context(|| format!("Failed to load plan from {}", plan.display()))?;

    let results: Vec<SimulationResult> = match scenario {
        Some(id) => vec![runner
            .run(&id)
            .with_context(|| format!("Failed to simulate scenario {}", id))?],
        None => runner
            .run_all()
            .into_iter()
            .map(|(id, result)| {
                result.with_context(|| format!("Failed to simulate scenario {}", id))
            })
            .collect::<Result<_>>()?,
    };

    if let Some(path) = csv {
        let file = File::create(&path)
            .with_context(|| format!("Unable to create {}", path.display()))?;
        for result in &results {
            result.write_csv(BufWriter::new(&file))?;
        }
        println!("Monthly results written to: {}", path.display());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    for result in &results {
        print_result(result);
    }

    Ok(())
}

fn print_result(result: &SimulationResult) {
    println!(
        "Scenario: {}",
        result.scenario_id.as_deref().unwrap_or("(unnamed)")
    );
    println!(
        "{:>8} {:>12} {:>12} {:>12} {:>12} {:>14}",
        "Month", "Income", "Expense", "Credit", "Net", "Capital"
    );
    println!("{}", "-".repeat(76));

    // Print first 24 months to console
    for row in result.rows.iter().take(24) {
        println!(
            "{:>8} {:>12.2} {:>12.2} {:>12.2} {:>12.2} {:>14.2}",
            row.month.to_string(),
            row.income,
            row.expense,
            row.credit_rate,
            row.net,
            row.capital_end,
        );
    }
    if result.rows.len() > 24 {
        println!("... ({} more months)", result.rows.len() - 24);
    }

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Total Months: {}", summary.total_months);
    println!("  Total Income: {:.2}", summary.total_income);
    println!("  Total Expense: {:.2}", summary.total_expense);
    println!("  Total Credit: {:.2}", summary.total_credit);
    println!("  Final Capital: {:.2}", summary.final_capital);
    if let Some(month) = summary.min_capital_month {
        println!("  Lowest Capital: {:.2} ({})", summary.min_capital, month);
    }
    if let Some(month) = summary.first_negative_month {
        println!("  Capital first negative in {}", month);
    }
    println!();
}

fn run_obligation(plan: PathBuf, scenario: &str) -> Result<()> {
    let runner = ScenarioRunner::from_path(&plan)
        .with_context(|| format!("Failed to load plan from {}", plan.display()))?;
    let obligation = runner
        .credit_obligation(scenario)
        .with_context(|| format!("Failed to build obligation for {}", scenario))?;

    println!("Credit scenario: {}", scenario);
    println!("{:>10} {:>10} {:>14}", "From", "To", "Monthly");
    println!("{}", "-".repeat(36));
    for interval in obligation.intervals() {
        println!(
            "{:>10.2} {:>10.2} {:>14.2}",
            interval.start_year, interval.end_year, interval.total_rate
        );
    }

    Ok(())
}

fn run_loan(loan: &LoanParameters, elapsed_years: f64) -> Result<()> {
    let snapshot = loan_snapshot(loan, elapsed_years)?;

    println!("Loan: {:.2} at {:.3}%", loan.principal, loan.effective_annual_rate);
    println!("  Amortization Rate: {:.4}%", snapshot.amortization_rate_percent);
    println!("  Monthly Payment: {:.2}", snapshot.monthly_payment);
    if loan.grace_period.interest_only_years() > 0.0 {
        println!("  Interest-Only Payment: {:.2}", snapshot.interest_only_payment);
    }
    println!();
    println!("After {:.2} years:", snapshot.elapsed_years);
    println!("  Remaining Balance: {:.2}", snapshot.remaining_balance);
    println!("  Total Paid: {:.2}", snapshot.total_paid);
    println!("  Interest Paid: {:.2}", snapshot.interest_paid);
    println!();

    let payoff = snapshot.payoff;
    if payoff.can_be_paid_off {
        println!(
            "Paid off after {} years {} months ({} years rounded up)",
            payoff.years, payoff.months, payoff.years_rounded_up
        );
    } else {
        println!("Payment does not cover the interest; the loan is never paid off");
    }

    Ok(())
}
