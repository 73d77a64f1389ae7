//! Plan file -> scenario runner -> monthly results

use approx::assert_relative_eq;
use liquidity_plan::amortization::{
    compute_monthly_payment, compute_remaining_balance, monthly_effective_rate,
};
use liquidity_plan::credit::SegmentTag;
use liquidity_plan::liquidity::monthly_credit_obligation;
use liquidity_plan::loader::load_plan_from_reader;
use liquidity_plan::{MonthKey, ScenarioRunner};

const PLAN: &str = r#"{
    "creditScenarios": {
        "house": {
            "bankLoan": {
                "principal": 300000,
                "effectiveAnnualRate": 3.7,
                "amortizationRate": 2,
                "fixedRateYears": 10
            },
            "loans": [
                {
                    "name": "development loan",
                    "principal": 100000,
                    "effectiveAnnualRate": 2.5,
                    "amortization": { "termYears": 20 },
                    "gracePeriod": { "kind": "interestOnly", "years": 2 },
                    "commitmentYears": 10
                },
                {
                    "name": "family loan",
                    "principal": 24000,
                    "effectiveAnnualRate": 0,
                    "amortization": { "ratePercent": 25 },
                    "gracePeriod": { "kind": "paymentFree", "years": 1 }
                }
            ]
        }
    },
    "liquidityScenarios": {
        "household": {
            "startCapital": 40000,
            "startMonth": "2026-01",
            "horizonMonths": 36,
            "linkedCreditScenarioId": "house",
            "items": [
                {
                    "id": "salary",
                    "name": "Salary",
                    "type": "income",
                    "defaultAmount": 6500,
                    "frequency": "monthly",
                    "startMonth": "2026-01",
                    "overrides": { "2026-12": { "amount": 13000 } }
                },
                {
                    "id": "bonus",
                    "type": "income",
                    "defaultAmount": 4000,
                    "frequency": "yearly",
                    "startMonth": "2026-01",
                    "overrides": { "2027-01": { "disabled": true } }
                },
                {
                    "id": "insurance",
                    "type": "expense",
                    "defaultAmount": 450,
                    "frequency": "quarterly",
                    "startMonth": "2026-02",
                    "endMonth": "2027-12"
                },
                {
                    "id": "living",
                    "type": "expense",
                    "defaultAmount": 2800,
                    "frequency": "monthly",
                    "startMonth": "2026-01"
                }
            ]
        },
        "savings_only": {
            "startCapital": 12345.67,
            "startMonth": "2030-06",
            "horizonMonths": 0
        }
    }
}"#;

fn runner() -> ScenarioRunner {
    ScenarioRunner::new(load_plan_from_reader(PLAN.as_bytes()).unwrap())
}

fn key(s: &str) -> MonthKey {
    s.parse().unwrap()
}

#[test]
fn test_documented_payment_and_balance_example() {
    let payment = compute_monthly_payment(300_000.0, 3.7, 2.0, 0.0);
    assert_relative_eq!(payment, 1425.0, epsilon = 1e-9);

    let r = monthly_effective_rate(3.7);
    let growth = (1.0 + r).powi(120);
    let expected = 300_000.0 * growth - payment * (growth - 1.0) / r;
    let balance = compute_remaining_balance(300_000.0, payment, 3.7, 10.0, 0.0, 0.0);
    assert_relative_eq!(balance, expected, max_relative = 1e-12);
}

#[test]
fn test_rows_are_consistent() {
    let result = runner().run("household").unwrap();
    assert_eq!(result.rows.len(), 36);
    assert_eq!(result.rows[0].month, key("2026-01"));
    assert_eq!(result.rows[35].month, key("2028-12"));

    let mut capital = 40_000.0;
    for row in &result.rows {
        assert_relative_eq!(row.net, row.income - row.expense - row.credit_rate, epsilon = 1e-9);
        capital += row.net;
        assert_relative_eq!(row.capital_end, capital, epsilon = 1e-6);
    }
}

#[test]
fn test_items_follow_schedule_and_overrides() {
    let result = runner().run("household").unwrap();
    let income_in = |m: &str| result.rows.iter().find(|r| r.month == key(m)).unwrap().income;
    let expense_in = |m: &str| result.rows.iter().find(|r| r.month == key(m)).unwrap().expense;

    assert_eq!(income_in("2026-01"), 10_500.0);
    assert_eq!(income_in("2026-02"), 6500.0);
    assert_eq!(income_in("2026-12"), 13_000.0);
    assert_eq!(income_in("2027-01"), 6500.0);
    assert_eq!(income_in("2028-01"), 10_500.0);

    assert_eq!(expense_in("2026-01"), 2800.0);
    assert_eq!(expense_in("2026-02"), 3250.0);
    assert_eq!(expense_in("2026-05"), 3250.0);
    assert_eq!(expense_in("2027-11"), 3250.0);
    assert_eq!(expense_in("2028-02"), 2800.0);
}

#[test]
fn test_credit_rate_follows_consolidated_obligation() {
    let runner = runner();
    let obligation = runner.credit_obligation("house").unwrap();
    let result = runner.run("household").unwrap();

    for (index, row) in result.rows.iter().enumerate() {
        assert_eq!(row.credit_rate, monthly_credit_obligation(index as u32, &obligation));
    }

    // Intervals partition the covered range without gaps
    let intervals = obligation.intervals();
    for pair in intervals.windows(2) {
        assert_eq!(pair[0].end_year, pair[1].start_year);
    }
    assert_eq!(obligation.span().map(|(start, _)| start), Some(0.0));
    assert_eq!(obligation.span().map(|(_, end)| end), Some(10.0));
}

#[test]
fn test_scenario_segments_by_purpose() {
    let segments = runner()
        .credit_scenario("house")
        .unwrap()
        .rate_segments()
        .unwrap();
    let tags: Vec<SegmentTag> = segments.iter().map(|s| s.tag).collect();

    assert_eq!(
        tags,
        vec![
            SegmentTag::ExternalBank,
            SegmentTag::InterestOnly,
            SegmentTag::Amortizing,
            SegmentTag::PaymentFree,
            SegmentTag::Amortizing,
        ]
    );

    // Development loan capped at its ten-year commitment
    assert_eq!(segments[2].end_year, 10.0);
    assert_relative_eq!(segments[1].monthly_rate, 100_000.0 * 0.025 / 12.0, epsilon = 1e-9);

    // Family loan: one year payment-free, then 500/month for four years
    assert_relative_eq!(segments[4].monthly_rate, 500.0, epsilon = 1e-9);
    assert_relative_eq!(segments[4].end_year, 5.0, epsilon = 1e-12);
}

#[test]
fn test_unlinked_plan_keeps_start_capital() {
    let result = runner().run("savings_only").unwrap();
    assert_eq!(result.rows.len(), 1);
    assert_eq!(result.rows[0].month, key("2030-06"));
    assert_eq!(result.rows[0].capital_end, 12_345.67);
}

#[test]
fn test_results_export_as_json() {
    let result = runner().run("household").unwrap();
    let json = serde_json::to_value(&result).unwrap();

    assert_eq!(json["scenarioId"], "household");
    assert_eq!(json["rows"][0]["month"], "2026-01");
    assert!(json["rows"][0]["capitalEnd"].is_number());
}
