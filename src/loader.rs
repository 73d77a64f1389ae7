//! JSON plan-file loading
//!
//! A plan file bundles named credit scenarios and named liquidity scenarios
//! exactly as the storage layer exports them.

use crate::credit::CreditScenarioValues;
use crate::error::PlanResult;
use crate::liquidity::LiquidityScenarioValues;
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

/// Default plan file location
pub const DEFAULT_PLAN_PATH: &str = "plan.json";

/// All scenarios of one plan, keyed by scenario id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanFile {
    #[serde(default)]
    pub credit_scenarios: BTreeMap<String, CreditScenarioValues>,

    #[serde(default)]
    pub liquidity_scenarios: BTreeMap<String, LiquidityScenarioValues>,
}

/// Load a plan from a JSON file
pub fn load_plan<P: AsRef<Path>>(path: P) -> PlanResult<PlanFile> {
    let path = path.as_ref();
    let plan = load_plan_from_reader(BufReader::new(File::open(path)?))?;
    info!(
        "loaded {} credit and {} liquidity scenarios from {}",
        plan.credit_scenarios.len(),
        plan.liquidity_scenarios.len(),
        path.display()
    );
    Ok(plan)
}

/// Load a plan from any reader (e.g., string buffer, network stream)
pub fn load_plan_from_reader<R: Read>(reader: R) -> PlanResult<PlanFile> {
    Ok(serde_json::from_reader(reader)?)
}

/// Write a plan as pretty-printed JSON
pub fn save_plan<P: AsRef<Path>>(plan: &PlanFile, path: P) -> PlanResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, plan)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlanError;

    const PLAN: &str = r#"{
        "creditScenarios": {
            "base": {
                "bankLoan": {
                    "principal": 300000,
                    "effectiveAnnualRate": 3.7,
                    "amortizationRate": 2,
                    "fixedRateYears": 10
                }
            }
        },
        "liquidityScenarios": {
            "household": {
                "startCapital": 20000,
                "startMonth": "2026-01",
                "horizonMonths": 12,
                "linkedCreditScenarioId": "base"
            }
        }
    }"#;

    #[test]
    fn test_load_plan_from_reader() {
        let plan = load_plan_from_reader(PLAN.as_bytes()).unwrap();
        assert!(plan.credit_scenarios["base"].loans.is_empty());

        let household = &plan.liquidity_scenarios["household"];
        assert_eq!(household.horizon_months, 12);
        assert_eq!(household.linked_credit_id(), Some("base"));
        assert!(household.items.is_empty());
    }

    #[test]
    fn test_empty_document_is_empty_plan() {
        assert_eq!(load_plan_from_reader("{}".as_bytes()).unwrap(), PlanFile::default());
    }

    #[test]
    fn test_bad_month_key_rejected() {
        let json = r#"{ "liquidityScenarios": { "x": {
            "startCapital": 0, "startMonth": "2026-13", "horizonMonths": 1 } } }"#;
        assert!(matches!(
            load_plan_from_reader(json.as_bytes()),
            Err(PlanError::Json(_))
        ));
    }

    #[test]
    fn test_save_and_reload() {
        let plan = load_plan_from_reader(PLAN.as_bytes()).unwrap();
        let path = std::env::temp_dir().join(format!("liquidity_plan_{}.json", std::process::id()));

        save_plan(&plan, &path).unwrap();
        let reloaded = load_plan(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(reloaded, plan);
    }
}
