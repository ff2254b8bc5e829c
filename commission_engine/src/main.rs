//! Entry point for the Commission Engine binary.
//!
//! Reads a JSON calculation request, or a JSON array of requests, from
//! the file named by the first argument (stdin when absent) and prints
//! the itemised results as JSON.  Alternate rate tables may be supplied
//! through the `COMMISSION_TABLES_PATH` environment variable; when it is
//! unset the compiled-in tables are used.  Log verbosity follows
//! `RUST_LOG`.

use anyhow::{Context, Result};
use commission_engine::{CalculationRequest, CommissionEngine, CommissionTables};
use serde_json::{json, Value};
use std::io::Read;
use std::path::PathBuf;

fn load_engine() -> Result<CommissionEngine> {
    let tables = match std::env::var_os("COMMISSION_TABLES_PATH") {
        Some(path) => {
            let path = PathBuf::from(path);
            CommissionTables::from_json_file(&path)
                .with_context(|| format!("loading commission tables from {:?}", path))?
        }
        None => CommissionTables::canonical().context("building canonical commission tables")?,
    };
    Ok(CommissionEngine::new(tables))
}

fn read_input() -> Result<String> {
    match std::env::args_os().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading requests from {:?}", path)),
        None => {
            let mut data = String::new();
            std::io::stdin()
                .read_to_string(&mut data)
                .context("reading requests from stdin")?;
            Ok(data)
        }
    }
}

/// Compute a single request, or every element of an array.  Array
/// elements are parsed one at a time, so a malformed element (an
/// unknown tier code, a missing field) yields an `{"error": ..}` entry
/// in its slot instead of failing the others.
fn evaluate(engine: &CommissionEngine, input: Value) -> Result<Value> {
    let elements = match input {
        Value::Array(elements) => elements,
        single => {
            let request: CalculationRequest =
                serde_json::from_value(single).context("parsing calculation request")?;
            return Ok(serde_json::to_value(engine.calculate(&request)?)?);
        }
    };

    let parsed: Vec<Result<CalculationRequest, String>> = elements
        .into_iter()
        .map(|element| serde_json::from_value(element).map_err(|err| err.to_string()))
        .collect();
    let requests: Vec<CalculationRequest> =
        parsed.iter().filter_map(|p| p.as_ref().ok().cloned()).collect();
    let mut outcomes = engine.calculate_batch(&requests).into_iter();

    let mut output = Vec::with_capacity(parsed.len());
    for entry in parsed {
        let item = match entry {
            Err(message) => json!({"error": message}),
            Ok(_) => match outcomes.next() {
                Some(Ok(result)) => serde_json::to_value(result)?,
                Some(Err(err)) => json!({"error": err.to_string()}),
                None => anyhow::bail!("batch returned fewer results than requests"),
            },
        };
        output.push(item);
    }
    Ok(Value::Array(output))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let engine = load_engine()?;
    let input: Value = serde_json::from_str(&read_input()?).context("parsing calculation requests")?;
    let output = evaluate(&engine, input)?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use commission_engine::CommissionError;

    #[test]
    fn test_bad_tier_in_batch_only_fails_its_own_slot() {
        let engine = CommissionEngine::canonical().unwrap();
        let input = json!([
            {"contract_value": 5000.0, "conversion_rate": 50.0, "tier": "PLENO"},
            {"contract_value": 5000.0, "conversion_rate": 50.0, "tier": "DIRETOR"},
            {"contract_value": 100.0, "conversion_rate": 50.0, "tier": "senior"},
            {"contract_value": 13500.0, "conversion_rate": 70.0, "tier": "SENIOR"}
        ]);
        let output = evaluate(&engine, input).unwrap();
        let items = output.as_array().unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(items[0]["final_commission"], json!(2666.67));
        assert_eq!(items[1], json!({"error": "invalid executive tier: \"DIRETOR\""}));
        assert_eq!(
            items[2]["error"],
            json!(CommissionError::OutOfRange(100.0).to_string())
        );
        assert_eq!(items[3]["category"], json!("D – Premium"));
    }

    #[test]
    fn test_single_request_with_bad_tier_is_an_error() {
        let engine = CommissionEngine::canonical().unwrap();
        let input = json!({"contract_value": 5000.0, "conversion_rate": 50.0, "tier": "DIRETOR"});
        let err = evaluate(&engine, input).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid executive tier"));
    }
}
