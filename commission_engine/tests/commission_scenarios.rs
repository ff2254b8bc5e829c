use assert_matches::assert_matches;
use commission_engine::{
    BonusFlags, CalculationRequest, CommissionEngine, CommissionError, CommissionTables,
    ExecutiveTier,
};

fn engine() -> CommissionEngine {
    CommissionEngine::canonical().unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 0.011,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn test_pleno_mid_contract_below_target_conversion() {
    let result = engine()
        .calculate(&CalculationRequest::new(5000.0, 50.0, ExecutiveTier::Pleno))
        .unwrap();

    assert_eq!(result.contract_value, 5000.0);
    assert_eq!(result.commission_base, 2500.0);
    assert_eq!(result.category, "B – Médios");
    // 5000 sits at the top of 4001–5000, not in 5001–6000.
    assert_eq!(result.fixed_bonus, 700.0);
    assert_eq!(result.bonus_bradesco, 0.0);
    assert_eq!(result.bonus_meta_geral, 0.0);
    assert_eq!(result.gross_commission, 3200.0);
    assert_eq!(result.conversion_multiplier, 0.8333);
    assert_eq!(result.final_commission, 2666.67);
    assert_eq!(result.final_percentage, 53.33);
    assert_eq!(result.target_conversion_rate, 60.0);
    assert_eq!(result.tier, ExecutiveTier::Pleno);
}

#[test]
fn test_senior_premium_contract_with_every_bonus() {
    let request = CalculationRequest::new(13_500.0, 70.0, ExecutiveTier::Senior)
        .with_bonuses(BonusFlags::all());
    let result = engine().calculate(&request).unwrap();

    assert_close(result.commission_base, 9450.0);
    assert_eq!(result.category, "D – Premium");
    assert_close(result.fixed_bonus, 3000.0);
    assert_close(result.bonus_bradesco, 2362.50);
    assert_close(result.bonus_meta, 472.50);
    assert_close(result.bonus_performance, 1417.50);
    assert_close(result.bonus_time, 945.00);
    assert_close(result.bonus_meta_geral, 472.50);
    assert_close(result.gross_commission, 18_120.0);
    assert_eq!(result.conversion_multiplier, 1.0);
    assert_close(result.final_commission, 18_120.0);
    assert_close(result.final_percentage, 134.22);
}

#[test]
fn test_junior_asking_for_meta_geral_gets_zero_without_error() {
    let request = CalculationRequest::new(13_500.0, 50.0, ExecutiveTier::Junior)
        .with_bonuses(BonusFlags::all());
    let result = engine().calculate(&request).unwrap();
    assert_eq!(result.bonus_meta_geral, 0.0);
    assert!(result.bonus_bradesco > 0.0);
}

#[test]
fn test_bonusless_final_commission_matches_closed_form() {
    let engine = engine();
    let tables = CommissionTables::canonical().unwrap();
    for tier in ExecutiveTier::ALL {
        let config = tables.tiers.config_for(tier).unwrap();
        for value in [500.0, 777.77, 2900.5, 4999.0, 12_345.67, 999_999.0] {
            for rate in [0.0, 10.0, 35.5, 60.0, 100.0] {
                let result = engine
                    .calculate(&CalculationRequest::new(value, rate, tier))
                    .unwrap();
                let fixed = tables.brackets.bracket_for(value).unwrap().fixed_bonus_for(tier);
                let multiplier = (rate / config.target_conversion_rate).min(1.0);
                let expected = (value * config.base_percentage + fixed) * multiplier;
                assert_close(result.final_commission, expected);
            }
        }
    }
}

#[test]
fn test_conversion_rate_is_monotonic_then_saturates() {
    let engine = engine();
    let bonuses = BonusFlags::all();
    for tier in ExecutiveTier::ALL {
        let mut previous = 0.0;
        let mut at_target = None;
        for step in 0..=200 {
            let rate = step as f64 * 0.5;
            let result = engine
                .calculate(&CalculationRequest::new(7_250.0, rate, tier).with_bonuses(bonuses))
                .unwrap();
            assert!(
                result.final_commission >= previous,
                "{tier}: commission fell at conversion {rate}"
            );
            previous = result.final_commission;
            if rate >= result.target_conversion_rate {
                let saturated = *at_target.get_or_insert(result.final_commission);
                assert_eq!(result.final_commission, saturated);
                assert_eq!(result.conversion_multiplier, 1.0);
            }
        }
        assert!(at_target.is_some());
    }
}

#[test]
fn test_identical_requests_produce_identical_bytes() {
    let engine = engine();
    let request = CalculationRequest::new(6_543.21, 42.0, ExecutiveTier::Pleno)
        .with_bonuses(BonusFlags::all());
    let first = serde_json::to_vec(&engine.calculate(&request).unwrap()).unwrap();
    let second = serde_json::to_vec(&engine.calculate(&request).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_structural_errors_are_distinguished() {
    let engine = engine();
    assert_matches!(
        engine.calculate(&CalculationRequest::new(0.0, 50.0, ExecutiveTier::Pleno)),
        Err(CommissionError::OutOfRange(v)) if v == 0.0
    );
    assert_matches!(
        engine.calculate(&CalculationRequest::new(499.99, 50.0, ExecutiveTier::Pleno)),
        Err(CommissionError::OutOfRange(_))
    );
    assert_matches!(
        engine.calculate(
            &CalculationRequest::new(5000.0, 50.0, ExecutiveTier::Pleno)
                .with_tier_override("COORDENADOR")
        ),
        Err(CommissionError::InvalidTier(_))
    );
}

#[test]
fn test_fractional_value_between_bracket_edges_uses_lower_bracket() {
    let result = engine()
        .calculate(&CalculationRequest::new(2900.5, 60.0, ExecutiveTier::Pleno))
        .unwrap();
    assert_eq!(result.category, "A – Básicos");
    assert_eq!(result.fixed_bonus, 400.0);
}

#[test]
fn test_concurrent_calculations_agree() {
    let engine = std::sync::Arc::new(engine());
    let request = CalculationRequest::new(9_999.0, 55.0, ExecutiveTier::Senior)
        .with_bonuses(BonusFlags::all());
    let expected = engine.calculate(&request).unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            let request = request.clone();
            std::thread::spawn(move || engine.calculate(&request).unwrap())
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
}

#[test]
fn test_unbounded_conversion_rates_saturate_like_full_conversion() {
    let engine = engine();
    let at_full = engine
        .calculate(&CalculationRequest::new(4_200.0, 100.0, ExecutiveTier::Junior))
        .unwrap();
    for rate in [250.0, 1e12, f64::INFINITY] {
        let result = engine
            .calculate(&CalculationRequest::new(4_200.0, rate, ExecutiveTier::Junior))
            .unwrap();
        assert_eq!(result.final_commission, at_full.final_commission);
        assert_eq!(result.conversion_multiplier, 1.0);
    }
}
