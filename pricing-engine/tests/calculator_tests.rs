use common::decimal::dec;
use common::model::quotation::{LineIssue, LineOutcome, LinePricing, QuotationDefaults, QuotationLine};
use pricing_engine::calculator::{client_rate, line_cost_sum, price_line};
use rust_decimal::Decimal;

fn create_test_line(cost_sum: Decimal, roe: Option<Decimal>, mu_percent: Option<Decimal>) -> QuotationLine {
    QuotationLine {
        vendor_id: "VND-001".to_string(),
        item_name: "Ocean freight 20ft".to_string(),
        cost_sum: Some(cost_sum),
        roe,
        mu_percent,
        ..QuotationLine::default()
    }
}

fn create_defaults(caf: Decimal, round_up: bool) -> QuotationDefaults {
    QuotationDefaults {
        usd_roe: Some(dec!(1.00)),
        general_mu: Some(dec!(25.00)),
        caf: Some(caf),
        round_up_rate_to_client: round_up,
    }
}

fn priced(outcome: LineOutcome) -> LinePricing {
    match outcome {
        LineOutcome::Priced(pricing) => pricing,
        LineOutcome::Invalid { issue } => panic!("expected a priced line, got {:?}", issue),
    }
}

#[test]
fn test_standard_line_pricing() {
    let line = create_test_line(dec!(1000), Some(dec!(1.00)), Some(dec!(25)));
    let pricing = priced(price_line(&line, &create_defaults(dec!(5), false)));

    assert_eq!(pricing.cost_usd, dec!(1000.00));
    assert_eq!(pricing.mu_amount, dec!(250.00));
    assert_eq!(pricing.qt_rate, dec!(1250.00));
    assert_eq!(pricing.rate_to_client, dec!(1312.50));
}

#[test]
fn test_round_up_rate_to_client() {
    let line = create_test_line(dec!(1000), Some(dec!(1.00)), Some(dec!(25)));
    let pricing = priced(price_line(&line, &create_defaults(dec!(5), true)));

    assert_eq!(pricing.qt_rate, dec!(1250));
    assert_eq!(pricing.rate_to_client, dec!(1313));
}

#[test]
fn test_zero_roe_marks_line_invalid() {
    let line = create_test_line(dec!(1000), Some(Decimal::ZERO), None);
    let outcome = price_line(&line, &create_defaults(dec!(5), false));

    assert_eq!(outcome, LineOutcome::Invalid { issue: LineIssue::ZeroExchangeRate });
    assert!(outcome.pricing().is_none());
}

#[test]
fn test_zero_quotation_roe_marks_line_invalid() {
    let line = create_test_line(dec!(1000), None, None);
    let mut defaults = create_defaults(dec!(5), false);
    defaults.usd_roe = Some(Decimal::ZERO);

    assert_eq!(price_line(&line, &defaults).issue(), Some(LineIssue::ZeroExchangeRate));
}

#[test]
fn test_line_values_fall_back_to_quotation_defaults() {
    let line = create_test_line(dec!(367), None, None);
    let defaults = QuotationDefaults {
        usd_roe: Some(dec!(3.67)),
        general_mu: Some(dec!(10)),
        caf: Some(Decimal::ZERO),
        round_up_rate_to_client: false,
    };
    let pricing = priced(price_line(&line, &defaults));

    assert_eq!(pricing.cost_usd, dec!(100));
    assert_eq!(pricing.mu_amount, dec!(10));
    assert_eq!(pricing.rate_to_client, dec!(110));
}

#[test]
fn test_missing_defaults_fall_back_to_constants() {
    let line = create_test_line(dec!(1000), None, None);
    let defaults = QuotationDefaults {
        usd_roe: None,
        general_mu: None,
        caf: None,
        round_up_rate_to_client: false,
    };
    let pricing = priced(price_line(&line, &defaults));

    assert_eq!(pricing.cost_usd, dec!(1000));
    assert_eq!(pricing.mu_amount, dec!(250));
    assert_eq!(pricing.rate_to_client, dec!(1312.5));
}

#[test]
fn test_pricing_is_deterministic() {
    let line = create_test_line(dec!(1234.56), Some(dec!(0.87)), Some(dec!(17.5)));
    let defaults = create_defaults(dec!(3), false);

    assert_eq!(price_line(&line, &defaults), price_line(&line, &defaults));
}

#[test]
fn test_zero_caf_keeps_quoted_rate() {
    for cost in [dec!(0), dec!(1), dec!(99.99), dec!(1000000)] {
        let line = create_test_line(cost, Some(dec!(1.1)), Some(dec!(12)));
        let pricing = priced(price_line(&line, &create_defaults(Decimal::ZERO, false)));
        assert_eq!(pricing.rate_to_client, pricing.qt_rate);
    }
}

#[test]
fn test_round_up_is_idempotent() {
    let once = client_rate(dec!(1312.50), dec!(5), true).unwrap();
    let twice = client_rate(once, Decimal::ZERO, true).unwrap();

    assert_eq!(once, dec!(1379));
    assert_eq!(twice, once);
    assert_eq!(client_rate(dec!(1313), Decimal::ZERO, true).unwrap(), dec!(1313));
}

#[test]
fn test_fixed_line_keeps_manual_rate() {
    let mut line = create_test_line(dec!(1000), Some(dec!(1)), Some(dec!(25)));
    line.fixed = true;
    line.fixed_rate_to_client = Some(dec!(1500));
    let pricing = priced(price_line(&line, &create_defaults(dec!(5), true)));

    assert_eq!(pricing.qt_rate, dec!(1250));
    assert_eq!(pricing.rate_to_client, dec!(1500));

    // Without a manual rate the computed one is used
    line.fixed_rate_to_client = None;
    let pricing = priced(price_line(&line, &create_defaults(dec!(5), false)));
    assert_eq!(pricing.rate_to_client, dec!(1312.50));
}

#[test]
fn test_cost_sum_from_quantity_and_buy_rate() {
    assert_eq!(line_cost_sum(dec!(3), dec!(125.50)).unwrap(), dec!(376.50));
    assert_eq!(line_cost_sum(Decimal::ZERO, dec!(125.50)).unwrap(), Decimal::ZERO);
}

#[test]
fn test_line_without_cost_sum_prices_from_quantity_and_buy_rate() {
    let line = QuotationLine {
        quantity: dec!(2),
        buy_rate: dec!(500),
        ..QuotationLine::default()
    };

    let pricing = priced(price_line(&line, &create_defaults(dec!(5), false)));
    assert_eq!(pricing.cost_sum, dec!(1000));
    assert_eq!(pricing.cost_usd, dec!(1000));
    assert_eq!(pricing.rate_to_client, dec!(1312.50));

    let overflowing = QuotationLine { quantity: Decimal::MAX, ..line };
    assert_eq!(
        price_line(&overflowing, &create_defaults(dec!(5), false)),
        LineOutcome::Invalid { issue: LineIssue::ArithmeticOverflow }
    );
}
