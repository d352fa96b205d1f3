use super::{ClientStatement, normalize, reconcile};

use anyhow::Result;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::{InitialBalance, RawMovement};

fn create_movement(document_type: &str, document_number: u64, date: &str, total: &str) -> Result<RawMovement> {
    Ok(RawMovement {
        code: document_number,
        counterparty_code: 1,
        document_type_code: 0,
        document_type: document_type.to_string(),
        document_number,
        date: date.to_string(),
        net_amount: Decimal::from_str(total)?,
        due_date: None,
        document_date: None,
        total_amount: Decimal::from_str(total)?,
        comment: None,
        status: 0,
        payment_method: None,
    })
}

fn decimal(value: &str) -> Result<Decimal> {
    Ok(Decimal::from_str(value)?)
}

#[test]
fn test_invoices_are_negative_and_everything_else_positive() -> Result<()> {
    let test_cases = vec![
        ("FA", "1000", "-1000"),
        ("FB", "-250.5", "-250.5"),
        ("RB A", "1000", "1000"),
        ("RB B", "-80", "80"),
        ("NC C", "30", "30"),
        ("ND E", "45.10", "45.10"),
        ("XZ", "-12", "12"),
    ];

    for (code, total, expected) in test_cases {
        let movement = normalize(&create_movement(code, 1, "2024-01-10", total)?);

        assert_eq!(movement.amount, decimal(expected)?, "code {code}");
        assert_eq!(movement.amount.abs(), decimal(total)?.abs());
    }

    Ok(())
}

#[test]
fn test_normalize_formats_date_and_keeps_original() -> Result<()> {
    let movement = normalize(&create_movement("FA", 1, "2024-01-10T00:00:00", "10")?);

    assert_eq!(movement.display_date, "10/01/2024");
    assert_eq!(movement.original_date, "2024-01-10T00:00:00");
    assert_eq!(movement.category.to_string(), "Factura A");
    assert!(movement.running_balance.is_zero());

    Ok(())
}

#[test]
fn test_unmapped_code_is_kept_as_label_and_treated_as_payment() -> Result<()> {
    let movement = normalize(&create_movement("XZ", 1, "2024-01-10", "300")?);

    assert_eq!(movement.category.to_string(), "XZ");
    assert_eq!(movement.amount, decimal("300")?);

    Ok(())
}

#[test]
fn test_payment_method_falls_back_and_displays_per_category() -> Result<()> {
    let mut cash_receipt = create_movement("RB A", 1, "2024-01-10", "10")?;
    cash_receipt.payment_method = Some("Efectivo".to_string());
    let blank_receipt = create_movement("RB A", 2, "2024-01-10", "10")?;
    let mut invoice = create_movement("FA", 3, "2024-01-10", "10")?;
    invoice.payment_method = Some("Efectivo".to_string());

    let cash_receipt = normalize(&cash_receipt);
    let blank_receipt = normalize(&blank_receipt);
    let invoice = normalize(&invoice);

    assert_eq!(cash_receipt.payment_method_label(), "Efectivo");
    assert_eq!(blank_receipt.payment_method, "No especificado");
    assert_eq!(blank_receipt.payment_method_label(), "Transferencia");
    assert_eq!(invoice.payment_method_label(), "");

    Ok(())
}

#[test]
fn test_invoice_then_receipt_from_zero() -> Result<()> {
    let movements = vec![
        normalize(&create_movement("RB A", 2, "2024-01-15", "1000")?),
        normalize(&create_movement("FA", 1, "2024-01-10", "1000")?),
    ];

    let reconciled = reconcile(movements, Decimal::ZERO);

    assert_eq!(reconciled[0].category.to_string(), "Recibo A");
    assert!(reconciled[0].running_balance.is_zero());
    assert_eq!(reconciled[1].category.to_string(), "Factura A");
    assert_eq!(reconciled[1].running_balance, decimal("-1000")?);

    Ok(())
}

#[test]
fn test_starting_balance_seeds_the_running_balance() -> Result<()> {
    let raw = vec![
        create_movement("FA", 1, "2024-01-10", "1000")?,
        create_movement("RB A", 2, "2024-01-15", "1000")?,
    ];

    let statement = ClientStatement::build(7, &raw, Some(InitialBalance::new(decimal("5000")?, "2024-01-01")));

    assert_eq!(statement.movements[1].running_balance, decimal("4000")?);
    assert_eq!(statement.movements[0].running_balance, decimal("5000")?);
    assert_eq!(statement.current_balance(), decimal("5000")?);

    Ok(())
}

#[test]
fn test_running_balance_equals_prefix_sums() -> Result<()> {
    let starting = decimal("-250.25")?;
    let raw = vec![
        create_movement("FA", 4, "2024-03-01", "1200.50")?,
        create_movement("NC A", 5, "2024-01-20", "99.99")?,
        create_movement("RB B", 6, "2024-02-14", "700")?,
        create_movement("ND B", 7, "2024-04-02", "12.01")?,
        create_movement("FB", 8, "2024-01-02", "310")?,
    ];
    let movements: Vec<_> = raw.iter().map(normalize).collect();
    let total: Decimal = movements.iter().map(|movement| movement.amount).sum();

    let reconciled = reconcile(movements, starting);

    assert_eq!(reconciled.len(), raw.len());

    let chronological: Vec<_> = reconciled.iter().rev().collect();
    let mut expected = starting;

    for movement in &chronological {
        expected += movement.amount;
        assert_eq!(movement.running_balance, expected);
    }

    assert_eq!(chronological[0].running_balance, starting + chronological[0].amount);
    assert_eq!(reconciled[0].running_balance, starting + total);
    assert_eq!(reconciled[0].original_date, "2024-04-02");

    Ok(())
}

#[test]
fn test_same_day_movements_are_ordered_by_document_number() -> Result<()> {
    let movements = vec![
        normalize(&create_movement("RB A", 30, "2024-01-10T18:00:00", "100")?),
        normalize(&create_movement("FA", 10, "2024-01-10T09:00:00", "100")?),
        normalize(&create_movement("FA", 20, "2024-01-10", "100")?),
    ];

    let reconciled = reconcile(movements, Decimal::ZERO);
    let numbers: Vec<_> = reconciled.iter().map(|movement| movement.document_number).collect();

    assert_eq!(numbers, vec![30, 20, 10]);
    assert_eq!(reconciled[2].running_balance, decimal("-100")?);
    assert_eq!(reconciled[1].running_balance, decimal("-200")?);
    assert_eq!(reconciled[0].running_balance, decimal("-100")?);

    Ok(())
}

#[test]
fn test_full_ties_keep_input_order() -> Result<()> {
    let movements = vec![
        normalize(&create_movement("FA", 1, "2024-01-10", "100")?),
        normalize(&create_movement("RB A", 1, "2024-01-10", "40")?),
    ];

    let reconciled = reconcile(movements, Decimal::ZERO);

    assert_eq!(reconciled[1].category.to_string(), "Factura A");
    assert_eq!(reconciled[0].running_balance, decimal("-60")?);

    Ok(())
}

#[test]
fn test_undated_movements_are_treated_as_oldest() -> Result<()> {
    let movements = vec![
        normalize(&create_movement("RB A", 2, "2024-01-10", "50")?),
        normalize(&create_movement("FA", 1, "garbage", "20")?),
    ];

    let reconciled = reconcile(movements, Decimal::ZERO);

    assert_eq!(reconciled[1].display_date, "garbage");
    assert_eq!(reconciled[1].running_balance, decimal("-20")?);
    assert_eq!(reconciled[0].running_balance, decimal("30")?);

    Ok(())
}

#[test]
fn test_reconcile_is_deterministic() -> Result<()> {
    let raw = vec![
        create_movement("FA", 3, "2024-02-01", "10")?,
        create_movement("RB A", 1, "2024-01-01", "5")?,
        create_movement("NC A", 2, "2024-01-15", "1")?,
    ];

    let first = reconcile(raw.iter().map(normalize).collect(), decimal("2")?);
    let second = reconcile(raw.iter().rev().map(normalize).collect(), decimal("2")?);

    assert_eq!(first, second);

    Ok(())
}

#[test]
fn test_empty_statement_falls_back_to_initial_balance() -> Result<()> {
    let with_balance = ClientStatement::build(1, &[], Some(InitialBalance::new(decimal("-75")?, "2024-01-01")));
    let without_balance = ClientStatement::build(1, &[], None);

    assert!(with_balance.is_empty());
    assert_eq!(with_balance.current_balance(), decimal("-75")?);
    assert!(without_balance.current_balance().is_zero());

    Ok(())
}
