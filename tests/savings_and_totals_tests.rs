mod common;

use common::{date, month, setup_test_book};
use pocketbank::{ledger::EntryId, LedgerError};

#[test]
fn totals_follow_income_and_expenses() {
    let (mut book, _dir) = setup_test_book();
    let key = book.current_month();
    book.add_income(key, "Salary", 25000.0).unwrap();
    book.add_income(key, "Side job", 2500.0).unwrap();
    book.add_recurring_expense("Housing", "Rent", 8000.0).unwrap();
    book.add_expense(key, "Food", "Groceries", 3000.0).unwrap();

    let totals = book.totals(key);
    assert_eq!(totals.total_income, 27500.0);
    assert_eq!(totals.total_expenses, 11000.0);
    assert_eq!(totals.disposable, 16500.0);
}

#[test]
fn empty_month_has_zero_totals() {
    let (mut book, _dir) = setup_test_book();
    let totals = book.totals(month(2030, 12));
    assert_eq!(totals.total_income, 0.0);
    assert_eq!(totals.total_expenses, 0.0);
    assert_eq!(totals.disposable, 0.0);
}

#[test]
fn overspending_gives_negative_disposable() {
    let (mut book, _dir) = setup_test_book();
    let key = book.current_month();
    book.add_income(key, "Salary", 1000.0).unwrap();
    book.add_expense(key, "Car", "Repair", 1500.0).unwrap();
    assert_eq!(book.totals(key).disposable, -500.0);
}

#[test]
fn income_can_be_edited_and_deleted() {
    let (mut book, _dir) = setup_test_book();
    let key = book.current_month();
    let id = book.add_income(key, "Salary", 20000.0).unwrap();
    assert!(book.edit_income(key, &id, "Salary", 21000.0).unwrap());
    assert_eq!(book.totals(key).total_income, 21000.0);
    assert!(book.delete_income(key, &id).unwrap());
    assert_eq!(book.totals(key).total_income, 0.0);
    assert!(!book.delete_income(key, &id).unwrap());
}

#[test]
fn negative_amounts_are_rejected_without_changes() {
    let (mut book, _dir) = setup_test_book();
    let key = book.current_month();
    let err = book.add_income(key, "Refund", -5.0).unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
    assert!(book.ledger().month(key).is_none());
}

#[test]
fn savings_goal_projects_monthly_contribution() {
    let (mut book, _dir) = setup_test_book();
    let id = book
        .add_savings_goal("Holiday", 12000.0, 0.0, date(2024, 1, 1), date(2024, 12, 1))
        .unwrap();

    let goal = book.ledger().savings_goal(&id).unwrap();
    assert_eq!(goal.monthly_contribution(), 1000.0);

    let progress = book.savings_progress();
    assert_eq!(progress.len(), 1);
    assert_eq!(progress[0].1.percent, 0.0);
    assert_eq!(progress[0].1.months_remaining, Some(12));
}

#[test]
fn editing_a_goal_recomputes_its_contribution() {
    let (mut book, _dir) = setup_test_book();
    let id = book
        .add_savings_goal("Car", 6000.0, 0.0, date(2024, 1, 1), date(2024, 6, 30))
        .unwrap();
    assert_eq!(
        book.ledger().savings_goal(&id).unwrap().monthly_contribution(),
        1000.0
    );

    assert!(book
        .edit_savings_goal(&id, "Car", 6000.0, 6000.0, date(2024, 1, 1), date(2024, 6, 30))
        .unwrap());
    let goal = book.ledger().savings_goal(&id).unwrap();
    assert_eq!(goal.monthly_contribution(), 0.0);
    assert!(goal.progress().is_complete());
    assert_eq!(goal.progress().percent, 100.0);
}

#[test]
fn goals_need_a_positive_target() {
    let (mut book, _dir) = setup_test_book();
    let err = book
        .add_savings_goal("Nothing", 0.0, 0.0, date(2024, 1, 1), date(2024, 2, 1))
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount(_)));
    assert!(book.ledger().savings.is_empty());
}

#[test]
fn deleting_goals() {
    let (mut book, _dir) = setup_test_book();
    let id = book
        .add_savings_goal("Bike", 3000.0, 500.0, date(2024, 3, 1), date(2024, 8, 1))
        .unwrap();
    assert!(book.delete_savings_goal(&id).unwrap());
    assert!(!book.delete_savings_goal(&id).unwrap());
    assert!(!book
        .edit_savings_goal(
            &EntryId::from("gone"),
            "Bike",
            1.0,
            0.0,
            date(2024, 3, 1),
            date(2024, 8, 1)
        )
        .unwrap());
}
