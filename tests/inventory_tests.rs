//! Inventory command behavior: add-product, add-stock, duplicates.

use rust_decimal_macros::dec;
use shardtill::domain::{ProductFilter, UNCATEGORIZED};
use shardtill::error::{DuplicateError, Error, NotFoundError, ValidationError};
use shardtill::testkit::domain::new_product;
use shardtill::testkit::fixture::Fixture;

#[test]
fn add_product_succeeds_then_duplicate_fails() {
    let fx = Fixture::new();
    let cmd = new_product("Milk", dec!(50), "Dairy Products", "Pran", 20);

    fx.inventory.add_product(cmd.clone()).unwrap();
    let err = fx.inventory.add_product(cmd).unwrap_err();
    assert!(matches!(
        err,
        Error::Duplicate(DuplicateError::Product { .. })
    ));
}

#[test]
fn duplicate_is_case_insensitive_and_leaves_one_stock_record() {
    let fx = Fixture::new();
    fx.inventory
        .add_product(new_product("Milk", dec!(50), "Dairy Products", "Pran", 20))
        .unwrap();
    fx.inventory
        .add_product(new_product("MILK", dec!(60), "Dairy Products", "pran", 99))
        .unwrap_err();

    let fragments = fx
        .query
        .query_products(&ProductFilter::by_category("Dairy Products"))
        .unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].quantity_in_stock, 20);
    assert_eq!(fragments[0].price, dec!(50));
}

#[test]
fn same_name_different_supplier_is_not_a_duplicate() {
    let fx = Fixture::new();
    fx.inventory
        .add_product(new_product("Milk", dec!(50), "Dairy Products", "Pran", 20))
        .unwrap();
    fx.inventory
        .add_product(new_product("Milk", dec!(55), "Dairy Products", "Aarong", 10))
        .unwrap();

    let fragments = fx
        .query
        .query_products(&ProductFilter::by_category("Dairy Products"))
        .unwrap();
    assert_eq!(fragments.len(), 2);
}

#[test]
fn add_stock_increments_and_returns_updated_document() {
    let fx = Fixture::new();
    fx.inventory
        .add_product(new_product("Milk", dec!(50), "Dairy Products", "Pran", 20))
        .unwrap();

    let stock = fx
        .inventory
        .add_stock("milk", "PRAN", "Dairy Products", 5)
        .unwrap();
    assert_eq!(stock.quantity, 25);
}

#[test]
fn add_stock_to_unknown_supplier_is_not_found() {
    let fx = Fixture::new();
    let err = fx
        .inventory
        .add_stock("Milk", "Nobody", "Dairy Products", 5)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound(NotFoundError::Supplier { .. })
    ));
}

#[test]
fn add_stock_to_unknown_product_is_not_found() {
    let fx = Fixture::new();
    fx.inventory
        .add_product(new_product("Milk", dec!(50), "Dairy Products", "Pran", 20))
        .unwrap();

    let err = fx
        .inventory
        .add_stock("Butter", "Pran", "Dairy Products", 5)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::NotFound(NotFoundError::ProductByName { .. })
    ));
}

#[test]
fn zero_stock_amount_is_rejected_before_lookup() {
    let fx = Fixture::new();
    let err = fx
        .inventory
        .add_stock("Milk", "Pran", "Dairy Products", 0)
        .unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::ZeroStockAmount)
    ));
}

#[test]
fn blank_category_defaults_to_uncategorized() {
    let fx = Fixture::new();
    fx.inventory
        .add_product(new_product("Mystery Box", dec!(9), "   ", "Acme", 3))
        .unwrap();

    let fragments = fx
        .query
        .query_products(&ProductFilter::by_category(UNCATEGORIZED))
        .unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].category, UNCATEGORIZED);
    assert_eq!(
        fragments[0].shard_id,
        fx.router.shard_for_category(UNCATEGORIZED)
    );
}

#[test]
fn blank_name_and_negative_price_are_rejected() {
    let fx = Fixture::new();
    assert!(matches!(
        fx.inventory
            .add_product(new_product("  ", dec!(10), "Other", "Acme", 1))
            .unwrap_err(),
        Error::Validation(ValidationError::BlankProductName)
    ));
    assert!(matches!(
        fx.inventory
            .add_product(new_product("Gadget", dec!(-1), "Other", "Acme", 1))
            .unwrap_err(),
        Error::Validation(ValidationError::NegativePrice { .. })
    ));
}

#[test]
fn offline_shard_aborts_add_product() {
    let fx = Fixture::new();
    let shard = fx.router.shard_for_category("Electronics");
    fx.cluster.set_offline(shard, true);

    let err = fx
        .inventory
        .add_product(new_product("Radio", dec!(120), "Electronics", "Walton", 4))
        .unwrap_err();
    assert!(matches!(err, Error::Connection { .. }));
}
