//! Scatter-gather query behavior: filtering, pruning, caching, coercion.

use rust_decimal_macros::dec;
use shardtill::domain::{ProductFilter, SUPPLIER_FALLBACK};
use shardtill::testkit::domain::{new_product, seed_legacy_product, seed_orphan_product};
use shardtill::testkit::fixture::Fixture;

#[test]
fn add_then_query_round_trips_one_fragment() {
    let fx = Fixture::new();
    let id = fx
        .inventory
        .add_product(new_product("Milk", dec!(50), "Dairy Products", "Pran", 20))
        .unwrap();

    let fragments = fx
        .query
        .query_products(&ProductFilter::by_category("Dairy Products"))
        .unwrap();
    assert_eq!(fragments.len(), 1);
    let fragment = &fragments[0];
    assert_eq!(fragment.product_id, id);
    assert_eq!(fragment.name, "Milk");
    assert_eq!(fragment.price, dec!(50));
    assert_eq!(fragment.quantity_in_stock, 20);
    assert_eq!(fragment.supplier_name, "Pran");
    assert_eq!(fragment.shard_id, fx.router.shard_for_category("Dairy Products"));
}

#[test]
fn zero_stock_products_are_never_returned() {
    let fx = Fixture::new();
    fx.inventory
        .add_product(new_product("Ghee", dec!(300), "Dairy Products", "Pran", 0))
        .unwrap();

    let fragments = fx
        .query
        .query_products(&ProductFilter::by_category("Dairy Products"))
        .unwrap();
    assert!(fragments.is_empty());
}

#[test]
fn name_filter_is_case_insensitive_substring() {
    let fx = Fixture::new();
    fx.inventory
        .add_product(new_product("Chocolate Milk", dec!(65), "Dairy Products", "Pran", 5))
        .unwrap();
    fx.inventory
        .add_product(new_product("Bread", dec!(40), "Bakery", "Aarong", 5))
        .unwrap();

    let fragments = fx
        .query
        .query_products(&ProductFilter {
            name: Some("milk".into()),
            ..ProductFilter::default()
        })
        .unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].name, "Chocolate Milk");
}

#[test]
fn price_bounds_apply_to_coerced_prices() {
    let fx = Fixture::new();
    let dairy_shard = fx.router.shard_for_category("Dairy Products");
    // Legacy string price "75" must compare as 75.
    seed_legacy_product(&fx.cluster, dairy_shard, "Yogurt", "75", "Dairy Products", 5);
    // Unparsable legacy price coerces to 0 and falls below any positive min.
    seed_legacy_product(&fx.cluster, dairy_shard, "Lassi", "cheap", "Dairy Products", 5);
    fx.inventory
        .add_product(new_product("Milk", dec!(50), "Dairy Products", "Pran", 5))
        .unwrap();

    let fragments = fx
        .query
        .query_products(&ProductFilter {
            min_price: Some(dec!(60)),
            max_price: Some(dec!(80)),
            ..ProductFilter::default()
        })
        .unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].name, "Yogurt");
    assert_eq!(fragments[0].price, dec!(75));
}

#[test]
fn unparsable_price_surfaces_as_zero() {
    let fx = Fixture::new();
    let dairy_shard = fx.router.shard_for_category("Dairy Products");
    seed_legacy_product(&fx.cluster, dairy_shard, "Lassi", "cheap", "Dairy Products", 5);

    let fragments = fx
        .query
        .query_products(&ProductFilter::by_category("Dairy Products"))
        .unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].price, dec!(0));
}

#[test]
fn brand_filter_matches_supplier_substring() {
    let fx = Fixture::new();
    fx.inventory
        .add_product(new_product("Milk", dec!(50), "Dairy Products", "Pran Dairy", 5))
        .unwrap();
    fx.inventory
        .add_product(new_product("Butter", dec!(90), "Dairy Products", "Aarong", 5))
        .unwrap();

    let fragments = fx
        .query
        .query_products(&ProductFilter {
            brand: Some("pran".into()),
            ..ProductFilter::default()
        })
        .unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].supplier_name, "Pran Dairy");
}

#[test]
fn missing_supplier_falls_back_to_sentinel() {
    let fx = Fixture::new();
    let shard = fx.router.shard_for_category("Other");
    seed_orphan_product(&fx.cluster, shard, "Widget", dec!(15), "Other", 2);

    let fragments = fx
        .query
        .query_products(&ProductFilter::by_category("Other"))
        .unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].supplier_name, SUPPLIER_FALLBACK);
}

#[test]
fn category_query_prunes_other_shards() {
    let fx = Fixture::new();
    fx.inventory
        .add_product(new_product("Radio", dec!(120), "Electronics", "Walton", 4))
        .unwrap();

    let electronics_shard = fx.router.shard_for_category("Electronics");
    let others: Vec<_> = fx
        .router
        .all()
        .filter(|s| *s != electronics_shard)
        .collect();
    let before: Vec<_> = others.iter().map(|s| fx.cluster.access_count(*s)).collect();
    let target_before = fx.cluster.access_count(electronics_shard);

    fx.query
        .query_products(&ProductFilter::by_category("Electronics"))
        .unwrap();

    for (shard, before) in others.iter().zip(before) {
        assert_eq!(
            fx.cluster.access_count(*shard),
            before,
            "pruned shard {shard} was read"
        );
    }
    assert!(fx.cluster.access_count(electronics_shard) > target_before);
}

#[test]
fn unreachable_shard_contributes_zero_results() {
    let fx = Fixture::new();
    fx.inventory
        .add_product(new_product("Milk", dec!(50), "Dairy Products", "Pran", 5))
        .unwrap();
    fx.inventory
        .add_product(new_product("Radio", dec!(120), "Electronics", "Walton", 4))
        .unwrap();

    fx.cluster
        .set_offline(fx.router.shard_for_category("Electronics"), true);

    let fragments = fx.query.query_products(&ProductFilter::any()).unwrap();
    assert_eq!(fragments.len(), 1);
    assert_eq!(fragments[0].name, "Milk");
}

#[test]
fn each_query_replaces_the_fragment_cache() {
    let fx = Fixture::new();
    fx.inventory
        .add_product(new_product("Milk", dec!(50), "Dairy Products", "Pran", 5))
        .unwrap();
    fx.inventory
        .add_product(new_product("Radio", dec!(120), "Electronics", "Walton", 4))
        .unwrap();

    fx.query
        .query_products(&ProductFilter::any())
        .unwrap();
    assert_eq!(fx.cluster.fragments().len(), 2);

    fx.query
        .query_products(&ProductFilter::by_category("Electronics"))
        .unwrap();
    let cached = fx.cluster.fragments().entries();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].name, "Radio");
}

#[test]
fn gather_order_is_shard_order() {
    let fx = Fixture::new();
    // Electronics hashes to shard 1, Dairy Products to shard 0.
    fx.inventory
        .add_product(new_product("Radio", dec!(120), "Electronics", "Walton", 4))
        .unwrap();
    fx.inventory
        .add_product(new_product("Milk", dec!(50), "Dairy Products", "Pran", 5))
        .unwrap();

    let fragments = fx.query.query_products(&ProductFilter::any()).unwrap();
    let shards: Vec<_> = fragments.iter().map(|f| f.shard_id).collect();
    let mut sorted = shards.clone();
    sorted.sort();
    assert_eq!(shards, sorted);
}
