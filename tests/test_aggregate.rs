//! Tests for filters and grouped averages

use lotview::pipeline::{
    filter_by_categories, filter_by_conjunctive_pairs, filter_by_range, group_average,
    AggregationError, Column, OdometerRange, PairPredicate, Value,
};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn lot() -> lotview::pipeline::Table {
    table_of(vec![
        vehicle("ford", "suv", 10_000.0, 30_000.0),
        vehicle("ford", "suv", 20_000.0, 40_000.0),
        vehicle("ford", "sedan", 5_000.0, 120_000.0),
        vehicle("toyota", "suv", 18_000.0, 10_000.0),
        vehicle("toyota", "sedan", 9_000.0, 260_000.0),
    ])
}

#[test]
fn test_group_average_by_type() {
    let table = table_of(vec![
        vehicle("ford", "suv", 10_000.0, 50_000.0),
        vehicle("ford", "suv", 20_000.0, 50_000.0),
        vehicle("ford", "sedan", 5_000.0, 50_000.0),
    ]);

    let averages = group_average(&table, &[Column::Type], Column::Price).unwrap();

    assert_eq!(averages.len(), 2);
    // Key order: "sedan" sorts before "suv"
    assert_eq!(averages.rows[0].key, vec![Value::from("sedan")]);
    assert_eq!(averages.rows[0].mean, 5_000.0);
    assert_eq!(averages.rows[1].key, vec![Value::from("suv")]);
    assert_eq!(averages.rows[1].mean, 15_000.0);
    assert_eq!(averages.rows[1].count, 2);
}

#[test]
fn test_group_average_two_columns() {
    let averages = group_average(&lot(), &[Column::Manufacturer, Column::Type], Column::Price).unwrap();

    assert_eq!(averages.len(), 4);
    assert_eq!(
        averages.mean_for(&[Value::from("ford"), Value::from("suv")]),
        Some(15_000.0)
    );
    assert_eq!(
        averages.mean_for(&[Value::from("toyota"), Value::from("sedan")]),
        Some(9_000.0)
    );
    assert_eq!(averages.mean_for(&[Value::from("honda"), Value::from("suv")]), None);
}

#[test]
fn test_group_average_orders_odometer_ranges_by_mileage() {
    let averages = group_average(&lot(), &[Column::OdometerRange], Column::Price).unwrap();

    let keys: Vec<Value> = averages.rows.iter().map(|r| r.key[0].clone()).collect();
    assert_eq!(
        keys,
        vec![
            Value::Range(OdometerRange::UpTo25K),
            Value::Range(OdometerRange::UpTo50K),
            Value::Range(OdometerRange::UpTo150K),
            Value::Range(OdometerRange::Over250K),
        ]
    );
}

#[test]
fn test_group_average_skips_missing_keys_and_values() {
    let mut no_type = vehicle("ford", "suv", 50_000.0, 10_000.0);
    no_type.vehicle_type = None;
    let mut no_days = vehicle("kia", "van", 7_000.0, 10_000.0);
    no_days.days_listed = None;
    let table = table_of(vec![vehicle("ford", "suv", 10_000.0, 10_000.0), no_type, no_days]);

    let by_type = group_average(&table, &[Column::Type], Column::Price).unwrap();
    assert_eq!(by_type.len(), 2);
    assert_eq!(by_type.mean_for(&[Value::from("suv")]), Some(10_000.0));

    // The van group has no days_listed values at all
    let days = group_average(&table, &[Column::Type], Column::DaysListed).unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days.mean_for(&[Value::from("van")]), None);
}

#[test]
fn test_group_average_of_empty_table() {
    let table = table_of(Vec::new());

    let averages = group_average(&table, &[Column::Type], Column::Price).unwrap();

    assert!(averages.is_empty());
}

#[test]
fn test_group_average_requires_selected_columns() {
    let projected = lot().select(&[Column::Price, Column::Type]);

    let err = group_average(&projected, &[Column::Manufacturer], Column::Price).unwrap_err();
    assert_eq!(err, AggregationError::ColumnNotSelected(Column::Manufacturer));

    let err = group_average(&projected, &[Column::Type], Column::Odometer).unwrap_err();
    assert_eq!(err, AggregationError::ColumnNotSelected(Column::Odometer));
    assert!(err.to_string().contains("odometer"));

    assert!(group_average(&projected, &[Column::Type], Column::Price).is_ok());
}

#[test]
fn test_filter_by_categories() {
    let table = lot();

    let fords = filter_by_categories(&table, Column::Manufacturer, &[Value::from("ford")]);
    assert_eq!(fords.len(), 3);
    assert!(fords.rows().iter().all(|v| v.manufacturer.as_deref() == Some("ford")));

    let both = filter_by_categories(
        &table,
        Column::Manufacturer,
        &[Value::from("toyota"), Value::from("ford")],
    );
    assert_eq!(both.len(), 5);
    assert_eq!(both.rows()[0].price, 10_000.0, "source order is kept");

    assert_eq!(table.len(), 5, "input is not modified");
}

#[test]
fn test_filter_by_categories_empty_set() {
    let filtered = filter_by_categories(&lot(), Column::Type, &[]);

    assert!(filtered.is_empty());
}

#[test]
fn test_filter_by_range_is_inclusive() {
    let table = lot();

    let mid = filter_by_range(&table, Column::Price, 9_000.0, 18_000.0);
    let prices: Vec<f64> = mid.rows().iter().map(|v| v.price).collect();
    assert_eq!(prices, vec![10_000.0, 18_000.0, 9_000.0]);

    let years = filter_by_range(&table, Column::ModelYear, 2015.0, 2015.0);
    assert_eq!(years.len(), 5);
}

#[test]
fn test_filter_by_range_skips_missing() {
    let mut unknown_year = vehicle("ford", "suv", 10_000.0, 10_000.0);
    unknown_year.model_year = lotview::pipeline::ModelYear::Unknown;
    let table = table_of(vec![unknown_year, vehicle("ford", "suv", 11_000.0, 10_000.0)]);

    let filtered = filter_by_range(&table, Column::ModelYear, 1900.0, 2100.0);

    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered.rows()[0].price, 11_000.0);
}

#[test]
fn test_conjunctive_pairs_union() {
    let pairs = vec![
        PairPredicate::new(
            (Column::Manufacturer, Value::from("ford")),
            (Column::Type, Value::from("suv")),
        ),
        PairPredicate::new(
            (Column::Manufacturer, Value::from("toyota")),
            (Column::Type, Value::from("sedan")),
        ),
        // Overlaps the first pair; matching rows still appear once
        PairPredicate::new(
            (Column::Manufacturer, Value::from("ford")),
            (Column::Type, Value::from("suv")),
        ),
    ];

    let filtered = filter_by_conjunctive_pairs(
        &lot(),
        &pairs,
        &[Column::Manufacturer, Column::Type, Column::Price],
    );

    let prices: Vec<f64> = filtered.rows().iter().map(|v| v.price).collect();
    assert_eq!(prices, vec![10_000.0, 20_000.0, 9_000.0]);
    assert_eq!(
        filtered.columns(),
        [Column::Manufacturer, Column::Type, Column::Price]
    );
}

#[test]
fn test_conjunctive_pairs_projection_limits_grouping() {
    let pairs = vec![PairPredicate::new(
        (Column::Manufacturer, Value::from("ford")),
        (Column::Type, Value::from("sedan")),
    )];

    let filtered = filter_by_conjunctive_pairs(&lot(), &pairs, &[Column::Type, Column::Price]);

    assert_eq!(filtered.len(), 1);
    assert!(matches!(
        group_average(&filtered, &[Column::Manufacturer], Column::Price),
        Err(AggregationError::ColumnNotSelected(Column::Manufacturer))
    ));
}

#[test]
fn test_conjunctive_pairs_empty_list() {
    let filtered = filter_by_conjunctive_pairs(&lot(), &[], &[Column::Price]);

    assert!(filtered.is_empty());
}

#[test]
fn test_filters_keep_projection() {
    let projected = lot().select(&[Column::Type, Column::Price]);

    // Filtering may test a hidden column, but never exposes it
    let fords = filter_by_categories(&projected, Column::Manufacturer, &[Value::from("ford")]);
    assert_eq!(fords.len(), 3);
    assert_eq!(fords.columns(), [Column::Type, Column::Price]);

    let cheap = filter_by_range(&fords, Column::Price, 0.0, 10_000.0);
    assert_eq!(cheap.len(), 2);
    assert!(matches!(
        group_average(&cheap, &[Column::Manufacturer], Column::Price),
        Err(AggregationError::ColumnNotSelected(Column::Manufacturer))
    ));
}

#[test]
fn test_projection_cannot_be_widened() {
    let pairs = vec![PairPredicate::new(
        (Column::Manufacturer, Value::from("toyota")),
        (Column::Type, Value::from("suv")),
    )];
    let filtered = filter_by_conjunctive_pairs(&lot(), &pairs, &[Column::Price]);

    let reprojected = filtered.select(&[Column::Manufacturer, Column::Price]);

    assert_eq!(reprojected.columns(), [Column::Price]);
    assert!(group_average(&reprojected, &[Column::Manufacturer], Column::Price).is_err());
}
