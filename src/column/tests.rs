use super::*;
use bigdecimal::BigDecimal;
use bitvec::prelude::*;
use std::str::FromStr;

fn meta(name: &str) -> ColumnMeta {
    ColumnMeta {
        name: name.to_string(),
        ordinal: 0,
        nullable: true,
    }
}

fn build(buffer: impl Into<ColumnBuffer>, nulls: Option<BitVec>) -> Column {
    Column::from_buffer(meta("c"), buffer.into(), nulls, true).unwrap()
}

// --- Facade and Typed Fast Path ---

#[test]
fn test_as_typed_checks_element_type() {
    let column = build(vec![1i16, 2], None);

    assert_eq!(column.as_typed::<i16>().unwrap().values(), &[1, 2]);
    match column.as_typed::<i32>() {
        Err(LightTableError::InvalidCast { expected, found }) => {
            assert_eq!(expected, "Int32");
            assert_eq!(found, "Int16");
        }
        other => panic!("Expected InvalidCast, got {:?}", other.map(|c| c.len())),
    }
}

#[test]
fn test_set_typed_clears_null_mark() {
    let mut column = build(vec![1.5f64, 0.0], Some(bitvec![0, 1]));
    assert!(column.is_null(1));

    let typed = column.as_typed_mut::<f64>().unwrap();
    assert_eq!(typed.get_typed(1).unwrap(), 0.0);
    typed.set_typed(1, 2.5).unwrap();

    assert!(!column.is_null(1));
    assert_eq!(column.get(1).unwrap(), Value::Float64(2.5));
    assert!(!column.has_nulls());
}

#[test]
fn test_set_null_resets_slot_to_default() {
    let mut column = build(vec!["keep".to_string(), "drop".to_string()], None);
    assert!(!column.has_null_bitmap());

    column.set_null(1).unwrap();
    assert!(column.has_null_bitmap());
    assert_eq!(column.get(1).unwrap(), Value::Null);
    assert_eq!(column.as_typed::<String>().unwrap().get_typed(1).unwrap(), "");

    column.set(1, Value::from("back")).unwrap();
    assert_eq!(column.nulls_count(), 0);
    assert!(column.optimize_nulls());
    assert!(!column.has_null_bitmap());
}

#[test]
fn test_typed_iter_skips_nothing_but_hides_nulls() {
    let column = build(vec![true, false, true], Some(bitvec![0, 1, 0]));
    let cells: Vec<Option<bool>> = column
        .as_typed::<bool>()
        .unwrap()
        .iter()
        .map(|v| v.copied())
        .collect();
    assert_eq!(cells, vec![Some(true), None, Some(true)]);
}

#[test]
fn test_binary_column_uses_absent_value_for_null() {
    let mut column = build(vec![Some(vec![1u8, 2]), None], None);

    assert!(column.is_null(1));
    assert_eq!(column.nulls_count(), 1);
    assert!(!column.has_null_bitmap());

    column.set(0, Value::Null).unwrap();
    assert_eq!(column.nulls_count(), 2);
    column.set(1, Value::Binary(vec![9])).unwrap();
    assert_eq!(column.get(1).unwrap(), Value::Binary(vec![9]));
    assert!(!column.has_null_bitmap());
}

#[test]
fn test_binary_import_bitmap_stamps_absent_values() {
    let column = build(vec![Some(vec![1u8]), Some(vec![2u8])], Some(bitvec![1, 0]));
    assert_eq!(column.get(0).unwrap(), Value::Null);
    assert_eq!(column.get(1).unwrap(), Value::Binary(vec![2]));
}

#[test]
fn test_out_of_range_rows() {
    let mut column = build(vec![1u8, 2], None);
    assert!(matches!(
        column.get(2),
        Err(LightTableError::RowOutOfBounds { row: 2, row_count: 2 })
    ));
    assert!(matches!(
        column.set_null(5),
        Err(LightTableError::RowOutOfBounds { row: 5, row_count: 2 })
    ));
    assert!(!column.is_null(9));
}

#[test]
fn test_copy_to_checks_capacity() {
    let column = build(vec![3i32, 4], None);

    let mut exact = [0i32; 2];
    column.copy_to(&mut exact, 0).unwrap();
    assert_eq!(exact, [3, 4]);

    let mut short = [0i32; 2];
    assert!(matches!(
        column.copy_to(&mut short, 1),
        Err(LightTableError::InsufficientBuffer {
            required: 2,
            available: 1
        })
    ));
    let mut wrong = [0i64; 2];
    assert!(matches!(
        column.copy_to(&mut wrong, 0),
        Err(LightTableError::InvalidCast { .. })
    ));
}

// --- Aggregates ---

#[test]
fn test_aggregate_kind_parsing() {
    assert_eq!("SUM".parse::<AggregateKind>().unwrap(), AggregateKind::Sum);
    assert_eq!("avg".parse::<AggregateKind>().unwrap(), AggregateKind::Mean);
    assert!(matches!(
        "median".parse::<AggregateKind>(),
        Err(LightTableError::UnsupportedAggregate(name)) if name == "median"
    ));
}

#[test]
fn test_aggregate_by_name() {
    let column = build(vec![1i32, 2, 0, 4], Some(bitvec![0, 0, 1, 0]));

    assert_eq!(column.aggregate_by_name("sum").unwrap(), Value::Int64(7));
    assert_eq!(column.aggregate_by_name("Mean").unwrap(), Value::Int32(2));
    assert!(matches!(
        column.aggregate_by_name("count"),
        Err(LightTableError::UnsupportedAggregate(_))
    ));
}

#[test]
fn test_int64_sum_widens_past_i64() {
    let column = build(vec![i64::MAX, 1], None);
    let expected = BigDecimal::from_str("9223372036854775808").unwrap();

    assert_eq!(column.aggregate(AggregateKind::Sum), Value::Decimal(expected));
    assert_eq!(column.aggregate(AggregateKind::Max), Value::Int64(i64::MAX));
    assert_eq!(
        column.aggregate(AggregateKind::Mean),
        Value::Int64(i64::MAX / 2 + 1)
    );
}

#[test]
fn test_integer_mean_truncates_toward_zero() {
    let column = build(vec![-7i16, 0], None);
    assert_eq!(column.aggregate(AggregateKind::Mean), Value::Int16(-3));
    assert_eq!(column.aggregate(AggregateKind::Sum), Value::Int64(-7));
}

#[test]
fn test_float_and_decimal_aggregates() {
    let floats = build(vec![1.0f64, 2.0, 4.5], None);
    assert_eq!(floats.aggregate(AggregateKind::Sum), Value::Float64(7.5));
    assert_eq!(floats.aggregate(AggregateKind::Mean), Value::Float64(2.5));
    assert_eq!(floats.aggregate(AggregateKind::Min), Value::Float64(1.0));

    let decimals = build(
        vec![
            BigDecimal::from_str("1.25").unwrap(),
            BigDecimal::from_str("2.75").unwrap(),
        ],
        None,
    );
    assert_eq!(
        decimals.aggregate(AggregateKind::Sum),
        Value::Decimal(BigDecimal::from_str("4.00").unwrap())
    );
    assert_eq!(
        decimals.aggregate(AggregateKind::Mean),
        Value::Decimal(BigDecimal::from(2))
    );
}

#[test]
fn test_min_max_ignore_nan_wherever_it_sits() {
    for values in [
        vec![f64::NAN, 1.0, 5.0],
        vec![1.0, f64::NAN, 5.0],
        vec![1.0, 5.0, f64::NAN],
    ] {
        let column = build(values.clone(), None);
        assert_eq!(column.aggregate(AggregateKind::Min), Value::Float64(1.0), "{:?}", values);
        assert_eq!(column.aggregate(AggregateKind::Max), Value::Float64(5.0), "{:?}", values);
    }

    let all_nan = build(vec![f64::NAN, f64::NAN], None);
    for kind in [AggregateKind::Min, AggregateKind::Max] {
        match all_nan.aggregate(kind) {
            Value::Float64(v) => assert!(v.is_nan()),
            other => panic!("expected NaN, got {:?}", other),
        }
    }
}

#[test]
fn test_non_numeric_aggregates_are_null() {
    let column = build(vec![uuid::Uuid::nil()], None);
    for kind in AggregateKind::ALL {
        assert_eq!(column.aggregate(kind), Value::Null);
    }
}
