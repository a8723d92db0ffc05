use super::*;
use crate::types::{DataType, Value};
use crate::utils::typed_slice_to_bytes;
use arrow::array::{
    ArrayRef, BinaryArray, Decimal128Array, FixedSizeBinaryArray, Float32Array, Int32Array,
    StringArray, TimestampMillisecondArray,
};
use arrow::datatypes::{DataType as ArrowDataType, Field, Schema, TimeUnit};
use arrow::record_batch::RecordBatch;
use bigdecimal::BigDecimal;
use bitvec::prelude::*;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

fn create_mixed_batch() -> RecordBatch {
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", ArrowDataType::Int32, false),
        Field::new("label", ArrowDataType::Utf8, true),
        Field::new("ratio", ArrowDataType::Float32, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int32Array::from(vec![1, 2, 3])),
            Arc::new(StringArray::from(vec![Some("a"), None, Some("c")])),
            Arc::new(Float32Array::from(vec![0.5, 1.5, 2.5])),
        ],
    )
    .unwrap()
}

/// A row-major in-memory source for the per-cell adapter.
struct VecSource {
    schema: Vec<ColumnSchema>,
    rows: Vec<Vec<Value>>,
}

impl CellSource for VecSource {
    fn name(&self) -> &str {
        "vec_source"
    }

    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn schema(&self) -> Vec<ColumnSchema> {
        self.schema.clone()
    }

    fn cell(&self, row: usize, ordinal: usize) -> Result<Value, LightTableError> {
        Ok(self.rows[row][ordinal].clone())
    }
}

// --- RecordBatchAdapter ---

#[test]
fn test_record_batch_schema_mapping() {
    let adapter = RecordBatchAdapter::new("mixed", create_mixed_batch());
    let schema = adapter.schema();

    assert_eq!(adapter.table_name(), "mixed");
    assert_eq!(adapter.row_count(), 3);
    assert_eq!(schema[0], ColumnSchema::new("id", "Int32", 0, false));
    assert_eq!(schema[1], ColumnSchema::new("label", "String", 1, true));
    // No Float32 column exists, so the Arrow name is passed through.
    assert_eq!(schema[2].declared_type, "Float32");
    assert!(DataType::from_type_name(&schema[2].declared_type).is_err());
}

#[test]
fn test_export_inverts_validity_into_null_bits() {
    let adapter = RecordBatchAdapter::new("mixed", create_mixed_batch());

    let ids = adapter.export_column_buffer(0).unwrap();
    assert_eq!(ids.buffer, ColumnBuffer::Int32(vec![1, 2, 3]));
    assert!(ids.nulls.is_none());

    let labels = adapter.export_column_buffer(1).unwrap();
    assert_eq!(
        labels.buffer,
        ColumnBuffer::String(vec!["a".to_string(), String::new(), "c".to_string()])
    );
    assert_eq!(labels.nulls, Some(bitvec![0, 1, 0]));
}

#[test]
fn test_export_unsupported_and_out_of_range() {
    let adapter = RecordBatchAdapter::new("mixed", create_mixed_batch());

    let result = adapter.export_column_buffer(2);
    assert!(matches!(result, Err(LightTableError::UnsupportedType(name)) if name == "Float32"));

    let result = adapter.export_column_buffer(7);
    assert!(matches!(
        result,
        Err(LightTableError::ColumnOutOfBounds {
            ordinal: 7,
            column_count: 3
        })
    ));
}

#[test]
fn test_export_decimal_keeps_scale() {
    let array: ArrayRef = Arc::new(
        Decimal128Array::from(vec![Some(12345i128), None, Some(-5)])
            .with_precision_and_scale(10, 2)
            .unwrap(),
    );
    let exported = arrow_impl::export_array(&array).unwrap();

    match exported.buffer {
        ColumnBuffer::Decimal(values) => {
            assert_eq!(values[0], BigDecimal::from_str("123.45").unwrap());
            assert_eq!(values[2], BigDecimal::from_str("-0.05").unwrap());
        }
        other => panic!("Expected a Decimal buffer, got {:?}", other),
    }
    assert_eq!(exported.nulls, Some(bitvec![0, 1, 0]));
}

#[test]
fn test_export_timestamps_and_guids() {
    let stamps: ArrayRef = Arc::new(TimestampMillisecondArray::from(vec![Some(1_500i64), None]));
    let exported = arrow_impl::export_array(&stamps).unwrap();
    match exported.buffer {
        ColumnBuffer::DateTime(values) => {
            assert_eq!(values[0].and_utc().timestamp_millis(), 1_500);
            assert_eq!(values[1], chrono::NaiveDateTime::MIN);
        }
        other => panic!("Expected a DateTime buffer, got {:?}", other),
    }
    assert_eq!(
        arrow_impl::declared_type_name(&ArrowDataType::Timestamp(TimeUnit::Nanosecond, None)),
        "DateTime"
    );

    let guid = Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0);
    let guids: ArrayRef = Arc::new(
        FixedSizeBinaryArray::try_from_sparse_iter_with_size(
            vec![Some(*guid.as_bytes()), None].into_iter(),
            16,
        )
        .unwrap(),
    );
    let exported = arrow_impl::export_array(&guids).unwrap();
    assert_eq!(exported.buffer, ColumnBuffer::Guid(vec![guid, Uuid::nil()]));
}

#[test]
fn test_export_binary_uses_absent_entries() {
    let blobs: ArrayRef = Arc::new(BinaryArray::from(vec![Some(b"ab".as_ref()), None]));
    let exported = arrow_impl::export_array(&blobs).unwrap();
    assert_eq!(
        exported.buffer,
        ColumnBuffer::Binary(vec![Some(b"ab".to_vec()), None])
    );
}

#[test]
fn test_default_column_specs_are_deferred() {
    let adapter = RecordBatchAdapter::new("mixed", create_mixed_batch());
    let specs = adapter.column_specs();

    assert_eq!(specs.len(), 3);
    assert!(specs
        .iter()
        .all(|s| matches!(s.import_source, ImportSource::Deferred(_))));
    assert_eq!(specs[1].name, "label");
    assert_eq!(specs[1].ordinal, 1);
}

// --- ColumnBuffer ---

#[test]
fn test_from_raw_bytes() {
    let bytes = typed_slice_to_bytes(&[7i32, -1, 42]);
    let buffer = ColumnBuffer::from_raw_bytes(DataType::Int32, &bytes).unwrap();
    assert_eq!(buffer, ColumnBuffer::Int32(vec![7, -1, 42]));

    // Misaligned start still reads correctly.
    let mut shifted = vec![0u8];
    shifted.extend_from_slice(&typed_slice_to_bytes(&[1.5f64, 2.5]));
    let buffer = ColumnBuffer::from_raw_bytes(DataType::Float64, &shifted[1..]).unwrap();
    assert_eq!(buffer, ColumnBuffer::Float64(vec![1.5, 2.5]));

    assert!(matches!(
        ColumnBuffer::from_raw_bytes(DataType::Int64, &[0u8; 5]),
        Err(LightTableError::PodCast(_))
    ));
    assert!(matches!(
        ColumnBuffer::from_raw_bytes(DataType::String, &[]),
        Err(LightTableError::UnsupportedType(_))
    ));
}

#[test]
fn test_from_raw_bytes_accepts_exactly_fixed_width_types() {
    for dt in DataType::ALL {
        let result = ColumnBuffer::from_raw_bytes(dt, &[]);
        if dt.is_fixed_width() {
            assert_eq!(result.unwrap().data_type(), dt, "{}", dt);
        } else {
            assert!(
                matches!(result, Err(LightTableError::UnsupportedType(_))),
                "{}",
                dt
            );
        }
    }
}

#[test]
fn test_column_spec_from_buffer_declares_buffer_type() {
    let spec = ColumnSpec::from_buffer("flags", 0, vec![true, false], None);
    assert_eq!(spec.declared_type, "Boolean");
    assert!(spec.nullable);
    let exported = spec.import_source.export().unwrap();
    assert_eq!(exported.buffer.len(), 2);
}

// --- CellCopyAdapter ---

#[test]
fn test_cell_copy_adapter_builds_buffers() {
    let source = VecSource {
        schema: vec![
            ColumnSchema::new("qty", "int", 0, true),
            ColumnSchema::new("blob", "byte[]", 1, true),
        ],
        rows: vec![
            vec![Value::Int32(4), Value::Binary(vec![1])],
            vec![Value::Null, Value::Null],
        ],
    };
    let adapter = CellCopyAdapter::new(source);

    let qty = adapter.export_column_buffer(0).unwrap();
    assert_eq!(qty.buffer, ColumnBuffer::Int32(vec![4, 0]));
    assert_eq!(qty.nulls, Some(bitvec![0, 1]));

    let blob = adapter.export_column_buffer(1).unwrap();
    assert_eq!(blob.buffer, ColumnBuffer::Binary(vec![Some(vec![1]), None]));
}

#[test]
fn test_cell_copy_adapter_rejects_mistyped_cell() {
    let source = VecSource {
        schema: vec![ColumnSchema::new("qty", "Int32", 0, false)],
        rows: vec![vec![Value::Int64(4)]],
    };
    let adapter = CellCopyAdapter::new(source);

    assert!(matches!(
        adapter.export_column_buffer(0),
        Err(LightTableError::InvalidCast { .. })
    ));
    assert!(matches!(
        adapter.export_column_buffer(3),
        Err(LightTableError::ColumnOutOfBounds { .. })
    ));
}
