//! The per-column aggregate engine (Sum, Mean, Min, Max).
//!
//! Every aggregate skips null rows and yields `Value::Null` when no row is
//! non-null. Non-numeric columns always yield `Value::Null`; that decision lives in
//! `Column::aggregate`, this module only ever sees numeric element types.

use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::column::TypedColumn;
use crate::error::LightTableError;
use crate::traits::NumericElement;
use crate::types::Value;

/// The aggregate functions a column can compute.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AggregateKind {
    Sum,
    Mean,
    Min,
    Max,
}

impl AggregateKind {
    pub const ALL: [AggregateKind; 4] = [Self::Sum, Self::Mean, Self::Min, Self::Max];
}

impl FromStr for AggregateKind {
    type Err = LightTableError;

    /// Parses an aggregate name (case-insensitive).
    ///
    /// # Errors
    /// Any name other than sum/mean/min/max yields `UnsupportedAggregate`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(Self::Sum),
            "mean" | "avg" => Ok(Self::Mean),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            _ => Err(LightTableError::UnsupportedAggregate(s.to_string())),
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl<T: NumericElement> TypedColumn<T> {
    /// Computes `kind` over the non-null rows of this column.
    pub fn aggregate(&self, kind: AggregateKind) -> Value {
        match kind {
            AggregateKind::Sum => {
                let (sum, count) = self.fold_sum();
                if count == 0 {
                    Value::Null
                } else {
                    T::sum_value(sum)
                }
            }
            AggregateKind::Mean => {
                let (sum, count) = self.fold_sum();
                if count == 0 {
                    Value::Null
                } else {
                    T::mean_value(sum, count)
                }
            }
            AggregateKind::Min => self.extreme(|candidate, best| candidate < best),
            AggregateKind::Max => self.extreme(|candidate, best| candidate > best),
        }
    }

    /// Single pass accumulating the widened sum and the non-null count.
    fn fold_sum(&self) -> (T::Wide, usize) {
        self.iter()
            .flatten()
            .fold((<T::Wide as Zero>::zero(), 0usize), |(sum, count), v| {
                (sum + v.widen(), count + 1)
            })
    }

    fn extreme(&self, better: impl Fn(&T, &T) -> bool) -> Value {
        let mut best: Option<&T> = None;
        for v in self.iter().flatten() {
            match best {
                Some(current) if !current.is_unordered() && !better(v, current) => {}
                _ => best = Some(v),
            }
        }
        best.cloned().map(T::into_value).unwrap_or(Value::Null)
    }
}
