//! Multi-key sort over loaded rows.
//!
//! A `SortSpec` is resolved once into a `SortPlan` against a field lookup;
//! unknown properties fail here, before any rows are read. Sort keys are
//! extracted once per row, then compared key by key with the row's primary
//! key as the final tie-break.

use std::cmp::Ordering;

use super::{OrderSpec, SortSpec};
use crate::enums::{Direction, NullHandling};
use crate::errors::CoreError;
use crate::registry::{FieldDef, FieldValue, Keyed};

struct SortKey<T: 'static> {
    field: &'static FieldDef<T>,
    descending: bool,
    ignore_case: bool,
    nulls_first: bool,
}

impl<T> SortKey<T> {
    fn resolve(
        order: &OrderSpec,
        lookup: &impl Fn(&str) -> Option<&'static FieldDef<T>>,
    ) -> Result<Self, CoreError> {
        let field = lookup(&order.property).ok_or_else(|| {
            CoreError::validation(format!("unknown sort property '{}'", order.property))
        })?;
        let descending = order.direction.unwrap_or_default() == Direction::Desc;
        let nulls_first = match order.null_handling.unwrap_or_default() {
            NullHandling::NullsFirst => true,
            NullHandling::NullsLast => false,
            NullHandling::Native => !descending,
        };
        Ok(Self {
            field,
            descending,
            ignore_case: order.ignore_case.unwrap_or(false),
            nulls_first,
        })
    }

    fn extract(&self, row: &T) -> FieldValue {
        let value = self.field.value(row);
        if self.ignore_case {
            value.folded()
        } else {
            value
        }
    }

    fn compare(&self, a: &FieldValue, b: &FieldValue) -> Ordering {
        match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => {
                if self.nulls_first {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, true) => {
                if self.nulls_first {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, false) => {
                let ord = a.compare(b);
                if self.descending { ord.reverse() } else { ord }
            }
        }
    }
}

/// A resolved, reusable ordering over rows of type `T`.
pub struct SortPlan<T: 'static> {
    keys: Vec<SortKey<T>>,
}

impl<T: Keyed> SortPlan<T> {
    /// Resolve every order key through `lookup`.
    ///
    /// # Errors
    ///
    /// `CoreError::Validation` if any property is unknown.
    pub fn compile(
        sort: &SortSpec,
        lookup: impl Fn(&str) -> Option<&'static FieldDef<T>>,
    ) -> Result<Self, CoreError> {
        let keys = sort
            .orders
            .iter()
            .map(|order| SortKey::resolve(order, &lookup))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { keys })
    }

    /// Number of explicit keys (the primary-key tie-break is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Order `rows` by the explicit keys, then by ascending primary key.
    #[must_use]
    pub fn sort(&self, rows: Vec<T>) -> Vec<T> {
        let mut keyed: Vec<(Vec<FieldValue>, T)> = rows
            .into_iter()
            .map(|row| (self.keys.iter().map(|k| k.extract(&row)).collect(), row))
            .collect();

        keyed.sort_by(|(ka, ra), (kb, rb)| {
            self.keys
                .iter()
                .zip(ka.iter().zip(kb.iter()))
                .map(|(key, (a, b))| key.compare(a, b))
                .find(|ord| ord.is_ne())
                .unwrap_or(Ordering::Equal)
                .then_with(|| ra.primary_key().cmp(&rb.primary_key()))
        });

        keyed.into_iter().map(|(_, row)| row).collect()
    }
}

impl<T> std::fmt::Debug for SortPlan<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<String> = self
            .keys
            .iter()
            .map(|k| {
                format!(
                    "{} {}{}{}",
                    k.field.name,
                    if k.descending { "DESC" } else { "ASC" },
                    if k.ignore_case { " CI" } else { "" },
                    if k.nulls_first {
                        " NULLS FIRST"
                    } else {
                        " NULLS LAST"
                    },
                )
            })
            .collect();
        f.debug_struct("SortPlan").field("keys", &keys).finish()
    }
}
