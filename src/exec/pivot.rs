//! Pivot assembly helpers: insertion-ordered header interning and axis
//! sorting.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::model::query::SortDirection;
use crate::model::result::{Coordinate, PivotHeader};
use crate::model::types::canonical_cmp;
use crate::query::AxisSpec;

/// Interns headers by key in first-appearance order, so the output row and
/// column order is the order in which new combinations surfaced during the
/// fact scan.
#[derive(Debug, Default)]
pub struct HeaderInterner {
    index: HashMap<String, usize>,
    headers: Vec<PivotHeader>,
}

impl HeaderInterner {
    /// Intern the header for a coordinate tuple, returning its index.
    pub fn intern(&mut self, coordinates: Vec<Coordinate>) -> usize {
        let header = PivotHeader::from_coordinates(coordinates);
        if let Some(&i) = self.index.get(&header.key) {
            return i;
        }
        let i = self.headers.len();
        self.index.insert(header.key.clone(), i);
        self.headers.push(header);
        i
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    pub fn into_headers(self) -> Vec<PivotHeader> {
        self.headers
    }
}

/// Permutation that reorders headers for any axis carrying an explicit
/// sort, comparing header values with the canonical comparator. `None` when
/// no axis sorts (insertion order stands).
pub fn sort_permutation(headers: &[PivotHeader], axes: &[AxisSpec]) -> Option<Vec<usize>> {
    let sorted_axes: Vec<(usize, SortDirection)> = axes
        .iter()
        .enumerate()
        .filter_map(|(i, axis)| axis.sort.map(|direction| (i, direction)))
        .collect();
    if sorted_axes.is_empty() || headers.len() < 2 {
        return None;
    }

    let mut order: Vec<usize> = (0..headers.len()).collect();
    order.sort_by(|&a, &b| {
        for &(axis, direction) in &sorted_axes {
            let (Some(ca), Some(cb)) = (
                headers[a].coordinates.get(axis),
                headers[b].coordinates.get(axis),
            ) else {
                continue;
            };
            let ord = canonical_cmp(&ca.value, &cb.value);
            let ord = match direction {
                SortDirection::Asc => ord,
                SortDirection::Desc => ord.reverse(),
            };
            if ord != Ordering::Equal {
                return ord;
            }
        }
        a.cmp(&b)
    });
    Some(order)
}
