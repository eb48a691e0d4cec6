//! Recombining triangular lattice storage and the stock-price builder.
//!
//! A node is addressed by `(step, node)` with `0 <= node <= step`, where
//! `node` counts down-moves taken by `step`. All paths with the same number
//! of up- and down-moves land on the same node, so a lattice over `n`
//! periods holds `(n + 1)(n + 2) / 2` values in one flat buffer.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};

use crate::math::{pow_decimal, safe_mul};
use crate::types::{Factor, Money};

/// Number of nodes in a lattice spanning `periods` steps.
pub fn node_count(periods: usize) -> usize {
    (periods + 1) * (periods + 2) / 2
}

#[inline]
fn offset(step: usize, node: usize) -> usize {
    step * (step + 1) / 2 + node
}

/// Flat triangular arena indexed by `(step, node)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice<T> {
    periods: usize,
    values: Vec<T>,
}

impl<T: Clone> Lattice<T> {
    /// Lattice with every node set to `value`.
    pub fn filled(periods: usize, value: T) -> Self {
        Lattice {
            periods,
            values: vec![value; node_count(periods)],
        }
    }
}

impl<T> Lattice<T> {
    /// Build a lattice by evaluating `f(step, node)` in step-major order.
    pub fn from_fn(periods: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut values = Vec::with_capacity(node_count(periods));
        for step in 0..=periods {
            for node in 0..=step {
                values.push(f(step, node));
            }
        }
        Lattice { periods, values }
    }

    /// Number of periods `n`; the lattice has `n + 1` time layers.
    pub fn periods(&self) -> usize {
        self.periods
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, step: usize, node: usize) -> Option<&T> {
        if step > self.periods || node > step {
            return None;
        }
        self.values.get(offset(step, node))
    }

    /// All nodes of one time layer, ordered by down-move count.
    ///
    /// Panics if `step > periods()`.
    pub fn row(&self, step: usize) -> &[T] {
        assert!(
            step <= self.periods,
            "step {step} beyond lattice of {} periods",
            self.periods
        );
        let start = offset(step, 0);
        &self.values[start..start + step + 1]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> + '_ {
        (0..=self.periods).map(move |step| self.row(step))
    }

    /// `((step, node), value)` pairs in step-major order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = ((usize, usize), &T)> + '_ {
        (0..=self.periods)
            .flat_map(|step| (0..=step).map(move |node| (step, node)))
            .zip(self.values.iter())
    }

    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Lattice<U> {
        Lattice {
            periods: self.periods,
            values: self.values.iter().map(f).collect(),
        }
    }
}

impl<T> Index<(usize, usize)> for Lattice<T> {
    type Output = T;

    fn index(&self, (step, node): (usize, usize)) -> &T {
        match self.get(step, node) {
            Some(v) => v,
            None => panic!(
                "node ({step}, {node}) outside lattice of {} periods",
                self.periods
            ),
        }
    }
}

impl<T> IndexMut<(usize, usize)> for Lattice<T> {
    fn index_mut(&mut self, (step, node): (usize, usize)) -> &mut T {
        let periods = self.periods;
        if step > periods || node > step {
            panic!("node ({step}, {node}) outside lattice of {periods} periods");
        }
        &mut self.values[offset(step, node)]
    }
}

/// Shape error when rebuilding a lattice from nested rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatticeShapeError {
    pub row: usize,
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for LatticeShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lattice row {} has {} nodes, expected {}",
            self.row, self.found, self.expected
        )
    }
}

impl std::error::Error for LatticeShapeError {}

impl<T> TryFrom<Vec<Vec<T>>> for Lattice<T> {
    type Error = LatticeShapeError;

    fn try_from(rows: Vec<Vec<T>>) -> Result<Self, Self::Error> {
        if rows.is_empty() {
            return Err(LatticeShapeError {
                row: 0,
                expected: 1,
                found: 0,
            });
        }
        let periods = rows.len() - 1;
        let mut values = Vec::with_capacity(node_count(periods));
        for (step, row) in rows.into_iter().enumerate() {
            if row.len() != step + 1 {
                return Err(LatticeShapeError {
                    row: step,
                    expected: step + 1,
                    found: row.len(),
                });
            }
            values.extend(row);
        }
        Ok(Lattice { periods, values })
    }
}

// Serialised as nested rows: [[v00], [v10, v11], ...]
impl<T: Serialize> Serialize for Lattice<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.periods + 1))?;
        for row in self.rows() {
            seq.serialize_element(row)?;
        }
        seq.end()
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Lattice<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Vec<T>>::deserialize(deserializer)?;
        Lattice::try_from(rows).map_err(de::Error::custom)
    }
}

/// Stock price at `(step, node)`: `S0 * u^(step - node) * d^node`.
pub fn node_price(spot: Money, up: Factor, down: Factor, step: usize, node: usize) -> Money {
    let ups = (step - node) as u32;
    let downs = node as u32;
    safe_mul(safe_mul(spot, pow_decimal(up, ups)), pow_decimal(down, downs))
}

/// Build the full recombining stock-price lattice over `periods` steps.
pub fn build_stock_lattice(spot: Money, up: Factor, down: Factor, periods: usize) -> Lattice<Money> {
    Lattice::from_fn(periods, |step, node| node_price(spot, up, down, step, node))
}
