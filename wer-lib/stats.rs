//! Word counts and word error rate.

use std::{
  iter::Sum,
  ops::Add,
};

use serde::Serialize;

use crate::segment::Line;

/// Counts over non-excluded segments.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
  pub total_count: usize,
  pub error_count: usize,
}

impl Stats {
  pub fn for_line(line: &Line) -> Self {
    line
      .segments
      .iter()
      .filter(|segment| segment.is_counted())
      .fold(Self::default(), |acc, segment| Self {
        total_count: acc.total_count + 1,
        error_count: acc.error_count + usize::from(segment.is_error),
      })
  }

  pub fn for_lines(lines: &[Line]) -> Self {
    lines.iter().map(Self::for_line).sum()
  }

  /// Error rate in percent; 0 when nothing is counted.
  pub fn wer(&self) -> f64 {
    if self.total_count == 0 {
      0.0
    } else {
      self.error_count as f64 * 100.0 / self.total_count as f64
    }
  }
}

impl Add for Stats {
  type Output = Stats;

  fn add(self, rhs: Self) -> Self::Output {
    Stats {
      total_count: self.total_count + rhs.total_count,
      error_count: self.error_count + rhs.error_count,
    }
  }
}

impl Sum for Stats {
  fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
    iter.fold(Stats::default(), Add::add)
  }
}
