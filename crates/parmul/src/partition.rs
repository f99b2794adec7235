//! Static row partitioning.
//!
//! `chunk = dim / workers`; the first `workers - 1` ranges get exactly
//! `chunk` rows each and the last range takes everything that is left.
//! With more workers than rows the leading ranges are empty.

use core::ops::Range;

use crate::error::{check_workers, element_count, MatmulError, Result};

/// Half-open span of row indices `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRange {
    pub start: usize,
    pub end: usize,
}

impl RowRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn rows(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Ordered, disjoint ranges covering `[0, dim)`, one per worker.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Partition {
    dim: usize,
    ranges: Vec<RowRange>,
}

/// Split `dim` rows across `workers`, remainder to the last worker.
pub fn partition(dim: usize, workers: usize) -> Result<Partition> {
    if dim == 0 {
        return Err(MatmulError::ZeroDimension);
    }
    check_workers(workers)?;

    let chunk = dim / workers;
    let mut ranges = Vec::new();
    ranges
        .try_reserve_exact(workers)
        .map_err(|_| MatmulError::TooManyWorkers { workers })?;
    let mut start = 0;
    for _ in 0..workers - 1 {
        ranges.push(RowRange::new(start, start + chunk));
        start += chunk;
    }
    ranges.push(RowRange::new(start, dim));

    Ok(Partition { dim, ranges })
}

impl Partition {
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn ranges(&self) -> &[RowRange] {
        &self.ranges
    }

    pub fn workers(&self) -> usize {
        self.ranges.len()
    }

    /// The range the coordinating process or thread computes itself.
    pub fn last(&self) -> RowRange {
        // `partition` always emits at least one range
        self.ranges[self.ranges.len() - 1]
    }

    /// Carve a row-major `dim x dim` buffer into one exclusive slice per
    /// range. The slices cannot alias, so workers need no locking.
    pub fn split_rows<'a>(&self, buf: &'a mut [f64]) -> Result<Vec<&'a mut [f64]>> {
        let expected = element_count(self.dim)?;
        if buf.len() != expected {
            return Err(MatmulError::BufferLength {
                expected,
                actual: buf.len(),
            });
        }

        let mut parts = Vec::new();
        parts
            .try_reserve_exact(self.ranges.len())
            .map_err(|_| MatmulError::TooManyWorkers {
                workers: self.ranges.len(),
            })?;
        let mut rest = buf;
        for range in &self.ranges {
            let (head, tail) = core::mem::take(&mut rest).split_at_mut(range.len() * self.dim);
            parts.push(head);
            rest = tail;
        }
        debug_assert!(rest.is_empty());
        Ok(parts)
    }
}

impl<'a> IntoIterator for &'a Partition {
    type Item = &'a RowRange;
    type IntoIter = core::slice::Iter<'a, RowRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(p: &Partition) {
        let mut next = 0;
        for r in p {
            assert_eq!(r.start, next, "gap or overlap at {next}");
            assert!(r.start <= r.end);
            next = r.end;
        }
        assert_eq!(next, p.dim());
    }

    #[test]
    fn test_remainder_goes_last() {
        let p = partition(10, 4).unwrap();
        assert_eq!(
            p.ranges(),
            &[
                RowRange::new(0, 2),
                RowRange::new(2, 4),
                RowRange::new(4, 6),
                RowRange::new(6, 10),
            ]
        );
    }

    #[test]
    fn test_single_worker() {
        let p = partition(7, 1).unwrap();
        assert_eq!(p.ranges(), &[RowRange::new(0, 7)]);
        assert_eq!(p.last(), RowRange::new(0, 7));
    }

    #[test]
    fn test_more_workers_than_rows() {
        let p = partition(3, 5).unwrap();
        assert_eq!(p.workers(), 5);
        assert!(p.ranges()[..4].iter().all(RowRange::is_empty));
        assert_eq!(p.last(), RowRange::new(0, 3));
        assert_covers(&p);
    }

    #[test]
    fn test_coverage_sweep() {
        for dim in 1..40 {
            for workers in 1..12 {
                let p = partition(dim, workers).unwrap();
                assert_eq!(p.workers(), workers);
                assert_covers(&p);
                let chunk = dim / workers;
                for r in &p.ranges()[..workers - 1] {
                    assert_eq!(r.len(), chunk);
                }
                assert_eq!(p.last().len(), dim - chunk * (workers - 1));
            }
        }
    }

    #[test]
    fn test_rejects_zero() {
        assert!(matches!(partition(0, 2), Err(MatmulError::ZeroDimension)));
        assert!(matches!(partition(4, 0), Err(MatmulError::ZeroWorkers)));
    }

    #[test]
    fn test_unallocatable_worker_count() {
        assert!(matches!(
            partition(4, usize::MAX),
            Err(MatmulError::TooManyWorkers { workers: usize::MAX })
        ));
    }

    #[test]
    fn test_split_rows_rejects_oversized_dim() {
        let p = partition(usize::MAX, 1).unwrap();
        let mut buf = vec![0.0; 4];
        assert!(matches!(
            p.split_rows(&mut buf),
            Err(MatmulError::DimensionOverflow { dim: usize::MAX })
        ));
    }

    #[test]
    fn test_split_rows() {
        let p = partition(5, 2).unwrap();
        let mut buf = vec![0.0; 25];
        let parts = p.split_rows(&mut buf).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].len(), 2 * 5);
        assert_eq!(parts[1].len(), 3 * 5);

        let mut short = vec![0.0; 24];
        assert!(p.split_rows(&mut short).is_err());
    }
}
