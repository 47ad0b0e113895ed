//! N x N grid of quantized depth scatter plots packed into one bit array.
//!
//! Cell `(i, j)` is a `bit_size` square where bit `(x, y)` is set once sample `i` was seen at
//! quantized depth `x` while sample `j` was at quantized depth `y`. Bits are only ever set,
//! so the matrix records which depth pairs occurred, not how often.

use bitvec::prelude::*;

use crate::ledger::{DepthEntry, DepthSink};

/// Quantization steps per cell: no more than the depth range can tell apart, and no more than
/// the pixels a cell gets in the final image.
pub fn compute_bit_size(min_depth: u32, max_depth: u32, pixels_per_sample: f64) -> usize {
    let range = max_depth.saturating_sub(min_depth) as usize;
    let pixels = pixels_per_sample.ceil().max(0.0) as usize;
    range.min(pixels).max(1)
}

#[derive(Debug, Clone)]
pub struct BitSampleMatrix {
    bits: BitVec<u64, Lsb0>,
    n_samples: usize,
    bit_size: usize,
    min_depth: u32,
    max_depth: u32,
}

impl BitSampleMatrix {
    pub fn new(n_samples: usize, bit_size: usize, min_depth: u32, max_depth: u32) -> Self {
        let width = n_samples * bit_size;
        BitSampleMatrix {
            bits: bitvec![u64, Lsb0; 0; width * width],
            n_samples,
            bit_size,
            min_depth,
            max_depth,
        }
    }

    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    pub fn bit_size(&self) -> usize {
        self.bit_size
    }

    /// Side of the whole bit square
    pub fn width(&self) -> usize {
        self.n_samples * self.bit_size
    }

    /// Allocated storage in bytes
    pub fn byte_size(&self) -> usize {
        self.bits.as_raw_slice().len() * std::mem::size_of::<u64>()
    }

    /// Flat index of bit `(x, y)` in cell `(i, j)`, row-major over the whole square.
    #[inline]
    pub fn cell_offset(&self, i: usize, j: usize, x: usize, y: usize) -> usize {
        (i * self.bit_size + x) + (j * self.bit_size + y) * self.width()
    }

    /// Bit coordinate of `depth`, `None` outside `[min_depth, max_depth)`.
    #[inline]
    pub fn quantize(&self, depth: u32) -> Option<usize> {
        if depth < self.min_depth || depth >= self.max_depth {
            return None;
        }
        let range = (self.max_depth - self.min_depth) as u64;
        let relative = (depth - self.min_depth) as u64;
        Some((relative * self.bit_size as u64 / range) as usize)
    }

    pub fn get(&self, i: usize, j: usize, x: usize, y: usize) -> bool {
        self.bits[self.cell_offset(i, j, x, y)]
    }

    /// Mark depth pair `(di, dj)` in cell `(i, j)` only. Returns `false` when either depth is
    /// out of range.
    pub fn set_depth(&mut self, i: usize, j: usize, di: u32, dj: u32) -> bool {
        match (self.quantize(di), self.quantize(dj)) {
            (Some(x), Some(y)) => {
                let offset = self.cell_offset(i, j, x, y);
                self.bits.set(offset, true);
                true
            }
            _ => false,
        }
    }

    /// Paint one position: every sample pair, in both orientations.
    pub fn paint(&mut self, depths: &[u32]) {
        let n = self.n_samples.min(depths.len());
        for i in 0..n {
            for j in i..n {
                if self.set_depth(i, j, depths[i], depths[j]) && i != j {
                    self.set_depth(j, i, depths[j], depths[i]);
                }
            }
        }
    }

    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }

    /// Set bits of cell `(i, j)` as `(x, y)`, row by row.
    pub fn iter_cell(&self, i: usize, j: usize) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.bit_size).flat_map(move |y| {
            let row = self.cell_offset(i, j, 0, y);
            self.bits[row..row + self.bit_size]
                .iter_ones()
                .map(move |x| (x, y))
        })
    }
}

impl DepthSink for BitSampleMatrix {
    fn flush(&mut self, entry: &DepthEntry) {
        self.paint(&entry.depths);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(0, 10, 7.0, 7)]
    #[case(0, 10, 6.2, 7)]
    #[case(0, 4, 500.0, 4)]
    #[case(10, 1000, 49.9, 50)]
    #[case(0, 1000, 0.3, 1)]
    #[case(0, 1000, 0.0, 1)]
    fn test_compute_bit_size(
        #[case] min_depth: u32,
        #[case] max_depth: u32,
        #[case] pixels: f64,
        #[case] expected: usize,
    ) {
        assert_eq!(compute_bit_size(min_depth, max_depth, pixels), expected);
    }

    #[rstest]
    fn test_quantize_is_relative_to_min_depth() {
        let matrix = BitSampleMatrix::new(1, 5, 10, 20);
        assert_eq!(matrix.quantize(9), None);
        assert_eq!(matrix.quantize(10), Some(0));
        assert_eq!(matrix.quantize(11), Some(0));
        assert_eq!(matrix.quantize(12), Some(1));
        assert_eq!(matrix.quantize(19), Some(4));
        assert_eq!(matrix.quantize(20), None);
    }

    #[rstest]
    fn test_cell_offset_layout() {
        let matrix = BitSampleMatrix::new(3, 4, 0, 100);
        assert_eq!(matrix.width(), 12);
        assert_eq!(matrix.cell_offset(0, 0, 0, 0), 0);
        assert_eq!(matrix.cell_offset(1, 0, 0, 0), 4);
        assert_eq!(matrix.cell_offset(0, 1, 0, 0), 48);
        assert_eq!(matrix.cell_offset(2, 2, 3, 3), 143);
    }

    #[rstest]
    #[case(vec![5, 17, 0])]
    #[case(vec![99, 0, 42])]
    fn test_paint_is_symmetric_and_idempotent(#[case] depths: Vec<u32>) {
        let mut matrix = BitSampleMatrix::new(3, 10, 0, 100);
        matrix.paint(&depths);
        let once = matrix.count_ones();
        matrix.paint(&depths);
        assert_eq!(matrix.count_ones(), once);

        for i in 0..3 {
            for j in 0..3 {
                let x = matrix.quantize(depths[i]).unwrap();
                let y = matrix.quantize(depths[j]).unwrap();
                assert!(matrix.get(i, j, x, y));
                assert!(matrix.get(j, i, y, x));
            }
        }
    }

    #[rstest]
    #[case(vec![3, 4])]
    #[case(vec![4, 3])]
    #[case(vec![1, 9])]
    fn test_out_of_range_pair_sets_nothing(#[case] depths: Vec<u32>) {
        let mut matrix = BitSampleMatrix::new(2, 4, 2, 4);
        matrix.paint(&depths);
        assert_eq!(matrix.iter_cell(0, 1).count(), 0);
        assert_eq!(matrix.iter_cell(1, 0).count(), 0);
    }

    #[rstest]
    fn test_shared_position_lights_one_bit_per_pair() {
        let bit_size = compute_bit_size(0, 4, 7.0);
        let mut matrix = BitSampleMatrix::new(2, bit_size, 0, 4);
        matrix.flush(&DepthEntry {
            reference_id: 0,
            position: 1,
            depths: vec![3, 3],
        });

        let q = 3 * bit_size / 4;
        assert_eq!(matrix.iter_cell(0, 1).collect::<Vec<_>>(), vec![(q, q)]);
        assert_eq!(matrix.iter_cell(1, 0).collect::<Vec<_>>(), vec![(q, q)]);
    }

    #[rstest]
    fn test_iter_cell_reports_coordinates() {
        let mut matrix = BitSampleMatrix::new(2, 10, 0, 10);
        matrix.set_depth(1, 0, 7, 2);
        assert_eq!(matrix.iter_cell(1, 0).collect::<Vec<_>>(), vec![(7, 2)]);
        assert_eq!(matrix.iter_cell(0, 1).count(), 0);
        assert_eq!(matrix.count_ones(), 1);
    }
}
