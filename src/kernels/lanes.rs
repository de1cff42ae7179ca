//! Lane/tail splitting shared by both kernels.
//!
//! An inner loop of length `len` is cut into `len / LANE` full lanes and a
//! scalar tail of `len % LANE` elements:
//!
//! ```text
//! len = 19, LANE = 8
//! [0 ........ 8 ........ 16 | 16 17 18]
//!  lane        lane          tail
//! ```

use std::ops::Range;

/// `i32` elements per 256-bit vector.
pub const LANE: usize = 8;

/// One lane worth of values, for the portable path.
pub type Lane = [i32; LANE];

/// Where the full lanes stop and the tail begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LaneSplit {
    len: usize,
    main: usize,
}

impl LaneSplit {
    #[inline(always)]
    pub const fn new(len: usize) -> Self {
        Self {
            len,
            main: len - len % LANE,
        }
    }

    pub const fn lanes(&self) -> usize {
        self.main / LANE
    }

    pub const fn tail_len(&self) -> usize {
        self.len - self.main
    }

    /// Elements covered by full lanes.
    pub const fn main_range(&self) -> Range<usize> {
        0..self.main
    }

    pub const fn tail_range(&self) -> Range<usize> {
        self.main..self.len
    }
}

/// Drives a loop over `0..len`: `lane(offset)` once per full lane, then
/// `scalar(index)` for each tail element.
///
/// Both kernels go through this so the split is decided in one place.
#[inline(always)]
pub fn chunked<L, S>(len: usize, mut lane: L, mut scalar: S)
where
    L: FnMut(usize),
    S: FnMut(usize),
{
    let split = LaneSplit::new(len);
    for offset in split.main_range().step_by(LANE) {
        lane(offset);
    }
    for idx in split.tail_range() {
        scalar(idx);
    }
}

/// Copies `LANE` values starting at `offset`.
#[inline(always)]
pub fn load(src: &[i32], offset: usize) -> Lane {
    let mut out = [0; LANE];
    out.copy_from_slice(&src[offset..offset + LANE]);
    out
}

#[inline(always)]
pub fn store(dst: &mut [i32], offset: usize, lane: &Lane) {
    dst[offset..offset + LANE].copy_from_slice(lane);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_boundaries() {
        for (len, lanes, tail) in [(0, 0, 0), (3, 0, 3), (8, 1, 0), (9, 1, 1), (999, 124, 7)] {
            let s = LaneSplit::new(len);
            assert_eq!(s.lanes(), lanes, "len {}", len);
            assert_eq!(s.tail_len(), tail, "len {}", len);
            assert_eq!(s.main_range().end, s.tail_range().start);
            assert_eq!(s.tail_range().end, len);
        }
    }

    #[test]
    fn test_chunked_visits_every_index_once() {
        for len in [0, 1, 7, 8, 9, 16, 17, 3001] {
            let mut seen = vec![0u8; len];
            let mut lane_hits = Vec::new();
            let mut tail_hits = Vec::new();

            chunked(len, |off| lane_hits.push(off), |idx| tail_hits.push(idx));

            for &off in &lane_hits {
                assert_eq!(off % LANE, 0);
                for s in &mut seen[off..off + LANE] {
                    *s += 1;
                }
            }
            for &idx in &tail_hits {
                seen[idx] += 1;
            }
            assert!(seen.iter().all(|&c| c == 1), "len {}", len);
            assert_eq!(tail_hits.len(), len % LANE);
        }
    }
}
