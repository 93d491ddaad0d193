//! Splitting index ranges into work chunks.
//!
//! Parallel passes over the vertices hand every worker one contiguous
//! [`WorkChunk`]. The chunks of a partition cover `[0, N)` exactly once, so
//! results keyed by index can be merged without any coordination.

use std::ops::Range;

use crate::error::{MeshError, Result};

/// A contiguous range of object indices assigned to one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkChunk {
    range: Range<usize>,
}

impl WorkChunk {
    /// First index of the chunk.
    #[inline]
    pub fn start(&self) -> usize {
        self.range.start
    }

    /// One past the last index of the chunk.
    #[inline]
    pub fn end(&self) -> usize {
        self.range.end
    }

    /// Number of indices in the chunk.
    #[inline]
    pub fn len(&self) -> usize {
        self.range.len()
    }

    /// Check if the chunk has no indices.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    /// The indices of the chunk.
    #[inline]
    pub fn indices(&self) -> Range<usize> {
        self.range.clone()
    }
}

/// Split `objects` indices into `groups` contiguous chunks.
///
/// Every chunk but the last holds `floor(objects / groups)` indices and the
/// last one also takes the remainder. With more groups than objects the
/// leading chunks are empty.
///
/// # Errors
///
/// [`MeshError::InvalidPartition`] if either count is zero.
///
/// # Example
///
/// ```
/// use surflap::algo::chunks::distribute;
///
/// let chunks = distribute(10, 3).unwrap();
/// let sizes: Vec<usize> = chunks.iter().map(|c| c.len()).collect();
/// assert_eq!(sizes, vec![3, 3, 4]);
/// ```
pub fn distribute(objects: usize, groups: usize) -> Result<Vec<WorkChunk>> {
    if objects < 1 || groups < 1 {
        return Err(MeshError::InvalidPartition { objects, groups });
    }

    let chunk_size = objects / groups;
    let chunks: Vec<WorkChunk> = (0..groups)
        .map(|g| {
            let start = g * chunk_size;
            let end = if g + 1 == groups { objects } else { start + chunk_size };
            WorkChunk { range: start..end }
        })
        .collect();

    let covered: usize = chunks.iter().map(WorkChunk::len).sum();
    if covered != objects {
        return Err(MeshError::InvalidPartition { objects, groups });
    }

    Ok(chunks)
}
