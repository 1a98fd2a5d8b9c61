use std::sync::Arc;

use crate::score::order::PreparedOrder;

/// Exclusive, single-writer statistics buffer of one query being prepared.
///
/// One unit of `order.stats_size()` bytes per distinct statistic unit (one
/// per distinct scored term, or a single field-only unit when no term was
/// promoted). Frozen into [`Stats`] before execute begins.
pub struct StatsBuilder {
    buf: Vec<u8>,
    stride: usize,
}

impl StatsBuilder {
    pub fn new(order: &PreparedOrder, units: usize) -> StatsBuilder {
        let stride = order.stats_size();
        StatsBuilder {
            buf: vec![0u8; stride * units],
            stride,
        }
    }

    /// Exclusive access to the unit with the given index.
    pub fn unit_mut(&mut self, unit: usize) -> &mut [u8] {
        &mut self.buf[unit * self.stride..(unit + 1) * self.stride]
    }

    /// Byte offset of the unit with the given index.
    pub fn unit_offset(&self, unit: usize) -> usize {
        unit * self.stride
    }

    /// Freezes the buffer into its shared, read-only form.
    pub fn freeze(self) -> Stats {
        Stats {
            buf: Arc::from(self.buf),
            stride: self.stride,
        }
    }
}

/// The frozen per-query statistics buffer, handed read-only to every
/// segment's scorer instances. Cheap to clone and share across threads.
#[derive(Clone)]
pub struct Stats {
    buf: Arc<[u8]>,
    stride: usize,
}

impl Stats {
    /// An empty buffer: scoring disabled, or no statistics collected.
    pub fn empty() -> Stats {
        Stats {
            buf: Arc::from(Vec::new()),
            stride: 0,
        }
    }

    /// The statistics unit starting at `offset`, as assigned to a scored
    /// term state during prepare.
    pub fn unit(&self, offset: usize) -> &[u8] {
        &self.buf[offset..offset + self.stride]
    }

    /// Number of units in the buffer.
    pub fn num_units(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.buf.len() / self.stride
        }
    }
}
