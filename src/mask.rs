/// How the 63 usable bits of an identifier are partitioned between the
/// time, worker and sequence fields. The most significant (sign) bit is
/// never used, so generated IDs stay representable as non-negative
/// integers everywhere.
///
/// The sum of all widths must not exceed 63; `worker_bits` is capped at
/// 32 and `sequence_bits` at 16.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskConfig {
    pub time_bits: u8,
    pub worker_bits: u8,
    pub sequence_bits: u8,
}

/// Default bit length of the time field.
pub(crate) const DEFAULT_BIT_LEN_TIME: u8 = 39;
/// Default bit length of the worker ID field.
pub(crate) const DEFAULT_BIT_LEN_WORKER: u8 = 16;
/// Default bit length of the sequence field.
pub(crate) const DEFAULT_BIT_LEN_SEQUENCE: u8 = 8;

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            time_bits: DEFAULT_BIT_LEN_TIME,
            worker_bits: DEFAULT_BIT_LEN_WORKER,
            sequence_bits: DEFAULT_BIT_LEN_SEQUENCE,
        }
    }
}

impl MaskConfig {
    pub fn new(time_bits: u8, worker_bits: u8, sequence_bits: u8) -> Self {
        Self {
            time_bits,
            worker_bits,
            sequence_bits,
        }
    }

    /// Whether the configured widths satisfy the layout constraints.
    pub fn is_valid(&self) -> bool {
        let sum = u16::from(self.time_bits)
            + u16::from(self.worker_bits)
            + u16::from(self.sequence_bits);
        self.worker_bits <= 32 && self.sequence_bits <= 16 && sum <= 63
    }
}

/// Per-field masks and shift amounts derived from a valid [`MaskConfig`].
/// Field order, most significant first: time, worker, sequence.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BitLayout {
    pub(crate) time_mask: u64,
    pub(crate) worker_mask: u32,
    pub(crate) sequence_mask: u16,
    pub(crate) shift_time: u8,
    pub(crate) shift_worker: u8,
}

impl BitLayout {
    /// Computes masks and shifts. The config must already be validated.
    pub(crate) fn derive(mask: &MaskConfig) -> Self {
        Self {
            time_mask: ones(mask.time_bits),
            worker_mask: ones(mask.worker_bits) as u32,
            sequence_mask: ones(mask.sequence_bits) as u16,
            shift_time: mask.worker_bits + mask.sequence_bits,
            shift_worker: mask.sequence_bits,
        }
    }
}

/// All-ones mask of the given width. Valid configs keep `bits < 64`.
fn ones(bits: u8) -> u64 {
    if bits == 0 { 0 } else { u64::MAX >> (64 - bits) }
}
