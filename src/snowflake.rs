use crate::builder::Builder;
use crate::error::*;
use crate::mask::BitLayout;
use chrono::prelude::*;
use std::{
    hint,
    sync::{Arc, Mutex},
};

/// Default epoch: 2018-01-01T00:00:00Z, in milliseconds since the Unix epoch.
/// Elapsed time in the ID's time field is measured from this instant unless
/// a custom start time is supplied at construction.
pub const DEFAULT_EPOCH_MS: i64 = 1_514_764_800_000;

/// Mutable clock/sequence state of a generator.
/// This struct is not exposed to the public.
#[derive(Debug)]
pub(crate) struct Internals {
    /// Milliseconds since the epoch at which the last ID was minted.
    /// Monotonic non-decreasing for the generator's lifetime.
    pub(crate) elapsed: i64,
    /// Counter within the current millisecond slot.
    pub(crate) sequence: u16,
    /// Set once a clock regression is observed; sticky.
    pub(crate) poisoned: bool,
}

/// State shared between cloned Snowflake handles.
/// This struct is not exposed to the public.
pub(crate) struct SharedSnowflake {
    /// Epoch in milliseconds since the Unix epoch.
    pub(crate) epoch: i64,
    pub(crate) worker_id: u32,
    pub(crate) layout: BitLayout,
    pub(crate) internals: Mutex<Internals>,
}

/// Snowflake is a distributed unique ID generator.
/// It is thread-safe and can be cloned to be used in multiple threads.
pub struct Snowflake(pub(crate) Arc<SharedSnowflake>);

/// Lower and upper bound of a contiguous block of identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange {
    pub lower: u64,
    pub upper: u64,
}

impl IdRange {
    /// Number of identifiers covered by this range.
    pub fn len(&self) -> u64 {
        self.upper - self.lower + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Snowflake {
    /// Create a new Snowflake with the default configuration.
    /// For custom configuration see [`builder`].
    ///
    /// [`builder`]: struct.Snowflake.html#method.builder
    pub fn new() -> Result<Self, Error> {
        Builder::new().finalize()
    }

    /// Create a new [`Builder`] to construct a Snowflake.
    ///
    /// [`Builder`]: struct.Builder.html
    pub fn builder<'a>() -> Builder<'a> {
        Builder::new()
    }

    pub(crate) fn new_inner(shared: Arc<SharedSnowflake>) -> Self {
        Self(shared)
    }

    /// The worker identifier this generator stamps into every ID.
    pub fn worker_id(&self) -> u32 {
        self.0.worker_id
    }

    /// Generate the next unique id.
    ///
    /// Returns [`Error::OverTimeLimit`] once the time field's bit width is
    /// exhausted, and [`Error::ClockMovedBackwards`] if the system clock
    /// regresses past the last observed millisecond. Both conditions are
    /// terminal for this instance.
    pub fn next_id(&self) -> Result<u64, Error> {
        let mut internals = self.0.internals.lock().map_err(|_| Error::MutexPoisoned)?;
        self.advance(&mut internals)?;
        self.assemble(&internals)
    }

    /// Generate one full millisecond slot of identifiers.
    ///
    /// Returns exactly `2^sequence_bits` contiguous IDs sharing the same
    /// time and worker fields, with sequence values `0..=max` in order. If
    /// the current millisecond is partially consumed, the call waits for
    /// the next one rather than re-issue sequence values.
    pub fn next_ids(&self) -> Result<Vec<u64>, Error> {
        let mut internals = self.0.internals.lock().map_err(|_| Error::MutexPoisoned)?;
        self.claim_full_slot(&mut internals)?;
        let base = self.assemble(&internals)?;
        let count = u64::from(self.0.layout.sequence_mask) + 1;
        let ids = (0..count).map(|seq| base | seq).collect();
        internals.sequence = self.0.layout.sequence_mask;
        Ok(ids)
    }

    /// Like [`next_ids`], but returns only the bounds of the claimed slot.
    /// Every value in `lower..=upper` is a valid, reserved identifier,
    /// suitable for handing a block of IDs to a downstream consumer
    /// without per-item synchronization.
    ///
    /// [`next_ids`]: Snowflake::next_ids
    pub fn next_id_range(&self) -> Result<IdRange, Error> {
        let mut internals = self.0.internals.lock().map_err(|_| Error::MutexPoisoned)?;
        self.claim_full_slot(&mut internals)?;
        let lower = self.assemble(&internals)?;
        internals.sequence = self.0.layout.sequence_mask;
        let upper = self.assemble(&internals)?;
        Ok(IdRange { lower, upper })
    }

    /// Materializes [`next_id_range`] as a list of identifiers.
    ///
    /// [`next_id_range`]: Snowflake::next_id_range
    pub fn next_id_range_fill(&self) -> Result<Vec<u64>, Error> {
        self.next_ids()
    }

    /// Reserve `size` identifiers as a list of contiguous sub-ranges,
    /// splitting across millisecond slots as needed. A `size` of zero
    /// reserves one full slot's worth (`2^sequence_bits` IDs).
    pub fn next_id_ranges(&self, size: u16) -> Result<Vec<IdRange>, Error> {
        let mut internals = self.0.internals.lock().map_err(|_| Error::MutexPoisoned)?;
        let top = self.0.layout.sequence_mask;
        let bulk = if size == 0 {
            u32::from(top) + 1
        } else {
            u32::from(size)
        };

        let mut count: u32 = 0;
        let mut ranges = Vec::with_capacity(4);
        while count < bulk {
            self.advance(&mut internals)?;
            let lower = self.assemble(&internals)?;

            // Identifiers still available in this slot, current one included.
            let avail = u32::from(top - internals.sequence) + 1;
            let take = avail.min(bulk - count);
            internals.sequence += (take - 1) as u16;
            let upper = self.assemble(&internals)?;

            count += take;
            ranges.push(IdRange { lower, upper });
        }
        Ok(ranges)
    }

    /// Generate `size` identifiers one by one.
    pub fn next_id_batch(&self, size: usize) -> Result<Vec<u64>, Error> {
        let mut ids = Vec::with_capacity(size);
        for _ in 0..size {
            ids.push(self.next_id()?);
        }
        Ok(ids)
    }

    /// Break an identifier produced by this generator (or one sharing its
    /// bit layout) into its parts.
    pub fn decompose(&self, id: u64) -> DecomposedId {
        let layout = &self.0.layout;
        DecomposedId {
            id,
            time: (id >> layout.shift_time) & layout.time_mask,
            worker_id: (id >> layout.shift_worker) & u64::from(layout.worker_mask),
            sequence: id & u64::from(layout.sequence_mask),
        }
    }

    /// Advance the clock/sequence state machine by one identifier.
    ///
    /// Runs steps 1-4 of the generation algorithm: sample the clock, poison
    /// the instance on regression, increment the sequence within the same
    /// millisecond (spinning past exhausted slots), or reset it on a fresh
    /// one. The caller must hold the internals lock for the whole
    /// advance+assemble pair.
    fn advance(&self, internals: &mut Internals) -> Result<(), Error> {
        let mut now = current_elapsed_ms(self.0.epoch);
        if internals.poisoned {
            return Err(Error::ClockMovedBackwards {
                last: internals.elapsed,
                observed: now,
            });
        }
        if now < internals.elapsed {
            internals.poisoned = true;
            return Err(Error::ClockMovedBackwards {
                last: internals.elapsed,
                observed: now,
            });
        }

        if now == internals.elapsed {
            internals.sequence = internals.sequence.wrapping_add(1) & self.0.layout.sequence_mask;
            if internals.sequence == 0 {
                // Sequence space of this millisecond is spent. Bounded
                // sub-millisecond spin until the clock ticks over.
                while now <= internals.elapsed {
                    hint::spin_loop();
                    now = current_elapsed_ms(self.0.epoch);
                }
            }
        } else {
            internals.sequence = 0;
        }
        internals.elapsed = now;
        Ok(())
    }

    /// Position the state at sequence 0 of an unconsumed millisecond slot.
    fn claim_full_slot(&self, internals: &mut Internals) -> Result<(), Error> {
        self.advance(internals)?;
        if internals.sequence != 0 {
            let mut now = current_elapsed_ms(self.0.epoch);
            while now <= internals.elapsed {
                hint::spin_loop();
                now = current_elapsed_ms(self.0.epoch);
            }
            internals.elapsed = now;
            internals.sequence = 0;
        }
        Ok(())
    }

    /// Pack the current state into an identifier: time, worker, sequence,
    /// most significant first. `elapsed` only ever grows, so once the time
    /// field overflows every later call fails the same way.
    fn assemble(&self, internals: &Internals) -> Result<u64, Error> {
        let layout = &self.0.layout;
        if internals.elapsed as u64 > layout.time_mask {
            return Err(Error::OverTimeLimit);
        }
        Ok((internals.elapsed as u64) << layout.shift_time
            | u64::from(self.0.worker_id) << layout.shift_worker
            | u64::from(internals.sequence))
    }
}

/// Returns a new `Snowflake` referencing the same state as `self`.
/// This is used for concurrent use.
impl Clone for Snowflake {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

/// Convert a `DateTime<Utc>` to milliseconds since the Unix epoch.
pub(crate) fn to_unix_millis(time: DateTime<Utc>) -> i64 {
    time.timestamp_millis()
}

/// Milliseconds elapsed since the given epoch.
fn current_elapsed_ms(epoch_ms: i64) -> i64 {
    Utc::now().timestamp_millis() - epoch_ms
}

/// The parts of an identifier, as recovered by [`Snowflake::decompose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecomposedId {
    pub id: u64,
    pub time: u64,
    pub worker_id: u64,
    pub sequence: u64,
}

impl DecomposedId {
    /// Absolute timestamp of this identifier in milliseconds since the
    /// Unix epoch, given the epoch the generator was constructed with.
    pub fn unix_millis(&self, epoch_ms: i64) -> i64 {
        epoch_ms + self.time as i64
    }
}
