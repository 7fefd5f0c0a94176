use crate::Snowflake;
use crate::error::{BoxDynError, Error};
use crate::mask::{BitLayout, MaskConfig};
use crate::snowflake::{DEFAULT_EPOCH_MS, Internals, SharedSnowflake, to_unix_millis};
use chrono::prelude::*;
use std::sync::{Arc, Mutex};

/// A builder for building the ['Snowflake'] generator.
///
/// [`Snowflake`]: struct.Snowflake.html
pub struct Builder<'a> {
    start_time: Option<DateTime<Utc>>,
    worker_id: Option<&'a dyn Fn() -> Result<u16, BoxDynError>>,
    mask_config: MaskConfig,
}

impl<'a> Default for Builder<'a> {
    fn default() -> Self {
        Builder::new()
    }
}

impl<'a> Builder<'a> {
    /// Construct a new builder for the build of ['Snowflake'].
    ///
    /// [`Snowflake`]: struct.Snowflake.html
    pub fn new() -> Self {
        Self {
            start_time: None,
            worker_id: None,
            mask_config: MaskConfig::default(),
        }
    }

    /// Set the start time (the epoch the time field is measured from).
    /// If the time is set later than the current time, 'finalize' will fail.
    pub fn start_time(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Set the worker-ID provider.
    /// If the provided closure returns an error, 'finalize' will fail.
    pub fn worker_id(mut self, worker_id: &'a dyn Fn() -> Result<u16, BoxDynError>) -> Self {
        self.worker_id = Some(worker_id);
        self
    }

    /// Set the bit widths of the time, worker and sequence fields.
    /// Invalid widths make 'finalize' fail.
    pub fn mask_config(mut self, mask_config: MaskConfig) -> Self {
        self.mask_config = mask_config;
        self
    }

    /// Finish building and create a Snowflake instance.
    ///
    /// Validates the mask config and start time, then invokes the worker-ID
    /// provider exactly once. A provider value wider than the configured
    /// worker bits is rejected here rather than silently truncated, since
    /// truncation would let logically distinct workers collide.
    pub fn finalize(self) -> Result<Snowflake, Error> {
        let mask = self.mask_config;
        if !mask.is_valid() {
            return Err(Error::InvalidMaskConfig(
                mask.time_bits,
                mask.worker_bits,
                mask.sequence_bits,
            ));
        }
        let layout = BitLayout::derive(&mask);

        let epoch = if let Some(start_time) = self.start_time {
            if start_time > Utc::now() {
                return Err(Error::StartTimeAheadOfCurrentTime(start_time));
            }
            to_unix_millis(start_time)
        } else {
            DEFAULT_EPOCH_MS
        };

        let worker_id = match self.worker_id {
            Some(worker_id_fn) => worker_id_fn().map_err(Error::WorkerIdFailed)?,
            None => default_worker_id()?,
        };

        if u32::from(worker_id) > layout.worker_mask {
            return Err(Error::WorkerIdFailed(
                format!(
                    "worker ID {} is greater than the max allowed value {}",
                    worker_id, layout.worker_mask
                )
                .into(),
            ));
        }

        let shared = Arc::new(SharedSnowflake {
            epoch,
            worker_id: u32::from(worker_id),
            layout,
            internals: Mutex::new(Internals {
                elapsed: 0,
                // Max value forces a fresh-slot reset on the first call.
                sequence: layout.sequence_mask,
                poisoned: false,
            }),
        });
        Ok(Snowflake::new_inner(shared))
    }
}

#[cfg(feature = "ip-fallback")]
fn default_worker_id() -> Result<u16, Error> {
    crate::worker_id::lower16_bit_private_ip().map_err(|_| Error::NoPrivateIPv4)
}

#[cfg(not(feature = "ip-fallback"))]
fn default_worker_id() -> Result<u16, Error> {
    Err(Error::WorkerIdFailed(
        "worker ID not provided and `ip-fallback` feature is disabled".into(),
    ))
}
