// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use thiserror::Error;

/// Convenience type alias for boxed errors returned by worker-ID providers.
pub type BoxDynError = Box<dyn StdError + 'static + Send + Sync>;

/// The error type for this crate.
///
/// Every variant renders as plain text, so errors can be passed through
/// service boundaries (e.g. an HTTP 500 body) without further mapping.
#[derive(Error, Debug)]
pub enum Error {
    #[error(
        "invalid mask config: time({0}) + worker({1}) + sequence({2}) must not exceed 63 bits, \
         with worker <= 32 and sequence <= 16"
    )]
    InvalidMaskConfig(u8, u8, u8),
    #[error("start_time `{0}` is ahead of current time")]
    StartTimeAheadOfCurrentTime(DateTime<Utc>),
    #[error("worker_id returned an error: {0}")]
    WorkerIdFailed(#[source] BoxDynError),
    #[error("over the time limit")]
    OverTimeLimit,
    #[error("clock moved backwards: last elapsed {last}ms, clock reports {observed}ms")]
    ClockMovedBackwards { last: i64, observed: i64 },
    #[error("could not find any private ipv4 address")]
    NoPrivateIPv4,
    #[error("mutex is poisoned (i.e. a panic happened while it was locked)")]
    MutexPoisoned,
}
