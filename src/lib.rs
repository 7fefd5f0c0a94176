//! A distributed unique ID generator inspired by [Twitter's Snowflake],
//! with a configurable bit layout.
//!
//! An identifier packs an elapsed-time field, a worker ID and a
//! per-millisecond sequence counter into one 64-bit integer, so IDs sort
//! by creation order and never collide across nodes with distinct worker
//! IDs. The partition of the 63 usable bits is configurable via
//! [`MaskConfig`]; the default layout is 39 time bits, 16 worker bits and
//! 8 sequence bits.
//!
//! ## Quickstart
//!
//! Add the following to your `Cargo.toml`:
//! ```toml
//! [dependencies]
//! kflake = "0.2"
//! ```
//!
//! Use the library like this:
//!
//! ```
//! use kflake::Snowflake;
//!
//! let sf = Snowflake::builder().worker_id(&|| Ok(1)).finalize().unwrap();
//! let next_id = sf.next_id().unwrap();
//! println!("{}", next_id);
//! ```
//!
//! With the `ip-fallback` feature (enabled by default), `Snowflake::new()`
//! derives the worker ID from the lower 16 bits of a private interface
//! address; the [`worker_id`] module has providers for container
//! environments as well.
//!
//! ## Concurrent use
//!
//! Snowflake is thread-safe. `clone` it before moving to another thread:
//! ```
//! use kflake::Snowflake;
//! use std::thread;
//!
//! let sf = Snowflake::builder().worker_id(&|| Ok(1)).finalize().unwrap();
//!
//! let mut children = Vec::new();
//! for _ in 0..10 {
//!     let thread_sf = sf.clone();
//!     children.push(thread::spawn(move || {
//!         println!("{}", thread_sf.next_id().unwrap());
//!     }));
//! }
//!
//! for child in children {
//!     child.join().unwrap();
//! }
//! ```
//!
//! [Twitter's Snowflake]: https://blog.twitter.com/2010/announcing-snowflake

mod builder;
mod error;
mod mask;
mod snowflake;
pub mod worker_id;

#[cfg(feature = "restful")]
pub mod restful;

pub use crate::snowflake::*;
pub use builder::*;
pub use error::*;
pub use mask::MaskConfig;
