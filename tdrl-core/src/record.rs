//! Types for diagnostics emitted by learners.
//!
//! Every call to [`Learner::learn`](crate::Learner::learn) returns a [`Record`]
//! holding values such as the TD error of the update. Records can be collected
//! with a [`Recorder`].
//!
//! ```rust
//! use tdrl_core::record::{Record, RecordValue};
//!
//! let mut record = Record::empty();
//! record.insert("td_error", RecordValue::Scalar(0.5));
//! record.insert("features", RecordValue::Array1(vec![1.0, 2.0]));
//! assert_eq!(record.get_scalar("td_error").unwrap(), 0.5);
//! ```
mod base;
mod buffered_recorder;
mod null_recorder;
mod recorder;

pub use base::{Record, RecordValue};
pub use buffered_recorder::BufferedRecorder;
pub use null_recorder::NullRecorder;
pub use recorder::Recorder;
