//! Thin wrappers over filesystem primitives
//!
//! [`blocking`] and [`nonblocking`] expose the same set of operations; pick
//! whichever matches the calling context. None of them resolve paths against
//! the current directory, and every write-oriented operation returns its
//! failure instead of logging it.
//!
//! | operation            | blocking | nonblocking |
//! |----------------------|----------|-------------|
//! | `create_directory`   | yes      | yes         |
//! | `read_text_file`     | yes      | yes         |
//! | `write_text_file`    | yes      | yes         |
//! | `copy_file`          | yes      | yes         |
//! | `copy_directory`     | yes      | yes         |
//! | `remove_path`        | yes      | yes         |
//! | `delete_file`        | yes      | yes         |
//! | `clear_directory`    | yes      | yes         |
//! | `last_modified_time` | yes      | yes         |
//! | `modified_at`        | yes      | yes         |
//! | `is_directory`       | yes      | yes         |
//! | `is_file`            | yes      | yes         |
//! | `parent_dir`         | yes      | no          |

pub mod blocking;
mod error;
pub mod nonblocking;

pub use error::OpsError;

use std::time::SystemTime;

use chrono::{DateTime, SecondsFormat, Utc};

/// ISO-8601 UTC with millisecond precision, e.g. `2024-05-01T12:30:00.123Z`
#[must_use]
pub fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}
