//! Pure domain services with no I/O.

mod slots;
mod transcript;

pub use slots::{
    MAX_RECOMMENDATIONS, WINDOW_END_HOUR, WINDOW_START_HOUR, busy_intervals, find_available_slots,
    merge_busy,
};
pub use transcript::format_transcript;
