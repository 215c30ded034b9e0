pub mod debounce;
pub mod time;

pub use debounce::Debounced;
pub use time::current_time_secs;
