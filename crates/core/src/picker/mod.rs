//! Random "spin the wheel" selection over fetched restaurants.

mod config;
mod spin;

pub use config::PickerConfig;
pub use spin::{Picker, SpinHandle};
