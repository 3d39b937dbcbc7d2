//! Pomodoro timer: a work/break state machine and a one-second driver.

pub mod driver;
pub mod timer;

pub use driver::PomodoroDriver;
pub use timer::{Phase, PomodoroEvent, PomodoroSnapshot, PomodoroTimer};
