#![forbid(unsafe_code)]

pub mod certificate;
pub mod model;
pub mod notice;
pub mod overview;
pub mod progress;
pub mod quiz;
pub mod time;

pub use notice::{Notice, NoticeKind};
pub use time::Clock;
