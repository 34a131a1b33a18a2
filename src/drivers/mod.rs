pub mod rtc;

pub use rtc::RtcDevice;
