//! Virtualized periodic timer device.
//!
//! The hardware interrupt runs at a fixed 1024 Hz; each session sees its
//! own virtual rate. Every real tick decrements every enabled session's
//! counter, and a session's interrupt flag is raised when its counter
//! reaches zero. A blocked read consumes the flag.

use crate::error::{KResult, KernelError};
use crate::terminal::SESSION_COUNT;

/// Real interrupt rate the virtual periods divide.
pub const TARGET_FREQ: u32 = 1024;
pub const MAX_FREQ: u32 = 8192;
/// Rate installed by the open hook.
pub const DEFAULT_FREQ: u32 = 2;

#[derive(Debug, Clone, Copy)]
struct Channel {
    on: bool,
    ticked: bool,
    counter: u32,
    period: u32,
}

impl Channel {
    const fn idle() -> Channel {
        Channel {
            on: false,
            ticked: false,
            counter: 0,
            period: 0,
        }
    }
}

pub struct RtcDevice {
    channels: [Channel; SESSION_COUNT],
}

impl RtcDevice {
    pub fn new() -> RtcDevice {
        RtcDevice {
            channels: [Channel::idle(); SESSION_COUNT],
        }
    }

    /// One real hardware tick: advance every session's virtual counter.
    pub fn tick(&mut self) {
        for channel in self.channels.iter_mut() {
            if channel.period == 0 {
                continue;
            }
            channel.counter -= 1;
            if channel.counter == 0 {
                channel.ticked = true;
                channel.counter = channel.period;
            }
        }
    }

    /// Open hook: enable the session's channel at the default rate.
    pub fn open(&mut self, session: usize) {
        self.channels[session].on = true;
        // The default rate is a valid power of two; this cannot fail.
        let _ = self.set_frequency(session, DEFAULT_FREQ);
    }

    /// Close hook: disable the channel.
    pub fn close(&mut self, session: usize) {
        self.channels[session] = Channel::idle();
    }

    pub fn is_enabled(&self, session: usize) -> bool {
        self.channels[session].on
    }

    /// Install a virtual rate. Only powers of two in 2..=8192 are
    /// accepted.
    pub fn set_frequency(&mut self, session: usize, freq: u32) -> KResult<()> {
        if !(2..=MAX_FREQ).contains(&freq) || !freq.is_power_of_two() {
            return Err(KernelError::InvalidCommand);
        }
        let channel = &mut self.channels[session];
        // Rates above the real interrupt rate saturate to one tick.
        channel.period = (TARGET_FREQ / freq).max(1);
        channel.counter = channel.period;
        Ok(())
    }

    /// Consume the session's pending virtual interrupt, if one fired.
    pub fn consume_tick(&mut self, session: usize) -> bool {
        let channel = &mut self.channels[session];
        if channel.ticked {
            channel.ticked = false;
            true
        } else {
            false
        }
    }
}
