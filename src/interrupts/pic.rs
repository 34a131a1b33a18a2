/// Hardware interrupt line numbers the core cares about.
pub type IrqLine = u8;

pub const TIMER_LINE: IrqLine = 0;
pub const KEYBOARD_LINE: IrqLine = 1;
pub const RTC_LINE: IrqLine = 8;

/// The interrupt-controller driver, consumed through this narrow
/// surface. Handlers must acknowledge their line before returning.
pub trait InterruptController {
    fn enable(&mut self, line: IrqLine);
    fn disable(&mut self, line: IrqLine);
    fn acknowledge(&mut self, line: IrqLine);
}

/// Controller for platforms that wire masking and acknowledgment
/// elsewhere.
pub struct SilentPic;

impl InterruptController for SilentPic {
    fn enable(&mut self, _line: IrqLine) {}
    fn disable(&mut self, _line: IrqLine) {}
    fn acknowledge(&mut self, _line: IrqLine) {}
}
