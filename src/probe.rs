//! Pin diagnostics run once at boot.
//!
//! A probe drives a pin through a fixed sequence, samples it after a settle
//! delay, prints the outcome and leaves the pin in a defined state: outputs
//! end driven low, inputs end as plain (floating) inputs. Results are
//! advisory only.

use embedded_hal::delay::DelayNs;
use ufmt::{uwriteln, uWrite};

use crate::pinout::{PinGroup, PinInfo};

pub const SETTLE_MS: u32 = 5;
pub const ADC_REFERENCE_MV: u32 = 5000;
pub const ADC_MAX: u32 = 1023;

/// A physical pin whose direction can be changed at run time.
pub trait BoardPin {
    fn number(&self) -> u8;
    /// Output mode, driven to the given level.
    fn set_output(&mut self, high: bool);
    /// Input mode with or without the internal pull-up.
    fn set_input(&mut self, pull_up: bool);
    fn is_high(&mut self) -> bool;
}

/// The probe-able pins the board hands over, looked up by physical number.
pub trait PinBank {
    type Pin: BoardPin;

    fn pin(&mut self, number: u8) -> Option<&mut Self::Pin>;
}

/// ADC access keyed by physical pin number (54..69 on the Mega).
pub trait AnalogInput {
    /// Raw 10-bit sample, `None` when the pin has no channel on this board.
    fn sample(&mut self, number: u8) -> Option<u16>;
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Level {
    Low,
    High,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, Debug)]
pub struct ScanSummary {
    pub probed: u8,
    pub passed: u8,
    pub unavailable: u8,
}

pub fn to_millivolts(raw: u16) -> u16 {
    ((raw.min(ADC_MAX as u16) as u32 * ADC_REFERENCE_MV) / ADC_MAX) as u16
}

/// Drive HIGH and read back. Ends driven LOW.
pub fn probe_output<P, D, W>(pin: &mut P, info: &PinInfo, delay: &mut D, serial: &mut W) -> bool
where
    P: BoardPin,
    D: DelayNs,
    W: uWrite,
{
    pin.set_output(true);
    delay.delay_ms(SETTLE_MS);
    let ok = pin.is_high();
    pin.set_output(false);

    let verdict = if ok { "working correctly" } else { "fault or conflict" };
    uwriteln!(serial, "🌀 {} [Pin {}] → State: {}", info.name, info.number, verdict).ok();
    ok
}

/// Pull-up input: LOW means something holds the pin to ground. Ends as a
/// plain input.
pub fn probe_input<P, D, W>(pin: &mut P, info: &PinInfo, delay: &mut D, serial: &mut W) -> Level
where
    P: BoardPin,
    D: DelayNs,
    W: uWrite,
{
    pin.set_input(true);
    delay.delay_ms(SETTLE_MS);
    let level = if pin.is_high() { Level::High } else { Level::Low };
    pin.set_input(false);

    let verdict = match level {
        Level::Low => "grounded (LOW)",
        Level::High => "no load (HIGH)",
    };
    uwriteln!(serial, "🔍 {} [Pin {}] → State: {}", info.name, info.number, verdict).ok();
    level
}

/// Sample the ADC and report an estimated voltage against the 5 V reference.
pub fn probe_analog<A, D, W>(
    adc: &mut A,
    info: &PinInfo,
    delay: &mut D,
    serial: &mut W,
) -> Option<u16>
where
    A: AnalogInput,
    D: DelayNs,
    W: uWrite,
{
    delay.delay_ms(SETTLE_MS);
    match adc.sample(info.number) {
        Some(raw) => {
            let mv = to_millivolts(raw);
            uwriteln!(serial, "📏 {} [Pin {}] → raw {} ≈ {} mV", info.name, info.number, raw, mv).ok();
            Some(mv)
        }
        None => {
            uwriteln!(serial, "➖ {} [Pin {}] → no ADC channel", info.name, info.number).ok();
            None
        }
    }
}

fn unavailable<W: uWrite>(info: &PinInfo, serial: &mut W) {
    uwriteln!(serial, "➖ {} [Pin {}] → in use, skipped", info.name, info.number).ok();
}

/// Input probe over the GPIO table. A pin counts as passed when it floats HIGH.
pub fn scan_gpio<B, D, W>(bank: &mut B, delay: &mut D, serial: &mut W) -> ScanSummary
where
    B: PinBank,
    D: DelayNs,
    W: uWrite,
{
    uwriteln!(serial, "➡️ Checking digital pins ({}):", PinGroup::Gpio.name()).ok();
    let mut summary = ScanSummary::default();
    for info in PinGroup::Gpio.table() {
        match bank.pin(info.number) {
            Some(pin) => {
                summary.probed += 1;
                if probe_input(pin, info, delay, serial) == Level::High {
                    summary.passed += 1;
                }
            }
            None => {
                summary.unavailable += 1;
                unavailable(info, serial);
            }
        }
    }
    summary
}

/// Output probe over the PWM table.
pub fn scan_pwm<B, D, W>(bank: &mut B, delay: &mut D, serial: &mut W) -> ScanSummary
where
    B: PinBank,
    D: DelayNs,
    W: uWrite,
{
    serial.write_str("\n").ok();
    uwriteln!(serial, "➡️ Checking {} pins:", PinGroup::Pwm.name()).ok();
    let mut summary = ScanSummary::default();
    for info in PinGroup::Pwm.table() {
        match bank.pin(info.number) {
            Some(pin) => {
                summary.probed += 1;
                if probe_output(pin, info, delay, serial) {
                    summary.passed += 1;
                }
            }
            None => {
                summary.unavailable += 1;
                unavailable(info, serial);
            }
        }
    }
    summary
}

pub fn scan_analog<A, D, W>(adc: &mut A, delay: &mut D, serial: &mut W) -> ScanSummary
where
    A: AnalogInput,
    D: DelayNs,
    W: uWrite,
{
    serial.write_str("\n").ok();
    uwriteln!(serial, "➡️ Checking {} pins:", PinGroup::Analog.name()).ok();
    let mut summary = ScanSummary::default();
    for info in PinGroup::Analog.table() {
        match probe_analog(adc, info, delay, serial) {
            Some(_) => {
                summary.probed += 1;
                summary.passed += 1;
            }
            None => summary.unavailable += 1,
        }
    }
    summary
}

/// GPIO, PWM and analog scans in sequence.
pub fn full_pin_diagnostics<B, A, D, W>(bank: &mut B, adc: &mut A, delay: &mut D, serial: &mut W)
where
    B: PinBank,
    A: AnalogInput,
    D: DelayNs,
    W: uWrite,
{
    uwriteln!(serial, "🔧 Initial diagnostic of digital, PWM and analog pins").ok();
    serial.write_str("\n").ok();

    let gpio = scan_gpio(bank, delay, serial);
    let pwm = scan_pwm(bank, delay, serial);
    let analog = scan_analog(adc, delay, serial);

    serial.write_str("\n").ok();
    uwriteln!(
        serial,
        "✅ Diagnostic complete: GPIO {}/{}, PWM {}/{}, ANALOG {}/{}",
        gpio.passed,
        gpio.probed,
        pwm.passed,
        pwm.probed,
        analog.passed,
        analog.probed
    )
    .ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pinout::{find, GPIO, PWM};
    use crate::testing::{Capture, FakeAdc, FakeBank, FakePin, NoDelay, PinMode};

    #[test]
    fn output_probe_ends_driven_low() {
        let mut pin = FakePin::new(5);
        let mut out = Capture::new();
        assert!(probe_output(&mut pin, &PWM[3], &mut NoDelay, &mut out));
        assert_eq!(pin.mode(), PinMode::Output(false));
        assert!(out.text().contains("PIN_PWM_5 [Pin 5] → State: working correctly"));
    }

    #[test]
    fn shorted_output_is_flagged_and_still_restored() {
        let mut pin = FakePin::new(5).tied(false);
        let mut out = Capture::new();
        assert!(!probe_output(&mut pin, &PWM[3], &mut NoDelay, &mut out));
        assert_eq!(pin.mode(), PinMode::Output(false));
        assert!(out.text().contains("fault or conflict"));
    }

    #[test]
    fn input_probe_reads_pull_up_and_ends_floating() {
        let mut pin = FakePin::new(22);
        let mut out = Capture::new();
        assert_eq!(probe_input(&mut pin, &GPIO[0], &mut NoDelay, &mut out), Level::High);
        assert_eq!(pin.mode(), PinMode::Input { pull_up: false });
        assert!(out.text().contains("no load (HIGH)"));
    }

    #[test]
    fn grounded_input_reads_low() {
        let mut pin = FakePin::new(22).tied(false);
        let mut out = Capture::new();
        assert_eq!(probe_input(&mut pin, &GPIO[0], &mut NoDelay, &mut out), Level::Low);
        assert_eq!(pin.mode(), PinMode::Input { pull_up: false });
        assert!(out.text().contains("grounded (LOW)"));
    }

    #[test]
    fn millivolts_follow_the_reference() {
        assert_eq!(to_millivolts(0), 0);
        assert_eq!(to_millivolts(1023), 5000);
        assert_eq!(to_millivolts(512), 2502);
        assert_eq!(to_millivolts(4095), 5000);
    }

    #[test]
    fn analog_probe_reports_voltage() {
        let mut adc = FakeAdc::with(&[(54, 1023)]);
        let mut out = Capture::new();
        let info = find(crate::pinout::PinGroup::Analog, 54).unwrap();
        assert_eq!(probe_analog(&mut adc, info, &mut NoDelay, &mut out), Some(5000));
        assert!(out.text().contains("PIN_A0 [Pin 54] → raw 1023 ≈ 5000 mV"));
    }

    #[test]
    fn gpio_scan_skips_pins_the_board_keeps() {
        let mut bank = FakeBank::new(&[22, 23, 25]);
        bank.get(23).unwrap().tie(false);
        let mut out = Capture::new();
        let summary = scan_gpio(&mut bank, &mut NoDelay, &mut out);
        assert_eq!(summary.probed, 3);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.unavailable as usize, GPIO.len() - 3);
        assert!(out.text().contains("PIN_GPIO_24 [Pin 24] → in use, skipped"));
    }

    #[test]
    fn full_diagnostics_leave_every_pin_in_a_safe_state() {
        let numbers: Vec<u8> = GPIO.iter().chain(PWM.iter()).map(|p| p.number).collect();
        let mut bank = FakeBank::new(&numbers);
        let mut adc = FakeAdc::with(&[(54, 0), (55, 512)]);
        let mut out = Capture::new();
        full_pin_diagnostics(&mut bank, &mut adc, &mut NoDelay, &mut out);

        for info in GPIO {
            assert_eq!(bank.get(info.number).unwrap().mode(), PinMode::Input { pull_up: false });
        }
        for info in PWM {
            assert_eq!(bank.get(info.number).unwrap().mode(), PinMode::Output(false));
        }
        assert!(out.text().contains("GPIO 25/25, PWM 15/15, ANALOG 2/2"));
    }
}
