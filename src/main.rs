#![cfg_attr(target_arch = "avr", no_std, no_main)]
// src/main.rs

#[cfg(target_arch = "avr")]
mod board;

#[cfg(target_arch = "avr")]
use {
    arduino_hal::prelude::*,
    arduino_hal::spi,
    board::{AnalogBank, BoardIo, MegaBank, Storage},
    embedded_hal::spi::{Mode, Phase, Polarity},
    mega_rfid_station::config::BAUD_RATE,
    mega_rfid_station::led::{Led, LedColor},
    mega_rfid_station::log::BUILD_STAMP,
    mega_rfid_station::pinout::{ReaderPins, LED_RED},
    mega_rfid_station::uart::ByteSource,
    mega_rfid_station::{banner, eeprom, log_info, probe, uart},
    mega_rfid_station::{CommandLoop, RfidRc522, RfidReader, SpiInterface, SystemConfig},
    panic_halt as _,
};

/// Baud rate used to listen on the secondary UARTs.
#[cfg(target_arch = "avr")]
const PROBE_BAUD: u32 = 9600;
/// Status LED blink half-period.
#[cfg(target_arch = "avr")]
const BLINK_MS: u32 = 500;

#[cfg(target_arch = "avr")]
#[arduino_hal::entry]
fn main() -> ! {
    let config = SystemConfig::from_features();

    let dp = arduino_hal::Peripherals::take().unwrap();
    let pins = arduino_hal::pins!(dp);

    let mut console_port = arduino_hal::default_serial!(dp, pins, BAUD_RATE);
    let serial = &mut console_port;

    banner!(serial, "Arduino Mega 2560 RFID station");
    log_info!(serial, "Build {} of {}", BUILD_STAMP, env!("CARGO_PKG_NAME"));

    let mut delay = arduino_hal::Delay::new();

    // Every probe-able GPIO and PWM pin. UART, SPI and analog pins are wired
    // separately below.
    let mut bank = MegaBank::new([
        Some(BoardIo::new(2, pins.d2.downgrade())),
        Some(BoardIo::new(3, pins.d3.downgrade())),
        Some(BoardIo::new(4, pins.d4.downgrade())),
        Some(BoardIo::new(5, pins.d5.downgrade())),
        Some(BoardIo::new(6, pins.d6.downgrade())),
        Some(BoardIo::new(7, pins.d7.downgrade())),
        Some(BoardIo::new(8, pins.d8.downgrade())),
        Some(BoardIo::new(9, pins.d9.downgrade())),
        Some(BoardIo::new(10, pins.d10.downgrade())),
        Some(BoardIo::new(11, pins.d11.downgrade())),
        Some(BoardIo::new(12, pins.d12.downgrade())),
        Some(BoardIo::new(13, pins.d13.downgrade())),
        Some(BoardIo::new(22, pins.d22.downgrade())),
        Some(BoardIo::new(23, pins.d23.downgrade())),
        Some(BoardIo::new(24, pins.d24.downgrade())),
        Some(BoardIo::new(25, pins.d25.downgrade())),
        Some(BoardIo::new(26, pins.d26.downgrade())),
        Some(BoardIo::new(27, pins.d27.downgrade())),
        Some(BoardIo::new(28, pins.d28.downgrade())),
        Some(BoardIo::new(29, pins.d29.downgrade())),
        Some(BoardIo::new(30, pins.d30.downgrade())),
        Some(BoardIo::new(31, pins.d31.downgrade())),
        Some(BoardIo::new(32, pins.d32.downgrade())),
        Some(BoardIo::new(33, pins.d33.downgrade())),
        Some(BoardIo::new(34, pins.d34.downgrade())),
        Some(BoardIo::new(35, pins.d35.downgrade())),
        Some(BoardIo::new(36, pins.d36.downgrade())),
        Some(BoardIo::new(37, pins.d37.downgrade())),
        Some(BoardIo::new(38, pins.d38.downgrade())),
        Some(BoardIo::new(39, pins.d39.downgrade())),
        Some(BoardIo::new(40, pins.d40.downgrade())),
        Some(BoardIo::new(41, pins.d41.downgrade())),
        Some(BoardIo::new(42, pins.d42.downgrade())),
        Some(BoardIo::new(43, pins.d43.downgrade())),
        Some(BoardIo::new(44, pins.d44.downgrade())),
        Some(BoardIo::new(45, pins.d45.downgrade())),
        Some(BoardIo::new(46, pins.d46.downgrade())),
        Some(BoardIo::new(47, pins.d47.downgrade())),
        Some(BoardIo::new(48, pins.d48.downgrade())),
        Some(BoardIo::new(49, pins.d49.downgrade())),
    ]);

    if config.diagnostics {
        let mut adc = arduino_hal::Adc::new(dp.ADC, Default::default());
        let channels = [
            pins.a0.into_analog_input(&mut adc).into_channel(),
            pins.a1.into_analog_input(&mut adc).into_channel(),
            pins.a2.into_analog_input(&mut adc).into_channel(),
            pins.a3.into_analog_input(&mut adc).into_channel(),
            pins.a4.into_analog_input(&mut adc).into_channel(),
            pins.a5.into_analog_input(&mut adc).into_channel(),
            pins.a6.into_analog_input(&mut adc).into_channel(),
            pins.a7.into_analog_input(&mut adc).into_channel(),
            pins.a8.into_analog_input(&mut adc).into_channel(),
            pins.a9.into_analog_input(&mut adc).into_channel(),
            pins.a10.into_analog_input(&mut adc).into_channel(),
            pins.a11.into_analog_input(&mut adc).into_channel(),
            pins.a12.into_analog_input(&mut adc).into_channel(),
            pins.a13.into_analog_input(&mut adc).into_channel(),
            pins.a14.into_analog_input(&mut adc).into_channel(),
            pins.a15.into_analog_input(&mut adc).into_channel(),
        ];
        let mut analog = AnalogBank::new(adc, channels);
        probe::full_pin_diagnostics(&mut bank, &mut analog, &mut delay, serial);

        let mut serial1 = arduino_hal::Usart::new(
            dp.USART1,
            pins.d19,
            pins.d18.into_output(),
            PROBE_BAUD.into_baudrate(),
        );
        let mut serial2 = arduino_hal::Usart::new(
            dp.USART2,
            pins.d17,
            pins.d16.into_output(),
            PROBE_BAUD.into_baudrate(),
        );
        let mut serial3 = arduino_hal::Usart::new(
            dp.USART3,
            pins.d15,
            pins.d14.into_output(),
            PROBE_BAUD.into_baudrate(),
        );
        let mut rx1 = || serial1.read().ok();
        let mut rx2 = || serial2.read().ok();
        let mut rx3 = || serial3.read().ok();
        let mut ports: [(&str, &mut dyn ByteSource); 3] = [
            ("Serial1", &mut rx1),
            ("Serial2", &mut rx2),
            ("Serial3", &mut rx3),
        ];
        uart::diagnose_ports(&mut ports, &mut delay, serial);

        let mut storage = Storage::new(arduino_hal::Eeprom::new(dp.EEPROM));
        eeprom::run_test(&mut storage, eeprom::TEST_ADDRESS, &mut delay, serial).ok();
    }

    config.show(serial);

    let mut led = match bank.take(LED_RED) {
        Some(pin) if config.led => Some(Led::new(pin, LedColor::Red, serial)),
        _ => None,
    };

    let reader_pins = ReaderPins::mega();
    let mut reader = match bank.take(reader_pins.rst) {
        Some(rst) if config.rfid => {
            let settings = spi::Settings {
                data_order: spi::DataOrder::MostSignificantFirst,
                mode: Mode {
                    polarity: Polarity::IdleLow,
                    phase: Phase::CaptureOnFirstTransition,
                },
                clock: spi::SerialClockRate::OscfOver64,
            };
            let (spi, cs) = arduino_hal::Spi::new(
                dp.SPI,
                pins.d52.into_output(),
                pins.d51.into_output(),
                pins.d50.into_pull_up_input(),
                pins.d53.into_output(),
                settings,
            );
            let chip = RfidRc522::new(SpiInterface::new(spi, cs), arduino_hal::Delay::new());
            let mut reader = RfidReader::new(chip, rst, reader_pins, &config);
            reader.bring_up(&config, serial);
            Some(reader)
        }
        _ => None,
    };

    let mut console = CommandLoop::new(&config);
    let mut now_ms: u32 = 0;
    loop {
        let input = serial.read().ok();
        console.poll(input, &mut reader, serial);

        if let Some(led) = led.as_mut() {
            led.toggle_every(now_ms, BLINK_MS);
        }
        arduino_hal::delay_ms(1);
        now_ms = now_ms.wrapping_add(1);
    }
}

#[cfg(not(target_arch = "avr"))]
fn main() {}
