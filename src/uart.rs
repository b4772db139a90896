use embedded_hal::delay::DelayNs;
use ufmt::{uwriteln, uWrite};

/// Listen window for each secondary port.
pub const LISTEN_WINDOW_MS: u32 = 3000;
const POLL_STEP_MS: u32 = 1;

/// Non-blocking byte input.
pub trait ByteSource {
    fn try_read(&mut self) -> Option<u8>;
}

impl<F: FnMut() -> Option<u8>> ByteSource for F {
    fn try_read(&mut self) -> Option<u8> {
        self()
    }
}

/// Polls `port` for up to `window_ms`. On the first byte, drains whatever is
/// buffered, echoes it to `serial` and stops listening.
pub fn listen<S, D, W>(port: &mut S, name: &str, window_ms: u32, delay: &mut D, serial: &mut W) -> bool
where
    S: ByteSource + ?Sized,
    D: DelayNs,
    W: uWrite,
{
    uwriteln!(serial, "📡 Diagnosing {}", name).ok();
    uwriteln!(serial, "⌛ Waiting for data on {} for {} ms...", name, window_ms).ok();

    let mut received = false;
    let mut waited = 0;
    while waited < window_ms {
        if let Some(first) = port.try_read() {
            received = true;
            ufmt::uwrite!(serial, "📥 Data received on {}: ", name).ok();
            serial.write_char(first as char).ok();
            while let Some(byte) = port.try_read() {
                serial.write_char(byte as char).ok();
            }
            serial.write_str("\n").ok();
            break;
        }
        delay.delay_ms(POLL_STEP_MS);
        waited += POLL_STEP_MS;
    }

    if !received {
        uwriteln!(serial, "🔻 No data detected on {}", name).ok();
    }
    uwriteln!(serial, "✅ End of diagnostic.").ok();
    serial.write_str("\n").ok();
    received
}

/// Runs `listen` on every secondary port in order.
pub fn diagnose_ports<D, W>(ports: &mut [(&str, &mut dyn ByteSource)], delay: &mut D, serial: &mut W)
where
    D: DelayNs,
    W: uWrite,
{
    log_info!(serial, "Starting UART communication diagnostic");
    for (name, port) in ports.iter_mut() {
        let name: &str = name;
        listen(&mut **port, name, LISTEN_WINDOW_MS, delay, serial);
    }
    banner!(serial, "Completed UART diagnostic");
}
