// build.rs

//! Stamps the firmware with its UTC build time as `BUILD_STAMP`.
//!
//! `SOURCE_DATE_EPOCH` pins the time for reproducible builds.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

const SECONDS_PER_DAY: u64 = 86_400;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=src");
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rustc-env=BUILD_STAMP={}", utc_stamp(build_time()));
}

/// Seconds since the Unix epoch.
fn build_time() -> u64 {
    if let Some(epoch) = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
    {
        return epoch;
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}

/// `yyyy-mm-dd hh:mm:ss`
fn utc_stamp(seconds: u64) -> String {
    let (year, month, day) = civil_date((seconds / SECONDS_PER_DAY) as i64);
    let time = seconds % SECONDS_PER_DAY;
    format!(
        "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
        year,
        month,
        day,
        time / 3600,
        time % 3600 / 60,
        time % 60
    )
}

// Proleptic Gregorian date from a day count (H. Hinnant's civil_from_days)
fn civil_date(days: i64) -> (i64, u32, u32) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z.rem_euclid(146_097);
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u32;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u32;
    let year = yoe + era * 400 + i64::from(month <= 2);
    (year, month, day)
}
