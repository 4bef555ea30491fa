//! Synthetic browser-like `User-Agent` strings.
//!
//! The value is decoration only. Nothing routes or authenticates on it, so
//! the generator just has to produce a plausible, non-empty string that
//! changes between runs.

use rand::seq::SliceRandom;
use rand::Rng;

const PLATFORMS: &[&str] = &[
    "Windows NT 10.0; Win64; x64",
    "Windows NT 6.1; Win64; x64",
    "Macintosh; Intel Mac OS X 10_15_7",
    "Macintosh; Intel Mac OS X 13_4",
    "X11; Linux x86_64",
    "X11; Ubuntu; Linux x86_64",
];

enum Browser {
    Chrome,
    Firefox,
}

/// Generate a fresh client identifier.
pub fn generate() -> String {
    let mut rng = rand::thread_rng();
    let platform = PLATFORMS.choose(&mut rng).copied().unwrap_or(PLATFORMS[0]);
    let browser = if rng.gen_bool(0.5) {
        Browser::Chrome
    } else {
        Browser::Firefox
    };

    match browser {
        Browser::Chrome => {
            let major = rng.gen_range(100..=130);
            let build = rng.gen_range(4000..=6800);
            let patch = rng.gen_range(0..=250);
            format!(
                "Mozilla/5.0 ({platform}) AppleWebKit/537.36 (KHTML, like Gecko) \
                 Chrome/{major}.0.{build}.{patch} Safari/537.36"
            )
        }
        Browser::Firefox => {
            let major = rng.gen_range(100..=130);
            format!("Mozilla/5.0 ({platform}; rv:{major}.0) Gecko/20100101 Firefox/{major}.0")
        }
    }
}
