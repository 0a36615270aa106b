//! Platform services (game portal SDK)
//!
//! The game runs the same with or without a portal SDK. Call sites always
//! go through [`PlatformServices`]; when no SDK is present the session
//! holds a [`NullPlatform`].

#[cfg(target_arch = "wasm32")]
mod yandex;

#[cfg(target_arch = "wasm32")]
pub use yandex::{CloudStorage, YandexPlatform, sleep_ms};

use std::future::Future;

/// Completion callback for an interstitial ad; receives whether it was shown
pub type AdCallback = Box<dyn FnOnce(bool)>;

/// Capabilities offered by the hosting portal. All calls are fire-and-forget.
pub trait PlatformServices {
    /// SDK finished initializing
    fn is_ready(&self) -> bool;

    fn notify_gameplay_start(&self);

    fn notify_gameplay_stop(&self);

    /// Show a fullscreen ad. `on_done` may run after this returns.
    fn request_interstitial_ad(&self, on_done: AdCallback);
}

/// No SDK: every call is a no-op, ads are never shown
#[derive(Debug, Default, Clone, Copy)]
pub struct NullPlatform;

impl PlatformServices for NullPlatform {
    fn is_ready(&self) -> bool {
        false
    }

    fn notify_gameplay_start(&self) {}

    fn notify_gameplay_stop(&self) {}

    fn request_interstitial_ad(&self, on_done: AdCallback) {
        on_done(false);
    }
}

/// Bounded readiness poll.
///
/// Checks `probe` up to `attempts` times, awaiting `sleep()` between checks.
/// Resolves `true` as soon as the probe passes and `false` once the bound is
/// spent; it never waits forever.
pub async fn wait_until<P, S, F>(mut probe: P, attempts: u32, mut sleep: S) -> bool
where
    P: FnMut() -> bool,
    S: FnMut() -> F,
    F: Future<Output = ()>,
{
    for attempt in 0..attempts {
        if probe() {
            return true;
        }
        if attempt + 1 < attempts {
            sleep().await;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn probe_success_resolves_early() {
        let calls = Cell::new(0u32);
        let sleeps = Cell::new(0u32);
        let ready = pollster::block_on(wait_until(
            || {
                calls.set(calls.get() + 1);
                calls.get() == 3
            },
            100,
            || {
                sleeps.set(sleeps.get() + 1);
                std::future::ready(())
            },
        ));
        assert!(ready);
        assert_eq!(calls.get(), 3);
        assert_eq!(sleeps.get(), 2);
    }

    #[test]
    fn bound_is_respected() {
        let calls = Cell::new(0u32);
        let ready = pollster::block_on(wait_until(
            || {
                calls.set(calls.get() + 1);
                false
            },
            100,
            || std::future::ready(()),
        ));
        assert!(!ready);
        assert_eq!(calls.get(), 100);
    }

    #[test]
    fn zero_attempts_fails_immediately() {
        let ready = pollster::block_on(wait_until(|| true, 0, || std::future::ready(())));
        assert!(!ready);
    }

    #[test]
    fn null_platform_reports_no_ad() {
        let shown = std::rc::Rc::new(Cell::new(None));
        let slot = shown.clone();
        NullPlatform.request_interstitial_ad(Box::new(move |s| slot.set(Some(s))));
        assert_eq!(shown.get(), Some(false));
        assert!(!NullPlatform.is_ready());
    }
}
