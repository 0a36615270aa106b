//! Yandex Games SDK backend: platform services and cloud player data

use std::cell::RefCell;

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

use super::{AdCallback, PlatformServices, wait_until};
use crate::consts::{SDK_POLL_ATTEMPTS, SDK_POLL_INTERVAL_MS};
use crate::persistence::{LocalStorage, PersistenceError, SaveData, Storage};

#[wasm_bindgen(inline_js = "
    let ysdk = null;
    let player = null;

    export function ya_games_present() {
        return typeof window.YaGames !== 'undefined';
    }

    export async function ya_init() {
        ysdk = await window.YaGames.init();
        try {
            player = await ysdk.getPlayer({ signed: false });
        } catch (e) {
            console.log('Player initialization failed:', e);
        }
        return player !== null;
    }

    export async function ya_get_data() {
        const data = await player.getData();
        return data && Object.keys(data).length > 0 ? JSON.stringify(data) : null;
    }

    export async function ya_set_data(json) {
        await player.setData(JSON.parse(json), true);
    }

    export async function ya_loading_ready() {
        if (ysdk && ysdk.features && ysdk.features.LoadingAPI) {
            await ysdk.features.LoadingAPI.ready();
        }
    }

    export function ya_gameplay_start() {
        if (ysdk && ysdk.features && ysdk.features.GameplayAPI) {
            ysdk.features.GameplayAPI.start();
        }
    }

    export function ya_gameplay_stop() {
        if (ysdk && ysdk.features && ysdk.features.GameplayAPI) {
            ysdk.features.GameplayAPI.stop();
        }
    }

    export function ya_show_fullscreen_adv() {
        return new Promise((resolve) => {
            if (!ysdk || !ysdk.adv) {
                resolve(false);
                return;
            }
            try {
                ysdk.adv.showFullscreenAdv({
                    callbacks: {
                        onClose: (wasShown) => resolve(!!wasShown),
                        onError: () => resolve(false),
                    },
                });
            } catch (e) {
                resolve(false);
            }
        });
    }
")]
extern "C" {
    fn ya_games_present() -> bool;
    fn ya_init() -> js_sys::Promise;
    fn ya_loading_ready() -> js_sys::Promise;
    #[wasm_bindgen(catch)]
    fn ya_gameplay_start() -> Result<(), JsValue>;
    #[wasm_bindgen(catch)]
    fn ya_gameplay_stop() -> Result<(), JsValue>;
    fn ya_show_fullscreen_adv() -> js_sys::Promise;
    fn ya_get_data() -> js_sys::Promise;
    fn ya_set_data(json: &str) -> js_sys::Promise;
}

/// Resolve after `ms` milliseconds (`setTimeout`)
pub async fn sleep_ms(ms: i32) {
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
        }
    });
    let _ = JsFuture::from(promise).await;
}

/// Connected Yandex Games SDK
#[derive(Debug)]
pub struct YandexPlatform {
    /// Player object available; cloud data needs it
    player: bool,
}

impl YandexPlatform {
    /// Wait (bounded) for the SDK script, then initialize it.
    /// `None` means the game runs without platform services.
    pub async fn connect() -> Option<Self> {
        let present = wait_until(ya_games_present, SDK_POLL_ATTEMPTS, || {
            sleep_ms(SDK_POLL_INTERVAL_MS)
        })
        .await;
        if !present {
            log::warn!("YaGames not loaded, continuing without SDK");
            return None;
        }

        let player = match JsFuture::from(ya_init()).await {
            Ok(value) => value.as_bool().unwrap_or(false),
            Err(e) => {
                log::warn!("Yandex SDK initialization failed: {:?}", e);
                return None;
            }
        };
        log::info!("Yandex SDK initialized (player: {})", player);

        if let Err(e) = JsFuture::from(ya_loading_ready()).await {
            log::warn!("Failed to mark game as ready: {:?}", e);
        }

        Some(Self { player })
    }

    pub fn has_player(&self) -> bool {
        self.player
    }
}

/// Player data in the portal's cloud. The record is fetched once on
/// connect; saves go out in the background and fall back to LocalStorage
/// if the cloud rejects them.
#[derive(Debug)]
pub struct CloudStorage {
    snapshot: RefCell<Result<Option<SaveData>, String>>,
}

impl CloudStorage {
    /// `None` without a player object
    pub async fn fetch(platform: &YandexPlatform) -> Option<Self> {
        if !platform.has_player() {
            return None;
        }
        let snapshot = match JsFuture::from(ya_get_data()).await {
            Ok(value) => match value.as_string() {
                Some(json) => SaveData::from_json(&json).map(Some).map_err(|e| e.to_string()),
                None => Ok(None),
            },
            Err(e) => Err(format!("{:?}", e)),
        };
        match &snapshot {
            Ok(_) => log::info!("Cloud save data fetched"),
            Err(e) => log::warn!("Failed to fetch cloud save data: {}", e),
        }
        Some(Self {
            snapshot: RefCell::new(snapshot),
        })
    }
}

impl Storage for CloudStorage {
    fn load(&self) -> Result<Option<SaveData>, PersistenceError> {
        self.snapshot
            .borrow()
            .clone()
            .map_err(PersistenceError::Unavailable)
    }

    fn save(&self, data: &SaveData) -> Result<(), PersistenceError> {
        let promise = ya_set_data(&data.to_json()?);
        let record = data.clone();
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(promise).await {
                Ok(_) => log::info!("Save data written to cloud"),
                Err(e) => {
                    log::warn!("Cloud save failed, keeping a local copy: {:?}", e);
                    if let Err(e) = LocalStorage.save(&record) {
                        log::warn!("Failed to save data: {}", e);
                    }
                }
            }
        });
        *self.snapshot.borrow_mut() = Ok(Some(data.clone()));
        Ok(())
    }
}

impl PlatformServices for YandexPlatform {
    fn is_ready(&self) -> bool {
        true
    }

    fn notify_gameplay_start(&self) {
        if let Err(e) = ya_gameplay_start() {
            log::warn!("Failed to mark gameplay start: {:?}", e);
        }
    }

    fn notify_gameplay_stop(&self) {
        if let Err(e) = ya_gameplay_stop() {
            log::warn!("Failed to mark gameplay stop: {:?}", e);
        }
    }

    fn request_interstitial_ad(&self, on_done: AdCallback) {
        let promise = ya_show_fullscreen_adv();
        wasm_bindgen_futures::spawn_local(async move {
            let shown = match JsFuture::from(promise).await {
                Ok(value) => value.as_bool().unwrap_or(false),
                Err(e) => {
                    log::warn!("Interstitial ad failed: {:?}", e);
                    false
                }
            };
            on_done(shown);
        });
    }
}
