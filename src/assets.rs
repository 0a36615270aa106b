//! Sprite manifest and load tracking
//!
//! Sprites load in the background after startup. Until a sprite is loaded
//! (or if it fails) the renderer draws its solid-fill fallback, so nothing
//! in the simulation depends on assets.

use thiserror::Error;

/// Sprites the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Background,
    Player,
    ObstacleTop,
    ObstacleBottom,
}

impl SpriteId {
    pub const ALL: [SpriteId; 4] = [
        SpriteId::Background,
        SpriteId::Player,
        SpriteId::ObstacleTop,
        SpriteId::ObstacleBottom,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            SpriteId::Background => "assets/background.png",
            SpriteId::Player => "assets/croco.png",
            SpriteId::ObstacleTop => "assets/obstacle_top.png",
            SpriteId::ObstacleBottom => "assets/obstacle_bottom.png",
        }
    }

    /// Slot index, also used as the texture slot in the renderer
    pub fn index(&self) -> usize {
        *self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpriteStatus {
    #[default]
    Pending,
    Loaded {
        width: u32,
        height: u32,
    },
    Failed,
}

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to fetch {path}: {reason}")]
    Fetch { path: &'static str, reason: String },

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Decoded RGBA8 pixels
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Decode PNG bytes into RGBA8
pub fn decode_png(bytes: &[u8]) -> Result<DecodedImage, AssetError> {
    let image = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)?.to_rgba8();
    let (width, height) = image.dimensions();
    Ok(DecodedImage {
        width,
        height,
        rgba: image.into_raw(),
    })
}

/// Fetch a file relative to the page (WASM only)
#[cfg(target_arch = "wasm32")]
pub async fn fetch_bytes(path: &'static str) -> Result<Vec<u8>, AssetError> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;

    let fail = |reason: String| AssetError::Fetch { path, reason };

    let window = web_sys::window().ok_or_else(|| fail("no window".into()))?;
    let response = JsFuture::from(window.fetch_with_str(path))
        .await
        .map_err(|e| fail(format!("{:?}", e)))?;
    let response: web_sys::Response = response
        .dyn_into()
        .map_err(|_| fail("not a Response".into()))?;
    if !response.ok() {
        return Err(fail(format!("HTTP {}", response.status())));
    }

    let buffer = response
        .array_buffer()
        .map_err(|e| fail(format!("{:?}", e)))?;
    let buffer = JsFuture::from(buffer)
        .await
        .map_err(|e| fail(format!("{:?}", e)))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

/// Fetch and decode one sprite (WASM only)
#[cfg(target_arch = "wasm32")]
pub async fn load_sprite(id: SpriteId) -> Result<DecodedImage, AssetError> {
    let bytes = fetch_bytes(id.path()).await?;
    decode_png(&bytes)
}

/// Per-sprite load status
#[derive(Debug, Clone, Default)]
pub struct Assets {
    status: [SpriteStatus; 4],
}

impl Assets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self, id: SpriteId) -> SpriteStatus {
        self.status[id.index()]
    }

    /// Pixel size of a loaded sprite
    pub fn size(&self, id: SpriteId) -> Option<(u32, u32)> {
        match self.status(id) {
            SpriteStatus::Loaded { width, height } => Some((width, height)),
            _ => None,
        }
    }

    pub fn is_loaded(&self, id: SpriteId) -> bool {
        self.size(id).is_some()
    }

    pub fn mark_loaded(&mut self, id: SpriteId, width: u32, height: u32) {
        log::info!("Loaded sprite {:?} ({}x{})", id, width, height);
        self.status[id.index()] = SpriteStatus::Loaded { width, height };
    }

    pub fn mark_failed(&mut self, id: SpriteId, error: &AssetError) {
        log::warn!("Sprite {:?} unavailable, using fallback: {}", id, error);
        self.status[id.index()] = SpriteStatus::Failed;
    }

    /// Every sprite has either loaded or failed
    pub fn is_settled(&self) -> bool {
        self.status.iter().all(|s| *s != SpriteStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let image = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            width,
            height,
            image::Rgba([10, 20, 30, 255]),
        ));
        let mut cursor = Cursor::new(Vec::new());
        image
            .write_to(&mut cursor, image::ImageOutputFormat::Png)
            .unwrap();
        cursor.into_inner()
    }

    #[test]
    fn decodes_png_to_rgba() {
        let decoded = decode_png(&png_bytes(3, 2)).unwrap();
        assert_eq!((decoded.width, decoded.height), (3, 2));
        assert_eq!(decoded.rgba.len(), 3 * 2 * 4);
        assert_eq!(&decoded.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        assert!(matches!(
            decode_png(b"definitely not a png"),
            Err(AssetError::Decode(_))
        ));
    }

    #[test]
    fn status_tracking() {
        let mut assets = Assets::new();
        assert!(!assets.is_settled());
        assert_eq!(assets.status(SpriteId::Player), SpriteStatus::Pending);

        assets.mark_loaded(SpriteId::Player, 64, 48);
        assert_eq!(assets.size(SpriteId::Player), Some((64, 48)));

        let err = decode_png(&[]).unwrap_err();
        for id in [SpriteId::Background, SpriteId::ObstacleTop, SpriteId::ObstacleBottom] {
            assets.mark_failed(id, &err);
        }
        assert!(assets.is_settled());
        assert!(!assets.is_loaded(SpriteId::Background));
    }

    #[test]
    fn indices_are_distinct() {
        let mut seen = [false; 4];
        for id in SpriteId::ALL {
            assert!(!seen[id.index()]);
            seen[id.index()] = true;
        }
    }
}
