use anyhow::{anyhow, Result};
use eframe::egui;

use crate::worker::fetch::ResponseSource;

/// What the last root-document fetch says about connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetStatus {
    #[default]
    Unknown,
    Online,
    Cached,
    Offline,
}

impl AssetStatus {
    pub fn from_source(source: ResponseSource) -> Self {
        match source {
            ResponseSource::Network => AssetStatus::Online,
            ResponseSource::Cache | ResponseSource::RootFallback => AssetStatus::Cached,
            ResponseSource::Offline => AssetStatus::Offline,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AssetStatus::Unknown => "…",
            AssetStatus::Online => "● online",
            AssetStatus::Cached => "◐ cached",
            AssetStatus::Offline => "○ offline",
        }
    }
}

/// The `name` field of a web app manifest.
pub fn manifest_title(body: &[u8]) -> Result<String> {
    let manifest: serde_json::Value = serde_json::from_slice(body)?;
    manifest
        .get("name")
        .and_then(|n| n.as_str())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("manifest has no name"))
}

pub fn decode_icon(body: &[u8]) -> Result<egui::IconData> {
    let image = image::load_from_memory(body)?.into_rgba8();
    let (width, height) = image.dimensions();
    Ok(egui::IconData {
        rgba: image.into_raw(),
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_manifest_name() {
        let body = br#"{ "name": "Eldritch V2", "short_name": "Eldritch" }"#;
        assert_eq!(manifest_title(body).unwrap(), "Eldritch V2");
        assert!(manifest_title(b"{}").is_err());
        assert!(manifest_title(b"Offline").is_err());
    }

    #[test]
    fn decodes_png_icon() {
        let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(
            3,
            2,
            image::Rgba([10, 20, 30, 255]),
        ));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let icon = decode_icon(&png).unwrap();
        assert_eq!((icon.width, icon.height), (3, 2));
        assert_eq!(icon.rgba.len(), 3 * 2 * 4);
        assert!(decode_icon(b"Offline").is_err());
    }

    #[test]
    fn status_from_source() {
        assert_eq!(AssetStatus::from_source(ResponseSource::Network), AssetStatus::Online);
        assert_eq!(
            AssetStatus::from_source(ResponseSource::RootFallback),
            AssetStatus::Cached
        );
        assert_eq!(AssetStatus::from_source(ResponseSource::Offline), AssetStatus::Offline);
    }
}
