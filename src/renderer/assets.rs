//! Image assets shown on the splash and game-over pages

use std::path::Path;

use crate::error::{ArkanoidError, Result};
use crate::event_log::EventLog;
use crate::settings::Settings;

/// Raw image bytes; `None` when loading failed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assets {
    pub logo: Option<Vec<u8>>,
    pub gameover: Option<Vec<u8>>,
}

impl Assets {
    /// Load whichever images are still missing. Failures are logged and leave
    /// the slot empty; the page is then shown without its image.
    pub async fn load_missing(&mut self, settings: &Settings, log: &EventLog) {
        if self.logo.is_none() {
            self.logo = load_logged(&settings.logo_path, "logo.png", log).await;
        }
        if self.gameover.is_none() {
            self.gameover = load_logged(&settings.gameover_path, "gameover.png", log).await;
        }
    }
}

async fn load_logged(path: &Path, name: &str, log: &EventLog) -> Option<Vec<u8>> {
    match load_image(path, name).await {
        Ok(bytes) => {
            log::debug!("loaded {} ({} bytes)", name, bytes.len());
            Some(bytes)
        }
        Err(e) => {
            log::warn!("{}", e);
            log.append(format!("Arkanoid: failed to load {}", name));
            None
        }
    }
}

pub async fn load_image(path: &Path, name: &str) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ArkanoidError::Asset {
            name: name.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_images_are_logged() {
        let settings = Settings {
            logo_path: "no/such/logo.png".into(),
            gameover_path: "no/such/gameover.png".into(),
            ..Settings::default()
        };
        let log = EventLog::default();
        let mut assets = Assets::default();
        assets.load_missing(&settings, &log).await;

        assert_eq!(assets, Assets::default());
        assert!(log.contains("Arkanoid: failed to load logo.png"));
        assert!(log.contains("Arkanoid: failed to load gameover.png"));
    }

    #[tokio::test]
    async fn test_loaded_images_are_kept() {
        let path = std::env::temp_dir().join(format!("arkanoid-logo-{}.png", std::process::id()));
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let settings = Settings {
            logo_path: path.clone(),
            gameover_path: "no/such/gameover.png".into(),
            ..Settings::default()
        };
        let log = EventLog::default();
        let mut assets = Assets::default();
        assets.load_missing(&settings, &log).await;
        std::fs::remove_file(&path).unwrap();

        assert_eq!(assets.logo.as_deref(), Some(&[0x89, b'P', b'N', b'G'][..]));
        assert!(assets.gameover.is_none());

        // Already loaded: not read again even though the file is gone
        assets.load_missing(&settings, &log).await;
        assert!(assets.logo.is_some());
    }
}
