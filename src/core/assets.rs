//=========================================================================
// Asset Loader
//=========================================================================
//
// Resolves logical asset names against a game's asset root:
//
//   <root>/Images/<name>   → decoded and registered with a SpriteStore
//   <root>/Sounds/<name>   → decoded and registered with a Mixer
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;
use std::path::{Path, PathBuf};

use kira::sound::{static_sound::StaticSoundData, FromFileError};
use log::debug;

//=== Internal Dependencies ===============================================

use crate::core::audio::{Mixer, SoundId};
use crate::core::render::{Sprite, SpriteStore};

//=== Constants ===========================================================

const IMAGES_DIR: &str = "Images";
const SOUNDS_DIR: &str = "Sounds";

//=== AssetError ==========================================================

#[derive(Debug)]
pub enum AssetError {
    /// No file at the resolved path.
    NotFound(PathBuf),

    /// The file exists but could not be read or decoded.
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    /// The sound file could not be read or decoded.
    Sound {
        path: PathBuf,
        source: FromFileError,
    },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Asset not found: {}", path.display()),
            Self::Image { path, source } => {
                write!(f, "Failed to load image {}: {}", path.display(), source)
            }
            Self::Sound { path, source } => {
                write!(f, "Failed to load sound {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Image { source, .. } => Some(source),
            Self::Sound { source, .. } => Some(source),
            Self::NotFound(_) => None,
        }
    }
}

//=== AssetLoader =========================================================

/// Resolves and loads assets below a root directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLoader {
    root: PathBuf,
}

impl AssetLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn image_path(&self, name: &str) -> PathBuf {
        self.root.join(IMAGES_DIR).join(name)
    }

    pub fn sound_path(&self, name: &str) -> PathBuf {
        self.root.join(SOUNDS_DIR).join(name)
    }

    /// Decodes `Images/<name>` and registers it with `store`.
    ///
    /// The returned sprite carries the image's natural size.
    pub fn load_image<S: SpriteStore + ?Sized>(&self, store: &mut S, name: &str) -> Result<Sprite, AssetError> {
        let path = self.image_path(name);
        if !path.is_file() {
            return Err(AssetError::NotFound(path));
        }

        let image = image::open(&path)
            .map_err(|source| AssetError::Image {
                path: path.clone(),
                source,
            })?
            .into_rgba8();

        let sprite = store.insert_sprite(image);
        debug!(
            target: "level",
            "Loaded {} as {:?} ({}x{})",
            path.display(), sprite.id, sprite.width, sprite.height
        );
        Ok(sprite)
    }

    /// Path of `Sounds/<name>`, checked to exist.
    pub fn locate_sound(&self, name: &str) -> Result<PathBuf, AssetError> {
        let path = self.sound_path(name);
        if path.is_file() {
            Ok(path)
        } else {
            Err(AssetError::NotFound(path))
        }
    }

    /// Decodes `Sounds/<name>` (WAV or OGG) and registers it with `mixer`.
    pub fn load_sound(&self, mixer: &mut Mixer, name: &str) -> Result<SoundId, AssetError> {
        let path = self.locate_sound(name)?;
        let data = StaticSoundData::from_file(&path).map_err(|source| AssetError::Sound {
            path: path.clone(),
            source,
        })?;

        let sound = mixer.insert_sound(data);
        debug!(target: "audio", "Loaded {} as {:?}", path.display(), sound);
        Ok(sound)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
