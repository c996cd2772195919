//! Time-scoped effects layered over the timeline.
//!
//! Every effect carries a typed payload selected by its `type` tag. Crop
//! effects are bound to a single clip; keystroke effects are derived from
//! recording metadata and rebuilt rather than edited directly.

use serde::{Deserialize, Serialize};

use crate::ids::new_effect_id;
use crate::region::{Point2D, Region};
use crate::Millis;

fn default_enabled() -> bool {
    true
}

/// A time-scoped overlay record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    /// Unique effect identifier. Keystroke ids encode their provenance.
    pub id: String,

    /// Timeline start.
    pub start_time: Millis,

    /// Timeline end.
    pub end_time: Millis,

    /// Whether the effect is rendered.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Typed payload.
    #[serde(flatten)]
    pub data: EffectData,
}

/// Discriminated union of effect payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectData {
    /// Camera zoom towards a point.
    Zoom(ZoomData),
    /// Screen framing style (tilt, presets).
    Screen(ScreenData),
    /// Keyboard overlay derived from recording metadata.
    Keystroke(KeystrokeData),
    /// Crop region bound to a clip.
    Crop(CropData),
    /// Project background behind the recording.
    Background(BackgroundData),
    /// Text callout.
    Annotation(AnnotationData),
    /// Third-party plugin effect with an opaque parameter blob.
    Plugin(PluginData),
}

/// Short tag for an effect payload, used in logs and filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Zoom,
    Screen,
    Keystroke,
    Crop,
    Background,
    Annotation,
    Plugin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoomData {
    /// Magnification (1.0 = none).
    pub scale: f64,
    /// Point the camera moves towards.
    #[serde(default)]
    pub target: Point2D,
    /// Generated by auto-zoom rather than placed by hand.
    #[serde(default)]
    pub auto: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenData {
    /// Named framing preset.
    pub preset: String,
    /// 3D tilt in degrees.
    #[serde(default)]
    pub tilt_deg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeystrokeData {
    /// Recording whose keyboard events produced this overlay.
    pub recording_id: String,
    /// Index of the keyboard cluster within that recording.
    pub cluster_index: usize,
    /// Number of key presses in the cluster.
    #[serde(default)]
    pub key_count: usize,
    /// User-adjustable presentation.
    #[serde(default)]
    pub settings: KeystrokeSettings,
}

/// Presentation settings the user may customize per keystroke overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeystrokeSettings {
    pub position: OverlayPosition,
    /// Text scale relative to the default size.
    pub font_scale: f64,
    /// Only show shortcuts (keys pressed with a modifier).
    pub shortcuts_only: bool,
}

impl Default for KeystrokeSettings {
    fn default() -> Self {
        Self {
            position: OverlayPosition::BottomCenter,
            font_scale: 1.0,
            shortcuts_only: false,
        }
    }
}

/// Anchor for an on-screen overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverlayPosition {
    TopCenter,
    #[default]
    BottomCenter,
    BottomLeft,
    BottomRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropData {
    /// Clip this crop belongs to. Older documents did not record it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clip_id: Option<String>,
    /// Visible part of the frame.
    #[serde(default)]
    pub region: Region,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundData {
    /// Background color as hex string (for example `#1a1a1a`).
    pub color: String,
    /// Padding around the recording in output pixels.
    #[serde(default)]
    pub padding: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationData {
    pub text: String,
    #[serde(default)]
    pub position: Point2D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginData {
    pub plugin_id: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

impl EffectData {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectData::Zoom(_) => EffectKind::Zoom,
            EffectData::Screen(_) => EffectKind::Screen,
            EffectData::Keystroke(_) => EffectKind::Keystroke,
            EffectData::Crop(_) => EffectKind::Crop,
            EffectData::Background(_) => EffectKind::Background,
            EffectData::Annotation(_) => EffectKind::Annotation,
            EffectData::Plugin(_) => EffectKind::Plugin,
        }
    }
}

impl Effect {
    /// Create an enabled effect with a fresh id.
    pub fn new(data: EffectData, start_time: Millis, end_time: Millis) -> Self {
        Self::with_id(new_effect_id(), data, start_time, end_time)
    }

    pub fn with_id(
        id: impl Into<String>,
        data: EffectData,
        start_time: Millis,
        end_time: Millis,
    ) -> Self {
        Self {
            id: id.into(),
            start_time,
            end_time,
            enabled: true,
            data,
        }
    }

    /// Crop effect bound to a clip.
    pub fn crop(clip_id: impl Into<String>, region: Region, start_time: Millis, end_time: Millis) -> Self {
        Self::new(
            EffectData::Crop(CropData {
                clip_id: Some(clip_id.into()),
                region,
            }),
            start_time,
            end_time,
        )
    }

    pub fn kind(&self) -> EffectKind {
        self.data.kind()
    }

    pub fn duration(&self) -> Millis {
        self.end_time - self.start_time
    }

    /// Timing is finite, non-negative, and ordered.
    pub fn has_valid_timing(&self) -> bool {
        self.start_time.is_finite()
            && self.end_time.is_finite()
            && self.start_time >= 0.0
            && self.end_time >= self.start_time
    }

    /// Clip id of a crop effect, if bound.
    pub fn crop_clip_id(&self) -> Option<&str> {
        match &self.data {
            EffectData::Crop(crop) => crop.clip_id.as_deref(),
            _ => None,
        }
    }

    pub fn is_crop(&self) -> bool {
        matches!(self.data, EffectData::Crop(_))
    }

    pub fn is_keystroke(&self) -> bool {
        matches!(self.data, EffectData::Keystroke(_))
    }
}
