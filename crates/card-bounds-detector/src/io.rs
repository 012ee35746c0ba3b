//! JSON configuration and report helpers for card detection.

use crate::{CardDetection, CardDetector, CardDetectorParams, DetectError};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

#[derive(thiserror::Error, Debug)]
pub enum CardIoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Configuration for a detection run driven from disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDetectConfig {
    pub image_path: String,
    #[serde(default)]
    pub output_path: Option<String>,
    /// Where to write the rectified raster, if one is produced.
    #[serde(default)]
    pub rectified_path: Option<String>,
    #[serde(default)]
    pub params: Option<CardDetectorParams>,
}

impl CardDetectConfig {
    pub fn new(image_path: impl Into<String>) -> Self {
        Self {
            image_path: image_path.into(),
            output_path: None,
            rectified_path: None,
            params: None,
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CardIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CardIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Resolve the output report path.
    pub fn output_path(&self) -> PathBuf {
        self.output_path
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("card_detect_report.json"))
    }

    /// Detector parameters, defaults unless overridden.
    pub fn build_params(&self) -> CardDetectorParams {
        self.params.clone().unwrap_or_default()
    }

    pub fn build_detector(&self) -> CardDetector {
        CardDetector::new(self.build_params())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RectifiedImageInfo {
    pub path: Option<String>,
    pub width: usize,
    pub height: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardDetectReport {
    pub image_path: String,
    pub config_path: String,
    pub image_width: usize,
    pub image_height: usize,
    #[serde(default)]
    pub detection: Option<CardDetection>,
    #[serde(default)]
    pub rectified: Option<RectifiedImageInfo>,
    #[serde(default)]
    pub error: Option<String>,
}

impl CardDetectReport {
    /// Build a base report for one input image.
    pub fn new(
        cfg: &CardDetectConfig,
        config_path: &Path,
        image_width: usize,
        image_height: usize,
    ) -> Self {
        Self {
            image_path: cfg.image_path.clone(),
            config_path: config_path.to_string_lossy().into_owned(),
            image_width,
            image_height,
            detection: None,
            rectified: None,
            error: None,
        }
    }

    /// Populate report fields from a successful detection.
    pub fn set_detection(&mut self, det: CardDetection, rectified_path: Option<String>) {
        self.rectified = det.rectified_size().map(|(width, height)| RectifiedImageInfo {
            path: rectified_path,
            width,
            height,
        });
        self.detection = Some(det);
        self.error = None;
    }

    /// Record a detection error.
    pub fn set_error(&mut self, err: DetectError) {
        self.error = Some(err.to_string());
    }

    /// Load a report from JSON on disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, CardIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this report to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), CardIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}
