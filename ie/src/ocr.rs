//! OCR wrappers.
//!
//! Two engines sit behind the [`Recognizer`] trait: PaddleOCR via `ocr-rs`
//! (bundled model files) and Tesseract via `rusty-tesseract` (system install).
//! OCR engines are sensitive to input quality, so cropping and thresholding
//! happen before calling into this module.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;

use crate::Image;

/// Letters plus hyphen, enough for every monster name in the dataset.
pub const NAME_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz-";

#[derive(Debug, Clone, thiserror::Error)]
pub enum OcrError {
    #[error("could not hand the image to the OCR engine: {0}")]
    Input(String),
    #[error("OCR engine failed: {0}")]
    Engine(String),
}

/// Page segmentation the engine should assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Segmentation {
    /// The crop holds a single line of text.
    #[default]
    SingleLine,
    /// The crop holds a uniform block of text.
    Block,
}

impl Segmentation {
    /// Tesseract `--psm` value.
    pub fn psm(self) -> i32 {
        match self {
            Self::SingleLine => 7,
            Self::Block => 6,
        }
    }

    fn separator(self) -> &'static str {
        match self {
            Self::SingleLine => " ",
            Self::Block => "\n",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct OcrConfig {
    pub segmentation: Segmentation,
    /// Characters the engine may emit; `None` allows everything.
    pub whitelist: Option<String>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            segmentation: Segmentation::SingleLine,
            whitelist: Some(NAME_WHITELIST.to_string()),
        }
    }
}

impl OcrConfig {
    /// Drop characters outside the whitelist (whitespace always survives).
    pub fn filter(&self, text: &str) -> String {
        match &self.whitelist {
            Some(allowed) => text
                .chars()
                .filter(|c| c.is_whitespace() || allowed.contains(*c))
                .collect(),
            None => text.to_string(),
        }
    }
}

/// Which engine to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OcrBackend {
    #[default]
    Paddle,
    Tesseract,
}

/// Converts an image into text.
pub trait Recognizer: Send {
    fn recognize(&self, image: Image) -> Result<String, OcrError>;
}

// ----------

pub struct PaddleOcr {
    engine: ocr_rs::OcrEngine,
    config: OcrConfig,
}

impl PaddleOcr {
    /// Initialize the OCR engine with the given model paths.
    pub fn try_new(
        detection: impl AsRef<Path>,
        recognition: impl AsRef<Path>,
        charsset: impl AsRef<Path>,
        config: OcrConfig,
    ) -> anyhow::Result<Self> {
        let thread_count = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);

        let engine = ocr_rs::OcrEngine::new(
            detection,
            recognition,
            charsset,
            Some(ocr_rs::OcrEngineConfig {
                backend: ocr_rs::Backend::CPU,
                thread_count: thread_count as i32,
                // Names are short, stylized and often shot off a TV; favour accuracy.
                precision_mode: ocr_rs::PrecisionMode::High,
                enable_parallel: thread_count > 1,
                min_result_confidence: 0.5,
                ..Default::default()
            }),
        )
        .context("failed to initialize OCR engine")?;

        Ok(Self { engine, config })
    }
}

impl Recognizer for PaddleOcr {
    fn recognize(&self, image: Image) -> Result<String, OcrError> {
        let input = ocr_rs::preprocess::rgb_to_image(&image.get_bytes(), image.width(), image.height());

        let results = self
            .engine
            .recognize(&input)
            .map_err(|err| OcrError::Engine(err.to_string()))?;

        let text = results
            .into_iter()
            .map(|v| v.text)
            .collect::<Vec<_>>()
            .join(self.config.segmentation.separator());
        Ok(self.config.filter(&text))
    }
}

// ----------

pub struct TesseractOcr {
    lang: String,
    config: OcrConfig,
}

impl TesseractOcr {
    pub fn new(lang: impl Into<String>, config: OcrConfig) -> Self {
        Self {
            lang: lang.into(),
            config,
        }
    }

    fn args(&self) -> rusty_tesseract::Args {
        let mut config_variables = HashMap::new();
        if let Some(whitelist) = &self.config.whitelist {
            config_variables.insert("tessedit_char_whitelist".to_string(), whitelist.clone());
        }

        rusty_tesseract::Args {
            lang: self.lang.clone(),
            config_variables,
            dpi: Some(300),
            psm: Some(self.config.segmentation.psm()),
            oem: Some(3),
        }
    }
}

impl Recognizer for TesseractOcr {
    fn recognize(&self, image: Image) -> Result<String, OcrError> {
        let dynamic = image
            .to_owned_image()
            .to_dynamic_image()
            .map_err(|err| OcrError::Input(format!("{err:#}")))?;
        let input = rusty_tesseract::Image::from_dynamic_image(&dynamic)
            .map_err(|err| OcrError::Input(err.to_string()))?;

        rusty_tesseract::image_to_string(&input, &self.args())
            .map(|text| self.config.filter(&text))
            .map_err(|err| OcrError::Engine(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitelist_filter_keeps_whitespace() {
        let cfg = OcrConfig::default();
        assert_eq!(cfg.filter("Kulu-Ya-Ku 3!\n"), "Kulu-Ya-Ku \n");

        let open = OcrConfig {
            whitelist: None,
            ..OcrConfig::default()
        };
        assert_eq!(open.filter("a1!"), "a1!");
    }

    #[test]
    fn tesseract_args_follow_config() {
        let ocr = TesseractOcr::new(
            "eng",
            OcrConfig {
                segmentation: Segmentation::Block,
                whitelist: Some("abc".into()),
            },
        );
        let args = ocr.args();
        assert_eq!(args.psm, Some(6));
        assert_eq!(args.config_variables.get("tessedit_char_whitelist").map(String::as_str), Some("abc"));
    }
}
