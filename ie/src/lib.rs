mod image;
pub use self::image::*;
mod ocr;
pub use ocr::*;
mod preprocess;
pub use preprocess::*;
mod region;
pub use region::*;

/// Minimum crop height handed to the OCR engine; smaller crops are upscaled.
const MIN_OCR_HEIGHT: u32 = 80;

/// Image engine: owns the OCR backend and prepares crops for it.
pub struct Ie {
	recognizer: Box<dyn Recognizer>,
}

impl Ie {
	pub fn new(recognizer: impl Recognizer + 'static) -> Self {
		Self {
			recognizer: Box::new(recognizer),
		}
	}

	/// Read the text in a preprocessed crop.
	///
	/// Small crops are upscaled first; OCR generally performs better on larger glyphs.
	pub fn read_text(&self, image: &OwnedImage) -> Result<String, OcrError> {
		if image.width() == 0 || image.height() == 0 {
			return Err(OcrError::Input("empty image".to_string()));
		}

		let text = if image.height() < MIN_OCR_HEIGHT {
			let mut scaled = image.clone();
			scaled
				.resize_h(MIN_OCR_HEIGHT)
				.map_err(|err| OcrError::Input(format!("{err:#}")))?;
			self.recognizer.recognize(scaled.as_image())?
		} else {
			self.recognizer.recognize(image.as_image())?
		};

		// Optional debug snapshots.
		if std::env::var("MONSTIEDEX_WRITE_IMAGE").as_deref() == Ok("1") {
			let name = text
				.chars()
				.filter(|c| c.is_ascii_alphanumeric())
				.take(40)
				.collect::<String>();
			if let Err(err) = image.as_image().save_png(format!("./debug_ocr_{name}.png")) {
				log::warn!("failed to write OCR snapshot: {err:#}");
			}
		}

		Ok(text)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::sync::{Arc, Mutex};

	struct Recording(Arc<Mutex<Vec<(u32, u32)>>>);

	impl Recognizer for Recording {
		fn recognize(&self, image: Image) -> Result<String, OcrError> {
			self.0.lock().unwrap().push((image.width(), image.height()));
			Ok("Rathalos".into())
		}
	}

	#[test]
	fn small_crops_are_upscaled() {
		let seen = Arc::new(Mutex::new(Vec::new()));
		let ie = Ie::new(Recording(seen.clone()));

		let text = ie.read_text(&OwnedImage::filled(100, 20, Color::WHITE)).unwrap();
		assert_eq!(text, "Rathalos");
		ie.read_text(&OwnedImage::filled(300, 120, Color::WHITE)).unwrap();

		assert_eq!(*seen.lock().unwrap(), vec![(400, 80), (300, 120)]);
	}

	#[test]
	fn empty_crop_is_an_input_error() {
		let ie = Ie::new(Recording(Default::default()));
		let err = ie.read_text(&OwnedImage::filled(0, 0, Color::WHITE)).unwrap_err();
		assert!(matches!(err, OcrError::Input(_)));
	}
}
