//! Scan session: one capture + OCR + resolve cycle at a time.
//!
//! OCR runs on a worker thread and reports back over a channel that belongs
//! to exactly one scan. Cancelling (or timing out) drops that channel, so a
//! late completion has nowhere to go and never touches the session.
//!
//! An abandoned worker may still be inside the engine. Until it returns, new
//! scans are refused with [`ScanError::EngineBusy`] rather than queued behind
//! the engine lock.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::{Arc, Mutex, TryLockError};
use std::time::{Duration, Instant};

use data::{Resolver, ScanResult};

#[derive(Debug, Clone, thiserror::Error)]
pub enum ScanError {
	#[error("camera unavailable: {0}")]
	CameraUnavailable(String),
	#[error(transparent)]
	Capture(#[from] ie::AcquireError),
	#[error(transparent)]
	OcrEngineFailure(#[from] ie::OcrError),
	#[error("OCR did not finish within {0:?}")]
	OcrTimeout(Duration),
	#[error("a scan is already in progress")]
	Busy,
	#[error("the OCR engine is still busy with an abandoned scan, try again shortly")]
	EngineBusy,
}

type Completion = Result<String, ie::OcrError>;

/// Clears the in-flight flag when the worker finishes, even by panicking.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
	fn drop(&mut self) {
		self.0.store(false, Ordering::Release);
	}
}

enum State {
	Idle,
	Scanning {
		generation: u64,
		started: Instant,
		rx: Receiver<Completion>,
	},
}

pub struct ScanSession {
	ie: Arc<Mutex<ie::Ie>>,
	resolver: Resolver,
	timeout: Option<Duration>,
	state: State,
	/// Scan counter, used to tell scans apart in the log.
	generation: u64,
	/// Set while a worker thread is inside the engine, abandoned or not.
	worker_running: Arc<AtomicBool>,
}

impl ScanSession {
	pub fn new(ie: Arc<Mutex<ie::Ie>>, resolver: Resolver, timeout: Option<Duration>) -> Self {
		Self {
			ie,
			resolver,
			timeout,
			state: State::Idle,
			generation: 0,
			worker_running: Arc::new(AtomicBool::new(false)),
		}
	}

	pub fn is_scanning(&self) -> bool {
		matches!(self.state, State::Scanning { .. })
	}

	/// Whether a worker (possibly from a cancelled or timed-out scan) still holds the engine.
	///
	/// Also true while another session's abandoned worker is holding the shared engine.
	pub fn engine_busy(&self) -> bool {
		self.worker_running.load(Ordering::Acquire) || matches!(self.ie.try_lock(), Err(TryLockError::WouldBlock))
	}

	/// Start recognizing `image`. Rejected while another scan is in flight, or
	/// while an abandoned one is still inside the engine.
	pub fn start(&mut self, image: ie::OwnedImage, now: Instant) -> Result<(), ScanError> {
		if self.is_scanning() {
			log::debug!("scan requested while scanning; ignored");
			return Err(ScanError::Busy);
		}
		if matches!(self.ie.try_lock(), Err(TryLockError::WouldBlock))
			|| self.worker_running.swap(true, Ordering::AcqRel)
		{
			log::debug!("scan requested while an abandoned scan is still running; refused");
			return Err(ScanError::EngineBusy);
		}
		let in_flight = InFlight(self.worker_running.clone());

		self.generation += 1;
		let generation = self.generation;
		log::debug!("scan {generation} started on a {}x{} crop", image.width(), image.height());

		let (tx, rx) = mpsc::channel();
		let ie = self.ie.clone();
		std::thread::spawn(move || {
			let text = match ie.lock() {
				Ok(ie) => ie.read_text(&image),
				Err(_) => Err(ie::OcrError::Engine("OCR engine lock poisoned".to_string())),
			};
			drop(in_flight);
			// The receiver is gone if the scan was cancelled or timed out.
			let _ = tx.send(text);
		});

		self.state = State::Scanning { generation, started: now, rx };
		Ok(())
	}

	/// Check on the scan in flight. Returns the terminal result exactly once and
	/// goes back to idle.
	pub fn poll(&mut self, now: Instant) -> Option<ScanResult> {
		let State::Scanning { generation, started, rx } = &self.state else {
			return None;
		};

		let result = match rx.try_recv() {
			Ok(Ok(text)) => {
				log::debug!("scan {generation} read {text:?}");
				self.resolver.scan(&text)
			}
			Ok(Err(err)) => {
				log::warn!("scan {generation} failed: {err}");
				ScanResult::failed(ScanError::OcrEngineFailure(err))
			}
			Err(TryRecvError::Empty) => match self.timeout {
				Some(timeout) if now.saturating_duration_since(*started) >= timeout => {
					log::warn!("scan {generation} timed out after {timeout:?}");
					ScanResult::failed(ScanError::OcrTimeout(timeout))
				}
				_ => return None,
			},
			Err(TryRecvError::Disconnected) => ScanResult::failed(ScanError::OcrEngineFailure(ie::OcrError::Engine(
				"OCR worker exited without a result".to_string(),
			))),
		};

		self.state = State::Idle;
		Some(result)
	}

	/// Abandon the scan in flight, if any. Its result will be discarded.
	pub fn cancel(&mut self) {
		if let State::Scanning { generation, .. } = self.state {
			log::debug!("scan {generation} cancelled");
			self.state = State::Idle;
		}
	}

	/// Report a failure that happened before OCR could start (camera, crop).
	pub fn fail(&self, err: ScanError) -> ScanResult {
		log::warn!("scan failed before OCR: {err}");
		ScanResult::failed(err)
	}
}
