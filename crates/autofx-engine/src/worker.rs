//! Background classification worker.
//!
//! Decode, resample, and inference all run here so the audio callback and
//! the presentation layer never wait on file IO or the model.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use autofx_catalog::EffectKind;
use autofx_classify::{Classifier, ClassifyError, decode_to_mono, prepare_model_input};
use parking_lot::{Condvar, Mutex};
use tracing::{debug, info, warn};

use crate::shared::{EngineShared, ProcessState};

/// Inference longer than this is treated as hung and abandoned.
const CLASSIFY_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Default)]
struct MailboxSlot {
    target: Option<PathBuf>,
    shutdown: bool,
}

/// Single-slot mailbox. A new target replaces any queued one, so a user
/// dropping files faster than classification runs only waits on the job
/// already in flight.
#[derive(Default)]
struct Mailbox {
    slot: Mutex<MailboxSlot>,
    cond: Condvar,
}

/// Owns the worker thread; dropping it shuts the thread down.
pub struct ClassificationWorker {
    mailbox: Arc<Mailbox>,
    handle: Option<JoinHandle<()>>,
}

impl ClassificationWorker {
    /// Spawn the worker thread.
    pub fn spawn(shared: EngineShared, classifier: Arc<dyn Classifier>) -> Self {
        let mailbox = Arc::new(Mailbox::default());
        let thread_mailbox = Arc::clone(&mailbox);
        let handle = thread::Builder::new()
            .name("autofx-classify".into())
            .spawn(move || worker_loop(&thread_mailbox, &shared, &classifier))
            .ok();
        if handle.is_none() {
            warn!("failed to spawn classification worker thread");
        }
        Self {
            mailbox,
            handle,
        }
    }

    /// Queue a file for classification, replacing any not-yet-started one.
    pub fn set_target(&self, path: PathBuf) {
        {
            let mut slot = self.mailbox.slot.lock();
            slot.target = Some(path);
        }
        self.mailbox.cond.notify_one();
    }
}

impl Drop for ClassificationWorker {
    fn drop(&mut self) {
        {
            let mut slot = self.mailbox.slot.lock();
            slot.shutdown = true;
        }
        self.mailbox.cond.notify_one();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn worker_loop(mailbox: &Mailbox, shared: &EngineShared, classifier: &Arc<dyn Classifier>) {
    loop {
        let target = {
            let mut slot = mailbox.slot.lock();
            while slot.target.is_none() && !slot.shutdown {
                mailbox.cond.wait(&mut slot);
            }
            if slot.shutdown {
                return;
            }
            slot.target.take()
        };
        let Some(path) = target else { continue };

        shared.set_process_state(ProcessState::Processing);
        // Decoders can panic on malformed headers (e.g. a declared sample
        // rate of zero). Catch the unwind so one bad file cannot kill the
        // worker and strand the state in Processing.
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| classify_file(classifier, &path)));
        match outcome {
            Ok(Ok(kind)) => {
                let len = shared.append_kind(kind);
                shared.mark_ui_chain_changed();
                shared.set_process_state(ProcessState::Succeeded);
                info!(path = %path.display(), %kind, chain_len = len, "classification complete");
            }
            Ok(Err(err)) => {
                shared.set_process_state(ProcessState::Failed);
                warn!(path = %path.display(), %err, "classification failed");
            }
            Err(_) => {
                shared.set_process_state(ProcessState::Failed);
                warn!(path = %path.display(), "decoder panicked on malformed file");
            }
        }
    }
}

/// Decode, condition, and classify one file.
fn classify_file(
    classifier: &Arc<dyn Classifier>,
    path: &Path,
) -> Result<EffectKind, ClassifyError> {
    let decoded = decode_to_mono(path)?;
    debug!(
        samples = decoded.samples.len(),
        rate = decoded.sample_rate,
        "decoded target"
    );
    let input = prepare_model_input(&decoded.samples, decoded.sample_rate)?;
    classify_with_watchdog(classifier, input)
}

/// Run inference on a helper thread and give up after [`CLASSIFY_TIMEOUT`].
///
/// The helper is detached on expiry; its eventual result is dropped with
/// the channel.
fn classify_with_watchdog(
    classifier: &Arc<dyn Classifier>,
    input: Vec<f32>,
) -> Result<EffectKind, ClassifyError> {
    let (tx, rx) = mpsc::channel();
    let task_classifier = Arc::clone(classifier);
    let spawned = thread::Builder::new()
        .name("autofx-inference".into())
        .spawn(move || {
            let _ = tx.send(task_classifier.classify(&input));
        });
    if spawned.is_err() {
        return Err(ClassifyError::Timeout);
    }
    match rx.recv_timeout(CLASSIFY_TIMEOUT) {
        Ok(result) => result,
        Err(_) => {
            warn!("inference exceeded {CLASSIFY_TIMEOUT:?}, abandoning");
            Err(ClassifyError::Timeout)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    struct FixedClassifier(EffectKind, AtomicUsize);

    impl Classifier for FixedClassifier {
        fn classify(&self, _samples: &[f32]) -> Result<EffectKind, ClassifyError> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Ok(self.0)
        }
    }

    fn wait_for_state(shared: &EngineShared, state: ProcessState) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while shared.process_state() != state {
            assert!(Instant::now() < deadline, "timed out waiting for {state:?}");
            thread::sleep(Duration::from_millis(5));
        }
    }

    fn write_test_wav(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("clip.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22_050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..22_050 {
            let t = i as f32 / 22_050.0;
            let s = (core::f32::consts::TAU * 440.0 * t).sin() * 0.5;
            writer.write_sample((s * i16::MAX as f32) as i16).unwrap();
        }
        writer.finalize().unwrap();
        path
    }

    // Minimal RIFF container whose fmt chunk declares a sample rate of
    // zero, which makes the decoder panic during probing.
    fn zero_rate_wav_bytes() -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&40u32.to_le_bytes());
        bytes.extend_from_slice(b"WAVE");
        bytes.extend_from_slice(b"fmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&0u32.to_le_bytes()); // sample rate
        bytes.extend_from_slice(&0u32.to_le_bytes()); // byte rate
        bytes.extend_from_slice(&2u16.to_le_bytes()); // block align
        bytes.extend_from_slice(&16u16.to_le_bytes()); // bits per sample
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&4u32.to_le_bytes());
        bytes.extend_from_slice(&[0, 0, 0, 0]);
        bytes
    }

    #[test]
    fn malformed_header_fails_and_worker_survives() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("zero_rate.wav");
        std::fs::write(&bad, zero_rate_wav_bytes()).unwrap();

        let shared = EngineShared::new();
        let classifier = Arc::new(FixedClassifier(EffectKind::Chorus, AtomicUsize::new(0)));
        let worker = ClassificationWorker::spawn(shared.clone(), classifier);

        worker.set_target(bad);
        wait_for_state(&shared, ProcessState::Failed);
        assert_eq!(shared.chain().len(), 0);

        // The thread must still be alive to service the next target.
        let good = write_test_wav(&dir);
        worker.set_target(good);
        wait_for_state(&shared, ProcessState::Succeeded);
        assert_eq!(shared.chain().len(), 1);
    }

    #[test]
    fn successful_classification_appends_kind() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_wav(&dir);

        let shared = EngineShared::new();
        let classifier = Arc::new(FixedClassifier(EffectKind::Phaser, AtomicUsize::new(0)));
        let worker = ClassificationWorker::spawn(shared.clone(), classifier.clone());

        worker.set_target(path);
        wait_for_state(&shared, ProcessState::Succeeded);

        assert_eq!(shared.chain().len(), 1);
        assert_eq!(shared.chain().kind_at(0), Some(EffectKind::Phaser));
        assert!(shared.take_rebuild());
        assert!(shared.take_ui_chain_changed());
        assert_eq!(classifier.1.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn missing_file_fails_without_touching_chain() {
        let shared = EngineShared::new();
        let classifier = Arc::new(FixedClassifier(EffectKind::Reverb, AtomicUsize::new(0)));
        let worker = ClassificationWorker::spawn(shared.clone(), classifier.clone());

        worker.set_target(PathBuf::from("/nonexistent/clip.wav"));
        wait_for_state(&shared, ProcessState::Failed);

        assert_eq!(shared.chain().len(), 0);
        assert!(!shared.rebuild_pending());
        // The model never ran.
        assert_eq!(classifier.1.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsupported_extension_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.flac");
        std::fs::write(&path, b"not audio").unwrap();

        let shared = EngineShared::new();
        let classifier = Arc::new(FixedClassifier(EffectKind::Chorus, AtomicUsize::new(0)));
        let worker = ClassificationWorker::spawn(shared.clone(), classifier);

        worker.set_target(path);
        wait_for_state(&shared, ProcessState::Failed);
        assert_eq!(shared.chain().len(), 0);
    }

    #[test]
    fn drop_joins_cleanly() {
        let shared = EngineShared::new();
        let classifier = Arc::new(FixedClassifier(EffectKind::Dry, AtomicUsize::new(0)));
        let worker = ClassificationWorker::spawn(shared, classifier);
        drop(worker);
    }
}
