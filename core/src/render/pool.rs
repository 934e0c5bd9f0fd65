use std::collections::BTreeMap;
use std::thread;

use crossbeam::channel::bounded;
use tracing::debug;

use crate::config::RenderOptions;
use crate::orchestrator::EncodedFrames;
use crate::render::types::{QrRenderer, RenderError};
use crate::utils::latin1_bytes;

/// Buffers out-of-order results and releases them by index.
struct OrderedImages<T> {
    next: usize,
    pending: BTreeMap<usize, T>,
    out: Vec<T>,
}

impl<T> OrderedImages<T> {
    fn new(expected: usize) -> Self {
        Self { next: 0, pending: BTreeMap::new(), out: Vec::with_capacity(expected) }
    }

    fn push(&mut self, index: usize, image: T) {
        self.pending.insert(index, image);
        while let Some(image) = self.pending.remove(&self.next) {
            self.out.push(image);
            self.next += 1;
        }
    }

    fn finish(self, expected: usize) -> Result<Vec<T>, RenderError> {
        if self.out.len() != expected || !self.pending.is_empty() {
            return Err(RenderError::Pipeline(format!(
                "{} of {expected} frames rendered",
                self.out.len()
            )));
        }
        Ok(self.out)
    }
}

/// Render an encoded frame set, honouring its binary flag.
pub fn render_frames<R: QrRenderer>(
    renderer: &R,
    encoded: &EncodedFrames,
    options: &RenderOptions,
) -> Result<Vec<R::Image>, RenderError> {
    render_strings(renderer, &encoded.frames, encoded.binary, options)
}

/// Render `frames` on `options.worker_count()` threads.
///
/// Workers share nothing but the renderer; the result list is in frame
/// order whatever order the workers finish in. The first renderer error
/// stops the pool.
pub fn render_strings<R: QrRenderer>(
    renderer: &R,
    frames: &[String],
    binary: bool,
    options: &RenderOptions,
) -> Result<Vec<R::Image>, RenderError> {
    if frames.is_empty() {
        return Ok(Vec::new());
    }
    let workers = options.worker_count().min(frames.len());
    let (job_tx, job_rx) = bounded::<(usize, &str)>(workers * 2);
    let (out_tx, out_rx) = bounded::<(usize, anyhow::Result<R::Image>)>(workers * 2);

    thread::scope(|scope| {
        scope.spawn(move || {
            for (index, frame) in frames.iter().enumerate() {
                if job_tx.send((index, frame.as_str())).is_err() {
                    break;
                }
            }
        });

        for id in 0..workers {
            let rx = job_rx.clone();
            let tx = out_tx.clone();
            scope.spawn(move || {
                debug!(worker = id, "render worker starting");
                for (index, frame) in rx.iter() {
                    let image = match binary.then(|| latin1_bytes(frame)).flatten() {
                        Some(bytes) => renderer.render_bytes(&bytes, options),
                        None => renderer.render_text(frame, options),
                    };
                    if tx.send((index, image)).is_err() {
                        break;
                    }
                }
                debug!(worker = id, "render worker finished");
            });
        }

        // only workers hold channel ends from here on
        drop(job_rx);
        drop(out_tx);

        let mut ordered = OrderedImages::new(frames.len());
        let mut failure = None;
        for (index, result) in out_rx.iter() {
            match result {
                Ok(image) => ordered.push(index, image),
                Err(e) => {
                    failure = Some(RenderError::Renderer { index, detail: format!("{e:#}") });
                    break;
                }
            }
        }
        // workers blocked on a full result channel see the disconnect and exit
        drop(out_rx);

        match failure {
            Some(err) => Err(err),
            None => ordered.finish(frames.len()),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Returns the frame text itself as the "image".
    struct EchoRenderer;

    impl QrRenderer for EchoRenderer {
        type Image = String;

        fn render_text(&self, text: &str, _: &RenderOptions) -> anyhow::Result<String> {
            Ok(text.to_string())
        }

        fn render_bytes(&self, bytes: &[u8], _: &RenderOptions) -> anyhow::Result<String> {
            Ok(hex::encode(bytes))
        }
    }

    struct FailingRenderer;

    impl QrRenderer for FailingRenderer {
        type Image = ();

        fn render_text(&self, text: &str, _: &RenderOptions) -> anyhow::Result<()> {
            anyhow::ensure!(text != "bad", "symbol too dense");
            Ok(())
        }
    }

    struct FailOn(&'static str);

    impl QrRenderer for FailOn {
        type Image = String;

        fn render_text(&self, text: &str, _: &RenderOptions) -> anyhow::Result<String> {
            anyhow::ensure!(text != self.0, "cannot draw {text}");
            Ok(text.to_string())
        }
    }

    #[test]
    fn images_come_back_in_frame_order() {
        let frames: Vec<String> = (0..50).map(|i| format!("frame-{i}")).collect();
        let options = RenderOptions { workers: 4, ..RenderOptions::default() };
        let images = render_strings(&EchoRenderer, &frames, false, &options).unwrap();
        assert_eq!(images, frames);
    }

    #[test]
    fn binary_frames_use_render_bytes() {
        let frames = vec!["\u{ff}\u{0}".to_string()];
        let images = render_strings(&EchoRenderer, &frames, true, &RenderOptions::default()).unwrap();
        assert_eq!(images, vec!["ff00".to_string()]);
    }

    #[test]
    fn early_failure_with_a_long_backlog_returns() {
        // far more frames than the two bounded channels can hold
        let frames: Vec<String> = (0..40).map(|i| format!("f{i}")).collect();
        let renderer = FailOn("f1");
        let options = RenderOptions { workers: 1, ..RenderOptions::default() };

        let err = render_strings(&renderer, &frames, false, &options).unwrap_err();
        assert!(matches!(err, RenderError::Renderer { index: 1, .. }));
    }

    #[test]
    fn renderer_error_names_the_frame() {
        let frames = vec!["ok".to_string(), "bad".to_string(), "ok".to_string()];
        let options = RenderOptions { workers: 1, ..RenderOptions::default() };
        let err = render_strings(&FailingRenderer, &frames, false, &options).unwrap_err();
        assert!(matches!(err, RenderError::Renderer { index: 1, .. }));
    }
}
