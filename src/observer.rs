//! Side-channel for pipeline events. Observers record; they never steer.

use std::sync::Mutex;

use crate::classify::FileKind;
use crate::converge::StopReason;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Started {
        file_name: String,
        kind: FileKind,
        size: u64,
        /// Pixel size read from the image header, images only.
        dimensions: Option<(u32, u32)>,
    },
    StrategySelected {
        strategy: String,
        /// The convergence engine may run (target set, strategy supports it).
        converges: bool,
    },
    ImageResized {
        from: (u32, u32),
        to: (u32, u32),
    },
    FirstPass {
        /// `None` for lossless output.
        quality: Option<u8>,
        size: u64,
    },
    ConvergenceStep {
        iteration: u32,
        quality: u8,
        size: u64,
        accepted: bool,
    },
    ConvergenceFinished {
        quality: u8,
        size: u64,
        iterations: u32,
        reason: StopReason,
    },
    PdfDirect {
        pages: usize,
        size: u64,
    },
    PdfRaster {
        dpi: u32,
        quality: u8,
        max_width: u32,
        pages: usize,
        size: u64,
    },
    /// A codec call failed and the strategy moved to a weaker result.
    CodecFailed {
        stage: &'static str,
        error: String,
    },
    /// The original bytes are being returned.
    Unchanged {
        reason: String,
    },
    Finished {
        original_size: u64,
        compressed_size: u64,
    },
}

pub trait Observer: Send + Sync {
    fn record(&self, event: &Event);
}

/// Writes events through the `log` facade.
#[derive(Debug, Default)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn record(&self, event: &Event) {
        match event {
            Event::Started {
                file_name,
                kind,
                size,
                dimensions,
            } => match dimensions {
                Some((w, h)) => log::info!(
                    "Compressing {} ({}, {} bytes, {}x{})",
                    file_name,
                    kind,
                    size,
                    w,
                    h
                ),
                None => log::info!("Compressing {} ({}, {} bytes)", file_name, kind, size),
            },
            Event::StrategySelected {
                strategy,
                converges,
            } => log::info!(
                "Strategy: {}{}",
                strategy,
                if *converges { ", converging to target" } else { "" }
            ),
            Event::ImageResized { from, to } => {
                log::info!("Resized {}x{} -> {}x{}", from.0, from.1, to.0, to.1)
            }
            Event::FirstPass { quality, size } => match quality {
                Some(q) => log::info!("First pass at q={}: {} bytes", q, size),
                None => log::info!("First pass (lossless): {} bytes", size),
            },
            Event::ConvergenceStep {
                iteration,
                quality,
                size,
                accepted,
            } => log::debug!(
                "Iteration {}: q={} -> {} bytes ({})",
                iteration,
                quality,
                size,
                if *accepted { "kept" } else { "discarded" }
            ),
            Event::ConvergenceFinished {
                quality,
                size,
                iterations,
                reason,
            } => log::info!(
                "Converged after {} iterations: q={}, {} bytes ({:?})",
                iterations,
                quality,
                size,
                reason
            ),
            Event::PdfDirect { pages, size } => {
                log::info!("Re-serialized {} pages: {} bytes", pages, size)
            }
            Event::PdfRaster {
                dpi,
                quality,
                max_width,
                pages,
                size,
            } => log::info!(
                "Rasterized {} pages at {} dpi (q={}, max width {}): {} bytes",
                pages,
                dpi,
                quality,
                max_width,
                size
            ),
            Event::CodecFailed { stage, error } => log::warn!("{} failed: {}", stage, error),
            Event::Unchanged { reason } => log::warn!("Returning original file: {}", reason),
            Event::Finished {
                original_size,
                compressed_size,
            } => log::info!("Done: {} -> {} bytes", original_size, compressed_size),
        }
    }
}

/// Keeps every event in memory. Handy for tests and for callers that want
/// the full trace of a request.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Observer for RecordingObserver {
    fn record(&self, event: &Event) {
        match self.events.lock() {
            Ok(mut events) => events.push(event.clone()),
            Err(poisoned) => poisoned.into_inner().push(event.clone()),
        }
    }
}
