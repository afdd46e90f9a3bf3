//! Size-convergence engine.
//!
//! Starting from a first-pass artifact, repeatedly re-encodes at lower quality
//! until the output fits the byte budget. Quality only ever goes down, and an
//! iteration is kept only if it is strictly smaller than the best so far; the
//! first iteration that fails to improve ends the loop. The result is the
//! smallest artifact seen, whether or not it reached the target.

use anyhow::Result;

use crate::artifact::CompressedArtifact;
use crate::config::ConvergencePolicy;
use crate::observer::{Event, Observer};

/// Something that can produce a new encoding of the same content at a given
/// quality.
pub trait Reencode {
    fn reencode(&self, quality: u8) -> Result<CompressedArtifact>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Best artifact fits the target.
    Reached,
    /// Quality is at the floor; nothing left to try.
    Floor,
    /// Last iteration was not smaller than the best.
    NoImprovement,
    /// Iteration ceiling hit.
    IterationLimit,
    /// The encoder failed; best so far is kept.
    CodecError,
}

#[derive(Debug)]
pub struct Convergence {
    pub best: CompressedArtifact,
    /// Quality the best artifact was encoded at.
    pub quality: u8,
    pub iterations: u32,
    pub reason: StopReason,
}

pub fn converge<R: Reencode + ?Sized>(
    encoder: &R,
    first: CompressedArtifact,
    quality: u8,
    target: u64,
    policy: &ConvergencePolicy,
    observer: &dyn Observer,
) -> Convergence {
    let mut best = first;
    let mut best_quality = quality;
    let mut current = quality;
    let mut iterations = 0;

    let reason = loop {
        if best.size() <= target {
            break StopReason::Reached;
        }
        if iterations >= policy.max_iterations {
            break StopReason::IterationLimit;
        }
        let next = policy.next_quality(current);
        if next == current {
            break StopReason::Floor;
        }
        iterations += 1;
        current = next;

        let candidate = match encoder.reencode(next) {
            Ok(candidate) => candidate,
            Err(e) => {
                observer.record(&Event::CodecFailed {
                    stage: "re-encode",
                    error: format!("{:#}", e),
                });
                break StopReason::CodecError;
            }
        };

        let accepted = candidate.size() < best.size();
        observer.record(&Event::ConvergenceStep {
            iteration: iterations,
            quality: next,
            size: candidate.size(),
            accepted,
        });
        if !accepted {
            break StopReason::NoImprovement;
        }
        best = candidate;
        best_quality = next;
    };

    observer.record(&Event::ConvergenceFinished {
        quality: best_quality,
        size: best.size(),
        iterations,
        reason,
    });

    Convergence {
        best,
        quality: best_quality,
        iterations,
        reason,
    }
}
