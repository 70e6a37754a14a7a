// FrameScheduler - cooperative per-frame classification
//
// One tick per video frame:
//   1. A request still in flight is polled once. If it is still pending the
//      frame is dropped (counted) and nothing else happens this tick.
//   2. Otherwise a request is issued for the current frame and polled once,
//      so a classifier that answers synchronously resolves on the same tick.
//
// Polling uses a no-op waker: the frame loop itself is the wakeup.

use std::future::Future;
use std::task::{Context, Poll};

use futures::future::BoxFuture;
use futures::task::noop_waker_ref;

use crate::engine::classifier::{ClassifierOutput, GestureClassifier, VideoFrame};

/// A classification that finished, tagged with the frame it was issued for
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    pub frame: VideoFrame,
    pub output: ClassifierOutput,
}

/// Result of one scheduler tick
#[derive(Debug, Clone, PartialEq)]
pub enum FrameTick {
    /// Previous request still running, frame dropped
    Skipped,
    /// Zero, one or two resolutions in frame order
    Processed(Vec<Resolution>),
}

struct InFlight {
    frame: VideoFrame,
    future: BoxFuture<'static, ClassifierOutput>,
}

#[derive(Default)]
pub struct FrameScheduler {
    in_flight: Option<InFlight>,
    issued: u64,
    skipped: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tick<C>(&mut self, classifier: &mut C, frame: VideoFrame) -> FrameTick
    where
        C: GestureClassifier + ?Sized,
    {
        let mut resolved = Vec::with_capacity(2);

        if let Some(mut pending) = self.in_flight.take() {
            match poll_once(&mut pending.future) {
                Poll::Pending => {
                    self.in_flight = Some(pending);
                    self.skipped += 1;
                    tracing::trace!(frame = frame.index, skipped = self.skipped, "frame skipped");
                    return FrameTick::Skipped;
                }
                Poll::Ready(output) => resolved.push(Resolution {
                    frame: pending.frame,
                    output,
                }),
            }
        }

        let mut future = classifier.classify(&frame);
        self.issued += 1;
        match poll_once(&mut future) {
            Poll::Ready(output) => resolved.push(Resolution { frame, output }),
            Poll::Pending => self.in_flight = Some(InFlight { frame, future }),
        }

        FrameTick::Processed(resolved)
    }

    /// Drop any request in flight, e.g. when switching modes
    pub fn cancel(&mut self) {
        if let Some(pending) = self.in_flight.take() {
            tracing::debug!(frame = pending.frame.index, "in-flight classification dropped");
        }
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

fn poll_once(future: &mut BoxFuture<'static, ClassifierOutput>) -> Poll<ClassifierOutput> {
    let mut cx = Context::from_waker(noop_waker_ref());
    future.as_mut().poll(&mut cx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::classifier::ScriptedClassifier;
    use crate::gesture::RawClassification;
    use std::time::{Duration, Instant};

    fn frames(count: u64) -> Vec<VideoFrame> {
        let start = Instant::now();
        (0..count)
            .map(|i| VideoFrame::new(i, start + Duration::from_millis(33 * i)))
            .collect()
    }

    fn raw(confidence: f32) -> Option<RawClassification> {
        Some(RawClassification::new("Thumb_Up", confidence))
    }

    #[test]
    fn test_immediate_classifier_resolves_every_frame() {
        let mut classifier = ScriptedClassifier::new(vec![raw(0.1), raw(0.2), raw(0.3)]);
        let mut scheduler = FrameScheduler::new();

        for (i, frame) in frames(3).into_iter().enumerate() {
            match scheduler.tick(&mut classifier, frame) {
                FrameTick::Processed(resolved) => {
                    assert_eq!(resolved.len(), 1);
                    assert_eq!(resolved[0].frame.index, i as u64);
                }
                FrameTick::Skipped => panic!("unexpected skip"),
            }
        }
        assert!(!scheduler.is_busy());
        assert_eq!(scheduler.skipped(), 0);
    }

    #[test]
    fn test_slow_classifier_skips_frames() {
        // Each request needs two extra polls
        let mut classifier =
            ScriptedClassifier::new(vec![raw(0.1), raw(0.2), raw(0.3)]).with_latency(2);
        let mut scheduler = FrameScheduler::new();
        let frames = frames(6);

        let ticks: Vec<FrameTick> = frames
            .iter()
            .map(|frame| scheduler.tick(&mut classifier, *frame))
            .collect();

        // Frame 0 issued (poll 1 pending), 1 poll 2 pending, 2 resolves 0 and issues 2
        assert_eq!(ticks[0], FrameTick::Processed(vec![]));
        assert_eq!(ticks[1], FrameTick::Skipped);
        match &ticks[2] {
            FrameTick::Processed(resolved) => {
                assert_eq!(resolved.len(), 1);
                assert_eq!(resolved[0].frame.index, 0);
                assert_eq!(resolved[0].output, Ok(raw(0.1)));
            }
            other => panic!("Expected Processed, got {:?}", other),
        }
        assert_eq!(ticks[3], FrameTick::Skipped);
        match &ticks[4] {
            FrameTick::Processed(resolved) => assert_eq!(resolved[0].frame.index, 2),
            other => panic!("Expected Processed, got {:?}", other),
        }
        assert_eq!(ticks[5], FrameTick::Skipped);
        assert_eq!(scheduler.skipped(), 3);
        assert_eq!(classifier.calls(), 3);
    }

    #[test]
    fn test_at_most_one_request_in_flight() {
        let mut classifier = ScriptedClassifier::new(Vec::<Option<RawClassification>>::new()).with_latency(100);
        let mut scheduler = FrameScheduler::new();

        for frame in frames(20) {
            scheduler.tick(&mut classifier, frame);
        }
        assert_eq!(classifier.calls(), 1);
        assert_eq!(scheduler.issued(), 1);
        assert_eq!(scheduler.skipped(), 19);
    }

    #[test]
    fn test_cancel_frees_the_slot() {
        let mut classifier = ScriptedClassifier::new(Vec::<Option<RawClassification>>::new()).with_latency(100);
        let mut scheduler = FrameScheduler::new();
        let frames = frames(2);

        scheduler.tick(&mut classifier, frames[0]);
        assert!(scheduler.is_busy());
        scheduler.cancel();
        assert!(!scheduler.is_busy());
        assert_eq!(
            scheduler.tick(&mut classifier, frames[1]),
            FrameTick::Processed(vec![])
        );
        assert_eq!(classifier.calls(), 2);
    }
}
