//! Classifier adapter seam.
//!
//! Frame-to-gesture classification is an external capability; the engine
//! only needs "given a frame, eventually produce the top-ranked label and
//! confidence". Calls are asynchronous and the scheduler guarantees at most
//! one is in flight.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::ClassifierError;
use crate::gesture::RawClassification;

/// Handle to one captured video frame
///
/// Pixel data stays with the capture layer; the core only needs ordering
/// and the capture instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoFrame {
    pub index: u64,
    pub captured_at: Instant,
}

impl VideoFrame {
    pub fn new(index: u64, captured_at: Instant) -> Self {
        Self { index, captured_at }
    }
}

/// What one classification call resolves to
pub type ClassifierOutput = Result<Option<RawClassification>, ClassifierError>;

/// Asynchronous frame classifier
pub trait GestureClassifier {
    /// Start classifying `frame`
    ///
    /// `Ok(None)` means no hand or no confident gesture in the frame.
    fn classify(&mut self, frame: &VideoFrame) -> BoxFuture<'static, ClassifierOutput>;
}

impl<C: GestureClassifier + ?Sized> GestureClassifier for Box<C> {
    fn classify(&mut self, frame: &VideoFrame) -> BoxFuture<'static, ClassifierOutput> {
        (**self).classify(frame)
    }
}

/// Future that stays pending for a fixed number of polls
struct Delayed {
    remaining_polls: u32,
    output: Option<ClassifierOutput>,
}

impl Future for Delayed {
    type Output = ClassifierOutput;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        if self.remaining_polls > 0 {
            self.remaining_polls -= 1;
            cx.waker().wake_by_ref();
            return Poll::Pending;
        }
        Poll::Ready(self.output.take().unwrap_or(Ok(None)))
    }
}

/// Replays a recorded list of classifier outputs, one per call
///
/// Once the list is exhausted every call resolves to "no gesture".
pub struct ScriptedClassifier {
    outputs: VecDeque<ClassifierOutput>,
    latency_polls: u32,
    calls: u64,
}

impl ScriptedClassifier {
    pub fn new(outputs: impl IntoIterator<Item = Option<RawClassification>>) -> Self {
        Self::from_results(outputs.into_iter().map(Ok))
    }

    /// Script that may include classifier failures
    pub fn from_results(outputs: impl IntoIterator<Item = ClassifierOutput>) -> Self {
        Self {
            outputs: outputs.into_iter().collect(),
            latency_polls: 0,
            calls: 0,
        }
    }

    /// Keep every call pending for `polls` polls before it resolves
    pub fn with_latency(mut self, polls: u32) -> Self {
        self.latency_polls = polls;
        self
    }

    pub fn remaining(&self) -> usize {
        self.outputs.len()
    }

    pub fn calls(&self) -> u64 {
        self.calls
    }
}

impl GestureClassifier for ScriptedClassifier {
    fn classify(&mut self, _frame: &VideoFrame) -> BoxFuture<'static, ClassifierOutput> {
        self.calls += 1;
        Delayed {
            remaining_polls: self.latency_polls,
            output: Some(self.outputs.pop_front().unwrap_or(Ok(None))),
        }
        .boxed()
    }
}

/// Wraps another classifier and jitters its confidences
///
/// Used to check that a graph and threshold table still behave under
/// classifier noise. Seeded, so runs are reproducible.
pub struct NoisyClassifier<C> {
    inner: C,
    rng: StdRng,
    jitter: f32,
}

impl<C: GestureClassifier> NoisyClassifier<C> {
    /// # Arguments
    /// * `inner` - Classifier whose outputs get perturbed
    /// * `jitter` - Maximum absolute confidence offset
    /// * `seed` - RNG seed
    pub fn new(inner: C, jitter: f32, seed: u64) -> Self {
        Self {
            inner,
            rng: StdRng::seed_from_u64(seed),
            jitter: jitter.abs(),
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: GestureClassifier> GestureClassifier for NoisyClassifier<C> {
    fn classify(&mut self, frame: &VideoFrame) -> BoxFuture<'static, ClassifierOutput> {
        let offset = if self.jitter > 0.0 {
            self.rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        };

        self.inner
            .classify(frame)
            .map(move |output| {
                output.map(|raw| {
                    raw.map(|mut raw| {
                        raw.confidence = (raw.confidence + offset).clamp(0.0, 1.0);
                        raw
                    })
                })
            })
            .boxed()
    }
}
