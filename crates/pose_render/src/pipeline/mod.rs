//! Pipeline controller
//!
//! One logical thread: wait → decode → build → render → publish → repeat.
//! The only suspension point is the watcher. Every failure except a watcher
//! failure abandons the current cycle and returns to waiting.

mod error;

use std::path::PathBuf;

pub use error::{CycleError, PipelineError};

use crate::core::config::NodeConfig;
use crate::foundation::cancel::StopToken;
use crate::pose::{self, PoseSample, QuaternionPolicy};
use crate::publish::{ImageSink, PngPublisher};
use crate::render::{self, RenderEngine, SoftwareRenderer};
use crate::scene::{SceneAssets, SceneBuilder};
use crate::watch::{self, ChangeEvent, ChangeKind, WatchSource};

/// Controller states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Between cycles after a successful publish
    Idle,
    /// Blocked on the watcher
    Waiting,
    /// Reading and decoding the message
    Decoding,
    /// Building the scene
    Building,
    /// Engine running
    Rendering,
    /// Writing the image
    Publishing,
    /// Stop requested; the loop has exited
    Stopped,
}

/// Result of a single cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Image published for this pose
    Published(PoseSample),
    /// Cycle abandoned
    Skipped(CycleError),
    /// Stop requested while waiting
    Stopped,
}

/// Counters reported when the loop exits
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Wake-ups handled
    pub cycles: u64,
    /// Images published
    pub published: u64,
    /// Cycles abandoned
    pub skipped: u64,
}

/// Drives the watch → render → publish loop
pub struct PipelineController<W, E, S> {
    watch: W,
    engine: E,
    sink: S,
    builder: SceneBuilder,
    message_path: PathBuf,
    min_payload_bytes: u64,
    policy: QuaternionPolicy,
    tolerance: f64,
    state: PipelineState,
    stop: StopToken,
    summary: RunSummary,
}

/// Controller wired with the stock components
pub type NodePipeline = PipelineController<Box<dyn WatchSource>, SoftwareRenderer, PngPublisher>;

/// Build the stock controller from configuration
///
/// Fails only if the watcher cannot be registered.
pub fn node_pipeline(config: &NodeConfig) -> Result<NodePipeline, PipelineError> {
    let watch = watch::from_config(&config.message_path, &config.watcher)?;
    Ok(PipelineController::new(
        config,
        watch,
        SoftwareRenderer::new(),
        PngPublisher::new(&config.output_path),
    ))
}

impl<W: WatchSource, E: RenderEngine, S: ImageSink> PipelineController<W, E, S> {
    /// Assemble a controller; starts in [`PipelineState::Waiting`]
    pub fn new(config: &NodeConfig, watch: W, engine: E, sink: S) -> Self {
        Self {
            watch,
            engine,
            sink,
            builder: SceneBuilder::new(SceneAssets::from(&config.assets)),
            message_path: config.message_path.clone(),
            min_payload_bytes: config.min_payload_bytes,
            policy: config.quaternion_policy,
            tolerance: config.quaternion_tolerance,
            state: PipelineState::Waiting,
            stop: StopToken::new(),
            summary: RunSummary::default(),
        }
    }

    /// Handle for requesting a clean stop
    pub fn stop_token(&self) -> StopToken {
        self.stop.clone()
    }

    /// Current state
    pub const fn state(&self) -> PipelineState {
        self.state
    }

    /// Check that the static scene can be built at all
    ///
    /// Missing geometry would fail every cycle, so it is fatal here.
    pub fn preflight(&self) -> Result<(), PipelineError> {
        self.builder
            .build(&PoseSample::identity())
            .map(|_| ())
            .map_err(PipelineError::Preflight)
    }

    /// Wait for one change and process it
    pub fn run_cycle(&mut self) -> Result<CycleOutcome, PipelineError> {
        self.transition(PipelineState::Waiting);

        let Some(event) = self.watch.await_change(&self.stop)? else {
            self.transition(PipelineState::Stopped);
            return Ok(CycleOutcome::Stopped);
        };
        self.summary.cycles += 1;

        match self.process(&event) {
            Ok(pose) => {
                self.summary.published += 1;
                self.transition(PipelineState::Idle);
                Ok(CycleOutcome::Published(pose))
            }
            Err(err) => {
                self.summary.skipped += 1;
                match &err {
                    CycleError::NotReady { .. } | CycleError::Removed => {
                        log::debug!("Cycle skipped: {err}");
                    }
                    _ => log::warn!("Cycle abandoned: {err}"),
                }
                self.transition(PipelineState::Waiting);
                Ok(CycleOutcome::Skipped(err))
            }
        }
    }

    /// Loop until the stop token is set
    pub fn run(&mut self) -> Result<RunSummary, PipelineError> {
        self.run_limited(None)
    }

    /// Loop until stopped or until `max_cycles` wake-ups were handled
    pub fn run_limited(&mut self, max_cycles: Option<u64>) -> Result<RunSummary, PipelineError> {
        log::info!("Pipeline running on {}", self.message_path.display());

        while max_cycles.map_or(true, |max| self.summary.cycles < max) {
            if let CycleOutcome::Stopped = self.run_cycle()? {
                break;
            }
        }

        self.transition(PipelineState::Stopped);
        log::info!(
            "Pipeline stopped after {} cycles ({} published, {} skipped)",
            self.summary.cycles,
            self.summary.published,
            self.summary.skipped
        );
        Ok(self.summary)
    }

    fn process(&mut self, event: &ChangeEvent) -> Result<PoseSample, CycleError> {
        if event.kind == ChangeKind::Removed {
            return Err(CycleError::Removed);
        }

        self.transition(PipelineState::Decoding);
        let bytes = watch::read_ready(&self.message_path, self.min_payload_bytes)?;
        let decoded = pose::decode(&bytes)?;
        let sample = self.policy.apply(decoded, self.tolerance)?;
        log::debug!(
            "Pose q={:?} p={:?}",
            sample.pose_wire(),
            sample.position_wire()
        );

        self.transition(PipelineState::Building);
        let scene = self.builder.build(&sample)?;

        self.transition(PipelineState::Rendering);
        let image = render::invoke(&mut self.engine, &scene)?;

        self.transition(PipelineState::Publishing);
        self.sink.publish(&image)?;

        log::info!("Published frame for position {:?}", sample.position_wire());
        Ok(sample)
    }

    fn transition(&mut self, next: PipelineState) {
        if self.state != next {
            log::trace!("{:?} -> {next:?}", self.state);
            self.state = next;
        }
    }
}
