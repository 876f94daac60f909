//! The page-level owner of an exercise: a one-shot start guard around
//! construction and the `init → create → start` sequence.

use log::{info, warn};

use crate::exercise::{Exercise, ExerciseKind, LifecycleError};
use crate::renderer::{DrawingSurface, RenderBackend};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountOutcome {
    Started,
    AlreadyStarted,
    SurfaceMissing,
}

pub struct Host<B: RenderBackend> {
    kind: ExerciseKind,
    asset_root: String,
    started: bool,
    exercise: Option<Exercise<B>>,
}

impl<B: RenderBackend> Host<B> {
    pub fn new(kind: ExerciseKind, asset_root: impl Into<String>) -> Self {
        Self {
            kind,
            asset_root: asset_root.into(),
            started: false,
            exercise: None,
        }
    }

    pub fn kind(&self) -> ExerciseKind {
        self.kind
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn exercise(&self) -> Option<&Exercise<B>> {
        self.exercise.as_ref()
    }

    pub fn exercise_mut(&mut self) -> Option<&mut Exercise<B>> {
        self.exercise.as_mut()
    }

    /// Runs once the drawing surface may exist. Mounting again after a
    /// successful (or failed) start does nothing.
    pub fn mount<S>(&mut self, surface: Option<&mut S>) -> Result<MountOutcome, LifecycleError>
    where
        S: DrawingSurface<Backend = B>,
    {
        let Some(surface) = surface else {
            warn!("Drawing surface is not available, nothing to start");
            return Ok(MountOutcome::SurfaceMissing);
        };
        if self.started {
            return Ok(MountOutcome::AlreadyStarted);
        }

        info!("Drawing surface is available");
        self.started = true;

        let exercise = self
            .exercise
            .insert(Exercise::new(self.kind.episode(), self.asset_root.clone()));
        exercise.init(surface)?;
        exercise.create()?;
        exercise.start()?;
        Ok(MountOutcome::Started)
    }
}
