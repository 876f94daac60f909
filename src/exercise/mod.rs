//! The learning exercises ("episodes") and the lifecycle that drives them.

pub mod ep1;
pub mod ep2;
pub mod ep3;
pub mod ep4;
pub mod lifecycle;
pub mod template;

use std::fmt;
use std::str::FromStr;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::asset::TextureLoader;
use crate::renderer::RendererOptions;
use crate::scene::{Scene, SceneError};
use crate::time::FrameTime;

pub use ep1::Ep1;
pub use ep2::Ep2;
pub use ep3::Ep3;
pub use ep4::Ep4;
pub use lifecycle::{Exercise, LifecycleError, LifecycleState};
pub use template::Template;

/// One episode's content: how its renderer and camera are set up, what the
/// scene contains and how it moves.
pub trait Episode {
    fn name(&self) -> &'static str;

    fn renderer_options(&self) -> RendererOptions {
        RendererOptions::default()
    }

    /// Initial camera position. The camera always looks at the origin.
    fn camera_position(&self) -> Vec3;

    fn wants_controls(&self) -> bool {
        true
    }

    /// Populates the scene. Called exactly once.
    fn create(&mut self, scene: &mut Scene, loader: &mut TextureLoader) -> Result<(), SceneError>;

    /// Advances the animation. Must only depend on `time` and the episode's
    /// own accumulated state.
    fn update(&mut self, _scene: &mut Scene, _time: FrameTime) {}
}

/// Which episode a host runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    Ep1,
    Ep2,
    Ep3,
    #[default]
    Ep4,
    Template,
}

impl ExerciseKind {
    pub const ALL: [ExerciseKind; 5] = [
        ExerciseKind::Ep1,
        ExerciseKind::Ep2,
        ExerciseKind::Ep3,
        ExerciseKind::Ep4,
        ExerciseKind::Template,
    ];

    pub fn episode(self) -> Box<dyn Episode> {
        match self {
            ExerciseKind::Ep1 => Box::new(Ep1::new()),
            ExerciseKind::Ep2 => Box::new(Ep2::new()),
            ExerciseKind::Ep3 => Box::new(Ep3::new()),
            ExerciseKind::Ep4 => Box::new(Ep4::new()),
            ExerciseKind::Template => Box::new(Template::new()),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ExerciseKind::Ep1 => "ep1",
            ExerciseKind::Ep2 => "ep2",
            ExerciseKind::Ep3 => "ep3",
            ExerciseKind::Ep4 => "ep4",
            ExerciseKind::Template => "template",
        }
    }
}

impl fmt::Display for ExerciseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownExercise(pub String);

impl fmt::Display for UnknownExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown exercise '{}'", self.0)
    }
}

impl std::error::Error for UnknownExercise {}

impl FromStr for ExerciseKind {
    type Err = UnknownExercise;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ExerciseKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| UnknownExercise(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("EP3".parse::<ExerciseKind>(), Ok(ExerciseKind::Ep3));
        assert_eq!(" template ".parse::<ExerciseKind>(), Ok(ExerciseKind::Template));
        assert!("ep5".parse::<ExerciseKind>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for kind in ExerciseKind::ALL {
            assert_eq!(kind.to_string().parse::<ExerciseKind>(), Ok(kind));
        }
    }

    #[test]
    fn each_kind_builds_its_episode() {
        let names: Vec<_> = ExerciseKind::ALL
            .into_iter()
            .map(|kind| kind.episode().name())
            .collect();
        assert_eq!(names, ["EP1", "EP2", "EP3", "EP4", "Template"]);
    }
}
