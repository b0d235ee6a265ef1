//! Fracture simulation module
//!
//! All damage logic lives here. This module must stay free of rendering and
//! platform dependencies:
//! - Frame-paced steps only (one call per display refresh)
//! - Randomness through an injected `RandomSource`
//! - Time through the `now` timestamp handed to `tick`

pub mod crack;
pub mod geometry;
pub mod impact;
pub mod repair;
pub mod ring;
pub mod rng;
pub mod rock;
pub mod snapshot;
pub mod state;
pub mod tick;
pub mod triggers;

pub use crack::{CrackField, CrackSegment};
pub use geometry::GlassViewport;
pub use impact::{ignite, record_impact};
pub use repair::RepairController;
pub use ring::{Ring, RingField};
pub use rng::{RandomSource, SequenceRng, SimRng};
pub use rock::{Rock, RockEvent};
pub use snapshot::{AuraView, CrackView, FlashView, FrameSnapshot, RockView};
pub use state::{Flash, SimulationState};
pub use tick::{Action, Simulation};
pub use triggers::{EnvTriggers, TriggerOffsets, TriggerState};
