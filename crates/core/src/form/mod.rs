//! The multi-step form flow: step definitions and the state machine.

pub mod machine;
pub mod steps;

pub use machine::{AdvanceOutcome, FlowState, FormStateMachine, RetreatOutcome, StepStore};
pub use steps::{SurveyStep, MAX_STEP, MIN_STEP, TOTAL_STEPS};
