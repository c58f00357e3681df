//! Pipeline conversions module
//!
//! Orchestration of the stages that turn a photograph into a dice map.

mod dice_map;


pub use dice_map::{DiceMapPipeline, MapReport, MapSelection};
