//! Deterministic 2D rectangular stock-cutting optimizer.
//!
//! Given a set of stock sheets and demanded items (all in millimeters),
//! this crate quantizes geometry to an integer grid, resolves each
//! item's allowed rotations, and runs a time-budgeted multi-restart
//! search over one of three packer families (Guillotine, MaxRects,
//! Skyline, each hardcoded to a single placement heuristic) to find a
//! feasible layout minimizing either waste area or sheet count. In
//! `"guillotine"` mode, every candidate layout is additionally checked
//! for guillotine-separability before it can win.
//!
//! The crate's only public entry point is [`optimize`]; everything
//! else under this crate root is the request/response schema it
//! accepts and returns.

#![deny(missing_docs)]

mod bins;
mod config;
mod error;
mod evaluate;
mod guillotine_check;
mod instances;
mod model;
mod orientation;
mod packer;
mod quantize;
mod rng;
mod search;
mod validate;


pub use config::Config;
pub use error::PackError;
pub use model::{
    Artifacts, BinSelect, EngineOverride, EngineSummary, ErrorResponse, Item, Mode, Objective,
    OptimizeOutput, OptimizeRequest, OptimizeResponse, PackerKind, Params, PatternDirection,
    Placement, Rotation, Solution, SortMode, Stock, Summary, Trim,
};
pub use search::optimize;
