//! RoboGrid Environment Abstraction Layer
//!
//! Grid layouts are the only non-deterministic input to a RoboGrid round.
//! This crate puts that input behind a trait so rounds can run against
//! **Production** entropy or a **Simulation** seed.
//!
//! By deriving every layout from a single 64-bit seed, any surprising
//! round becomes reproducible via its seed number.
//!
//! # Example
//!
//! ```ignore
//! use robogrid_core::{GridConfig, OccupancyGrid, RunScanner};
//! use robogrid_env::LayoutContext;
//!
//! fn play_round<Ctx: LayoutContext>(ctx: &Ctx, round: u64) {
//!     let mut rng = ctx.round_rng(round);
//!     let grid = OccupancyGrid::from_config(&GridConfig::default(), &mut rng)?;
//!     let outcome = RunScanner::scan(&grid, 0, grid.height(), 4)?;
//! }
//! ```

mod context;
mod entropy_impl;

pub use context::LayoutContext;
pub use entropy_impl::EntropyContext;
