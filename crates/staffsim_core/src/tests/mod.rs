//! Integration tests for the staffing simulation engine
//!
//! Tests are organized by topic:
//! - `fixtures` - Shared task profile sets and scenario grids
//! - `simulation` - Core Monte Carlo mechanics and concrete scenarios
//! - `properties` - Invariants that hold for any seed
//! - `analysis` - Sensitivity sweeps and what-if comparisons
//! - `optimization` - Constraint filtering and ranking

mod fixtures;
mod optimization;
