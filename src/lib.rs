//! Team formation and task allocation for the U-Engine ecosystem.
//!
//! Partitions a population of individuals into bounded-size groups that
//! maximize pairwise compatibility, then distributes each group's work
//! items across its members by skill match and workload balance.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Individual`, `Group`, `WorkItem`,
//!   `Assignment`, `Allocation`, `WorkloadReport`
//! - **`compatibility`**: Pairwise scoring (skill diversity, ability balance,
//!   availability overlap, personality) and the `CompatibilityMatrix`
//! - **`formation`**: `GreedyFormation` and `EvolutionaryFormation` behind the
//!   `FormationStrategy` trait, the `ga` runner, and `FormationKpi`
//! - **`allocation`**: `TaskAllocator`, workload reports, at-risk flagging
//! - **`validation`**: Input integrity checks (duplicate IDs, trait ranges, effort)
//! - **`planner`**: `TeamPlanner`, the end-to-end pipeline
//! - **`error`**: `EngineError` and the crate `Result` alias
//!
//! # Architecture
//!
//! Formation reads only the compatibility matrix; allocation reads only a
//! group and its members. Both strategies emit the same `Formation` shape,
//! so allocation never depends on which strategy ran.
//!
//! Logging goes through the `tracing` facade. The crate never installs a
//! subscriber.
//!
//! # References
//!
//! - Falkenauer (1998), "Genetic Algorithms and Grouping Problems"
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Graf & Bekele (2006), "Forming Heterogeneous Groups for Intelligent
//!   Collaborative Learning Systems with Ant Colony Optimization"

pub mod allocation;
pub mod compatibility;
pub mod error;
pub mod formation;
pub mod models;
pub mod planner;
pub mod validation;

pub use error::{EngineError, Result};
pub use planner::{Plan, PlanRequest, TeamPlanner};
