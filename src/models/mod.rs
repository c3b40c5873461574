//! Team formation domain models.
//!
//! Plain in-memory records exchanged with the engine's collaborators.
//! The engine reads `Individual` and `WorkItem` records and returns
//! `Group` and `Allocation` values; it never persists anything itself.
//!
//! # Domain Mappings
//!
//! | u-teamform | Classroom | Workplace | Hackathon |
//! |------------|-----------|-----------|-----------|
//! | Individual | Student | Employee | Participant |
//! | Group | Project team | Squad | Team |
//! | WorkItem | Project task | Ticket | Challenge part |
//! | Allocation | Task sheet | Sprint plan | Role split |

mod assignment;
mod group;
mod individual;
mod work_item;

pub use assignment::{Allocation, Assignment, MemberWorkload, WorkloadReport};
pub use group::{Group, MemberRole};
pub use individual::{
    AvailabilitySlot, Individual, LearningStyle, PersonalityProfile, Proficiency, SkillRecord,
};
pub use work_item::{Complexity, WorkItem};
