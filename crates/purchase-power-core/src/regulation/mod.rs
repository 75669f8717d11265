pub mod feasibility;
pub mod first_time;
pub mod regions;
