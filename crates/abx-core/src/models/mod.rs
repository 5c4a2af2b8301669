pub mod antibiotic;
pub mod assessment;
pub mod case;
pub mod mechanism;
pub mod organism;
pub mod susceptibility;
