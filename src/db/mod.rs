pub mod payments;
pub mod profiles;
pub mod students;
