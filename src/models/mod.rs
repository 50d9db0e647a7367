pub mod payment;
pub mod profile;
pub mod student;

pub use payment::{Payment, PaymentMethod, PaymentRecord, PaymentStatus};
pub use profile::{Profile, UserRole};
pub use student::{NotificationTarget, Student, StudentWithGuardian};
