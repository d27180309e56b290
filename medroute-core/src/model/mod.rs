//! Read-only input entities for a planning run.
//!
//! Everything here is loaded once by an external repository and handed to the
//! [`Scheduler`](crate::Scheduler) as an immutable [`SchedulingInputData`]
//! snapshot.

mod driver;
mod input;
mod office;
mod order;
mod product;
mod vehicle;

pub use driver::{AvailabilityStatus, Day, Driver};
pub use input::{ProductCatalog, SchedulingInputData};
pub use office::{Office, OfficeContact};
pub use order::{Order, OrderPriority, TimeWindow};
pub use product::{CertificationType, Product};
pub use vehicle::{Vehicle, VehicleCapacity, VehicleFeature, VehicleType};
