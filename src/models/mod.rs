//! Data models for the customer aggregate and its direct relations.

pub mod company;
pub mod customer;
pub mod linked_record;
pub mod update;
pub mod user;

pub use company::{Company, CompanyInput};
pub use customer::{
    unique, CustomFieldData, Customer, CustomerFields, CustomerLinks, FacebookData, LeadStatus,
    LifecycleState, Location, MessengerData, TwitterData, VisitorContactInfo,
};
pub use linked_record::{LinkedRecord, LinkedRecordKind};
pub use update::CustomerUpdate;
pub use user::ActingUser;
