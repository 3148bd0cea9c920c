// ABOUTME: Core data models for field visits - roles, directory listings, and the order/report forms

pub mod directory;
pub mod form;
pub mod order;
pub mod report;
pub mod role;

pub use directory::Directory;
pub use form::{FormError, FormModel, FormRow, RowKind, Section, SectionId};
pub use order::{OrderForm, OrderLine};
pub use report::ReportForm;
pub use role::{ClientType, Role};
