pub mod base;
pub mod fallback;
pub mod fnol;
pub mod inspector;
pub mod login;
pub mod workflow;

pub use base::{Page, PageError};
pub use fallback::OptionResolver;
pub use fnol::{FnolPage, OptionalField};
pub use login::LoginPage;
pub use workflow::{BasicInfo, ClaimantDetails, FnolWorkflow, PolicySearch};
