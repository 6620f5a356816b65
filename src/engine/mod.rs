pub mod catalog;
pub mod format;
pub mod generate;
pub mod number_theory;
pub mod predicate;
pub mod template;
pub mod timing;

pub use catalog::Catalog;
pub use template::{Category, Step, Template, TemplateError};
pub use timing::TimingTracker;
