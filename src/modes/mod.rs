pub mod driver;
pub mod headless;
pub mod human;

pub use driver::{Clock, Driver, NoWait, RunSummary, ThreadClock};
pub use headless::{format_summary, HeadlessMode};
pub use human::HumanMode;
