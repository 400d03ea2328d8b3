//! Types that represent the core data model, such as `Period`, `Member` and `Ledger`.
mod amount;
mod feed;
mod ledger;
mod member;
mod period;

pub use amount::Amount;
pub use feed::{FeedFormat, RawFeed};
pub use ledger::Ledger;
pub use member::{Member, PaymentFlag};
pub use period::{normalize, Period, Season};
