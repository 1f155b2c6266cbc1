//! Market data API clients

pub mod eastmoney;

pub use eastmoney::{EastMoneyClient, SOURCE_NAME, TRACKED_INDICES};
