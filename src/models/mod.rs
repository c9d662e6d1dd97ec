pub mod region;
pub mod series;
pub mod time;

pub use region::*;
pub use series::*;
pub use time::*;
