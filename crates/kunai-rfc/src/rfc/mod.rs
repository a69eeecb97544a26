pub mod dav;
pub mod filter;
pub mod ical;
