//! `calendar-query` filter evaluation (RFC 4791 §9.7).
//!
//! The matcher walks a component tree through the [`CalendarNode`] and
//! [`PropertyNode`] capabilities, so it runs unchanged over the iCalendar
//! model and over hand-built trees.

mod component;
mod engine;
mod leaf;
mod node;
mod property;
mod time_range;

pub use engine::{filter, matches, matches_node};
pub use node::{CalendarNode, PropertyNode};

#[cfg(test)]
mod tests;
