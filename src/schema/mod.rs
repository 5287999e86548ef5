pub mod entity;
pub mod event;
pub mod mention;
pub mod relationship;
pub mod report;
pub mod section;
