pub mod calendar;
pub mod classifier;
pub mod dto;
pub mod grouping;
pub mod ordering;
pub mod task_service;
