pub mod chart;
pub mod dataset;
pub mod filters;
pub mod output;
pub mod pipeline;
pub mod session;
