pub mod beta;
pub mod betabinomial;
pub mod confidence;
pub mod context;
pub mod histogram;
pub mod online;
pub mod reservoir;
