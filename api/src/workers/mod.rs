//! Background workers

pub mod auto_approve;

pub use auto_approve::AutoApproveWorker;
