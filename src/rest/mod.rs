pub mod adapter;

pub use adapter::YouTrackRest;
