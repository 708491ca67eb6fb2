pub mod e2sm;
