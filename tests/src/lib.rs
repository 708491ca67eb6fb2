
pub use mock_e2::{AckPolicy, MockE2, emm_indication};
pub use rnib::MockTopo;
pub use uenib::MockUeNib;
