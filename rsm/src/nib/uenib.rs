//! uenib - the UE inventory contract the core consumes

use crate::errors::Result;
use crate::{E2NodeId, RsmUeInfo, UeIdType};
use async_trait::async_trait;

/// UE inventory operations.  Records are keyed by global UE id; preferred-id
/// lookups are scoped to the CU that reported the UE.
#[async_trait]
pub trait UeNibClient: Send + Sync + Clone + 'static {
    async fn list_ues(&self) -> Result<Vec<RsmUeInfo>>;

    async fn get_ue_by_global_id(&self, global_id: &str) -> Result<RsmUeInfo>;

    async fn get_ue_by_preferred_id(
        &self,
        cu: &E2NodeId,
        id_type: UeIdType,
        value: i64,
    ) -> Result<RsmUeInfo>;

    /// Structural-equality presence check over all identifier fields plus
    /// CGI plus the CU/DU pair.
    async fn has_ue(&self, ue: &RsmUeInfo) -> bool;

    async fn add_ue(&self, ue: RsmUeInfo) -> Result<()>;

    async fn update_ue(&self, ue: RsmUeInfo) -> Result<()>;

    async fn delete_ue(&self, global_id: &str) -> Result<()>;

    async fn delete_ue_by_preferred_id(
        &self,
        cu: &E2NodeId,
        id_type: UeIdType,
        value: i64,
    ) -> Result<()>;

    /// Purge every record whose CU or DU id equals the given node.
    async fn delete_ues_by_e2_node(&self, node: &E2NodeId) -> Result<()>;
}
