use anyhow::{Result, ensure};
use async_std::task;
use rsm::{RsmCommand, TopoClient, UeNibClient};
use rsm_tests::framework::*;
use std::time::Duration;

// Removing a DU tears down its dispatch channels, drops its slice list and
// purges its UE records.
#[async_std::test]
async fn du_removal_purges_state() -> Result<()> {
    let bed = init().await?;
    let cu = bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;

    bed.uenib
        .add_ue(ue_with_4g_bearer("ue-1", &cu, Some(&du), 10, 20, 5, 9))
        .await?;
    ensure!(
        bed.rsm
            .service()
            .create_slice(create_slice_request(&du, "1", "10", "round-robin", "DL"))
            .await
            .success
    );

    bed.topo.remove_node(&du).await;
    for _ in 0..200 {
        if !bed.rsm.node_ready(RsmCommand::SliceCreate, &du) {
            break;
        }
        task::sleep(Duration::from_millis(10)).await;
    }
    ensure!(!bed.rsm.node_ready(RsmCommand::SliceCreate, &du));
    ensure!(bed.topo.list_slices(&du).await.is_err());
    ensure!(bed.uenib.list_ues().await?.is_empty());

    // Further lifecycle commands against the node are rejected.
    let ack = bed
        .rsm
        .service()
        .create_slice(create_slice_request(&du, "2", "10", "round-robin", "DL"))
        .await;
    ensure!(!ack.success);
    ensure!(ack.cause.unwrap().contains("no control channel"));
    Ok(())
}

// Removing a CU purges the slice list of its paired DU and the UE records
// scoped to the CU.
#[async_std::test]
async fn cu_removal_purges_paired_du() -> Result<()> {
    let bed = init().await?;
    let cu = bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;

    bed.uenib
        .add_ue(ue_with_4g_bearer("ue-1", &cu, Some(&du), 10, 20, 5, 9))
        .await?;
    ensure!(
        bed.rsm
            .service()
            .create_slice(create_slice_request(&du, "1", "10", "round-robin", "DL"))
            .await
            .success
    );

    bed.topo.remove_node(&cu).await;
    for _ in 0..200 {
        if bed.topo.list_slices(&du).await.is_err() {
            break;
        }
        task::sleep(Duration::from_millis(10)).await;
    }
    ensure!(bed.topo.list_slices(&du).await.is_err());
    ensure!(bed.uenib.list_ues().await?.is_empty());
    Ok(())
}

// Nodes without the RSM RAN function are ignored entirely.
#[async_std::test]
async fn foreign_nodes_are_ignored() -> Result<()> {
    let bed = init().await?;
    let node = bed.topo.add_foreign_node("z/z/3/1").await;
    task::sleep(Duration::from_millis(100)).await;
    ensure!(!bed.rsm.node_ready(RsmCommand::SliceCreate, &node));
    ensure!(bed.e2.subscription_count() == 0);
    Ok(())
}
