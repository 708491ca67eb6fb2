use anyhow::{Result, ensure};
use rsm::e2sm::{self, RsmCommand};
use rsm::{SchedulerType, SliceType, TopoClient, UeNibClient};
use rsm_tests::framework::*;

// Single-DU lifecycle: create, update, associate, delete cascade, with both
// inventories checked at every stage.
#[async_std::test]
async fn slice_lifecycle() -> Result<()> {
    let bed = init().await?;
    let cu = bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;

    bed.uenib
        .add_ue(ue_with_4g_bearer("ue-1", &cu, None, 10, 20, 5, 9))
        .await?;

    // Create: one slice with an empty UE list, UE untouched.
    let ack = bed
        .rsm
        .service()
        .create_slice(create_slice_request(&du, "1", "10", "round-robin", "DL"))
        .await;
    ensure!(ack.success, "create failed: {:?}", ack.cause);

    let slices = bed.topo.list_slices(&du).await?;
    ensure!(slices.len() == 1);
    ensure!(slices[0].id == "1");
    ensure!(slices[0].slice_type == SliceType::Dl);
    ensure!(slices[0].parameters.weight == 10);
    ensure!(slices[0].parameters.scheduler_type == SchedulerType::RoundRobin);
    ensure!(slices[0].ue_ids.is_empty());
    ensure!(bed.uenib.get_ue_by_global_id("ue-1").await?.slices.is_empty());

    // Update: weight changes in place, UE still unassociated.
    let ack = bed
        .rsm
        .service()
        .update_slice(update_slice_request(&du, "1", "20", "round-robin", "DL"))
        .await;
    ensure!(ack.success, "update failed: {:?}", ack.cause);

    let slice = bed.topo.get_slice(&du, "1", SliceType::Dl).await?;
    ensure!(slice.parameters.weight == 20);
    ensure!(bed.uenib.get_ue_by_global_id("ue-1").await?.slices.is_empty());

    // Associate: the slice anchors the UE, the UE snapshots the slice.
    let ack = bed
        .rsm
        .service()
        .set_ue_slice_association(associate_request(&du, "20", "1", "", "5"))
        .await;
    ensure!(ack.success, "associate failed: {:?}", ack.cause);

    let slice = bed.topo.get_slice(&du, "1", SliceType::Dl).await?;
    ensure!(slice.ue_ids.len() == 1);
    ensure!(slice.ue_ids[0].ue.du_ue_f1ap_id == Some(20));
    ensure!(slice.ue_ids[0].drb.as_ref().map(|d| d.drb_id()) == Some(5));

    let ue = bed.uenib.get_ue_by_global_id("ue-1").await?;
    ensure!(ue.du_e2_node_id.as_ref() == Some(&du));
    ensure!(ue.slices.len() == 1);
    ensure!(ue.slices[0].slice_id == "1");
    ensure!(ue.slices[0].slice_type == SliceType::Dl);
    ensure!(ue.slices[0].parameters.weight == 20);
    ensure!(ue.slices[0].parameters.scheduler_type == SchedulerType::RoundRobin);
    ensure!(ue.slices[0].drb.drb_id() == 5);

    // Delete: slice gone everywhere, bearers intact.
    let ack = bed
        .rsm
        .service()
        .delete_slice(delete_slice_request(&du, "1", "DL"))
        .await;
    ensure!(ack.success, "delete failed: {:?}", ack.cause);

    ensure!(!bed.topo.has_slice(&du, "1", SliceType::Dl).await);
    let ue = bed.uenib.get_ue_by_global_id("ue-1").await?;
    ensure!(ue.slices.is_empty());
    ensure!(ue.bearers.len() == 1);
    Ok(())
}

// A successful update rewrites the snapshot in every membership while
// leaving the membership count alone.
#[async_std::test]
async fn update_propagates_to_memberships() -> Result<()> {
    let bed = init().await?;
    let cu = bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;
    bed.uenib
        .add_ue(ue_with_4g_bearer("ue-1", &cu, None, 10, 20, 5, 9))
        .await?;

    let service = bed.rsm.service();
    let ack = service
        .create_slice(create_slice_request(&du, "1", "10", "round-robin", "DL"))
        .await;
    ensure!(ack.success, "{:?}", ack.cause);
    let ack = service
        .set_ue_slice_association(associate_request(&du, "20", "1", "", "5"))
        .await;
    ensure!(ack.success, "{:?}", ack.cause);

    let ack = service
        .update_slice(update_slice_request(&du, "1", "30", "qos-based", "DL"))
        .await;
    ensure!(ack.success, "{:?}", ack.cause);

    let ue = bed.uenib.get_ue_by_global_id("ue-1").await?;
    ensure!(ue.slices.len() == 1);
    ensure!(ue.slices[0].parameters.weight == 30);
    ensure!(ue.slices[0].parameters.scheduler_type == SchedulerType::QosBased);
    Ok(())
}

#[async_std::test]
async fn create_rejects_duplicate() -> Result<()> {
    let bed = init().await?;
    bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;

    let service = bed.rsm.service();
    let request = create_slice_request(&du, "1", "10", "round-robin", "DL");
    ensure!(service.create_slice(request.clone()).await.success);

    let ack = service.create_slice(request).await;
    ensure!(!ack.success);
    ensure!(ack.cause.unwrap().contains("already exists"));
    ensure!(bed.topo.list_slices(&du).await?.len() == 1);

    // Same id in the other direction is a distinct slice.
    let ack = service
        .create_slice(create_slice_request(&du, "1", "10", "round-robin", "UL"))
        .await;
    ensure!(ack.success, "{:?}", ack.cause);
    Ok(())
}

#[async_std::test]
async fn update_and_delete_require_existing_slice() -> Result<()> {
    let bed = init().await?;
    bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;

    let service = bed.rsm.service();
    let ack = service
        .update_slice(update_slice_request(&du, "7", "10", "round-robin", "DL"))
        .await;
    ensure!(!ack.success);
    ensure!(ack.cause.unwrap().contains("no slice ID 7"));

    let ack = service.delete_slice(delete_slice_request(&du, "7", "DL")).await;
    ensure!(!ack.success);
    ensure!(ack.cause.unwrap().contains("no slice ID 7"));
    Ok(())
}

// Unknown enum names downcast to round-robin / DL instead of failing.
#[async_std::test]
async fn unknown_enums_downcast_to_defaults() -> Result<()> {
    let bed = init().await?;
    bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;

    let ack = bed
        .rsm
        .service()
        .create_slice(create_slice_request(&du, "1", "10", "no-such-scheduler", "sideways"))
        .await;
    ensure!(ack.success, "{:?}", ack.cause);

    let slice = bed.topo.get_slice(&du, "1", SliceType::Dl).await?;
    ensure!(slice.parameters.scheduler_type == SchedulerType::RoundRobin);
    Ok(())
}

// The dispatched control messages decode back to the commands that caused
// them, in dispatch order.
#[async_std::test]
async fn control_messages_carry_the_command() -> Result<()> {
    let bed = init().await?;
    bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;

    let service = bed.rsm.service();
    ensure!(
        service
            .create_slice(create_slice_request(&du, "1", "10", "qos-based", "UL"))
            .await
            .success
    );
    ensure!(
        service
            .update_slice(update_slice_request(&du, "1", "20", "qos-based", "UL"))
            .await
            .success
    );
    ensure!(
        service
            .delete_slice(delete_slice_request(&du, "1", "UL"))
            .await
            .success
    );

    let controls = bed.e2.sent_controls();
    ensure!(controls.len() == 3);
    ensure!(controls.iter().all(|(node, _)| *node == du));

    let kinds: Vec<RsmCommand> = controls
        .iter()
        .map(|(_, request)| e2sm::parse::control_header(&request.header).map(|h| h.command))
        .collect::<Result<_, _>>()?;
    ensure!(
        kinds
            == vec![
                RsmCommand::SliceCreate,
                RsmCommand::SliceUpdate,
                RsmCommand::SliceDelete
            ]
    );

    match e2sm::parse::control_payload(&controls[0].1.payload)? {
        e2sm::ControlPayload::SliceCreate(config) => {
            ensure!(config.slice_id == 1);
            ensure!(config.weight == 10);
            ensure!(config.scheduler_type == SchedulerType::QosBased);
            ensure!(config.slice_type == SliceType::Ul);
        }
        other => anyhow::bail!("unexpected create payload: {other:?}"),
    }
    match e2sm::parse::control_payload(&controls[2].1.payload)? {
        e2sm::ControlPayload::SliceDelete(config) => {
            ensure!(config.slice_id == 1);
            ensure!(config.slice_type == SliceType::Ul);
        }
        other => anyhow::bail!("unexpected delete payload: {other:?}"),
    }
    Ok(())
}

// Event triggers are subscription material, not control commands.
#[async_std::test]
async fn event_trigger_is_not_a_control_command() -> Result<()> {
    let err = e2sm::build::control_request(RsmCommand::EventTrigger, None, None).unwrap_err();
    ensure!(matches!(err, rsm::RsmError::NotSupported(_)));
    ensure!(err.to_string().contains("Unsupported message type"));
    Ok(())
}

// The read RPCs reflect inventory state.
#[async_std::test]
async fn read_rpcs_list_inventories() -> Result<()> {
    let bed = init().await?;
    let cu = bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;
    bed.uenib
        .add_ue(ue_with_4g_bearer("ue-1", &cu, Some(&du), 10, 20, 5, 9))
        .await?;

    let service = bed.rsm.service();
    ensure!(
        service
            .create_slice(create_slice_request(&du, "1", "10", "round-robin", "DL"))
            .await
            .success
    );

    ensure!(service.get_slices(du.as_str()).await?.len() == 1);
    ensure!(service.get_slices("").await?.len() == 1);
    ensure!(service.get_slices("a/b/1/1").await.is_err());

    let ues = service.get_ue_slice_associations(du.as_str()).await?;
    ensure!(ues.len() == 1);
    ensure!(ues[0].global_ue_id == "ue-1");
    ensure!(service.get_ue_slice_associations("x/y/3/1").await?.is_empty());
    Ok(())
}
