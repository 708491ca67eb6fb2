use anyhow::{Result, ensure};
use rsm::{BearerId, QosFlowParameters, SliceType, TopoClient, UeIdType, UeIdentity, UeNibClient};
use rsm_tests::framework::*;

#[async_std::test]
async fn associate_requires_slice_and_ue() -> Result<()> {
    let bed = init().await?;
    let cu = bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;

    let service = bed.rsm.service();

    // No slice id at all.
    let ack = service
        .set_ue_slice_association(associate_request(&du, "20", "", "", "5"))
        .await;
    ensure!(!ack.success);
    ensure!(
        ack.cause
            .unwrap()
            .contains("both DL slice ID and UL slice ID are empty")
    );

    // Slice id that does not resolve in either direction.
    let ack = service
        .set_ue_slice_association(associate_request(&du, "20", "9", "", "5"))
        .await;
    ensure!(!ack.success);
    ensure!(ack.cause.unwrap().contains("invalid slice ID"));

    // Valid slice, but the identifier list lacks a du-ue-f1ap-id.
    ensure!(
        service
            .create_slice(create_slice_request(&du, "1", "10", "round-robin", "DL"))
            .await
            .success
    );
    let mut request = associate_request(&du, "20", "1", "", "5");
    request.ue_id[0].id_type = "cu-ue-f1ap-id".to_string();
    let ack = service.set_ue_slice_association(request).await;
    ensure!(!ack.success);
    ensure!(ack.cause.unwrap().contains("need valid du-ue-f1ap-id"));

    // Identifiers fine, but no such UE in the inventory.
    let ack = service
        .set_ue_slice_association(associate_request(&du, "20", "1", "", "5"))
        .await;
    ensure!(!ack.success);
    ensure!(ack.cause.unwrap().contains("failed to get UE inventory record"));

    // UE exists but holds no bearer on the requested DRB.
    bed.uenib
        .add_ue(ue_with_4g_bearer("ue-1", &cu, None, 10, 20, 5, 9))
        .await?;
    let ack = service
        .set_ue_slice_association(associate_request(&du, "20", "1", "", "6"))
        .await;
    ensure!(!ack.success);
    ensure!(ack.cause.unwrap().contains("the number of bearers is 0"));
    Ok(())
}

#[async_std::test]
async fn associate_rejects_mismatched_du() -> Result<()> {
    let bed = init().await?;
    let cu = bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;

    let other_du = rsm::E2NodeId::new("x/y/3/1");
    bed.uenib
        .add_ue(ue_with_4g_bearer("ue-1", &cu, Some(&other_du), 10, 20, 5, 9))
        .await?;
    ensure!(
        bed.rsm
            .service()
            .create_slice(create_slice_request(&du, "1", "10", "round-robin", "DL"))
            .await
            .success
    );

    let ack = bed
        .rsm
        .service()
        .set_ue_slice_association(associate_request(&du, "20", "1", "", "5"))
        .await;
    ensure!(!ack.success);
    ensure!(ack.cause.unwrap().contains("are not matched"));
    Ok(())
}

// Re-anchoring the same (UE, DRB, direction) moves the association instead
// of duplicating it.
#[async_std::test]
async fn reassociate_moves_the_anchor() -> Result<()> {
    let bed = init().await?;
    let cu = bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;
    bed.uenib
        .add_ue(ue_with_4g_bearer("ue-1", &cu, None, 10, 20, 5, 9))
        .await?;

    let service = bed.rsm.service();
    for slice_id in ["1", "2"] {
        ensure!(
            service
                .create_slice(create_slice_request(&du, slice_id, "10", "round-robin", "DL"))
                .await
                .success
        );
    }

    ensure!(
        service
            .set_ue_slice_association(associate_request(&du, "20", "1", "", "5"))
            .await
            .success
    );
    ensure!(
        service
            .set_ue_slice_association(associate_request(&du, "20", "2", "", "5"))
            .await
            .success
    );

    let old = bed.topo.get_slice(&du, "1", SliceType::Dl).await?;
    ensure!(old.ue_ids.is_empty());
    let new = bed.topo.get_slice(&du, "2", SliceType::Dl).await?;
    ensure!(new.ue_ids.len() == 1);

    let ue = bed.uenib.get_ue_by_global_id("ue-1").await?;
    ensure!(ue.slices.len() == 1);
    ensure!(ue.slices[0].slice_id == "2");
    Ok(())
}

// A 5G bearer's QFI and flow mappings ride along into the association
// payload and the recorded anchor.
#[async_std::test]
async fn associate_carries_5g_bearer_detail() -> Result<()> {
    let bed = init().await?;
    let cu = bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;

    let mut ue = ue_with_4g_bearer("ue-1", &cu, None, 10, 20, 5, 9);
    ue.bearers = vec![BearerId::FiveG {
        drb_id: 7,
        qfi: Some(3),
        flows: vec![
            QosFlowParameters::NonDynamic { five_qi: 8 },
            QosFlowParameters::Dynamic {
                priority: 2,
                packet_delay_budget: 100,
                packet_error_rate: 4,
            },
        ],
    }];
    bed.uenib.add_ue(ue).await?;

    let service = bed.rsm.service();
    ensure!(
        service
            .create_slice(create_slice_request(&du, "1", "10", "round-robin", "UL"))
            .await
            .success
    );
    ensure!(
        service
            .set_ue_slice_association(associate_request(&du, "20", "", "1", "7"))
            .await
            .success
    );

    let slice = bed.topo.get_slice(&du, "1", SliceType::Ul).await?;
    ensure!(slice.ue_ids.len() == 1);
    let Some(BearerId::FiveG { drb_id, qfi, flows }) = &slice.ue_ids[0].drb else {
        anyhow::bail!("expected a 5G bearer anchor");
    };
    ensure!(*drb_id == 7);
    ensure!(*qfi == Some(3));
    ensure!(flows.len() == 2);

    let ue = bed.uenib.get_ue_by_global_id("ue-1").await?;
    ensure!(ue.slices.len() == 1);
    ensure!(ue.slices[0].slice_type == SliceType::Ul);
    ensure!(ue.slices[0].drb.drb_id() == 7);
    Ok(())
}

// The association addresses the UE by its du-ue-f1ap-id even when other
// identifiers are present in the request.
#[async_std::test]
async fn associate_uses_preferred_du_id() -> Result<()> {
    let bed = init().await?;
    let cu = bed.topo.add_cu("a/b/1/1").await;
    let du = bed.topo.add_du("a/b/3/1").await;
    wait_until_ready(&bed, &du).await?;

    let mut ue = ue_with_4g_bearer("ue-1", &cu, None, 10, 20, 5, 9);
    ue.ue_ids = UeIdentity {
        cu_ue_f1ap_id: Some(10),
        du_ue_f1ap_id: Some(20),
        ran_ue_ngap_id: Some(30),
        preferred: Some(UeIdType::DuUeF1ap),
        ..UeIdentity::default()
    };
    bed.uenib.add_ue(ue).await?;

    let service = bed.rsm.service();
    ensure!(
        service
            .create_slice(create_slice_request(&du, "1", "10", "round-robin", "DL"))
            .await
            .success
    );

    let mut request = associate_request(&du, "20", "1", "", "5");
    request.ue_id.push(rsm::NbiUeId {
        id_type: "ran-ue-ngap-id".to_string(),
        ue_id: "30".to_string(),
    });
    ensure!(service.set_ue_slice_association(request).await.success);

    let slice = bed.topo.get_slice(&du, "1", SliceType::Dl).await?;
    ensure!(slice.ue_ids.len() == 1);
    ensure!(slice.ue_ids[0].ue.du_ue_f1ap_id == Some(20));
    ensure!(slice.ue_ids[0].ue.ran_ue_ngap_id == Some(30));
    Ok(())
}
