use super::{Client, ServerAddress};
use crate::api::{DeviceClient, DeviceType, Focuser, Rotator, TypedDevice};
use crate::errors::{ErrorKind, ErrorOrigin};
use crate::params::Method;
use crate::session::{SessionOptions, TimeoutTier};
use crate::test::MockTransport;
use serde_json::json;
use std::sync::Arc;

fn remote(device_type: DeviceType, options: SessionOptions) -> (Arc<MockTransport>, DeviceClient) {
    let transport = Arc::new(MockTransport::default());
    let client = Client::with_transport(
        ServerAddress::new("localhost", 11111),
        Arc::<MockTransport>::clone(&transport),
        options,
    );
    (transport, client.device(device_type, 0))
}

fn focuser(options: SessionOptions) -> eyre::Result<(Arc<MockTransport>, Focuser)> {
    let (transport, device) = remote(DeviceType::Focuser, options);
    Ok((transport, Focuser::try_from(device)?))
}

#[tokio::test]
async fn strict_casing_lowercases_path_only() -> eyre::Result<()> {
    let (transport, focuser) = focuser(SessionOptions::default())?;

    transport.respond_value(1200);
    assert_eq!(focuser.position().await?, 1200);

    transport.respond_value(json!(null));
    focuser.move_(1500).await?;

    let [read, write] = transport.requests().try_into().map_err(|requests: Vec<_>| {
        eyre::eyre!("expected two requests, got {}", requests.len())
    })?;

    assert_eq!(read.method, Method::Get);
    assert_eq!(read.url, "http://localhost:11111/api/v1/focuser/0/position");
    assert!(read.param("ClientID").is_some());
    assert_eq!(read.tier, TimeoutTier::Standard);

    assert_eq!(write.method, Method::Put);
    assert_eq!(write.url, "http://localhost:11111/api/v1/focuser/0/move");
    assert_eq!(write.param("Position"), Some("1500"));

    Ok(())
}

#[tokio::test]
async fn relaxed_casing_lowercases_keys_only() -> eyre::Result<()> {
    let (transport, focuser) = focuser(SessionOptions {
        strict_casing: false,
        ..Default::default()
    })?;

    transport.respond_value(json!(null));
    focuser.move_(10).await?;

    let request = &transport.requests()[0];
    assert_eq!(request.url, "http://localhost:11111/api/v1/focuser/0/Move");
    assert_eq!(request.param("position"), Some("10"));
    assert!(request.param("clientid").is_some());
    assert!(request.param("clienttransactionid").is_some());
    assert_eq!(request.param("Position"), None);

    Ok(())
}

#[tokio::test]
async fn transaction_ids_increase_within_a_session() -> eyre::Result<()> {
    let (transport, focuser) = focuser(SessionOptions::default())?;
    let client_id = focuser
        .client_session()
        .map(|session| session.client_id().to_string());

    for _ in 0..3_i32 {
        transport.respond_value(false);
        assert!(!focuser.is_moving().await?);
    }

    let requests = transport.requests();
    let transaction_ids = requests
        .iter()
        .map(|request| request.param("ClientTransactionID"))
        .collect::<Vec<_>>();
    assert_eq!(transaction_ids, [Some("1"), Some("2"), Some("3")]);
    assert!(
        requests
            .iter()
            .all(|request| request.param("ClientID") == client_id.as_deref())
    );

    Ok(())
}

#[test]
fn facades_get_separate_sessions() {
    let (_, first) = remote(DeviceType::Dome, SessionOptions::default());
    let (_, second) = remote(DeviceType::Dome, SessionOptions::default());

    let ids = [&first, &second].map(|device| device.client_session().map(|session| session.client_id()));
    assert_ne!(ids[0], ids[1]);
}

#[tokio::test]
async fn device_errors_keep_raw_code_and_message() -> eyre::Result<()> {
    let (transport, focuser) = focuser(SessionOptions::default())?;

    transport.respond_json(json!({
        "Value": 0,
        "ErrorNumber": 0x407,
        "ErrorMessage": "focuser is asleep",
    }));

    let err = focuser.temperature().await.expect_err("device reported an error");
    assert_eq!(err.kind(), ErrorKind::NotConnected);
    assert_eq!(err.origin(), ErrorOrigin::Device);
    assert_eq!(err.raw_code(), Some(0x407));
    assert_eq!(err.message(), "focuser is asleep");

    Ok(())
}

#[tokio::test]
async fn transport_failures_have_no_device_code() -> eyre::Result<()> {
    let (transport, focuser) = focuser(SessionOptions::default())?;

    transport.fail("connection refused");
    let err = focuser.halt().await.expect_err("transport failed");
    assert_eq!(err.kind(), ErrorKind::DriverFailure);
    assert_eq!(err.origin(), ErrorOrigin::Transport);
    assert_eq!(err.raw_code(), None);
    assert!(err.message().contains("connection refused"));

    transport.respond(crate::client::HttpResponse {
        status: 500,
        content_type: Some("text/plain".to_owned()),
        content_encoding: None,
        body: "boom".into(),
    });
    let err = focuser.halt().await.expect_err("HTTP 500");
    assert_eq!(err.origin(), ErrorOrigin::Transport);

    transport.respond_json(json!({ "Value": "not a number", "ErrorNumber": 0 }));
    let err = focuser.position().await.expect_err("malformed value");
    assert_eq!(err.origin(), ErrorOrigin::Transport);

    Ok(())
}

#[tokio::test]
async fn transaction_id_mismatch_is_not_an_error() -> eyre::Result<()> {
    let (transport, focuser) = focuser(SessionOptions::default())?;

    transport.respond_json(json!({
        "Value": true,
        "ErrorNumber": 0,
        "ClientTransactionID": 9999,
    }));
    assert!(focuser.absolute().await?);

    Ok(())
}

#[tokio::test]
async fn locally_managed_connection_never_reaches_the_transport() -> eyre::Result<()> {
    let (transport, device) = remote(
        DeviceType::Focuser,
        SessionOptions {
            manage_connection_locally: true,
            ..Default::default()
        },
    );

    assert!(!device.connected().await?);
    device.set_connected(true).await?;
    assert!(device.connected().await?);
    device.disconnect().await?;
    assert!(!device.connecting().await?);
    assert!(!device.connected().await?);

    assert!(transport.requests().is_empty());
    Ok(())
}

#[tokio::test]
async fn remote_connection_is_one_establish_call() -> eyre::Result<()> {
    let (transport, device) = remote(DeviceType::Focuser, SessionOptions::default());

    transport.respond_value(json!(null));
    device.set_connected(true).await?;

    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, Method::Put);
    assert_eq!(requests[0].tier, TimeoutTier::Establish);
    assert_eq!(requests[0].timeout, SessionOptions::default().timeouts.establish);
    assert_eq!(requests[0].url, "http://localhost:11111/api/v1/focuser/0/connected");
    assert_eq!(requests[0].param("Connected"), Some("True"));

    Ok(())
}

#[tokio::test]
async fn remote_members_are_not_version_gated() -> eyre::Result<()> {
    let (transport, device) = remote(DeviceType::Rotator, SessionOptions::default());
    let rotator = Rotator::try_from(device)?;

    transport.respond_value(true);
    assert!(rotator.can_reverse().await?);
    assert_eq!(transport.requests().len(), 1);

    Ok(())
}

#[test]
fn wrong_category_is_rejected() {
    let (_, device) = remote(DeviceType::Dome, SessionOptions::default());
    let err = Focuser::try_from(device).expect_err("a dome is not a focuser");
    assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    assert_eq!(err.origin(), ErrorOrigin::Client);
}

#[tokio::test]
async fn configured_devices_become_typed_facades() -> eyre::Result<()> {
    let transport = Arc::new(MockTransport::default());
    let client = Client::with_transport(
        ServerAddress::new("::1", 32323),
        Arc::<MockTransport>::clone(&transport),
        SessionOptions::default(),
    );

    transport.respond_value(json!([
        {
            "DeviceName": "Mount",
            "DeviceType": "Telescope",
            "DeviceNumber": 0,
            "UniqueID": "6f1c",
        },
        {
            "DeviceName": "Flat panel",
            "DeviceType": "CoverCalibrator",
            "DeviceNumber": 0,
            "UniqueID": "77aa",
        },
        {
            "DeviceName": "Filters",
            "DeviceType": "FilterWheel",
            "DeviceNumber": 1,
            "UniqueID": "0b3e",
        },
    ]));

    let devices = client.get_devices().await?;
    assert_eq!(
        transport.requests()[0].url,
        "http://[::1]:32323/management/v1/configureddevices"
    );

    let [TypedDevice::Telescope(telescope), TypedDevice::FilterWheel(filter_wheel)] =
        devices.as_slice()
    else {
        panic!("unexpected device list {devices:?}");
    };

    assert_ne!(
        telescope.client_session().map(|session| session.client_id()),
        filter_wheel.client_session().map(|session| session.client_id()),
    );

    transport.respond_value(json!(["Red", "Green", "Blue"]));
    assert_eq!(filter_wheel.names().await?, ["Red", "Green", "Blue"]);
    assert_eq!(
        transport.requests()[1].url,
        "http://[::1]:32323/api/v1/filterwheel/1/names"
    );

    Ok(())
}
