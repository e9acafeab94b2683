//! Data signal publishing and naming

use crate::common::{create_mock_board, rotation_payload, ValueLog, BMI160, BMI270};
use mwsignal::sensor::gyro::Range;
use mwsignal::{Error, ModuleId, RegisterHeader, SignalHandle};

fn assert_close(actual: &[f32], expected: &[f32]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-3, "{actual:?} != {expected:?}");
    }
}

#[test]
fn test_rotation_scaled_by_current_range() {
    let (mut board, _) = create_mock_board(BMI160, 0);
    let handle = board.gyro().unwrap().rotation_data_signal().unwrap();
    let log = ValueLog::default();
    board.subscribe(handle, log.callback()).unwrap();

    let mut frame = vec![0x13, 0x05];
    frame.extend(rotation_payload(164, -328, 1640));
    board.on_notification(&frame).unwrap();

    board.gyro().unwrap().set_range(Range::Dps125);
    frame.truncate(2);
    frame.extend(rotation_payload(2624, 0, -262));
    board.on_notification(&frame).unwrap();

    let values = log.values();
    assert_eq!(values.len(), 2);
    assert_eq!(values[0].raw.as_slice(), &[164, -328, 1640]);
    assert_close(&values[0].value, &[10.0, -20.0, 100.0]);
    assert_close(&values[1].value, &[10.0, 0.0, -0.998_476]);
    assert_eq!(values[0].channel, None);
}

#[test]
fn test_component_subscription_and_names() {
    let (mut board, _) = create_mock_board(BMI160, 0);
    let rotation = board.gyro().unwrap().rotation_data_signal().unwrap();
    let y = rotation.component(1);
    let log = ValueLog::default();
    board.subscribe(y, log.callback()).unwrap();

    let mut frame = vec![0x13, 0x05];
    frame.extend(rotation_payload(1, -2, 3));
    board.on_notification(&frame).unwrap();

    let values = log.values();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].channel, Some(1));
    assert_eq!(values[0].raw.as_slice(), &[-2]);

    assert_eq!(board.signal_name(rotation).as_deref(), Some("angular-velocity"));
    assert_eq!(board.signal_name(y).as_deref(), Some("angular-velocity[1]"));
    assert_eq!(board.signal_name(rotation.component(2)).as_deref(), Some("angular-velocity[2]"));
    assert_eq!(board.signal_name(rotation.component(3)), None);
}

#[test]
fn test_packed_notification_yields_each_sample() {
    let (mut board, _) = create_mock_board(BMI270, 0);
    let handle = board.gyro().unwrap().packed_rotation_data_signal().unwrap();
    let log = ValueLog::default();
    board.subscribe(handle, log.callback()).unwrap();

    let mut frame = vec![0x13, 0x07];
    frame.extend(rotation_payload(1, 2, 3));
    frame.extend(rotation_payload(4, 5, 6));
    frame.extend(rotation_payload(7, 8, 9));
    board.on_notification(&frame).unwrap();

    let raw: Vec<Vec<i64>> = log.values().iter().map(|v| v.raw.to_vec()).collect();
    assert_eq!(raw, [vec![1, 2, 3], vec![4, 5, 6], vec![7, 8, 9]]);
    assert_eq!(board.signal_name(handle).as_deref(), Some("angular-velocity"));
}

#[test]
fn test_packed_component_subscription() {
    let (mut board, _) = create_mock_board(BMI270, 0);
    let packed = board.gyro().unwrap().packed_rotation_data_signal().unwrap();
    let x = packed.component(0);
    let log = ValueLog::default();
    board.subscribe(x, log.callback()).unwrap();

    let mut frame = vec![0x13, 0x07];
    frame.extend(rotation_payload(1, 2, 3));
    frame.extend(rotation_payload(4, 5, 6));
    frame.extend(rotation_payload(7, 8, 9));
    board.on_notification(&frame).unwrap();

    let values = log.values();
    assert_eq!(values.len(), 3);
    assert!(values.iter().all(|v| v.channel == Some(0) && v.raw.len() == 1));
    let raw: Vec<i64> = values.iter().map(|v| v.raw[0]).collect();
    assert_eq!(raw, [1, 4, 7]);
    assert_eq!(board.signal_name(x).as_deref(), Some("angular-velocity[0]"));
}

#[test]
fn test_decompose_packed_signal() {
    let (mut board, _) = create_mock_board(BMI270, 0);
    let packed = board.gyro().unwrap().packed_rotation_data_signal().unwrap();
    assert_eq!(board.signal_name(packed.component(1)), None);

    let offsets: Vec<u8> = board
        .decompose(packed)
        .unwrap()
        .iter()
        .map(|c| c.byte_offset)
        .collect();
    assert_eq!(offsets, [0, 2, 4]);
    assert!(board.decompose(packed).unwrap().iter().all(|c| c.repeat_count == 1));
    assert_eq!(board.signal_name(packed.component(1)).as_deref(), Some("angular-velocity[1]"));

    let missing = SignalHandle::new(RegisterHeader::new(ModuleId::GYRO, 9));
    assert!(matches!(board.decompose(missing), Err(Error::SignalNotFound(_))));
}

#[test]
fn test_short_data_payload_is_dropped() {
    let (mut board, _) = create_mock_board(BMI160, 0);
    let handle = board.gyro().unwrap().rotation_data_signal().unwrap();
    let log = ValueLog::default();
    board.subscribe(handle, log.callback()).unwrap();

    assert!(board.on_notification(&[0x13, 0x05, 0x01, 0x00, 0x02]).unwrap());
    assert!(log.values().is_empty());
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let (mut board, _) = create_mock_board(BMI160, 0);
    let handle = board.ambient_light().unwrap().illuminance_data_signal().unwrap();
    let log = ValueLog::default();
    let id = board.subscribe(handle, log.callback()).unwrap();

    board.on_notification(&[0x14, 0x03, 0x01, 0x00, 0x00, 0x00]).unwrap();
    assert!(board.unsubscribe(id));
    board.on_notification(&[0x14, 0x03, 0x02, 0x00, 0x00, 0x00]).unwrap();

    let values = log.values();
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].value.as_slice(), &[1.0]);
}

#[test]
fn test_subscribe_unknown_signal() {
    let (mut board, _) = create_mock_board(BMI160, 0);
    let header = RegisterHeader::new(ModuleId::GYRO, 7);
    assert!(matches!(
        board.subscribe(SignalHandle::new(header), |_| {}),
        Err(Error::SignalNotFound(h)) if h == header
    ));
}
