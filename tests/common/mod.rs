//! Common test utilities and mock implementations

pub mod mock_transport;

pub use mock_transport::{MockError, MockTransport};
pub use test_utils::{create_mock_board, rotation_payload, StatusLog, ValueLog, BMI160, BMI270};
