//! Shared utilities for integration tests.

use std::io::Write;
use std::sync::{Arc, Mutex};

use rslidar_node::config::Configuration;
use rslidar_node::sensor::{SensorError, SensorManager};

/// Write `content` to a temporary `.yaml` file.
pub fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

/// Two distinct free UDP ports on loopback.
#[allow(dead_code)]
pub fn free_ports() -> (u16, u16) {
    let a = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let b = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    (a.local_addr().unwrap().port(), b.local_addr().unwrap().port())
}

/// Sensor manager that records calls and fails on demand.
#[allow(dead_code)]
pub struct RecordingManager {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_initialize: bool,
    pub seen_config: Arc<Mutex<Option<Configuration>>>,
}

#[allow(dead_code)]
impl RecordingManager {
    pub fn new(calls: Arc<Mutex<Vec<String>>>) -> Self {
        Self {
            calls,
            fail_initialize: false,
            seen_config: Arc::new(Mutex::new(None)),
        }
    }
}

impl SensorManager for RecordingManager {
    fn initialize(&mut self, config: &Configuration) -> Result<(), SensorError> {
        self.calls.lock().unwrap().push("initialize".into());
        *self.seen_config.lock().unwrap() = Some(config.clone());
        if self.fail_initialize {
            return Err(SensorError::Unsupported("scripted failure".into()));
        }
        Ok(())
    }

    fn start(&mut self) -> Result<(), SensorError> {
        self.calls.lock().unwrap().push("start".into());
        Ok(())
    }

    fn stop(&mut self) {
        self.calls.lock().unwrap().push("stop".into());
    }
}
