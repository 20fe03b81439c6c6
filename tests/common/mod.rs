#![allow(dead_code)]

pub use hostboot_test_utils::builders;
pub use hostboot_test_utils::fakes;
pub use hostboot_test_utils::http;
pub use hostboot_test_utils::init_tracing;

use std::io::Write;

use tempfile::NamedTempFile;

/// The daemon argument vector every default bootstrap must produce.
pub const EXPECTED_ARGS: [&str; 6] = [
    "-H",
    "fd://",
    "--containerd=/run/containerd/containerd.sock",
    "--log-driver=awslogs",
    "--log-opt",
    "awslogs-group=docker",
];

/// Write `contents` to a temporary `.toml` file.
pub fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    write!(file, "{contents}").unwrap();
    file
}
