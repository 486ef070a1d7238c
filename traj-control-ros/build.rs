use std::path::PathBuf;

fn main() {
    // rosrust::rosmsg_include! resolves message definitions through this path.
    let msg_path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("ros_msgs");
    println!("cargo:rerun-if-changed={}", msg_path.display());
    println!("cargo:rustc-env=ROSRUST_MSG_PATH={}", msg_path.display());
}
