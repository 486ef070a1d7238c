use std::{
    env,
    process::{Child, Command, Stdio},
    thread::sleep,
    time::{Duration, Instant},
};

use nix::{
    sys::signal::{kill, Signal},
    unistd::Pid,
};
use traj_control_ros::RosNode;

/// Sends SIGINT to the child process on drop.
#[must_use]
#[derive(Debug)]
pub struct ChildProcessTerminator(Child);

impl ChildProcessTerminator {
    #[track_caller]
    pub fn spawn(command: &mut Command) -> ChildProcessTerminator {
        command
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        ChildProcessTerminator(command.spawn().unwrap())
    }
}

impl Drop for ChildProcessTerminator {
    fn drop(&mut self) {
        let pid = Pid::from_raw(self.0.id() as i32);
        kill(pid, Signal::SIGINT).unwrap();
    }
}

fn rostopic_listing_succeeds() -> bool {
    Command::new("rostopic")
        .arg("list")
        .output()
        .unwrap()
        .status
        .success()
}

/// # start roscore and the node under test
///
/// rosrust can be initialized only once per process, so each test binary
/// calls this exactly once.
///
/// The returned terminator must be bound to a variable to keep `roscore`
/// running.
pub fn run_roscore_and_init(name: &str) -> (ChildProcessTerminator, RosNode) {
    let port = portpicker::pick_unused_port().expect("No ports free");
    println!("Running roscore on port: {port}");
    env::set_var("ROS_MASTER_URI", format!("http://localhost:{port}"));
    let roscore =
        ChildProcessTerminator::spawn(Command::new("roscore").arg("-p").arg(format!("{port}")));
    while !rostopic_listing_succeeds() {
        sleep(Duration::from_millis(100));
    }
    (roscore, RosNode::init(name))
}

/// Polls `f` every 10 ms until it returns `Some` or `timeout` passes.
pub fn wait_until<T>(timeout: Duration, mut f: impl FnMut() -> Option<T>) -> Option<T> {
    let start = Instant::now();
    loop {
        if let Some(v) = f() {
            return Some(v);
        }
        if start.elapsed() >= timeout {
            return None;
        }
        sleep(Duration::from_millis(10));
    }
}
