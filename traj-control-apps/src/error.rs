use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("traj-control-apps: Failed to parse {:?} as toml ({}).", .0, .1)]
    TomlParseFailure(PathBuf, #[source] toml::de::Error),
    #[error("traj-control-apps: No File {:?} is found ({}).", .0, .1)]
    NoFile(PathBuf, #[source] std::io::Error),
    #[error("traj-control-apps: Backend {} requires the {:?} feature.", .0, .0)]
    BackendRequireFeature(String),
    #[error("traj-control-apps: traj-control: {}", .0)]
    TrajControl(#[from] traj_control::Error),
}
