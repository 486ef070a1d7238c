use auto_impl::auto_impl;

#[auto_impl(&, Box, Arc)]
pub trait Liveness {
    /// Returns `false` once the process has been asked to stop.
    fn is_ok(&self) -> bool;
}
