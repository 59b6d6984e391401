//! Typed access to `vboxmanage` and `df` on a remote host.

mod df;
mod vbox;

pub use df::DISK_USAGE_LABELS;
pub use vbox::VirtualBox;
