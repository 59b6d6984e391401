use std::time::Instant;

use crate::app::navigator::Navigator;
use crate::app::view::View;
use crate::inventory::VirtualBox;
use crate::ssh_service::RemoteRunner;

/// Everything one interactive session owns. Handlers get it passed in; there
/// is no process-wide UI state.
#[derive(Debug)]
pub struct App<R: RemoteRunner> {
    pub should_quit: bool,
    pub inventory: VirtualBox<R>,
    pub navigator: Navigator<View>,
    pub status_message: Option<(String, Instant)>,
}
