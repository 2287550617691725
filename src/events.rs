/// Events produced by the background services for the GUI component.
#[derive(Debug, Clone)]
pub enum AppEvent {
    ConfigReload,
}
