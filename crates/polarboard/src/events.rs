use async_channel::Sender;

#[derive(Debug, Clone)]
pub enum BoardEvent {
    /// The config file changed on disk.
    ConfigReload,
    /// A client asked for a reload; the outcome goes back on the sender.
    ReloadRequested(Sender<bool>),
    Shutdown,
}
