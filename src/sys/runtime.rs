use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Runtime;

/// Runs the config watcher on its own thread so the GTK main loop never
/// blocks on filesystem events.
pub fn start_background_services(tx: Sender<AppEvent>) {
    thread::spawn(move || {
        let rt = Runtime::new().expect("Failed to create Tokio runtime");

        rt.block_on(async {
            tokio::spawn(async move {
                crate::config::run_async_watcher(tx).await;
            });

            std::future::pending::<()>().await;
        });
    });
}
