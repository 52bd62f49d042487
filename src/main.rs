use std::{sync::Arc, time::Duration};

use anyhow::Result;

use chime::{ToastOptions, ToastStore, ToastVariant, settings};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    // initialize configuration system
    if let Err(e) = settings::init() {
        log::error!("failed to initialize settings: {}", e);
    }

    let config = settings::get_config();
    let store = Arc::new(ToastStore::new(config.toasts));

    let subscription = store.subscribe(|toasts| {
        let titles: Vec<&str> = toasts.iter().filter_map(|t| t.title.as_deref()).collect();
        log::info!("{} active toast(s): [{}]", toasts.len(), titles.join(", "));
    });

    let mut events = store.events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            log::debug!("event: {:?}", event);
        }
    });

    let synced = store.publish(
        ToastOptions::new()
            .title("orders synced")
            .description("42 orders pushed upstream"),
    );
    let failed = store.publish(
        ToastOptions::new()
            .title("import failed")
            .description("3 rows were missing a customer id")
            .variant(ToastVariant::Destructive)
            .action("retry", "Retry"),
    );

    // patch the first toast in place; its id and position stay put
    synced.update(ToastOptions::new().description("43 orders pushed upstream"));

    failed.dismiss();

    // let the survivors run out their timer before exiting
    tokio::time::sleep(Duration::from_millis(config.toasts.timeout_ms + 500)).await;

    subscription.unsubscribe();
    Ok(())
}
