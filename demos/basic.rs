//! Basic example running the session lifecycle against the in-memory client

use cloudant_session_store::{
    CloudantStore, MemoryDocumentClient, SessionData, SessionStore, StoreConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Set up logging
    tracing_subscriber::fmt::init();

    let config = StoreConfig::new()
        .with_database("sessions")
        .with_prefix("sess:")
        .with_ttl(3600); // 1 hour

    let store = CloudantStore::with_config(MemoryDocumentClient::new(), config);

    // Watch for out-of-band store errors
    let mut errors = store.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = errors.recv().await {
            eprintln!("store error during {} for {:?}: {}", event.operation, event.sid, event.error);
        }
    });

    // Provision the database and the expired-sessions view; safe to repeat
    store.init().await?;
    store.init().await?;

    // The session id would normally come from the middleware's cookie
    let sid = "demo-session";

    let mut session = SessionData::new(3600);
    session.set("user", "alice");
    session.set("views", 1);
    store.set(sid, &session).await?;
    println!("stored session for {:?}", sid);

    let found = store.get(sid).await?.expect("session should be live");
    println!(
        "fetched session: user={:?} views={:?}",
        found.get::<String>("user"),
        found.get::<i32>("views")
    );

    // Extend the session's lifetime without changing its payload
    store.touch(sid, &found).await?;
    println!("touched session for {:?}", sid);

    store.destroy(sid).await?;
    println!("destroyed session for {:?}", sid);

    assert!(store.get(sid).await?.is_none());
    println!("session is gone");

    Ok(())
}
