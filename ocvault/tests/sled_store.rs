#![cfg(feature = "sled-storage")]

use std::sync::Arc;
use std::time::Duration;

use ocvault::{SessionStore, SledStore, Storage, User};

#[tokio::test]
async fn put_get_delete_lifecycle() -> anyhow::Result<()> {
    let store = SledStore::new()?;

    store.put("k", "v".to_owned(), None).await?;
    assert_eq!(store.get("k").await?.as_deref(), Some("v"));

    assert_eq!(store.delete("k").await?.as_deref(), Some("v"));
    assert_eq!(store.get("k").await?, None);
    assert_eq!(store.delete("k").await?, None);
    Ok(())
}

#[tokio::test]
async fn entries_expire_after_their_ttl() -> anyhow::Result<()> {
    let store = SledStore::new()?;

    store
        .put("short", "lived".to_owned(), Some(Duration::from_millis(50)))
        .await?;
    assert_eq!(store.get("short").await?.as_deref(), Some("lived"));

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(store.get("short").await?, None);

    // The expired entry was purged, not just hidden.
    assert_eq!(store.db().get(b"short")?, None);
    Ok(())
}

#[tokio::test]
async fn untimed_entries_do_not_expire() -> anyhow::Result<()> {
    let store = SledStore::new()?;

    store.put("stable", "value".to_owned(), None).await?;
    tokio::time::sleep(Duration::from_millis(80)).await;

    assert_eq!(store.get("stable").await?.as_deref(), Some("value"));
    Ok(())
}

#[tokio::test]
async fn data_survives_reopen() -> anyhow::Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let path = temp_dir.path().join("vault.db");

    {
        let store = SledStore::open(&path)?;
        store.put("persistent", "yes".to_owned(), None).await?;
        store.db().flush()?;
    }

    {
        let store = SledStore::open(&path)?;
        assert_eq!(store.get("persistent").await?.as_deref(), Some("yes"));
    }
    Ok(())
}

#[tokio::test]
async fn sessions_over_sled_round_trip() -> anyhow::Result<()> {
    let sessions = SessionStore::new(Arc::new(SledStore::new()?));
    let user = User::admin("admin");

    let token = sessions.issue(&user).await?;
    assert_eq!(sessions.resolve(&token).await?, Some(user));

    sessions.revoke(&token).await?;
    assert_eq!(sessions.resolve(&token).await?, None);
    Ok(())
}
