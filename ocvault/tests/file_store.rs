#![cfg(feature = "memory-storage")]

use std::collections::HashSet;
use std::sync::Arc;

use ocvault::{FileRecordStore, MemoryStore, NewFileRecord, SharedStorage, VaultError};

fn memory_backend() -> SharedStorage {
    Arc::new(MemoryStore::new())
}

fn named(name: &str) -> NewFileRecord {
    NewFileRecord {
        name: Some(name.to_owned()),
        ..Default::default()
    }
}

#[tokio::test]
async fn list_is_empty_before_any_append() -> anyhow::Result<()> {
    let files = FileRecordStore::new(memory_backend());

    assert!(files.list(1).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn appends_preserve_order_with_distinct_ids() -> anyhow::Result<()> {
    let files = FileRecordStore::new(memory_backend());

    for i in 0..5 {
        files.append(1, named(&format!("file-{i}.txt"))).await?;
    }

    let listed = files.list(1).await?;
    assert_eq!(listed.len(), 5);
    for (i, record) in listed.iter().enumerate() {
        assert_eq!(record.name.as_deref(), Some(format!("file-{i}.txt").as_str()));
    }

    let ids: HashSet<_> = listed.iter().map(|record| record.id.clone()).collect();
    assert_eq!(ids.len(), 5);
    Ok(())
}

#[tokio::test]
async fn append_assigns_server_fields_and_copies_the_rest() -> anyhow::Result<()> {
    let files = FileRecordStore::new(memory_backend());

    let fields = NewFileRecord {
        name: Some("photo.jpg".to_owned()),
        size: Some(1024),
        original_size: Some(4096),
        kind: Some("image/jpeg".to_owned()),
        compressed: Some(true),
        compression_ratio: Some(0.25),
        data: Some("YmxvYg==".to_owned()),
        thumbnail: Some("dGh1bWI=".to_owned()),
    };

    let record = files.append(7, fields.clone()).await?;

    assert!(!record.id.is_empty());
    assert_eq!(record.user_id, 7);
    assert!(!record.favorite);
    assert!(!record.date.is_empty());
    assert_eq!(record.name, fields.name);
    assert_eq!(record.size, fields.size);
    assert_eq!(record.original_size, fields.original_size);
    assert_eq!(record.kind, fields.kind);
    assert_eq!(record.compressed, fields.compressed);
    assert_eq!(record.compression_ratio, fields.compression_ratio);
    assert_eq!(record.data, fields.data);
    assert_eq!(record.thumbnail, fields.thumbnail);

    // And it reads back identically.
    let listed = files.list(7).await?;
    assert_eq!(listed, vec![record]);
    Ok(())
}

#[tokio::test]
async fn remove_of_unknown_id_is_not_found_and_changes_nothing() -> anyhow::Result<()> {
    let files = FileRecordStore::new(memory_backend());
    files.append(1, named("keep.txt")).await?;

    let result = files.remove(1, "no-such-id").await;
    assert!(matches!(result, Err(VaultError::FileNotFound)));

    let listed = files.list(1).await?;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name.as_deref(), Some("keep.txt"));
    Ok(())
}

#[tokio::test]
async fn remove_takes_exactly_one_record_and_keeps_order() -> anyhow::Result<()> {
    let files = FileRecordStore::new(memory_backend());

    let a = files.append(1, named("a.txt")).await?;
    let b = files.append(1, named("b.txt")).await?;
    let c = files.append(1, named("c.txt")).await?;

    let removed = files.remove(1, &b.id).await?;
    assert_eq!(removed.id, b.id);

    let listed = files.list(1).await?;
    let ids: Vec<_> = listed.iter().map(|record| record.id.as_str()).collect();
    assert_eq!(ids, vec![a.id.as_str(), c.id.as_str()]);
    Ok(())
}

#[tokio::test]
async fn users_do_not_see_each_others_files() -> anyhow::Result<()> {
    let files = FileRecordStore::new(memory_backend());

    files.append(1, named("mine.txt")).await?;
    files.append(2, named("yours.txt")).await?;

    let first = files.list(1).await?;
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].name.as_deref(), Some("mine.txt"));

    let second = files.list(2).await?;
    assert_eq!(second.len(), 1);
    assert_eq!(second[0].name.as_deref(), Some("yours.txt"));
    Ok(())
}

#[tokio::test]
async fn degraded_mode_builds_records_but_persists_nothing() -> anyhow::Result<()> {
    let files = FileRecordStore::degraded();

    let record = files.append(1, named("lost.txt")).await?;
    assert!(!record.id.is_empty());

    assert!(files.list(1).await?.is_empty());
    assert!(matches!(
        files.remove(1, &record.id).await,
        Err(VaultError::FileNotFound)
    ));
    Ok(())
}

#[test]
fn record_json_uses_wire_field_names_and_omits_unset_fields() -> anyhow::Result<()> {
    let record = ocvault::FileRecord {
        id: "abc".to_owned(),
        user_id: 1,
        name: Some("a.txt".to_owned()),
        size: Some(10),
        original_size: None,
        kind: Some("text/plain".to_owned()),
        compressed: None,
        compression_ratio: None,
        data: None,
        thumbnail: None,
        date: "2024-01-01T00:00:00.000Z".to_owned(),
        favorite: false,
    };

    let value = serde_json::to_value(&record)?;
    let object = value.as_object().expect("object");

    assert_eq!(object["userId"], 1);
    assert_eq!(object["type"], "text/plain");
    assert!(!object.contains_key("originalSize"));
    assert!(!object.contains_key("data"));
    assert_eq!(object["favorite"], false);
    Ok(())
}
