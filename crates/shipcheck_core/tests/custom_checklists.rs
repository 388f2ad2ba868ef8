use chrono::Local;
use shipcheck_core::db::open_db_in_memory;
use shipcheck_core::{
    ChecklistSection, CustomChecklist, CustomChecklistStore, KvStore, SqliteKvStore,
};

fn checklist(title: &str) -> CustomChecklist {
    let mut checklist = CustomChecklist::new(title);
    checklist
        .sections
        .push(ChecklistSection::from_titles("Main", ["One", "Two"]));
    checklist
}

fn ids(records: &[CustomChecklist]) -> Vec<uuid::Uuid> {
    records.iter().map(|record| record.id).collect()
}

#[test]
fn empty_store_loads_empty_list() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    assert!(CustomChecklistStore::new(&kv).load_all().is_empty());
}

#[test]
fn load_all_returns_most_recently_added_first() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    let first = checklist("First");
    let second = checklist("Second");
    let third = checklist("Third");
    for record in [&first, &second, &third] {
        store.add(record);
        assert_eq!(store.load_all()[0].id, record.id);
    }

    assert_eq!(ids(&store.load_all()), vec![third.id, second.id, first.id]);
    assert_eq!(
        ids(&store.load_insertion_order()),
        vec![first.id, second.id, third.id]
    );
}

#[test]
fn update_replaces_in_place_and_leaves_others() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    let first = checklist("First");
    let second = checklist("Second");
    let third = checklist("Third");
    store.add(&first);
    store.add(&second);
    store.add(&third);

    let mut edited = second.clone();
    edited.title = "Second (edited)".to_string();
    edited.is_favorite = true;
    edited.item_mut(0, 1).unwrap().set_checked(true, Local::now());
    store.update(&edited);

    let loaded = store.load_all();
    assert_eq!(loaded, vec![third, edited, first]);
}

#[test]
fn update_with_unknown_id_is_a_no_op() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    let existing = checklist("Existing");
    store.add(&existing);
    store.update(&checklist("Never added"));

    assert_eq!(store.load_all(), vec![existing]);
}

#[test]
fn later_write_of_stale_copy_wins() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    let original = checklist("Shared");
    store.add(&original);

    let mut from_editor = original.clone();
    from_editor.title = "Renamed in editor".to_string();
    let mut from_runner = original.clone();
    from_runner.item_mut(0, 0).unwrap().set_checked(true, Local::now());

    store.update(&from_editor);
    store.update(&from_runner);

    assert_eq!(store.get(original.id), Some(from_runner));
}

#[test]
fn delete_removes_by_id_and_ignores_unknown() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    let keep = checklist("Keep");
    let doomed = checklist("Doomed");
    store.add(&keep);
    store.add(&doomed);

    let mut renamed_copy = doomed.clone();
    renamed_copy.title = "Different title, same id".to_string();
    store.delete(&renamed_copy);
    assert_eq!(store.load_all(), vec![keep.clone()]);

    store.delete(&checklist("Unknown"));
    assert_eq!(store.load_all(), vec![keep]);
}

#[test]
fn titles_may_collide() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    let a = checklist("Same");
    let b = checklist("Same");
    store.add(&a);
    store.add(&b);
    store.delete(&a);

    assert_eq!(ids(&store.load_all()), vec![b.id]);
}

#[test]
fn save_all_overwrites_verbatim() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    let a = checklist("A");
    let b = checklist("B");
    let c = checklist("C");
    store.add(&a);
    store.add(&b);
    store.add(&c);

    // Drag "A" to the top of the list (newest-first display order).
    let mut display = store.load_all();
    let moved = display.remove(2);
    display.insert(0, moved);
    let persisted: Vec<_> = display.iter().rev().cloned().collect();
    store.save_all(&persisted);

    assert_eq!(ids(&store.load_all()), vec![a.id, c.id, b.id]);

    store.save_all(&[]);
    assert!(store.load_all().is_empty());
}

#[test]
fn corrupt_payload_loads_as_empty_and_next_add_recovers() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    kv.set("customChecklists", r#"[{"id": 42}]"#).unwrap();
    assert!(store.load_all().is_empty());

    let fresh = checklist("Fresh");
    store.add(&fresh);
    assert_eq!(store.load_all(), vec![fresh]);
}

fn unchecked_with_timestamp(title: &str) -> CustomChecklist {
    let mut record = checklist(title);
    record.sections[0].items[0].timestamp = Some("2026-01-01 08:00".to_string());
    record
}

#[test]
fn invalid_add_is_dropped_and_other_records_survive() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    let keep = checklist("Keep me");
    store.add(&keep);
    let mut checked_without_time = checklist("Bad");
    checked_without_time.sections[0].items[0].is_checked = true;
    store.add(&checked_without_time);
    let next = checklist("Next");
    store.add(&next);

    assert_eq!(ids(&store.load_all()), vec![next.id, keep.id]);
}

#[test]
fn invalid_update_keeps_stored_record() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    let stored = checklist("Stored");
    store.add(&stored);
    let mut broken = unchecked_with_timestamp("Broken edit");
    broken.id = stored.id;
    store.update(&broken);

    assert_eq!(store.load_all(), vec![stored]);
}

#[test]
fn save_all_with_invalid_record_keeps_previous_list() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    let a = checklist("A");
    store.add(&a);
    store.save_all(&[checklist("B"), unchecked_with_timestamp("C")]);

    assert_eq!(store.load_all(), vec![a]);
}

#[test]
fn invalid_stored_record_is_skipped_without_losing_neighbours() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    let store = CustomChecklistStore::new(&kv);

    let first = checklist("First");
    let last = checklist("Last");
    let on_disk = vec![first.clone(), unchecked_with_timestamp("Invalid"), last.clone()];
    kv.set("customChecklists", &serde_json::to_string(&on_disk).unwrap())
        .unwrap();

    assert_eq!(ids(&store.load_all()), vec![last.id, first.id]);

    let added = checklist("Added");
    store.add(&added);
    assert_eq!(ids(&store.load_all()), vec![added.id, last.id, first.id]);
}

#[test]
fn records_decode_from_stored_wire_shape() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKvStore::new(&conn);
    kv.set(
        "customChecklists",
        r#"[{
            "id": "11111111-2222-4333-8444-555555555555",
            "title": "Legacy",
            "isFavorite": true,
            "sections": [{"title": "S", "items": [
                {"title": "I", "isChecked": true, "timestamp": "2025-01-01 10:00",
                 "quickNote": "note", "photoFilenames": ["p.jpg"]}
            ]}]
        }]"#,
    )
    .unwrap();

    let loaded = CustomChecklistStore::new(&kv).load_all();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].title, "Legacy");
    assert!(loaded[0].is_favorite);
    let item = loaded[0].item(0, 0).unwrap();
    assert_eq!(item.quick_note.as_deref(), Some("note"));
    assert_eq!(item.photo_filenames, vec!["p.jpg".to_string()]);
}
