use chrono::{Local, TimeZone};
use shipcheck_core::{
    find_template, ArchivedChecklist, ChecklistCategory, ChecklistInfo, ChecklistItem,
    ChecklistSection, CustomChecklist, ValidationError,
};
use uuid::Uuid;

fn two_section_builtin() -> ChecklistInfo {
    ChecklistInfo::new(
        "Anchoring",
        ChecklistCategory::Standard,
        vec![
            ChecklistSection::from_titles("Approach", ["Speed reduced", "Depth checked"]),
            ChecklistSection::from_titles(
                "Let Go",
                ["Brake on", "Cable marked", "Anchor ball hoisted"],
            ),
        ],
    )
}

#[test]
fn item_serialization_uses_expected_wire_fields() {
    let at = Local.with_ymd_and_hms(2026, 5, 4, 14, 5, 0).unwrap();
    let mut item = ChecklistItem::new("Radar on");
    item.set_checked(true, at);
    item.quick_note = Some("range 6nm".to_string());
    item.attach_photo("a.jpg").unwrap();

    let json = serde_json::to_value(&item).unwrap();
    assert_eq!(json["title"], "Radar on");
    assert_eq!(json["isChecked"], true);
    assert_eq!(json["timestamp"], "2026-05-04 14:05");
    assert_eq!(json["quickNote"], "range 6nm");
    assert_eq!(json["photoFilenames"][0], "a.jpg");

    let decoded: ChecklistItem = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn item_decodes_without_optional_fields() {
    let decoded: ChecklistItem =
        serde_json::from_str(r#"{"title":"Lookout","isChecked":false}"#).unwrap();
    assert_eq!(decoded, ChecklistItem::new("Lookout"));
}

#[test]
fn builtin_and_custom_round_trip_through_json() {
    let info = two_section_builtin();
    let encoded = serde_json::to_string(&info).unwrap();
    assert!(encoded.contains(r#""category":"standard""#));
    assert_eq!(serde_json::from_str::<ChecklistInfo>(&encoded).unwrap(), info);

    let mut custom = info.convert_to_custom();
    custom.is_favorite = true;
    let json = serde_json::to_value(&custom).unwrap();
    assert_eq!(json["isFavorite"], true);
    assert_eq!(json["id"], custom.id.to_string());
    assert_eq!(serde_json::from_value::<CustomChecklist>(json).unwrap(), custom);
}

#[test]
fn post_incident_category_uses_camel_case_tag() {
    let json = serde_json::to_value(ChecklistCategory::PostIncident).unwrap();
    assert_eq!(json, "postIncident");
}

#[test]
fn archived_checklist_keeps_type_discriminator() {
    let built_in = ArchivedChecklist::BuiltIn(two_section_builtin());
    let json = serde_json::to_value(&built_in).unwrap();
    assert_eq!(json["type"], "builtIn");
    assert_eq!(json["checklist"]["title"], "Anchoring");

    let custom = ArchivedChecklist::Custom(CustomChecklist::new("Bunkering"));
    let json = serde_json::to_value(&custom).unwrap();
    assert_eq!(json["type"], "custom");
    assert_eq!(serde_json::from_value::<ArchivedChecklist>(json).unwrap(), custom);
}

#[test]
fn archive_identity_never_matches_across_variants() {
    let built_in = ArchivedChecklist::BuiltIn(two_section_builtin());
    let mut custom = CustomChecklist::new("Anchoring");
    let custom_entry = ArchivedChecklist::Custom(custom.clone());

    assert!(!built_in.same_identity(&custom_entry));
    assert!(!custom_entry.same_identity(&built_in));

    custom.title = "Renamed".to_string();
    assert!(custom_entry.same_identity(&ArchivedChecklist::Custom(custom)));
}

#[test]
fn convert_to_custom_snapshots_structure_and_state() {
    let at = Local.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap();
    let mut info = two_section_builtin();
    info.item_mut(1, 0).unwrap().set_checked(true, at);

    let mut custom = info.convert_to_custom();
    assert!(!custom.id.is_nil());
    assert!(!custom.is_favorite);
    assert_eq!(custom.title, info.title);
    assert_eq!(custom.sections, info.sections);
    assert_eq!(custom.sections.len(), 2);
    assert_eq!(
        custom
            .sections
            .iter()
            .map(|section| section.items.len())
            .sum::<usize>(),
        5
    );

    custom.item_mut(0, 0).unwrap().set_checked(true, at);
    assert!(!info.item(0, 0).unwrap().is_checked);

    let again = info.convert_to_custom();
    assert_ne!(again.id, custom.id);
}

#[test]
fn custom_validate_rejects_nil_id_and_bad_items() {
    let mut custom = CustomChecklist::new("Harbor");
    custom.id = Uuid::nil();
    assert_eq!(custom.validate(), Err(ValidationError::NilId));

    let mut custom = CustomChecklist::new("Harbor");
    let mut item = ChecklistItem::new("Fenders");
    item.is_checked = true;
    custom.sections.push(ChecklistSection::new("Deck", vec![item]));
    assert!(matches!(
        custom.validate(),
        Err(ValidationError::MissingTimestamp { .. })
    ));
}

#[test]
fn clear_items_resets_state_and_returns_photos() {
    let at = Local.with_ymd_and_hms(2026, 5, 4, 9, 0, 0).unwrap();
    let mut custom = find_template("Pre-Departure").unwrap().convert_to_custom();
    let item = custom.item_mut(0, 1).unwrap();
    item.set_checked(true, at);
    item.quick_note = Some("agreed".to_string());
    item.attach_photo("one.jpg").unwrap();
    item.attach_photo("two.jpg").unwrap();

    let photos = custom.clear_items();
    assert_eq!(photos, vec!["one.jpg".to_string(), "two.jpg".to_string()]);
    let item = custom.item(0, 1).unwrap();
    assert!(!item.is_checked);
    assert_eq!(item.timestamp, None);
    assert_eq!(item.quick_note, None);
    assert!(item.photo_filenames.is_empty());
}
