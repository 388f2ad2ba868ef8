//! Static catalog of built-in checklist templates.
//!
//! # Invariants
//! - Titles are unique; they key overlays, quick notes and favorites.
//! - Section/row order must not change between releases: built-in quick
//!   notes are keyed by position, so inserting or reordering rows here moves
//!   existing users' notes onto different rows.

use crate::model::checklist::{ChecklistCategory, ChecklistInfo, ChecklistSection};
use once_cell::sync::Lazy;

static CATALOG: Lazy<Vec<ChecklistInfo>> = Lazy::new(build_catalog);

/// Returns every built-in template in display order, all items unchecked.
pub fn built_in_checklists() -> &'static [ChecklistInfo] {
    CATALOG.as_slice()
}

/// Returns a pristine copy of one template.
pub fn find_template(title: &str) -> Option<ChecklistInfo> {
    CATALOG.iter().find(|info| info.title == title).cloned()
}

pub fn titles_by_category(category: ChecklistCategory) -> Vec<&'static str> {
    CATALOG
        .iter()
        .filter(|info| info.category == category)
        .map(|info| info.title.as_str())
        .collect()
}

fn build_catalog() -> Vec<ChecklistInfo> {
    vec![
        ChecklistInfo::new(
            "Pre-Departure",
            ChecklistCategory::Standard,
            vec![
                ChecklistSection::from_titles(
                    "Master/Pilot Exchange",
                    [
                        "Pilot card received and reviewed",
                        "Passage plan agreed with master",
                        "Draft and air draft confirmed",
                        "Maneuvering characteristics discussed",
                    ],
                ),
                ChecklistSection::from_titles(
                    "Bridge Equipment",
                    [
                        "Radars operational and tuned",
                        "ECDIS route loaded",
                        "VHF channels set for port control",
                        "Steering tested in all modes",
                    ],
                ),
                ChecklistSection::from_titles(
                    "Deck",
                    [
                        "Anchors cleared and ready",
                        "Tugs confirmed and channel agreed",
                        "Mooring stations manned",
                    ],
                ),
            ],
        ),
        ChecklistInfo::new(
            "Pre-Arrival",
            ChecklistCategory::Standard,
            vec![
                ChecklistSection::from_titles(
                    "Planning",
                    [
                        "Berth and side alongside confirmed",
                        "Tide and current window checked",
                        "Tug make-fast plan agreed",
                    ],
                ),
                ChecklistSection::from_titles(
                    "Readiness",
                    [
                        "Engine on standby",
                        "Bow thruster tested",
                        "Speed reduced per plan",
                    ],
                ),
            ],
        ),
        ChecklistInfo::new(
            "Man Overboard",
            ChecklistCategory::Emergency,
            vec![
                ChecklistSection::from_titles(
                    "Immediate Actions",
                    [
                        "Shout \"Man overboard\" and note side",
                        "Release lifebuoy with light and smoke",
                        "Press MOB on GPS/ECDIS",
                        "Post lookout pointing at casualty",
                    ],
                ),
                ChecklistSection::from_titles(
                    "Maneuver and Alert",
                    [
                        "Start Williamson turn or appropriate maneuver",
                        "Sound three prolonged blasts",
                        "Notify VTS and MRCC",
                        "Prepare rescue boat",
                    ],
                ),
            ],
        ),
        ChecklistInfo::new(
            "Engine Failure",
            ChecklistCategory::Emergency,
            vec![
                ChecklistSection::from_titles(
                    "Immediate Actions",
                    [
                        "Inform master and engine room",
                        "Display not-under-command signals",
                        "Prepare anchors for letting go",
                    ],
                ),
                ChecklistSection::from_titles(
                    "Communication",
                    [
                        "Notify VTS with position and intentions",
                        "Request tug assistance",
                        "Broadcast navigational warning",
                    ],
                ),
            ],
        ),
        ChecklistInfo::new(
            "Loss of Steering",
            ChecklistCategory::Emergency,
            vec![ChecklistSection::from_titles(
                "Immediate Actions",
                [
                    "Switch to alternate steering pump",
                    "Engage emergency steering from aft",
                    "Reduce speed and display NUC signals",
                    "Notify VTS and nearby traffic",
                ],
            )],
        ),
        ChecklistInfo::new(
            "Post-Incident Report",
            ChecklistCategory::PostIncident,
            vec![
                ChecklistSection::from_titles(
                    "Record",
                    [
                        "Time and position logged",
                        "Weather and sea state noted",
                        "VDR data preserved",
                    ],
                ),
                ChecklistSection::from_titles(
                    "Notify",
                    [
                        "Pilot station informed",
                        "Harbor master informed",
                        "Witness statements collected",
                    ],
                ),
            ],
        ),
    ]
}
