//! Correlation of locally known deposits with the processed-notes tables
//! published by the off-chain workers.

use crate::notes::{
    BuildNote,
    InfluenceDepositNote,
    NoteId,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::HashMap;

pub const PENDING_LABEL: &str = "Pending...";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedInfluenceNote {
    /// Manager transaction that applied the deposit.
    pub acfg_txn: String,
    #[serde(default)]
    pub asset_id: u64,
    #[serde(default)]
    pub asset_name: Option<String>,
    pub block: u64,
    #[serde(default)]
    pub deposit: u64,
    pub id: NoteId,
    #[serde(default)]
    pub influence: u64,
    #[serde(default)]
    pub sender_address: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedBuildNote {
    pub acfg_txn: String,
    #[serde(default)]
    pub asset_id: u64,
    pub block: u64,
    #[serde(default)]
    pub deposit: u64,
    pub id: NoteId,
    #[serde(default)]
    pub object_id: String,
    #[serde(default)]
    pub sender_address: String,
}

pub type ProcessedInfluenceTable = HashMap<NoteId, ProcessedInfluenceNote>;
pub type ProcessedBuildTable = HashMap<NoteId, ProcessedBuildNote>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "record")]
pub enum DepositStatus<T> {
    Pending,
    Resolved(T),
}

impl<T> DepositStatus<T> {
    pub fn is_pending(&self) -> bool {
        matches!(self, DepositStatus::Pending)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InfluenceRow {
    pub note: InfluenceDepositNote,
    pub status: DepositStatus<ProcessedInfluenceNote>,
}

impl InfluenceRow {
    pub fn acfg_txn(&self) -> &str {
        match &self.status {
            DepositStatus::Resolved(record) => &record.acfg_txn,
            DepositStatus::Pending => PENDING_LABEL,
        }
    }

    pub fn block(&self) -> String {
        match &self.status {
            DepositStatus::Resolved(record) => record.block.to_string(),
            DepositStatus::Pending => PENDING_LABEL.to_string(),
        }
    }

    pub fn influence(&self) -> String {
        match &self.status {
            DepositStatus::Resolved(record) => record.influence.to_string(),
            DepositStatus::Pending => PENDING_LABEL.to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BuildRow {
    pub note: BuildNote,
    pub status: DepositStatus<ProcessedBuildNote>,
}

impl BuildRow {
    pub fn acfg_txn(&self) -> &str {
        match &self.status {
            DepositStatus::Resolved(record) => &record.acfg_txn,
            DepositStatus::Pending => PENDING_LABEL,
        }
    }

    pub fn block(&self) -> String {
        match &self.status {
            DepositStatus::Resolved(record) => record.block.to_string(),
            DepositStatus::Pending => PENDING_LABEL.to_string(),
        }
    }
}

/// One row per note, in note order; resolved once its id is a table key.
pub fn correlate_influence(
    notes: &[InfluenceDepositNote],
    table: &ProcessedInfluenceTable,
) -> Vec<InfluenceRow> {
    notes
        .iter()
        .map(|note| InfluenceRow {
            note: note.clone(),
            status: table
                .get(&note.note_id)
                .cloned()
                .map_or(DepositStatus::Pending, DepositStatus::Resolved),
        })
        .collect()
}

pub fn correlate_builds(notes: &[BuildNote], table: &ProcessedBuildTable) -> Vec<BuildRow> {
    notes
        .iter()
        .map(|note| BuildRow {
            note: note.clone(),
            status: table
                .get(&note.note_id)
                .cloned()
                .map_or(DepositStatus::Pending, DepositStatus::Resolved),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    fn influence_note(id: &str) -> InfluenceDepositNote {
        InfluenceDepositNote {
            receiver: "CITYMGR".to_string(),
            asset_index: 123,
            asset_title: Some("Paris".to_string()),
            influence_deposit: 500,
            note_id: NoteId::from(id),
        }
    }

    #[test]
    fn correlate_influence__marks_unknown_notes_pending() {
        // given
        let table: ProcessedInfluenceTable = serde_json::from_str(
            r#"{
                "done": {
                    "acfg_txn": "ACFG1",
                    "asset_id": 123,
                    "asset_name": "Paris",
                    "block": 99,
                    "deposit": 500,
                    "id": "done",
                    "influence": 1500,
                    "sender_address": "USER"
                }
            }"#,
        )
        .unwrap();
        let notes = vec![influence_note("done"), influence_note("fresh")];

        // when
        let rows = correlate_influence(&notes, &table);

        // then
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].acfg_txn(), "ACFG1");
        assert_eq!(rows[0].block(), "99");
        assert_eq!(rows[0].influence(), "1500");
        assert!(rows[1].status.is_pending());
        assert_eq!(rows[1].acfg_txn(), PENDING_LABEL);
        assert_eq!(rows[1].influence(), PENDING_LABEL);
    }

    #[test]
    fn processed_tables__tolerate_rows_missing_display_fields() {
        // given
        let influence = r#"{
            "sparse": {"acfg_txn": "ACFG3", "block": 12, "id": "sparse"},
            "full": {
                "acfg_txn": "ACFG4",
                "asset_id": 123,
                "block": 13,
                "deposit": 10,
                "id": "full",
                "influence": 20,
                "sender_address": "USER"
            }
        }"#;
        let builds = r#"{"b2": {"acfg_txn": "ACFG5", "block": 14, "id": "b2"}}"#;

        // when
        let influence: ProcessedInfluenceTable = serde_json::from_str(influence).unwrap();
        let builds: ProcessedBuildTable = serde_json::from_str(builds).unwrap();

        // then
        let rows = correlate_influence(&[influence_note("sparse")], &influence);
        assert_eq!(rows[0].acfg_txn(), "ACFG3");
        assert_eq!(rows[0].influence(), "0");
        assert_eq!(influence.len(), 2);
        assert_eq!(builds[&NoteId::from("b2")].object_id, "");
    }

    #[test]
    fn correlate_builds__resolves_by_note_id() {
        let table: ProcessedBuildTable = serde_json::from_str(
            r#"{
                "b1": {
                    "acfg_txn": "ACFG2",
                    "asset_id": 7,
                    "block": 5,
                    "deposit": 1000,
                    "id": "b1",
                    "object_id": "Castle",
                    "sender_address": "USER"
                }
            }"#,
        )
        .unwrap();
        let note = BuildNote {
            receiver: "MGR".to_string(),
            asset_index: 7,
            deposit: 1000,
            object: "Castle".to_string(),
            note_id: NoteId::from("b1"),
        };

        let rows = correlate_builds(&[note], &table);

        assert_eq!(rows[0].acfg_txn(), "ACFG2");
        assert_eq!(rows[0].block(), "5");
        assert!(!rows[0].status.is_pending());
    }

    #[test]
    fn correlate_builds__empty_table_leaves_everything_pending() {
        let note = BuildNote {
            receiver: "MGR".to_string(),
            asset_index: 7,
            deposit: 1000,
            object: "Castle".to_string(),
            note_id: NoteId::from("b1"),
        };

        let rows = correlate_builds(&[note], &ProcessedBuildTable::new());

        assert_eq!(rows[0].block(), PENDING_LABEL);
    }
}
