//! Latest-record selection: one row per patient per stream.

use std::collections::HashMap;

use chrono::NaiveDateTime;

use crate::models::{ConsultationRecord, LabResult, VitalRecord};

use super::types::ClinicalSnapshot;

/// Per-stream accessors for the patient key and observation time.
/// Each stream names these differently upstream; the mapping is fixed here,
/// once per type, never guessed at runtime.
pub trait StreamRecord {
    fn patient_key(&self) -> &str;
    fn observed_at(&self) -> Option<NaiveDateTime>;
}

impl StreamRecord for VitalRecord {
    fn patient_key(&self) -> &str {
        &self.patient_id
    }

    fn observed_at(&self) -> Option<NaiveDateTime> {
        self.observed_at
    }
}

impl StreamRecord for LabResult {
    fn patient_key(&self) -> &str {
        &self.patient_id
    }

    fn observed_at(&self) -> Option<NaiveDateTime> {
        self.observed_at
    }
}

impl StreamRecord for ConsultationRecord {
    fn patient_key(&self) -> &str {
        &self.patient_id
    }

    fn observed_at(&self) -> Option<NaiveDateTime> {
        self.observed_at
    }
}

/// Reduce a stream to its most recent record per patient.
///
/// Records without a key or with an unparsable timestamp are skipped.
/// On equal timestamps the record seen last in input order wins.
pub fn select_latest<R: StreamRecord>(records: &[R]) -> HashMap<&str, &R> {
    records.iter().fold(HashMap::new(), |mut latest, record| {
        let key = record.patient_key();
        let Some(observed) = record.observed_at() else {
            return latest;
        };
        if key.is_empty() {
            return latest;
        }
        let newer = latest
            .get(key)
            .and_then(|current: &&R| current.observed_at())
            .map_or(true, |current| observed >= current);
        if newer {
            latest.insert(key, record);
        }
        latest
    })
}

/// Latest record per patient for each of the three streams.
pub struct LatestRecords<'a> {
    pub vitals: HashMap<&'a str, &'a VitalRecord>,
    pub labs: HashMap<&'a str, &'a LabResult>,
    pub consultations: HashMap<&'a str, &'a ConsultationRecord>,
}

impl<'a> LatestRecords<'a> {
    pub fn select(snapshot: &'a ClinicalSnapshot) -> Self {
        Self {
            vitals: select_latest(&snapshot.vitals),
            labs: select_latest(&snapshot.lab_results),
            consultations: select_latest(&snapshot.consultations),
        }
    }

    /// Most recent timestamp across the patient's latest rows.
    pub fn last_observed_at(&self, patient_id: &str) -> Option<NaiveDateTime> {
        [
            self.vitals.get(patient_id).and_then(|r| r.observed_at),
            self.labs.get(patient_id).and_then(|r| r.observed_at),
            self.consultations.get(patient_id).and_then(|r| r.observed_at),
        ]
        .into_iter()
        .flatten()
        .max()
    }

    /// Patient keys present in any stream, for orphan detection.
    pub fn patient_keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.vitals
            .keys()
            .chain(self.labs.keys())
            .chain(self.consultations.keys())
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::fixtures::{at, lab, vital_bp};

    #[test]
    fn picks_max_timestamp_regardless_of_order() {
        let records = vec![
            vital_bp("p1", at(3), 120.0, 80.0),
            vital_bp("p1", at(9), 150.0, 95.0),
            vital_bp("p1", at(5), 170.0, 105.0),
        ];
        let latest = select_latest(&records);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest["p1"].observed_at, Some(at(9)));
    }

    #[test]
    fn ties_go_to_last_seen() {
        let mut first = lab("p1", at(4));
        first.ldl = Some(120.0);
        let mut second = lab("p1", at(4));
        second.ldl = Some(140.0);
        let records = vec![first, second];
        let latest = select_latest(&records);
        assert_eq!(latest["p1"].ldl, Some(140.0));
    }

    #[test]
    fn unparsable_timestamps_and_blank_keys_are_skipped() {
        let mut undated = vital_bp("p1", at(20), 200.0, 120.0);
        undated.observed_at = None;
        let records = vec![
            vital_bp("p1", at(2), 118.0, 76.0),
            undated,
            vital_bp("", at(5), 150.0, 95.0),
        ];
        let latest = select_latest(&records);
        assert_eq!(latest.len(), 1);
        assert_eq!(latest["p1"].observed_at, Some(at(2)));
    }

    #[test]
    fn only_undated_rows_yield_no_entry() {
        let mut undated = lab("p1", at(1));
        undated.observed_at = None;
        let records = vec![undated];
        assert!(select_latest(&records).is_empty());
    }

    #[test]
    fn last_observed_spans_streams() {
        let snapshot = ClinicalSnapshot {
            vitals: vec![vital_bp("p1", at(3), 120.0, 80.0)],
            lab_results: vec![lab("p1", at(7))],
            ..Default::default()
        };
        let latest = LatestRecords::select(&snapshot);
        assert_eq!(latest.last_observed_at("p1"), Some(at(7)));
        assert_eq!(latest.last_observed_at("p2"), None);
    }
}
