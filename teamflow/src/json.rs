use crate::error::PersistError;
use crate::model::Snapshot;
use crate::storage::Storage;
use log::debug;
use serde::Deserialize;

/// Serialize a snapshot into the persisted record `{members, edges}`.
pub fn encode(snapshot: &Snapshot) -> Result<String, PersistError> {
    serde_json::to_string(snapshot).map_err(PersistError::Encode)
}

/// Parse a persisted record. Accepts the bare snapshot and the older
/// `{state: {members, edges}, version}` envelope.
pub fn decode(text: &str) -> Result<Snapshot, PersistError> {
    let value: serde_json::Value = serde_json::from_str(text).map_err(PersistError::Decode)?;
    from_json_value(value)
}

pub fn from_json_value(value: serde_json::Value) -> Result<Snapshot, PersistError> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Record {
        Envelope {
            state: Snapshot,
            #[serde(default)]
            version: u32,
        },
        Bare(Snapshot),
    }
    let snapshot = match serde_json::from_value::<Record>(value) {
        Ok(Record::Envelope { state, version }) => {
            debug!("decoded enveloped snapshot version={version}");
            state
        }
        Ok(Record::Bare(snapshot)) => snapshot,
        Err(err) => return Err(PersistError::Decode(err)),
    };
    validate(&snapshot)?;
    Ok(snapshot)
}

/// Ids must be unique per kind and every position finite.
pub fn validate(snapshot: &Snapshot) -> Result<(), PersistError> {
    if let Some((kind, id)) = snapshot.first_duplicate_id() {
        return Err(PersistError::DuplicateId { kind, id: id.to_string() });
    }
    if let Some(id) = snapshot.first_non_finite() {
        return Err(PersistError::NonFinitePosition { id: id.to_string() });
    }
    Ok(())
}

/// Read the record under `key`. `Ok(None)` when the key is absent.
pub fn load(storage: &dyn Storage, key: &str) -> Result<Option<Snapshot>, PersistError> {
    match storage.get(key)? {
        Some(text) => decode(&text).map(Some),
        None => Ok(None),
    }
}

/// Refuses snapshots that would not decode again, leaving the previous
/// record in place.
pub fn save(storage: &mut dyn Storage, key: &str, snapshot: &Snapshot) -> Result<(), PersistError> {
    validate(snapshot)?;
    let text = encode(snapshot)?;
    storage.set(key, &text)?;
    Ok(())
}
