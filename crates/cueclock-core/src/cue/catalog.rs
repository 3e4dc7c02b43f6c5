use serde::{Deserialize, Serialize};

/// Static catalog entry: a cue a front end can offer for selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CueDefinition {
    pub id: String,
    pub label: String,
}

impl CueDefinition {
    fn new(id: &str, label: &str) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

/// The built-in cue catalog.
///
/// Defined once at process start; selections are subsets of these ids.
pub fn builtin_catalog() -> Vec<CueDefinition> {
    vec![
        CueDefinition::new("45min", "45 minutes left"),
        CueDefinition::new("30min", "30 minutes left"),
        CueDefinition::new("15min", "15 minutes left"),
        CueDefinition::new("10min", "10 minutes left"),
        CueDefinition::new("5min", "5 minutes left"),
        CueDefinition::new("1min", "1 minute left"),
        CueDefinition::new("blackout", "Lights out"),
        CueDefinition::new("gameover", "Game over"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cue::trigger_offset;

    #[test]
    fn every_catalog_id_resolves_to_a_trigger() {
        for cue in builtin_catalog() {
            assert!(
                trigger_offset(&cue.id).is_some(),
                "catalog id '{}' does not resolve",
                cue.id
            );
        }
    }

    #[test]
    fn catalog_ids_are_unique() {
        let catalog = builtin_catalog();
        let ids: std::collections::BTreeSet<_> = catalog.iter().map(|c| c.id.clone()).collect();
        assert_eq!(ids.len(), catalog.len());
    }
}
