use std::path::Path;

use serde::{Deserialize, Serialize};
use tracker_engine::StateFile;
use tracker_logging::{tracker_error, tracker_info, tracker_warn};

const STATE_FILENAME: &str = ".tracker_state.ron";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedState {
    /// Query string of the last applied list, without `?`.
    location: String,
}

pub(crate) fn load_location(state_dir: &Path) -> Option<String> {
    let file = StateFile::new(state_dir, STATE_FILENAME);
    let content = match file.load() {
        Ok(Some(text)) => text,
        Ok(None) => return None,
        Err(err) => {
            tracker_warn!("Failed to read saved location from {:?}: {}", file.path(), err);
            return None;
        }
    };

    match ron::from_str::<PersistedState>(&content) {
        Ok(state) => {
            tracker_info!("Restored location {:?} from {:?}", state.location, file.path());
            Some(state.location)
        }
        Err(err) => {
            tracker_warn!("Failed to parse saved location from {:?}: {}", file.path(), err);
            None
        }
    }
}

pub(crate) fn save_location(state_dir: &Path, location: &str) {
    let state = PersistedState {
        location: location.to_string(),
    };

    let pretty = ron::ser::PrettyConfig::new();
    let content = match ron::ser::to_string_pretty(&state, pretty) {
        Ok(text) => text,
        Err(err) => {
            tracker_error!("Failed to serialize location: {}", err);
            return;
        }
    };

    let file = StateFile::new(state_dir, STATE_FILENAME);
    if let Err(err) = file.store(&content) {
        tracker_error!("Failed to write location to {:?}: {}", file.path(), err);
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn location_survives_a_restart() {
        let temp = TempDir::new().unwrap();
        assert_eq!(load_location(temp.path()), None);

        save_location(temp.path(), "page=2&status[]=offer");
        assert_eq!(
            load_location(temp.path()).as_deref(),
            Some("page=2&status[]=offer")
        );

        save_location(temp.path(), "");
        assert_eq!(load_location(temp.path()).as_deref(), Some(""));
    }

    #[test]
    fn corrupt_state_is_ignored() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(STATE_FILENAME), "not ron at all (").unwrap();
        assert_eq!(load_location(temp.path()), None);
    }
}
