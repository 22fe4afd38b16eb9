use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

pub(crate) type RosterResult<T> = Result<T, String>;

/// Which decision logic drives a combatant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(crate) enum CombatantKind {
    Player,
    Auto,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CombatantSpec {
    pub(crate) name: String,
    pub(crate) kind: CombatantKind,
    #[serde(default = "default_speed")]
    pub(crate) speed: i32,
    #[serde(default = "default_hp")]
    pub(crate) hp: i32,
    #[serde(default = "default_damage")]
    pub(crate) damage: i32,
    #[serde(default)]
    pub(crate) enemy: bool,
    #[serde(default)]
    pub(crate) sprite: Option<String>,
}

fn default_speed() -> i32 {
    1
}

fn default_hp() -> i32 {
    10
}

fn default_damage() -> i32 {
    1
}

/// The two battle rosters as declared in `rosters.json`.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct RosterConfig {
    pub(crate) left: Vec<CombatantSpec>,
    pub(crate) right: Vec<CombatantSpec>,
}

impl RosterConfig {
    pub(crate) fn from_file(path: &Path) -> RosterResult<Self> {
        let raw = fs::read_to_string(path)
            .map_err(|error| format!("read roster '{}': {error}", path.display()))?;
        let config = Self::from_json(&raw)?;
        info!(
            roster = %path.display(),
            left = config.left.len(),
            right = config.right.len(),
            "roster_loaded"
        );
        Ok(config)
    }

    pub(crate) fn from_json(raw: &str) -> RosterResult<Self> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config = match serde_path_to_error::deserialize::<_, RosterConfig>(&mut deserializer) {
            Ok(config) => config,
            Err(error) => {
                let path = error.path().to_string();
                let source = error.into_inner();
                return if path.is_empty() || path == "." {
                    Err(format!("parse roster json: {source}"))
                } else {
                    Err(format!("parse roster json at {path}: {source}"))
                };
            }
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> RosterResult<()> {
        for (side, specs) in [("left", &self.left), ("right", &self.right)] {
            for spec in specs {
                if spec.name.trim().is_empty() {
                    return Err(format!("validation failed at {side}: combatant with empty name"));
                }
                if spec.hp <= 0 {
                    return Err(format!(
                        "validation failed at {side}.{}: hp must be positive, got {}",
                        spec.name, spec.hp
                    ));
                }
                if spec.damage < 0 {
                    return Err(format!(
                        "validation failed at {side}.{}: damage must not be negative, got {}",
                        spec.name, spec.damage
                    ));
                }
            }
        }
        Ok(())
    }
}
