//! Presets command implementation
//!
//! Prints the preset parameters of each ground type as JSON.

use anyhow::{Context, Result};
use groundgen_spec::GroundType;
use serde_json::{Map, Value};
use std::process::ExitCode;

const ALL_GROUNDS: [GroundType; 3] = [
    GroundType::Cobblestone,
    GroundType::Slate,
    GroundType::Asphalt,
];

/// Preset parameters keyed by ground name, for `ground` or all ground types.
pub fn presets_json(ground: Option<GroundType>) -> Result<Value> {
    let mut map = Map::new();
    for ground in ALL_GROUNDS
        .into_iter()
        .filter(|g| ground.map_or(true, |only| only == *g))
    {
        let params = serde_json::to_value(ground.default_params())
            .with_context(|| format!("failed to serialize {} preset", ground))?;
        map.insert(ground.to_string(), params);
    }
    Ok(Value::Object(map))
}

/// Run the presets command
pub fn run(ground: Option<GroundType>) -> Result<ExitCode> {
    let presets = presets_json(ground)?;
    println!("{}", serde_json::to_string_pretty(&presets)?);
    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use groundgen_spec::GroundParams;

    #[test]
    fn test_all_presets() {
        let presets = presets_json(None).unwrap();
        let map = presets.as_object().unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(presets["cobblestone"]["cellular"]["size"], 10);
        assert_eq!(presets["slate"]["cellular"]["grid_distortion"], 0.5);
        assert_eq!(presets["asphalt"]["asphalt"]["crack_width"], 10);
    }

    #[test]
    fn test_single_preset_round_trips() {
        let presets = presets_json(Some(GroundType::Slate)).unwrap();
        assert_eq!(presets.as_object().unwrap().len(), 1);
        let params: GroundParams = serde_json::from_value(presets["slate"].clone()).unwrap();
        assert_eq!(params, GroundType::Slate.default_params());
    }
}
