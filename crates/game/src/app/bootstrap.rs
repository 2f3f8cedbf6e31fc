use std::env;
use std::path::PathBuf;

use gridcast::{
    LevelConfig, LevelLoadError, LoopConfig, RaycastConfig, Raycaster, World, LEVEL_ENV_VAR,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

const RAY_COUNT_ENV_VAR: &str = "GRIDCAST_RAY_COUNT";

pub(crate) struct AppWiring {
    pub(crate) config: LoopConfig,
    pub(crate) world: World,
    pub(crate) raycaster: Raycaster,
}

pub(crate) fn build_app() -> Result<AppWiring, LevelLoadError> {
    init_tracing();
    info!("=== gridcast startup ===");

    let level = load_level(read_env_var(LEVEL_ENV_VAR).map(PathBuf::from))?;
    let world = World::from_level(&level)?;
    let raycaster = Raycaster::new(raycast_config(read_env_var(RAY_COUNT_ENV_VAR).as_deref()));

    Ok(AppWiring {
        config: LoopConfig::default(),
        world,
        raycaster,
    })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .compact()
        .init();
}

fn read_env_var(var: &'static str) -> Option<String> {
    match env::var(var) {
        Ok(value) => Some(value),
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!(env_var = var, error = %err, "unable to read env var; ignoring");
            None
        }
    }
}

fn load_level(path: Option<PathBuf>) -> Result<LevelConfig, LevelLoadError> {
    match path {
        Some(path) => {
            info!(path = %path.display(), "level_source_file");
            LevelConfig::load(&path)
        }
        None => {
            info!("level_source_builtin");
            Ok(LevelConfig::canonical())
        }
    }
}

fn raycast_config(ray_count_override: Option<&str>) -> RaycastConfig {
    let mut config = RaycastConfig::default();
    let Some(raw) = ray_count_override else {
        return config;
    };

    match raw.trim().parse::<u32>() {
        Ok(count) if count > 0 => config.ray_count = count,
        _ => warn!(
            env_var = RAY_COUNT_ENV_VAR,
            value = raw,
            "invalid ray count; falling back to default"
        ),
    }
    config
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_level_path_uses_builtin_level() {
        let level = load_level(None).expect("builtin level");
        assert_eq!(level, LevelConfig::canonical());
    }

    #[test]
    fn level_path_is_loaded_from_disk() {
        let mut level = LevelConfig::canonical();
        level.spawn.angle_degrees = 270;
        level.sprites.clear();

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        let raw = serde_json::to_string(&level).expect("serialize level");
        file.write_all(raw.as_bytes()).expect("write level");

        let loaded = load_level(Some(file.path().to_path_buf())).expect("load");
        assert_eq!(loaded, level);
    }

    #[test]
    fn unreadable_level_path_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let result = load_level(Some(dir.path().join("nope.json")));
        assert!(matches!(result, Err(LevelLoadError::Read { .. })));
    }

    #[test]
    fn ray_count_override_applies_when_valid() {
        assert_eq!(raycast_config(Some("128")).ray_count, 128);
        assert_eq!(raycast_config(Some(" 32 ")).ray_count, 32);
    }

    #[test]
    fn invalid_ray_count_falls_back_to_default() {
        let default_count = RaycastConfig::default().ray_count;
        assert_eq!(raycast_config(None).ray_count, default_count);
        assert_eq!(raycast_config(Some("zero")).ray_count, default_count);
        assert_eq!(raycast_config(Some("0")).ray_count, default_count);
        assert_eq!(raycast_config(Some("-4")).ray_count, default_count);
    }
}
