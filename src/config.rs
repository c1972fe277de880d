use std::fs;
use std::path::Path;

use ratatui::style::Color;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EngineError};

/// Default screen width in pixels; the grid is derived from it.
pub const DEFAULT_SCREEN_WIDTH: u32 = 800;

/// Default screen height in pixels.
pub const DEFAULT_SCREEN_HEIGHT: u32 = 600;

/// Edge length of one grid cell in pixels.
pub const DEFAULT_CELL_SIZE: u32 = 28;

/// Starting speed in ticks per second.
pub const INITIAL_SPEED: f64 = 10.0;

/// Speed gained per food eaten.
pub const SPEED_INCREMENT: f64 = 0.4;

/// Speed ceiling in ticks per second.
pub const MAX_SPEED: f64 = 24.0;

/// Rejection-sampling attempts before food placement enumerates free cells.
pub const DEFAULT_FOOD_RETRY_BUDGET: u32 = 1024;

/// Smallest grid edge that leaves a 2×2 food region inside the margin.
pub const MIN_GRID_EDGE: u16 = 4;

/// Logical grid dimensions passed through the game as a named type.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GridSize {
    pub width: u16,
    pub height: u16,
}

impl GridSize {
    /// Derives the grid from screen pixels, flooring partial cells.
    pub fn from_screen(screen: ScreenSettings) -> Result<Self, EngineError> {
        if screen.cell_size == 0 {
            return Err(EngineError::InvalidConfig(
                "cell_size must be non-zero".to_owned(),
            ));
        }

        let to_edge = |pixels: u32, axis: &str| {
            u16::try_from(pixels / screen.cell_size).map_err(|_| {
                EngineError::InvalidConfig(format!("screen {axis} yields too many cells"))
            })
        };

        Ok(Self {
            width: to_edge(screen.width, "width")?,
            height: to_edge(screen.height, "height")?,
        })
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            width: (DEFAULT_SCREEN_WIDTH / DEFAULT_CELL_SIZE) as u16,
            height: (DEFAULT_SCREEN_HEIGHT / DEFAULT_CELL_SIZE) as u16,
        }
    }
}

/// How the self-collision check treats the tail cell that is about to move.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionRule {
    /// The new head may not enter any current segment, tail included.
    #[default]
    Strict,
    /// The tail cell counts as free when the snake is not growing this tick.
    VacatingTail,
}

/// Parameters the engine is constructed with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub grid: GridSize,
    pub initial_speed: f64,
    pub speed_increment: f64,
    pub max_speed: f64,
    pub collision_rule: CollisionRule,
    pub food_retry_budget: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridSize::default(),
            initial_speed: INITIAL_SPEED,
            speed_increment: SPEED_INCREMENT,
            max_speed: MAX_SPEED,
            collision_rule: CollisionRule::Strict,
            food_retry_budget: DEFAULT_FOOD_RETRY_BUDGET,
        }
    }
}

impl EngineConfig {
    /// Default parameters on a custom grid.
    #[must_use]
    pub fn with_grid(width: u16, height: u16) -> Self {
        Self {
            grid: GridSize { width, height },
            ..Self::default()
        }
    }

    /// Checks every parameter the engine relies on.
    pub fn validate(&self) -> Result<(), EngineError> {
        let invalid = |message: String| Err(EngineError::InvalidConfig(message));

        if self.grid.width < MIN_GRID_EDGE || self.grid.height < MIN_GRID_EDGE {
            return invalid(format!(
                "grid {}x{} is smaller than {MIN_GRID_EDGE}x{MIN_GRID_EDGE}",
                self.grid.width, self.grid.height
            ));
        }
        if !self.initial_speed.is_finite() || self.initial_speed <= 0.0 {
            return invalid(format!("initial_speed {} must be positive", self.initial_speed));
        }
        if !self.max_speed.is_finite() || self.max_speed < self.initial_speed {
            return invalid(format!(
                "max_speed {} must be at least initial_speed {}",
                self.max_speed, self.initial_speed
            ));
        }
        if !self.speed_increment.is_finite() || self.speed_increment < 0.0 {
            return invalid(format!(
                "speed_increment {} must be non-negative",
                self.speed_increment
            ));
        }
        if self.food_retry_budget == 0 {
            return invalid("food_retry_budget must be non-zero".to_owned());
        }

        Ok(())
    }
}

/// Screen geometry the grid is derived from.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenSettings {
    pub width: u32,
    pub height: u32,
    pub cell_size: u32,
}

impl Default for ScreenSettings {
    fn default() -> Self {
        Self {
            width: DEFAULT_SCREEN_WIDTH,
            height: DEFAULT_SCREEN_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
        }
    }
}

/// Tunable engine parameters as they appear in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineSettings {
    pub initial_speed: f64,
    pub speed_increment: f64,
    pub max_speed: f64,
    pub collision_rule: CollisionRule,
    pub food_retry_budget: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        let defaults = EngineConfig::default();
        Self {
            initial_speed: defaults.initial_speed,
            speed_increment: defaults.speed_increment,
            max_speed: defaults.max_speed,
            collision_rule: defaults.collision_rule,
            food_retry_budget: defaults.food_retry_budget,
        }
    }
}

/// JSON settings file. Every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub screen: ScreenSettings,
    pub engine: EngineSettings,
}

impl Settings {
    /// Reads and parses a settings file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Builds a validated engine configuration.
    pub fn engine_config(&self) -> Result<EngineConfig, EngineError> {
        let config = EngineConfig {
            grid: GridSize::from_screen(self.screen)?,
            initial_speed: self.engine.initial_speed,
            speed_increment: self.engine.speed_increment,
            max_speed: self.engine.max_speed,
            collision_rule: self.engine.collision_rule,
            food_retry_budget: self.engine.food_retry_budget,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Colors used by the terminal renderer only.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub grid: Color,
    pub snake_head: Color,
    /// Body segments alternate between these two colors.
    pub snake_body: [Color; 2],
    pub food: Color,
    pub text: Color,
    pub accent: Color,
}

/// Dark board with bright green snake and red food.
pub const PALETTE_NEON: Palette = Palette {
    background: Color::Rgb(18, 18, 18),
    grid: Color::Rgb(30, 30, 30),
    snake_head: Color::Rgb(102, 255, 102),
    snake_body: [Color::Rgb(0, 153, 0), Color::Rgb(25, 125, 25)],
    food: Color::Rgb(255, 75, 75),
    text: Color::Rgb(245, 245, 245),
    accent: Color::Rgb(255, 180, 0),
};

impl Default for Palette {
    fn default() -> Self {
        PALETTE_NEON
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    use super::{CollisionRule, EngineConfig, GridSize, ScreenSettings, Settings};
    use crate::error::{ConfigError, EngineError};

    #[test]
    fn default_grid_floors_screen_into_cells() {
        assert_eq!(
            GridSize::default(),
            GridSize {
                width: 28,
                height: 21
            }
        );
        assert_eq!(
            GridSize::from_screen(ScreenSettings::default()),
            Ok(GridSize::default())
        );
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        let screen = ScreenSettings {
            cell_size: 0,
            ..ScreenSettings::default()
        };

        assert!(matches!(
            GridSize::from_screen(screen),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn default_config_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn tiny_grid_and_bad_speeds_are_rejected() {
        let tiny = EngineConfig::with_grid(3, 10);
        assert!(tiny.validate().is_err());

        let inverted = EngineConfig {
            max_speed: 5.0,
            ..EngineConfig::default()
        };
        assert!(inverted.validate().is_err());

        let negative = EngineConfig {
            speed_increment: -0.1,
            ..EngineConfig::default()
        };
        assert!(negative.validate().is_err());

        let nan = EngineConfig {
            initial_speed: f64::NAN,
            ..EngineConfig::default()
        };
        assert!(nan.validate().is_err());
    }

    #[test]
    fn settings_fill_missing_fields_with_defaults() {
        let raw = r#"{"engine": {"max_speed": 30.0, "collision_rule": "vacating_tail"}}"#;
        let settings: Settings =
            serde_json::from_str(raw).expect("partial settings should parse");

        assert_eq!(settings.screen, ScreenSettings::default());
        assert_eq!(settings.engine.max_speed, 30.0);
        assert_eq!(settings.engine.collision_rule, CollisionRule::VacatingTail);

        let config = settings.engine_config().expect("settings should validate");
        assert_eq!(config.grid, GridSize::default());
        assert_eq!(config.initial_speed, 10.0);
    }

    #[test]
    fn unknown_settings_fields_are_rejected() {
        let parsed = serde_json::from_str::<Settings>(r#"{"engine": {"lives": 3}}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn settings_screen_drives_grid() {
        let settings: Settings =
            serde_json::from_str(r#"{"screen": {"width": 280, "height": 140, "cell_size": 28}}"#)
                .expect("screen settings should parse");

        let config = settings.engine_config().expect("settings should validate");
        assert_eq!(
            config.grid,
            GridSize {
                width: 10,
                height: 5
            }
        );
    }

    #[test]
    fn missing_settings_file_is_a_read_error() {
        let path = unique_test_path("missing");

        assert!(matches!(Settings::load(&path), Err(ConfigError::Read { .. })));
    }

    #[test]
    fn malformed_settings_file_is_a_parse_error() {
        let path = unique_test_path("malformed");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, "{ not json").expect("test file write should succeed");

        let result = Settings::load(&path);
        cleanup_test_path(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn settings_file_loads_from_disk() {
        let path = unique_test_path("valid");
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("test parent directory should be creatable");
        }
        fs::write(&path, r#"{"engine": {"initial_speed": 12.0}}"#)
            .expect("test file write should succeed");

        let result = Settings::load(&path);
        cleanup_test_path(&path);

        let settings = result.expect("valid settings should load");
        assert_eq!(settings.engine.initial_speed, 12.0);
    }

    fn unique_test_path(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time should be after epoch")
            .as_nanos();

        std::env::temp_dir()
            .join("neon-snake-settings-tests")
            .join(format!("{label}-{nanos}.json"))
    }

    fn cleanup_test_path(path: &PathBuf) {
        let _ = fs::remove_file(path);
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir(parent);
        }
    }
}
