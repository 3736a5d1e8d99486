//! Game configuration
//!
//! Loaded from a plain-text file of whitespace-delimited lines. The first
//! token of each line names a section, the rest are that section's fields
//! in a fixed order:
//!
//! ```text
//! Window  W H FL FS
//! Font    PATH SIZE R G B
//! Player  SR CR S FR FG FB OR OG OB OT V
//! Enemy   SR CR OR OG OB OT VMIN VMAX L SI SMIN SMAX
//! Bullet  SR CR FR FG FB OR OG OB OT V L S
//! Special COUNT COOLDOWN
//! ```
//!
//! Unknown keywords are skipped. Sections absent from the file keep their
//! defaults.

use std::path::{Path, PathBuf};
use std::str::{FromStr, SplitWhitespace};

use crate::sim::entity::Rgba;

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("cannot read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A section line ended before all of its fields were given
    #[error("line {line}: {section} is missing field {field}")]
    MissingField {
        line: usize,
        section: &'static str,
        field: &'static str,
    },

    /// A field token did not parse as the expected type
    #[error("line {line}: {section} field {field} has invalid value {value:?}")]
    InvalidField {
        line: usize,
        section: &'static str,
        field: &'static str,
        value: String,
    },

    /// Values parsed but cannot be used together
    #[error("{section}: {reason}")]
    InvalidRange {
        section: &'static str,
        reason: String,
    },
}

/// Window section
#[derive(Debug, Clone, PartialEq)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    /// Target frames per second (0 = unlimited)
    pub frame_limit: u32,
    pub fullscreen: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
            frame_limit: 60,
            fullscreen: false,
        }
    }
}

impl WindowConfig {
    pub fn center(&self) -> glam::Vec2 {
        glam::Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

/// Font section. The web HUD applies size and color; the path is kept for
/// frontends that rasterise their own text.
#[derive(Debug, Clone, PartialEq)]
pub struct FontConfig {
    pub path: String,
    pub size: u32,
    pub color: Rgba,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: "fonts/tech.ttf".to_string(),
            size: 24,
            color: Rgba::WHITE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    pub shape_radius: f32,
    pub collision_radius: f32,
    /// Pixels per frame
    pub speed: f32,
    pub fill: Rgba,
    pub outline: Rgba,
    pub outline_thickness: f32,
    pub vertices: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            shape_radius: 32.0,
            collision_radius: 32.0,
            speed: 5.0,
            fill: Rgba::rgb(5, 5, 5),
            outline: Rgba::rgb(255, 0, 0),
            outline_thickness: 4.0,
            vertices: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemyConfig {
    pub shape_radius: f32,
    pub collision_radius: f32,
    pub outline: Rgba,
    pub outline_thickness: f32,
    pub min_vertices: u32,
    pub max_vertices: u32,
    /// Lifespan in frames of the small enemies a kill splits into
    pub small_lifespan: u32,
    /// Frames between enemy spawns
    pub spawn_interval: u64,
    pub min_speed: f32,
    pub max_speed: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            shape_radius: 32.0,
            collision_radius: 32.0,
            outline: Rgba::WHITE,
            outline_thickness: 2.0,
            min_vertices: 3,
            max_vertices: 8,
            small_lifespan: 90,
            spawn_interval: 60,
            min_speed: 3.0,
            max_speed: 3.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BulletConfig {
    pub shape_radius: f32,
    pub collision_radius: f32,
    pub fill: Rgba,
    pub outline: Rgba,
    pub outline_thickness: f32,
    pub vertices: u32,
    /// Frames before the bullet expires
    pub lifespan: u32,
    /// Pixels per frame
    pub speed: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            shape_radius: 10.0,
            collision_radius: 10.0,
            fill: Rgba::WHITE,
            outline: Rgba::WHITE,
            outline_thickness: 2.0,
            vertices: 20,
            lifespan: 90,
            speed: 20.0,
        }
    }
}

/// Radial burst fired by the secondary button
#[derive(Debug, Clone, PartialEq)]
pub struct SpecialConfig {
    /// Bullets per burst (0 disables the weapon)
    pub bullets: u32,
    /// Frames between bursts
    pub cooldown: u64,
}

impl Default for SpecialConfig {
    fn default() -> Self {
        Self {
            bullets: 16,
            cooldown: 300,
        }
    }
}

/// Complete game configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    pub window: WindowConfig,
    pub font: FontConfig,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub bullet: BulletConfig,
    pub special: SpecialConfig,
}

/// Cursor over the field tokens of one config line
struct Fields<'a> {
    section: &'static str,
    line: usize,
    tokens: SplitWhitespace<'a>,
}

impl<'a> Fields<'a> {
    fn next<T: FromStr>(&mut self, field: &'static str) -> Result<T, ConfigError> {
        let token = self.tokens.next().ok_or(ConfigError::MissingField {
            line: self.line,
            section: self.section,
            field,
        })?;
        token.parse().map_err(|_| ConfigError::InvalidField {
            line: self.line,
            section: self.section,
            field,
            value: token.to_string(),
        })
    }

    /// A float field; NaN and infinities are rejected like any other bad token
    fn float(&mut self, field: &'static str) -> Result<f32, ConfigError> {
        let value: f32 = self.next(field)?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(ConfigError::InvalidField {
                line: self.line,
                section: self.section,
                field,
                value: value.to_string(),
            })
        }
    }

    fn rgb(&mut self, r: &'static str, g: &'static str, b: &'static str) -> Result<Rgba, ConfigError> {
        Ok(Rgba::rgb(self.next(r)?, self.next(g)?, self.next(b)?))
    }

    fn finish(mut self) {
        if self.tokens.next().is_some() {
            log::warn!(
                "Config line {}: ignoring extra tokens after {} fields",
                self.line,
                self.section
            );
        }
    }
}

impl Config {
    /// Parse config text. Does not validate ranges; see [`Config::validate`].
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for (index, raw) in text.lines().enumerate() {
            let content = raw.split('#').next().unwrap_or_default();
            let mut tokens = content.split_whitespace();
            let Some(keyword) = tokens.next() else {
                continue;
            };
            let line = index + 1;

            match keyword {
                "Window" => {
                    let mut f = Fields { section: "Window", line, tokens };
                    config.window = WindowConfig {
                        width: f.next("W")?,
                        height: f.next("H")?,
                        frame_limit: f.next("FL")?,
                        fullscreen: f.next::<u8>("FS")? != 0,
                    };
                    f.finish();
                }
                "Font" => {
                    let mut f = Fields { section: "Font", line, tokens };
                    config.font = FontConfig {
                        path: f.next("PATH")?,
                        size: f.next("SIZE")?,
                        color: f.rgb("R", "G", "B")?,
                    };
                    f.finish();
                }
                "Player" => {
                    let mut f = Fields { section: "Player", line, tokens };
                    config.player = PlayerConfig {
                        shape_radius: f.float("SR")?,
                        collision_radius: f.float("CR")?,
                        speed: f.float("S")?,
                        fill: f.rgb("FR", "FG", "FB")?,
                        outline: f.rgb("OR", "OG", "OB")?,
                        outline_thickness: f.float("OT")?,
                        vertices: f.next("V")?,
                    };
                    f.finish();
                }
                "Enemy" => {
                    let mut f = Fields { section: "Enemy", line, tokens };
                    config.enemy = EnemyConfig {
                        shape_radius: f.float("SR")?,
                        collision_radius: f.float("CR")?,
                        outline: f.rgb("OR", "OG", "OB")?,
                        outline_thickness: f.float("OT")?,
                        min_vertices: f.next("VMIN")?,
                        max_vertices: f.next("VMAX")?,
                        small_lifespan: f.next("L")?,
                        spawn_interval: f.next("SI")?,
                        min_speed: f.float("SMIN")?,
                        max_speed: f.float("SMAX")?,
                    };
                    f.finish();
                }
                "Bullet" => {
                    let mut f = Fields { section: "Bullet", line, tokens };
                    config.bullet = BulletConfig {
                        shape_radius: f.float("SR")?,
                        collision_radius: f.float("CR")?,
                        fill: f.rgb("FR", "FG", "FB")?,
                        outline: f.rgb("OR", "OG", "OB")?,
                        outline_thickness: f.float("OT")?,
                        vertices: f.next("V")?,
                        lifespan: f.next("L")?,
                        speed: f.float("S")?,
                    };
                    f.finish();
                }
                "Special" => {
                    let mut f = Fields { section: "Special", line, tokens };
                    config.special = SpecialConfig {
                        bullets: f.next("COUNT")?,
                        cooldown: f.next("COOLDOWN")?,
                    };
                    f.finish();
                }
                other => {
                    log::debug!("Config line {}: skipping unknown section {:?}", line, other);
                    continue;
                }
            }

            log::info!("initialized {}", keyword);
        }

        Ok(config)
    }

    /// Reject values the spawners cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let range = |section: &'static str, reason: String| ConfigError::InvalidRange { section, reason };

        let (p, e, b) = (&self.player, &self.enemy, &self.bullet);
        let floats = [
            ("Player", "SR", p.shape_radius),
            ("Player", "CR", p.collision_radius),
            ("Player", "S", p.speed),
            ("Player", "OT", p.outline_thickness),
            ("Enemy", "SR", e.shape_radius),
            ("Enemy", "CR", e.collision_radius),
            ("Enemy", "OT", e.outline_thickness),
            ("Enemy", "SMIN", e.min_speed),
            ("Enemy", "SMAX", e.max_speed),
            ("Bullet", "SR", b.shape_radius),
            ("Bullet", "CR", b.collision_radius),
            ("Bullet", "OT", b.outline_thickness),
            ("Bullet", "S", b.speed),
        ];
        if let Some((section, field, value)) = floats.into_iter().find(|(_, _, v)| !v.is_finite()) {
            return Err(range(section, format!("{field} must be finite, got {value}")));
        }

        let w = &self.window;
        if w.width == 0 || w.height == 0 {
            return Err(range("Window", format!("size {}x{} is empty", w.width, w.height)));
        }

        if self.player.vertices < 3 {
            return Err(range("Player", format!("V must be at least 3, got {}", self.player.vertices)));
        }
        if self.bullet.vertices < 3 {
            return Err(range("Bullet", format!("V must be at least 3, got {}", self.bullet.vertices)));
        }

        if e.min_vertices < 3 || e.min_vertices > e.max_vertices {
            return Err(range(
                "Enemy",
                format!("vertex range {}..={} is invalid", e.min_vertices, e.max_vertices),
            ));
        }
        if e.min_speed < 0.0 || e.min_speed > e.max_speed {
            return Err(range(
                "Enemy",
                format!("speed range {}..={} is invalid", e.min_speed, e.max_speed),
            ));
        }
        let diameter = e.shape_radius * 2.0;
        if e.shape_radius < 0.0 || diameter > w.width as f32 || diameter > w.height as f32 {
            return Err(range(
                "Enemy",
                format!("radius {} does not fit a {}x{} window", e.shape_radius, w.width, w.height),
            ));
        }

        Ok(())
    }

    /// Read, parse and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`Config::load`], but an unreadable file falls back to defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io { path, source }) => {
                log::warn!("no config file {} ({}), using defaults", path.display(), source);
                Ok(Self::default())
            }
            other => other,
        }
    }
}
