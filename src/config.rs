//! Tunable constants for scene construction, animation and rendering.
//!
//! Every number the builders and the scheduler use lives here so a scene can
//! be reproduced from a [`SceneConfig`] alone. `Default` yields the look of
//! the portfolio page: a yeti holding four glowing banners in a snowstorm.

use std::f32::consts::PI;

/// Linear RGB colour in `0.0..=1.0` per channel.
pub type Rgb = [f32; 3];

/// Converts a `0xRRGGBB` literal to a [`Rgb`] triple.
pub const fn hex(rgb: u32) -> Rgb {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
    ]
}

#[derive(Clone, Debug)]
pub struct SceneConfig {
    /// Seed for the single random source every builder draws from.
    pub seed: u64,
    pub terrain: TerrainConfig,
    pub rocks: RockConfig,
    pub creature: CreatureConfig,
    pub banners: BannerConfig,
    pub particles: ParticleConfig,
    pub animation: AnimationConfig,
    pub orbit: OrbitConfig,
    pub render: RenderConfig,
}

impl SceneConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EE7_1CE5,
            terrain: TerrainConfig::default(),
            rocks: RockConfig::default(),
            creature: CreatureConfig::default(),
            banners: BannerConfig::default(),
            particles: ParticleConfig::default(),
            animation: AnimationConfig::default(),
            orbit: OrbitConfig::default(),
            render: RenderConfig::default(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TerrainConfig {
    /// Edge length of the square ground plane.
    pub size: f32,
    /// Quads per edge.
    pub segments: u32,
    /// Vertical placement of the ground node.
    pub base_height: f32,
    /// Spatial frequency of both sinusoids.
    pub frequency: f32,
    pub amplitude: f32,
    /// Vertices closer to the origin than this receive a random peak.
    pub peak_radius: f32,
    /// Upper bound of the random peak height (lower bound is zero).
    pub peak_height: f32,
    pub colour: Rgb,
    pub roughness: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            size: 200.0,
            segments: 100,
            base_height: -5.0,
            frequency: 0.1,
            amplitude: 5.0,
            peak_radius: 50.0,
            peak_height: 2.0,
            colour: hex(0xbfd6e6),
            roughness: 0.9,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RockConfig {
    pub count: usize,
    pub min_radius: f32,
    pub max_radius: f32,
    pub min_height: f32,
    pub max_height: f32,
    pub min_scale: f32,
    pub max_scale: f32,
    pub colour: Rgb,
}

impl Default for RockConfig {
    fn default() -> Self {
        Self {
            count: 30,
            min_radius: 20.0,
            max_radius: 80.0,
            min_height: -4.0,
            max_height: -1.0,
            min_scale: 0.5,
            max_scale: 2.5,
            colour: hex(0x8a9ba8),
        }
    }
}

#[derive(Clone, Debug)]
pub struct CreatureConfig {
    /// Root placement before animation; the breathing offset is added to `position[1]`.
    pub position: [f32; 3],
    pub base_yaw: f32,
    /// Resting pitch of both arm groups.
    pub arm_pitch: f32,
    /// Direct children of the root further than this from the x = 0 plane sway.
    pub limb_sway_threshold: f32,
    pub fur_colour: Rgb,
    pub eye_colour: Rgb,
    pub eye_intensity: f32,
    pub claws_per_hand: usize,
}

impl Default for CreatureConfig {
    fn default() -> Self {
        Self {
            position: [0.0, -2.0, 8.0],
            base_yaw: PI * 0.1,
            arm_pitch: -0.5,
            limb_sway_threshold: 2.75,
            fur_colour: hex(0xd1dce6),
            eye_colour: hex(0x66ccff),
            eye_intensity: 2.5,
            claws_per_hand: 3,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BannerSpec {
    pub label: &'static str,
    pub colour: u32,
}

#[derive(Clone, Debug)]
pub struct BannerConfig {
    /// Two banners per hand: the first two go to the left hand.
    pub banners: [BannerSpec; 4],
    pub raster_width: u32,
    pub raster_height: u32,
    pub plane_width: f32,
    pub plane_height: f32,
    /// Offset below the hand node.
    pub hang_height: f32,
    /// Front/back offsets; banners alternate between the two.
    pub depth_offsets: [f32; 2],
    pub pitch: f32,
    pub emissive_intensity: f32,
    /// Emissive intensity of the first banner, highlighted at start-up.
    pub highlight_intensity: f32,
    pub opacity: f32,
}

impl Default for BannerConfig {
    fn default() -> Self {
        Self {
            banners: [
                BannerSpec {
                    label: "ABOUT ME",
                    colour: 0x66ccff,
                },
                BannerSpec {
                    label: "MY PROJECTS",
                    colour: 0x4dffea,
                },
                BannerSpec {
                    label: "MY SKILLS",
                    colour: 0xff66cc,
                },
                BannerSpec {
                    label: "HIRE ME",
                    colour: 0xffcc66,
                },
            ],
            raster_width: 1024,
            raster_height: 512,
            plane_width: 6.0,
            plane_height: 3.0,
            hang_height: -4.5,
            depth_offsets: [1.0, -1.0],
            pitch: -0.3,
            emissive_intensity: 0.3,
            highlight_intensity: 1.0,
            opacity: 0.95,
        }
    }
}

/// How a particle's fall speed relates to the frame delta.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FallMode {
    /// Each tick moves a particle down by exactly its fall speed.
    PerTick,
    /// Fall speed is a per-tick step at `reference_hz`, scaled by the real delta.
    Normalized { reference_hz: f32 },
}

#[derive(Clone, Debug)]
pub struct ParticleConfig {
    pub count: usize,
    /// Horizontal spawn box is `-half_extent..half_extent` on x and z.
    pub half_extent: f32,
    pub spawn_min_height: f32,
    pub spawn_max_height: f32,
    pub respawn_min_height: f32,
    pub respawn_max_height: f32,
    pub ground_threshold: f32,
    pub min_speed: f32,
    pub max_speed: f32,
    pub min_size: f32,
    pub max_size: f32,
    /// Wind drift per tick on x is `sin(t * wind_frequency_x + index) * drift_x`.
    pub drift_x: f32,
    pub drift_z: f32,
    pub wind_frequency_x: f32,
    pub wind_frequency_z: f32,
    pub fall_mode: FallMode,
    pub opacity: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 5000,
            half_extent: 100.0,
            spawn_min_height: 10.0,
            spawn_max_height: 110.0,
            respawn_min_height: 100.0,
            respawn_max_height: 120.0,
            ground_threshold: -5.0,
            min_speed: 0.05,
            max_speed: 0.2,
            min_size: 0.1,
            max_size: 0.4,
            drift_x: 0.02,
            drift_z: 0.01,
            wind_frequency_x: 0.5,
            wind_frequency_z: 0.3,
            fall_mode: FallMode::PerTick,
            opacity: 0.8,
        }
    }
}

/// Frequencies (rad/s) and amplitudes of every time-driven motion.
#[derive(Clone, Debug)]
pub struct AnimationConfig {
    pub breath_frequency: f32,
    pub breath_amplitude: f32,
    pub sway_frequency: f32,
    pub sway_amplitude: f32,
    pub eye_frequency: f32,
    /// Eye intensity is `eye_base + eye_range * (0.5 + 0.5 * sin)`.
    pub eye_base: f32,
    pub eye_range: f32,
    pub arm_frequency: f32,
    pub arm_amplitude: f32,
    pub banner_yaw_frequency: f32,
    pub banner_yaw_amplitude: f32,
    pub banner_roll_frequency: f32,
    pub banner_roll_amplitude: f32,
    pub banner_float_frequency: f32,
    pub banner_float_amplitude: f32,
    pub moon_frequency: f32,
    pub moon_base: f32,
    pub moon_amplitude: f32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            breath_frequency: 1.5,
            breath_amplitude: 0.05,
            sway_frequency: 0.5,
            sway_amplitude: 0.1,
            eye_frequency: 3.0,
            eye_base: 2.0,
            eye_range: 1.0,
            arm_frequency: 0.8,
            arm_amplitude: 0.2,
            banner_yaw_frequency: 1.0,
            banner_yaw_amplitude: 0.15,
            banner_roll_frequency: 0.7,
            banner_roll_amplitude: 0.05,
            banner_float_frequency: 0.5,
            banner_float_amplitude: 0.1,
            moon_frequency: 0.2,
            moon_base: 0.3,
            moon_amplitude: 0.1,
        }
    }
}

/// Camera path: `x = sin(rate * t) * radius_x`, `z = center_z + cos(rate * t) * radius_z`.
#[derive(Clone, Debug)]
pub struct OrbitConfig {
    pub rate: f32,
    pub radius_x: f32,
    pub radius_z: f32,
    pub center_z: f32,
    pub height: f32,
    pub look_at: [f32; 3],
    pub fovy_degrees: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            rate: 0.05,
            radius_x: 10.0,
            radius_z: 5.0,
            center_z: 15.0,
            height: 5.0,
            look_at: [0.0, 3.0, 0.0],
            fovy_degrees: 55.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub max_pixel_ratio: f64,
    pub clear_colour: Rgb,
    pub fog_colour: Rgb,
    pub fog_density: f32,
    pub shadow_map_size: u32,
    /// Half-width of the moon's orthographic shadow frustum.
    pub shadow_extent: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_pixel_ratio: 2.0,
            clear_colour: hex(0x02060b),
            fog_colour: hex(0x02060b),
            fog_density: 0.02,
            shadow_map_size: 2048,
            shadow_extent: 50.0,
        }
    }
}
