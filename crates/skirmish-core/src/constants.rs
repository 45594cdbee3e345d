//! Simulation constants and tuning parameters.

/// Logic tick rate of the reference host (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick at the reference rate.
pub const DT: f32 = 1.0 / TICK_RATE as f32;

// --- Perception ---

/// Maximum vision distance (meters).
pub const DETECT_RANGE: f32 = 10.0;

/// Half of the vision cone's opening angle (degrees). Full cone is 60°.
pub const DETECT_HALF_ANGLE_DEGREES: f32 = 30.0;

/// Height of the vision ray origin above the actor's position (meters).
pub const EYE_HEIGHT: f32 = 1.0;

// --- Combat agent ---

/// Radius around the spawn anchor in which wander points are picked (meters).
pub const WANDER_RADIUS: f32 = 8.0;

/// Seconds before a wander destination is re-rolled regardless of progress.
pub const WANDER_INTERVAL: f32 = 4.0;

/// Navigation speed while wandering (m/s).
pub const WANDER_SPEED: f32 = 2.0;

/// Navigation speed while chasing (m/s).
pub const CHASE_SPEED: f32 = 3.5;

/// Distance to the target at which a chase escalates to a dash (meters).
pub const DASH_DISTANCE: f32 = 3.0;

/// Seconds a dash lasts before the agent re-evaluates.
pub const DASH_DURATION: f32 = 1.2;

/// Dash speed as a multiple of chase speed.
pub const DASH_SPEED_FACTOR: f32 = 2.5;

/// Remaining path length below which a wander destination counts as reached.
pub const WANDER_ARRIVAL_DISTANCE: f32 = 0.5;

/// How far a random wander point may be moved to land on walkable ground.
pub const NAV_PROJECTION_RADIUS: f32 = 2.0;

/// Hits an enemy survives before dying.
pub const ENEMY_MAX_HEALTH: u32 = 3;

/// Damage dealt by a single damaging contact.
pub const CONTACT_DAMAGE: u32 = 1;

// --- Player locomotion ---

/// Walking speed (m/s).
pub const MOVE_SPEED: f32 = 5.0;

/// Vertical velocity set when a jump starts (m/s).
pub const JUMP_AMOUNT: f32 = 5.0;

/// Speed multiplier while running forward.
pub const RUN_MULTIPLIER: f32 = 1.8;

/// Degrees of rotation per unit of mouse axis per second.
pub const MOUSE_SENSITIVITY: f32 = 150.0;

/// Camera pitch limit in either direction (degrees).
pub const MAX_LOOK_ANGLE: f32 = 80.0;

/// Jumps allowed before touching ground again (the ground jump included).
pub const MAX_JUMPS: u32 = 2;

/// Hits the player survives before the game is over.
pub const PLAYER_MAX_HEALTH: u32 = 3;

/// Height of the player's capsule collider (meters).
pub const COLLIDER_HEIGHT: f32 = 2.0;

/// Radius of the ground probe sphere (meters).
pub const GROUND_PROBE_RADIUS: f32 = 0.45;

/// Extra drop of the ground probe below the capsule's lower hemisphere.
/// Kept small enough that the first tick after takeoff reads as airborne.
pub const GROUND_PROBE_SKIN: f32 = 0.1;

/// Physics layer index that counts as ground.
pub const GROUND_LAYER: u32 = 3;

/// Layer mask the ground probe tests against.
pub const GROUND_LAYER_MASK: u32 = 1 << GROUND_LAYER;

// --- Match ---

/// Match time limit (seconds).
pub const MATCH_DURATION: f32 = 120.0;

// --- Projectiles ---

/// Projectile muzzle speed (m/s).
pub const PROJECTILE_SPEED: f32 = 40.0;

/// Seconds before an unspent projectile is removed.
pub const PROJECTILE_LIFETIME: f32 = 3.0;

/// Projectile collision radius (meters).
pub const PROJECTILE_RADIUS: f32 = 0.1;

// --- Reference host ---

/// Downward acceleration applied to the player (m/s²).
pub const GRAVITY: f32 = 9.81;

/// Collision radius of actor bodies (meters).
pub const ACTOR_RADIUS: f32 = 0.5;
