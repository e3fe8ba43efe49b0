pub const GRAVITY_M_S2: f64 = 9.80665;
pub const SECONDS_PER_YEAR: f64 = 365.0 * 24.0 * 3600.0; // calendar year, no leap days

// Compaction law (Kominz et al. 2011, https://doi.org/10.2110/jsr.2011.60)
pub const SURFACE_POROSITY: f64 = 0.775;
pub const POROSITY_DECAY_LENGTH_M: f64 = 1251.0;

// Porosity-permeability law (Daigle and Screaton 2015, https://doi.org/10.1111/gfl.12090)
// log10(k) = slope * phi + intercept, k in m²
pub const LOG_PERMEABILITY_SLOPE: f64 = 8.3887;
pub const LOG_PERMEABILITY_INTERCEPT: f64 = -20.862;

// Explicit diffusion stability: dt <= STABILITY_FACTOR * dz² / alpha
pub const STABILITY_FACTOR: f64 = 0.5;

// default sim start settings:
pub const DEFAULT_SEAFLOOR_DEPTH_M: f64 = 800.0;
pub const DEFAULT_NEW_SEAFLOOR_DEPTH_M: f64 = 650.0;
pub const DEFAULT_WATER_DENSITY_KG_M3: f64 = 1024.0;
pub const DEFAULT_WATER_BULK_MODULUS_PA: f64 = 2.25e9;
pub const DEFAULT_VISCOSITY_PA_S: f64 = 0.001;
pub const DEFAULT_VERTICAL_RESOLUTION_M: f64 = 20.0;
pub const DEFAULT_STEP_COUNT: usize = 41;
pub const DEFAULT_MAX_ITERATIONS: usize = 300_000;
pub const DEFAULT_CONVERGENCE_THRESHOLD: f64 = 0.001; // 0.1% of steady-state pressure
pub const DEFAULT_SNAPSHOT_YEAR: u32 = 5;

// smallest grid that still has one interior node
pub const MIN_STEP_COUNT: usize = 3;
