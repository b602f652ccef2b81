// handlers/mod.rs - two security tiers
//
// Public (no identity) → Protected (resolved identity + site guard)

pub mod protected; // /api/observations, /api/users, /api/sites
pub mod public; // /api/public, /health
