// handlers/mod.rs - Two security tiers
//
// Public (no auth) → Protected (bearer token, /api/*)
pub mod protected; // Tier 2: token verified by jwt_auth_middleware
pub mod public; // Tier 1: token acquisition and read-only catalogue
