// Two security tiers, mirrored by the router:
// public (no authentication) and protected (bearer token required).
pub mod protected;
pub mod public;
