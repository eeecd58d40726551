pub mod score_routes;
pub mod system_routes;
