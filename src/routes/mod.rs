pub mod energy_routes;
