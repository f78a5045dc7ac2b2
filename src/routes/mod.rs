pub mod payroll_routes;
pub mod trip_routes;
