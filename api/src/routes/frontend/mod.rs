pub mod frontend_route;
