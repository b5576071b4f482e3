pub mod serve_note_route;
