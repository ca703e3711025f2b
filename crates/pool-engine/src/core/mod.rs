pub mod ball;
pub mod cue;
pub mod intersection;
pub mod physics;
pub mod table;
pub mod time;
pub mod vector;
