pub mod dorm;
